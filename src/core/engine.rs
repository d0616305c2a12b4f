use crate::adapters::unpack::{ApktoolUnpacker, ArchiveUnpacker};
use crate::core::android::AndroidPipeline;
use crate::core::ios::IosPipeline;
use crate::core::IconPipeline;
use crate::domain::model::{FetchOutcome, IconDeclaration, PackageDescriptor, Platform};
use crate::utils::error::{IconError, Result};
use std::path::{Path, PathBuf};

pub struct IconFetcher<P: IconPipeline> {
    pipeline: P,
}

impl<P: IconPipeline> IconFetcher<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Unpack, then read the icon declaration without resolving a file.
    pub fn declared(&self, package: &PackageDescriptor, workdir: &Path) -> Result<Option<IconDeclaration>> {
        if package.platform != self.pipeline.platform() {
            return Err(IconError::UnsupportedPackage {
                path: package.path.clone(),
                reason: format!(
                    "{} package given to the {} resolver",
                    package.platform,
                    self.pipeline.platform()
                ),
            });
        }

        let workdir = std::path::absolute(workdir)?;
        std::fs::create_dir_all(&workdir)?;

        tracing::info!("Unpacking {} into {}", package.path.display(), workdir.display());
        let root = self.pipeline.unpack(package, &workdir)?;

        tracing::info!("Looking up icon declaration in {}", root.display());
        let declaration = self.pipeline.lookup(&root)?;
        match &declaration {
            Some(d) => tracing::info!("Declared icon: {}", d.icon),
            None => tracing::info!("Package declares no icon"),
        }
        Ok(declaration)
    }

    pub fn fetch(&self, package: &PackageDescriptor, workdir: &Path) -> Result<FetchOutcome> {
        let Some(declaration) = self.declared(package, workdir)? else {
            return Ok(FetchOutcome {
                package: package.clone(),
                declared: None,
                icon: None,
            });
        };

        tracing::info!("Resolving {} under {}", declaration.icon, declaration.search_root.display());
        let icon = self.pipeline.resolve(&declaration)?;
        tracing::info!("Icon resolved: {}", icon.display());

        Ok(FetchOutcome {
            package: package.clone(),
            declared: Some(declaration.icon),
            icon: Some(icon),
        })
    }
}

/// Decodes `apk` with apktool under `workdir` and returns the best mipmap `.png`.
pub fn fetch_android_icon(apk: &Path, workdir: &Path) -> Result<PathBuf> {
    let package = PackageDescriptor::new(apk, Platform::Android);
    let fetcher = IconFetcher::new(AndroidPipeline::new(ApktoolUnpacker::default()));

    fetcher
        .fetch(&package, workdir)?
        .icon
        .ok_or_else(|| IconError::declaration_not_found("android:icon"))
}

/// Extracts `ipa` under `workdir`. `Ok(None)` when the app declares no icon files.
pub fn fetch_ios_icon(ipa: &Path, bundle_name: Option<&str>, workdir: &Path) -> Result<Option<PathBuf>> {
    let package = PackageDescriptor::new(ipa, Platform::Ios);
    let pipeline = IosPipeline::new(ArchiveUnpacker).with_bundle_name(bundle_name.map(str::to_string));

    Ok(IconFetcher::new(pipeline).fetch(&package, workdir)?.icon)
}
