use crate::adapters::manifest::ManifestDocument;
use crate::core::pattern::paths_by_pattern;
use crate::domain::model::{
    IconDeclaration, IconPrefixPolicy, LogicalIconRef, PackageDescriptor, Platform, ANDROID_DENSITY_BUCKETS,
};
use crate::domain::ports::{IconPipeline, Unpacker};
use crate::utils::error::{IconError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const MIPMAP_PREFIX: &str = "@mipmap/";

static MIPMAP_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@mipmap/([^/\\]+)$").expect("mipmap reference regex"));

/// Reads `manifest > application[android:icon]` and turns it into a bare icon name.
pub fn find_icon_name(doc: &ManifestDocument, policy: IconPrefixPolicy) -> Result<LogicalIconRef> {
    let manifest = doc
        .root_element("manifest")
        .ok_or_else(|| IconError::declaration_not_found("manifest"))?;
    let application = manifest
        .child("application")
        .ok_or_else(|| IconError::declaration_not_found("application"))?;
    let icon = application
        .attribute("android:icon")
        .ok_or_else(|| IconError::declaration_not_found("android:icon"))?;

    match policy {
        IconPrefixPolicy::Lenient => {
            LogicalIconRef::new(icon.strip_prefix(MIPMAP_PREFIX).unwrap_or(icon))
        }
        IconPrefixPolicy::Strict => {
            let name = MIPMAP_REFERENCE
                .captures(icon)
                .and_then(|caps| caps.get(1))
                .ok_or_else(|| IconError::InvalidIconReference {
                    value: icon.to_string(),
                    reason: format!("expected the form {}<name>", MIPMAP_PREFIX),
                })?;
            LogicalIconRef::new(name.as_str())
        }
    }
}

/// Returns the first `<icon>.png` found, walking density buckets from highest to lowest.
pub fn find_icon(res_dir: &Path, icon: &LogicalIconRef) -> Result<PathBuf> {
    let file_name = icon.file_name("");
    let mut searched = 0;

    for bucket in ANDROID_DENSITY_BUCKETS {
        for dir in paths_by_pattern(res_dir, bucket.pattern())? {
            searched += 1;
            let candidate = dir.join(&file_name);
            tracing::debug!("Checking {}", candidate.display());
            if candidate.try_exists()? {
                return Ok(candidate);
            }
        }
    }

    Err(IconError::IconNotFound {
        name: icon.to_string(),
        searched,
    })
}

pub struct AndroidPipeline<U: Unpacker> {
    unpacker: U,
    prefix_policy: IconPrefixPolicy,
}

impl<U: Unpacker> AndroidPipeline<U> {
    pub fn new(unpacker: U) -> Self {
        Self {
            unpacker,
            prefix_policy: IconPrefixPolicy::default(),
        }
    }

    pub fn with_prefix_policy(mut self, policy: IconPrefixPolicy) -> Self {
        self.prefix_policy = policy;
        self
    }
}

impl<U: Unpacker> IconPipeline for AndroidPipeline<U> {
    fn platform(&self) -> Platform {
        Platform::Android
    }

    fn unpack(&self, package: &PackageDescriptor, workdir: &Path) -> Result<PathBuf> {
        self.unpacker.unpack(&package.path, workdir)
    }

    fn lookup(&self, root: &Path) -> Result<Option<IconDeclaration>> {
        let manifest_path = root.join("AndroidManifest.xml");
        tracing::debug!("Reading manifest: {}", manifest_path.display());

        let doc = ManifestDocument::from_file(&manifest_path)?;
        let icon = find_icon_name(&doc, self.prefix_policy)?;

        Ok(Some(IconDeclaration {
            icon,
            search_root: root.join("res"),
        }))
    }

    fn resolve(&self, declaration: &IconDeclaration) -> Result<PathBuf> {
        find_icon(&declaration.search_root, &declaration.icon)
    }
}
