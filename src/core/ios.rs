use crate::adapters::plist_data::PlistData;
use crate::core::pattern::paths_by_pattern;
use crate::domain::model::{IconDeclaration, LogicalIconRef, MissingIconPolicy, PackageDescriptor, Platform};
use crate::domain::ports::{IconPipeline, Unpacker};
use crate::utils::error::{IconError, Result};
use crate::utils::validation::validate_bare_name;
use std::path::{Path, PathBuf};

/// `CFBundleIcons > CFBundlePrimaryIcon > CFBundleIconFiles`
pub fn find_icons(plist: &PlistData) -> Result<Vec<String>> {
    let bundle_icons = plist
        .get_map("CFBundleIcons")
        .ok_or_else(|| IconError::declaration_not_found("CFBundleIcons"))?;
    let primary_icon = bundle_icons
        .get_map("CFBundlePrimaryIcon")
        .ok_or_else(|| IconError::declaration_not_found("CFBundlePrimaryIcon"))?;
    primary_icon
        .get_string_array("CFBundleIconFiles")
        .ok_or_else(|| IconError::declaration_not_found("CFBundleIconFiles"))
}

/// Finds the `.app` bundle inside `payload`, either by the given name or by searching `*.app`.
pub fn locate_bundle(payload: &Path, bundle_name: Option<&str>) -> Result<PathBuf> {
    let not_found = || IconError::BundleNotFound {
        payload: payload.to_path_buf(),
    };

    if let Some(name) = bundle_name {
        let name = name.strip_suffix(".app").unwrap_or(name);
        validate_bare_name("bundle_name", name)?;
        let bundle = payload.join(format!("{}.app", name));
        return if bundle.is_dir() { Ok(bundle) } else { Err(not_found()) };
    }

    let bundles: Vec<PathBuf> = paths_by_pattern(payload, "*.app")?
        .into_iter()
        .filter(|p| p.is_dir())
        .collect();

    if bundles.len() > 1 {
        tracing::warn!(
            "Found {} bundles in {}, using the first one",
            bundles.len(),
            payload.display()
        );
    }

    bundles.into_iter().next().ok_or_else(not_found)
}

/// Tries `<icon>@2x.png`, then `<icon>.png`. No other scale is tried.
pub fn find_icon(bundle: &Path, icon: &LogicalIconRef, policy: MissingIconPolicy) -> Result<PathBuf> {
    let retina = bundle.join(icon.file_name("@2x"));
    if retina.try_exists()? {
        return Ok(retina);
    }

    // @2x 不存在時改用原始尺寸
    let plain = bundle.join(icon.file_name(""));
    if plain.try_exists()? {
        return Ok(plain);
    }

    match policy {
        MissingIconPolicy::ReturnFallback => {
            tracing::warn!("Neither {} nor {} exists", retina.display(), plain.display());
            Ok(plain)
        }
        MissingIconPolicy::Error => Err(IconError::IconNotFound {
            name: icon.to_string(),
            searched: 2,
        }),
    }
}

pub struct IosPipeline<U: Unpacker> {
    unpacker: U,
    bundle_name: Option<String>,
    missing_policy: MissingIconPolicy,
}

impl<U: Unpacker> IosPipeline<U> {
    pub fn new(unpacker: U) -> Self {
        Self {
            unpacker,
            bundle_name: None,
            missing_policy: MissingIconPolicy::default(),
        }
    }

    pub fn with_bundle_name(mut self, bundle_name: Option<String>) -> Self {
        self.bundle_name = bundle_name;
        self
    }

    pub fn with_missing_icon_policy(mut self, policy: MissingIconPolicy) -> Self {
        self.missing_policy = policy;
        self
    }

    /// Info.plist of the named bundle when it exists, otherwise of the first bundle in the payload.
    fn info_plist(&self, payload: &Path) -> Result<PathBuf> {
        let name = self.bundle_name.as_deref().map(|n| n.strip_suffix(".app").unwrap_or(n));
        // an invalid name is reported by locate_bundle during resolve
        if let Some(name) = name.filter(|n| validate_bare_name("bundle_name", n).is_ok()) {
            let named = payload.join(format!("{}.app", name)).join("Info.plist");
            if named.is_file() {
                return Ok(named);
            }
        }

        paths_by_pattern(payload, "*.app/Info.plist")?
            .into_iter()
            .next()
            .ok_or_else(|| IconError::BundleNotFound {
                payload: payload.to_path_buf(),
            })
    }
}

impl<U: Unpacker> IconPipeline for IosPipeline<U> {
    fn platform(&self) -> Platform {
        Platform::Ios
    }

    fn unpack(&self, package: &PackageDescriptor, workdir: &Path) -> Result<PathBuf> {
        self.unpacker.unpack(&package.path, workdir)
    }

    fn lookup(&self, root: &Path) -> Result<Option<IconDeclaration>> {
        let payload = root.join("Payload");
        let plist = PlistData::from_file(self.info_plist(&payload)?)?;

        let icons = find_icons(&plist)?;
        tracing::debug!("Declared icon files: {:?}", icons);

        // 只使用第一個候選名稱
        match icons.into_iter().next() {
            Some(first) => Ok(Some(IconDeclaration {
                icon: LogicalIconRef::new(first)?,
                search_root: payload,
            })),
            None => Ok(None),
        }
    }

    fn resolve(&self, declaration: &IconDeclaration) -> Result<PathBuf> {
        let bundle = locate_bundle(&declaration.search_root, self.bundle_name.as_deref())?;
        find_icon(&bundle, &declaration.icon, self.missing_policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_icons_with_icon() {
        let data = PlistData::from_content(EMBED_PLIST_CONTENT).unwrap();
        assert_eq!(find_icons(&data).unwrap(), vec!["AppIcon60x60".to_string()]);
    }

    #[test]
    fn test_find_icons_without_icon() {
        let data = PlistData::from_content(EMBED_PLIST_CONTENT_WITHOUT_ICON).unwrap();
        let err = find_icons(&data).unwrap_err();
        assert!(matches!(err, IconError::DeclarationNotFound { .. }));
        assert_eq!(err.to_string(), "CFBundleIcons not found");
    }

    #[test]
    fn test_find_icons_distinguishes_missing_stages() {
        let no_primary = plist_with("<key>CFBundleIcons</key><dict/>");
        assert_eq!(
            find_icons(&no_primary).unwrap_err().to_string(),
            "CFBundlePrimaryIcon not found"
        );

        let no_files = plist_with(
            "<key>CFBundleIcons</key><dict><key>CFBundlePrimaryIcon</key><dict/></dict>",
        );
        assert_eq!(
            find_icons(&no_files).unwrap_err().to_string(),
            "CFBundleIconFiles not found"
        );
    }

    #[test]
    fn test_find_icons_empty_list() {
        let data = plist_with(
            "<key>CFBundleIcons</key><dict><key>CFBundlePrimaryIcon</key><dict>\
             <key>CFBundleIconFiles</key><array/></dict></dict>",
        );
        assert!(find_icons(&data).unwrap().is_empty());
    }

    #[test]
    fn test_locate_bundle_by_name_and_by_search_agree() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("Runner.app")).unwrap();

        let searched = locate_bundle(temp.path(), None).unwrap();
        assert_eq!(searched, locate_bundle(temp.path(), Some("Runner")).unwrap());
        assert_eq!(searched, locate_bundle(temp.path(), Some("Runner.app")).unwrap());
    }

    #[test]
    fn test_locate_bundle_missing() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("NotADir.app"), b"").unwrap();

        assert!(matches!(
            locate_bundle(temp.path(), None),
            Err(IconError::BundleNotFound { .. })
        ));
        assert!(matches!(
            locate_bundle(temp.path(), Some("Runner")),
            Err(IconError::BundleNotFound { .. })
        ));
    }

    #[test]
    fn test_find_icon_missing_policy() {
        let temp = TempDir::new().unwrap();
        let icon = LogicalIconRef::new("AppIcon60x60").unwrap();

        let fallback = find_icon(temp.path(), &icon, MissingIconPolicy::ReturnFallback).unwrap();
        assert_eq!(fallback, temp.path().join("AppIcon60x60.png"));

        assert!(matches!(
            find_icon(temp.path(), &icon, MissingIconPolicy::Error),
            Err(IconError::IconNotFound { .. })
        ));
    }

    fn plist_with(body: &str) -> PlistData {
        PlistData::from_content(&format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0"><dict>{}</dict></plist>"#,
            body
        ))
        .unwrap()
    }

    const EMBED_PLIST_CONTENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>BuildMachineOSBuild</key>
	<string>18A391</string>
	<key>CFBundleDevelopmentRegion</key>
	<string>en</string>
	<key>CFBundleExecutable</key>
	<string>XcodeArchiveTest</string>
	<key>CFBundleIcons</key>
	<dict>
		<key>CFBundlePrimaryIcon</key>
		<dict>
			<key>CFBundleIconFiles</key>
			<array>
				<string>AppIcon60x60</string>
			</array>
			<key>CFBundleIconName</key>
			<string>AppIcon</string>
		</dict>
	</dict>
	<key>CFBundleIdentifier</key>
	<string>com.birmachera.bitfall.XcodeArchiveTest</string>
	<key>CFBundleInfoDictionaryVersion</key>
	<string>6.0</string>
	<key>CFBundleName</key>
	<string>XcodeArchiveTest</string>
	<key>CFBundlePackageType</key>
	<string>APPL</string>
	<key>CFBundleShortVersionString</key>
	<string>1.0</string>
	<key>CFBundleSupportedPlatforms</key>
	<array>
		<string>iPhoneOS</string>
	</array>
	<key>CFBundleVersion</key>
	<string>1</string>
	<key>DTPlatformName</key>
	<string>iphoneos</string>
	<key>LSRequiresIPhoneOS</key>
	<true/>
	<key>MinimumOSVersion</key>
	<string>11.2</string>
	<key>UIDeviceFamily</key>
	<array>
		<integer>1</integer>
		<integer>2</integer>
	</array>
	<key>UILaunchStoryboardName</key>
	<string>LaunchScreen</string>
</dict>
</plist>"#;

    const EMBED_PLIST_CONTENT_WITHOUT_ICON: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>BuildMachineOSBuild</key>
	<string>18A391</string>
	<key>CFBundleDevelopmentRegion</key>
	<string>en</string>
	<key>CFBundleExecutable</key>
	<string>XcodeArchiveTest</string>
	<key>CFBundleIdentifier</key>
	<string>com.birmachera.bitfall.XcodeArchiveTest</string>
	<key>CFBundleInfoDictionaryVersion</key>
	<string>6.0</string>
	<key>CFBundleName</key>
	<string>XcodeArchiveTest</string>
	<key>CFBundlePackageType</key>
	<string>APPL</string>
	<key>CFBundleShortVersionString</key>
	<string>1.0</string>
	<key>CFBundleSupportedPlatforms</key>
	<array>
		<string>iPhoneOS</string>
	</array>
	<key>CFBundleVersion</key>
	<string>1</string>
	<key>DTPlatformName</key>
	<string>iphoneos</string>
	<key>LSRequiresIPhoneOS</key>
	<true/>
	<key>MinimumOSVersion</key>
	<string>11.2</string>
	<key>UIDeviceFamily</key>
	<array>
		<integer>1</integer>
		<integer>2</integer>
	</array>
	<key>UILaunchStoryboardName</key>
	<string>LaunchScreen</string>
</dict>
</plist>"#;
}
