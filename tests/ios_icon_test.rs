use anyhow::Result;
use pkg_icon::domain::model::MissingIconPolicy;
use pkg_icon::{fetch_ios_icon, ArchiveUnpacker, IconError, IconFetcher, IosPipeline, PackageDescriptor, Platform};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::{SimpleFileOptions, ZipWriter};

fn info_plist(icon_files: Option<&[&str]>) -> String {
    let icons = match icon_files {
        Some(files) => format!(
            r#"<key>CFBundleIcons</key>
	<dict>
		<key>CFBundlePrimaryIcon</key>
		<dict>
			<key>CFBundleIconFiles</key>
			<array>{}</array>
			<key>CFBundleIconName</key>
			<string>AppIcon</string>
		</dict>
	</dict>"#,
            files
                .iter()
                .map(|f| format!("<string>{}</string>", f))
                .collect::<String>()
        ),
        None => String::new(),
    };

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>CFBundleExecutable</key>
	<string>XcodeArchiveTest</string>
	{}
	<key>CFBundleIdentifier</key>
	<string>com.birmachera.bitfall.XcodeArchiveTest</string>
</dict>
</plist>"#,
        icons
    )
}

/// Writes `<dir>/XcodeArchiveTest.ipa` with `Payload/XcodeArchiveTest.app/{Info.plist, files...}`.
fn write_ipa(dir: &Path, plist: &str, files: &[&str]) -> Result<PathBuf> {
    let path = dir.join("XcodeArchiveTest.ipa");
    let mut zip = ZipWriter::new(File::create(&path)?);
    zip.start_file("Payload/XcodeArchiveTest.app/Info.plist", SimpleFileOptions::default())?;
    zip.write_all(plist.as_bytes())?;

    for file in files {
        zip.start_file(
            format!("Payload/XcodeArchiveTest.app/{}", file),
            SimpleFileOptions::default(),
        )?;
        zip.write_all(b"\x89PNG")?;
    }

    zip.finish()?;
    Ok(path)
}

fn bundle(workdir: &Path) -> PathBuf {
    workdir.join("Payload/XcodeArchiveTest.app")
}

#[test]
fn test_retina_icon_is_preferred() -> Result<()> {
    let temp = TempDir::new()?;
    let ipa = write_ipa(
        temp.path(),
        &info_plist(Some(&["AppIcon60x60"])),
        &["AppIcon60x60@2x.png", "AppIcon60x60.png"],
    )?;
    let workdir = temp.path().join("work");

    let icon = fetch_ios_icon(&ipa, None, &workdir)?;
    assert_eq!(icon, Some(bundle(&workdir).join("AppIcon60x60@2x.png")));
    Ok(())
}

#[test]
fn test_falls_back_to_plain_icon() -> Result<()> {
    let temp = TempDir::new()?;
    let ipa = write_ipa(temp.path(), &info_plist(Some(&["AppIcon60x60"])), &["AppIcon60x60.png"])?;
    let workdir = temp.path().join("work");

    let icon = fetch_ios_icon(&ipa, None, &workdir)?;
    assert_eq!(icon, Some(bundle(&workdir).join("AppIcon60x60.png")));
    Ok(())
}

#[test]
fn test_only_first_candidate_is_used() -> Result<()> {
    let temp = TempDir::new()?;
    let ipa = write_ipa(
        temp.path(),
        &info_plist(Some(&["AppIcon60x60", "AppIcon76x76"])),
        &["AppIcon76x76@2x.png"],
    )?;
    let workdir = temp.path().join("work");

    // first candidate has no file: the unverified plain path comes back
    let icon = fetch_ios_icon(&ipa, None, &workdir)?;
    assert_eq!(icon, Some(bundle(&workdir).join("AppIcon60x60.png")));
    Ok(())
}

#[test]
fn test_missing_file_policy_error() -> Result<()> {
    let temp = TempDir::new()?;
    let ipa = write_ipa(temp.path(), &info_plist(Some(&["AppIcon60x60"])), &[])?;

    let pipeline = IosPipeline::new(ArchiveUnpacker).with_missing_icon_policy(MissingIconPolicy::Error);
    let result = IconFetcher::new(pipeline).fetch(
        &PackageDescriptor::new(&ipa, Platform::Ios),
        &temp.path().join("work"),
    );

    assert!(matches!(result, Err(IconError::IconNotFound { .. })));
    Ok(())
}

#[test]
fn test_empty_icon_files_is_success_without_icon() -> Result<()> {
    let temp = TempDir::new()?;
    let ipa = write_ipa(temp.path(), &info_plist(Some(&[])), &[])?;

    let icon = fetch_ios_icon(&ipa, None, &temp.path().join("work"))?;
    assert_eq!(icon, None);
    Ok(())
}

#[test]
fn test_missing_bundle_icons_is_declaration_not_found() -> Result<()> {
    let temp = TempDir::new()?;
    let ipa = write_ipa(temp.path(), &info_plist(None), &["AppIcon60x60@2x.png"])?;

    let err = fetch_ios_icon(&ipa, None, &temp.path().join("work")).unwrap_err();
    assert!(matches!(err, IconError::DeclarationNotFound { .. }));
    assert_eq!(err.to_string(), "CFBundleIcons not found");
    Ok(())
}

#[test]
fn test_given_bundle_name_matches_discovery() -> Result<()> {
    let temp = TempDir::new()?;
    let ipa = write_ipa(temp.path(), &info_plist(Some(&["AppIcon60x60"])), &["AppIcon60x60@2x.png"])?;

    let discovered = fetch_ios_icon(&ipa, None, &temp.path().join("a"))?.unwrap();
    let named = fetch_ios_icon(&ipa, Some("XcodeArchiveTest"), &temp.path().join("b"))?.unwrap();

    assert_eq!(discovered.file_name(), named.file_name());
    assert_eq!(
        discovered.strip_prefix(temp.path().join("a"))?,
        named.strip_prefix(temp.path().join("b"))?
    );
    Ok(())
}

#[test]
fn test_wrong_bundle_name_is_bundle_not_found() -> Result<()> {
    let temp = TempDir::new()?;
    let ipa = write_ipa(temp.path(), &info_plist(Some(&["AppIcon60x60"])), &["AppIcon60x60@2x.png"])?;

    let err = fetch_ios_icon(&ipa, Some("Runner"), &temp.path().join("work")).unwrap_err();
    assert!(matches!(err, IconError::BundleNotFound { .. }));
    Ok(())
}

#[test]
fn test_archive_without_payload_is_bundle_not_found() -> Result<()> {
    let temp = TempDir::new()?;
    let ipa = temp.path().join("Empty.ipa");
    let mut zip = ZipWriter::new(File::create(&ipa)?);
    zip.start_file("README.txt", SimpleFileOptions::default())?;
    zip.write_all(b"nothing here")?;
    zip.finish()?;

    let err = fetch_ios_icon(&ipa, None, &temp.path().join("work")).unwrap_err();
    assert!(matches!(err, IconError::BundleNotFound { .. }));
    Ok(())
}

#[test]
fn test_corrupt_archive_is_unpack_failure() -> Result<()> {
    let temp = TempDir::new()?;
    let ipa = temp.path().join("Broken.ipa");
    std::fs::write(&ipa, b"PK\x03\x04 truncated")?;

    let err = fetch_ios_icon(&ipa, None, &temp.path().join("work")).unwrap_err();
    assert!(matches!(err, IconError::UnpackFailed { .. }));
    Ok(())
}

#[test]
fn test_empty_icon_files_ignores_unmatched_bundle_name() -> Result<()> {
    let temp = TempDir::new()?;
    let ipa = write_ipa(temp.path(), &info_plist(Some(&[])), &[])?;

    let icon = fetch_ios_icon(&ipa, Some("Runner"), &temp.path().join("work"))?;
    assert_eq!(icon, None);
    Ok(())
}

#[test]
fn test_declaration_error_precedes_bundle_name_mismatch() -> Result<()> {
    let temp = TempDir::new()?;
    let ipa = write_ipa(temp.path(), &info_plist(None), &[])?;

    let err = fetch_ios_icon(&ipa, Some("Runner"), &temp.path().join("work")).unwrap_err();
    assert_eq!(err.to_string(), "CFBundleIcons not found");
    Ok(())
}
