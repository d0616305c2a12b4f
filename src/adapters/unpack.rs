use crate::domain::ports::Unpacker;
use crate::utils::error::{IconError, Result};
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

static EMBEDDED_INFO_PLIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Payload/[^/]+\.app/Info\.plist$").expect("Info.plist entry regex"));

/// Decodes an `.apk` by shelling out to apktool.
#[derive(Debug, Clone)]
pub struct ApktoolUnpacker {
    program: String,
}

impl ApktoolUnpacker {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for ApktoolUnpacker {
    fn default() -> Self {
        Self::new("apktool")
    }
}

impl Unpacker for ApktoolUnpacker {
    fn unpack(&self, package: &Path, workdir: &Path) -> Result<PathBuf> {
        let stem = package
            .file_stem()
            .ok_or_else(|| IconError::UnsupportedPackage {
                path: package.to_path_buf(),
                reason: "package path has no file name".to_string(),
            })?;
        let output_dir = workdir.join(stem);
        // apktool runs inside workdir, so a relative package path must be resolved first
        let package = std::path::absolute(package)?;

        tracing::debug!("Running {} d {} -o {}", self.program, package.display(), output_dir.display());
        let output = Command::new(&self.program)
            .arg("d")
            .arg("-f")
            .arg(&package)
            .arg("-o")
            .arg(&output_dir)
            .current_dir(workdir)
            .output()
            .map_err(|e| IconError::UnpackFailed {
                tool: self.program.clone(),
                message: format!("failed to start: {}", e),
            })?;

        tracing::debug!("{} stdout: {}", self.program, String::from_utf8_lossy(&output.stdout).trim());

        if !output.status.success() {
            return Err(IconError::UnpackFailed {
                tool: self.program.clone(),
                message: format!(
                    "exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        Ok(output_dir)
    }
}

/// Extracts a zip archive (`.ipa`) into the work directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveUnpacker;

impl Unpacker for ArchiveUnpacker {
    fn unpack(&self, package: &Path, workdir: &Path) -> Result<PathBuf> {
        let file = File::open(package).map_err(|e| unzip_error(package, e.to_string()))?;
        let mut archive = zip::ZipArchive::new(file).map_err(|e| unzip_error(package, e.to_string()))?;

        tracing::debug!("Extracting {} entries into {}", archive.len(), workdir.display());
        archive
            .extract(workdir)
            .map_err(|e| unzip_error(package, e.to_string()))?;

        Ok(workdir.to_path_buf())
    }
}

fn unzip_error(package: &Path, message: String) -> IconError {
    IconError::UnpackFailed {
        tool: "unzip".to_string(),
        message: format!("{}: {}", package.display(), message),
    }
}

/// Uses the package path itself as an already unpacked tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreparedTree;

impl Unpacker for PreparedTree {
    fn unpack(&self, package: &Path, _workdir: &Path) -> Result<PathBuf> {
        if !package.is_dir() {
            return Err(IconError::UnpackFailed {
                tool: "prepared".to_string(),
                message: format!("{} is not a directory", package.display()),
            });
        }
        Ok(std::path::absolute(package)?)
    }
}

/// Reads `Payload/<App>.app/Info.plist` straight from an `.ipa` without extracting it.
pub fn read_embedded_info_plist(archive_path: &Path) -> Result<Vec<u8>> {
    let file = File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    let entry_name = archive
        .file_names()
        .find(|name| EMBEDDED_INFO_PLIST.is_match(name))
        .map(str::to_string)
        .ok_or_else(|| IconError::BundleNotFound {
            payload: archive_path.join("Payload"),
        })?;

    let mut entry = archive.by_name(&entry_name)?;
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes)?;
    Ok(bytes)
}
