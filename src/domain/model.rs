use crate::utils::error::{IconError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
}

impl Platform {
    /// 依副檔名判斷平台 (apk / ipa，不分大小寫)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "apk" => Some(Platform::Android),
            "ipa" => Some(Platform::Ios),
            _ => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Android => write!(f, "android"),
            Platform::Ios => write!(f, "ios"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageDescriptor {
    pub path: PathBuf,
    pub platform: Platform,
}

impl PackageDescriptor {
    pub fn new(path: impl Into<PathBuf>, platform: Platform) -> Self {
        Self {
            path: path.into(),
            platform,
        }
    }

    /// Infers the platform from the file extension.
    pub fn detect(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        match Platform::from_path(&path) {
            Some(platform) => Ok(Self { path, platform }),
            None => Err(IconError::UnsupportedPackage {
                reason: "expected an .apk or .ipa file".to_string(),
                path,
            }),
        }
    }
}

/// A bare icon name as declared by the package, without directory or extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LogicalIconRef(String);

impl LogicalIconRef {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(IconError::InvalidIconReference {
                value,
                reason: "icon name is empty".to_string(),
            });
        }
        if value.contains('/') || value.contains('\\') {
            return Err(IconError::InvalidIconReference {
                value,
                reason: "icon name must not contain a path separator".to_string(),
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn file_name(&self, suffix: &str) -> String {
        format!("{}{}.png", self.0, suffix)
    }
}

impl fmt::Display for LogicalIconRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A density-qualified Android resource directory pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceBucket(&'static str);

impl ResourceBucket {
    pub const fn new(pattern: &'static str) -> Self {
        Self(pattern)
    }

    pub fn pattern(&self) -> &'static str {
        self.0
    }
}

/// Highest density first. `mipmap-anydpi*` may match several directories.
pub const ANDROID_DENSITY_BUCKETS: [ResourceBucket; 7] = [
    ResourceBucket::new("mipmap-anydpi*"),
    ResourceBucket::new("mipmap-xxxhdpi"),
    ResourceBucket::new("mipmap-xxhdpi"),
    ResourceBucket::new("mipmap-xhdpi"),
    ResourceBucket::new("mipmap-hdpi"),
    ResourceBucket::new("mipmap-mdpi"),
    ResourceBucket::new("mipmap-ldpi"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconDeclaration {
    pub icon: LogicalIconRef,
    /// `res/` for Android, `Payload/` for iOS (the bundle is picked during resolve).
    pub search_root: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct FetchOutcome {
    pub package: PackageDescriptor,
    pub declared: Option<LogicalIconRef>,
    pub icon: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconPrefixPolicy {
    /// Strip `@mipmap/` when present, otherwise take the attribute value as-is.
    #[default]
    Lenient,
    /// Require the `@mipmap/<name>` form.
    Strict,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingIconPolicy {
    /// Return the plain `<name>.png` path even if it does not exist.
    #[default]
    ReturnFallback,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    pub icon_prefix_policy: IconPrefixPolicy,
    pub missing_icon_policy: MissingIconPolicy,
    pub apktool: String,
    pub bundle_name: Option<String>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            icon_prefix_policy: IconPrefixPolicy::default(),
            missing_icon_policy: MissingIconPolicy::default(),
            apktool: "apktool".to_string(),
            bundle_name: None,
        }
    }
}
