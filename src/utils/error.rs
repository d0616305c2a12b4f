use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IconError {
    #[error("Unpack failed ({tool}): {message}")]
    UnpackFailed { tool: String, message: String },

    #[error("{key} not found")]
    DeclarationNotFound { key: String },

    #[error("couldn't find any *.app in the {}", .payload.display())]
    BundleNotFound { payload: PathBuf },

    #[error("could not find any .png icon named '{name}' ({searched} locations searched)")]
    IconNotFound { name: String, searched: usize },

    #[error("Invalid icon reference '{value}': {reason}")]
    InvalidIconReference { value: String, reason: String },

    #[error("Failed to parse {document}: {message}")]
    DocumentError { document: String, message: String },

    #[error("Invalid path pattern '{pattern}': {message}")]
    PatternError { pattern: String, message: String },

    #[error("Unsupported package '{}': {reason}", .path.display())]
    UnsupportedPackage { path: PathBuf, reason: String },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Unpack,
    Declaration,
    Resource,
    Config,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl IconError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            IconError::UnpackFailed { .. } | IconError::ZipError(_) => ErrorCategory::Unpack,
            IconError::DeclarationNotFound { .. }
            | IconError::InvalidIconReference { .. }
            | IconError::DocumentError { .. } => ErrorCategory::Declaration,
            IconError::BundleNotFound { .. }
            | IconError::IconNotFound { .. }
            | IconError::PatternError { .. } => ErrorCategory::Resource,
            IconError::UnsupportedPackage { .. }
            | IconError::ConfigError { .. }
            | IconError::ConfigValidationError { .. }
            | IconError::InvalidConfigValueError { .. }
            | IconError::MissingConfigError { .. } => ErrorCategory::Config,
            IconError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Declaration | ErrorCategory::Resource => ErrorSeverity::High,
            ErrorCategory::Unpack | ErrorCategory::Config => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            IconError::UnpackFailed { .. } => {
                "Check that the package is not corrupted and that apktool is installed and on PATH"
            }
            IconError::ZipError(_) => "The archive could not be read; re-download or re-export the .ipa",
            IconError::DeclarationNotFound { .. } => {
                "The manifest or Info.plist does not declare an icon at the expected location"
            }
            IconError::BundleNotFound { .. } => {
                "Pass --bundle-name if the .app bundle is not directly under Payload/"
            }
            IconError::IconNotFound { .. } => {
                "The declared icon has no .png in the searched resource directories"
            }
            IconError::InvalidIconReference { .. } => {
                "Use the lenient icon prefix policy or check the android:icon attribute"
            }
            IconError::DocumentError { .. } => "The document is malformed or in an unexpected format",
            IconError::PatternError { .. } => "The work directory path contains characters that cannot be searched",
            IconError::UnsupportedPackage { .. } => "Pass --platform android|ios explicitly",
            IconError::IoError(_) => "Check file permissions and free disk space in the work directory",
            IconError::ConfigError { .. }
            | IconError::ConfigValidationError { .. }
            | IconError::InvalidConfigValueError { .. }
            | IconError::MissingConfigError { .. } => "Review the configuration file and command-line flags",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Unpack => format!("Could not unpack the package: {}", self),
            ErrorCategory::Declaration => format!("Could not read the icon declaration: {}", self),
            ErrorCategory::Resource => format!("Could not locate the icon file: {}", self),
            ErrorCategory::Config => format!("Invalid configuration: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }

    pub(crate) fn declaration_not_found(key: &str) -> Self {
        IconError::DeclarationNotFound {
            key: key.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IconError>;
