use crate::config::toml_config::TomlConfig;
use crate::domain::model::{IconPrefixPolicy, MissingIconPolicy, PackageDescriptor, Platform, ResolverOptions};
use crate::utils::error::{IconError, Result};
use crate::utils::validation::{validate_bare_name, validate_file_extension, validate_path, Validate};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Parser)]
#[command(name = "pkg-icon")]
#[command(about = "Extract the application icon from an .apk or .ipa")]
pub struct CliConfig {
    /// Path to the .apk / .ipa (or an unpacked directory with --unpacked)
    pub package: PathBuf,

    /// Override platform detection from the file extension
    #[arg(long, value_enum)]
    pub platform: Option<Platform>,

    /// Name of the .app bundle inside Payload/ (iOS); searched when omitted
    #[arg(long)]
    pub bundle_name: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory to unpack into; a kept temporary directory when omitted
    #[arg(long)]
    pub workdir: Option<PathBuf>,

    /// Copy the resolved icon to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Treat PACKAGE as an already unpacked tree
    #[arg(long)]
    pub unpacked: bool,

    /// Only look up the icon declaration, do not resolve the file
    #[arg(long)]
    pub dry_run: bool,

    /// Require android:icon to be of the form @mipmap/<name>
    #[arg(long)]
    pub strict_prefix: bool,

    /// Fail when neither <icon>@2x.png nor <icon>.png exists (iOS)
    #[arg(long)]
    pub fail_on_missing: bool,

    /// apktool executable
    #[arg(long)]
    pub apktool: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn package_descriptor(&self) -> Result<PackageDescriptor> {
        match self.platform {
            Some(platform) => Ok(PackageDescriptor::new(&self.package, platform)),
            None => PackageDescriptor::detect(&self.package),
        }
    }

    /// 合併設定檔與命令列參數，命令列優先
    pub fn resolver_options(&self) -> Result<ResolverOptions> {
        let mut options = match &self.config {
            Some(path) => {
                let file_config = TomlConfig::from_file(path)?;
                file_config.validate()?;
                file_config.to_options()
            }
            None => ResolverOptions::default(),
        };

        if let Some(apktool) = &self.apktool {
            options.apktool = apktool.clone();
        }
        if let Some(bundle_name) = &self.bundle_name {
            options.bundle_name = Some(bundle_name.clone());
        }
        if self.strict_prefix {
            options.icon_prefix_policy = IconPrefixPolicy::Strict;
        }
        if self.fail_on_missing {
            options.missing_icon_policy = MissingIconPolicy::Error;
        }

        Ok(options)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("package", &self.package.to_string_lossy())?;

        if self.unpacked {
            if self.platform.is_none() {
                return Err(IconError::MissingConfigError {
                    field: "platform (required with --unpacked)".to_string(),
                });
            }
            if !self.package.is_dir() {
                return Err(IconError::InvalidConfigValueError {
                    field: "package".to_string(),
                    value: self.package.display().to_string(),
                    reason: "--unpacked expects a directory".to_string(),
                });
            }
        } else if self.platform.is_none() {
            validate_file_extension("package", &self.package, &["apk", "ipa"])?;
        }

        if let Some(bundle_name) = &self.bundle_name {
            validate_bare_name("bundle_name", bundle_name)?;
        }
        if let Some(workdir) = &self.workdir {
            validate_path("workdir", &workdir.to_string_lossy())?;
        }
        if self.dry_run && self.output.is_some() {
            return Err(IconError::InvalidConfigValueError {
                field: "output".to_string(),
                value: self.output.as_ref().map(|p| p.display().to_string()).unwrap_or_default(),
                reason: "--output cannot be combined with --dry-run".to_string(),
            });
        }
        Ok(())
    }
}
