use crate::domain::model::{IconPrefixPolicy, MissingIconPolicy, ResolverOptions};
use crate::utils::error::{IconError, Result};
use crate::utils::validation::{validate_bare_name, validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub android: Option<AndroidConfig>,
    pub ios: Option<IosConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AndroidConfig {
    pub apktool: Option<String>,
    pub icon_prefix_policy: Option<IconPrefixPolicy>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IosConfig {
    pub bundle_name: Option<String>,
    pub missing_icon_policy: Option<MissingIconPolicy>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(IconError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| IconError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${APKTOOL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| IconError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn to_options(&self) -> ResolverOptions {
        let mut options = ResolverOptions::default();

        if let Some(android) = &self.android {
            if let Some(apktool) = &android.apktool {
                options.apktool = apktool.clone();
            }
            if let Some(policy) = android.icon_prefix_policy {
                options.icon_prefix_policy = policy;
            }
        }

        if let Some(ios) = &self.ios {
            options.bundle_name = ios.bundle_name.clone();
            if let Some(policy) = ios.missing_icon_policy {
                options.missing_icon_policy = policy;
            }
        }

        options
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(apktool) = self.android.as_ref().and_then(|a| a.apktool.as_deref()) {
            validate_non_empty_string("android.apktool", apktool)?;
        }
        if let Some(bundle_name) = self.ios.as_ref().and_then(|i| i.bundle_name.as_deref()) {
            validate_bare_name("ios.bundle_name", bundle_name)?;
        }
        Ok(())
    }
}
