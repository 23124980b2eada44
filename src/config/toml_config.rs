use crate::config::{DEFAULT_STORAGE_PATH, MAX_TIMEOUT_SECS};
use crate::core::persist::DEFAULT_STORAGE_KEY;
use crate::core::ConfigProvider;
use crate::utils::error::{CartError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url, Validate,
};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: String,
    #[serde(default = "default_storage_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            key: default_storage_key(),
        }
    }
}

fn default_storage_path() -> String {
    DEFAULT_STORAGE_PATH.to_string()
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<String>,
}

impl TomlConfig {
    /// Loads a config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CartError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses config text, expanding `${VAR}` from the environment first.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CartError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    // Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        static ENV_VAR: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();
        let re = ENV_VAR
            .get_or_init(|| Regex::new(r"\$\{([^}]+)\}"))
            .as_ref()
            .map_err(|e| CartError::ConfigError {
                message: format!("Invalid substitution pattern: {}", e),
            })?;

        let result = re.replace_all(content, |caps: &Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("api.base_url", &self.api.base_url)?;
        if let Some(secs) = self.api.timeout_seconds {
            validate_range("api.timeout_seconds", secs, 1, MAX_TIMEOUT_SECS)?;
        }

        validate_path("storage.path", &self.storage.path)?;
        validate_non_empty_string("storage.key", &self.storage.key)?;

        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            let valid_formats = ["compact", "json"];
            if !valid_formats.contains(&format) {
                return Err(CartError::InvalidConfigValueError {
                    field: "logging.format".to_string(),
                    value: format.to_string(),
                    reason: format!(
                        "Unsupported format. Valid formats: {}",
                        valid_formats.join(", ")
                    ),
                });
            }
        }

        Ok(())
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn json_logging(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .is_some_and(|format| format == "json")
    }
}

impl ConfigProvider for TomlConfig {
    fn api_base_url(&self) -> &str {
        &self.api.base_url
    }

    fn storage_path(&self) -> &str {
        &self.storage.path
    }

    fn storage_key(&self) -> &str {
        &self.storage.key
    }

    fn request_timeout_secs(&self) -> Option<u64> {
        self.api.timeout_seconds
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
