//! Configuration management for CarsXE integrations
//!
//! Loads configuration with priority:
//! 1. carsxe.toml (or specified config file)
//! 2. Environment variables (fallback)
//! 3. Defaults

use crate::auth::{ApiKey, AuthConfig};
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "carsxe.toml";
pub const API_KEY_ENV: &str = "CARSXE_API_KEY";
pub const DEFAULT_BASE_URL: &str = "https://api.carsxe.com";
pub const DEFAULT_SOURCE: &str = "n8n";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CarsxeConfig {
    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub dispatch: DispatchConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Upstream API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Source tag sent with every request to identify the calling integration
    #[serde(default = "default_source")]
    pub source: String,

    /// Request timeout enforced by the HTTP transport; none when unset
    pub timeout_secs: Option<u64>,
}

/// Which of the two catalog layouts to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogProfile {
    /// Operations grouped by resource; plate country defaults to US, images use `upload_url`.
    #[default]
    Grouped,
    /// Flat operation list; plate country required, images use `image_url`.
    Flat,
}

impl std::str::FromStr for CatalogProfile {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "grouped" => Ok(CatalogProfile::Grouped),
            "flat" => Ok(CatalogProfile::Flat),
            other => Err(format!("unknown catalog profile '{}'", other)),
        }
    }
}

/// Dispatch policy configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Record failures and keep going instead of aborting on the first one
    #[serde(default)]
    pub continue_on_fail: bool,

    #[serde(default)]
    pub variant: CatalogProfile,
}

/// Observability configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    pub service_name: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            source: default_source(),
            timeout_secs: None,
        }
    }
}

impl CarsxeConfig {
    /// Load configuration from carsxe.toml in the current or a parent
    /// directory, or from the environment alone when no file exists.
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::debug!("No {} found, using environment", CONFIG_FILE_NAME);
                let mut config = Self::default();
                config.resolve_env_vars();
                Ok(config)
            }
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        tracing::debug!("Loading configuration from: {:?}", path);

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Parse configuration from TOML text and resolve env references.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let mut config: CarsxeConfig = toml::from_str(contents)?;
        config.resolve_env_vars();
        config.validate()?;
        Ok(config)
    }

    fn find_config_file() -> Option<PathBuf> {
        let mut current = env::current_dir().ok()?;

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Resolve ${VAR_NAME} references to environment variables
    fn resolve_env_vars(&mut self) {
        if let Some(key) = self.auth.api_key.take() {
            self.auth.api_key = Self::resolve_env_var(&key).filter(|k| !k.is_empty());
        }
        if self.auth.api_key.is_none() {
            self.auth.api_key = env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        }

        if let Some(resolved) = Self::resolve_env_var(&self.api.base_url) {
            self.api.base_url = resolved;
        }
    }

    /// Resolve a single ${VAR_NAME} reference
    fn resolve_env_var(value: &str) -> Option<String> {
        if value.starts_with("${") && value.ends_with('}') {
            let var_name = &value[2..value.len() - 1];
            env::var(var_name).ok()
        } else {
            Some(value.to_string())
        }
    }

    fn validate(&self) -> Result<()> {
        url_like(&self.api.base_url)
            .then_some(())
            .ok_or_else(|| anyhow!("api.base_url must start with http:// or https://"))?;
        if self.api.source.trim().is_empty() {
            return Err(anyhow!("api.source must not be empty"));
        }
        Ok(())
    }

    /// Resolved API key with a clear error message when absent.
    pub fn api_key(&self) -> crate::Result<ApiKey> {
        self.auth.credentials()
    }

    /// Create test-friendly defaults
    pub fn test_defaults() -> Self {
        Self {
            auth: AuthConfig {
                api_key: Some("test-api-key".to_string()),
            },
            api: ApiConfig::default(),
            dispatch: DispatchConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

fn url_like(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}
