//! API key handling.
//!
//! CarsXE authenticates every call with a single static key passed as the
//! `key` query parameter. The key is read once per run and shared read-only.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Query parameter name the upstream API expects the key under.
pub const API_KEY_PARAM: &str = "key";

/// A CarsXE API key.
///
/// `Debug` output is redacted so the key can travel through traced structs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a raw key, rejecting blank values.
    ///
    /// # Example
    /// ```
    /// use carsxe_core::ApiKey;
    /// let key = ApiKey::new("abc123").unwrap();
    /// assert_eq!(key.expose(), "abc123");
    /// assert!(ApiKey::new("  ").is_err());
    /// ```
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(Error::config_error("API key is empty"));
        }
        Ok(Self(key))
    }

    /// Raw key value, for placing on the wire.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// `[auth]` section of the configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// API key (can reference env var with ${VAR_NAME})
    pub api_key: Option<String>,
}

impl AuthConfig {
    pub fn credentials(&self) -> Result<ApiKey> {
        match self.api_key.as_deref() {
            Some(key) => ApiKey::new(key),
            None => Err(Error::config_error(
                "API key not found. Set [auth] api_key in carsxe.toml or export CARSXE_API_KEY",
            )),
        }
    }
}
