//! # Gateway Configuration
//!
//! Process-wide configuration context: the callback signing secret, provider
//! asset locations, optional debug mail address, and per-provider settings.
//!
//! Built once at startup and shared read-only afterwards; the registry,
//! signer, and gateway all receive it explicitly instead of reaching for
//! global state.

use crate::error::PspError;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

/// Immutable gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Signing secret binding callback payloads to this deployment.
    /// Must never be shared with provider-side systems beyond the modules
    /// loaded into this process.
    pub encryption_key: String,

    /// Filesystem folder containing provider module assets
    #[serde(default = "default_base_path")]
    pub base_path: PathBuf,

    /// External URL of the folder containing provider module assets
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// E-mail address receiving debug notifications; absent or empty means
    /// debugging is disabled. The mail transport is the host's concern.
    #[serde(default)]
    pub debug_mail: Option<String>,

    /// Per-provider settings sections, keyed by provider name
    #[serde(default)]
    pub providers: HashMap<String, HashMap<String, String>>,
}

fn default_base_path() -> PathBuf {
    PathBuf::from("psp")
}

fn default_base_url() -> String {
    "http://localhost:8080/psp".to_string()
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Required: `PSP_ENCRYPTION_KEY`.
    /// Optional: `PSP_BASE_PATH`, `PSP_BASE_URL`, `PSP_DEBUG_MAIL`.
    pub fn from_env() -> Result<Self, PspError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let encryption_key = env::var("PSP_ENCRYPTION_KEY")
            .map_err(|_| PspError::configuration("PSP_ENCRYPTION_KEY not set"))?;

        let config = Self {
            encryption_key,
            base_path: env::var("PSP_BASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_base_path()),
            base_url: env::var("PSP_BASE_URL").unwrap_or_else(|_| default_base_url()),
            debug_mail: env::var("PSP_DEBUG_MAIL").ok(),
            providers: HashMap::new(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML document, including
    /// `[providers.<name>]` settings sections.
    pub fn from_toml_str(content: &str) -> Result<Self, PspError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| PspError::configuration(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Create config with explicit values (for testing)
    pub fn new(encryption_key: impl Into<String>) -> Self {
        Self {
            encryption_key: encryption_key.into(),
            base_path: default_base_path(),
            base_url: default_base_url(),
            debug_mail: None,
            providers: HashMap::new(),
        }
    }

    /// Builder: set the external base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder: add a settings section for a provider
    pub fn with_provider_settings(
        mut self,
        provider: impl Into<String>,
        settings: HashMap<String, String>,
    ) -> Self {
        self.providers.insert(provider.into(), settings);
        self
    }

    fn validate(&self) -> Result<(), PspError> {
        if self.encryption_key.is_empty() {
            return Err(PspError::configuration("encryption key must not be empty"));
        }
        Ok(())
    }

    /// Settings section for a provider module, if configured
    pub fn provider_settings(&self, provider: &str) -> Option<&HashMap<String, String>> {
        self.providers.get(provider)
    }

    /// Path to the folder containing a provider's assets
    pub fn provider_path(&self, provider: &str) -> PathBuf {
        self.base_path.join(provider)
    }

    /// External URL of the folder containing a provider's assets
    pub fn provider_url(&self, provider: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), provider)
    }

    /// Debug mail address; `None` when debugging is disabled
    pub fn debug_mail(&self) -> Option<&str> {
        self.debug_mail.as_deref().filter(|mail| !mail.is_empty())
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}
