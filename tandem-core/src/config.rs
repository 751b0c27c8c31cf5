//! Configuration types for the Tandem coordination core

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a single LLM backend.
///
/// One `BackendConfig` is shared read-only across every agent created by a
/// manager instance; it is never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Model identifier (e.g. "llama3.1:8b", "gpt-4o")
    pub model: String,

    /// Base URL of an OpenAI-compatible chat completions endpoint
    pub base_url: String,

    /// API key, if the endpoint requires one (prefer env vars)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Per-request timeout
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// Sampling temperature. Zero keeps team output reproducible.
    #[serde(default)]
    pub temperature: f32,
}

fn default_timeout() -> Duration {
    Duration::from_secs(120)
}

impl BackendConfig {
    /// Create a config with default timeout and deterministic sampling.
    pub fn new(model: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            base_url: base_url.into(),
            api_key: None,
            timeout: default_timeout(),
            temperature: 0.0,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Main configuration for the Tandem core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TandemConfig {
    /// Ordered backend configurations. The first entry is used; the rest are
    /// fallback candidates kept for operator convenience.
    pub backends: Vec<BackendConfig>,

    /// Maximum dialogue turns before the coordinator gives up waiting for a
    /// termination marker
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,
}

fn default_max_turns() -> usize {
    5
}

impl Default for TandemConfig {
    fn default() -> Self {
        Self {
            backends: Vec::new(),
            max_turns: default_max_turns(),
        }
    }
}

impl TandemConfig {
    /// Create a configuration from a non-empty backend list.
    pub fn new(backends: Vec<BackendConfig>) -> crate::error::Result<Self> {
        let config = Self {
            backends,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file and environment variables.
    ///
    /// Loads in this order:
    /// 1. Configuration file (tandem.toml or path from TANDEM_CONFIG_PATH)
    /// 2. Environment variable overrides (TANDEM_ prefix)
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is missing, malformed, or has
    /// no backends.
    pub fn load() -> crate::error::Result<Self> {
        use figment::{
            Figment,
            providers::{Env, Format, Toml},
        };

        let mut figment = Figment::new()
            .merge(Toml::file("tandem.toml"))
            .merge(Env::prefixed("TANDEM_").split("_"));

        if let Ok(path) = std::env::var("TANDEM_CONFIG_PATH") {
            figment = figment.merge(Toml::file(path));
        }

        let config: TandemConfig = figment.extract().map_err(|e| {
            crate::error::TandemError::Configuration(format!("Failed to load configuration: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::error::Result<Self> {
        use figment::{
            Figment,
            providers::{Format, Toml},
        };

        let config: TandemConfig =
            Figment::new()
                .merge(Toml::file(path))
                .extract()
                .map_err(|e| {
                    crate::error::TandemError::Configuration(format!(
                        "Failed to load configuration file: {}",
                        e
                    ))
                })?;

        config.validate()?;
        Ok(config)
    }

    /// The backend the factory should use.
    pub fn primary_backend(&self) -> crate::error::Result<&BackendConfig> {
        self.backends.first().ok_or_else(|| {
            crate::error::TandemError::Configuration("No backends configured".to_string())
        })
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend list is empty or a backend entry is
    /// malformed.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.backends.is_empty() {
            return Err(crate::error::TandemError::Configuration(
                "Configuration requires at least one backend".to_string(),
            ));
        }

        for backend in &self.backends {
            if backend.model.is_empty() {
                return Err(crate::error::TandemError::Configuration(
                    "Backend model must not be empty".to_string(),
                ));
            }
            if backend.base_url.is_empty() {
                return Err(crate::error::TandemError::Configuration(
                    "Backend base_url must not be empty".to_string(),
                ));
            }
        }

        if self.max_turns == 0 {
            return Err(crate::error::TandemError::Configuration(
                "max_turns must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
