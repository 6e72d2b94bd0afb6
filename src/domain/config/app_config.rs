//! Application configuration value object

use serde::{Deserialize, Serialize};

/// Default model for timestamp queries
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default listen address
const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listen port
const DEFAULT_PORT: u16 = 8000;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            api_key: None,
            model: Some(DEFAULT_MODEL.to_string()),
            host: Some(DEFAULT_HOST.to_string()),
            port: Some(DEFAULT_PORT),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            model: other.model.or(self.model),
            host: other.host.or(self.host),
            port: other.port.or(self.port),
        }
    }

    /// Get the model, or the default if not set
    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    /// Get the listen address, or the default if not set
    pub fn host_or_default(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Get the listen port, or the default if not set
    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}
