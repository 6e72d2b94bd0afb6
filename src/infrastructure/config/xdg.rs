//! XDG config store adapter

use std::path::PathBuf;

use tokio::fs;

use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// XDG-compliant config file reader.
/// The server never writes config, so this only loads.
pub struct XdgConfigStore {
    path: PathBuf,
}

impl XdgConfigStore {
    /// Create a new XDG config store with default path
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("topic-seek");

        Self {
            path: config_dir.join("config.toml"),
        }
    }

    /// Create with custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse TOML content into AppConfig
    fn parse_toml(content: &str) -> Result<AppConfig, ConfigError> {
        let config: AppConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    /// Load the config file, or an empty config if it does not exist
    pub async fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.exists() {
            return Ok(AppConfig::empty());
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        Self::parse_toml(&content)
    }

    pub fn path(&self) -> PathBuf {
        self.path.clone()
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl Default for XdgConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_is_xdg() {
        let store = XdgConfigStore::new();
        let path = store.path();
        assert!(path.to_string_lossy().contains("topic-seek"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn custom_path() {
        let store = XdgConfigStore::with_path("/custom/path/config.toml");
        assert_eq!(store.path(), PathBuf::from("/custom/path/config.toml"));
    }

    #[test]
    fn parse_toml_flat_format() {
        let content = r#"
api_key = "test-key"
model = "gemini-2.5-pro"
host = "127.0.0.1"
port = 9000
"#;

        let config = XdgConfigStore::parse_toml(content).unwrap();
        assert_eq!(config.api_key, Some("test-key".to_string()));
        assert_eq!(config.model, Some("gemini-2.5-pro".to_string()));
        assert_eq!(config.host, Some("127.0.0.1".to_string()));
        assert_eq!(config.port, Some(9000));
    }

    #[test]
    fn parse_toml_rejects_malformed_content() {
        assert!(XdgConfigStore::parse_toml("api_key = [not toml").is_err());
    }

    #[tokio::test]
    async fn load_missing_file_yields_empty_config() {
        let store = XdgConfigStore::with_path("/nonexistent/topic-seek/config.toml");
        let config = store.load().await.unwrap();
        assert!(config.api_key.is_none());
    }

    #[tokio::test]
    async fn load_reads_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_key = \"from-file\"\n").unwrap();

        let store = XdgConfigStore::with_path(&path);
        let config = store.load().await.unwrap();

        assert_eq!(config.api_key, Some("from-file".to_string()));
    }
}
