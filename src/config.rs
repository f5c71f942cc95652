//! Configuration handling for the questionnaire TUI

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Default backend address
pub const DEFAULT_API_ADDRESS: &str = "http://127.0.0.1:4000";
/// Environment override for the backend address
pub const API_ADDRESS_ENV: &str = "INTAKE_API_ADDRESS";
/// Environment override for the bearer token
pub const API_TOKEN_ENV: &str = "INTAKE_API_TOKEN";

const DEFAULT_COMPLETION_DELAY_MS: u64 = 2000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TuiConfig {
    /// Backend address
    pub api_address: Option<String>,
    /// Bearer token sent with every request
    pub api_token: Option<String>,
    /// JSON file whose strings override the built-in English text
    pub locale_file: Option<PathBuf>,
    /// How long the confirmation stays up before the session closes
    pub completion_delay_ms: Option<u64>,
    /// Per-request timeout
    pub request_timeout_secs: Option<u64>,
}

impl TuiConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "intake", "intake-tui")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: TuiConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration, writing a template file on first run
    pub fn load_or_init() -> Result<Self> {
        match Self::config_path() {
            Some(path) if !path.exists() => {
                let config = Self::default();
                config.save()?;
                Ok(config)
            }
            _ => Self::load(),
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            fs::write(&path, content)?;
        }
        Ok(())
    }

    /// Backend address: environment, then file, then default
    pub fn api_address(&self) -> String {
        resolve(
            std::env::var(API_ADDRESS_ENV).ok(),
            self.api_address.as_deref(),
        )
        .unwrap_or_else(|| DEFAULT_API_ADDRESS.to_string())
    }

    /// Bearer token: environment, then file
    pub fn api_token(&self) -> Option<String> {
        resolve(std::env::var(API_TOKEN_ENV).ok(), self.api_token.as_deref())
    }

    pub fn completion_delay(&self) -> Duration {
        Duration::from_millis(
            self.completion_delay_ms
                .unwrap_or(DEFAULT_COMPLETION_DELAY_MS),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}

/// First non-blank of an environment value and a configured value
fn resolve(env: Option<String>, configured: Option<&str>) -> Option<String> {
    env.filter(|v| !v.trim().is_empty())
        .or_else(|| configured.filter(|v| !v.trim().is_empty()).map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TuiConfig::default();
        assert!(config.api_address.is_none());
        assert!(config.api_token.is_none());
        assert!(config.locale_file.is_none());
        assert_eq!(config.completion_delay(), Duration::from_millis(2000));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_serialization() {
        let config = TuiConfig {
            api_address: Some("https://intake.example.com".to_string()),
            api_token: Some("secret".to_string()),
            locale_file: Some(PathBuf::from("/tmp/sv.json")),
            completion_delay_ms: Some(500),
            request_timeout_secs: Some(10),
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: TuiConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(
            parsed.api_address,
            Some("https://intake.example.com".to_string())
        );
        assert_eq!(parsed.api_token, Some("secret".to_string()));
        assert_eq!(parsed.locale_file, Some(PathBuf::from("/tmp/sv.json")));
        assert_eq!(parsed.completion_delay(), Duration::from_millis(500));
        assert_eq!(parsed.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_deserialize_from_empty_json() {
        let parsed: TuiConfig = serde_json::from_str("{}").unwrap();
        assert!(parsed.api_address.is_none());
        assert!(parsed.completion_delay_ms.is_none());
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        let json = r#"{"api_address": "http://localhost:4000", "theme": "dark"}"#;
        let parsed: TuiConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.api_address, Some("http://localhost:4000".to_string()));
    }

    #[test]
    fn test_environment_wins_over_file() {
        assert_eq!(
            resolve(Some("http://env:1".to_string()), Some("http://file:2")),
            Some("http://env:1".to_string())
        );
    }

    #[test]
    fn test_blank_values_are_ignored() {
        assert_eq!(
            resolve(Some("  ".to_string()), Some("http://file:2")),
            Some("http://file:2".to_string())
        );
        assert_eq!(resolve(None, Some("")), None);
        assert_eq!(resolve(None, None), None);
    }

    #[test]
    fn test_load_returns_ok() {
        // Either the user's file or the default
        assert!(TuiConfig::load().is_ok());
    }
}
