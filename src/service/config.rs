//! Configuration for the PharmaCode web service

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the AlphaGenome API key
pub const API_KEY_ENV: &str = "ALPHAGENOME_API_KEY";

/// Main service configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Prediction endpoint rate limiting
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Genomic model client configuration
    #[serde(default)]
    pub prediction: PredictionConfig,
    /// Data source configuration
    #[serde(default)]
    pub data: DataConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    pub host: String,
    /// Port to listen on (default: 8000)
    pub port: u16,
    /// Maximum request size (default: "1MB")
    pub max_request_size: String,
    /// Include underlying failure messages in 500 responses (default: true)
    pub expose_error_details: bool,
}

/// Sliding-window limit on prediction requests, shared by all clients
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Calls admitted per window (default: 5)
    pub max_calls: usize,
    /// Window length in seconds (default: 60)
    pub window_seconds: u64,
}

/// AlphaGenome client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PredictionConfig {
    /// Model API base URL
    pub api_url: String,
    /// API key; overridden by `ALPHAGENOME_API_KEY`. Mock mode when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Request timeout in seconds (default: 30)
    pub timeout_seconds: u64,
    /// Connection idle timeout in seconds (default: 30)
    pub pool_idle_timeout_seconds: Option<u64>,
    /// TCP keep-alive in seconds (default: 90)
    pub keep_alive_seconds: Option<u64>,
}

/// Data source configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DataConfig {
    /// JSON file replacing the built-in variant catalog
    pub catalog_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_request_size: "1MB".to_string(),
            expose_error_details: true,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_calls: 5,
            window_seconds: 60,
        }
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            api_url: "https://alphagenome.googleapis.com".to_string(),
            api_key: None,
            timeout_seconds: 30,
            pool_idle_timeout_seconds: Some(30),
            keep_alive_seconds: Some(90),
        }
    }
}

impl PredictionConfig {
    /// The configured API key, if present and not blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl ServiceConfig {
    /// Load configuration from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: ServiceConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file(&self, path: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Take the API key from the environment when it is set
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.prediction.api_key = Some(key);
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        crate::service::server::parse_size(&self.server.max_request_size)
            .map_err(|e| format!("Invalid max_request_size: {}", e))?;

        if self.rate_limit.max_calls == 0 {
            return Err("rate_limit.max_calls must be greater than 0".to_string());
        }
        if self.rate_limit.window_seconds == 0 {
            return Err("rate_limit.window_seconds must be greater than 0".to_string());
        }

        if self.prediction.timeout_seconds == 0 {
            return Err("prediction.timeout_seconds must be greater than 0".to_string());
        }

        #[cfg(feature = "alphagenome")]
        {
            if let Err(e) = url::Url::parse(&self.prediction.api_url) {
                return Err(format!(
                    "Invalid prediction.api_url '{}': {}",
                    self.prediction.api_url, e
                ));
            }
        }

        if let Some(path) = &self.data.catalog_path {
            if !path.exists() {
                return Err(format!("Catalog file does not exist: {}", path.display()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.rate_limit.max_calls, 5);
        assert_eq!(config.rate_limit.window_seconds, 60);
        assert!(config.prediction.api_key().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_api_key_is_unset() {
        let mut config = PredictionConfig::default();
        config.api_key = Some("   ".to_string());
        assert!(config.api_key().is_none());

        config.api_key = Some(" secret ".to_string());
        assert_eq!(config.api_key(), Some("secret"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [rate_limit]
            max_calls = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.rate_limit.max_calls, 10);
        assert_eq!(config.rate_limit.window_seconds, 60);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ServiceConfig::default();
        config.rate_limit.max_calls = 0;
        assert!(config.validate().is_err());

        let mut config = ServiceConfig::default();
        config.server.max_request_size = "lots".to_string();
        assert!(config.validate().is_err());

        let mut config = ServiceConfig::default();
        config.data.catalog_path = Some(PathBuf::from("/nonexistent/catalog.json"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_round_trip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("service.toml");

        let mut config = ServiceConfig::default();
        config.server.port = 9100;
        config.to_file(&path).unwrap();

        let loaded = ServiceConfig::from_file(&path).unwrap();
        assert_eq!(loaded.server.port, 9100);
        assert_eq!(loaded.prediction.timeout_seconds, 30);
    }
}
