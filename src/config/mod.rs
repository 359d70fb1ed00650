//! Configuration loading and management
//!
//! Settings come from a YAML file and can be overridden by environment
//! variables:
//!
//! | Variable                    | Setting                     |
//! |-----------------------------|-----------------------------|
//! | `HOST`                      | `server.host`               |
//! | `PORT`                      | `server.port`               |
//! | `PUBLIC_URL`                | `server.public_url`         |
//! | `CURSOR_TOKEN_SECRET_KEY`   | `cursor.secret_key`         |
//! | `CURSOR_TOKEN_ALGORITHM`    | `cursor.algorithm`          |
//! | `PAGINATION_DEFAULT_LIMIT`  | `pagination.default_limit`  |
//! | `PAGINATION_MAX_LIMIT`      | `pagination.max_limit`      |

use crate::core::query::LimitPolicy;
use crate::pagination::CursorCodec;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Network settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Externally visible base URL used in pagination links,
    /// e.g. `https://api.example.com`. Defaults to `http://{host}:{port}`.
    #[serde(default)]
    pub public_url: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: None,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn base_url(&self) -> String {
        match &self.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}:{}", self.host, self.port),
        }
    }
}

/// Cursor signing settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorConfig {
    #[serde(default)]
    pub secret_key: String,

    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            algorithm: default_algorithm(),
        }
    }
}

/// Complete configuration of the service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub cursor: CursorConfig,

    #[serde(default)]
    pub pagination: LimitPolicy,
}

impl ServiceConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Override settings from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Override settings from any variable source
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("PORT must be a port number, got '{}'", port))?;
        }
        if let Some(url) = lookup("PUBLIC_URL") {
            self.server.public_url = Some(url);
        }
        if let Some(secret) = lookup("CURSOR_TOKEN_SECRET_KEY") {
            self.cursor.secret_key = secret;
        }
        if let Some(algorithm) = lookup("CURSOR_TOKEN_ALGORITHM") {
            self.cursor.algorithm = algorithm;
        }
        if let Some(limit) = lookup("PAGINATION_DEFAULT_LIMIT") {
            self.pagination.default_limit = limit.parse().with_context(|| {
                format!("PAGINATION_DEFAULT_LIMIT must be an integer, got '{}'", limit)
            })?;
        }
        if let Some(limit) = lookup("PAGINATION_MAX_LIMIT") {
            self.pagination.max_limit = limit.parse().with_context(|| {
                format!("PAGINATION_MAX_LIMIT must be an integer, got '{}'", limit)
            })?;
        }
        Ok(())
    }

    /// Check the settings are usable
    pub fn validate(&self) -> Result<()> {
        let limits = &self.pagination;
        if limits.default_limit == 0 || limits.max_limit == 0 {
            bail!("pagination limits must be positive");
        }
        if limits.default_limit > limits.max_limit {
            bail!(
                "pagination.default_limit ({}) exceeds pagination.max_limit ({})",
                limits.default_limit,
                limits.max_limit
            );
        }
        self.cursor_codec()?;
        Ok(())
    }

    /// Build the cursor codec described by the `cursor` section
    pub fn cursor_codec(&self) -> Result<CursorCodec> {
        CursorCodec::from_secret(&self.cursor.secret_key, &self.cursor.algorithm)
            .context("Invalid cursor signing configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const YAML: &str = r#"
server:
  host: 0.0.0.0
  port: 8080
cursor:
  secret_key: s3cret
  algorithm: HS512
pagination:
  default_limit: 10
  max_limit: 50
"#;

    #[test]
    fn test_from_yaml_str() {
        let config = ServiceConfig::from_yaml_str(YAML).unwrap();
        assert_eq!(config.server.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.cursor.algorithm, "HS512");
        assert_eq!(config.pagination.max_limit, 50);
        config.validate().unwrap();
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = ServiceConfig::from_yaml_str("cursor:\n  secret_key: k\n").unwrap();
        assert_eq!(config.server, ServerConfig::default());
        assert_eq!(config.pagination, LimitPolicy::default());
        assert_eq!(config.cursor.algorithm, "HS256");
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PORT", "9000"),
            ("CURSOR_TOKEN_SECRET_KEY", "from-env"),
            ("PAGINATION_MAX_LIMIT", "30"),
        ]
        .into_iter()
        .collect();

        let mut config = ServiceConfig::from_yaml_str(YAML).unwrap();
        config
            .apply_env_from(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.cursor.secret_key, "from-env");
        assert_eq!(config.pagination.max_limit, 30);
        assert_eq!(config.pagination.default_limit, 10);
    }

    #[test]
    fn test_bad_env_value_is_an_error() {
        let mut config = ServiceConfig::default();
        let result = config.apply_env_from(|key| (key == "PORT").then(|| "eighty".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_unusable_settings() {
        let mut config = ServiceConfig::default();
        assert!(config.validate().is_err(), "empty secret");

        config.cursor.secret_key = "k".to_string();
        config.validate().unwrap();

        config.cursor.algorithm = "RS256".to_string();
        assert!(config.validate().is_err());

        config.cursor.algorithm = "HS256".to_string();
        config.pagination.default_limit = 500;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_base_url() {
        let mut server = ServerConfig::default();
        assert_eq!(server.base_url(), "http://127.0.0.1:3000");
        server.public_url = Some("https://api.example.com/".to_string());
        assert_eq!(server.base_url(), "https://api.example.com");
    }
}
