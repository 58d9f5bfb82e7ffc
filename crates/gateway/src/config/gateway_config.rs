//! Gateway configuration module.
//!
//! Supports loading configuration from:
//! 1. Config file (TOML, JSON, or YAML) named by `PITCHSIDE_GATEWAY_CONFIG`
//! 2. Environment variables
//!
//! Environment variables take precedence over config file values.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Tournament backend configuration
    pub backend: BackendConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Session cookie and application shell
    pub session: SessionConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server port (default: 8090)
    pub port: u16,
    /// Bind address (default: "0.0.0.0")
    pub bind: String,
}

/// Tournament backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend base URL (default: "http://localhost:8080")
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins
    pub allowed_origins: Vec<String>,
    /// Allow credentials (default: true)
    pub allow_credentials: bool,
}

/// Session cookie and shell settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Mark the token cookie `Secure` (default: false)
    pub cookie_secure: bool,
    /// Application shell served for rendered routes; built-in shell when unset
    pub index_html: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8090,
            bind: "0.0.0.0".to_string(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
                "http://localhost:8090".to_string(),
            ],
            allow_credentials: true,
        }
    }
}

impl CorsConfig {
    /// True when `*` is among the allowed origins.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o.trim() == "*")
    }
}

impl GatewayConfig {
    /// Load configuration from file and environment variables.
    /// Environment variables override file values.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(config_path) = std::env::var("PITCHSIDE_GATEWAY_CONFIG") {
            config = Self::from_file(&config_path)?;
            tracing::info!("Loaded configuration from: {}", config_path);
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Reject combinations the HTTP layers cannot serve.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.cors.allows_any_origin() && self.cors.allow_credentials {
            anyhow::bail!(
                "CORS wildcard origin `*` cannot be combined with allow_credentials; \
                 list the origins explicitly or set CORS_ALLOW_CREDENTIALS=false"
            );
        }
        Ok(())
    }

    /// Load configuration from a file (supports TOML, JSON, YAML)
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let config: GatewayConfig = match extension {
            "toml" => toml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            _ => {
                // Try to detect format
                if content.trim().starts_with('{') {
                    serde_json::from_str(&content)?
                } else if content.contains("---") || content.contains(": ") {
                    serde_yaml::from_str(&content)?
                } else {
                    toml::from_str(&content)?
                }
            }
        };

        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// [`GatewayConfig::load`]).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server config
        if let Some(val) = lookup("GATEWAY_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = lookup("GATEWAY_BIND") {
            self.server.bind = val;
        }

        // Backend config
        if let Some(val) = lookup("PITCHSIDE_BACKEND_URL") {
            self.backend.base_url = val;
        }
        if let Some(val) = lookup("PITCHSIDE_BACKEND_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.backend.timeout_secs = secs;
            }
        }

        // CORS config
        if let Some(val) = lookup("CORS_ALLOWED_ORIGINS") {
            self.cors.allowed_origins = val
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(val) = lookup("CORS_ALLOW_CREDENTIALS") {
            self.cors.allow_credentials = val.parse().unwrap_or(true);
        }

        // Session config
        if let Some(val) = lookup("PITCHSIDE_COOKIE_SECURE") {
            self.session.cookie_secure = val == "true" || val == "1";
        }
        if let Some(val) = lookup("PITCHSIDE_INDEX_HTML") {
            self.session.index_html = Some(PathBuf::from(val));
        }
    }

    /// Socket address string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }
}
