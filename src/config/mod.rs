//! Configuration module for taskgate
//!
//! Supports configuration via file and environment variables.

use serde::{Deserialize, Serialize};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind the server to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
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
        }
    }
}

/// Upstream API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the upstream API, including its path prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Whether the inbound `Authorization` header is copied onto upstream
    /// requests for task routes
    #[serde(default = "default_forward_auth")]
    pub forward_auth: bool,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000/api/v1".to_string()
}

fn default_forward_auth() -> bool {
    true
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            forward_auth: default_forward_auth(),
        }
    }
}

/// Static asset serving configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Directory whose files are served at the site root
    #[serde(default = "default_assets_dir")]
    pub dir: String,
}

fn default_assets_dir() -> String {
    "static".to_string()
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dir: default_assets_dir(),
        }
    }
}

/// Main application configuration
///
/// Built once at startup and handed to the server as an immutable
/// snapshot; nothing reconfigures it at runtime.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream API configuration
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Static asset configuration
    #[serde(default)]
    pub assets: AssetsConfig,
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> anyhow::Result<Self> {
        // Try to load .env file (ignore if not found)
        let _ = dotenvy::dotenv();

        let mut config = config::Config::builder();

        // Add default config
        config = config.add_source(config::Config::try_from(&AppConfig::default())?);

        // Try to load from config file if it exists
        if std::path::Path::new("config.toml").exists() {
            config = config.add_source(config::File::with_name("config").required(false));
        }

        // Override with environment variables (prefixed with TASKGATE_)
        config = config.add_source(
            config::Environment::with_prefix("TASKGATE")
                .separator("_")
                .try_parsing(true),
        );

        let config = config.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        Ok(app_config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig =
            toml::from_str(&contents).or_else(|_| serde_json::from_str(&contents))?;
        Ok(config)
    }
}
