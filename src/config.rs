use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
///
/// All settings can be configured via environment variables with the `RANKER_`
/// prefix. For example: `RANKER_SERVER__PORT=8098`,
/// `RANKER_CATALOG__DATASET_PATH=data/tracks.csv`
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Catalog dataset configuration
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Model artifact configuration
    #[serde(default)]
    pub model: ModelConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            model: ModelConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Path to the prepared track dataset (CSV with a header row)
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
        }
    }
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("data/spotify_prepared.csv")
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the trained classifier (ONNX)
    #[serde(default = "default_model_path")]
    pub path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

fn default_model_path() -> PathBuf {
    PathBuf::from("model/context_classifier.onnx")
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8098
}

impl ServerConfig {
    /// Returns the socket address for binding the server
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address")
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables should be prefixed with `RANKER_` and use
    /// double underscores for nested values:
    /// - `RANKER_CATALOG__DATASET_PATH` -> catalog.dataset_path
    /// - `RANKER_MODEL__PATH` -> model.path
    /// - `RANKER_SERVER__PORT` -> server.port
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("RANKER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
