//! Server configuration.
//!
//! Settings come from an optional TOML file and are then overridden by
//! environment variables:
//!
//! - `DEMO_CONFIG`: path of the TOML file (otherwise `demo.toml` is searched for)
//! - `HOST`: bind host (default: 0.0.0.0)
//! - `PORT`: bind port (default: 2015)
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//!
//! [routes]
//! ingest_path = "/point"
//! stream_path = "/stream"
//!
//! [render]
//! title = "Points"
//! width = 600
//! height = 600
//!
//! [stream]
//! angular_frequency = 0.005
//! min_sleep_ms = 100
//! max_sleep_ms = 199
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::services::render::RenderSettings;
use crate::services::stream::StreamSettings;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl ConfigError {
    fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Full server configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ListenSettings,
    #[serde(default)]
    pub routes: RouteSettings,
    #[serde(default)]
    pub render: RenderFileSettings,
    #[serde(default)]
    pub stream: StreamSettings,
}

/// Bind address settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListenSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Paths of the configurable endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSettings {
    #[serde(default = "default_ingest_path")]
    pub ingest_path: String,
    #[serde(default = "default_stream_path")]
    pub stream_path: String,
}

/// Image settings as written in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFileSettings {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_image_size")]
    pub width: u32,
    #[serde(default = "default_image_size")]
    pub height: u32,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    2015
}

fn default_ingest_path() -> String {
    "/point".to_string()
}

fn default_stream_path() -> String {
    "/stream".to_string()
}

fn default_title() -> String {
    "Points".to_string()
}

fn default_image_size() -> u32 {
    600
}

impl Default for ListenSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for RouteSettings {
    fn default() -> Self {
        Self {
            ingest_path: default_ingest_path(),
            stream_path: default_stream_path(),
        }
    }
}

impl Default for RenderFileSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_image_size(),
            height: default_image_size(),
        }
    }
}

impl ServerConfig {
    /// Parse configuration from TOML text and validate it.
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    /// Load the file named by `DEMO_CONFIG`, else the first `demo.toml` found in
    /// the current directory, `backend/` or the parent directory, else defaults.
    /// Environment overrides are applied last.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("DEMO_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => {
                let search_paths = [
                    PathBuf::from("demo.toml"),
                    PathBuf::from("backend/demo.toml"),
                    PathBuf::from("../demo.toml"),
                ];
                match search_paths.iter().find(|p| p.exists()) {
                    Some(path) => Self::from_file(path)?,
                    None => Self::default(),
                }
            }
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `HOST` and `PORT` overrides.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = std::env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| ConfigError::invalid("PORT", format!("{:?}: {}", port, e)))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, path) in [
            ("routes.ingest_path", &self.routes.ingest_path),
            ("routes.stream_path", &self.routes.stream_path),
        ] {
            if !path.starts_with('/') {
                return Err(ConfigError::invalid(key, format!("{:?} must start with '/'", path)));
            }
            if ["/", "/ok", "/uptime"].contains(&path.as_str()) {
                return Err(ConfigError::invalid(key, format!("{:?} is reserved", path)));
            }
        }
        if self.routes.ingest_path == self.routes.stream_path {
            return Err(ConfigError::invalid(
                "routes",
                "ingest_path and stream_path must differ",
            ));
        }
        if self.render.width == 0 || self.render.width != self.render.height {
            return Err(ConfigError::invalid(
                "render",
                format!(
                    "image must be square and non-empty, got {}x{}",
                    self.render.width, self.render.height
                ),
            ));
        }
        if self.stream.min_sleep_ms > self.stream.max_sleep_ms {
            return Err(ConfigError::invalid(
                "stream",
                format!(
                    "min_sleep_ms ({}) exceeds max_sleep_ms ({})",
                    self.stream.min_sleep_ms, self.stream.max_sleep_ms
                ),
            ));
        }
        if !self.stream.angular_frequency.is_finite() {
            return Err(ConfigError::invalid("stream.angular_frequency", "must be finite"));
        }
        Ok(())
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| ConfigError::invalid("server.host", format!("{}", e)))
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            title: self.render.title.clone(),
            size: self.render.width,
        }
    }
}
