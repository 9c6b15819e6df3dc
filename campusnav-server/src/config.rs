use std::{
    net::{Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
    time::Duration,
};

use campusnav_core::{CampusDataConfig, NavigationConfig};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid configuration file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Missing setting: {0}")]
    Missing(&'static str),
    #[error(transparent)]
    Navigation(#[from] campusnav_core::Error),
}

/// Contents of the TOML configuration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ListenConfig,
    pub data: DataConfig,
    pub navigation: NavigationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenConfig {
    pub bind: SocketAddr,
    pub request_timeout_secs: u64,
    pub concurrency_limit: usize,
    /// How often sessions check arrival grace and location timeouts
    pub poll_interval_ms: u64,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
            request_timeout_secs: 10,
            concurrency_limit: 256,
            poll_interval_ms: 500,
        }
    }
}

impl ListenConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub nodes_path: Option<PathBuf>,
    pub edges_path: Option<PathBuf>,
}

impl DataConfig {
    pub fn campus_data(&self) -> Result<CampusDataConfig, ConfigError> {
        let nodes = self
            .nodes_path
            .as_ref()
            .ok_or(ConfigError::Missing("data.nodes_path"))?;
        let edges = self
            .edges_path
            .as_ref()
            .ok_or(ConfigError::Missing("data.edges_path"))?;
        Ok(CampusDataConfig::new(nodes, edges))
    }
}

impl ServerConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.navigation.validate()?;
        Ok(config)
    }
}
