//! Configuration for sketchsave

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address to bind the HTTP server to
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served as static files; parent of the data directory
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Subdirectory of `root` holding saved drawings and exports
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Generated configuration module, relative to `root`
    #[serde(default = "default_config_module")]
    pub config_module: PathBuf,

    /// Name of the exported constant in the configuration module
    #[serde(default = "default_config_export")]
    pub config_export: String,

    /// Maximum accepted request body size in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            root: default_root(),
            data_dir: default_data_dir(),
            config_module: default_config_module(),
            config_export: default_config_export(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Config {
    /// Load config from a TOML file, falling back to defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            tracing::debug!("No config file at {:?}, using defaults", path);
            Ok(Config::default())
        }
    }

    /// Config rooted at `root` with every other setting at its default
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Config::default()
        }
    }

    /// Make `root` absolute so that reported file paths are absolute
    pub fn resolve_root(mut self) -> Result<Self> {
        self.root = std::path::absolute(&self.root)
            .map_err(|e| Error::Config(format!("Cannot resolve root {:?}: {}", self.root, e)))?;
        Ok(self)
    }

    /// Socket address the server listens on
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Path to the data directory
    pub fn data_path(&self) -> PathBuf {
        self.root.join(&self.data_dir)
    }

    /// Path to the generated configuration module
    pub fn config_module_path(&self) -> PathBuf {
        self.root.join(&self.config_module)
    }

    /// Create the data directory if it is missing
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(self.data_path())?;
        Ok(())
    }
}

// Default value functions

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8000
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_config_module() -> PathBuf {
    PathBuf::from("src").join("config.default.js")
}

fn default_config_export() -> String {
    "defaultConfig".to_string()
}

fn default_max_body_bytes() -> usize {
    64 * 1024 * 1024
}
