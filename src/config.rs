//! Server configuration
//!
//! Defaults, overridden by `PIE_DATA_DIR` / `PIE_ADDR` from the environment
//! and then by command-line flags.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default address the server listens on.
pub const DEFAULT_ADDR: &str = "127.0.0.1:19876";

pub const DATA_DIR_ENV: &str = "PIE_DATA_DIR";
pub const ADDR_ENV: &str = "PIE_ADDR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Root of the table store
    pub data_dir: PathBuf,

    /// Address to bind the HTTP server to
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            addr: DEFAULT_ADDR.to_string(),
        }
    }
}

impl ServerConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(addr) = std::env::var(ADDR_ENV) {
            if !addr.is_empty() {
                config.addr = addr;
            }
        }
        config
    }

    /// Apply explicit overrides, e.g. from command-line flags.
    pub fn with_overrides(mut self, data_dir: Option<PathBuf>, addr: Option<String>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        if let Some(addr) = addr {
            self.addr = addr;
        }
        self
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.addr
            .parse()
            .map_err(|e| Error::Config(format!("invalid address {:?}: {}", self.addr, e)))
    }
}

/// `$HOME/.pie`, or `./.pie` when no home directory is known.
pub fn default_data_dir() -> PathBuf {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pie")
}
