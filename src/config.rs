//! Configuration module for Courier
//!
//! JSON configuration with sensible defaults; the original deployment used
//! one shared port (6003) for both inbound peers and outbound dials.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

use crate::error::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log configuration
    #[serde(default)]
    pub log: LogConfig,

    /// Listen address for inbound peer connections
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,

    /// Fixed port used for all outbound pool dials
    #[serde(default = "default_outbound_port")]
    pub outbound_port: u16,
}

fn default_listen() -> SocketAddr {
    "0.0.0.0:6003".parse().expect("valid default listen address")
}

fn default_outbound_port() -> u16 {
    6003
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Create a default router configuration
    pub fn default_router() -> Self {
        Config {
            log: LogConfig::default(),
            listen: default_listen(),
            outbound_port: default_outbound_port(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_router()
    }
}

/// Log configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
