//! Listener settings
//!
//! Deserializable with per-field defaults, so a partial config document (or
//! none at all) yields a server on `0.0.0.0:3002` serving the working
//! directory as the front-end.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 3002;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Root for every path the `/api` router does not claim
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Allowed browser origins; empty allows any
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_static_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            cors_origins: Vec::new(),
        }
    }
}

impl HttpServerConfig {
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_static_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.static_dir = dir.as_ref().to_path_buf();
        self
    }

    /// `host:port` as handed to the listener
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
