//! Adapter configuration, loaded once at startup from a TOML file.
//!
//! ```toml
//! backend_port = 41184
//! backend_token = "..."
//! adapter_port = 3000
//! ```
//!
//! Every key is optional. A missing or unreadable file yields the defaults.

use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::error::{BridgeError, Result};

pub const DEFAULT_BACKEND_HOST: &str = "localhost";
pub const DEFAULT_BACKEND_PORT: u16 = 41184;
pub const DEFAULT_ADAPTER_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Host of the notes backend's REST API.
    pub backend_host: String,
    pub backend_port: u16,
    /// Token forwarded as the `token` query parameter. Empty means none.
    pub backend_token: String,
    /// Port the JSON-RPC endpoint listens on.
    pub adapter_port: u16,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            backend_host: DEFAULT_BACKEND_HOST.to_string(),
            backend_port: DEFAULT_BACKEND_PORT,
            backend_token: String::new(),
            adapter_port: DEFAULT_ADAPTER_PORT,
        }
    }
}

impl BridgeConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no config file, using defaults");
                return Self::default();
            }
        };

        match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "invalid config file, using defaults");
                Self::default()
            }
        }
    }

    /// Write this config as TOML, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| BridgeError::Config(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The token, or `None` when it is unset.
    pub fn token(&self) -> Option<&str> {
        Some(self.backend_token.as_str()).filter(|t| !t.is_empty())
    }

    /// Root URL of the backend, e.g. `http://localhost:41184/`.
    pub fn backend_url(&self) -> Result<Url> {
        Ok(Url::parse(&format!(
            "http://{}:{}/",
            self.backend_host, self.backend_port
        ))?)
    }

    /// Address the adapter binds to (all interfaces).
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.adapter_port))
    }
}
