//! Configuration file loading with environment overrides
//!
//! Settings come from a TOML file (`schedhub.toml` by default, `--config`
//! to override) merged with `SCHEDHUB_*` environment variables; the
//! environment wins. A missing file just means defaults, so the tool works
//! out of the box with the in-memory backend.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;

pub const DEFAULT_CONFIG_FILE: &str = "schedhub.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub server: ServerConfig,
    /// Optional TOML roster file replacing the embedded employee directory.
    pub roster: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the managed store's REST endpoint. Empty means no remote
    /// store is configured and the in-memory backend is used.
    pub url: String,
    pub key: String,
    pub table: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8293 }
    }
}

impl Config {
    /// Load configuration: explicit path, else `schedhub.toml` in the current
    /// directory, else defaults; then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)?
                } else {
                    debug!("no configuration file found, using defaults");
                    Config::default()
                }
            }
        };
        config.apply_env();
        if config.store.table.is_empty() {
            config.store.table = "events".to_string();
        }
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        debug!("loading configuration from {}", path.display());
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("SCHEDHUB_STORE_URL") {
            self.store.url = url;
        }
        if let Ok(key) = std::env::var("SCHEDHUB_STORE_KEY") {
            self.store.key = key;
        }
        if let Ok(table) = std::env::var("SCHEDHUB_STORE_TABLE") {
            self.store.table = table;
        }
        if let Ok(port) = std::env::var("SCHEDHUB_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(roster) = std::env::var("SCHEDHUB_ROSTER") {
            self.roster = Some(PathBuf::from(roster));
        }
    }

    /// Whether a remote store is configured; otherwise callers fall back to
    /// the in-memory backend.
    pub fn has_remote_store(&self) -> bool {
        !self.store.url.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert!(!config.has_remote_store());
        assert_eq!(config.server.port, 8293);
        assert!(config.roster.is_none());
    }

    #[test]
    fn loads_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[store]
url = "https://store.example.com/rest/v1"
key = "secret"

[server]
port = 9000
"#
        )
        .unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert!(config.has_remote_store());
        assert_eq!(config.store.table, "events");
        assert_eq!(config.server.port, 9000);
    }
}
