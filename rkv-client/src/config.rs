//! Client and pool configuration, loadable from TOML.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Configuration for the client and its connection pool.
///
/// ```toml
/// addr = "127.0.0.1:6379"
/// max_idle = 8
/// max_total = 16
/// connect_timeout = "500ms"
/// read_timeout = "2s"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Server address, e.g. "127.0.0.1:6379".
    pub addr: String,
    /// Maximum idle connections kept in the pool.
    pub max_idle: usize,
    /// Maximum total connections (idle + in-use).
    pub max_total: usize,
    /// Optional TCP connect timeout.
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Option<Duration>,
    /// Optional TCP read timeout.
    #[serde(with = "humantime_serde")]
    pub read_timeout: Option<Duration>,
    /// Optional TCP write timeout.
    #[serde(with = "humantime_serde")]
    pub write_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            addr: "127.0.0.1:6379".to_string(),
            max_idle: 8,
            max_total: 16,
            connect_timeout: None,
            read_timeout: None,
            write_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Default configuration pointed at `addr`.
    pub fn with_addr(addr: impl Into<String>) -> Self {
        ClientConfig {
            addr: addr.into(),
            ..ClientConfig::default()
        }
    }

    /// Parses a configuration from TOML text. Missing keys take defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ClientConfig = toml::from_str(text).context("failed to parse client config")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read client config at '{}'", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("invalid client config in '{}'", path.display()))
    }

    fn validate(&self) -> Result<()> {
        if self.max_total == 0 {
            anyhow::bail!("max_total must be at least 1");
        }
        if self.max_idle > self.max_total {
            anyhow::bail!(
                "max_idle ({}) cannot exceed max_total ({})",
                self.max_idle,
                self.max_total
            );
        }
        Ok(())
    }
}
