//! Configuration loading and parsing.
//!
//! Defines the server config schema and resolves defaults.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_CODE_LENGTH: usize = 8;
pub const DEFAULT_IDLE_TTL_SEC: u64 = 3600;
pub const DEFAULT_REAP_INTERVAL_SEC: u64 = 60;

/// Top-level server configuration loaded from TOML.
#[derive(Debug, Default, Deserialize)]
pub struct ServerConfig {
    /// Bind address (host:port).
    pub bind: Option<String>,
    /// Public base URL used to construct join URLs.
    pub public_base_url: Option<String>,
    /// Party lifecycle settings.
    pub party: Option<PartyConfig>,
    /// Track catalog settings. Search fails upstream-unavailable without it.
    pub catalog: Option<CatalogConfig>,
}

/// Party lifecycle settings from TOML.
#[derive(Debug, Default, Deserialize)]
pub struct PartyConfig {
    /// Party code length (uppercase alphanumeric characters).
    pub code_length: Option<usize>,
    /// Idle window before a party with no connections expires, in seconds.
    pub idle_ttl_sec: Option<u64>,
    /// Reaper wake interval in seconds.
    pub reap_interval_sec: Option<u64>,
}

/// Track catalog configuration.
#[derive(Debug, Deserialize)]
pub struct CatalogConfig {
    /// Catalog base URL, e.g. `https://catalog.example.com/api`.
    pub base_url: String,
    /// Request timeout in milliseconds (default: 5000).
    pub timeout_ms: Option<u64>,
}

impl ServerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn code_length(&self) -> usize {
        self.party
            .as_ref()
            .and_then(|p| p.code_length)
            .unwrap_or(DEFAULT_CODE_LENGTH)
    }

    pub fn idle_ttl_sec(&self) -> u64 {
        self.party
            .as_ref()
            .and_then(|p| p.idle_ttl_sec)
            .unwrap_or(DEFAULT_IDLE_TTL_SEC)
    }

    pub fn reap_interval_sec(&self) -> u64 {
        self.party
            .as_ref()
            .and_then(|p| p.reap_interval_sec)
            .unwrap_or(DEFAULT_REAP_INTERVAL_SEC)
            .max(1)
    }
}

/// Resolve the bind address from config, if present.
pub fn bind_from_config(cfg: &ServerConfig) -> Result<Option<SocketAddr>> {
    match cfg.bind.as_ref() {
        Some(raw) => {
            let addr = raw
                .parse::<SocketAddr>()
                .with_context(|| format!("invalid bind address in config: {raw}"))?;
            Ok(Some(addr))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let cfg: ServerConfig = toml::from_str(
            r#"
            bind = "0.0.0.0:5000"
            public_base_url = "https://party.example.com"

            [party]
            code_length = 6
            idle_ttl_sec = 600

            [catalog]
            base_url = "https://catalog.example.com/api"
            timeout_ms = 2000
            "#,
        )
        .expect("parse");
        assert_eq!(cfg.code_length(), 6);
        assert_eq!(cfg.idle_ttl_sec(), 600);
        assert_eq!(cfg.reap_interval_sec(), DEFAULT_REAP_INTERVAL_SEC);
        assert_eq!(
            cfg.catalog.expect("catalog").base_url,
            "https://catalog.example.com/api"
        );
        assert!(bind_from_config(&ServerConfig {
            bind: Some("127.0.0.1:5000".to_string()),
            ..Default::default()
        })
        .expect("parse bind")
        .is_some());
    }

    #[test]
    fn empty_config_uses_defaults() {
        let cfg: ServerConfig = toml::from_str("").expect("parse");
        assert_eq!(cfg.code_length(), DEFAULT_CODE_LENGTH);
        assert_eq!(cfg.idle_ttl_sec(), DEFAULT_IDLE_TTL_SEC);
        assert!(cfg.catalog.is_none());
        assert!(bind_from_config(&cfg).expect("bind").is_none());
    }

    #[test]
    fn invalid_bind_is_an_error() {
        let cfg = ServerConfig {
            bind: Some("not-an-addr".to_string()),
            ..Default::default()
        };
        assert!(bind_from_config(&cfg).is_err());
    }
}
