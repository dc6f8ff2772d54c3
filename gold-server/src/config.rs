//! Server configuration.

use crate::price_feed::doviz::DOVIZ_GOLDS_URL;
use anyhow::Context;
use reqwest::Url;
use std::env;
use std::net::{Ipv4Addr, SocketAddr};

pub const DEFAULT_PORT: u16 = 3000;

/// Server configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub upstream_url: Url,
}

impl Config {
    /// Load configuration from environment variables (and `.env`, if present).
    ///
    /// Optional:
    /// - `PORT`: Port to bind to (default: 3000)
    /// - `GOLD_UPSTREAM_URL`: Gold price endpoint (default: doviz.com)
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    /// Unset and empty variables both take the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(p) => p
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got {p:?}"))?,
            None => DEFAULT_PORT,
        };
        let bind_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));

        let upstream_url = var("GOLD_UPSTREAM_URL").unwrap_or_else(|| DOVIZ_GOLDS_URL.into());
        let upstream_url = Url::parse(&upstream_url)
            .with_context(|| format!("GOLD_UPSTREAM_URL is not a valid URL: {upstream_url}"))?;

        Ok(Self {
            bind_addr,
            upstream_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(cfg.upstream_url.as_str(), DOVIZ_GOLDS_URL);
    }

    #[test]
    fn test_empty_port_uses_default() {
        let cfg = config(&[("PORT", "")]).unwrap();
        assert_eq!(cfg.bind_addr.port(), DEFAULT_PORT);
    }

    #[test]
    fn test_port_override() {
        let cfg = config(&[("PORT", "8080")]).unwrap();
        assert_eq!(cfg.bind_addr.port(), 8080);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(config(&[("PORT", "http")]).is_err());
        assert!(config(&[("PORT", "70000")]).is_err());
        assert!(config(&[("GOLD_UPSTREAM_URL", "not a url")]).is_err());
    }

    #[test]
    fn test_upstream_override() {
        let cfg = config(&[("GOLD_UPSTREAM_URL", "http://127.0.0.1:9000/golds")]).unwrap();
        assert_eq!(cfg.upstream_url.as_str(), "http://127.0.0.1:9000/golds");
    }
}
