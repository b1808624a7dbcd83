//! Process configuration
//!
//! Loaded once at startup and passed down explicitly; nothing below
//! `main` reads the environment.
//!
//! ## Usage
//! ```bash
//! FLOWWATCH_TOKEN=change-me          # ingestion shared secret (required to accept events)
//! APP_TITLE="Ops Failures"           # dashboard title (default: FlowWatch)
//! FLOWWATCH_BIND=127.0.0.1:8000      # listen address (default: 0.0.0.0:8000)
//! FLOWWATCH_DATA_DIR=/var/lib/flowwatch   # store directory (default: data)
//! ```

use std::path::PathBuf;

use crate::ingest::IngestToken;

pub const DEFAULT_TITLE: &str = "FlowWatch";
pub const DEFAULT_BIND: &str = "0.0.0.0:8000";
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret for the ingestion webhook
    pub token: IngestToken,
    /// Title shown on the dashboard
    pub app_title: String,
    pub bind_addr: String,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: IngestToken::new(token),
            app_title: DEFAULT_TITLE.to_string(),
            bind_addr: DEFAULT_BIND.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }

    /// Build from environment variables, loading `.env` first if present
    ///
    /// Environment:
    /// - FLOWWATCH_TOKEN: ingestion secret (trimmed; empty rejects all ingestion)
    /// - APP_TITLE: dashboard title
    /// - FLOWWATCH_BIND: listen address
    /// - FLOWWATCH_DATA_DIR: store directory
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore missing .env
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = lookup("FLOWWATCH_TOKEN").unwrap_or_default();
        let mut config = Self::new(token);

        if let Some(title) = lookup("APP_TITLE") {
            config.app_title = title;
        }
        if let Some(bind) = non_empty("FLOWWATCH_BIND") {
            config.bind_addr = bind.trim().to_string();
        }
        if let Some(dir) = non_empty("FLOWWATCH_DATA_DIR") {
            config.data_dir = PathBuf::from(dir.trim());
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert_eq!(config.app_title, "FlowWatch");
        assert_eq!(config.bind_addr, "0.0.0.0:8000");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!(!config.token.is_configured());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("FLOWWATCH_TOKEN", "  s3cret \n"),
            ("APP_TITLE", "Ops Failures"),
            ("FLOWWATCH_BIND", "127.0.0.1:9000"),
            ("FLOWWATCH_DATA_DIR", "/tmp/fw"),
        ]));
        assert!(config.token.verify(Some("s3cret")));
        assert_eq!(config.app_title, "Ops Failures");
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/fw"));
    }

    #[test]
    fn test_blank_token_is_unconfigured() {
        let config = Config::from_lookup(lookup_from(&[("FLOWWATCH_TOKEN", "   ")]));
        assert!(!config.token.is_configured());
    }
}
