//! Wallet configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::WalletError;

/// Configuration for the wallet history.
///
/// Can be loaded from a TOML file via [`WalletConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Directory holding the LMDB environment.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Maximum size of the LMDB memory map, in bytes.
    #[serde(default = "default_map_size")]
    pub map_size: usize,

    /// Maximum number of named LMDB databases.
    #[serde(default = "default_max_dbs")]
    pub max_dbs: u32,

    /// Flush committed state to disk before every query.
    #[serde(default = "default_true")]
    pub sync_before_read: bool,

    /// Check the history indexes for damage when opening.
    #[serde(default = "default_true")]
    pub verify_integrity_on_open: bool,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./skein_wallet")
}

fn default_map_size() -> usize {
    1 << 30
}

fn default_max_dbs() -> u32 {
    8
}

fn default_true() -> bool {
    true
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl WalletConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, WalletError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| WalletError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, WalletError> {
        toml::from_str(s).map_err(|e| WalletError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, WalletError> {
        toml::to_string_pretty(self).map_err(|e| WalletError::Config(e.to_string()))
    }

    /// Install the global tracing subscriber from `log_level` and
    /// `log_format`. Returns `false` if one was already installed.
    pub fn init_tracing(&self) -> bool {
        skein_utils::init_tracing(&self.log_level, &self.log_format)
    }

    /// A configuration rooted at `data_dir` with every other field defaulted.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            map_size: default_map_size(),
            max_dbs: default_max_dbs(),
            sync_before_read: default_true(),
            verify_integrity_on_open: default_true(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = WalletConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = WalletConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.map_size, config.map_size);
        assert_eq!(parsed.data_dir, config.data_dir);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = WalletConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.max_dbs, 8);
        assert!(config.sync_before_read);
        assert!(config.verify_integrity_on_open);
        assert_eq!(config.log_format, "human");
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            data_dir = "/var/lib/skein"
            sync_before_read = false
        "#;
        let config = WalletConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/skein"));
        assert!(!config.sync_before_read);
        assert_eq!(config.log_level, "info"); // default
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = WalletConfig::from_toml_file("/nonexistent/skein.toml");
        assert!(matches!(result, Err(WalletError::Config(_))));
    }
}
