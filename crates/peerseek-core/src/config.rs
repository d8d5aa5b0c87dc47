//! Configuration system for peerseek.
//!
//! Resolution order: environment variables → config file → defaults.
//!
//! Config file location:
//!   1. $PEERSEEK_CONFIG (explicit override)
//!   2. $XDG_CONFIG_HOME/peerseek/config.toml
//!   3. ~/.config/peerseek/config.toml

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PeerseekConfig {
    pub node: NodeConfig,
    pub lookup: LookupConfig,
    pub readiness: ReadinessConfig,
    pub console: ConsoleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Base URL of the node's RPC API.
    pub api_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Deadline for a single lookup.
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// Sleep between connectivity checks while waiting for the first peer.
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Shown as a hint once the node is ready.
    pub example_peer_id: String,
    /// Clear the terminal when a lookup starts and finishes.
    pub clear_on_reset: bool,
}

// ── Defaults ──────────────────────────────────────────────────────────────────

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5001";
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;
pub const EXAMPLE_PEER_ID: &str = "QmNnooDu7bfjPFoTZYxMNLWUQJyrVwtbZg5gBMjTezGAJN";

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            example_peer_id: EXAMPLE_PEER_ID.to_string(),
            clear_on_reset: true,
        }
    }
}

impl LookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl ReadinessConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_or_home().join(".config"))
        .join("peerseek")
}

fn dirs_or_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    ReadFailed(PathBuf, std::io::Error),
    #[error("failed to parse {0}: {1}")]
    ParseFailed(PathBuf, toml::de::Error),
    #[error("failed to write {0}: {1}")]
    WriteFailed(PathBuf, std::io::Error),
    #[error("failed to serialize: {0}")]
    SerializeFailed(toml::ser::Error),
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl PeerseekConfig {
    /// Load config: env vars → file → defaults.
    ///
    /// A file that cannot be read or parsed is replaced by defaults and the
    /// env overrides still apply; its error is handed back for reporting.
    pub fn load_or_default(
        path: &std::path::Path,
        var: impl Fn(&str) -> Option<String>,
    ) -> (Self, Option<ConfigError>) {
        let (mut config, error) = match Self::load_file(path) {
            Ok(config) => (config, None),
            Err(e) => (PeerseekConfig::default(), Some(e)),
        };
        config.apply_overrides(var);
        (config, error)
    }

    /// Read a config file, falling back to defaults when it does not exist.
    pub fn load_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(PeerseekConfig::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadFailed(path.to_path_buf(), e))?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(path.to_path_buf(), e))
    }

    /// Config file path.
    pub fn file_path() -> PathBuf {
        std::env::var("PEERSEEK_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| config_dir().join("config.toml"))
    }

    /// Write default config if none exists. Returns the path.
    pub fn write_default_if_missing() -> Result<PathBuf, ConfigError> {
        let path = Self::file_path();
        Self::write_default_to(&path)?;
        Ok(path)
    }

    fn write_default_to(path: &std::path::Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteFailed(path.to_path_buf(), e))?;
        }
        let text = toml::to_string_pretty(&PeerseekConfig::default())
            .map_err(ConfigError::SerializeFailed)?;
        std::fs::write(path, text).map_err(|e| ConfigError::WriteFailed(path.to_path_buf(), e))
    }

    /// Apply PEERSEEK_* overrides. `var` looks up one variable by name.
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("PEERSEEK_NODE__API_URL") {
            self.node.api_url = v;
        }
        if let Some(v) = var("PEERSEEK_LOOKUP__TIMEOUT_MS") {
            if let Ok(ms) = v.parse() {
                self.lookup.timeout_ms = ms;
            }
        }
        if let Some(v) = var("PEERSEEK_READINESS__POLL_INTERVAL_MS") {
            if let Ok(ms) = v.parse() {
                self.readiness.poll_interval_ms = ms;
            }
        }
        if let Some(v) = var("PEERSEEK_CONSOLE__CLEAR_ON_RESET") {
            self.console.clear_on_reset = v == "true" || v == "1";
        }
    }
}
