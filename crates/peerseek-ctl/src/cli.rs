//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use peerseek_core::config::PeerseekConfig;

#[derive(Parser, Debug)]
#[command(
    name = "peerseek",
    version,
    about = "Find a peer on the DHT through a running node and narrate the lookup"
)]
pub struct Cli {
    /// Look up this peer once and exit. Omit for an interactive console.
    pub peer_id: Option<String>,

    /// Node RPC API URL
    #[arg(long)]
    pub api: Option<String>,

    /// Lookup deadline in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Connectivity polling interval in milliseconds
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Keep earlier output instead of clearing the screen between lookups
    #[arg(long)]
    pub no_clear: bool,

    /// Disable coloured output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    pub debug: bool,
}

impl Cli {
    /// Resolve config: CLI flags → env vars → file → defaults.
    ///
    /// A broken config file is reported and replaced by defaults; env vars
    /// and flags still apply on top.
    pub fn load_config(&self) -> PeerseekConfig {
        self.resolve_config(|key| std::env::var(key).ok())
    }

    fn resolve_config(&self, var: impl Fn(&str) -> Option<String>) -> PeerseekConfig {
        let path = self.config.clone().unwrap_or_else(PeerseekConfig::file_path);
        let (mut config, error) = PeerseekConfig::load_or_default(&path, var);
        if let Some(e) = error {
            tracing::warn!(error = %e, "failed to load config, using defaults");
        }
        self.merge_into(&mut config);
        config
    }

    fn merge_into(&self, config: &mut PeerseekConfig) {
        if let Some(api) = &self.api {
            config.node.api_url = api.clone();
        }
        if let Some(ms) = self.timeout_ms {
            config.lookup.timeout_ms = ms;
        }
        if let Some(ms) = self.poll_interval_ms {
            config.readiness.poll_interval_ms = ms;
        }
        if self.no_clear {
            config.console.clear_on_reset = false;
        }
    }
}
