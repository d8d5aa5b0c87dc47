//! One bounded, narrated peer lookup.
//!
//! The sink sees: reset, "Searching for peer …", one or more records per
//! progress event in arrival order, reset, then exactly one terminal record.
//! Errors never escape the session; they become the returned `Outcome` and
//! an error-category line.

use std::time::Duration;

use peerseek_core::classify::pretty;
use peerseek_core::config::DEFAULT_TIMEOUT_MS;
use peerseek_core::{classify, PeerId, PeerInfo, ProgressEvent, StatusRecord};

use crate::routing::{LookupError, PeerRouting};
use crate::sink::StatusSink;

/// Terminal result of one lookup.
pub type Outcome = Result<PeerInfo, LookupError>;

#[derive(Debug, Clone)]
pub struct LookupSession {
    timeout: Duration,
}

impl Default for LookupSession {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_TIMEOUT_MS))
    }
}

impl LookupSession {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run one lookup to completion. Never retries.
    ///
    /// When the deadline passes the in-flight `find_peer` future is dropped,
    /// which cancels the query on the routing side.
    pub async fn run<R>(&self, routing: &R, peer: &PeerId, sink: &mut dyn StatusSink) -> Outcome
    where
        R: PeerRouting + ?Sized,
    {
        sink.reset();
        sink.append(StatusRecord::neutral(format!("Searching for peer {peer}...")));
        tracing::info!(%peer, timeout_ms = self.timeout.as_millis() as u64, "lookup started");

        let mut events = 0usize;
        let result = {
            let mut on_progress = |event: ProgressEvent| {
                events += 1;
                tracing::debug!(kind = event.kind(), ?event, "progress event");
                for record in classify(&event) {
                    sink.append(record);
                }
            };
            tokio::time::timeout(self.timeout, routing.find_peer(peer, &mut on_progress)).await
        };

        let outcome = match result {
            Ok(Ok(info)) => Ok(info),
            Ok(Err(e)) => Err(LookupError::Routing(e)),
            Err(_) => Err(LookupError::Timeout(self.timeout)),
        };

        sink.reset();
        match &outcome {
            Ok(info) => {
                tracing::info!(%peer, events, addrs = info.multiaddrs.len(), "peer found");
                sink.append(StatusRecord::success(pretty(info)));
            }
            Err(e) => {
                tracing::warn!(%peer, events, error = %e, "error finding peer");
                sink.append(StatusRecord::error(e.to_string()));
            }
        }

        outcome
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
