//! Waits until the node has at least one connection.
//!
//! Explicit state machine: `Initializing → Polling → Ready`. `Ready` is
//! terminal; losing connectivity afterwards is not tracked here. The node
//! offers no connection hook, so each step takes a fresh snapshot.

use std::time::Duration;

use peerseek_core::config::DEFAULT_POLL_INTERVAL_MS;

use crate::routing::PeerRouting;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessState {
    Initializing,
    Polling { last_count: usize },
    Ready { peers: usize },
}

#[derive(Debug)]
pub struct ReadinessMonitor {
    state: ReadinessState,
    poll_interval: Duration,
    checks: u32,
}

impl Default for ReadinessMonitor {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_POLL_INTERVAL_MS))
    }
}

impl ReadinessMonitor {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            state: ReadinessState::Initializing,
            poll_interval,
            checks: 0,
        }
    }

    pub fn state(&self) -> ReadinessState {
        self.state
    }

    /// Connectivity checks performed so far.
    pub fn checks(&self) -> u32 {
        self.checks
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Take one connectivity snapshot and advance the state machine.
    ///
    /// A failed snapshot counts as zero peers.
    pub async fn check<R>(&mut self, routing: &R) -> ReadinessState
    where
        R: PeerRouting + ?Sized,
    {
        if let ReadinessState::Ready { .. } = self.state {
            return self.state;
        }

        let count = match routing.connected_peers().await {
            Ok(peers) => peers.len(),
            Err(e) => {
                tracing::warn!(error = %e, "connectivity check failed");
                0
            }
        };
        self.checks += 1;
        tracing::debug!(check = self.checks, peers = count, "connectivity check");

        self.state = if count > 0 {
            tracing::info!(peers = count, checks = self.checks, "node ready");
            ReadinessState::Ready { peers: count }
        } else {
            ReadinessState::Polling { last_count: count }
        };
        self.state
    }

    /// Suspend until at least one peer is connected. Never times out.
    ///
    /// Returns the peer count seen by the final check.
    pub async fn await_ready<R>(&mut self, routing: &R) -> usize
    where
        R: PeerRouting + ?Sized,
    {
        loop {
            if let ReadinessState::Ready { peers } = self.check(routing).await {
                return peers;
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
