//! Console controller: startup sequence and per-submission lookups.

use peerseek_core::config::EXAMPLE_PEER_ID;
use peerseek_core::{PeerId, StatusRecord};

use crate::lookup::{LookupSession, Outcome};
use crate::readiness::ReadinessMonitor;
use crate::routing::PeerRouting;
use crate::sink::StatusSink;

pub struct Console<R, S> {
    routing: R,
    sink: S,
    session: LookupSession,
    example_peer_id: String,
}

impl<R, S> Console<R, S>
where
    R: PeerRouting,
    S: StatusSink,
{
    pub fn new(routing: R, sink: S, session: LookupSession) -> Self {
        Self {
            routing,
            sink,
            session,
            example_peer_id: EXAMPLE_PEER_ID.to_string(),
        }
    }

    /// Peer id suggested to the operator once the node is ready.
    pub fn with_example(mut self, peer_id: impl Into<String>) -> Self {
        self.example_peer_id = peer_id.into();
        self
    }

    pub fn routing(&self) -> &R {
        &self.routing
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Wait for the node to connect to the network, then invite input.
    ///
    /// Returns the peer count seen when readiness was reached.
    pub async fn start(&mut self, monitor: &mut ReadinessMonitor) -> usize {
        self.sink.reset();
        self.sink.append(StatusRecord::neutral("Waiting for peers..."));

        let peers = monitor.await_ready(&self.routing).await;

        self.sink.reset();
        self.sink.append(StatusRecord::active("Node ready"));
        self.sink.append(StatusRecord::active("Try finding a Peer ID"));
        self.sink
            .append(StatusRecord::active(format!("E.g. {}", self.example_peer_id)));
        peers
    }

    /// Validate raw operator input and run one lookup for it.
    ///
    /// Invalid input produces a single error record and no lookup; `None` is
    /// returned in that case.
    pub async fn submit_lookup(&mut self, raw: &str) -> Option<Outcome> {
        let peer: PeerId = match raw.parse() {
            Ok(peer) => peer,
            Err(e) => {
                tracing::debug!(input = raw, error = %e, "rejected peer id");
                self.sink.append(StatusRecord::error(e.to_string()));
                return None;
            }
        };

        Some(self.session.run(&self.routing, &peer, &mut self.sink).await)
    }
}
