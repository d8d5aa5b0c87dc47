//! Routing collaborator interface.
//!
//! The DHT, peer store and connection manager live in the node. This crate
//! only needs two things from it: a peer lookup that reports progress, and a
//! snapshot of current connections.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use peerseek_core::{describe_error, PeerId, PeerInfo, ProgressEvent};

/// What the console needs from a running peer-to-peer node.
#[async_trait]
pub trait PeerRouting: Send + Sync {
    /// Resolve `peer` to its known addresses.
    ///
    /// `on_progress` is called once per event, in the order the node produces
    /// them, before the future settles. Dropping the future cancels the query.
    async fn find_peer(
        &self,
        peer: &PeerId,
        on_progress: &mut (dyn FnMut(ProgressEvent) + Send),
    ) -> Result<PeerInfo, RoutingError>;

    /// Peers the node currently holds a connection to.
    async fn connected_peers(&self) -> Result<Vec<String>, RoutingError>;
}

// ── Errors ────────────────────────────────────────────────────────────────────

/// Terminal failures raised by the routing collaborator.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("routing: not found")]
    NotFound,

    /// The node rejected or failed the request.
    #[error("{}", describe_error(.code.as_deref(), .message, &[]))]
    Node {
        code: Option<String>,
        message: String,
    },

    #[error("request to node failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed response from node: {0}")]
    Decode(String),
}

/// How a lookup session can fail.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("TimeoutError: lookup did not complete within {} ms", .0.as_millis())]
    Timeout(Duration),

    #[error(transparent)]
    Routing(#[from] RoutingError),
}
