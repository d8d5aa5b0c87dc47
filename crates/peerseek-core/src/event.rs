//! Progress events emitted by the routing subsystem while a lookup runs.
//!
//! The node's vocabulary of diagnostic events grows over time. Anything the
//! console does not recognise lands in `ProgressEvent::Other` and is ignored
//! by the classifier rather than treated as a decode failure.

use serde::{Deserialize, Serialize};

// ── Stage names ───────────────────────────────────────────────────────────────

/// Human-readable stage names carried on each event.
pub mod stage {
    pub const DIAL_PEER: &str = "DIAL_PEER";
    pub const SEND_QUERY: &str = "SEND_QUERY";
    pub const PEER_RESPONSE: &str = "PEER_RESPONSE";
    pub const QUERY_ERROR: &str = "QUERY_ERROR";
}

/// DHT message kind used by a peer lookup.
pub const FIND_NODE: &str = "FIND_NODE";

// ── Peer info ─────────────────────────────────────────────────────────────────

/// A peer and the addresses it is known to listen on.
///
/// This is also the success payload of a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerInfo {
    pub id: String,
    #[serde(default)]
    pub multiaddrs: Vec<String>,
}

impl PeerInfo {
    pub fn new(id: impl Into<String>, multiaddrs: Vec<String>) -> Self {
        Self {
            id: id.into(),
            multiaddrs,
        }
    }
}

// ── Event payloads ────────────────────────────────────────────────────────────

/// A remote peer answered one of our queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerResponse {
    pub from: String,
    pub name: String,
    pub message_name: String,
    /// Peers the responder believes are closer to the target. May be empty.
    pub closer: Vec<PeerInfo>,
}

/// Error description attached to a query-error event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable code, when the node supplies one.
    pub code: Option<String>,
    pub message: String,
}

/// A query to a single remote peer failed. Informational only: the lookup
/// as a whole carries on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryError {
    pub from: String,
    pub name: String,
    pub error: ErrorDetail,
    /// Individual failures when `error` aggregates several dial attempts.
    #[serde(default)]
    pub errors: Vec<String>,
}

// ── Event ─────────────────────────────────────────────────────────────────────

/// One progress notification from the routing collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    DialAttempt {
        peer: String,
        name: String,
    },
    QuerySent {
        to: String,
        name: String,
        message_name: String,
    },
    PeerResponse(PeerResponse),
    QueryError(QueryError),
    /// Any event kind this console does not narrate.
    Other {
        kind: String,
    },
}

impl ProgressEvent {
    /// Short tag used in logs.
    pub fn kind(&self) -> &str {
        match self {
            ProgressEvent::DialAttempt { .. } => "dial-peer",
            ProgressEvent::QuerySent { .. } => "send-query",
            ProgressEvent::PeerResponse(_) => "peer-response",
            ProgressEvent::QueryError(_) => "query-error",
            ProgressEvent::Other { kind } => kind,
        }
    }
}
