//! Routing over a running Kubo node's HTTP RPC API.
//!
//! `routing/findpeer` with `verbose=true` streams one JSON query event per
//! line while the DHT walk runs:
//!
//!   {"Type":7,"ID":"Qm…","Responses":null,"Extra":""}
//!   {"Type":1,"ID":"Qm…","Responses":[{"ID":"Qm…","Addrs":["/ip4/…"]}],"Extra":""}
//!   {"Type":2,"ID":"","Responses":[{"ID":"<target>","Addrs":[…]}],"Extra":""}
//!
//! Type 2 (final peer) carries the answer; every other type is progress.

use std::time::Duration;

use async_trait::async_trait;
use bytes::{Buf, BytesMut};
use serde::Deserialize;

use peerseek_core::event::{stage, FIND_NODE};
use peerseek_core::{ErrorDetail, PeerId, PeerInfo, PeerResponse, ProgressEvent, QueryError};

use crate::routing::{PeerRouting, RoutingError};

/// Bound for the short control calls (`id`, `swarm/peers`). Lookups are
/// bounded by the session deadline instead.
const CONTROL_TIMEOUT: Duration = Duration::from_secs(10);

// ── Wire types ────────────────────────────────────────────────────────────────

/// Query event types as numbered by the node.
mod event_type {
    pub const SENDING_QUERY: u8 = 0;
    pub const PEER_RESPONSE: u8 = 1;
    pub const FINAL_PEER: u8 = 2;
    pub const QUERY_ERROR: u8 = 3;
    pub const PROVIDER: u8 = 4;
    pub const VALUE: u8 = 5;
    pub const ADDING_PEER: u8 = 6;
    pub const DIALING_PEER: u8 = 7;
}

#[derive(Debug, Deserialize)]
struct QueryEvent {
    #[serde(rename = "Type")]
    kind: u8,
    #[serde(rename = "ID", default)]
    id: String,
    #[serde(rename = "Responses", default)]
    responses: Option<Vec<AddrInfo>>,
    #[serde(rename = "Extra", default)]
    extra: String,
}

#[derive(Debug, Deserialize)]
struct AddrInfo {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Addrs", default)]
    addrs: Option<Vec<String>>,
}

impl From<AddrInfo> for PeerInfo {
    fn from(info: AddrInfo) -> Self {
        PeerInfo::new(info.id, info.addrs.unwrap_or_default())
    }
}

/// Error body returned by the RPC API, either as a whole response or
/// in-line in a stream.
#[derive(Debug, Deserialize)]
struct RpcError {
    #[serde(rename = "Message")]
    message: String,
}

#[derive(Debug, Deserialize)]
struct IdResponse {
    #[serde(rename = "ID")]
    id: String,
}

#[derive(Debug, Deserialize)]
struct SwarmPeersResponse {
    #[serde(rename = "Peers", default)]
    peers: Option<Vec<SwarmPeer>>,
}

#[derive(Debug, Deserialize)]
struct SwarmPeer {
    #[serde(rename = "Peer")]
    peer: String,
}

// ── Decoding ──────────────────────────────────────────────────────────────────

/// One decoded stream line.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Decoded {
    Progress(ProgressEvent),
    Final(PeerInfo),
}

/// Decode one line of a `routing/findpeer` stream.
pub(crate) fn decode_line(line: &str) -> Result<Decoded, RoutingError> {
    let value: serde_json::Value =
        serde_json::from_str(line).map_err(|e| RoutingError::Decode(format!("{e}: {line}")))?;

    if value.get("Type").and_then(|t| t.as_str()) == Some("error") {
        let err: RpcError =
            serde_json::from_value(value).map_err(|e| RoutingError::Decode(e.to_string()))?;
        return Err(RoutingError::Node {
            code: None,
            message: err.message,
        });
    }

    let event: QueryEvent =
        serde_json::from_value(value).map_err(|e| RoutingError::Decode(format!("{e}: {line}")))?;
    let responses: Vec<PeerInfo> = event
        .responses
        .unwrap_or_default()
        .into_iter()
        .map(PeerInfo::from)
        .collect();

    let progress = match event.kind {
        event_type::FINAL_PEER => {
            return responses
                .into_iter()
                .next()
                .map(Decoded::Final)
                .ok_or_else(|| RoutingError::Decode("final peer event without a peer".into()));
        }
        event_type::DIALING_PEER => ProgressEvent::DialAttempt {
            peer: event.id,
            name: stage::DIAL_PEER.into(),
        },
        event_type::SENDING_QUERY => ProgressEvent::QuerySent {
            to: event.id,
            name: stage::SEND_QUERY.into(),
            message_name: FIND_NODE.into(),
        },
        event_type::PEER_RESPONSE => ProgressEvent::PeerResponse(PeerResponse {
            from: event.id,
            name: stage::PEER_RESPONSE.into(),
            message_name: FIND_NODE.into(),
            closer: responses,
        }),
        event_type::QUERY_ERROR => ProgressEvent::QueryError(QueryError {
            from: event.id,
            name: stage::QUERY_ERROR.into(),
            error: ErrorDetail {
                code: None,
                message: event.extra,
            },
            errors: Vec::new(),
        }),
        event_type::PROVIDER => other("provider"),
        event_type::VALUE => other("value"),
        event_type::ADDING_PEER => other("adding-peer"),
        n => other(&format!("query-event-{n}")),
    };

    Ok(Decoded::Progress(progress))
}

fn other(kind: &str) -> ProgressEvent {
    ProgressEvent::Other { kind: kind.into() }
}

/// Splits a byte stream into newline-terminated lines.
#[derive(Debug, Default)]
pub(crate) struct LineBuffer {
    buf: BytesMut,
}

impl LineBuffer {
    /// Append a chunk and return every line it completed.
    pub(crate) fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
            let line = self.buf.split_to(pos);
            self.buf.advance(1);
            let line = String::from_utf8_lossy(&line).trim().to_string();
            if !line.is_empty() {
                lines.push(line);
            }
        }
        lines
    }

    /// Whatever is left once the stream ends without a trailing newline.
    pub(crate) fn finish(self) -> Option<String> {
        let rest = String::from_utf8_lossy(&self.buf).trim().to_string();
        (!rest.is_empty()).then_some(rest)
    }
}

// ── Client ────────────────────────────────────────────────────────────────────

/// Client for a Kubo node's RPC API.
#[derive(Debug, Clone)]
pub struct KuboClient {
    http: reqwest::Client,
    base: String,
    node_id: String,
}

impl KuboClient {
    /// Reach the node and learn its identity. Fails if the API is not up.
    pub async fn connect(api_url: &str) -> Result<Self, RoutingError> {
        let http = reqwest::Client::new();
        let base = format!("{}/api/v0", api_url.trim_end_matches('/'));

        let resp = http
            .post(format!("{base}/id"))
            .timeout(CONTROL_TIMEOUT)
            .send()
            .await?;
        let info: IdResponse = check_status(resp).await?.json().await?;
        tracing::info!(node = %info.id, api = %base, "connected to node");

        Ok(Self {
            http,
            base,
            node_id: info.id,
        })
    }

    /// The local node's own peer id.
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn api_base(&self) -> &str {
        &self.base
    }
}

#[async_trait]
impl PeerRouting for KuboClient {
    async fn find_peer(
        &self,
        peer: &PeerId,
        on_progress: &mut (dyn FnMut(ProgressEvent) + Send),
    ) -> Result<PeerInfo, RoutingError> {
        // Peer ids are validated base58/base32 text; nothing to escape.
        let url = format!("{}/routing/findpeer?arg={peer}&verbose=true", self.base);
        let mut resp = check_status(self.http.post(url).send().await?).await?;

        let mut lines = LineBuffer::default();
        let mut found = None;
        let mut handle = |line: &str| -> Result<(), RoutingError> {
            match decode_line(line)? {
                Decoded::Progress(event) => on_progress(event),
                Decoded::Final(info) => found = Some(info),
            }
            Ok(())
        };

        while let Some(chunk) = resp.chunk().await? {
            for line in lines.push(&chunk) {
                handle(&line)?;
            }
        }
        if let Some(rest) = lines.finish() {
            handle(&rest)?;
        }

        found.ok_or(RoutingError::NotFound)
    }

    async fn connected_peers(&self) -> Result<Vec<String>, RoutingError> {
        let resp = self
            .http
            .post(format!("{}/swarm/peers", self.base))
            .timeout(CONTROL_TIMEOUT)
            .send()
            .await?;
        let peers: SwarmPeersResponse = check_status(resp).await?.json().await?;
        Ok(peers
            .peers
            .unwrap_or_default()
            .into_iter()
            .map(|p| p.peer)
            .collect())
    }
}

/// Turn a non-2xx response into `RoutingError::Node`.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, RoutingError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<RpcError>(&body)
        .map(|e| e.message)
        .unwrap_or_else(|_| format!("node returned {status}"));
    Err(RoutingError::Node {
        code: None,
        message,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
