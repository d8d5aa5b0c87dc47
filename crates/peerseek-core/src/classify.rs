//! Turns raw progress events into status records.
//!
//! Pure and infallible. An event yields zero, one or two records; unknown
//! event kinds yield none.

use serde::Serialize;

use crate::event::{PeerResponse, ProgressEvent, QueryError};
use crate::status::StatusRecord;

// ── Error translation ─────────────────────────────────────────────────────────

/// Dial failure phrasings that are meaningless to an operator, mapped to
/// something readable. Matched as substrings of the node's error text, which
/// is not a stable interface; update the table when the node's wording moves.
const GATER_DENIED: &str = "connection gater denied all addresses";
const NO_VALID_ADDRESSES: &str = "dial request has no valid addresses";
const AGGREGATE_REJECTION: &str = "All promises were rejected";

/// Render a routing error for the operator.
///
/// Priority: gater denial, unsupported addresses, aggregate rejection (the
/// sub-errors are shown verbatim), then the raw message. An aggregate
/// rejection without sub-errors falls through to the raw message.
pub fn describe_error(code: Option<&str>, message: &str, errors: &[String]) -> String {
    let with_code = |text: &str| match code {
        Some(code) => format!("{code} {text}"),
        None => text.to_string(),
    };

    if message.contains(GATER_DENIED) {
        with_code("The remote peer had no public addresses")
    } else if message.contains(NO_VALID_ADDRESSES) {
        with_code("The remote peer had no supported addresses")
    } else if message.contains(AGGREGATE_REJECTION) && !errors.is_empty() {
        errors.join(", ")
    } else {
        with_code(message)
    }
}

// ── Classifier ────────────────────────────────────────────────────────────────

/// Map one progress event to the records the console should show, in order.
pub fn classify(event: &ProgressEvent) -> Vec<StatusRecord> {
    match event {
        ProgressEvent::DialAttempt { peer, name } => {
            vec![StatusRecord::neutral(format!("{peer} {name}"))]
        }
        ProgressEvent::QuerySent {
            to,
            name,
            message_name,
        } => vec![StatusRecord::neutral(format!("{to} {name} {message_name}"))],
        ProgressEvent::PeerResponse(response) => classify_response(response),
        ProgressEvent::QueryError(error) => vec![classify_query_error(error)],
        ProgressEvent::Other { .. } => Vec::new(),
    }
}

fn classify_response(response: &PeerResponse) -> Vec<StatusRecord> {
    let mut records = Vec::with_capacity(2);

    if !response.closer.is_empty() {
        let closer = response
            .closer
            .iter()
            .map(|peer| peer.id.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        records.push(StatusRecord::active(format!(
            "{} {} Closer nodes {}",
            response.from, response.name, closer
        )));
    }

    records.push(StatusRecord::success(pretty(response)));
    records
}

fn classify_query_error(error: &QueryError) -> StatusRecord {
    let text = describe_error(
        error.error.code.as_deref(),
        &error.error.message,
        &error.errors,
    );
    StatusRecord::error(format!("{} {} {}", error.from, error.name, text))
}

/// Pretty-printed JSON, falling back to debug formatting.
pub fn pretty<T: Serialize + std::fmt::Debug>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| format!("{value:#?}"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
