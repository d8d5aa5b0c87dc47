//! peerseek-core — data model for a narrated DHT peer lookup.
//! The services and console crates depend on this one.

pub mod classify;
pub mod config;
pub mod event;
pub mod peer_id;
pub mod status;

pub use classify::{classify, describe_error};
pub use event::{ErrorDetail, PeerInfo, PeerResponse, ProgressEvent, QueryError};
pub use peer_id::{PeerId, PeerIdError};
pub use status::{Category, StatusRecord};
