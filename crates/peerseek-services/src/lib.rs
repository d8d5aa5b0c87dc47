//! peerseek-services — drives one narrated peer lookup against a running node.
//!
//! `LookupSession` and `ReadinessMonitor` talk to the node only through the
//! `PeerRouting` trait; `KuboClient` is the implementation used in production.

pub mod console;
pub mod kubo;
pub mod lookup;
pub mod readiness;
pub mod routing;
pub mod sink;


pub use console::Console;
pub use kubo::KuboClient;
pub use lookup::{LookupSession, Outcome};
pub use readiness::{ReadinessMonitor, ReadinessState};
pub use routing::{LookupError, PeerRouting, RoutingError};
pub use sink::{RecordingSink, SinkEntry, StatusSink};
