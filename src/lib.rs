//! Mini DHT
//!
//! A minimal peer-to-peer node that advertises file availability and answers
//! lookups across a loosely connected set of peers. Each node keeps a local
//! map from content key to the peers known to hold it, serves one-shot
//! request/response connections, and resolves misses with a flood search over
//! its known peers — a flat linear scan, not a routed lookup.

pub mod core;
pub mod network;
pub mod storage;
pub mod utils;

// Re-export main types
pub use core::{
    generate_node_id, Config, Node, NodeIdentity, PeerAddress, Request, Response,
    DEFAULT_FIND_TTL, MAX_MESSAGE_BYTES,
};
pub use network::{Listener, PeerClient, Resolver, RoutingTable};
pub use storage::{content_key, KeyStore};
pub use utils::{
    error::{DhtError, Result},
    setup_logging,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
