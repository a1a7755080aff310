pub mod config;
pub mod identity;
pub mod node;
pub mod protocol;

pub use config::Config;
pub use identity::{generate_node_id, NodeIdentity, PeerAddress};
pub use node::Node;
pub use protocol::{Request, Response, DEFAULT_FIND_TTL, MAX_MESSAGE_BYTES};
