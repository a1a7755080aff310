pub mod client;
pub mod listener;
pub mod resolver;
pub mod routing;
pub mod transport;

pub use client::PeerClient;
pub use listener::Listener;
pub use resolver::Resolver;
pub use routing::RoutingTable;
pub use transport::Transport;
