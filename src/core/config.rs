use serde::{Deserialize, Serialize};
use tokio::time::Duration;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Host to bind and to advertise as our own address. Peers compare
    /// addresses textually, so pick one representation and stick with it.
    pub host: String,
    /// Port to bind. 0 picks an ephemeral port (the node's identity is
    /// derived from the port actually bound).
    pub port: u16,
    /// Peers (`host:port`) to greet at startup.
    pub bootstrap_peers: Vec<String>,
    /// Per-call network timeout, applied separately to connect, read, and
    /// write. The wire protocol itself carries no deadline.
    pub timeout_secs: u64,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            bootstrap_peers: Vec::new(),
            timeout_secs: 5,
        }
    }
}
