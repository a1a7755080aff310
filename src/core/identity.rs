use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::utils::DhtError;

/// Network location of a peer, used both as a routing-table key and as a
/// dial target.
///
/// Equality is exact: host strings are compared textually and are never
/// normalized, so `localhost:9000` and `127.0.0.1:9000` are distinct peers.
/// Callers must use one consistent representation per node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerAddress {
    pub host: String,
    pub port: u16,
}

impl PeerAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for PeerAddress {
    type Err = DhtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| DhtError::InvalidAddress(format!("missing port in '{}'", s)))?;
        if host.is_empty() {
            return Err(DhtError::InvalidAddress(format!("missing host in '{}'", s)));
        }
        let port = port
            .parse::<u16>()
            .map_err(|_| DhtError::InvalidAddress(format!("bad port in '{}'", s)))?;
        Ok(Self::new(host, port))
    }
}

/// Stable identity of a node, fixed at construction.
#[derive(Clone, Debug)]
pub struct NodeIdentity {
    pub address: PeerAddress,
    pub id: String,
}

impl NodeIdentity {
    pub fn from_address(address: PeerAddress) -> Self {
        let id = generate_node_id(&address.host, address.port);
        Self { address, id }
    }
}

/// Derive a node identifier from its address: the first 16 hex characters of
/// SHA-256 over `host:port`. Deterministic, so the same address yields the
/// same id across restarts. A diagnostic label, not a routing metric.
pub fn generate_node_id(host: &str, port: u16) -> String {
    let unique = format!("{}:{}", host, port);
    let digest = Sha256::digest(unique.as_bytes());
    hex::encode(digest)[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_is_deterministic() {
        let a = generate_node_id("127.0.0.1", 9000);
        let b = generate_node_id("127.0.0.1", 9000);
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_node_id_varies_with_address() {
        assert_ne!(
            generate_node_id("127.0.0.1", 9000),
            generate_node_id("127.0.0.1", 9001)
        );
        assert_ne!(
            generate_node_id("10.0.0.1", 9000),
            generate_node_id("10.0.0.2", 9000)
        );
    }

    #[test]
    fn test_address_parse_and_display() {
        let addr: PeerAddress = "192.168.1.5:8080".parse().unwrap();
        assert_eq!(addr.host, "192.168.1.5");
        assert_eq!(addr.port, 8080);
        assert_eq!(addr.to_string(), "192.168.1.5:8080");
    }

    #[test]
    fn test_address_parse_rejects_garbage() {
        assert!("no-port-here".parse::<PeerAddress>().is_err());
        assert!(":9000".parse::<PeerAddress>().is_err());
        assert!("host:notaport".parse::<PeerAddress>().is_err());
        assert!("host:99999".parse::<PeerAddress>().is_err());
    }

    #[test]
    fn test_no_host_normalization() {
        let a = PeerAddress::new("localhost", 9000);
        let b = PeerAddress::new("127.0.0.1", 9000);
        assert_ne!(a, b);
    }

    #[test]
    fn test_identity_from_address() {
        let identity = NodeIdentity::from_address(PeerAddress::new("127.0.0.1", 4000));
        assert_eq!(identity.id, generate_node_id("127.0.0.1", 4000));
    }
}
