use std::sync::Arc;
use tokio::sync::RwLock;

use crate::core::PeerAddress;

/// The node's record of peers it has successfully pinged.
///
/// A flat, insertion-ordered set. Membership means a `ping` to that address
/// once returned alive; it says nothing about liveness now. The table only
/// grows: there is no eviction and no re-check. Clones share the same
/// underlying list.
#[derive(Clone, Default)]
pub struct RoutingTable {
    peers: Arc<RwLock<Vec<PeerAddress>>>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a confirmed peer. Returns false if it was already present;
    /// re-adding keeps the original position.
    pub async fn insert(&self, addr: PeerAddress) -> bool {
        let mut peers = self.peers.write().await;
        if peers.contains(&addr) {
            return false;
        }
        peers.push(addr);
        true
    }

    pub async fn contains(&self, addr: &PeerAddress) -> bool {
        let peers = self.peers.read().await;
        peers.contains(addr)
    }

    /// Clone the current peer list in insertion order. Lookups iterate this
    /// snapshot so no lock is held across network calls; peers added after
    /// the snapshot are not seen by an in-flight search.
    pub async fn snapshot(&self) -> Vec<PeerAddress> {
        let peers = self.peers.read().await;
        peers.clone()
    }

    pub async fn len(&self) -> usize {
        let peers = self.peers.read().await;
        peers.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(port: u16) -> PeerAddress {
        PeerAddress::new("127.0.0.1", port)
    }

    #[tokio::test]
    async fn test_insert_preserves_order() {
        let table = RoutingTable::new();
        table.insert(addr(9001)).await;
        table.insert(addr(9002)).await;
        table.insert(addr(9003)).await;

        assert_eq!(
            table.snapshot().await,
            vec![addr(9001), addr(9002), addr(9003)]
        );
    }

    #[tokio::test]
    async fn test_insert_is_idempotent() {
        let table = RoutingTable::new();
        assert!(table.insert(addr(9001)).await);
        assert!(table.insert(addr(9002)).await);
        assert!(!table.insert(addr(9001)).await);

        assert_eq!(table.len().await, 2);
        // The duplicate insert keeps the original position.
        assert_eq!(table.snapshot().await, vec![addr(9001), addr(9002)]);
    }

    #[tokio::test]
    async fn test_snapshot_is_detached() {
        let table = RoutingTable::new();
        table.insert(addr(9001)).await;

        let snapshot = table.snapshot().await;
        table.insert(addr(9002)).await;

        assert_eq!(snapshot.len(), 1);
        assert_eq!(table.len().await, 2);
    }

    #[tokio::test]
    async fn test_contains() {
        let table = RoutingTable::new();
        table.insert(addr(9001)).await;

        assert!(table.contains(&addr(9001)).await);
        assert!(!table.contains(&addr(9002)).await);
    }
}
