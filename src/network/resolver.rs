use log::{debug, info, warn};

use crate::core::protocol::{Request, Response, DEFAULT_FIND_TTL};
use crate::network::{PeerClient, RoutingTable};
use crate::storage::{content_key, KeyStore};

/// Lookup resolution: local store first, then a flood search over known peers.
///
/// The search is deliberately naive — a linear scan of the routing table, one
/// peer at a time, first hit wins. No distance metric, no parallel fan-out,
/// no aggregation, and no verification of a remote node's claim. Total miss
/// latency is the sum of each contacted peer's round trip. The only bound on
/// recursion is the hop budget threaded through forwarded requests.
#[derive(Clone)]
pub struct Resolver {
    store: KeyStore,
    routing: RoutingTable,
    client: PeerClient,
    own_address: String,
}

impl Resolver {
    pub fn new(
        store: KeyStore,
        routing: RoutingTable,
        client: PeerClient,
        own_address: String,
    ) -> Self {
        Self {
            store,
            routing,
            client,
            own_address,
        }
    }

    /// Resolve `key` to a peer list.
    ///
    /// The local store is authoritative: a local hit short-circuits the
    /// network search entirely. On a miss, peers from a routing-table
    /// snapshot are tried sequentially in insertion order, forwarding the
    /// lookup with a decremented hop budget; an unreachable or empty-handed
    /// peer is skipped, never fatal. Exhaustion yields `NotFound`.
    pub async fn find(&self, key: &str, ttl: u8) -> Response {
        if let Some(peers) = self.store.get(key).await {
            debug!("find {}: local hit ({} peers)", key, peers.len());
            return Response::Found { peers };
        }

        if ttl == 0 {
            debug!("find {}: hop budget exhausted", key);
            return Response::NotFound;
        }

        for peer in self.routing.snapshot().await {
            let request = Request::Find {
                key: key.to_string(),
                ttl: Some(ttl - 1),
            };
            match self.client.send(&peer, &request).await {
                Ok(Response::Found { peers }) if !peers.is_empty() => {
                    info!("find {}: answered by {}", key, peer);
                    return Response::Found { peers };
                }
                Ok(_) => debug!("find {}: {} has no match", key, peer),
                Err(e) => warn!("find {}: skipping {}: {}", key, peer, e),
            }
        }

        debug!("find {}: no peer had a match", key);
        Response::NotFound
    }

    /// Advertise a file held by this node: derive its content key and record
    /// our own address as a holder. Returns the key.
    pub async fn store_file(&self, name: &str) -> String {
        let key = content_key(name);
        self.store.put(&key, &self.own_address).await;
        info!("advertising '{}' as {}", name, &key[..16]);
        key
    }

    /// Look up a file by name: same key derivation as [`store_file`], then a
    /// full-budget [`find`].
    ///
    /// [`store_file`]: Resolver::store_file
    /// [`find`]: Resolver::find
    pub async fn find_file(&self, name: &str) -> Response {
        self.find(&content_key(name), DEFAULT_FIND_TTL).await
    }
}
