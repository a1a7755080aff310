use log::{debug, info, warn};
use tokio::net::TcpListener;

use crate::core::protocol::{Response, DEFAULT_FIND_TTL};
use crate::core::{Config, NodeIdentity, PeerAddress};
use crate::network::{Listener, PeerClient, Resolver, RoutingTable};
use crate::storage::KeyStore;
use crate::utils::Result;

/// A peer node: local key store, routing table, accept loop, and the lookup
/// machinery, tied to one immutable identity.
///
/// The four entry points a caller drives — [`store_file`], [`find_file`],
/// [`connect_to_peer`], [`ping`] — plus the accept loop started at bind time
/// are the whole external surface.
///
/// [`store_file`]: Node::store_file
/// [`find_file`]: Node::find_file
/// [`connect_to_peer`]: Node::connect_to_peer
/// [`ping`]: Node::ping
pub struct Node {
    identity: NodeIdentity,
    config: Config,
    store: KeyStore,
    routing: RoutingTable,
    client: PeerClient,
    resolver: Resolver,
    listener: Option<Listener>,
}

impl Node {
    /// Bind the listening socket, fix the node's identity from the address
    /// actually bound, and start accepting connections.
    pub async fn bind(config: Config) -> Result<Node> {
        let socket = TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;
        let bound_port = socket.local_addr()?.port();

        let identity = NodeIdentity::from_address(PeerAddress::new(config.host.clone(), bound_port));
        let store = KeyStore::new();
        let routing = RoutingTable::new();
        let client = PeerClient::new(config.timeout());
        let resolver = Resolver::new(
            store.clone(),
            routing.clone(),
            client.clone(),
            identity.address.to_string(),
        );

        let listener = Listener::spawn(socket, store.clone(), resolver.clone(), config.timeout())?;
        info!("node {} listening on {}", identity.id, identity.address);

        Ok(Self {
            identity,
            config,
            store,
            routing,
            client,
            resolver,
            listener: Some(listener),
        })
    }

    pub fn id(&self) -> &str {
        &self.identity.id
    }

    pub fn address(&self) -> &PeerAddress {
        &self.identity.address
    }

    /// Greet each configured bootstrap peer. Unreachable or unparseable
    /// entries are logged and skipped.
    pub async fn connect_bootstrap_peers(&self) {
        for entry in self.config.bootstrap_peers.clone() {
            match entry.parse::<PeerAddress>() {
                Ok(addr) => {
                    self.connect_to_peer(addr).await;
                }
                Err(e) => warn!("skipping bootstrap peer '{}': {}", entry, e),
            }
        }
    }

    /// One liveness round trip to `addr`. Does not touch the routing table.
    pub async fn ping(&self, addr: &PeerAddress) -> bool {
        self.client.ping(addr).await
    }

    /// Ping `addr` and, on success, record it as a known peer. This is the
    /// only path that grows the routing table; on failure the table is left
    /// untouched.
    pub async fn connect_to_peer(&self, addr: PeerAddress) -> bool {
        if !self.client.ping(&addr).await {
            warn!("could not reach peer {}", addr);
            return false;
        }
        if self.routing.insert(addr.clone()).await {
            info!("added peer {}", addr);
        } else {
            debug!("peer {} already known", addr);
        }
        true
    }

    /// Advertise a file held by this node. Returns its content key.
    pub async fn store_file(&self, name: &str) -> String {
        self.resolver.store_file(name).await
    }

    /// Look up which peers hold a file, local store first, then the network.
    pub async fn find_file(&self, name: &str) -> Response {
        self.resolver.find_file(name).await
    }

    /// Look up an already-derived content key.
    pub async fn find(&self, key: &str) -> Response {
        self.resolver.find(key, DEFAULT_FIND_TTL).await
    }

    /// Known peers, in the order they were added.
    pub async fn peers(&self) -> Vec<PeerAddress> {
        self.routing.snapshot().await
    }

    /// Distinct content keys held locally.
    pub async fn key_count(&self) -> usize {
        self.store.key_count().await
    }

    /// Stop the accept loop. In-flight handlers run to completion.
    pub async fn shutdown(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.shutdown().await;
        }
    }
}
