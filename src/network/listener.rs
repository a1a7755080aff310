use log::{debug, error, info, warn};
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

use crate::core::protocol::{
    decode_request, encode_response, Request, Response, DEFAULT_FIND_TTL,
};
use crate::network::{Resolver, Transport};
use crate::storage::KeyStore;
use crate::utils::Result;

/// Inbound side of the protocol: accept loop plus per-connection handlers.
///
/// Each accepted connection gets its own spawned task that reads one request,
/// dispatches it, writes one response, and drops the socket — on every path,
/// including decode and write failures. The accept loop never stops for a
/// failed accept or a misbehaving handler; the only way down is `shutdown`,
/// which exists so tests (and a clean process exit) can stop the task.
pub struct Listener {
    local_addr: SocketAddr,
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl Listener {
    /// Take ownership of a bound socket and start accepting.
    pub fn spawn(
        listener: TcpListener,
        store: KeyStore,
        resolver: Resolver,
        deadline: Duration,
    ) -> Result<Self> {
        let local_addr = listener.local_addr()?;
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("listener on {} shutting down", local_addr);
                        break;
                    }
                    accepted = listener.accept() => match accepted {
                        Ok((stream, peer)) => {
                            debug!("connection from {}", peer);
                            let store = store.clone();
                            let resolver = resolver.clone();
                            tokio::spawn(async move {
                                handle_connection(stream, peer, store, resolver, deadline).await;
                            });
                        }
                        Err(e) => {
                            error!("accept failed: {}", e);
                            sleep(Duration::from_millis(100)).await;
                        }
                    }
                }
            }
        });

        Ok(Self {
            local_addr,
            shutdown_tx,
            task,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        let _ = self.task.await;
    }
}

/// One connection, start to finish. The stream is owned here and dropped on
/// every exit path, which closes it.
async fn handle_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    store: KeyStore,
    resolver: Resolver,
    deadline: Duration,
) {
    let bytes = match Transport::read_message(&mut stream, deadline).await {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            debug!("{} closed without sending", peer);
            return;
        }
        Err(e) => {
            debug!("read from {} failed: {}", peer, e);
            return;
        }
    };

    // An undecodable payload drops the connection without a response.
    let request = match decode_request(&bytes) {
        Ok(request) => request,
        Err(e) => {
            warn!("dropping undecodable message from {}: {}", peer, e);
            return;
        }
    };

    let response = dispatch(request, &store, &resolver).await;

    if let Err(e) = Transport::write_message(&mut stream, &encode_response(&response), deadline).await
    {
        warn!("failed to respond to {}: {}", peer, e);
    }
}

async fn dispatch(request: Request, store: &KeyStore, resolver: &Resolver) -> Response {
    match request {
        Request::Ping => Response::Alive,
        Request::Store { key, value } => {
            store.put(&key, &value).await;
            Response::Stored { key }
        }
        Request::Find { key, ttl } => {
            resolver.find(&key, ttl.unwrap_or(DEFAULT_FIND_TTL)).await
        }
        Request::Unknown => Response::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{PeerClient, RoutingTable};

    fn parts() -> (KeyStore, Resolver) {
        let store = KeyStore::new();
        let resolver = Resolver::new(
            store.clone(),
            RoutingTable::new(),
            PeerClient::new(Duration::from_millis(200)),
            "127.0.0.1:9000".into(),
        );
        (store, resolver)
    }

    #[tokio::test]
    async fn test_dispatch_ping() {
        let (store, resolver) = parts();
        assert_eq!(dispatch(Request::Ping, &store, &resolver).await, Response::Alive);
    }

    #[tokio::test]
    async fn test_dispatch_store_appends_and_acknowledges() {
        let (store, resolver) = parts();
        let request = Request::Store {
            key: "k1".into(),
            value: "10.0.0.1:4000".into(),
        };
        assert_eq!(
            dispatch(request, &store, &resolver).await,
            Response::Stored { key: "k1".into() }
        );
        assert_eq!(store.get("k1").await, Some(vec!["10.0.0.1:4000".into()]));
    }

    #[tokio::test]
    async fn test_dispatch_find_miss() {
        let (store, resolver) = parts();
        let request = Request::Find {
            key: "missing".into(),
            ttl: None,
        };
        assert_eq!(dispatch(request, &store, &resolver).await, Response::NotFound);
    }

    #[tokio::test]
    async fn test_dispatch_unknown_is_invalid() {
        let (store, resolver) = parts();
        assert_eq!(
            dispatch(Request::Unknown, &store, &resolver).await,
            Response::Invalid
        );
    }
}
