use log::debug;
use tokio::time::Duration;

use crate::core::protocol::{decode_response, encode_request, Request, Response};
use crate::core::PeerAddress;
use crate::network::Transport;
use crate::utils::{DhtError, Result};

/// Outbound side of the protocol: one connection, one request, one response.
///
/// There are no persistent sessions; every call dials the peer fresh and the
/// socket is dropped on every exit path. Failures never propagate past the
/// call — a dead peer is the caller's signal to move on, not to abort.
#[derive(Clone)]
pub struct PeerClient {
    deadline: Duration,
}

impl PeerClient {
    pub fn new(deadline: Duration) -> Self {
        Self { deadline }
    }

    /// Single round trip: connect, write the request, read one bounded
    /// response, decode. Exactly one write and one read per call.
    pub async fn send(&self, addr: &PeerAddress, request: &Request) -> Result<Response> {
        let mut stream = Transport::connect(&addr.to_string(), self.deadline).await?;

        Transport::write_message(&mut stream, &encode_request(request), self.deadline).await?;

        let bytes = Transport::read_message(&mut stream, self.deadline)
            .await?
            .ok_or_else(|| {
                DhtError::Transport(format!("{}: closed before responding", addr))
            })?;

        decode_response(&bytes)
    }

    /// True iff the peer answers a `ping` with `alive`. Any transport or
    /// decode failure is logged and reported as false.
    pub async fn ping(&self, addr: &PeerAddress) -> bool {
        match self.send(addr, &Request::Ping).await {
            Ok(Response::Alive) => true,
            Ok(other) => {
                debug!("ping {}: unexpected reply {:?}", addr, other);
                false
            }
            Err(e) => {
                debug!("ping {}: {}", addr, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    fn client() -> PeerClient {
        PeerClient::new(Duration::from_secs(1))
    }

    async fn fake_peer(reply: &'static [u8]) -> PeerAddress {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            // Read whatever the client sent, then answer with the canned reply.
            let _ = Transport::read_message(&mut stream, Duration::from_secs(1)).await;
            let _ = stream.write_all(reply).await;
        });
        PeerAddress::new("127.0.0.1", port)
    }

    #[tokio::test]
    async fn test_ping_true_on_alive() {
        let addr = fake_peer(br#"{"status": "alive"}"#).await;
        assert!(client().ping(&addr).await);
    }

    #[tokio::test]
    async fn test_ping_false_on_unexpected_reply() {
        let addr = fake_peer(br#"{"error": "invalid command"}"#).await;
        assert!(!client().ping(&addr).await);
    }

    #[tokio::test]
    async fn test_ping_false_on_garbage_reply() {
        let addr = fake_peer(b"}{ nonsense").await;
        assert!(!client().ping(&addr).await);
    }

    #[tokio::test]
    async fn test_ping_false_when_nothing_listens() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = PeerAddress::new("127.0.0.1", listener.local_addr().unwrap().port());
        drop(listener);

        assert!(!client().ping(&addr).await);
    }

    #[tokio::test]
    async fn test_send_decodes_found_response() {
        let addr = fake_peer(br#"{"peers": ["10.0.0.1:9000"]}"#).await;
        let response = client()
            .send(
                &addr,
                &Request::Find {
                    key: "k".into(),
                    ttl: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(
            response,
            Response::Found {
                peers: vec!["10.0.0.1:9000".into()]
            }
        );
    }

    #[tokio::test]
    async fn test_send_errors_when_peer_closes_silently() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            drop(stream);
        });

        let addr = PeerAddress::new("127.0.0.1", port);
        assert!(client().send(&addr, &Request::Ping).await.is_err());
    }
}
