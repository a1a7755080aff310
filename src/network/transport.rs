use log::debug;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{timeout, Duration};

use crate::core::protocol::MAX_MESSAGE_BYTES;
use crate::utils::{DhtError, Result};

/// Raw stream operations shared by the listener and the peer client.
///
/// Messages are not framed: each side performs exactly one bounded read of at
/// most [`MAX_MESSAGE_BYTES`] per connection. Whatever arrives in that read is
/// the message; anything beyond the ceiling is truncated and will fail to
/// decode. The per-call timeout keeps a stalled peer from blocking a handler
/// or a lookup forever.
pub struct Transport;

impl Transport {
    pub async fn connect(addr: &str, deadline: Duration) -> Result<TcpStream> {
        let stream = timeout(deadline, TcpStream::connect(addr))
            .await
            .map_err(|_| DhtError::Timeout(format!("connecting to {}", addr)))?
            .map_err(|e| DhtError::ConnectionFailed(format!("{}: {}", addr, e)))?;

        debug!("connected to {}", addr);
        Ok(stream)
    }

    /// Single bounded read. `None` means the peer closed without sending.
    pub async fn read_message(stream: &mut TcpStream, deadline: Duration) -> Result<Option<Vec<u8>>> {
        let mut buffer = vec![0u8; MAX_MESSAGE_BYTES];

        let n = timeout(deadline, stream.read(&mut buffer))
            .await
            .map_err(|_| DhtError::Timeout("waiting for message".into()))?
            .map_err(|e| DhtError::Transport(format!("read: {}", e)))?;

        if n == 0 {
            return Ok(None);
        }
        buffer.truncate(n);
        Ok(Some(buffer))
    }

    pub async fn write_message(
        stream: &mut TcpStream,
        bytes: &[u8],
        deadline: Duration,
    ) -> Result<()> {
        timeout(deadline, async {
            stream.write_all(bytes).await?;
            stream.flush().await
        })
        .await
        .map_err(|_| DhtError::Timeout("writing message".into()))?
        .map_err(|e| DhtError::Transport(format!("write: {}", e)))?;
        Ok(())
    }
}
