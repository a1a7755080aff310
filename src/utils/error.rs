use thiserror::Error;

pub type Result<T> = std::result::Result<T, DhtError>;

#[derive(Error, Debug)]
pub enum DhtError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("malformed message: {0}")]
    MalformedMessage(String),

    #[error("invalid peer address: {0}")]
    InvalidAddress(String),
}

impl From<std::io::Error> for DhtError {
    fn from(err: std::io::Error) -> Self {
        DhtError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DhtError {
    fn from(err: serde_json::Error) -> Self {
        DhtError::MalformedMessage(err.to_string())
    }
}
