pub mod error;
pub mod logger;

pub use error::{DhtError, Result};
pub use logger::setup_logging;
