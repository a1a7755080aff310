pub mod hash;
pub mod store;

pub use hash::content_key;
pub use store::KeyStore;
