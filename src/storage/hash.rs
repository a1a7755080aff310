use sha2::{Digest, Sha256};

/// Derive the content key for a file name: full SHA-256, hex encoded.
/// Every node derives the same key for the same name, which is what lets a
/// lookup on one node match a store made on another.
pub fn content_key(name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_key_is_deterministic() {
        assert_eq!(content_key("report.txt"), content_key("report.txt"));
        assert_ne!(content_key("report.txt"), content_key("report.pdf"));
    }

    #[test]
    fn test_content_key_shape() {
        let key = content_key("report.txt");
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
