use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The node's local record of content keys and the peers known to hold them.
///
/// Append-only per key: storing for an existing key appends to its peer list,
/// duplicates included. Nothing is ever removed. Cloning is cheap and all
/// clones share the same map, so one store can serve every connection handler
/// concurrently without losing appends.
#[derive(Clone, Default)]
pub struct KeyStore {
    entries: Arc<RwLock<HashMap<String, Vec<String>>>>,
}

impl KeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the list for `key`, creating the list on first use.
    /// No deduplication: storing the same value twice keeps both copies.
    pub async fn put(&self, key: &str, value: &str) {
        let mut entries = self.entries.write().await;
        entries
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
    }

    pub async fn get(&self, key: &str) -> Option<Vec<String>> {
        let entries = self.entries.read().await;
        entries.get(key).cloned()
    }

    /// Number of distinct keys held locally.
    pub async fn key_count(&self) -> usize {
        let entries = self.entries.read().await;
        entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_get() {
        let store = KeyStore::new();
        store.put("k1", "127.0.0.1:9000").await;

        assert_eq!(store.get("k1").await, Some(vec!["127.0.0.1:9000".into()]));
        assert_eq!(store.get("missing").await, None);
    }

    #[tokio::test]
    async fn test_put_appends_instead_of_replacing() {
        let store = KeyStore::new();
        store.put("k1", "a:1").await;
        store.put("k1", "b:2").await;

        assert_eq!(
            store.get("k1").await,
            Some(vec!["a:1".into(), "b:2".into()])
        );
    }

    #[tokio::test]
    async fn test_duplicate_values_are_kept() {
        let store = KeyStore::new();
        store.put("k1", "a:1").await;
        store.put("k1", "a:1").await;

        assert_eq!(
            store.get("k1").await,
            Some(vec!["a:1".into(), "a:1".into()])
        );
    }

    #[tokio::test]
    async fn test_concurrent_appends_all_land() {
        let store = KeyStore::new();

        let mut handles = Vec::new();
        for i in 0..50 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.put("shared", &format!("peer-{}", i)).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let values = store.get("shared").await.unwrap();
        assert_eq!(values.len(), 50);
        for i in 0..50 {
            assert!(values.contains(&format!("peer-{}", i)));
        }
    }
}
