use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Keyed store where every entry carries its own expiry.
///
/// An entry is readable only while `now < expires_at`; after that `get`
/// reports a miss and drops the stale entry. There is no eviction beyond
/// TTL expiry, the key space is bounded by the currency and symbol
/// combinations actually requested.
#[derive(Clone)]
pub struct TtlCache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Arc<Mutex<HashMap<K, CacheEntry<V>>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + std::fmt::Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        let mut cache = self.inner.lock().await;
        match cache.get(key) {
            Some(entry) if Instant::now() < entry.expires_at => {
                debug!("Cache HIT for key: {:?}", key);
                Some(entry.value.clone())
            }
            Some(_) => {
                debug!("Cache entry expired for key: {:?}", key);
                cache.remove(key);
                None
            }
            None => {
                debug!("Cache MISS for key: {:?}", key);
                None
            }
        }
    }

    /// Stores `value` until `now + ttl`, overwriting any prior entry.
    pub async fn put(&self, key: K, value: V, ttl: Duration) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        let mut cache = self.inner.lock().await;
        debug!("Cache PUT for key: {:?}", key);
        cache.insert(key, entry);
    }
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash + std::fmt::Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}
