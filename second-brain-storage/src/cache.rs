//! A small LRU cache with per-entry TTL for hybrid/vector search results,
//! so repeated identical queries within a short window skip re-ranking.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::hash::Hash;
use std::time::{Duration, Instant};

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

struct Inner<K, V> {
    order: VecDeque<K>,
    entries: std::collections::HashMap<K, Entry<V>>,
}

pub struct LruQueryCache<K, V> {
    capacity: usize,
    ttl: Duration,
    inner: Mutex<Inner<K, V>>,
}

impl<K, V> LruQueryCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    #[must_use]
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity,
            ttl,
            inner: Mutex::new(Inner {
                order: VecDeque::new(),
                entries: std::collections::HashMap::new(),
            }),
        }
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock();
        let expired = inner
            .entries
            .get(key)
            .map(|e| e.inserted_at.elapsed() >= self.ttl)
            .unwrap_or(true);
        if expired {
            inner.entries.remove(key);
            return None;
        }
        if let Some(pos) = inner.order.iter().position(|k| k == key) {
            let k = inner.order.remove(pos).expect("position just found");
            inner.order.push_back(k);
        }
        inner.entries.get(key).map(|e| e.value.clone())
    }

    pub fn put(&self, key: K, value: V) {
        let mut inner = self.inner.lock();
        if inner.entries.contains_key(&key) {
            if let Some(pos) = inner.order.iter().position(|k| k == &key) {
                inner.order.remove(pos);
            }
        } else if inner.entries.len() >= self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.entries.remove(&oldest);
            }
        }
        inner.order.push_back(key.clone());
        inner.entries.insert(
            key,
            Entry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get_round_trips() {
        let cache: LruQueryCache<String, i32> = LruQueryCache::new(2, Duration::from_secs(60));
        cache.put("a".to_string(), 1);
        assert_eq!(cache.get(&"a".to_string()), Some(1));
    }

    #[test]
    fn evicts_least_recently_used_when_over_capacity() {
        let cache: LruQueryCache<&str, i32> = LruQueryCache::new(2, Duration::from_secs(60));
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("c", 3); // evicts "a"
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"b"), Some(2));
        assert_eq!(cache.get(&"c"), Some(3));
    }

    #[test]
    fn getting_an_entry_refreshes_its_recency() {
        let cache: LruQueryCache<&str, i32> = LruQueryCache::new(2, Duration::from_secs(60));
        cache.put("a", 1);
        cache.put("b", 2);
        let _ = cache.get(&"a"); // "a" is now most-recently-used
        cache.put("c", 3); // should evict "b", not "a"
        assert_eq!(cache.get(&"a"), Some(1));
        assert_eq!(cache.get(&"b"), None);
    }

    #[test]
    fn expired_entries_are_not_returned() {
        let cache: LruQueryCache<&str, i32> = LruQueryCache::new(2, Duration::from_millis(1));
        cache.put("a", 1);
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.get(&"a"), None);
    }
}
