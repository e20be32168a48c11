//! Time-bounded cache with an injected clock
//!
//! Owned by whichever collaborator performs the fetch; there is no process-wide
//! cache instance.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Source of "now" for expiry decisions
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now = *now + chrono::Duration::from_std(by).unwrap_or_else(|_| chrono::Duration::zero());
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    stored_at: DateTime<Utc>,
}

/// Map whose entries expire `ttl` after they were stored
pub struct TtlCache<K, V> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: HashMap<K, Entry<V>>,
}

impl<K, V> std::fmt::Debug for TtlCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: HashMap::new(),
        }
    }

    /// Fresh value for `key`; expired entries are evicted on access
    pub fn get(&mut self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let fresh = match self.entries.get(key) {
            Some(entry) => {
                let age = now
                    .signed_duration_since(entry.stored_at)
                    .to_std()
                    .unwrap_or_default();
                age < self.ttl
            }
            None => return None,
        };

        if fresh {
            self.entries.get(key).map(|entry| entry.value.clone())
        } else {
            self.entries.remove(key);
            None
        }
    }

    /// Store `value` under `key`, restarting its expiry window
    pub fn set(&mut self, key: K, value: V) {
        let stored_at = self.clock.now();
        self.entries.insert(key, Entry { value, stored_at });
    }

    /// Drop one entry; returns whether it was present
    pub fn invalidate(&mut self, key: &K) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(ttl_secs: u64) -> (TtlCache<&'static str, u32>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        (TtlCache::new(Duration::from_secs(ttl_secs), clock.clone()), clock)
    }

    #[test]
    fn entries_expire_after_ttl() {
        let (mut cache, clock) = cache(60);
        cache.set("tools", 3);
        clock.advance(Duration::from_secs(59));
        assert_eq!(cache.get(&"tools"), Some(3));

        clock.advance(Duration::from_secs(1));
        assert_eq!(cache.get(&"tools"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn invalidate_removes_single_key() {
        let (mut cache, _clock) = cache(60);
        cache.set("a", 1);
        cache.set("b", 2);
        assert!(cache.invalidate(&"a"));
        assert!(!cache.invalidate(&"a"));
        assert_eq!(cache.get(&"b"), Some(2));

        cache.clear();
        assert_eq!(cache.len(), 0);
    }
}
