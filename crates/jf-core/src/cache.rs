//! Last-written value caching.
//!
//! Every writable panel property keeps the last value it transmitted, so a
//! repeated write of the same value produces no wire traffic. The cache and
//! its lock form one critical section: the compare, the cache update and the
//! transmit all happen while the lock is held, so a concurrent caller that
//! observes the updated cache never re-sends a value already in flight.
//!
//! `None`/a missing map entry means "never written", which is distinct from
//! "written as the default": a fresh control always transmits its first
//! write, including `false`, `0` and `""`.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;

/// Cache of the last value written to a single input sig.
#[derive(Debug, Default)]
pub struct SigCache<T> {
    value: Mutex<Option<T>>,
}

impl<T: Clone + PartialEq> SigCache<T> {
    pub fn new() -> Self {
        Self {
            value: Mutex::new(None),
        }
    }

    /// The last written value, if any.
    pub fn get(&self) -> Option<T> {
        self.value.lock().unwrap().clone()
    }

    /// Store `value` and run `send` with it, unless it equals the cached
    /// value. Returns true when `send` ran.
    pub fn send_if_changed(&self, value: T, send: impl FnOnce(&T)) -> bool {
        let mut cached = self.value.lock().unwrap();
        if cached.as_ref() == Some(&value) {
            return false;
        }
        send(&value);
        *cached = Some(value);
        true
    }

    /// Forget the last written value; the next write always transmits.
    pub fn clear(&self) {
        *self.value.lock().unwrap() = None;
    }
}

/// Per-key last-written cache, for properties addressed by resolved join or
/// item index.
///
/// Keys are resolved joins rather than local joins where the owning control
/// participates in a repeating parent: the same local join resolves to a
/// different wire join per index, and each must be suppressed independently.
#[derive(Debug, Default)]
pub struct SigMapCache<K, V> {
    entries: Mutex<HashMap<K, V>>,
}

impl<K: Eq + Hash, V: Clone + PartialEq> SigMapCache<K, V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The last written value for `key`, if any.
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    /// The last written value for `key`, or the default for a key never
    /// written.
    pub fn get_or_default(&self, key: &K) -> V
    where
        V: Default,
    {
        self.get(key).unwrap_or_default()
    }

    /// Store `value` under `key` and run `send` with it, unless it equals
    /// the cached entry. A missing entry always transmits. Returns true when
    /// `send` ran.
    pub fn send_if_changed(&self, key: K, value: V, send: impl FnOnce(&V)) -> bool {
        let mut entries = self.entries.lock().unwrap();
        if entries.get(&key) == Some(&value) {
            return false;
        }
        send(&value);
        entries.insert(key, value);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_write_always_transmits() {
        let cache = SigCache::new();
        let mut sends = 0;
        assert!(cache.send_if_changed(false, |_| sends += 1));
        assert_eq!(sends, 1);
    }

    #[test]
    fn repeated_write_is_suppressed() {
        let cache = SigCache::new();
        let mut sends = 0;
        cache.send_if_changed("X".to_string(), |_| sends += 1);
        cache.send_if_changed("X".to_string(), |_| sends += 1);
        assert_eq!(sends, 1);
        cache.send_if_changed("Y".to_string(), |_| sends += 1);
        assert_eq!(sends, 2);
    }

    #[test]
    fn clear_forgets_the_cached_value() {
        let cache = SigCache::new();
        let mut sends = 0;
        cache.send_if_changed(7u16, |_| sends += 1);
        cache.clear();
        cache.send_if_changed(7u16, |_| sends += 1);
        assert_eq!(sends, 2);
    }

    #[test]
    fn map_entries_are_independent() {
        let cache = SigMapCache::new();
        let mut sends = 0;
        cache.send_if_changed(11u16, true, |_| sends += 1);
        cache.send_if_changed(21u16, true, |_| sends += 1);
        cache.send_if_changed(11u16, true, |_| sends += 1);
        assert_eq!(sends, 2);
        assert_eq!(cache.get(&11), Some(true));
        assert_eq!(cache.get(&31), None);
        assert!(!cache.get_or_default(&31));
    }
}
