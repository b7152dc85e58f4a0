//! Keyed in-flight flags.

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};

/// A set of keys with an operation in flight.
///
/// Each key is independent: holding one key never blocks another.
#[derive(Debug)]
pub struct InFlightSet<K> {
    keys: Mutex<HashSet<K>>,
}

impl<K> Default for InFlightSet<K> {
    fn default() -> Self {
        Self {
            keys: Mutex::new(HashSet::new()),
        }
    }
}

impl<K> InFlightSet<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` in flight, or returns `None` if it already is.
    ///
    /// The flag is cleared when the returned guard drops.
    pub fn try_begin(&self, key: K) -> Option<InFlightGuard<'_, K>> {
        if !self.lock().insert(key.clone()) {
            return None;
        }

        Some(InFlightGuard { set: self, key })
    }

    /// Returns true while `key` is in flight.
    pub fn contains(&self, key: &K) -> bool {
        self.lock().contains(key)
    }

    /// Number of keys in flight.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing is in flight.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<K>> {
        self.keys
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Clears its key from the [`InFlightSet`] on drop.
#[must_use = "the flag is cleared as soon as the guard is dropped"]
#[derive(Debug)]
pub struct InFlightGuard<'a, K>
where
    K: Eq + Hash + Clone,
{
    set: &'a InFlightSet<K>,
    key: K,
}

impl<K> Drop for InFlightGuard<'_, K>
where
    K: Eq + Hash + Clone,
{
    fn drop(&mut self) {
        self.set.lock().remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_independent() {
        let set = InFlightSet::new();
        let first = set.try_begin(5).unwrap();
        assert!(set.try_begin(5).is_none());

        let second = set.try_begin(6).unwrap();
        assert!(set.contains(&5));
        assert!(set.contains(&6));
        assert_eq!(set.len(), 2);

        drop(first);
        assert!(!set.contains(&5));
        assert!(set.contains(&6));

        drop(second);
        assert!(set.is_empty());
    }

    #[test]
    fn test_guard_clears_on_early_return() {
        let set = InFlightSet::new();
        let result: Result<(), &str> = (|| {
            let _guard = set.try_begin("reply:1").ok_or("busy")?;
            Err("request failed")
        })();

        assert!(result.is_err());
        assert!(set.is_empty());
    }
}
