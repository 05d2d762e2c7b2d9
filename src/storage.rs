//! Locked key to ordered-sequence store
//!
//! [`LockedMultimap`] serializes every operation behind one mutex. Each key
//! owns an insertion-ordered bucket of values, and a value type decides via
//! [`BucketEntry`] what happens when an incoming value matches an existing
//! one: tags reject the duplicate, part tags replace it in place.
//!
//! Visitor methods hold the lock for the whole traversal. A visitor must not
//! call back into the same map; the mutex is not re-entrant and doing so
//! deadlocks. Use the snapshot methods when the caller needs to mutate while
//! iterating.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::types::PartTag;

/// What an insert does when the bucket already holds a matching entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// Keep the existing entry and report the insert as rejected
    Reject,
    /// Overwrite the existing entry in place and report success
    Replace,
}

/// A value stored in a [`LockedMultimap`] bucket
pub trait BucketEntry {
    /// The part of the value that identifies it within one bucket
    type Key: ?Sized + PartialEq;

    const ON_COLLISION: Collision;

    fn entry_key(&self) -> &Self::Key;
}

impl BucketEntry for String {
    type Key = str;

    const ON_COLLISION: Collision = Collision::Reject;

    fn entry_key(&self) -> &str {
        self.as_str()
    }
}

impl BucketEntry for PartTag {
    type Key = str;

    const ON_COLLISION: Collision = Collision::Replace;

    fn entry_key(&self) -> &str {
        self.name.as_str()
    }
}

pub struct LockedMultimap<K, V> {
    data: Mutex<HashMap<K, Vec<V>>>,
}

impl<K, V> Default for LockedMultimap<K, V> {
    fn default() -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, V> LockedMultimap<K, V>
where
    K: Eq + Hash + Copy,
    V: BucketEntry,
{
    pub fn new() -> Self {
        Self::default()
    }

    // A panicking visitor poisons the mutex; every mutation below completes
    // before any visitor runs, so the data is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<K, Vec<V>>> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert `value` into the bucket for `key`, creating the bucket if needed.
    ///
    /// Returns `false` only when a matching entry exists and the value type's
    /// policy is [`Collision::Reject`].
    pub fn insert(&self, key: K, value: V) -> bool {
        let mut data = self.lock();
        let bucket = data.entry(key).or_default();
        match bucket
            .iter()
            .position(|existing| existing.entry_key() == value.entry_key())
        {
            Some(index) => match V::ON_COLLISION {
                Collision::Reject => false,
                Collision::Replace => {
                    bucket[index] = value;
                    true
                }
            },
            None => {
                bucket.push(value);
                true
            }
        }
    }

    /// Remove the entry matching `entry_key` from the bucket for `key`.
    ///
    /// An emptied bucket stays in the map.
    pub fn remove(&self, key: &K, entry_key: &V::Key) -> bool {
        let mut data = self.lock();
        let Some(bucket) = data.get_mut(key) else {
            return false;
        };
        match bucket.iter().position(|e| e.entry_key() == entry_key) {
            Some(index) => {
                bucket.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, key: &K, entry_key: &V::Key) -> bool {
        self.lock()
            .get(key)
            .is_some_and(|bucket| bucket.iter().any(|e| e.entry_key() == entry_key))
    }

    /// True when `key` is present with at least one entry
    pub fn has_entries(&self, key: &K) -> bool {
        self.lock().get(key).is_some_and(|bucket| !bucket.is_empty())
    }

    /// Call `visitor` for every entry of `key` in insertion order, under the lock
    pub fn visit_bucket(&self, key: &K, mut visitor: impl FnMut(&V)) {
        let data = self.lock();
        if let Some(bucket) = data.get(key) {
            for entry in bucket {
                visitor(entry);
            }
        }
    }

    /// Call `visitor` once per key present in the map, including keys whose
    /// bucket has been emptied. Order is unspecified.
    pub fn visit_keys(&self, mut visitor: impl FnMut(K)) {
        let data = self.lock();
        for key in data.keys() {
            visitor(*key);
        }
    }

    /// Copy the bucket for `key` out from under the lock
    pub fn bucket_snapshot(&self, key: &K) -> Vec<V>
    where
        V: Clone,
    {
        self.lock().get(key).cloned().unwrap_or_default()
    }

    pub fn keys(&self) -> Vec<K> {
        self.lock().keys().copied().collect()
    }

    pub fn key_count(&self) -> usize {
        self.lock().len()
    }
}
