//! Insertion-ordered map and set with O(1) existence checks
//!
//! Vault state is enumerable and deletion-free: signatory ledgers and
//! authorized-address sets are only ever appended to or overwritten in
//! place, and readers see entries in the order they were first inserted.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// A map that preserves first-insertion order of its keys.
///
/// Overwriting an existing key keeps its original position. There is no
/// removal operation. The lookup index is not serialized; call
/// [`OrderedMap::rebuild_index`] after deserializing.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
    #[serde(skip)]
    index: HashMap<K, usize>,
}

impl<K, V> OrderedMap<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create an empty map
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Insert a value, returning the previous value if the key was present.
    ///
    /// An existing key keeps its enumeration position (last write wins for
    /// the value only).
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.index.get(&key) {
            Some(&pos) => {
                let old = std::mem::replace(&mut self.entries[pos].1, value);
                Some(old)
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Get a value by key
    pub fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    /// Check if a key is present
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Rebuild the lookup index from the entry list (after deserialization)
    pub fn rebuild_index(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(pos, (k, _))| (k.clone(), pos))
            .collect();
    }
}

/// A set that preserves first-insertion order of its members.
///
/// Re-adding a member is a no-op. There is no removal operation. The lookup
/// index is not serialized; call [`OrderedSet::rebuild_index`] after
/// deserializing.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OrderedSet<T> {
    members: Vec<T>,
    #[serde(skip)]
    index: HashSet<T>,
}

impl<T> OrderedSet<T>
where
    T: Eq + Hash + Clone,
{
    /// Create an empty set
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
            index: HashSet::new(),
        }
    }

    /// Add a member; returns true if it was newly inserted
    pub fn insert(&mut self, member: T) -> bool {
        if self.index.contains(&member) {
            return false;
        }
        self.index.insert(member.clone());
        self.members.push(member);
        true
    }

    /// Check membership
    pub fn contains(&self, member: &T) -> bool {
        self.index.contains(member)
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterate members in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.members.iter()
    }

    /// Rebuild the lookup index from the member list (after deserialization)
    pub fn rebuild_index(&mut self) {
        self.index = self.members.iter().cloned().collect();
    }
}
