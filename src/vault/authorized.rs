//! Per-vault registry of authorized withdrawal initiators
//!
//! Explicit membership here is only half of the authorization predicate:
//! signatories may always initiate withdrawals, so callers should combine
//! this set with the share ledger (see `VaultManager::is_authorized`).

use crate::collections::OrderedSet;
use serde::{Deserialize, Serialize};

/// Addresses allowed to initiate withdrawals for a vault
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AuthorizedSet {
    addresses: OrderedSet<String>,
}

impl AuthorizedSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self {
            addresses: OrderedSet::new(),
        }
    }

    /// Add an address; re-adding is a no-op
    pub fn add(&mut self, address: &str) {
        self.addresses.insert(address.to_string());
    }

    /// Union a batch of addresses into the set
    pub fn add_all<I, S>(&mut self, addresses: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for address in addresses {
            self.add(address.as_ref());
        }
    }

    /// Whether an address is explicitly authorized
    pub fn contains(&self, address: &str) -> bool {
        self.addresses.contains(&address.to_string())
    }

    /// Number of explicitly authorized addresses
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Iterate addresses in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.addresses.iter()
    }

    /// Rebuild the lookup index after deserialization
    pub fn rebuild_index(&mut self) {
        self.addresses.rebuild_index();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_contains() {
        let mut set = AuthorizedSet::new();
        set.add("treasury-bot");

        assert!(set.contains("treasury-bot"));
        assert!(!set.contains("stranger"));
    }

    #[test]
    fn test_union_is_idempotent() {
        let mut set = AuthorizedSet::new();
        set.add_all(["a", "b"]);
        set.add_all(["b", "c"]);

        assert_eq!(set.len(), 3);
        let members: Vec<&String> = set.iter().collect();
        assert_eq!(members, vec!["a", "b", "c"]);
    }
}
