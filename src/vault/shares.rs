//! Per-vault signatory share ledger
//!
//! Maps each signatory to its share of authority in basis points. Presence
//! of an entry is what defines membership in the vault.

use crate::collections::OrderedMap;
use serde::{Deserialize, Serialize};

/// Signatory -> share (basis points), enumerable in insertion order
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ShareLedger {
    entries: OrderedMap<String, u16>,
}

impl ShareLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            entries: OrderedMap::new(),
        }
    }

    /// Record a share for a signatory, returning the previous share if the
    /// signatory was already present (last write wins, position kept).
    pub fn set_share(&mut self, signatory: &str, share: u16) -> Option<u16> {
        self.entries.insert(signatory.to_string(), share)
    }

    /// Get a signatory's share
    pub fn share_of(&self, signatory: &str) -> Option<u16> {
        self.entries.get(&signatory.to_string()).copied()
    }

    /// Whether the identity holds a share entry
    pub fn is_signatory(&self, identity: &str) -> bool {
        self.entries.contains(&identity.to_string())
    }

    /// Number of signatories
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ledger has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate (signatory, share) in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, u16)> {
        self.entries.iter().map(|(k, v)| (k, *v))
    }

    /// Sum of all recorded shares
    pub fn sum(&self) -> u64 {
        self.entries.iter().map(|(_, share)| *share as u64).sum()
    }

    /// Rebuild the lookup index after deserialization
    pub fn rebuild_index(&mut self) {
        self.entries.rebuild_index();
    }
}
