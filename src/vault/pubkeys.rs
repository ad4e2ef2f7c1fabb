//! Per-vault registry of accepted signatory public keys
//!
//! Presence of an entry marks the signatory as accepted; the key value
//! itself is opaque to the engine. The all-zero key is rejected at the API
//! boundary and never stored, so it cannot be confused with a real key.

use crate::vault::vault::VaultError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Length of a registered Bitcoin public key in bytes
pub const PUBKEY_LEN: usize = 32;

/// A signatory's 32-byte public key
pub type Pubkey = [u8; PUBKEY_LEN];

/// Approval state of a signatory within a vault
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApprovalStatus {
    /// Holds a share but has not registered a public key
    Pending,
    /// Registered a public key
    Accepted,
}

/// Signatory -> accepted public key
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PubkeyRegistry {
    keys: HashMap<String, Pubkey>,
}

impl PubkeyRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            keys: HashMap::new(),
        }
    }

    /// Record a signatory's public key. Re-approval overwrites.
    ///
    /// Rejects the all-zero key with [`VaultError::ZeroPubkey`].
    pub fn approve(&mut self, signatory: &str, pubkey: Pubkey) -> Result<(), VaultError> {
        if pubkey == [0u8; PUBKEY_LEN] {
            return Err(VaultError::ZeroPubkey);
        }
        self.keys.insert(signatory.to_string(), pubkey);
        Ok(())
    }

    /// Get a signatory's accepted key, if any
    pub fn key_of(&self, signatory: &str) -> Option<&Pubkey> {
        self.keys.get(signatory)
    }

    /// Approval state for a signatory
    pub fn status_of(&self, signatory: &str) -> ApprovalStatus {
        if self.keys.contains_key(signatory) {
            ApprovalStatus::Accepted
        } else {
            ApprovalStatus::Pending
        }
    }

    /// Number of accepted signatories
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no signatory has approved yet
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
