//! BitVault: a share-weighted multi-signature Bitcoin vault custody engine
//!
//! This crate provides the lifecycle and authorization core for a
//! Bitcoin-backed asset pool held by weighted signatories:
//! - Vault creation with basis-point share accounting
//! - Signatory pubkey registration and one-way draft finalization
//! - Time-locked threshold reduction schedules (stored, externally consumed)
//! - Authorized-address registry for withdrawal initiators
//! - Withdrawal proposals with per-signatory one-shot signature collection
//! - Committed-only domain event journal for external delivery
//! - JSON persistence with atomic snapshots and rotating backups
//!
//! The engine is deliberately narrow: callers arrive pre-authenticated,
//! collected signature bytes are opaque, and assembling or broadcasting the
//! final Bitcoin transaction happens elsewhere.
//!
//! # Example
//!
//! ```rust
//! use bitvault::vault::VaultManager;
//!
//! let mut manager = VaultManager::new();
//!
//! let signatories = vec!["alice".to_string(), "bob".to_string()];
//! let id = manager
//!     .initialize_vault("owner", "treasury", 30, &signatories, &[3000, 7000], &[], &[])
//!     .unwrap();
//!
//! manager.approve_signatory("alice", id, [1u8; 32]).unwrap();
//! manager.approve_signatory("bob", id, [2u8; 32]).unwrap();
//! manager.finalize_vault("owner", id).unwrap();
//!
//! assert!(!manager.vault(id).unwrap().is_draft());
//! ```

pub mod cli;
pub mod collections;
pub mod storage;
pub mod vault;
pub mod withdrawal;

// Re-export commonly used types
pub use collections::{OrderedMap, OrderedSet};
pub use storage::{Storage, StorageConfig, StorageError};
pub use vault::{
    ApprovalStatus, Pubkey, TimelockThreshold, Vault, VaultError, VaultEvent, VaultManager,
    VaultMember, VaultStatus, FULL_SHARE_BPS, MAX_TIMELOCK_STAGES, PUBKEY_LEN,
};
pub use withdrawal::{
    WithdrawalError, WithdrawalProposal, WithdrawalRequest, SCRIPT_LEN, SIGNATURE_LEN,
};
