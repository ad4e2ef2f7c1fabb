//! Vault record and lifecycle state
//!
//! A vault is a custody unit owned by its initiator. It starts in `Draft`,
//! collects signatory pubkey approvals, and is locked by a one-way
//! transition to `Final` once share accounting is complete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Share and threshold values are expressed in basis points out of 10000
pub const FULL_SHARE_BPS: u16 = 10_000;

/// Vault-domain errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum VaultError {
    #[error("Arity mismatch: {signatories} signatories, {shares} shares")]
    ArityMismatch { signatories: usize, shares: usize },
    #[error("Threshold out of range: {0} exceeds {max} basis points", max = FULL_SHARE_BPS)]
    ThresholdOutOfRange(u16),
    #[error("Too many timelock entries: {0}")]
    TooManyTimelocks(usize),
    #[error("Share total overflow: {0} does not fit 16 bits")]
    ShareOverflow(u64),
    #[error("Timelock entries must strictly increase in time and strictly decrease in threshold")]
    InvalidTimelockOrdering,
    #[error("First timelock activation must be in the future")]
    InvalidTimelockTiming,
    #[error("Public key must not be all zeroes")]
    ZeroPubkey,
    #[error("Caller is not the vault initiator")]
    InvalidInitiator,
    #[error("Caller is not a signatory: {0}")]
    InvalidSignatory(String),
    #[error("Unknown signatory: {0}")]
    UnknownSignatory(String),
    #[error("Unknown vault: {0}")]
    UnknownVault(u64),
    #[error("Vault {0} is no longer in draft")]
    NotDraft(u64),
    #[error("Incomplete pubkey approvals: {approved} of {total} signatories")]
    IncompletePubkeys { approved: usize, total: usize },
    #[error("Share total is {0}, must be exactly {full} basis points", full = FULL_SHARE_BPS)]
    ShareNotFull(u16),
}

/// Lifecycle state of a vault
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum VaultStatus {
    /// Accepting signatory edits and pubkey approvals
    Draft,
    /// Locked by the initiator; signatory set and pubkeys are frozen
    Final,
}

impl std::fmt::Display for VaultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VaultStatus::Draft => write!(f, "draft"),
            VaultStatus::Final => write!(f, "final"),
        }
    }
}

/// A custody vault
///
/// `total_share` and `status` are the only fields that change after
/// creation, and `status` only ever moves `Draft` -> `Final`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Vault {
    /// Human-readable vault name
    pub name: String,
    /// Identity that created the vault and may finalize it
    pub initiator: String,
    /// Base signing threshold in basis points (0-10000)
    pub threshold: u16,
    /// Lifecycle state
    pub status: VaultStatus,
    /// Sum of signatory shares in basis points
    pub total_share: u16,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Vault {
    /// Create a new draft vault
    pub fn new(name: String, initiator: String, threshold: u16, total_share: u16) -> Self {
        Self {
            name,
            initiator,
            threshold,
            status: VaultStatus::Draft,
            total_share,
            created_at: Utc::now(),
        }
    }

    /// Whether the vault is still in draft
    pub fn is_draft(&self) -> bool {
        self.status == VaultStatus::Draft
    }
}
