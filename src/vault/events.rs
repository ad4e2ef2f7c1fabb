//! Domain events emitted by the vault engine
//!
//! Events are appended to the engine's journal only after the operation
//! that produced them has committed. Delivery and indexing are the
//! responsibility of an external consumer, which drains the journal.

use crate::vault::pubkeys::Pubkey;
use crate::vault::vault::Vault;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Emitted when a vault is created
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VaultInitialized {
    pub vault_id: u64,
    /// Snapshot of the vault as created
    pub vault: Vault,
    pub timestamp: DateTime<Utc>,
}

/// Emitted once per (signatory, share) pair re-weighted by the initiator
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SharesEdited {
    pub vault_id: u64,
    pub signatory: String,
    pub old_share: u16,
    pub new_share: u16,
    pub timestamp: DateTime<Utc>,
}

/// Emitted when a signatory registers its public key
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SignatoryAccepted {
    pub vault_id: u64,
    pub signatory: String,
    pub pubkey: Pubkey,
    pub timestamp: DateTime<Utc>,
}

/// Emitted on the one-way transition out of draft
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VaultFinalized {
    pub vault_id: u64,
    pub timestamp: DateTime<Utc>,
}

/// Emitted when a withdrawal proposal is created
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WithdrawalInitiated {
    pub vault_id: u64,
    pub proposal_id: u64,
    pub initiated_by: String,
    pub timestamp: DateTime<Utc>,
}

/// Emitted when a signatory submits its signature set for a proposal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WithdrawalApproved {
    pub vault_id: u64,
    pub proposal_id: u64,
    pub signatory: String,
    pub timestamp: DateTime<Utc>,
}

/// Any event the engine can emit
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum VaultEvent {
    Initialized(VaultInitialized),
    Edited(SharesEdited),
    Accepted(SignatoryAccepted),
    Finalized(VaultFinalized),
    WithdrawalInitiated(WithdrawalInitiated),
    WithdrawalApproved(WithdrawalApproved),
}

impl VaultEvent {
    /// Vault the event belongs to
    pub fn vault_id(&self) -> u64 {
        match self {
            VaultEvent::Initialized(ev) => ev.vault_id,
            VaultEvent::Edited(ev) => ev.vault_id,
            VaultEvent::Accepted(ev) => ev.vault_id,
            VaultEvent::Finalized(ev) => ev.vault_id,
            VaultEvent::WithdrawalInitiated(ev) => ev.vault_id,
            VaultEvent::WithdrawalApproved(ev) => ev.vault_id,
        }
    }

    /// Short event name for logs and CLI output
    pub fn kind(&self) -> &'static str {
        match self {
            VaultEvent::Initialized(_) => "initialized",
            VaultEvent::Edited(_) => "edited",
            VaultEvent::Accepted(_) => "accepted",
            VaultEvent::Finalized(_) => "finalized",
            VaultEvent::WithdrawalInitiated(_) => "withdrawal-initiated",
            VaultEvent::WithdrawalApproved(_) => "withdrawal-approved",
        }
    }
}
