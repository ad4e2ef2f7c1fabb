//! Share-weighted multi-signatory vault support
//!
//! A vault is created in draft with a set of weighted signatories. Each
//! signatory registers a Bitcoin public key; once every key is in and the
//! shares sum to exactly 10000 basis points, the initiator finalizes the
//! vault, freezing its membership.
//!
//! # Example
//!
//! ```ignore
//! use bitvault::vault::VaultManager;
//!
//! let mut manager = VaultManager::new();
//!
//! // 30% threshold vault with two weighted signatories
//! let id = manager.initialize_vault(
//!     "owner", "treasury", 3000,
//!     &signatories, &[3000, 7000], &[], &[],
//! )?;
//!
//! // Each signatory registers its pubkey, then the initiator locks it
//! manager.approve_signatory("alice", id, alice_key)?;
//! manager.approve_signatory("bob", id, bob_key)?;
//! manager.finalize_vault("owner", id)?;
//! ```

pub mod authorized;
pub mod events;
pub mod manager;
pub mod pubkeys;
pub mod shares;
pub mod timelock;
pub mod vault;

pub use authorized::AuthorizedSet;
pub use events::{
    SharesEdited, SignatoryAccepted, VaultEvent, VaultFinalized, VaultInitialized,
    WithdrawalApproved, WithdrawalInitiated,
};
pub use manager::{VaultManager, VaultMember};
pub use pubkeys::{ApprovalStatus, Pubkey, PubkeyRegistry, PUBKEY_LEN};
pub use shares::ShareLedger;
pub use timelock::{validate_schedule, TimelockThreshold, MAX_TIMELOCK_STAGES};
pub use vault::{Vault, VaultError, VaultStatus, FULL_SHARE_BPS};
