//! Vault lifecycle manager
//!
//! Single entry point for every vault operation. All other components are
//! passive stores the manager consults and mutates; the guards here encode
//! the entire authorization model. Every operation validates completely
//! before touching state, so a rejected call leaves the engine unchanged,
//! and events reach the journal only after their operation has committed.

use crate::vault::authorized::AuthorizedSet;
use crate::vault::events::{
    SharesEdited, SignatoryAccepted, VaultEvent, VaultFinalized, VaultInitialized,
    WithdrawalApproved, WithdrawalInitiated,
};
use crate::vault::pubkeys::{ApprovalStatus, Pubkey, PubkeyRegistry};
use crate::vault::shares::ShareLedger;
use crate::vault::timelock::{self, TimelockThreshold, MAX_TIMELOCK_STAGES};
use crate::vault::vault::{Vault, VaultError, VaultStatus, FULL_SHARE_BPS};
use crate::withdrawal::{WithdrawalError, WithdrawalProposal, WithdrawalRequest, WithdrawalStore};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Everything the engine tracks for one vault
#[derive(Clone, Debug, Serialize, Deserialize)]
struct VaultState {
    vault: Vault,
    shares: ShareLedger,
    pubkeys: PubkeyRegistry,
    authorized: AuthorizedSet,
    timelocks: Vec<TimelockThreshold>,
    withdrawals: WithdrawalStore,
}

/// One row of the per-vault membership listing
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VaultMember {
    pub signatory: String,
    /// Share in basis points
    pub share: u16,
    /// Accepted public key, if the signatory has approved
    pub pubkey: Option<Pubkey>,
}

/// Manager for all vaults and their withdrawal proposals
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VaultManager {
    /// Append-only vault arena; ids are dense and never reused
    vaults: Vec<VaultState>,
    /// Committed domain events awaiting external delivery
    events: Vec<VaultEvent>,
}

impl VaultManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self {
            vaults: Vec::new(),
            events: Vec::new(),
        }
    }

    fn state(&self, vault_id: u64) -> Result<&VaultState, VaultError> {
        self.vaults
            .get(vault_id as usize)
            .ok_or(VaultError::UnknownVault(vault_id))
    }

    fn state_mut(&mut self, vault_id: u64) -> Result<&mut VaultState, VaultError> {
        self.vaults
            .get_mut(vault_id as usize)
            .ok_or(VaultError::UnknownVault(vault_id))
    }

    // =========================================================================
    // Lifecycle Operations
    // =========================================================================

    /// Create a new draft vault owned by `caller`.
    ///
    /// `signatories` and `shares` are parallel vectors; a repeated
    /// signatory keeps only its last share entry while every supplied share
    /// still counts toward the stored total. Returns the new vault id.
    #[allow(clippy::too_many_arguments)]
    pub fn initialize_vault(
        &mut self,
        caller: &str,
        name: &str,
        threshold: u16,
        signatories: &[String],
        shares: &[u16],
        authorized: &[String],
        timelocks: &[TimelockThreshold],
    ) -> Result<u64, VaultError> {
        if signatories.len() != shares.len() {
            return Err(VaultError::ArityMismatch {
                signatories: signatories.len(),
                shares: shares.len(),
            });
        }
        if threshold > FULL_SHARE_BPS {
            return Err(VaultError::ThresholdOutOfRange(threshold));
        }
        if timelocks.len() > MAX_TIMELOCK_STAGES {
            return Err(VaultError::TooManyTimelocks(timelocks.len()));
        }

        let mut ledger = ShareLedger::new();
        let mut total: u64 = 0;
        for (signatory, &share) in signatories.iter().zip(shares) {
            ledger.set_share(signatory, share);
            total += share as u64;
        }
        let total_share = u16::try_from(total).map_err(|_| VaultError::ShareOverflow(total))?;

        timelock::validate_schedule(timelocks, threshold, Utc::now().timestamp())?;

        let mut authorized_set = AuthorizedSet::new();
        authorized_set.add_all(authorized);

        let vault_id = self.vaults.len() as u64;
        let vault = Vault::new(
            name.to_string(),
            caller.to_string(),
            threshold,
            total_share,
        );

        self.vaults.push(VaultState {
            vault: vault.clone(),
            shares: ledger,
            pubkeys: PubkeyRegistry::new(),
            authorized: authorized_set,
            timelocks: timelocks.to_vec(),
            withdrawals: WithdrawalStore::new(),
        });

        log::info!(
            "Vault {} ({}) initialized by {} with total share {}",
            vault_id,
            name,
            caller,
            total_share
        );

        self.events.push(VaultEvent::Initialized(VaultInitialized {
            vault_id,
            vault,
            timestamp: Utc::now(),
        }));

        Ok(vault_id)
    }

    /// Re-weight existing signatories of a draft vault.
    ///
    /// Only the initiator may call this, and only before finalization.
    /// Pairs are applied sequentially: a signatory repeated in the call
    /// observes the earlier pair's write. New members cannot be added here.
    pub fn edit_signatories(
        &mut self,
        caller: &str,
        vault_id: u64,
        signatories: &[String],
        shares: &[u16],
    ) -> Result<(), VaultError> {
        if signatories.len() != shares.len() {
            return Err(VaultError::ArityMismatch {
                signatories: signatories.len(),
                shares: shares.len(),
            });
        }

        let state = self.state_mut(vault_id)?;
        if state.vault.initiator != caller {
            return Err(VaultError::InvalidInitiator);
        }
        if !state.vault.is_draft() {
            return Err(VaultError::NotDraft(vault_id));
        }

        // Stage every change before mutating anything
        let mut staged: Vec<(String, u16, u16)> = Vec::new();
        let mut pending: HashMap<&str, u16> = HashMap::new();
        let mut total = state.vault.total_share as i64;
        for (signatory, &new_share) in signatories.iter().zip(shares) {
            let old_share = pending
                .get(signatory.as_str())
                .copied()
                .or_else(|| state.shares.share_of(signatory))
                .ok_or_else(|| VaultError::UnknownSignatory(signatory.clone()))?;
            total = total - old_share as i64 + new_share as i64;
            pending.insert(signatory.as_str(), new_share);
            staged.push((signatory.clone(), old_share, new_share));
        }
        let total_share = u16::try_from(total)
            .map_err(|_| VaultError::ShareOverflow(total.unsigned_abs()))?;

        for (signatory, _, new_share) in &staged {
            state.shares.set_share(signatory, *new_share);
        }
        state.vault.total_share = total_share;

        log::info!(
            "Vault {} shares edited by {}: {} pair(s), total share now {}",
            vault_id,
            caller,
            staged.len(),
            total_share
        );

        let timestamp = Utc::now();
        self.events
            .extend(staged.into_iter().map(|(signatory, old_share, new_share)| {
                VaultEvent::Edited(SharesEdited {
                    vault_id,
                    signatory,
                    old_share,
                    new_share,
                    timestamp,
                })
            }));

        Ok(())
    }

    /// Register the calling signatory's public key on a draft vault.
    ///
    /// Re-approval overwrites the previous key; the all-zero key is
    /// rejected.
    pub fn approve_signatory(
        &mut self,
        caller: &str,
        vault_id: u64,
        pubkey: Pubkey,
    ) -> Result<(), VaultError> {
        let state = self.state_mut(vault_id)?;
        if !state.shares.is_signatory(caller) {
            return Err(VaultError::InvalidSignatory(caller.to_string()));
        }
        if !state.vault.is_draft() {
            return Err(VaultError::NotDraft(vault_id));
        }

        state.pubkeys.approve(caller, pubkey)?;

        log::info!("Vault {} pubkey accepted for {}", vault_id, caller);

        self.events.push(VaultEvent::Accepted(SignatoryAccepted {
            vault_id,
            signatory: caller.to_string(),
            pubkey,
            timestamp: Utc::now(),
        }));

        Ok(())
    }

    /// Lock a draft vault, freezing its signatory set and pubkeys.
    ///
    /// Requires every signatory to have approved and the share total to be
    /// exactly 10000 basis points. This is the sole transition out of
    /// `Draft` and it is irreversible.
    pub fn finalize_vault(&mut self, caller: &str, vault_id: u64) -> Result<(), VaultError> {
        let state = self.state_mut(vault_id)?;
        if state.vault.initiator != caller {
            return Err(VaultError::InvalidInitiator);
        }
        if !state.vault.is_draft() {
            return Err(VaultError::NotDraft(vault_id));
        }
        if state.pubkeys.len() != state.shares.len() {
            return Err(VaultError::IncompletePubkeys {
                approved: state.pubkeys.len(),
                total: state.shares.len(),
            });
        }
        if state.vault.total_share != FULL_SHARE_BPS {
            return Err(VaultError::ShareNotFull(state.vault.total_share));
        }

        state.vault.status = VaultStatus::Final;

        log::info!("Vault {} finalized by {}", vault_id, caller);

        self.events.push(VaultEvent::Finalized(VaultFinalized {
            vault_id,
            timestamp: Utc::now(),
        }));

        Ok(())
    }

    /// Union addresses into the vault's authorized-initiator set.
    ///
    /// Initiator only. Deliberately not gated on vault status.
    pub fn add_authorized_addresses(
        &mut self,
        caller: &str,
        vault_id: u64,
        addresses: &[String],
    ) -> Result<(), VaultError> {
        let state = self.state_mut(vault_id)?;
        if state.vault.initiator != caller {
            return Err(VaultError::InvalidInitiator);
        }

        state.authorized.add_all(addresses);

        log::debug!(
            "Vault {} authorized set extended by {} address(es)",
            vault_id,
            addresses.len()
        );

        Ok(())
    }

    // =========================================================================
    // Withdrawal Operations
    // =========================================================================

    /// Whether an identity may initiate withdrawals for a vault.
    ///
    /// Signatories are implicitly authorized; the explicit set covers
    /// everyone else. The two sets stay independent so the share ledger
    /// remains the sole source of truth for share accounting.
    pub fn is_authorized(&self, vault_id: u64, identity: &str) -> Result<bool, VaultError> {
        let state = self.state(vault_id)?;
        Ok(state.shares.is_signatory(identity) || state.authorized.contains(identity))
    }

    /// Create a withdrawal proposal, returning its per-vault id.
    ///
    /// Callable by signatories and explicitly authorized addresses, in any
    /// vault state.
    pub fn initiate_withdrawal(
        &mut self,
        caller: &str,
        vault_id: u64,
        request: WithdrawalRequest,
    ) -> Result<u64, WithdrawalError> {
        let state = self.state_mut(vault_id)?;
        if !(state.shares.is_signatory(caller) || state.authorized.contains(caller)) {
            return Err(WithdrawalError::NotAuthorized(caller.to_string()));
        }

        let proposal_id = state.withdrawals.create(request, caller)?;

        log::info!(
            "Vault {} withdrawal {} initiated by {}",
            vault_id,
            proposal_id,
            caller
        );

        self.events
            .push(VaultEvent::WithdrawalInitiated(WithdrawalInitiated {
                vault_id,
                proposal_id,
                initiated_by: caller.to_string(),
                timestamp: Utc::now(),
            }));

        Ok(proposal_id)
    }

    /// Attach the calling signatory's full signature list to a proposal.
    ///
    /// One shot per signatory per proposal; the whole list is stored
    /// atomically or not at all. Signature bytes are opaque here: the
    /// external transaction assembler verifies them against the registered
    /// pubkeys.
    pub fn approve_withdrawal(
        &mut self,
        caller: &str,
        vault_id: u64,
        proposal_id: u64,
        sigs: Vec<Vec<u8>>,
    ) -> Result<(), WithdrawalError> {
        let state = self.state_mut(vault_id)?;
        if !state.shares.is_signatory(caller) {
            return Err(VaultError::InvalidSignatory(caller.to_string()).into());
        }

        state.withdrawals.approve(proposal_id, caller, sigs)?;

        log::info!(
            "Vault {} withdrawal {} approved by {}",
            vault_id,
            proposal_id,
            caller
        );

        self.events
            .push(VaultEvent::WithdrawalApproved(WithdrawalApproved {
                vault_id,
                proposal_id,
                signatory: caller.to_string(),
                timestamp: Utc::now(),
            }));

        Ok(())
    }

    // =========================================================================
    // Read Accessors
    // =========================================================================

    /// Number of vaults ever created
    pub fn vault_count(&self) -> u64 {
        self.vaults.len() as u64
    }

    /// Vault record by id
    pub fn vault(&self, vault_id: u64) -> Result<&Vault, VaultError> {
        Ok(&self.state(vault_id)?.vault)
    }

    /// (signatory, share, pubkey) rows in share-ledger enumeration order
    pub fn vault_members(&self, vault_id: u64) -> Result<Vec<VaultMember>, VaultError> {
        let state = self.state(vault_id)?;
        Ok(state
            .shares
            .iter()
            .map(|(signatory, share)| VaultMember {
                signatory: signatory.clone(),
                share,
                pubkey: state.pubkeys.key_of(signatory).copied(),
            })
            .collect())
    }

    /// Every vault the identity is a signatory of, with its approval state
    pub fn vaults_for_signatory(&self, identity: &str) -> Vec<(u64, ApprovalStatus)> {
        self.vaults
            .iter()
            .enumerate()
            .filter(|(_, state)| state.shares.is_signatory(identity))
            .map(|(vault_id, state)| (vault_id as u64, state.pubkeys.status_of(identity)))
            .collect()
    }

    /// Explicitly authorized addresses in insertion order
    pub fn authorized_addresses(&self, vault_id: u64) -> Result<Vec<String>, VaultError> {
        Ok(self.state(vault_id)?.authorized.iter().cloned().collect())
    }

    /// Timelock stages in the exact order supplied at creation
    pub fn timelocks(&self, vault_id: u64) -> Result<&[TimelockThreshold], VaultError> {
        Ok(&self.state(vault_id)?.timelocks)
    }

    /// A withdrawal proposal by (vault, proposal) id
    pub fn withdrawal(
        &self,
        vault_id: u64,
        proposal_id: u64,
    ) -> Result<&WithdrawalProposal, WithdrawalError> {
        Ok(self.state(vault_id)?.withdrawals.get(proposal_id)?)
    }

    /// Id the vault's next proposal will receive
    pub fn next_proposal_id(&self, vault_id: u64) -> Result<u64, VaultError> {
        Ok(self.state(vault_id)?.withdrawals.next_proposal_id())
    }

    /// A signatory's signature list for a proposal (empty if not approved)
    pub fn withdrawal_signatures(
        &self,
        vault_id: u64,
        proposal_id: u64,
        signatory: &str,
    ) -> Result<&[Vec<u8>], WithdrawalError> {
        Ok(self
            .state(vault_id)?
            .withdrawals
            .get(proposal_id)?
            .signatures_of(signatory))
    }

    /// Committed events awaiting delivery
    pub fn events(&self) -> &[VaultEvent] {
        &self.events
    }

    /// Hand the journal to an external consumer, clearing it
    pub fn drain_events(&mut self) -> Vec<VaultEvent> {
        std::mem::take(&mut self.events)
    }

    /// Rebuild ordered-container lookup indexes (after deserialization)
    pub fn rebuild_indexes(&mut self) {
        for state in &mut self.vaults {
            state.shares.rebuild_index();
            state.authorized.rebuild_index();
        }
    }

    /// Sum of a vault's ledger entries (diagnostic; equals the stored total
    /// for duplicate-free inputs)
    pub fn ledger_sum(&self, vault_id: u64) -> Result<u64, VaultError> {
        Ok(self.state(vault_id)?.shares.sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::pubkeys::PUBKEY_LEN;
    use crate::withdrawal::{SCRIPT_LEN, SIGNATURE_LEN};

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn key(fill: u8) -> Pubkey {
        [fill; PUBKEY_LEN]
    }

    fn request() -> WithdrawalRequest {
        WithdrawalRequest {
            script: vec![0xa9; SCRIPT_LEN],
            amount: 500_000,
            fee: 2_000,
        }
    }

    /// 2-signatory draft vault: alice 3000, bob 7000, initiator "owner"
    fn draft_vault(manager: &mut VaultManager) -> u64 {
        manager
            .initialize_vault(
                "owner",
                "treasury",
                30,
                &names(&["alice", "bob"]),
                &[3000, 7000],
                &[],
                &[],
            )
            .unwrap()
    }

    fn finalized_vault(manager: &mut VaultManager) -> u64 {
        let id = draft_vault(manager);
        manager.approve_signatory("alice", id, key(1)).unwrap();
        manager.approve_signatory("bob", id, key(2)).unwrap();
        manager.finalize_vault("owner", id).unwrap();
        id
    }

    #[test]
    fn test_initialize_creates_draft_vault() {
        let mut manager = VaultManager::new();
        let id = draft_vault(&mut manager);

        assert_eq!(id, 0);
        assert_eq!(manager.vault_count(), 1);

        let vault = manager.vault(id).unwrap();
        assert_eq!(vault.name, "treasury");
        assert_eq!(vault.initiator, "owner");
        assert_eq!(vault.threshold, 30);
        assert_eq!(vault.status, VaultStatus::Draft);
        assert_eq!(vault.total_share, 10_000);

        match &manager.events()[0] {
            VaultEvent::Initialized(ev) => {
                assert_eq!(ev.vault_id, id);
                assert_eq!(ev.vault.total_share, 10_000);
                assert_eq!(ev.vault.status, VaultStatus::Draft);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_vault_ids_are_dense() {
        let mut manager = VaultManager::new();
        assert_eq!(draft_vault(&mut manager), 0);
        assert_eq!(draft_vault(&mut manager), 1);
        assert_eq!(draft_vault(&mut manager), 2);
        assert_eq!(manager.vault_count(), 3);
    }

    #[test]
    fn test_arity_mismatch_creates_nothing() {
        let mut manager = VaultManager::new();
        let shares: Vec<u16> = (0..20).map(|_| 500).collect();

        let result = manager.initialize_vault(
            "owner",
            "treasury",
            30,
            &names(&["alice", "bob"]),
            &shares,
            &[],
            &[],
        );

        assert_eq!(
            result,
            Err(VaultError::ArityMismatch {
                signatories: 2,
                shares: 20,
            })
        );
        assert_eq!(manager.vault_count(), 0);
        assert!(manager.events().is_empty());
    }

    #[test]
    fn test_threshold_out_of_range() {
        let mut manager = VaultManager::new();
        let result = manager.initialize_vault(
            "owner",
            "treasury",
            10_001,
            &names(&["alice"]),
            &[10_000],
            &[],
            &[],
        );
        assert_eq!(result, Err(VaultError::ThresholdOutOfRange(10_001)));
    }

    #[test]
    fn test_share_overflow() {
        let mut manager = VaultManager::new();
        let result = manager.initialize_vault(
            "owner",
            "treasury",
            30,
            &names(&["alice", "bob"]),
            &[40_000, 40_000],
            &[],
            &[],
        );
        assert_eq!(result, Err(VaultError::ShareOverflow(80_000)));
        assert_eq!(manager.vault_count(), 0);
    }

    #[test]
    fn test_duplicate_signatory_last_write_wins() {
        let mut manager = VaultManager::new();
        let id = manager
            .initialize_vault(
                "owner",
                "treasury",
                30,
                &names(&["alice", "alice"]),
                &[4000, 6000],
                &[],
                &[],
            )
            .unwrap();

        // Entry keeps the last share; the total still sums both pairs
        let members = manager.vault_members(id).unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].share, 6000);
        assert_eq!(manager.vault(id).unwrap().total_share, 10_000);
    }

    #[test]
    fn test_timelock_validation_at_creation() {
        let mut manager = VaultManager::new();
        let soon = Utc::now().timestamp() + 3600;

        let too_many: Vec<TimelockThreshold> = (0..4)
            .map(|i| TimelockThreshold {
                activation_at: soon + i * 100,
                reduced_threshold: 25 - i as u16,
            })
            .collect();
        assert_eq!(
            manager.initialize_vault(
                "owner",
                "treasury",
                30,
                &names(&["alice"]),
                &[10_000],
                &[],
                &too_many,
            ),
            Err(VaultError::TooManyTimelocks(4))
        );

        let past = [TimelockThreshold {
            activation_at: Utc::now().timestamp() - 10,
            reduced_threshold: 20,
        }];
        assert_eq!(
            manager.initialize_vault(
                "owner",
                "treasury",
                30,
                &names(&["alice"]),
                &[10_000],
                &[],
                &past,
            ),
            Err(VaultError::InvalidTimelockTiming)
        );

        let unsorted = [
            TimelockThreshold {
                activation_at: soon + 200,
                reduced_threshold: 25,
            },
            TimelockThreshold {
                activation_at: soon + 100,
                reduced_threshold: 20,
            },
        ];
        assert_eq!(
            manager.initialize_vault(
                "owner",
                "treasury",
                30,
                &names(&["alice"]),
                &[10_000],
                &[],
                &unsorted,
            ),
            Err(VaultError::InvalidTimelockOrdering)
        );

        assert_eq!(manager.vault_count(), 0);
    }

    #[test]
    fn test_timelocks_retrievable_in_supplied_order() {
        let mut manager = VaultManager::new();
        let soon = Utc::now().timestamp() + 3600;
        let stages = [
            TimelockThreshold {
                activation_at: soon,
                reduced_threshold: 25,
            },
            TimelockThreshold {
                activation_at: soon + 100,
                reduced_threshold: 20,
            },
            TimelockThreshold {
                activation_at: soon + 200,
                reduced_threshold: 15,
            },
        ];

        let id = manager
            .initialize_vault(
                "owner",
                "treasury",
                30,
                &names(&["alice"]),
                &[10_000],
                &[],
                &stages,
            )
            .unwrap();

        assert_eq!(manager.timelocks(id).unwrap(), &stages);
    }

    #[test]
    fn test_edit_signatories_reweights() {
        let mut manager = VaultManager::new();
        let id = draft_vault(&mut manager);

        manager
            .edit_signatories(
                "owner",
                id,
                &names(&["alice", "bob"]),
                &[5000, 5000],
            )
            .unwrap();

        let vault = manager.vault(id).unwrap();
        assert_eq!(vault.total_share, 10_000);
        assert_eq!(manager.ledger_sum(id).unwrap(), 10_000);

        let members = manager.vault_members(id).unwrap();
        assert_eq!(members[0].share, 5000);
        assert_eq!(members[1].share, 5000);

        // One event per pair, carrying old and new shares
        let edits: Vec<&SharesEdited> = manager
            .events()
            .iter()
            .filter_map(|ev| match ev {
                VaultEvent::Edited(edit) => Some(edit),
                _ => None,
            })
            .collect();
        assert_eq!(edits.len(), 2);
        assert_eq!((edits[0].old_share, edits[0].new_share), (3000, 5000));
        assert_eq!((edits[1].old_share, edits[1].new_share), (7000, 5000));
    }

    #[test]
    fn test_edit_signatories_guards() {
        let mut manager = VaultManager::new();
        let id = draft_vault(&mut manager);

        assert_eq!(
            manager.edit_signatories("mallory", id, &names(&["alice"]), &[5000]),
            Err(VaultError::InvalidInitiator)
        );
        assert_eq!(
            manager.edit_signatories("owner", id, &names(&["carol"]), &[5000]),
            Err(VaultError::UnknownSignatory("carol".to_string()))
        );
        assert_eq!(
            manager.edit_signatories("owner", id, &names(&["alice", "bob"]), &[5000]),
            Err(VaultError::ArityMismatch {
                signatories: 2,
                shares: 1,
            })
        );

        // A failed call leaves the ledger untouched
        assert_eq!(manager.vault(id).unwrap().total_share, 10_000);
        assert_eq!(
            manager.vault_members(id).unwrap()[0].share,
            3000
        );
    }

    #[test]
    fn test_edit_rejected_after_finalize() {
        let mut manager = VaultManager::new();
        let id = finalized_vault(&mut manager);

        assert_eq!(
            manager.edit_signatories("owner", id, &names(&["alice"]), &[3000]),
            Err(VaultError::NotDraft(id))
        );
    }

    #[test]
    fn test_approve_signatory_guards() {
        let mut manager = VaultManager::new();
        let id = draft_vault(&mut manager);

        assert_eq!(
            manager.approve_signatory("carol", id, key(1)),
            Err(VaultError::InvalidSignatory("carol".to_string()))
        );
        assert_eq!(
            manager.approve_signatory("alice", id, [0u8; PUBKEY_LEN]),
            Err(VaultError::ZeroPubkey)
        );
        assert_eq!(
            manager.approve_signatory("alice", 9, key(1)),
            Err(VaultError::UnknownVault(9))
        );
    }

    #[test]
    fn test_finalize_requires_full_shares_and_pubkeys() {
        let mut manager = VaultManager::new();
        let id = manager
            .initialize_vault(
                "owner",
                "treasury",
                30,
                &names(&["alice", "bob"]),
                &[3000, 6000],
                &[],
                &[],
            )
            .unwrap();

        manager.approve_signatory("alice", id, key(1)).unwrap();
        assert_eq!(
            manager.finalize_vault("owner", id),
            Err(VaultError::IncompletePubkeys {
                approved: 1,
                total: 2,
            })
        );

        manager.approve_signatory("bob", id, key(2)).unwrap();
        assert_eq!(
            manager.finalize_vault("owner", id),
            Err(VaultError::ShareNotFull(9000))
        );
        assert_eq!(manager.vault(id).unwrap().status, VaultStatus::Draft);

        manager
            .edit_signatories("owner", id, &names(&["bob"]), &[7000])
            .unwrap();
        manager.finalize_vault("owner", id).unwrap();
        assert_eq!(manager.vault(id).unwrap().status, VaultStatus::Final);
    }

    #[test]
    fn test_finalize_guards() {
        let mut manager = VaultManager::new();
        let id = draft_vault(&mut manager);

        assert_eq!(
            manager.finalize_vault("mallory", id),
            Err(VaultError::InvalidInitiator)
        );
    }

    #[test]
    fn test_full_lifecycle_scenario() {
        let mut manager = VaultManager::new();
        let id = draft_vault(&mut manager);

        manager.approve_signatory("alice", id, key(1)).unwrap();
        manager.approve_signatory("bob", id, key(2)).unwrap();
        manager.finalize_vault("owner", id).unwrap();

        let kinds: Vec<&str> = manager.events().iter().map(|ev| ev.kind()).collect();
        assert_eq!(
            kinds,
            vec!["initialized", "accepted", "accepted", "finalized"]
        );

        // Final is terminal for signatory and pubkey mutation
        assert_eq!(
            manager.approve_signatory("alice", id, key(3)),
            Err(VaultError::NotDraft(id))
        );
        assert_eq!(
            manager.finalize_vault("owner", id),
            Err(VaultError::NotDraft(id))
        );
    }

    #[test]
    fn test_reapproval_overwrites_in_draft() {
        let mut manager = VaultManager::new();
        let id = draft_vault(&mut manager);

        manager.approve_signatory("alice", id, key(1)).unwrap();
        manager.approve_signatory("alice", id, key(9)).unwrap();

        let members = manager.vault_members(id).unwrap();
        assert_eq!(members[0].pubkey, Some(key(9)));
    }

    #[test]
    fn test_vaults_for_signatory() {
        let mut manager = VaultManager::new();
        let first = draft_vault(&mut manager);
        let second = draft_vault(&mut manager);

        manager.approve_signatory("alice", second, key(1)).unwrap();

        assert_eq!(
            manager.vaults_for_signatory("alice"),
            vec![
                (first, ApprovalStatus::Pending),
                (second, ApprovalStatus::Accepted),
            ]
        );
        assert!(manager.vaults_for_signatory("carol").is_empty());
    }

    #[test]
    fn test_authorized_addresses_initiator_only_no_state_gate() {
        let mut manager = VaultManager::new();
        let id = finalized_vault(&mut manager);

        assert_eq!(
            manager.add_authorized_addresses("mallory", id, &names(&["m"])),
            Err(VaultError::InvalidInitiator)
        );

        // Still callable after finalization, and idempotent
        manager
            .add_authorized_addresses("owner", id, &names(&["bot", "desk"]))
            .unwrap();
        manager
            .add_authorized_addresses("owner", id, &names(&["desk", "ops"]))
            .unwrap();

        assert_eq!(
            manager.authorized_addresses(id).unwrap(),
            vec!["bot", "desk", "ops"]
        );
    }

    #[test]
    fn test_initiate_withdrawal_authorization() {
        let mut manager = VaultManager::new();
        let id = manager
            .initialize_vault(
                "owner",
                "treasury",
                30,
                &names(&["alice", "bob"]),
                &[3000, 7000],
                &names(&["bot"]),
                &[],
            )
            .unwrap();

        assert!(manager.is_authorized(id, "alice").unwrap());
        assert!(manager.is_authorized(id, "bot").unwrap());
        assert!(!manager.is_authorized(id, "stranger").unwrap());

        // Signatory, explicit address, stranger
        assert_eq!(
            manager.initiate_withdrawal("alice", id, request()).unwrap(),
            0
        );
        assert_eq!(
            manager.initiate_withdrawal("bot", id, request()).unwrap(),
            1
        );
        assert_eq!(
            manager.initiate_withdrawal("stranger", id, request()),
            Err(WithdrawalError::NotAuthorized("stranger".to_string()))
        );
        assert_eq!(manager.next_proposal_id(id).unwrap(), 2);
    }

    #[test]
    fn test_withdrawals_callable_in_draft_and_final() {
        let mut manager = VaultManager::new();
        let id = draft_vault(&mut manager);

        // Draft vault: no state gate on withdrawals
        manager.initiate_withdrawal("alice", id, request()).unwrap();

        manager.approve_signatory("alice", id, key(1)).unwrap();
        manager.approve_signatory("bob", id, key(2)).unwrap();
        manager.finalize_vault("owner", id).unwrap();

        manager.initiate_withdrawal("bob", id, request()).unwrap();
        assert_eq!(manager.next_proposal_id(id).unwrap(), 2);
    }

    #[test]
    fn test_initiate_withdrawal_script_length() {
        let mut manager = VaultManager::new();
        let id = draft_vault(&mut manager);

        let bad = WithdrawalRequest {
            script: vec![0xa9; SCRIPT_LEN - 1],
            amount: 1,
            fee: 1,
        };
        assert_eq!(
            manager.initiate_withdrawal("alice", id, bad),
            Err(WithdrawalError::InvalidScriptLength(SCRIPT_LEN - 1))
        );
        assert_eq!(manager.next_proposal_id(id).unwrap(), 0);
    }

    #[test]
    fn test_approve_withdrawal_one_shot() {
        let mut manager = VaultManager::new();
        let id = finalized_vault(&mut manager);
        let proposal = manager.initiate_withdrawal("alice", id, request()).unwrap();

        let sigs = vec![vec![7u8; SIGNATURE_LEN], vec![8u8; SIGNATURE_LEN]];
        manager
            .approve_withdrawal("alice", id, proposal, sigs.clone())
            .unwrap();
        assert_eq!(
            manager
                .withdrawal_signatures(id, proposal, "alice")
                .unwrap(),
            sigs.as_slice()
        );

        assert_eq!(
            manager.approve_withdrawal("alice", id, proposal, sigs),
            Err(WithdrawalError::AlreadyApproved("alice".to_string()))
        );
    }

    #[test]
    fn test_approve_withdrawal_guards() {
        let mut manager = VaultManager::new();
        let id = finalized_vault(&mut manager);
        let proposal = manager.initiate_withdrawal("alice", id, request()).unwrap();

        assert_eq!(
            manager.approve_withdrawal("stranger", id, proposal, vec![]),
            Err(WithdrawalError::Vault(VaultError::InvalidSignatory(
                "stranger".to_string()
            )))
        );
        assert_eq!(
            manager.approve_withdrawal("alice", id, 5, vec![]),
            Err(WithdrawalError::UnknownProposal(5))
        );

        // A 64-byte entry is rejected and nothing is stored
        let sigs = vec![vec![7u8; SIGNATURE_LEN], vec![8u8; 64]];
        assert_eq!(
            manager.approve_withdrawal("alice", id, proposal, sigs),
            Err(WithdrawalError::InvalidSignatureLength(64))
        );
        assert!(manager
            .withdrawal_signatures(id, proposal, "alice")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_withdrawal_proposal_readback() {
        let mut manager = VaultManager::new();
        let id = draft_vault(&mut manager);
        let proposal_id = manager.initiate_withdrawal("bob", id, request()).unwrap();

        let proposal = manager.withdrawal(id, proposal_id).unwrap();
        assert_eq!(proposal.amount, 500_000);
        assert_eq!(proposal.fee, 2_000);
        assert_eq!(proposal.script.len(), SCRIPT_LEN);
        assert_eq!(proposal.initiated_by, "bob");
    }

    #[test]
    fn test_ledger_sum_matches_total_after_mutations() {
        let mut manager = VaultManager::new();
        let id = draft_vault(&mut manager);
        assert_eq!(
            manager.ledger_sum(id).unwrap(),
            manager.vault(id).unwrap().total_share as u64
        );

        manager
            .edit_signatories("owner", id, &names(&["alice", "bob"]), &[1000, 9000])
            .unwrap();
        assert_eq!(
            manager.ledger_sum(id).unwrap(),
            manager.vault(id).unwrap().total_share as u64
        );
    }

    #[test]
    fn test_drain_events_clears_journal() {
        let mut manager = VaultManager::new();
        let id = draft_vault(&mut manager);
        manager.approve_signatory("alice", id, key(1)).unwrap();

        let drained = manager.drain_events();
        assert_eq!(drained.len(), 2);
        assert!(manager.events().is_empty());
        assert!(drained.iter().all(|ev| ev.vault_id() == id));
    }

    #[test]
    fn test_failed_operation_emits_nothing() {
        let mut manager = VaultManager::new();
        let id = draft_vault(&mut manager);
        let before = manager.events().len();

        let _ = manager.approve_signatory("carol", id, key(1));
        let _ = manager.finalize_vault("owner", id);
        let _ = manager.initiate_withdrawal("stranger", id, request());

        assert_eq!(manager.events().len(), before);
    }
}
