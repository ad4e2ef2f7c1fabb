//! Per-vault withdrawal proposal store
//!
//! Proposals live in a dense arena: ids start at 0, increase by exactly one
//! per proposal and are never reused, so the next id is always the arena
//! length.

use crate::withdrawal::proposal::{WithdrawalError, WithdrawalProposal, WithdrawalRequest};
use serde::{Deserialize, Serialize};

/// All withdrawal proposals for one vault
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WithdrawalStore {
    proposals: Vec<WithdrawalProposal>,
}

impl WithdrawalStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            proposals: Vec::new(),
        }
    }

    /// Id the next proposal will receive
    pub fn next_proposal_id(&self) -> u64 {
        self.proposals.len() as u64
    }

    /// Validate and store a request, returning the allocated proposal id
    pub fn create(
        &mut self,
        request: WithdrawalRequest,
        initiated_by: &str,
    ) -> Result<u64, WithdrawalError> {
        request.validate()?;
        let proposal_id = self.next_proposal_id();
        self.proposals
            .push(WithdrawalProposal::new(request, initiated_by));
        Ok(proposal_id)
    }

    /// Look up a proposal by id
    pub fn get(&self, proposal_id: u64) -> Result<&WithdrawalProposal, WithdrawalError> {
        self.proposals
            .get(proposal_id as usize)
            .ok_or(WithdrawalError::UnknownProposal(proposal_id))
    }

    /// Record a signatory's signature list on a proposal
    pub fn approve(
        &mut self,
        proposal_id: u64,
        signatory: &str,
        sigs: Vec<Vec<u8>>,
    ) -> Result<(), WithdrawalError> {
        let proposal = self
            .proposals
            .get_mut(proposal_id as usize)
            .ok_or(WithdrawalError::UnknownProposal(proposal_id))?;
        proposal.record_signatures(signatory, sigs)
    }

    /// Iterate proposals in creation order
    pub fn iter(&self) -> impl Iterator<Item = &WithdrawalProposal> {
        self.proposals.iter()
    }

    /// Number of proposals created so far
    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    /// Whether no proposal has been created yet
    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }
}
