//! Withdrawal proposals and per-signatory signature collection
//!
//! A proposal is immutable once created; there is no edit or cancel. Each
//! signatory submits its full signature list in a single call, and the
//! bytes are opaque at this layer: assembling and verifying the actual
//! Bitcoin transaction happens outside the engine.

use crate::vault::vault::VaultError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Length of a withdrawal destination script in bytes
pub const SCRIPT_LEN: usize = 35;

/// Length of a single collected signature in bytes
pub const SIGNATURE_LEN: usize = 65;

/// Withdrawal-domain errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum WithdrawalError {
    #[error("Destination script must be exactly {expected} bytes, got {0}", expected = SCRIPT_LEN)]
    InvalidScriptLength(usize),
    #[error("Each signature must be exactly {expected} bytes, got {0}", expected = SIGNATURE_LEN)]
    InvalidSignatureLength(usize),
    #[error("Caller is not authorized to initiate withdrawals: {0}")]
    NotAuthorized(String),
    #[error("Unknown withdrawal proposal: {0}")]
    UnknownProposal(u64),
    #[error("Signatory {0} has already approved this proposal")]
    AlreadyApproved(String),
    #[error("Vault error: {0}")]
    Vault(#[from] VaultError),
}

/// A request to move funds out of a vault
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WithdrawalRequest {
    /// Destination output script (exactly 35 bytes)
    pub script: Vec<u8>,
    /// Amount to withdraw, in satoshis
    pub amount: u64,
    /// Network fee, in satoshis
    pub fee: u64,
}

impl WithdrawalRequest {
    /// Check the request's shape
    pub fn validate(&self) -> Result<(), WithdrawalError> {
        if self.script.len() != SCRIPT_LEN {
            return Err(WithdrawalError::InvalidScriptLength(self.script.len()));
        }
        Ok(())
    }
}

/// A stored withdrawal proposal with its collected signatures
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WithdrawalProposal {
    /// Destination output script
    pub script: Vec<u8>,
    /// Amount to withdraw, in satoshis
    pub amount: u64,
    /// Network fee, in satoshis
    pub fee: u64,
    /// Identity that initiated the proposal
    pub initiated_by: String,
    /// Creation timestamp
    pub initiated_at: DateTime<Utc>,
    /// Signatory -> submitted signature list
    signatures: HashMap<String, Vec<Vec<u8>>>,
}

impl WithdrawalProposal {
    /// Create a proposal from a validated request
    pub fn new(request: WithdrawalRequest, initiated_by: &str) -> Self {
        Self {
            script: request.script,
            amount: request.amount,
            fee: request.fee,
            initiated_by: initiated_by.to_string(),
            initiated_at: Utc::now(),
            signatures: HashMap::new(),
        }
    }

    /// Whether the signatory has already submitted a non-empty signature set
    pub fn has_approved(&self, signatory: &str) -> bool {
        self.signatures
            .get(signatory)
            .is_some_and(|sigs| !sigs.is_empty())
    }

    /// Record a signatory's full signature list in one shot.
    ///
    /// Every signature is length-checked before anything is stored, so a
    /// failed call leaves the proposal untouched.
    pub fn record_signatures(
        &mut self,
        signatory: &str,
        sigs: Vec<Vec<u8>>,
    ) -> Result<(), WithdrawalError> {
        for sig in &sigs {
            if sig.len() != SIGNATURE_LEN {
                return Err(WithdrawalError::InvalidSignatureLength(sig.len()));
            }
        }
        if self.has_approved(signatory) {
            return Err(WithdrawalError::AlreadyApproved(signatory.to_string()));
        }
        self.signatures.insert(signatory.to_string(), sigs);
        Ok(())
    }

    /// The signatory's submitted signatures (empty if none)
    pub fn signatures_of(&self, signatory: &str) -> &[Vec<u8>] {
        self.signatures
            .get(signatory)
            .map(|sigs| sigs.as_slice())
            .unwrap_or(&[])
    }

    /// Number of signatories with a non-empty signature set
    pub fn approval_count(&self) -> usize {
        self.signatures
            .values()
            .filter(|sigs| !sigs.is_empty())
            .count()
    }
}
