//! Time-locked threshold reduction schedule
//!
//! A vault may carry up to three stages that lower the effective signing
//! threshold after scheduled activation times. The schedule is validated
//! once, when the vault is created, and is immutable afterwards. No other
//! operation consults it; it is stored for the external transaction
//! assembler to read back.

use crate::vault::vault::VaultError;
use serde::{Deserialize, Serialize};

/// Maximum number of timelock stages per vault
pub const MAX_TIMELOCK_STAGES: usize = 3;

/// A scheduled threshold reduction
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimelockThreshold {
    /// Unix timestamp (seconds) at which the stage activates
    pub activation_at: i64,
    /// Threshold in basis points once the stage is active
    pub reduced_threshold: u16,
}

/// Validate a schedule against the vault's base threshold.
///
/// An empty schedule is valid. Otherwise the stages must strictly increase
/// in activation time and strictly decrease in threshold, the first stage
/// must sit strictly below the base threshold, and the first activation
/// must be strictly in the future relative to `now`.
pub fn validate_schedule(
    stages: &[TimelockThreshold],
    base_threshold: u16,
    now: i64,
) -> Result<(), VaultError> {
    let first = match stages.first() {
        Some(first) => first,
        None => return Ok(()),
    };

    for pair in stages.windows(2) {
        if pair[1].activation_at <= pair[0].activation_at
            || pair[1].reduced_threshold >= pair[0].reduced_threshold
        {
            return Err(VaultError::InvalidTimelockOrdering);
        }
    }

    if first.reduced_threshold >= base_threshold {
        return Err(VaultError::InvalidTimelockOrdering);
    }

    if first.activation_at <= now {
        return Err(VaultError::InvalidTimelockTiming);
    }

    Ok(())
}
