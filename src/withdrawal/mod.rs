//! Withdrawal proposal and signature collection support
//!
//! Authorized parties propose withdrawals against a vault; signatories then
//! attach their signature lists one shot each. The engine never assembles
//! or broadcasts the resulting Bitcoin transaction.

pub mod proposal;
pub mod store;

pub use proposal::{
    WithdrawalError, WithdrawalProposal, WithdrawalRequest, SCRIPT_LEN, SIGNATURE_LEN,
};
pub use store::WithdrawalStore;
