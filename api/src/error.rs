use thiserror::Error;

use crate::state::{SaleAction, SalePhase};

/// Failures surfaced by the sale controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaleError {
    #[error("wallet is not connected")]
    NotConnected,

    #[error("wallet connection failed: {0}")]
    ConnectFailed(String),

    #[error("connected to chain {actual}; change the network to {} (chain {expected})", crate::consts::REQUIRED_NETWORK)]
    WrongNetwork { expected: u64, actual: u64 },

    #[error("{action} is not available while the sale is {phase}")]
    InvalidActionForPhase { action: SaleAction, phase: SalePhase },

    #[error("another transaction is still pending")]
    ActionPending,

    #[error("{action} failed: {cause}")]
    ActionFailed { action: SaleAction, cause: String },

    #[error("read failed: {0}")]
    ReadFailure(String),
}
