//! Error Types for the DAPP ledger
//!
//! Every rejection is synchronous and leaves the ledger untouched. Each
//! variant carries a stable code for logging and for hosts that only see
//! a pass/fail bit.

use thiserror::Error;

use crate::types::Amount;

/// Result type alias for ledger operations
pub type TokenResult<T> = Result<T, TokenError>;

/// Main error enum for all ledger errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    // ============ Principal Errors ============
    /// Recipient is the null principal
    #[error("invalid recipient: the null principal cannot receive tokens")]
    InvalidRecipient,

    /// Spender is the null principal
    #[error("invalid spender: the null principal cannot be approved")]
    InvalidSpender,

    /// Sender of record is the null principal
    #[error("invalid sender: the null principal cannot send or approve")]
    InvalidSender,

    /// Address rejected for some other reason (e.g. null creator)
    #[error("invalid address: {reason}")]
    InvalidAddress { reason: &'static str },

    // ============ Amount Errors ============
    /// Source balance is smaller than the requested amount
    #[error("insufficient balance: have {available}, need {requested}")]
    InsufficientBalance { available: Amount, requested: Amount },

    /// Remaining allowance is smaller than the requested amount
    #[error("insufficient allowance: have {available}, need {requested}")]
    InsufficientAllowance { available: Amount, requested: Amount },

    /// Zero amount not allowed
    #[error("zero amount not allowed")]
    ZeroAmount,

    // ============ Math Errors ============
    /// Arithmetic overflow occurred
    #[error("arithmetic overflow")]
    Overflow,

    /// Arithmetic underflow occurred
    #[error("arithmetic underflow")]
    Underflow,

    // ============ Input Validation Errors ============
    /// Invalid input parameter
    #[error("invalid input `{param}`: {reason}")]
    InvalidInput { param: &'static str, reason: &'static str },

    /// Witness data could not be decoded into a ledger call
    #[error("invalid witness")]
    InvalidWitness,

    // ============ State Errors ============
    /// Sum of balances differs from total supply
    #[error("conservation violated: balances sum to {inputs}, supply is {outputs}")]
    ConservationViolated { inputs: Amount, outputs: Amount },

    /// State is malformed or does not follow from the previous state
    #[error("invalid state transition")]
    InvalidStateTransition,
}

impl TokenError {
    /// Returns a human-readable error code for logging/debugging
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRecipient => "E001_INVALID_RECIPIENT",
            Self::InvalidSpender => "E002_INVALID_SPENDER",
            Self::InvalidAddress { .. } => "E003_INVALID_ADDRESS",
            Self::InvalidSender => "E004_INVALID_SENDER",
            Self::InsufficientBalance { .. } => "E011_INSUFFICIENT_BALANCE",
            Self::InsufficientAllowance { .. } => "E012_INSUFFICIENT_ALLOWANCE",
            Self::ZeroAmount => "E014_ZERO_AMOUNT",
            Self::Overflow => "E080_OVERFLOW",
            Self::Underflow => "E081_UNDERFLOW",
            Self::InvalidInput { .. } => "E090_INVALID_INPUT",
            Self::InvalidWitness => "E092_INVALID_WITNESS",
            Self::ConservationViolated { .. } => "E073_CONSERVATION",
            Self::InvalidStateTransition => "E101_INVALID_STATE",
        }
    }

    /// Returns true if the caller can fix this by retrying with other inputs
    /// or after some other state change (e.g. a fresh approval)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InsufficientBalance { .. }
                | Self::InsufficientAllowance { .. }
                | Self::InvalidRecipient
                | Self::InvalidSpender
        )
    }
}
