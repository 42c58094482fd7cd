//! Core Types for the DAPP ledger
//!
//! Principals, amounts and the serialized call surface shared by the
//! ledger and its hosts.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::constants::token::NULL_ADDRESS;

/// Type alias for principals (32-byte account identifier)
pub type Address = [u8; 32];

/// Amount in smallest units
///
/// `u128` because 18 decimals overflow `u64` above ~18 human units.
pub type Amount = u128;

/// Returns true for the null principal
pub fn is_null(address: &Address) -> bool {
    *address == NULL_ADDRESS
}

// ============ Actions ============

/// Mutating calls accepted by the ledger. The caller is supplied by the
/// execution context, never by the action itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum TokenAction {
    /// Move tokens from the caller to `to`
    Transfer { to: Address, amount: Amount },
    /// Set the caller's allowance for `spender`
    Approve { spender: Address, amount: Amount },
    /// Spend `from`'s tokens under the caller's allowance
    TransferFrom { from: Address, to: Address, amount: Amount },
}

impl TokenAction {
    /// Amount moved or approved by this action
    pub fn amount(&self) -> Amount {
        match self {
            Self::Transfer { amount, .. }
            | Self::Approve { amount, .. }
            | Self::TransferFrom { amount, .. } => *amount,
        }
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Transfer { .. } => "transfer",
            Self::Approve { .. } => "approve",
            Self::TransferFrom { .. } => "transfer_from",
        }
    }
}

// ============ Metadata ============

/// Immutable display metadata fixed at construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct TokenMetadata {
    /// Display name
    pub name: crate::String,
    /// Short ticker
    pub symbol: crate::String,
    /// Fixed-point scale
    pub decimals: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_null() {
        assert!(is_null(&[0u8; 32]));
        assert!(!is_null(&[1u8; 32]));
    }

    #[test]
    fn test_action_accessors() {
        let action = TokenAction::TransferFrom {
            from: [1u8; 32],
            to: [2u8; 32],
            amount: 42,
        };
        assert_eq!(action.amount(), 42);
        assert_eq!(action.name(), "transfer_from");
    }
}
