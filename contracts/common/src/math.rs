//! Mathematical Utilities for the DAPP ledger
//!
//! Checked arithmetic, unit conversion and digest helpers.

use sha2::{Digest, Sha256};

use crate::constants::{domain, token};
use crate::errors::{TokenError, TokenResult};
use crate::types::{Address, Amount};

/// Convert a human-readable amount into smallest units
///
/// `to_base_units(100)` is `100 * 10^18`.
pub fn to_base_units(human: u64) -> TokenResult<Amount> {
    (human as Amount)
        .checked_mul(token::ONE)
        .ok_or(TokenError::Overflow)
}

/// Format amount for display (split at the decimal point)
pub fn format_amount(amount: Amount) -> (Amount, Amount) {
    let whole = amount / token::ONE;
    let fractional = amount % token::ONE;
    (whole, fractional)
}

/// Safe addition with overflow check
pub fn safe_add(a: Amount, b: Amount) -> TokenResult<Amount> {
    a.checked_add(b).ok_or(TokenError::Overflow)
}

/// Safe subtraction with underflow check
pub fn safe_sub(a: Amount, b: Amount) -> TokenResult<Amount> {
    a.checked_sub(b).ok_or(TokenError::Underflow)
}

/// SHA-256 over a domain tag followed by each part
pub fn tagged_hash(tag: &[u8], parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(tag);
    for part in parts {
        // length prefix keeps ("ab", "c") and ("a", "bc") apart
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&result);
    out
}

/// Deterministic identifier of a deployment
pub fn deployment_address(creator: &Address, name: &str, symbol: &str, supply: u64) -> Address {
    tagged_hash(
        domain::DEPLOYMENT_TAG,
        &[creator.as_slice(), name.as_bytes(), symbol.as_bytes(), &supply.to_le_bytes()[..]],
    )
}
