//! Token Constants
//!
//! All fixed configuration values for the DAPP ledger live here. There is
//! no runtime configuration: a deployment is fully described by its
//! constructor arguments plus these constants.

/// Token Metadata
pub mod token {
    use crate::types::{Address, Amount};

    /// Decimal places of the smallest unit
    pub const DECIMALS: u8 = 18;

    /// One human unit in smallest units (1 DAPP = 10^18 base units)
    pub const ONE: Amount = 1_000_000_000_000_000_000;

    /// The "no account" sentinel principal
    pub const NULL_ADDRESS: Address = [0u8; 32];

    /// Default deployment name
    pub const DEFAULT_NAME: &str = "Dapp University";

    /// Default deployment symbol
    pub const DEFAULT_SYMBOL: &str = "DAPP";

    /// Default human-unit supply
    pub const DEFAULT_SUPPLY: u64 = 500;
}

/// Domain separation tags for digests
pub mod domain {
    /// Prefix for ledger state commitments
    pub const STATE_HASH_TAG: &[u8] = b"dapp-token/state/v1";

    /// Prefix for deployment address derivation
    pub const DEPLOYMENT_TAG: &[u8] = b"dapp-token/deploy/v1";
}

#[cfg(test)]
mod tests {
    use super::token::*;

    #[test]
    fn test_one_matches_decimals() {
        assert_eq!(ONE, 10u128.pow(DECIMALS as u32));
    }

    #[test]
    fn test_null_address_is_zero() {
        assert!(NULL_ADDRESS.iter().all(|b| *b == 0));
    }
}
