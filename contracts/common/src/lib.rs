//! Dapp Token Common Library
//!
//! Shared types, constants, and utilities for the DAPP token ledger.
//!
//! ## Modules
//!
//! - **Constants**: Token metadata defaults, decimals and the null principal
//! - **Errors**: Typed rejection taxonomy with stable error codes
//! - **Types**: Principals, amounts and the serialized call surface
//! - **Events**: `Transfer` / `Approval` notifications and the event log
//! - **Math**: Unit conversion and digest helpers
//!
//! This crate is `no_std` compatible for WASM compilation when built
//! without the default `std` feature.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Re-export collection types for submodules based on feature
#[cfg(not(feature = "std"))]
pub use alloc::{collections::BTreeMap, string::String, vec::Vec};
#[cfg(feature = "std")]
pub use std::{collections::BTreeMap, string::String, vec::Vec};

pub mod constants;
pub mod errors;
pub mod events;
pub mod math;
pub mod types;

// Re-exports for convenience
pub use constants::*;
pub use errors::*;
pub use events::*;
pub use math::*;
pub use types::*;
