//! Charms SDK Integration for the DAPP ledger
//!
//! The whole ledger lives in one state NFT (tag `n`). A transaction spends
//! the current state charm and creates the next one; this module checks
//! that the next state is exactly what the witnessed call makes of the
//! current one.
//!
//! ## Operations
//!
//! - **Deploy (0x00)**: Creates the initial state (no input state)
//! - **Transfer (0x01)**: Caller sends tokens
//! - **Approve (0x02)**: Caller sets a spender's allowance
//! - **TransferFrom (0x03)**: Caller spends an owner's tokens under allowance

use charms_data::{App, Data, Transaction};
use tracing::debug;

use crate::{validate_deployment, validate_transition, LedgerState};
use dapp_common::{
    errors::{TokenError, TokenResult},
    types::{Address, Amount, TokenAction},
};

/// Ledger operation types encoded in witness data
const OP_DEPLOY: u8 = 0x00;
const OP_TRANSFER: u8 = 0x01;
const OP_APPROVE: u8 = 0x02;
const OP_TRANSFER_FROM: u8 = 0x03;

/// Validates a DAPP ledger operation within a Charms transaction.
///
/// # Arguments
/// * `app` - The ledger state app definition
/// * `tx` - The transaction being validated
/// * `x` - Public input data (unused)
/// * `w` - Witness data containing the call
///
/// # Returns
/// `true` if the operation is valid, `false` otherwise
pub fn validate_ledger_operation(app: &App, tx: &Transaction, _x: &Data, w: &Data) -> bool {
    match check_ledger_operation(app, tx, w) {
        Ok(()) => true,
        Err(err) => {
            debug!(code = err.code(), error = %err, "ledger operation rejected");
            false
        }
    }
}

fn check_ledger_operation(app: &App, tx: &Transaction, w: &Data) -> TokenResult<()> {
    // Deploy is handled separately: there is no input state to spend
    if let Some(deploy) = parse_deploy_witness(w) {
        if extract_input_state(app, tx).is_some() {
            return Err(TokenError::InvalidStateTransition);
        }
        let output = extract_output_state(app, tx).ok_or(TokenError::InvalidStateTransition)?;
        return validate_deployment(
            &output,
            deploy.creator,
            &deploy.name,
            &deploy.symbol,
            deploy.supply,
        );
    }

    let witness = parse_witness(w).ok_or(TokenError::InvalidWitness)?;
    let action = witness_action(&witness).ok_or(TokenError::InvalidWitness)?;

    let input = extract_input_state(app, tx).ok_or(TokenError::InvalidStateTransition)?;
    let output = extract_output_state(app, tx).ok_or(TokenError::InvalidStateTransition)?;

    validate_transition(&input, &output, witness.caller, &action).map(|_| ())
}

/// Witness structure for the Deploy operation
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DeployWitness {
    pub op: u8,
    /// Principal credited with the supply
    pub creator: Address,
    pub name: String,
    pub symbol: String,
    /// Supply in human units
    pub supply: u64,
}

/// Witness structure for ledger calls (serialized via serde)
///
/// `caller` must be bound to the spending signature by the host.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LedgerWitness {
    pub op: u8,
    pub caller: Address,
    pub from: Option<Address>,
    pub to: Option<Address>,
    pub spender: Option<Address>,
    pub amount: Amount,
}

/// Parse witness data to check if it's a Deploy operation
fn parse_deploy_witness(w: &Data) -> Option<DeployWitness> {
    match w.value::<DeployWitness>() {
        Ok(deploy) if deploy.op == OP_DEPLOY => Some(deploy),
        _ => None,
    }
}

/// Parse witness data for a regular call
fn parse_witness(w: &Data) -> Option<LedgerWitness> {
    w.value::<LedgerWitness>().ok()
}

/// Map a witness onto the call it describes
fn witness_action(witness: &LedgerWitness) -> Option<TokenAction> {
    match witness.op {
        OP_TRANSFER => Some(TokenAction::Transfer {
            to: witness.to?,
            amount: witness.amount,
        }),
        OP_APPROVE => Some(TokenAction::Approve {
            spender: witness.spender?,
            amount: witness.amount,
        }),
        OP_TRANSFER_FROM => Some(TokenAction::TransferFrom {
            from: witness.from?,
            to: witness.to?,
            amount: witness.amount,
        }),
        _ => None,
    }
}

/// Find the spent ledger state
fn extract_input_state(app: &App, tx: &Transaction) -> Option<LedgerState> {
    tx.ins
        .iter()
        .find_map(|(_, charms)| charms.get(app).and_then(deserialize_state))
}

/// Find the created ledger state
fn extract_output_state(app: &App, tx: &Transaction) -> Option<LedgerState> {
    tx.outs
        .iter()
        .find_map(|charms| charms.get(app).and_then(deserialize_state))
}

/// Deserialize ledger state from CBOR data
fn deserialize_state(data: &Data) -> Option<LedgerState> {
    data.value::<LedgerState>().ok()
}
