//! DAPP Token - Charms App Entry Point
//!
//! The ledger is one state NFT. Each transaction spends the current state
//! charm (none for a deploy) and creates the next one; the witness names
//! the call that turns one into the other.

use charms_sdk::data::{App, Data, Transaction};

/// Accept the transaction only if its output ledger state follows from
/// its input state under the witnessed call.
///
/// The witness is CBOR and takes one of two shapes:
/// - deploy (`op = 0x00`): `{ op, creator, name, symbol, supply }`, where
///   `supply` is in whole tokens and the transaction has no input state
/// - call (`op = 0x01` transfer, `0x02` approve, `0x03` transfer_from):
///   `{ op, caller, from, to, spender, amount }`, where `amount` is in
///   smallest units and only the fields the call uses are set
///
/// Public input `x` is ignored.
pub fn app_contract(app: &App, tx: &Transaction, x: &Data, w: &Data) -> bool {
    dapp_token::charms::validate_ledger_operation(app, tx, x, w)
}

charms_sdk::main!(app_contract);
