//! DAPP Token Ledger
//!
//! Fungible token with a fixed supply credited to its creator, direct
//! transfers, and delegated spending through allowances.
//!
//! All state lives in an explicit [`LedgerState`] owned by a
//! [`TokenLedger`]. Mutations take `&mut self`, check every precondition
//! before writing anything, and push exactly one event on success. A
//! rejected call leaves both the state and the event log untouched.
//!
//! ## Charms Integration
//!
//! When compiled with the `charms` feature, this crate provides a Charms
//! app entry point via the `charms` module.

use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[cfg(feature = "charms")]
pub mod charms;


use dapp_common::{
    constants::{domain, token},
    errors::{TokenError, TokenResult},
    events::{EventLog, TokenEvent},
    math::{deployment_address, format_amount, safe_add, safe_sub, tagged_hash, to_base_units},
    types::{is_null, Address, Amount, TokenAction, TokenMetadata},
};

// ============ Ledger State ============

/// Persistent ledger state carried between calls
///
/// Zero balances and zero allowances are never stored, so two states with
/// the same observable balances and allowances encode identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct LedgerState {
    /// Display metadata (immutable)
    pub metadata: TokenMetadata,
    /// Principal credited with the whole supply at construction
    pub creator: Address,
    /// Deployment identifier derived from the constructor arguments
    pub address: Address,
    /// Total supply in smallest units (immutable)
    pub total_supply: Amount,
    balances: BTreeMap<Address, Amount>,
    allowances: BTreeMap<(Address, Address), Amount>,
}

impl LedgerState {
    /// Build the state of a fresh deployment
    pub fn genesis(creator: Address, name: &str, symbol: &str, supply: u64) -> TokenResult<Self> {
        if name.is_empty() {
            return Err(TokenError::InvalidInput {
                param: "name",
                reason: "must not be empty",
            });
        }
        if symbol.is_empty() {
            return Err(TokenError::InvalidInput {
                param: "symbol",
                reason: "must not be empty",
            });
        }
        if supply == 0 {
            return Err(TokenError::ZeroAmount);
        }
        if is_null(&creator) {
            return Err(TokenError::InvalidAddress {
                reason: "creator cannot be the null principal",
            });
        }

        let total_supply = to_base_units(supply)?;
        let mut balances = BTreeMap::new();
        balances.insert(creator, total_supply);

        Ok(Self {
            metadata: TokenMetadata {
                name: name.into(),
                symbol: symbol.into(),
                decimals: token::DECIMALS,
            },
            creator,
            address: deployment_address(&creator, name, symbol, supply),
            total_supply,
            balances,
            allowances: BTreeMap::new(),
        })
    }

    /// Balance of `owner`; unknown principals hold zero
    pub fn balance_of(&self, owner: &Address) -> Amount {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    /// Remaining amount `spender` may move out of `owner`'s balance
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    /// All principals with a non-zero balance, in address order
    pub fn holders(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.balances.iter()
    }

    /// Number of principals with a non-zero balance
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    fn write_balance(&mut self, owner: Address, amount: Amount) {
        if amount == 0 {
            self.balances.remove(&owner);
        } else {
            self.balances.insert(owner, amount);
        }
    }

    fn write_allowance(&mut self, owner: Address, spender: Address, amount: Amount) {
        if amount == 0 {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
    }

    /// Move `amount` from `from` to `to`. Both new balances are computed
    /// before either is written.
    fn move_balance(&mut self, from: Address, to: Address, amount: Amount) -> TokenResult<()> {
        let available = self.balance_of(&from);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                available,
                requested: amount,
            });
        }
        if from == to || amount == 0 {
            return Ok(());
        }

        let new_from = safe_sub(available, amount)?;
        let new_to = safe_add(self.balance_of(&to), amount)?;
        self.write_balance(from, new_from);
        self.write_balance(to, new_to);
        Ok(())
    }

    /// Check every structural invariant of the state
    ///
    /// - balances sum to the total supply
    /// - the null principal holds nothing and is never an owner or spender
    ///   of an allowance
    /// - no zero entries are stored
    /// - metadata and deployment address match a valid construction
    pub fn verify_invariants(&self) -> TokenResult<()> {
        if self.metadata.decimals != token::DECIMALS {
            return Err(TokenError::InvalidStateTransition);
        }
        if self.metadata.name.is_empty() || self.metadata.symbol.is_empty() {
            return Err(TokenError::InvalidInput {
                param: "metadata",
                reason: "name and symbol must not be empty",
            });
        }
        if is_null(&self.creator) {
            return Err(TokenError::InvalidAddress {
                reason: "creator cannot be the null principal",
            });
        }

        // Supply must be a whole number of human units that fits the constructor
        if self.total_supply % token::ONE != 0 {
            return Err(TokenError::InvalidStateTransition);
        }
        let supply = u64::try_from(self.total_supply / token::ONE)
            .map_err(|_| TokenError::Overflow)?;
        if supply == 0 {
            return Err(TokenError::ZeroAmount);
        }
        let expected_address = deployment_address(
            &self.creator,
            &self.metadata.name,
            &self.metadata.symbol,
            supply,
        );
        if self.address != expected_address {
            return Err(TokenError::InvalidStateTransition);
        }

        let mut sum: Amount = 0;
        for (owner, amount) in &self.balances {
            if is_null(owner) {
                return Err(TokenError::InvalidAddress {
                    reason: "null principal holds a balance",
                });
            }
            if *amount == 0 {
                return Err(TokenError::InvalidStateTransition);
            }
            sum = safe_add(sum, *amount)?;
        }
        if sum != self.total_supply {
            return Err(TokenError::ConservationViolated {
                inputs: sum,
                outputs: self.total_supply,
            });
        }

        for ((owner, spender), amount) in &self.allowances {
            if is_null(owner) {
                return Err(TokenError::InvalidAddress {
                    reason: "null principal granted an allowance",
                });
            }
            if is_null(spender) {
                return Err(TokenError::InvalidAddress {
                    reason: "null principal holds an allowance",
                });
            }
            if *amount == 0 {
                return Err(TokenError::InvalidStateTransition);
            }
        }

        Ok(())
    }

    /// Serialize state to bytes (borsh)
    pub fn to_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap_or_default()
    }

    /// Deserialize state from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        borsh::from_slice(bytes).ok()
    }

    /// SHA-256 commitment over the canonical encoding
    pub fn state_hash(&self) -> [u8; 32] {
        tagged_hash(domain::STATE_HASH_TAG, &[self.to_bytes().as_slice()])
    }
}

// ============ Ledger ============

/// A single ledger instance: state plus the events emitted so far
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenLedger {
    state: LedgerState,
    events: EventLog,
}

impl TokenLedger {
    /// Deploy a new ledger. The whole supply (`supply * 10^18`) is credited
    /// to `creator`.
    pub fn new(creator: Address, name: &str, symbol: &str, supply: u64) -> TokenResult<Self> {
        let state = LedgerState::genesis(creator, name, symbol, supply)?;
        debug!(name, symbol, supply, total_supply = %state.total_supply, "ledger deployed");
        Ok(Self {
            state,
            events: EventLog::new(),
        })
    }

    /// Resume a ledger from previously produced state
    pub fn from_state(state: LedgerState) -> TokenResult<Self> {
        state.verify_invariants()?;
        Ok(Self {
            state,
            events: EventLog::new(),
        })
    }

    // ============ Reads ============

    pub fn name(&self) -> &str {
        &self.state.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.state.metadata.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.state.metadata.decimals
    }

    pub fn total_supply(&self) -> Amount {
        self.state.total_supply
    }

    pub fn balance_of(&self, owner: &Address) -> Amount {
        self.state.balance_of(owner)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.state.allowance(owner, spender)
    }

    pub fn creator(&self) -> &Address {
        &self.state.creator
    }

    /// Deployment identifier
    pub fn address(&self) -> &Address {
        &self.state.address
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn into_state(self) -> LedgerState {
        self.state
    }

    /// Events emitted since construction or the last `take_events`
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Drain the event log
    pub fn take_events(&mut self) -> Vec<TokenEvent> {
        self.events.drain()
    }

    // ============ Mutations ============

    /// Move `amount` from `caller` to `to`
    pub fn transfer(&mut self, caller: Address, to: Address, amount: Amount) -> TokenResult<bool> {
        let result = self.apply_transfer(caller, to, amount);
        trace_outcome("transfer", amount, &result);
        result.map(|()| true)
    }

    /// Set the amount `spender` may move out of `caller`'s balance.
    ///
    /// Overwrites any previous allowance. Changing a non-zero allowance to
    /// another non-zero value is open to the usual front-running race; owners
    /// who care should approve zero first.
    pub fn approve(&mut self, caller: Address, spender: Address, amount: Amount) -> TokenResult<bool> {
        let result = self.apply_approve(caller, spender, amount);
        trace_outcome("approve", amount, &result);
        result.map(|()| true)
    }

    /// Move `amount` from `from` to `to` on behalf of `from`, spending the
    /// allowance `from` granted to `caller`
    pub fn transfer_from(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> TokenResult<bool> {
        let result = self.apply_transfer_from(caller, from, to, amount);
        trace_outcome("transfer_from", amount, &result);
        result.map(|()| true)
    }

    /// Dispatch a serialized call
    pub fn execute(&mut self, caller: Address, action: &TokenAction) -> TokenResult<bool> {
        match action {
            TokenAction::Transfer { to, amount } => self.transfer(caller, *to, *amount),
            TokenAction::Approve { spender, amount } => self.approve(caller, *spender, *amount),
            TokenAction::TransferFrom { from, to, amount } => {
                self.transfer_from(caller, *from, *to, *amount)
            }
        }
    }

    fn apply_transfer(&mut self, caller: Address, to: Address, amount: Amount) -> TokenResult<()> {
        // 1. Recipient must exist
        if is_null(&to) {
            return Err(TokenError::InvalidRecipient);
        }

        // 2. Null principal never sends, not even zero
        if is_null(&caller) {
            return Err(TokenError::InvalidSender);
        }

        // 3. Balance check and move
        self.state.move_balance(caller, to, amount)?;

        self.events.emit(TokenEvent::Transfer {
            from: caller,
            to,
            value: amount,
        });
        Ok(())
    }

    fn apply_approve(&mut self, caller: Address, spender: Address, amount: Amount) -> TokenResult<()> {
        if is_null(&spender) {
            return Err(TokenError::InvalidSpender);
        }
        if is_null(&caller) {
            return Err(TokenError::InvalidSender);
        }

        self.state.write_allowance(caller, spender, amount);

        self.events.emit(TokenEvent::Approval {
            owner: caller,
            spender,
            value: amount,
        });
        Ok(())
    }

    fn apply_transfer_from(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> TokenResult<()> {
        // 1. Recipient must exist
        if is_null(&to) {
            return Err(TokenError::InvalidRecipient);
        }

        // 2. Null principal is never the sender of record
        if is_null(&from) {
            return Err(TokenError::InvalidSender);
        }

        // 3. Owner must hold the amount
        let available = self.state.balance_of(&from);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                available,
                requested: amount,
            });
        }

        // 4. Caller must be allowed to spend it
        let allowed = self.state.allowance(&from, &caller);
        if allowed < amount {
            return Err(TokenError::InsufficientAllowance {
                available: allowed,
                requested: amount,
            });
        }
        let remaining = safe_sub(allowed, amount)?;

        // 5. Apply: balances first, allowance only once the move succeeded
        self.state.move_balance(from, to, amount)?;
        self.state.write_allowance(from, caller, remaining);

        self.events.emit(TokenEvent::Transfer {
            from,
            to,
            value: amount,
        });
        Ok(())
    }
}

fn trace_outcome(op: &'static str, amount: Amount, result: &TokenResult<()>) {
    let (whole, fractional) = format_amount(amount);
    match result {
        Ok(()) => debug!(op, whole = %whole, fractional = %fractional, "call applied"),
        Err(err) => debug!(
            op,
            whole = %whole,
            fractional = %fractional,
            code = err.code(),
            error = %err,
            "call rejected"
        ),
    }
}

// ============ Transition Validation ============

/// Check that `next` is exactly what `action` by `caller` makes of `prev`.
///
/// Returns the events the call emits.
pub fn validate_transition(
    prev: &LedgerState,
    next: &LedgerState,
    caller: Address,
    action: &TokenAction,
) -> TokenResult<Vec<TokenEvent>> {
    next.verify_invariants()?;

    let mut ledger = TokenLedger::from_state(prev.clone())?;
    ledger.execute(caller, action)?;

    let events = ledger.take_events();
    if ledger.into_state() != *next {
        warn!(op = action.name(), "output state does not match applied call");
        return Err(TokenError::InvalidStateTransition);
    }
    Ok(events)
}

/// Check that `next` is the state of a fresh deployment with these arguments
pub fn validate_deployment(
    next: &LedgerState,
    creator: Address,
    name: &str,
    symbol: &str,
    supply: u64,
) -> TokenResult<()> {
    let expected = LedgerState::genesis(creator, name, symbol, supply)?;
    if *next != expected {
        warn!(name, symbol, supply, "deployed state does not match constructor arguments");
        return Err(TokenError::InvalidStateTransition);
    }
    Ok(())
}

// ============ Tests ============

#[cfg(test)]
mod tests {
    use super::*;

    const CREATOR: Address = [1u8; 32];
    const ALICE: Address = [2u8; 32];
    const BOB: Address = [3u8; 32];
    const NULL: Address = token::NULL_ADDRESS;

    fn deploy() -> TokenLedger {
        TokenLedger::new(
            CREATOR,
            token::DEFAULT_NAME,
            token::DEFAULT_SYMBOL,
            token::DEFAULT_SUPPLY,
        )
        .unwrap()
    }

    fn units(human: u64) -> Amount {
        to_base_units(human).unwrap()
    }

    #[test]
    fn test_new_rejects_bad_arguments() {
        assert!(matches!(
            TokenLedger::new(CREATOR, "", "DAPP", 500),
            Err(TokenError::InvalidInput { param: "name", .. })
        ));
        assert!(matches!(
            TokenLedger::new(CREATOR, "Dapp University", "", 500),
            Err(TokenError::InvalidInput { param: "symbol", .. })
        ));
        assert_eq!(
            TokenLedger::new(CREATOR, "Dapp University", "DAPP", 0),
            Err(TokenError::ZeroAmount)
        );
        assert!(matches!(
            TokenLedger::new(NULL, "Dapp University", "DAPP", 500),
            Err(TokenError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_new_emits_nothing() {
        let ledger = deploy();
        assert!(ledger.events().is_empty());
        assert_eq!(ledger.state().holder_count(), 1);
        assert_eq!(
            ledger.state().holders().collect::<Vec<_>>(),
            vec![(&CREATOR, &units(500))]
        );
        assert_eq!(ledger.address(), &deployment_address(&CREATOR, "Dapp University", "DAPP", 500));
    }

    #[test]
    fn test_self_transfer_keeps_balance() {
        let mut ledger = deploy();
        assert_eq!(ledger.transfer(CREATOR, CREATOR, units(100)), Ok(true));
        assert_eq!(ledger.balance_of(&CREATOR), units(500));
        assert_eq!(ledger.events().len(), 1);

        // Still limited by the actual balance
        assert!(matches!(
            ledger.transfer(CREATOR, CREATOR, units(501)),
            Err(TokenError::InsufficientBalance { .. })
        ));
    }

    #[test]
    fn test_zero_amount_transfer_is_allowed() {
        let mut ledger = deploy();
        assert_eq!(ledger.transfer(ALICE, BOB, 0), Ok(true));
        assert_eq!(ledger.balance_of(&ALICE), 0);
        assert_eq!(ledger.balance_of(&BOB), 0);
        // Zero balances are not stored
        assert_eq!(ledger.state().holder_count(), 1);
        assert_eq!(
            ledger.events().last(),
            Some(&TokenEvent::Transfer { from: ALICE, to: BOB, value: 0 })
        );
    }

    #[test]
    fn test_recipient_checked_before_balance() {
        let mut ledger = deploy();
        // ALICE has nothing, but the null recipient is reported first
        assert_eq!(ledger.transfer(ALICE, NULL, units(1)), Err(TokenError::InvalidRecipient));
        assert_eq!(
            ledger.transfer_from(BOB, ALICE, NULL, units(1)),
            Err(TokenError::InvalidRecipient)
        );
    }

    #[test]
    fn test_balance_checked_before_allowance() {
        let mut ledger = deploy();
        ledger.approve(CREATOR, ALICE, units(10)).unwrap();

        let result = ledger.transfer_from(ALICE, CREATOR, BOB, units(600));
        assert_eq!(
            result,
            Err(TokenError::InsufficientBalance { available: units(500), requested: units(600) })
        );
    }

    #[test]
    fn test_null_sender_rejected_even_for_zero() {
        let mut ledger = deploy();
        ledger.approve(CREATOR, ALICE, units(10)).unwrap();
        ledger.take_events();
        let before = ledger.state().clone();

        // Zero passes every balance and allowance check, so the sender check must catch it
        assert_eq!(ledger.transfer_from(ALICE, NULL, BOB, 0), Err(TokenError::InvalidSender));
        assert_eq!(ledger.transfer(NULL, BOB, 0), Err(TokenError::InvalidSender));
        assert_eq!(ledger.approve(NULL, ALICE, units(1)), Err(TokenError::InvalidSender));
        assert_eq!(ledger.approve(NULL, ALICE, 0), Err(TokenError::InvalidSender));

        assert_eq!(ledger.state(), &before);
        assert!(ledger.events().is_empty());
        assert_eq!(ledger.allowance(&NULL, &ALICE), 0);
    }

    #[test]
    fn test_null_recipient_reported_before_null_sender() {
        let mut ledger = deploy();
        assert_eq!(ledger.transfer(NULL, NULL, 0), Err(TokenError::InvalidRecipient));
        assert_eq!(ledger.transfer_from(ALICE, NULL, NULL, 0), Err(TokenError::InvalidRecipient));
        assert_eq!(ledger.approve(NULL, NULL, 0), Err(TokenError::InvalidSpender));
    }

    #[test]
    fn test_failed_calls_leave_no_trace() {
        let mut ledger = deploy();
        ledger.approve(CREATOR, ALICE, units(10)).unwrap();
        ledger.take_events();
        let before = ledger.state().clone();

        assert!(ledger.transfer(CREATOR, BOB, units(501)).is_err());
        assert!(ledger.transfer(CREATOR, NULL, units(1)).is_err());
        assert!(ledger.approve(CREATOR, NULL, units(1)).is_err());
        assert!(ledger.transfer_from(ALICE, CREATOR, BOB, units(11)).is_err());

        assert_eq!(ledger.state(), &before);
        assert!(ledger.events().is_empty());
    }

    #[test]
    fn test_partial_spend_decrements_allowance() {
        let mut ledger = deploy();
        ledger.approve(CREATOR, ALICE, units(100)).unwrap();

        ledger.transfer_from(ALICE, CREATOR, BOB, units(30)).unwrap();
        assert_eq!(ledger.allowance(&CREATOR, &ALICE), units(70));

        ledger.transfer_from(ALICE, CREATOR, ALICE, units(70)).unwrap();
        assert_eq!(ledger.allowance(&CREATOR, &ALICE), 0);
        assert_eq!(ledger.balance_of(&ALICE), units(70));
        assert_eq!(ledger.balance_of(&BOB), units(30));
    }

    #[test]
    fn test_approve_overwrites() {
        let mut ledger = deploy();
        ledger.approve(CREATOR, ALICE, units(100)).unwrap();
        ledger.approve(CREATOR, ALICE, units(5)).unwrap();
        assert_eq!(ledger.allowance(&CREATOR, &ALICE), units(5));

        ledger.approve(CREATOR, ALICE, 0).unwrap();
        assert_eq!(ledger.allowance(&CREATOR, &ALICE), 0);
        assert_eq!(ledger.state(), &LedgerState::genesis(CREATOR, "Dapp University", "DAPP", 500).unwrap());
    }

    #[test]
    fn test_allowance_is_per_spender() {
        let mut ledger = deploy();
        ledger.approve(CREATOR, ALICE, units(10)).unwrap();

        assert_eq!(ledger.allowance(&CREATOR, &BOB), 0);
        assert_eq!(ledger.allowance(&ALICE, &CREATOR), 0);
        assert!(matches!(
            ledger.transfer_from(BOB, CREATOR, BOB, units(1)),
            Err(TokenError::InsufficientAllowance { .. })
        ));
    }

    #[test]
    fn test_execute_dispatch() {
        let mut ledger = deploy();
        let actions = [
            TokenAction::Transfer { to: ALICE, amount: units(50) },
            TokenAction::Approve { spender: BOB, amount: units(20) },
            TokenAction::TransferFrom { from: CREATOR, to: BOB, amount: units(20) },
        ];
        for action in &actions {
            let caller = if matches!(action, TokenAction::TransferFrom { .. }) { BOB } else { CREATOR };
            assert_eq!(ledger.execute(caller, action), Ok(true));
        }

        assert_eq!(ledger.balance_of(&CREATOR), units(430));
        assert_eq!(ledger.balance_of(&ALICE), units(50));
        assert_eq!(ledger.balance_of(&BOB), units(20));
        assert_eq!(ledger.take_events().len(), 3);
    }

    #[test]
    fn test_verify_invariants_detects_tampering() {
        let ledger = deploy();
        assert!(ledger.state().verify_invariants().is_ok());

        let mut minted = ledger.state().clone();
        minted.balances.insert(ALICE, 1);
        assert!(matches!(
            minted.verify_invariants(),
            Err(TokenError::ConservationViolated { .. })
        ));

        let mut null_holder = ledger.state().clone();
        null_holder.balances.insert(CREATOR, units(499));
        null_holder.balances.insert(NULL, units(1));
        assert!(matches!(
            null_holder.verify_invariants(),
            Err(TokenError::InvalidAddress { .. })
        ));

        let mut null_owner = ledger.state().clone();
        null_owner.allowances.insert((NULL, ALICE), units(1));
        assert_eq!(
            null_owner.verify_invariants(),
            Err(TokenError::InvalidAddress { reason: "null principal granted an allowance" })
        );

        let mut zero_entry = ledger.state().clone();
        zero_entry.allowances.insert((CREATOR, ALICE), 0);
        assert_eq!(zero_entry.verify_invariants(), Err(TokenError::InvalidStateTransition));

        let mut renamed = ledger.state().clone();
        renamed.metadata.name = "Other".into();
        assert_eq!(renamed.verify_invariants(), Err(TokenError::InvalidStateTransition));

        assert!(TokenLedger::from_state(minted).is_err());
    }

    #[test]
    fn test_state_hash_tracks_mutations() {
        let mut ledger = deploy();
        let initial = ledger.state().state_hash();
        assert_eq!(initial, ledger.state().state_hash());

        ledger.transfer(CREATOR, ALICE, units(1)).unwrap();
        let after = ledger.state().state_hash();
        assert_ne!(initial, after);

        // Rejected calls do not change the commitment
        let _ = ledger.transfer(ALICE, BOB, units(2));
        assert_eq!(after, ledger.state().state_hash());
    }

    #[test]
    fn test_state_bytes_roundtrip() {
        let mut ledger = deploy();
        ledger.transfer(CREATOR, ALICE, units(100)).unwrap();
        ledger.approve(CREATOR, BOB, units(7)).unwrap();

        let bytes = ledger.state().to_bytes();
        let restored = LedgerState::from_bytes(&bytes).unwrap();
        assert_eq!(&restored, ledger.state());
        assert!(LedgerState::from_bytes(&bytes[..bytes.len() - 1]).is_none());
    }

    #[test]
    fn test_state_cbor_roundtrip() {
        // Hosts carry state as CBOR; pair-keyed allowances must survive it
        let mut ledger = deploy();
        ledger.approve(CREATOR, BOB, units(7)).unwrap();

        let mut bytes = Vec::new();
        ciborium::into_writer(ledger.state(), &mut bytes).unwrap();
        let restored: LedgerState = ciborium::from_reader(bytes.as_slice()).unwrap();

        assert_eq!(&restored, ledger.state());
        assert_eq!(restored.allowance(&CREATOR, &BOB), units(7));
    }

    #[test]
    fn test_validate_transition() {
        let prev = deploy();
        let mut next = prev.clone();
        next.transfer(CREATOR, ALICE, units(100)).unwrap();

        let action = TokenAction::Transfer { to: ALICE, amount: units(100) };
        let events = validate_transition(prev.state(), next.state(), CREATOR, &action).unwrap();
        assert_eq!(
            events,
            vec![TokenEvent::Transfer { from: CREATOR, to: ALICE, value: units(100) }]
        );

        // Same action by a different caller does not produce `next`
        assert!(validate_transition(prev.state(), next.state(), BOB, &action).is_err());

        // Output claiming a different split
        let mut skewed = next.state().clone();
        skewed.balances.insert(CREATOR, units(450));
        skewed.balances.insert(ALICE, units(50));
        assert_eq!(
            validate_transition(prev.state(), &skewed, CREATOR, &action),
            Err(TokenError::InvalidStateTransition)
        );
    }

    #[test]
    fn test_validate_transition_rejects_null_sender() {
        let prev = deploy();
        let action = TokenAction::TransferFrom { from: NULL, to: BOB, amount: 0 };
        assert_eq!(
            validate_transition(prev.state(), prev.state(), ALICE, &action),
            Err(TokenError::InvalidSender)
        );
    }

    #[test]
    fn test_into_state_keeps_mutations() {
        let mut ledger = deploy();
        ledger.transfer(CREATOR, ALICE, units(5)).unwrap();
        let expected = ledger.state().clone();

        let state = ledger.into_state();
        assert_eq!(state, expected);
        assert_eq!(TokenLedger::from_state(state).unwrap().balance_of(&ALICE), units(5));
    }

    #[test]
    fn test_validate_deployment() {
        let ledger = deploy();
        assert!(validate_deployment(ledger.state(), CREATOR, "Dapp University", "DAPP", 500).is_ok());
        assert_eq!(
            validate_deployment(ledger.state(), ALICE, "Dapp University", "DAPP", 500),
            Err(TokenError::InvalidStateTransition)
        );
        assert_eq!(
            validate_deployment(ledger.state(), CREATOR, "Dapp University", "DAPP", 0),
            Err(TokenError::ZeroAmount)
        );
    }
}
