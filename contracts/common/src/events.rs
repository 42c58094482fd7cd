//! Ledger Events
//!
//! Events are emitted by successful mutations and can be indexed
//! off-chain. A rejected call never emits.

use crate::Vec;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use crate::types::{Address, Amount};

/// Event types for indexing and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum EventType {
    Transfer = 0x01,
    Approval = 0x02,
}

/// Main event enum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum TokenEvent {
    /// Emitted by `transfer` and `transfer_from`
    Transfer {
        from: Address,
        to: Address,
        value: Amount,
    },

    /// Emitted by `approve`
    Approval {
        owner: Address,
        spender: Address,
        value: Amount,
    },
}

impl TokenEvent {
    /// Get the event type for filtering
    pub fn event_type(&self) -> EventType {
        match self {
            Self::Transfer { .. } => EventType::Transfer,
            Self::Approval { .. } => EventType::Approval,
        }
    }

    /// Amount carried by the event
    pub fn value(&self) -> Amount {
        match self {
            Self::Transfer { value, .. } | Self::Approval { value, .. } => *value,
        }
    }

    /// Serialize event to bytes for storage/transmission
    pub fn to_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap_or_default()
    }

    /// Deserialize event from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        borsh::from_slice(bytes).ok()
    }
}

/// Event log for collecting events during execution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<TokenEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Emit an event (add to log)
    pub fn emit(&mut self, event: TokenEvent) {
        self.events.push(event);
    }

    /// Get all events
    pub fn events(&self) -> &[TokenEvent] {
        &self.events
    }

    /// Most recent event, if any
    pub fn last(&self) -> Option<&TokenEvent> {
        self.events.last()
    }

    /// Take all events, leaving the log empty
    pub fn drain(&mut self) -> Vec<TokenEvent> {
        core::mem::take(&mut self.events)
    }

    /// Take ownership of all events
    pub fn into_events(self) -> Vec<TokenEvent> {
        self.events
    }

    /// Filter events by type
    pub fn filter_by_type(&self, event_type: EventType) -> Vec<&TokenEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Check if any events were emitted
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Get number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if nothing has been emitted
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
