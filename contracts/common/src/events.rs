//! Escrow Events
//!
//! Events are emitted during engine execution and can be indexed
//! off-chain for building UIs, analytics, and notifications.

use crate::Vec;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use crate::types::Address;

/// Event types for indexing and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum EventType {
    InvestorInvested = 0x01,
    InvestorClaimed = 0x02,
    InvestorCompounded = 0x03,
    InvestorWithdrawn = 0x04,
}

/// Main event enum containing all engine events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum EscrowEvent {
    /// Emitted when principal is committed
    InvestorInvested {
        investor_address: Address,
        amount: u128,
        block_height: u64,
    },

    /// Emitted when the accrued reward is paid out
    InvestorClaimed {
        investor_address: Address,
        current_balance: u128,
        claimable_balance: u128,
        block_height: u64,
    },

    /// Emitted when the accrued reward is folded into principal
    InvestorCompounded {
        investor_address: Address,
        current_balance: u128,
        claimable_balance: u128,
        block_height: u64,
    },

    /// Emitted when principal plus final reward leaves the pool
    InvestorWithdrawn {
        investor_address: Address,
        total_withdrawn: u128,
        block_height: u64,
    },
}

impl EscrowEvent {
    /// Get the event type for filtering
    pub fn event_type(&self) -> EventType {
        match self {
            Self::InvestorInvested { .. } => EventType::InvestorInvested,
            Self::InvestorClaimed { .. } => EventType::InvestorClaimed,
            Self::InvestorCompounded { .. } => EventType::InvestorCompounded,
            Self::InvestorWithdrawn { .. } => EventType::InvestorWithdrawn,
        }
    }

    /// Get the block height when event occurred
    pub fn block_height(&self) -> u64 {
        match self {
            Self::InvestorInvested { block_height, .. } => *block_height,
            Self::InvestorClaimed { block_height, .. } => *block_height,
            Self::InvestorCompounded { block_height, .. } => *block_height,
            Self::InvestorWithdrawn { block_height, .. } => *block_height,
        }
    }

    /// Investor the event concerns
    pub fn investor(&self) -> &Address {
        match self {
            Self::InvestorInvested { investor_address, .. } => investor_address,
            Self::InvestorClaimed { investor_address, .. } => investor_address,
            Self::InvestorCompounded { investor_address, .. } => investor_address,
            Self::InvestorWithdrawn { investor_address, .. } => investor_address,
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

/// Event log for collecting events across engine calls
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<EscrowEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Emit an event (add to log)
    pub fn emit(&mut self, event: EscrowEvent) {
        self.events.push(event);
    }

    /// Get all events
    pub fn events(&self) -> &[EscrowEvent] {
        &self.events
    }

    /// Drain all events, leaving the log empty
    pub fn take(&mut self) -> Vec<EscrowEvent> {
        core::mem::take(&mut self.events)
    }

    /// Filter events by type
    pub fn filter_by_type(&self, event_type: EventType) -> Vec<&EscrowEvent> {
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

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type() {
        let event = EscrowEvent::InvestorClaimed {
            investor_address: [1u8; 32],
            current_balance: 100,
            claimable_balance: 1,
            block_height: 100,
        };

        assert_eq!(event.event_type(), EventType::InvestorClaimed);
        assert_eq!(event.block_height(), 100);
        assert_eq!(event.investor(), &[1u8; 32]);
    }

    #[test]
    fn test_event_serialization() {
        let event = EscrowEvent::InvestorWithdrawn {
            investor_address: [2u8; 32],
            total_withdrawn: 102_000_000_000_000_000_000,
            block_height: 200,
        };

        let bytes = event.to_bytes();
        let restored = EscrowEvent::from_bytes(&bytes).unwrap();

        assert_eq!(event, restored);
    }

    #[test]
    fn test_event_log() {
        let mut log = EventLog::new();

        log.emit(EscrowEvent::InvestorInvested {
            investor_address: [2u8; 32],
            amount: 100,
            block_height: 100,
        });

        log.emit(EscrowEvent::InvestorCompounded {
            investor_address: [2u8; 32],
            current_balance: 101,
            claimable_balance: 1,
            block_height: 101,
        });

        assert_eq!(log.len(), 2);
        assert!(log.has_events());

        let compounded = log.filter_by_type(EventType::InvestorCompounded);
        assert_eq!(compounded.len(), 1);

        let drained = log.take();
        assert_eq!(drained.len(), 2);
        assert!(log.is_empty());
    }
}
