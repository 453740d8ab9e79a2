//! Call Codec
//!
//! Raw call data for the escrow engine is a borsh-encoded [`EscrowWitness`]:
//! an operation code from `constants::op`, the caller, the block height and
//! an optional amount.
//!
//! ```text
//! invest:            op=0x01, amount=Some(n)
//! claimBalance:      op=0x02, amount=None
//! compoundBalance:   op=0x03, amount=None
//! withdraw:          op=0x04, amount=None
//! ```

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use escrow_common::{
    constants::op,
    errors::{EscrowError, EscrowResult},
    types::{Address, EscrowAction, EscrowCall},
    Vec,
};

// ============ Witness Structures ============

/// Wire form of a single engine call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct EscrowWitness {
    /// Operation type (see `op` module)
    pub op: u8,
    /// Caller identity
    pub caller: Address,
    /// Block height the call executes at
    pub block_height: u64,
    /// Amount for invest
    pub amount: Option<u128>,
}

impl EscrowWitness {
    /// Create witness for invest operation
    pub fn invest(caller: Address, block_height: u64, amount: u128) -> Self {
        Self {
            op: op::INVEST,
            caller,
            block_height,
            amount: Some(amount),
        }
    }

    /// Create witness for claiming the accrued reward
    pub fn claim_balance(caller: Address, block_height: u64) -> Self {
        Self::without_amount(op::CLAIM_BALANCE, caller, block_height)
    }

    /// Create witness for compounding the accrued reward
    pub fn compound_balance(caller: Address, block_height: u64) -> Self {
        Self::without_amount(op::COMPOUND_BALANCE, caller, block_height)
    }

    /// Create witness for withdraw operation
    pub fn withdraw(caller: Address, block_height: u64) -> Self {
        Self::without_amount(op::WITHDRAW, caller, block_height)
    }

    fn without_amount(op: u8, caller: Address, block_height: u64) -> Self {
        Self {
            op,
            caller,
            block_height,
            amount: None,
        }
    }

    /// Convert to the engine's call type
    ///
    /// Unknown op codes, a missing invest amount, or an amount on an
    /// operation that takes none are rejected.
    pub fn to_call(&self) -> Option<EscrowCall> {
        let action = match (self.op, self.amount) {
            (op::INVEST, Some(amount)) => EscrowAction::Invest { amount },
            (op::CLAIM_BALANCE, None) => EscrowAction::ClaimBalance,
            (op::COMPOUND_BALANCE, None) => EscrowAction::CompoundBalance,
            (op::WITHDRAW, None) => EscrowAction::Withdraw,
            _ => return None,
        };

        Some(EscrowCall {
            caller: self.caller,
            block_height: self.block_height,
            action,
        })
    }
}

impl From<&EscrowCall> for EscrowWitness {
    fn from(call: &EscrowCall) -> Self {
        let amount = match call.action {
            EscrowAction::Invest { amount } => Some(amount),
            _ => None,
        };

        Self {
            op: call.action.op_code(),
            caller: call.caller,
            block_height: call.block_height,
            amount,
        }
    }
}

// ============ Encoding ============

/// Encode a call as raw call data
pub fn encode_call(call: &EscrowCall) -> Vec<u8> {
    borsh::to_vec(&EscrowWitness::from(call)).unwrap_or_default()
}

/// Decode raw call data
pub fn decode_call(bytes: &[u8]) -> EscrowResult<EscrowCall> {
    let witness: EscrowWitness =
        borsh::from_slice(bytes).map_err(|_| EscrowError::InvalidCallData)?;
    witness.to_call().ok_or(EscrowError::InvalidCallData)
}

// ============ Tests ============
