//! Core Types for the Escrow Engine
//!
//! Investor records, lifecycle states, the accrual basis and the call
//! surface shared between the engine and its hosts.

use borsh::{BorshDeserialize, BorshSerialize};
use core::fmt;
use serde::{Deserialize, Serialize};

use crate::constants::op;

/// Type alias for addresses (32-byte hash)
pub type Address = [u8; 32];

/// The all-zero address, never a valid investor, token or pool
pub const ZERO_ADDRESS: Address = [0u8; 32];

/// Short hex rendering of an address for log fields
pub struct ShortAddress<'a>(pub &'a Address);

impl fmt::Display for ShortAddress<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0[..4] {
            write!(f, "{:02x}", byte)?;
        }
        f.write_str("..")
    }
}

// ============ Investor Types ============

/// Lifecycle of an investor identity
///
/// `Withdrawn` is terminal: the identity keeps `has_invested = true` and
/// cannot invest again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum InvestorStatus {
    /// Never invested
    #[default]
    Uninvested,
    /// Principal committed and earning
    Invested,
    /// Principal and final reward paid out
    Withdrawn,
}

/// Per-identity accounting record
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct InvestorRecord {
    /// Principal plus all reward compounded so far
    pub current_balance: u128,
    /// Set by the first successful invest, never reset
    pub has_invested: bool,
    /// Block height of the successful invest
    pub invested_at: u64,
    /// Block height the next accrual is measured from
    pub last_accrual_block: u64,
    /// Number of reward-triggering calls applied so far
    pub accrual_count: u64,
}

impl InvestorRecord {
    /// Fresh record for a first investment
    pub fn new(amount: u128, block_height: u64) -> Self {
        Self {
            current_balance: amount,
            has_invested: true,
            invested_at: block_height,
            last_accrual_block: block_height,
            accrual_count: 0,
        }
    }

    /// Lifecycle state derived from the stored fields
    ///
    /// Invest starts from a positive amount and compounding never lowers the
    /// balance, so only withdraw leaves an invested record at zero.
    pub fn status(&self) -> InvestorStatus {
        match (self.has_invested, self.current_balance) {
            (false, _) => InvestorStatus::Uninvested,
            (true, 0) => InvestorStatus::Withdrawn,
            (true, _) => InvestorStatus::Invested,
        }
    }

    /// Record can take claim, compound and withdraw
    pub fn is_active(&self) -> bool {
        self.status() == InvestorStatus::Invested
    }

    /// Move the accrual checkpoint after a reward-triggering call
    pub fn advance_checkpoint(&mut self, next_checkpoint: u64) {
        self.last_accrual_block = next_checkpoint;
        self.accrual_count = self.accrual_count.saturating_add(1);
    }
}

// ============ Accrual Types ============

/// How elapsed accrual periods are counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum AccrualBasis {
    /// Every reward-triggering call accrues exactly one period
    #[default]
    PerCall,
    /// One period per `blocks_per_period` blocks since the checkpoint
    PerBlock { blocks_per_period: u64 },
}

// ============ Call Types ============

/// Who is calling and when
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct CallContext {
    /// Caller identity; every operation acts on the caller's own record
    pub caller: Address,
    /// Current block height
    pub block_height: u64,
}

impl CallContext {
    pub fn new(caller: Address, block_height: u64) -> Self {
        Self {
            caller,
            block_height,
        }
    }
}

/// Actions exposed by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum EscrowAction {
    /// Commit principal (pulled with transfer-from)
    Invest { amount: u128 },
    /// Pay out the accrued reward
    ClaimBalance,
    /// Fold the accrued reward into principal
    CompoundBalance,
    /// Exit with principal plus one final reward
    Withdraw,
}

impl EscrowAction {
    /// Stable operation code for indexing
    pub fn op_code(&self) -> u8 {
        match self {
            Self::Invest { .. } => op::INVEST,
            Self::ClaimBalance => op::CLAIM_BALANCE,
            Self::CompoundBalance => op::COMPOUND_BALANCE,
            Self::Withdraw => op::WITHDRAW,
        }
    }

    /// Whether the action computes a reward
    pub fn triggers_accrual(&self) -> bool {
        !matches!(self, Self::Invest { .. })
    }
}

/// A full call as it travels on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct EscrowCall {
    /// Caller identity
    pub caller: Address,
    /// Block height the call executes at
    pub block_height: u64,
    /// Requested action
    pub action: EscrowAction,
}

impl EscrowCall {
    /// Split into the execution context and the action
    pub fn context(&self) -> CallContext {
        CallContext::new(self.caller, self.block_height)
    }
}

// ============ Outcome Types ============

/// Result of claim and compound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct AccrualReceipt {
    /// Investor identity
    pub investor_address: Address,
    /// Balance after the call (unchanged by claim)
    pub current_balance: u128,
    /// Reward computed by the call
    pub claimable_balance: u128,
}

/// Result of any engine action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum ActionOutcome {
    /// Principal committed
    Invested {
        investor_address: Address,
        amount: u128,
    },
    /// Reward paid out
    Claimed(AccrualReceipt),
    /// Reward added to principal
    Compounded(AccrualReceipt),
    /// Principal plus final reward paid out
    Withdrawn {
        investor_address: Address,
        total_withdrawn: u128,
    },
}
