//! Escrow Contract
//!
//! Investor accounting engine for a pooled token escrow.
//! Investors commit principal once, earn a fixed-rate reward on every
//! reward-triggering call, and either claim it, compound it, or withdraw
//! principal plus a final reward.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninvested --invest--> Invested --withdraw--> Withdrawn (terminal)
//!                          |   ^
//!                          +---+ claimBalance / compoundBalance
//! ```
//!
//! ## Execution Model
//!
//! - Every operation takes `&mut Escrow`, so transitions never interleave
//! - State effects are applied before the token ledger is called
//! - A failed ledger call restores the previous record and totals
//! - Rewards are only paid from idle pool balance (pool minus principal)

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use escrow_common::{
    constants::{accrual::DEFAULT_BLOCKS_PER_PERIOD, reward::{DEFAULT_REWARD_RATE_BPS, MAX_REWARD_RATE_BPS}},
    errors::{EscrowError, EscrowResult},
    types::{AccrualBasis, Address},
    validation::{check, require_valid_address},
};

pub mod codec;
pub mod engine;


pub use codec::{decode_call, encode_call, EscrowWitness};
pub use engine::Escrow;

// ============ Escrow Config ============

/// Configuration for the escrow engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct EscrowConfig {
    /// Token ledger the pool is held on
    pub token: Address,
    /// Engine's own account on the token ledger (the pool)
    pub escrow_address: Address,
    /// Reward per accrual period in basis points
    pub reward_rate_bps: u64,
    /// How accrual periods are counted
    pub accrual_basis: AccrualBasis,
}

impl EscrowConfig {
    /// Config with the default 1% per-call reward
    pub fn new(token: Address, escrow_address: Address) -> Self {
        Self {
            token,
            escrow_address,
            reward_rate_bps: DEFAULT_REWARD_RATE_BPS,
            accrual_basis: AccrualBasis::PerCall,
        }
    }

    pub fn with_reward_rate_bps(mut self, reward_rate_bps: u64) -> Self {
        self.reward_rate_bps = reward_rate_bps;
        self
    }

    pub fn with_accrual_basis(mut self, accrual_basis: AccrualBasis) -> Self {
        self.accrual_basis = accrual_basis;
        self
    }

    /// Switch to block-weighted accrual with the default period length
    pub fn per_block(self) -> Self {
        self.with_accrual_basis(AccrualBasis::PerBlock {
            blocks_per_period: DEFAULT_BLOCKS_PER_PERIOD,
        })
    }

    /// Reject configs the engine cannot run with
    pub fn validate(&self) -> EscrowResult<()> {
        require_valid_address(&self.token, "token")?;
        require_valid_address(&self.escrow_address, "escrow_address")?;

        check!(
            self.token != self.escrow_address,
            EscrowError::InvalidConfig {
                param: "escrow_address",
                reason: "must differ from the token address",
            }
        );

        check!(
            self.reward_rate_bps <= MAX_REWARD_RATE_BPS,
            EscrowError::InvalidConfig {
                param: "reward_rate_bps",
                reason: "must not exceed 10000",
            }
        );

        if let AccrualBasis::PerBlock { blocks_per_period } = self.accrual_basis {
            check!(
                blocks_per_period > 0,
                EscrowError::InvalidConfig {
                    param: "blocks_per_period",
                    reason: "must be greater than 0",
                }
            );
        }

        Ok(())
    }
}

// ============ Tests ============
