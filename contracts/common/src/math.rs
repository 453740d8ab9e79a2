//! Accrual Math for the Escrow Engine
//!
//! Checked integer arithmetic only. Rewards are floored to the token's
//! smallest unit; the remainder is forfeited, never carried.

use crate::constants::reward::BPS_DENOMINATOR;
use crate::errors::{EscrowError, EscrowResult};
use crate::types::AccrualBasis;

/// Reward for a number of elapsed periods
///
/// accrued = floor(balance * rate_bps * periods / 10_000)
///
/// # Arguments
/// * `balance` - Current principal in base units
/// * `rate_bps` - Reward per period in basis points
/// * `periods` - Elapsed accrual periods
pub fn calculate_accrued(balance: u128, rate_bps: u64, periods: u64) -> EscrowResult<u128> {
    if balance == 0 || rate_bps == 0 || periods == 0 {
        return Ok(0);
    }

    let accrued = balance
        .checked_mul(rate_bps as u128)
        .ok_or(EscrowError::Overflow)?
        .checked_mul(periods as u128)
        .ok_or(EscrowError::Overflow)?
        / BPS_DENOMINATOR;

    Ok(accrued)
}

/// Elapsed periods and the checkpoint they advance to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccrualWindow {
    /// Whole periods since the checkpoint
    pub periods: u64,
    /// Checkpoint after this accrual
    pub next_checkpoint: u64,
}

/// Count the periods elapsed since `last_checkpoint`
///
/// Per call: always one period, checkpoint moves to `block_height`.
/// Per block: whole periods only; the checkpoint moves forward by exactly
/// those periods so a partial period keeps counting toward the next call.
/// A block height behind the checkpoint counts zero periods.
pub fn accrual_window(
    basis: AccrualBasis,
    last_checkpoint: u64,
    block_height: u64,
) -> EscrowResult<AccrualWindow> {
    match basis {
        AccrualBasis::PerCall => Ok(AccrualWindow {
            periods: 1,
            next_checkpoint: block_height.max(last_checkpoint),
        }),
        AccrualBasis::PerBlock { blocks_per_period } => {
            if blocks_per_period == 0 {
                return Err(EscrowError::InvalidConfig {
                    param: "blocks_per_period",
                    reason: "must be greater than 0",
                });
            }

            let elapsed = block_height.saturating_sub(last_checkpoint);
            let periods = elapsed / blocks_per_period;
            let next_checkpoint = last_checkpoint
                .checked_add(periods * blocks_per_period)
                .ok_or(EscrowError::Overflow)?;

            Ok(AccrualWindow {
                periods,
                next_checkpoint,
            })
        }
    }
}

/// Idle pool balance available for rewards
pub fn reward_headroom(pool_balance: u128, total_principal: u128) -> u128 {
    pool_balance.saturating_sub(total_principal)
}
