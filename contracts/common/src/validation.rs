//! Validation Helpers for the Escrow Engine
//!
//! Precondition checks shared by the engine operations.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use escrow_common::validation::{check, require_positive_amount};
//!
//! check!(record.is_active(), EscrowError::NoInvestment { investor })?;
//! require_positive_amount(amount)?;
//! ```

use crate::{
    errors::{EscrowError, EscrowResult, TokenError},
    math::reward_headroom,
    types::{Address, InvestorRecord, ZERO_ADDRESS},
};

// ============ Validation Macro ============

/// Check a condition and return an error if it fails.
#[macro_export]
macro_rules! check {
    ($condition:expr, $error:expr) => {
        if !($condition) {
            return Err($error);
        }
    };
}

pub use check;

// ============ Investor Preconditions ============

/// Require a strictly positive invest amount.
pub fn require_positive_amount(amount: u128) -> EscrowResult<()> {
    check!(amount > 0, EscrowError::InvalidAmount { amount });
    Ok(())
}

/// Require that the identity has never invested.
///
/// A withdrawn record still counts as invested.
pub fn require_not_invested(record: Option<&InvestorRecord>, investor: Address) -> EscrowResult<()> {
    let has_invested = record.map(|r| r.has_invested).unwrap_or(false);
    check!(!has_invested, EscrowError::AlreadyInvested { investor });
    Ok(())
}

/// Require an investor identity that is neither the zero address nor the
/// pool's own account.
///
/// A pool-to-pool pull moves no tokens, so it must never create principal.
pub fn require_external_caller(caller: &Address, escrow_address: &Address) -> EscrowResult<()> {
    check!(
        *caller != ZERO_ADDRESS && caller != escrow_address,
        EscrowError::InvalidCaller { caller: *caller }
    );
    Ok(())
}

/// Require a live investment and hand back the record.
pub fn require_active_investment(
    record: Option<&InvestorRecord>,
    investor: Address,
) -> EscrowResult<&InvestorRecord> {
    match record {
        Some(r) if r.is_active() => Ok(r),
        _ => Err(EscrowError::NoInvestment { investor }),
    }
}

// ============ Pool Preconditions ============

/// Require the reward to be covered by idle pool balance.
pub fn require_reward_headroom(
    pool_balance: u128,
    total_principal: u128,
    reward: u128,
) -> EscrowResult<()> {
    let available = reward_headroom(pool_balance, total_principal);
    check!(
        reward <= available,
        EscrowError::InsufficientPoolBalance {
            available,
            required: reward,
        }
    );
    Ok(())
}

/// Require the pool to cover a withdrawal payout.
///
/// The withdrawing investor can take their own principal plus idle pool
/// balance; other investors' principal is never available. A shortfall
/// surfaces as the transfer failure the ledger would report.
pub fn require_payout_covered(
    pool_balance: u128,
    total_principal: u128,
    principal: u128,
    payout: u128,
) -> EscrowResult<()> {
    let available = principal.saturating_add(reward_headroom(pool_balance, total_principal));
    check!(
        payout <= available,
        EscrowError::TransferFailed {
            reason: TokenError::InsufficientBalance {
                available,
                requested: payout,
            },
        }
    );
    Ok(())
}

/// Require the pool to hold at least the principal owed.
pub fn require_solvent(pool_balance: u128, total_principal: u128) -> EscrowResult<()> {
    check!(
        pool_balance >= total_principal,
        EscrowError::PoolInsolvent {
            pool_balance,
            total_principal,
        }
    );
    Ok(())
}

// ============ Common Validation Helpers ============

/// Require a non-zero address.
pub fn require_valid_address(address: &Address, param: &'static str) -> EscrowResult<()> {
    check!(
        *address != ZERO_ADDRESS,
        EscrowError::InvalidConfig {
            param,
            reason: "address must not be zero",
        }
    );
    Ok(())
}
