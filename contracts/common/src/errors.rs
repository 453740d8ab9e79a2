//! Error Types for the Escrow Engine
//!
//! Typed errors with stable codes for logging and a `Display` rendering
//! that carries the user-visible revert message.

use core::fmt;

use crate::types::Address;

/// Result type alias for escrow operations
pub type EscrowResult<T> = Result<T, EscrowError>;

/// Failures reported by the external token ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Sender does not hold enough tokens
    InsufficientBalance { available: u128, requested: u128 },

    /// Spender was not approved for enough tokens
    InsufficientAllowance { allowance: u128, requested: u128 },

    /// Zero address used as sender or recipient
    ZeroAddress,

    /// Balance or supply would overflow
    Overflow,
}

impl TokenError {
    /// Message surfaced to the caller when the token call reverts
    pub fn message(&self) -> &'static str {
        match self {
            Self::InsufficientBalance { .. } => "ERC20: transfer amount exceeds balance",
            Self::InsufficientAllowance { .. } => "ERC20: insufficient allowance",
            Self::ZeroAddress => "ERC20: transfer to or from the zero address",
            Self::Overflow => "ERC20: balance overflow",
        }
    }
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Main error enum for all escrow engine errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscrowError {
    // ============ Investor Errors ============
    /// Invest called with a zero amount
    InvalidAmount { amount: u128 },

    /// Identity already invested (also after a withdrawal)
    AlreadyInvested { investor: Address },

    /// Identity has no live investment
    NoInvestment { investor: Address },

    /// Caller is the pool itself or the zero address
    InvalidCaller { caller: Address },

    // ============ Pool Errors ============
    /// Underlying token call failed
    TransferFailed { reason: TokenError },

    /// Accrued reward is not covered by idle pool balance
    InsufficientPoolBalance { available: u128, required: u128 },

    /// Pool holds less than the principal owed to investors
    PoolInsolvent {
        pool_balance: u128,
        total_principal: u128,
    },

    // ============ Math Errors ============
    /// Arithmetic overflow occurred
    Overflow,

    // ============ Input Validation Errors ============
    /// Rejected engine configuration
    InvalidConfig {
        param: &'static str,
        reason: &'static str,
    },

    /// Call bytes could not be decoded
    InvalidCallData,
}

impl EscrowError {
    /// Returns a human-readable error code for logging/debugging
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "E010_INVALID_AMOUNT",
            Self::AlreadyInvested { .. } => "E011_ALREADY_INVESTED",
            Self::NoInvestment { .. } => "E012_NO_INVESTMENT",
            Self::InvalidCaller { .. } => "E013_INVALID_CALLER",
            Self::TransferFailed { .. } => "E020_TRANSFER_FAILED",
            Self::InsufficientPoolBalance { .. } => "E021_POOL_INSUFFICIENT",
            Self::PoolInsolvent { .. } => "E022_POOL_INSOLVENT",
            Self::Overflow => "E030_OVERFLOW",
            Self::InvalidConfig { .. } => "E040_INVALID_CONFIG",
            Self::InvalidCallData => "E041_INVALID_CALL_DATA",
        }
    }

    /// Returns true if this error is recoverable (user can fix it)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidAmount { .. } => true,           // Send a positive amount
            Self::TransferFailed { .. } => true,          // Fund or approve
            Self::InsufficientPoolBalance { .. } => true, // Wait for the pool to be topped up
            _ => false,
        }
    }
}

impl fmt::Display for EscrowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAmount { .. } => f.write_str("Amount must be greater than 0"),
            Self::AlreadyInvested { .. } => f.write_str("This address already invested"),
            Self::NoInvestment { .. } => f.write_str("This address have no investment"),
            Self::InvalidCaller { .. } => f.write_str("This address cannot invest"),
            Self::TransferFailed { reason } => fmt::Display::fmt(reason, f),
            Self::InsufficientPoolBalance { available, required } => write!(
                f,
                "Insufficient pool balance: {} available, {} required",
                available, required
            ),
            Self::PoolInsolvent {
                pool_balance,
                total_principal,
            } => write!(
                f,
                "Pool balance below total principal: {} < {}",
                pool_balance, total_principal
            ),
            Self::Overflow => f.write_str("Arithmetic overflow"),
            Self::InvalidConfig { param, reason } => write!(f, "Invalid {}: {}", param, reason),
            Self::InvalidCallData => f.write_str("Invalid call data"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EscrowError {}

#[cfg(feature = "std")]
impl std::error::Error for TokenError {}

impl From<TokenError> for EscrowError {
    fn from(reason: TokenError) -> Self {
        Self::TransferFailed { reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_error_codes_unique() {
        let errors = [
            EscrowError::InvalidAmount { amount: 0 },
            EscrowError::AlreadyInvested { investor: [1u8; 32] },
            EscrowError::NoInvestment { investor: [1u8; 32] },
            EscrowError::InvalidCaller { caller: [1u8; 32] },
            EscrowError::TransferFailed {
                reason: TokenError::ZeroAddress,
            },
            EscrowError::InsufficientPoolBalance {
                available: 0,
                required: 1,
            },
            EscrowError::PoolInsolvent {
                pool_balance: 0,
                total_principal: 1,
            },
            EscrowError::Overflow,
            EscrowError::InvalidConfig {
                param: "reward_rate_bps",
                reason: "too large",
            },
            EscrowError::InvalidCallData,
        ];

        let codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        let unique: BTreeSet<_> = codes.iter().collect();
        assert_eq!(codes.len(), unique.len(), "Error codes must be unique");
    }

    #[test]
    fn test_revert_messages() {
        assert_eq!(
            EscrowError::InvalidAmount { amount: 0 }.to_string(),
            "Amount must be greater than 0"
        );
        assert_eq!(
            EscrowError::AlreadyInvested { investor: [7u8; 32] }.to_string(),
            "This address already invested"
        );
        assert_eq!(
            EscrowError::NoInvestment { investor: [7u8; 32] }.to_string(),
            "This address have no investment"
        );
    }

    #[test]
    fn test_transfer_failure_surfaces_token_message() {
        let err: EscrowError = TokenError::InsufficientAllowance {
            allowance: 0,
            requested: 10,
        }
        .into();

        assert_eq!(err.code(), "E020_TRANSFER_FAILED");
        assert_eq!(err.to_string(), "ERC20: insufficient allowance");
        assert!(err.is_recoverable());
    }
}
