//! Protocol Constants
//!
//! All magic numbers and default configuration values for the escrow engine.

/// Token Metadata
///
/// The engine never depends on these; they describe the default pooled
/// asset (an 18-decimal stablecoin) and are used by tests and demos.
pub mod token {
    /// Decimal places of the default pooled asset
    pub const DECIMALS: u8 = 18;
    /// One unit with decimals (1 token = 10^18 base units)
    pub const ONE: u128 = 1_000_000_000_000_000_000;
}

/// Reward Configuration (in basis points, 100 = 1%)
pub mod reward {
    /// Basis points denominator
    pub const BPS_DENOMINATOR: u128 = 10_000;

    /// Default reward per accrual period (1%)
    pub const DEFAULT_REWARD_RATE_BPS: u64 = 100;

    /// Upper bound for a configured reward rate (100% per period)
    pub const MAX_REWARD_RATE_BPS: u64 = 10_000;
}

/// Accrual Checkpoint Configuration
pub mod accrual {
    /// Default period length when the engine accrues per block range
    /// (~1 day of 10 minute blocks)
    pub const DEFAULT_BLOCKS_PER_PERIOD: u64 = 144;
}

/// Call Codec Operation Codes
pub mod op {
    /// Commit principal
    pub const INVEST: u8 = 0x01;
    /// Pay out accrued reward
    pub const CLAIM_BALANCE: u8 = 0x02;
    /// Fold accrued reward into principal
    pub const COMPOUND_BALANCE: u8 = 0x03;
    /// Exit with principal plus final reward
    pub const WITHDRAW: u8 = 0x04;
}
