//! Escrow Common Library
//!
//! Shared types, constants, and utilities for the escrow engine.
//!
//! ## Modules
//!
//! - **Constants**: default reward rate, accrual period, op codes
//! - **Errors**: typed errors with stable codes and revert messages
//! - **Types**: investor records, lifecycle states, call surface
//! - **Math**: floor-division accrual and period counting
//! - **Events**: indexable investor events and the event log
//! - **Token Ledger**: the seam to the pooled asset plus an in-memory ledger
//! - **Validation**: shared precondition checks
//! - **Commitment**: SHA-256 registry roots and derived addresses
//!
//! This crate is `no_std` compatible when built without the `std` feature.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Re-export collections for submodules based on feature
#[cfg(not(feature = "std"))]
pub use alloc::{collections::BTreeMap, vec::Vec};
#[cfg(feature = "std")]
pub use std::{collections::BTreeMap, vec::Vec};

pub mod constants;
pub mod errors;
pub mod types;
pub mod math;
pub mod events;
pub mod token_ledger;
pub mod validation;
pub mod commitment;

// Re-exports for convenience
pub use constants::*;
pub use errors::*;
pub use types::*;
pub use math::*;
pub use events::*;
pub use token_ledger::*;
pub use commitment::*;
