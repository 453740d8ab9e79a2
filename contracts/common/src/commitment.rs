//! State Commitments
//!
//! SHA-256 digests used to audit the investor registry off-chain and to
//! derive deterministic addresses.

use sha2::{Digest, Sha256};

use crate::types::{Address, InvestorRecord};

/// Domain tag mixed into every registry commitment
const REGISTRY_DOMAIN: &[u8] = b"escrow/registry/v1";

/// Domain tag for derived addresses
const ADDRESS_DOMAIN: &[u8] = b"escrow/address/v1";

/// Deterministic address from an arbitrary seed
pub fn derive_address(seed: &[u8]) -> Address {
    let mut hasher = Sha256::new();
    hasher.update(ADDRESS_DOMAIN);
    hasher.update(seed);
    let result = hasher.finalize();
    let mut address = [0u8; 32];
    address.copy_from_slice(&result);
    address
}

/// Commitment over every record plus the running principal total
///
/// Records must be supplied in address order; the engine's `BTreeMap`
/// iteration guarantees that.
pub fn registry_root<'a, I>(records: I, total_principal: u128) -> [u8; 32]
where
    I: IntoIterator<Item = (&'a Address, &'a InvestorRecord)>,
{
    let mut hasher = Sha256::new();
    hasher.update(REGISTRY_DOMAIN);
    hasher.update(total_principal.to_le_bytes());

    for (address, record) in records {
        hasher.update(address);
        hasher.update(record.current_balance.to_le_bytes());
        hasher.update([record.has_invested as u8]);
        hasher.update(record.invested_at.to_le_bytes());
        hasher.update(record.last_accrual_block.to_le_bytes());
        hasher.update(record.accrual_count.to_le_bytes());
    }

    let result = hasher.finalize();
    let mut root = [0u8; 32];
    root.copy_from_slice(&result);
    root
}
