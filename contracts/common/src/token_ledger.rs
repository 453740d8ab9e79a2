//! Token Ledger Seam
//!
//! The escrow engine never owns token balances. It moves the pooled asset
//! through the three primitives of [`TokenLedger`], each of which either
//! applies completely or fails with a [`TokenError`] and changes nothing.
//!
//! [`InMemoryLedger`] is a self-contained fungible-token ledger with
//! balances and allowances, used to seed pools in tests and simulations.

use crate::{BTreeMap, ZERO_ADDRESS};
use crate::errors::TokenError;
use crate::types::Address;

// ============================================================================
// Ledger Interface
// ============================================================================

/// Primitive token operations consumed by the engine
pub trait TokenLedger {
    /// Move `amount` owned by `from` to `to`
    fn transfer(&mut self, from: &Address, to: &Address, amount: u128) -> Result<(), TokenError>;

    /// Move `amount` owned by `from` to `to` using the allowance `from`
    /// granted to `spender`
    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), TokenError>;

    /// Current balance of `owner`
    fn balance_of(&self, owner: &Address) -> u128;
}

impl<L: TokenLedger + ?Sized> TokenLedger for &mut L {
    fn transfer(&mut self, from: &Address, to: &Address, amount: u128) -> Result<(), TokenError> {
        (**self).transfer(from, to, amount)
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), TokenError> {
        (**self).transfer_from(spender, from, to, amount)
    }

    fn balance_of(&self, owner: &Address) -> u128 {
        (**self).balance_of(owner)
    }
}

// ============================================================================
// In-Memory Ledger
// ============================================================================

/// Balance and allowance book for a single fungible token
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    balances: BTreeMap<Address, u128>,
    allowances: BTreeMap<(Address, Address), u128>,
    total_supply: u128,
}

impl InMemoryLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Create new tokens for `to`
    pub fn mint(&mut self, to: &Address, amount: u128) -> Result<(), TokenError> {
        if *to == ZERO_ADDRESS {
            return Err(TokenError::ZeroAddress);
        }

        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;

        self.total_supply = supply;
        self.balances.insert(*to, balance);
        Ok(())
    }

    /// Set the allowance `owner` grants to `spender`
    ///
    /// `u128::MAX` is an unlimited allowance that is never decremented.
    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: u128) -> Result<(), TokenError> {
        if *owner == ZERO_ADDRESS || *spender == ZERO_ADDRESS {
            return Err(TokenError::ZeroAddress);
        }
        self.allowances.insert((*owner, *spender), amount);
        Ok(())
    }

    /// Remaining allowance `owner` granted to `spender`
    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    /// Total tokens in existence
    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Number of addresses holding a non-zero balance
    pub fn holder_count(&self) -> usize {
        self.balances.values().filter(|b| **b > 0).count()
    }

    /// Validate a move and return the resulting balances
    fn plan_move(&self, from: &Address, to: &Address, amount: u128) -> Result<(u128, u128), TokenError> {
        if *from == ZERO_ADDRESS || *to == ZERO_ADDRESS {
            return Err(TokenError::ZeroAddress);
        }

        let available = self.balance_of(from);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                available,
                requested: amount,
            });
        }

        if from == to {
            return Ok((available, available));
        }

        let new_from = available - amount;
        let new_to = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        Ok((new_from, new_to))
    }

    fn apply_move(&mut self, from: &Address, to: &Address, new_from: u128, new_to: u128) {
        self.balances.insert(*from, new_from);
        self.balances.insert(*to, new_to);
    }
}

impl TokenLedger for InMemoryLedger {
    fn transfer(&mut self, from: &Address, to: &Address, amount: u128) -> Result<(), TokenError> {
        let (new_from, new_to) = self.plan_move(from, to, amount)?;
        self.apply_move(from, to, new_from, new_to);
        Ok(())
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), TokenError> {
        let allowance = self.allowance(from, spender);
        if allowance < amount {
            return Err(TokenError::InsufficientAllowance {
                allowance,
                requested: amount,
            });
        }

        let (new_from, new_to) = self.plan_move(from, to, amount)?;
        self.apply_move(from, to, new_from, new_to);

        if allowance != u128::MAX {
            self.allowances.insert((*from, *spender), allowance - amount);
        }
        Ok(())
    }

    fn balance_of(&self, owner: &Address) -> u128 {
        self.balances.get(owner).copied().unwrap_or(0)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Address {
        [1u8; 32]
    }

    fn bob() -> Address {
        [2u8; 32]
    }

    fn pool() -> Address {
        [9u8; 32]
    }

    #[test]
    fn test_mint_and_balance() {
        let mut ledger = InMemoryLedger::new();
        ledger.mint(&alice(), 500).unwrap();

        assert_eq!(ledger.balance_of(&alice()), 500);
        assert_eq!(ledger.total_supply(), 500);
        assert_eq!(ledger.holder_count(), 1);
    }

    #[test]
    fn test_mint_to_zero_address_fails() {
        let mut ledger = InMemoryLedger::new();
        assert_eq!(ledger.mint(&ZERO_ADDRESS, 1), Err(TokenError::ZeroAddress));
    }

    #[test]
    fn test_transfer() {
        let mut ledger = InMemoryLedger::new();
        ledger.mint(&alice(), 500).unwrap();

        ledger.transfer(&alice(), &bob(), 200).unwrap();

        assert_eq!(ledger.balance_of(&alice()), 300);
        assert_eq!(ledger.balance_of(&bob()), 200);
        assert_eq!(ledger.total_supply(), 500);
    }

    #[test]
    fn test_transfer_insufficient_balance_changes_nothing() {
        let mut ledger = InMemoryLedger::new();
        ledger.mint(&alice(), 100).unwrap();

        let result = ledger.transfer(&alice(), &bob(), 101);

        assert_eq!(
            result,
            Err(TokenError::InsufficientBalance {
                available: 100,
                requested: 101
            })
        );
        assert_eq!(ledger.balance_of(&alice()), 100);
        assert_eq!(ledger.balance_of(&bob()), 0);
    }

    #[test]
    fn test_transfer_to_self_keeps_balance() {
        let mut ledger = InMemoryLedger::new();
        ledger.mint(&alice(), 100).unwrap();

        ledger.transfer(&alice(), &alice(), 60).unwrap();
        assert_eq!(ledger.balance_of(&alice()), 100);
    }

    #[test]
    fn test_zero_amount_transfer_allowed() {
        let mut ledger = InMemoryLedger::new();
        ledger.transfer(&alice(), &bob(), 0).unwrap();
        assert_eq!(ledger.balance_of(&bob()), 0);
    }

    #[test]
    fn test_transfer_from_spends_allowance() {
        let mut ledger = InMemoryLedger::new();
        ledger.mint(&alice(), 200).unwrap();
        ledger.approve(&alice(), &pool(), 150).unwrap();

        ledger.transfer_from(&pool(), &alice(), &pool(), 100).unwrap();

        assert_eq!(ledger.balance_of(&alice()), 100);
        assert_eq!(ledger.balance_of(&pool()), 100);
        assert_eq!(ledger.allowance(&alice(), &pool()), 50);
    }

    #[test]
    fn test_transfer_from_without_allowance_fails() {
        let mut ledger = InMemoryLedger::new();
        ledger.mint(&alice(), 200).unwrap();

        let result = ledger.transfer_from(&pool(), &alice(), &pool(), 100);

        assert_eq!(
            result,
            Err(TokenError::InsufficientAllowance {
                allowance: 0,
                requested: 100
            })
        );
        assert_eq!(ledger.balance_of(&alice()), 200);
    }

    #[test]
    fn test_transfer_from_insufficient_balance_keeps_allowance() {
        let mut ledger = InMemoryLedger::new();
        ledger.mint(&alice(), 50).unwrap();
        ledger.approve(&alice(), &pool(), 100).unwrap();

        let result = ledger.transfer_from(&pool(), &alice(), &pool(), 100);

        assert!(matches!(result, Err(TokenError::InsufficientBalance { .. })));
        assert_eq!(ledger.allowance(&alice(), &pool()), 100);
    }

    #[test]
    fn test_unlimited_allowance_not_decremented() {
        let mut ledger = InMemoryLedger::new();
        ledger.mint(&alice(), 200).unwrap();
        ledger.approve(&alice(), &pool(), u128::MAX).unwrap();

        ledger.transfer_from(&pool(), &alice(), &pool(), 100).unwrap();

        assert_eq!(ledger.allowance(&alice(), &pool()), u128::MAX);
    }

    #[test]
    fn test_ledger_through_mutable_reference() {
        let mut ledger = InMemoryLedger::new();
        ledger.mint(&alice(), 10).unwrap();

        {
            let mut handle = &mut ledger;
            TokenLedger::transfer(&mut handle, &alice(), &bob(), 4).unwrap();
            assert_eq!(TokenLedger::balance_of(&handle, &bob()), 4);
        }

        assert_eq!(ledger.balance_of(&alice()), 6);
    }
}
