//! In-memory fungible asset
//!
//! Behaves like a minimal ERC-20: holders approve spenders, spenders pull
//! with `transfer_from`, an allowance of `u128::MAX` never decreases.
//! Only nonzero balances are stored.
//! `set_paused` makes every movement fail, which lets tests force a
//! transfer failure at an exact point in an operation.

use alloc::collections::BTreeMap;
use alloc::string::String;
use serde::{Deserialize, Serialize};

use crate::{Address, AssetLedger, TransferError};

/// In-memory asset ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockAsset {
    id: Address,
    symbol: String,
    paused: bool,
    total_supply: u128,
    balances: BTreeMap<Address, u128>,
    /// owner -> spender -> remaining allowance
    allowances: BTreeMap<Address, BTreeMap<Address, u128>>,
}

impl MockAsset {
    pub fn new(id: Address, symbol: impl Into<String>) -> Self {
        Self {
            id,
            symbol: symbol.into(),
            paused: false,
            total_supply: 0,
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Create `amount` new units owned by `to`
    pub fn mint(&mut self, to: &Address, amount: u128) -> Result<(), TransferError> {
        if to.is_null() {
            return Err(TransferError::NullAddress);
        }
        if amount == 0 {
            return Ok(());
        }
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(TransferError::Overflow)?;

        // Balances never exceed supply, so this cannot overflow
        *self.balances.entry(*to).or_insert(0) += amount;
        self.total_supply = supply;
        Ok(())
    }

    /// Set the amount `spender` may pull from `owner`
    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: u128) {
        self.allowances
            .entry(*owner)
            .or_default()
            .insert(*spender, amount);
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .get(owner)
            .and_then(|m| m.get(spender))
            .copied()
            .unwrap_or(0)
    }

    /// Holders with a nonzero balance, in address order
    pub fn holders(&self) -> impl Iterator<Item = (&Address, u128)> {
        self.balances.iter().map(|(who, amount)| (who, *amount))
    }

    /// Validate a movement of `amount` from `from` to `to`
    fn check_move(
        &self,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), TransferError> {
        if to.is_null() {
            return Err(TransferError::NullAddress);
        }
        if self.balance_of(from) < amount {
            return Err(TransferError::InsufficientBalance);
        }
        if from != to && amount > 0 && self.balance_of(to).checked_add(amount).is_none() {
            return Err(TransferError::Overflow);
        }
        Ok(())
    }

    fn check_allowance(
        &self,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), TransferError> {
        if self.allowance(from, to) < amount {
            return Err(TransferError::InsufficientAllowance);
        }
        Ok(())
    }

    fn move_balance(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), TransferError> {
        self.check_move(from, to, amount)?;
        if from == to || amount == 0 {
            return Ok(());
        }

        // Both checked above
        let from_balance = self.balance_of(from);
        let to_balance = self.balance_of(to) + amount;
        if from_balance == amount {
            self.balances.remove(from);
        } else {
            self.balances.insert(*from, from_balance - amount);
        }
        self.balances.insert(*to, to_balance);
        Ok(())
    }
}

impl AssetLedger for MockAsset {
    fn asset_id(&self) -> Address {
        self.id
    }

    fn balance_of(&self, party: &Address) -> u128 {
        self.balances.get(party).copied().unwrap_or(0)
    }

    fn transfer_from(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), TransferError> {
        self.check_transfer_from(from, to, amount)?;
        let allowance = self.allowance(from, to);

        self.move_balance(from, to, amount)?;

        if allowance != u128::MAX {
            self.approve(from, to, allowance - amount);
        }
        Ok(())
    }

    fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), TransferError> {
        self.check_transfer(from, to, amount)?;
        self.move_balance(from, to, amount)
    }

    fn check_transfer_from(
        &self,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), TransferError> {
        if self.paused {
            return Err(TransferError::Paused);
        }
        self.check_allowance(from, to, amount)?;
        self.check_move(from, to, amount)
    }

    fn check_transfer(
        &self,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), TransferError> {
        if self.paused {
            return Err(TransferError::Paused);
        }
        self.check_move(from, to, amount)
    }
}
