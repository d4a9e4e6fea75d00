//! Read-only views over the pool

use adapter_core::Address;
use amm_model::{spot_price, U256};

use crate::{Pool, PoolEvent};

impl Pool {
    /// `(reserve_a, reserve_b)`
    pub fn get_reserves(&self) -> (u128, u128) {
        (self.reserve_a, self.reserve_b)
    }

    /// Integer spot price of A in units of B, `0` for an empty pool
    pub fn get_price(&self) -> u128 {
        spot_price(self.reserve_a, self.reserve_b)
    }

    /// Claims held by `owner`, `0` if it never deposited
    pub fn claim_balance_of(&self, owner: &Address) -> u128 {
        self.claims.get(owner).copied().unwrap_or(0)
    }

    pub fn total_claims(&self) -> u128 {
        self.total_claims
    }

    /// Claim holders in address order, including emptied entries
    pub fn claim_holders(&self) -> impl Iterator<Item = (&Address, u128)> {
        self.claims.iter().map(|(owner, amount)| (owner, *amount))
    }

    /// `reserve_a * reserve_b` in full width
    pub fn invariant(&self) -> U256 {
        amm_model::invariant(self.reserve_a, self.reserve_b)
    }

    /// Journal of events not yet taken
    pub fn events(&self) -> &[PoolEvent] {
        &self.events
    }

    /// Drain the journal
    pub fn take_events(&mut self) -> Vec<PoolEvent> {
        std::mem::take(&mut self.events)
    }
}
