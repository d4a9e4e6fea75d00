//! Shared harness for the cpswap integration suites
//!
//! A `World` is one pool plus its two mock assets and a fixed cast of
//! funded parties, each of which has approved the pool without limit.

use adapter_core::{Address, AssetLedger, MockAsset};
use cpswap_pool::{Pool, PoolError, SwapDirection};

pub const POOL: &str = "pool";
pub const ASSET_A: &str = "TKA";
pub const ASSET_B: &str = "TKB";

pub fn label(name: &str) -> Address {
    // Harness labels are short ASCII constants
    Address::from_label(name).unwrap_or_else(|e| panic!("bad label {name}: {e}"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct World {
    pub pool: Pool,
    pub token_a: MockAsset,
    pub token_b: MockAsset,
    pub parties: Vec<Address>,
}

impl World {
    /// Fresh pool with `parties` each holding `funding` of both assets
    pub fn new(parties: &[&str], funding: u128) -> Self {
        let pool = Pool::new(label(POOL), label(ASSET_A), label(ASSET_B))
            .unwrap_or_else(|e| panic!("pool construction failed: {e}"));
        let mut token_a = MockAsset::new(label(ASSET_A), ASSET_A);
        let mut token_b = MockAsset::new(label(ASSET_B), ASSET_B);

        let parties: Vec<Address> = parties.iter().map(|p| label(p)).collect();
        for party in &parties {
            for token in [&mut token_a, &mut token_b] {
                token
                    .mint(party, funding)
                    .unwrap_or_else(|e| panic!("funding {party:?} failed: {e}"));
                token.approve(party, &label(POOL), u128::MAX);
            }
        }

        World {
            pool,
            token_a,
            token_b,
            parties,
        }
    }

    pub fn deposit(&mut self, party: &Address, a: u128, b: u128) -> Result<u128, PoolError> {
        self.pool.deposit(&mut self.token_a, &mut self.token_b, party, a, b)
    }

    pub fn withdraw(&mut self, party: &Address, claims: u128) -> Result<(u128, u128), PoolError> {
        self.pool.withdraw(&mut self.token_a, &mut self.token_b, party, claims)
    }

    pub fn swap(
        &mut self,
        party: &Address,
        direction: SwapDirection,
        amount: u128,
    ) -> Result<u128, PoolError> {
        self.pool
            .swap(&mut self.token_a, &mut self.token_b, party, direction, amount)
    }

    /// Set `party`'s allowance to the pool on both assets
    pub fn set_allowance(&mut self, party: &Address, amount: u128) {
        let pool = *self.pool.address();
        self.token_a.approve(party, &pool, amount);
        self.token_b.approve(party, &pool, amount);
    }

    /// Asset balances of `party` as `(a, b)`
    pub fn holdings(&self, party: &Address) -> (u128, u128) {
        (self.token_a.balance_of(party), self.token_b.balance_of(party))
    }

    /// Asset balances held by the pool's custody address
    pub fn custody(&self) -> (u128, u128) {
        self.holdings(self.pool.address())
    }
}
