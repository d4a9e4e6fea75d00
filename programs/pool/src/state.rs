//! Reserve ledger: the single state record every operation reads and writes

use std::collections::BTreeMap;

use adapter_core::{Address, AssetLedger};
use serde::{Deserialize, Serialize};

use crate::{PoolError, PoolEvent};

/// Two-asset constant product pool
///
/// # Invariants
/// - `asset_a != asset_b`, neither null, fixed at creation
/// - `reserve_a == 0 ⇔ reserve_b == 0 ⇔ total_claims == 0`
/// - `sum(claims) == total_claims`
/// - A swap never decreases `reserve_a * reserve_b`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    // === Immutable fields (set at creation) ===
    /// Custody identity of the pool on both asset ledgers
    address: Address,
    asset_a: Address,
    asset_b: Address,

    // === Mutable state ===
    pub(crate) reserve_a: u128,
    pub(crate) reserve_b: u128,
    pub(crate) total_claims: u128,
    /// Claim balance per provider. Entries that drop to zero are kept.
    pub(crate) claims: BTreeMap<Address, u128>,

    /// Records of successful operations not yet taken by the caller
    #[serde(default)]
    pub(crate) events: Vec<PoolEvent>,
}

/// Ledger fields an operation may touch, captured before it commits
#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint {
    reserve_a: u128,
    reserve_b: u128,
    total_claims: u128,
    party: Address,
    party_claims: Option<u128>,
}

impl Pool {
    /// Create an empty pool trading `asset_a` against `asset_b`
    ///
    /// # Errors
    /// - `InvalidConfiguration` if the assets are equal, either asset is
    ///   null, or the pool address is null or equal to an asset
    pub fn new(address: Address, asset_a: Address, asset_b: Address) -> Result<Self, PoolError> {
        if asset_a.is_null() || asset_b.is_null() {
            return Err(PoolError::InvalidConfiguration("asset identity is null"));
        }
        if asset_a == asset_b {
            return Err(PoolError::InvalidConfiguration("assets must differ"));
        }
        if address.is_null() {
            return Err(PoolError::InvalidConfiguration("pool address is null"));
        }
        if address == asset_a || address == asset_b {
            return Err(PoolError::InvalidConfiguration("pool address collides with an asset"));
        }

        log::debug!("created pool {:?} for {:?}/{:?}", address, asset_a, asset_b);

        Ok(Self {
            address,
            asset_a,
            asset_b,
            reserve_a: 0,
            reserve_b: 0,
            total_claims: 0,
            claims: BTreeMap::new(),
            events: Vec::new(),
        })
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn asset_a(&self) -> &Address {
        &self.asset_a
    }

    pub fn asset_b(&self) -> &Address {
        &self.asset_b
    }

    /// Check that the ledgers handed to an operation are this pool's assets
    pub(crate) fn ensure_ledgers(
        &self,
        ledger_a: &impl AssetLedger,
        ledger_b: &impl AssetLedger,
    ) -> Result<(), PoolError> {
        if ledger_a.asset_id() != self.asset_a || ledger_b.asset_id() != self.asset_b {
            return Err(PoolError::InvalidConfiguration(
                "asset ledgers do not match the pool",
            ));
        }
        Ok(())
    }

    /// Reject the pool's own custody address as the other side of an operation
    pub(crate) fn ensure_counterparty(&self, party: &Address) -> Result<(), PoolError> {
        if *party == self.address {
            return Err(PoolError::InvalidConfiguration("pool cannot trade with itself"));
        }
        Ok(())
    }

    pub(crate) fn checkpoint(&self, party: &Address) -> Checkpoint {
        Checkpoint {
            reserve_a: self.reserve_a,
            reserve_b: self.reserve_b,
            total_claims: self.total_claims,
            party: *party,
            party_claims: self.claims.get(party).copied(),
        }
    }

    /// Put the ledger back exactly as it was at `cp`
    pub(crate) fn restore(&mut self, cp: Checkpoint) {
        self.reserve_a = cp.reserve_a;
        self.reserve_b = cp.reserve_b;
        self.total_claims = cp.total_claims;
        match cp.party_claims {
            Some(amount) => {
                self.claims.insert(cp.party, amount);
            }
            None => {
                self.claims.remove(&cp.party);
            }
        }
    }

    /// Reconcile after a settlement that could only be partly unwound
    ///
    /// `paid_a`/`paid_b` left custody and stayed with the party. When
    /// anything was paid out the committed claim changes stand; otherwise
    /// the claims go back to `cp`. Reserves are `cp` less the payouts, so
    /// they never exceed what custody holds. Assets pulled in and not
    /// returned remain in custody untracked. A burn that leaves no claims
    /// leaves no reserves.
    pub(crate) fn reconcile(&mut self, cp: Checkpoint, paid_a: u128, paid_b: u128) {
        if paid_a == 0 && paid_b == 0 {
            self.restore(cp);
            return;
        }
        if self.total_claims == 0 {
            self.reserve_a = 0;
            self.reserve_b = 0;
            return;
        }
        self.reserve_a = cp.reserve_a.saturating_sub(paid_a);
        self.reserve_b = cp.reserve_b.saturating_sub(paid_b);
    }

    /// Verify the structural invariants of a pool that did not come from `new`
    /// (e.g. one loaded from disk)
    pub fn check_invariants(&self) -> Result<(), PoolError> {
        Pool::new(self.address, self.asset_a, self.asset_b)?;

        let empty_a = self.reserve_a == 0;
        let empty_b = self.reserve_b == 0;
        let no_claims = self.total_claims == 0;
        if empty_a != empty_b || empty_a != no_claims {
            return Err(PoolError::InconsistentState(
                "reserves and claim supply disagree on emptiness",
            ));
        }

        let mut sum: u128 = 0;
        for amount in self.claims.values() {
            sum = sum
                .checked_add(*amount)
                .ok_or(PoolError::InconsistentState("claim balances overflow"))?;
        }
        if sum != self.total_claims {
            return Err(PoolError::InconsistentState(
                "claim balances do not sum to total claims",
            ));
        }
        Ok(())
    }
}
