//! Swap engine
//!
//! A swap sells `amount_in` of one asset to the pool for the fee-adjusted
//! curve output of the other. The whole input, fee included, stays in the
//! reserves, which is how providers earn the fee.

use core::fmt;
use core::str::FromStr;

use adapter_core::{Address, AssetLedger};
use amm_model::{get_amount_out, invariant};
use serde::{Deserialize, Serialize};

use crate::settlement::{Leg, Side};
use crate::{Pool, PoolError, PoolEvent};

/// Which asset the trader sells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapDirection {
    /// Sell A, receive B
    AToB,
    /// Sell B, receive A
    BToA,
}

impl SwapDirection {
    fn sides(self) -> (Side, Side) {
        match self {
            SwapDirection::AToB => (Side::A, Side::B),
            SwapDirection::BToA => (Side::B, Side::A),
        }
    }
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapDirection::AToB => f.write_str("a-to-b"),
            SwapDirection::BToA => f.write_str("b-to-a"),
        }
    }
}

impl FromStr for SwapDirection {
    type Err = PoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a-to-b" | "atob" | "a" => Ok(SwapDirection::AToB),
            "b-to-a" | "btoa" | "b" => Ok(SwapDirection::BToA),
            _ => Err(PoolError::InvalidConfiguration(
                "direction must be a-to-b or b-to-a",
            )),
        }
    }
}

impl Pool {
    /// Sell `amount_in` of A for B. Returns the amount of B received.
    pub fn swap_a_for_b<A: AssetLedger, B: AssetLedger>(
        &mut self,
        ledger_a: &mut A,
        ledger_b: &mut B,
        trader: &Address,
        amount_in: u128,
    ) -> Result<u128, PoolError> {
        self.swap(ledger_a, ledger_b, trader, SwapDirection::AToB, amount_in)
    }

    /// Sell `amount_in` of B for A. Returns the amount of A received.
    pub fn swap_b_for_a<A: AssetLedger, B: AssetLedger>(
        &mut self,
        ledger_a: &mut A,
        ledger_b: &mut B,
        trader: &Address,
        amount_in: u128,
    ) -> Result<u128, PoolError> {
        self.swap(ledger_a, ledger_b, trader, SwapDirection::BToA, amount_in)
    }

    /// Execute a swap in `direction`
    ///
    /// The output may be zero for dust inputs; the input is still taken.
    ///
    /// # Errors
    /// * `InvalidConfiguration` if `trader` is the pool itself
    /// * `InsufficientReserves` if either reserve is zero
    /// * `InvalidAmount` if `amount_in == 0`
    /// * `Overflow` if the input reserve would exceed `u128`
    /// * `InvariantViolation` if the product of reserves would decrease
    /// * `TransferFailed` if a ledger refuses a leg (nothing changes)
    pub fn swap<A: AssetLedger, B: AssetLedger>(
        &mut self,
        ledger_a: &mut A,
        ledger_b: &mut B,
        trader: &Address,
        direction: SwapDirection,
        amount_in: u128,
    ) -> Result<u128, PoolError> {
        self.try_swap(ledger_a, ledger_b, trader, direction, amount_in)
            .inspect_err(|err| {
                log::warn!("swap {} of {} by {:?} rejected: {}", direction, amount_in, trader, err)
            })
    }

    fn try_swap<A: AssetLedger, B: AssetLedger>(
        &mut self,
        ledger_a: &mut A,
        ledger_b: &mut B,
        trader: &Address,
        direction: SwapDirection,
        amount_in: u128,
    ) -> Result<u128, PoolError> {
        self.ensure_ledgers(ledger_a, ledger_b)?;
        self.ensure_counterparty(trader)?;

        let amount_out = self.quote(direction, amount_in)?;
        let (reserve_in, reserve_out) = self.oriented_reserves(direction);

        let new_in = reserve_in.checked_add(amount_in).ok_or(PoolError::Overflow)?;
        let new_out = reserve_out
            .checked_sub(amount_out)
            .ok_or(PoolError::InvariantViolation)?;
        if invariant(new_in, new_out) < invariant(reserve_in, reserve_out) {
            return Err(PoolError::InvariantViolation);
        }

        // Commit
        let cp = self.checkpoint(trader);
        match direction {
            SwapDirection::AToB => {
                self.reserve_a = new_in;
                self.reserve_b = new_out;
            }
            SwapDirection::BToA => {
                self.reserve_b = new_in;
                self.reserve_a = new_out;
            }
        }

        let (side_in, side_out) = direction.sides();
        let legs = [
            Leg::Pull { side: side_in, party: *trader, amount: amount_in },
            Leg::Push { side: side_out, party: *trader, amount: amount_out },
        ];
        self.settle(ledger_a, ledger_b, cp, &legs)?;

        self.record(PoolEvent::Swap {
            trader: *trader,
            amount_in,
            amount_out,
            asset_in_is_a: direction == SwapDirection::AToB,
        });
        Ok(amount_out)
    }

    /// Output a swap of `amount_in` would produce against current reserves
    ///
    /// Read-only; fails the same way `swap` does before anything is committed.
    pub fn quote(&self, direction: SwapDirection, amount_in: u128) -> Result<u128, PoolError> {
        if self.reserve_a == 0 || self.reserve_b == 0 {
            return Err(PoolError::InsufficientReserves);
        }
        let (reserve_in, reserve_out) = self.oriented_reserves(direction);
        let amount_out = get_amount_out(amount_in, reserve_in, reserve_out)?;

        log::debug!(
            "quote {} {} against {}/{} -> {}",
            direction,
            amount_in,
            reserve_in,
            reserve_out,
            amount_out
        );
        Ok(amount_out)
    }

    fn oriented_reserves(&self, direction: SwapDirection) -> (u128, u128) {
        match direction {
            SwapDirection::AToB => (self.reserve_a, self.reserve_b),
            SwapDirection::BToA => (self.reserve_b, self.reserve_a),
        }
    }
}
