//! Liquidity engine: claim mint on deposit, reserve payout on withdrawal
//!
//! Both operations validate and size everything first, then commit the
//! ledger, then settle the asset legs. Nothing is committed when a
//! precondition fails.

use adapter_core::{Address, AssetLedger};
use amm_model::{claims_for_deposit, payout_for_withdrawal};

use crate::settlement::{Leg, Side};
use crate::{Pool, PoolError, PoolEvent};

impl Pool {
    /// Deposit `amount_a` of A and `amount_b` of B, minting claims to `depositor`
    ///
    /// The depositor must have approved the pool on both ledgers. Any ratio
    /// is accepted; the mint follows the less generous side.
    ///
    /// # Returns
    /// Claims minted
    ///
    /// # Errors
    /// * `InvalidConfiguration` if `depositor` is the pool itself
    /// * `InvalidAmount` if either amount is zero
    /// * `InsufficientLiquidityMinted` if the deposit is too small to mint
    /// * `Overflow` if a reserve or the claim supply would exceed `u128`
    /// * `TransferFailed` if a ledger refuses a pull (nothing changes)
    pub fn deposit<A: AssetLedger, B: AssetLedger>(
        &mut self,
        ledger_a: &mut A,
        ledger_b: &mut B,
        depositor: &Address,
        amount_a: u128,
        amount_b: u128,
    ) -> Result<u128, PoolError> {
        self.add_liquidity(ledger_a, ledger_b, depositor, amount_a, amount_b)
            .inspect_err(|err| log::warn!("deposit by {:?} rejected: {}", depositor, err))
    }

    fn add_liquidity<A: AssetLedger, B: AssetLedger>(
        &mut self,
        ledger_a: &mut A,
        ledger_b: &mut B,
        depositor: &Address,
        amount_a: u128,
        amount_b: u128,
    ) -> Result<u128, PoolError> {
        self.ensure_ledgers(ledger_a, ledger_b)?;
        self.ensure_counterparty(depositor)?;

        let minted = claims_for_deposit(
            amount_a,
            amount_b,
            self.reserve_a,
            self.reserve_b,
            self.total_claims,
        )?;
        log::debug!(
            "deposit {}/{} against {}/{} mints {} of {}",
            amount_a,
            amount_b,
            self.reserve_a,
            self.reserve_b,
            minted,
            self.total_claims
        );

        let reserve_a = self.reserve_a.checked_add(amount_a).ok_or(PoolError::Overflow)?;
        let reserve_b = self.reserve_b.checked_add(amount_b).ok_or(PoolError::Overflow)?;
        let total_claims = self.total_claims.checked_add(minted).ok_or(PoolError::Overflow)?;
        let balance = self
            .claim_balance_of(depositor)
            .checked_add(minted)
            .ok_or(PoolError::Overflow)?;

        // Commit
        let cp = self.checkpoint(depositor);
        self.reserve_a = reserve_a;
        self.reserve_b = reserve_b;
        self.total_claims = total_claims;
        self.claims.insert(*depositor, balance);

        let legs = [
            Leg::Pull { side: Side::A, party: *depositor, amount: amount_a },
            Leg::Pull { side: Side::B, party: *depositor, amount: amount_b },
        ];
        self.settle(ledger_a, ledger_b, cp, &legs)?;

        self.record(PoolEvent::LiquidityAdded {
            provider: *depositor,
            amount_a,
            amount_b,
            claims_minted: minted,
        });
        Ok(minted)
    }

    /// Burn `claims` held by `owner` and pay out the proportional reserves
    ///
    /// Payouts are floored, so rounding dust stays in the pool. The owner's
    /// entry is kept at zero when fully withdrawn.
    ///
    /// # Returns
    /// `(amount_a_out, amount_b_out)`
    ///
    /// # Errors
    /// * `InvalidConfiguration` if `owner` is the pool itself
    /// * `InvalidAmount` if `claims == 0`
    /// * `EmptyPool` if no claims are outstanding
    /// * `InsufficientBalance` if `owner` holds fewer than `claims`
    /// * `TransferFailed` if a ledger refuses a push (nothing changes)
    /// * `SettlementIncomplete` if a payout could not be taken back after a
    ///   later refusal; the burn stands for what was paid
    pub fn withdraw<A: AssetLedger, B: AssetLedger>(
        &mut self,
        ledger_a: &mut A,
        ledger_b: &mut B,
        owner: &Address,
        claims: u128,
    ) -> Result<(u128, u128), PoolError> {
        self.remove_liquidity(ledger_a, ledger_b, owner, claims)
            .inspect_err(|err| log::warn!("withdrawal by {:?} rejected: {}", owner, err))
    }

    fn remove_liquidity<A: AssetLedger, B: AssetLedger>(
        &mut self,
        ledger_a: &mut A,
        ledger_b: &mut B,
        owner: &Address,
        claims: u128,
    ) -> Result<(u128, u128), PoolError> {
        self.ensure_ledgers(ledger_a, ledger_b)?;
        self.ensure_counterparty(owner)?;

        if claims == 0 {
            return Err(PoolError::InvalidAmount);
        }
        if self.total_claims == 0 {
            return Err(PoolError::EmptyPool);
        }
        let balance = self.claim_balance_of(owner);
        if balance < claims {
            return Err(PoolError::InsufficientBalance);
        }

        let (out_a, out_b) =
            payout_for_withdrawal(claims, self.reserve_a, self.reserve_b, self.total_claims)?;
        log::debug!(
            "burn {} of {} pays {}/{}",
            claims,
            self.total_claims,
            out_a,
            out_b
        );

        let reserve_a = self
            .reserve_a
            .checked_sub(out_a)
            .ok_or(PoolError::InconsistentState("payout exceeds reserve A"))?;
        let reserve_b = self
            .reserve_b
            .checked_sub(out_b)
            .ok_or(PoolError::InconsistentState("payout exceeds reserve B"))?;

        // Commit. claims <= balance <= total_claims
        let cp = self.checkpoint(owner);
        self.reserve_a = reserve_a;
        self.reserve_b = reserve_b;
        self.total_claims -= claims;
        self.claims.insert(*owner, balance - claims);

        let legs = [
            Leg::Push { side: Side::A, party: *owner, amount: out_a },
            Leg::Push { side: Side::B, party: *owner, amount: out_b },
        ];
        self.settle(ledger_a, ledger_b, cp, &legs)?;

        self.record(PoolEvent::LiquidityRemoved {
            provider: *owner,
            amount_a_out: out_a,
            amount_b_out: out_b,
            claims_burned: claims,
        });
        Ok((out_a, out_b))
    }
}
