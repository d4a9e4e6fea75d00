//! Settlement of asset legs after the ledger has been committed
//!
//! An operation moves at most two amounts, one per asset. Every leg is
//! checked against its ledger before any of them runs, so a refusal that
//! the ledger can foresee moves nothing. If a leg is still refused while
//! running, the legs already applied are reversed newest-first. A reversal
//! the ledger refuses leaves that leg applied, and the caller is told
//! which legs stuck.

use adapter_core::{Address, AssetLedger, TransferError};

use crate::state::Checkpoint;
use crate::{Pool, PoolError};

/// Which of the pool's two assets a leg moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    A,
    B,
}

/// One movement between a party and the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Leg {
    /// Party -> pool, spending the party's allowance to the pool
    Pull { side: Side, party: Address, amount: u128 },
    /// Pool -> party
    Push { side: Side, party: Address, amount: u128 },
}

impl Leg {
    fn side(&self) -> Side {
        match self {
            Leg::Pull { side, .. } | Leg::Push { side, .. } => *side,
        }
    }

    fn amount(&self) -> u128 {
        match self {
            Leg::Pull { amount, .. } | Leg::Push { amount, .. } => *amount,
        }
    }

    /// The movement that undoes this one
    fn reversed(&self) -> Leg {
        match *self {
            Leg::Pull { side, party, amount } => Leg::Push { side, party, amount },
            Leg::Push { side, party, amount } => Leg::Pull { side, party, amount },
        }
    }
}

/// A settlement that did not go through
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Refused {
    /// Why the first refused leg was refused
    pub(crate) error: TransferError,
    /// Applied legs whose reversal was also refused
    pub(crate) stuck: Vec<Leg>,
}

impl Refused {
    /// Amounts of A and B that left custody and stayed out
    fn paid_out(&self) -> (u128, u128) {
        self.stuck.iter().fold((0, 0), |(a, b), leg| match leg {
            Leg::Push { side: Side::A, amount, .. } => (a.saturating_add(*amount), b),
            Leg::Push { side: Side::B, amount, .. } => (a, b.saturating_add(*amount)),
            Leg::Pull { .. } => (a, b),
        })
    }
}

pub(crate) struct Settlement<'a> {
    pool: Address,
    ledger_a: &'a mut dyn AssetLedger,
    ledger_b: &'a mut dyn AssetLedger,
}

impl<'a> Settlement<'a> {
    pub(crate) fn new(
        pool: Address,
        ledger_a: &'a mut dyn AssetLedger,
        ledger_b: &'a mut dyn AssetLedger,
    ) -> Self {
        Self {
            pool,
            ledger_a,
            ledger_b,
        }
    }

    fn ledger(&mut self, side: Side) -> &mut dyn AssetLedger {
        match side {
            Side::A => &mut *self.ledger_a,
            Side::B => &mut *self.ledger_b,
        }
    }

    fn check(&mut self, leg: &Leg) -> Result<(), TransferError> {
        let pool = self.pool;
        let ledger = self.ledger(leg.side());
        match leg {
            Leg::Pull { party, amount, .. } => ledger.check_transfer_from(party, &pool, *amount),
            Leg::Push { party, amount, .. } => ledger.check_transfer(&pool, party, *amount),
        }
    }

    fn apply(&mut self, leg: &Leg) -> Result<(), TransferError> {
        let pool = self.pool;
        let ledger = self.ledger(leg.side());
        match leg {
            Leg::Pull { party, amount, .. } => ledger.transfer_from(party, &pool, *amount),
            Leg::Push { party, amount, .. } => ledger.transfer(&pool, party, *amount),
        }
    }

    /// Run `legs` in order, all or nothing where the ledgers allow it
    ///
    /// Legs must move distinct assets; each is checked against the ledger
    /// state from before the run.
    pub(crate) fn run(mut self, legs: &[Leg]) -> Result<(), Refused> {
        for leg in legs.iter().filter(|leg| leg.amount() > 0) {
            if let Err(error) = self.check(leg) {
                log::warn!("settlement leg {:?} refused: {}", leg, error);
                return Err(Refused { error, stuck: Vec::new() });
            }
        }

        let mut applied: usize = 0;
        for leg in legs {
            if leg.amount() > 0 {
                if let Err(error) = self.apply(leg) {
                    log::warn!("settlement leg {:?} refused after its check: {}", leg, error);
                    let stuck = self.unwind(&legs[..applied]);
                    return Err(Refused { error, stuck });
                }
            }
            applied += 1;
        }
        Ok(())
    }

    /// Reverse `done` newest-first, returning the legs that could not be
    fn unwind(&mut self, done: &[Leg]) -> Vec<Leg> {
        let mut stuck = Vec::new();
        for leg in done.iter().rev().filter(|leg| leg.amount() > 0) {
            if let Err(err) = self.apply(&leg.reversed()) {
                log::error!("could not unwind {:?}: {}", leg, err);
                stuck.push(*leg);
            }
        }
        stuck
    }
}

impl Pool {
    /// Move the assets for an operation whose ledger changes are already
    /// committed
    ///
    /// On a clean refusal the ledger is put back to `cp` and the result is
    /// `TransferFailed`. If some legs could not be unwound the ledger is
    /// reconciled with what actually moved and the result is
    /// `SettlementIncomplete`.
    pub(crate) fn settle(
        &mut self,
        ledger_a: &mut dyn AssetLedger,
        ledger_b: &mut dyn AssetLedger,
        cp: Checkpoint,
        legs: &[Leg],
    ) -> Result<(), PoolError> {
        let refused = match Settlement::new(*self.address(), ledger_a, ledger_b).run(legs) {
            Ok(()) => return Ok(()),
            Err(refused) => refused,
        };

        if refused.stuck.is_empty() {
            self.restore(cp);
            return Err(PoolError::TransferFailed(refused.error));
        }

        let (paid_a, paid_b) = refused.paid_out();
        log::error!(
            "settlement left {:?} applied; reconciling with {}/{} paid out",
            refused.stuck,
            paid_a,
            paid_b
        );
        self.reconcile(cp, paid_a, paid_b);
        Err(PoolError::SettlementIncomplete(refused.error))
    }
}
