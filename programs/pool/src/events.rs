//! Observable records emitted by successful operations

use adapter_core::Address;
use serde::{Deserialize, Serialize};

use crate::Pool;

/// Record appended to the pool journal when an operation succeeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolEvent {
    LiquidityAdded {
        provider: Address,
        amount_a: u128,
        amount_b: u128,
        claims_minted: u128,
    },
    LiquidityRemoved {
        provider: Address,
        amount_a_out: u128,
        amount_b_out: u128,
        claims_burned: u128,
    },
    Swap {
        trader: Address,
        amount_in: u128,
        amount_out: u128,
        asset_in_is_a: bool,
    },
}

impl PoolEvent {
    /// Party that triggered the event
    pub fn party(&self) -> &Address {
        match self {
            PoolEvent::LiquidityAdded { provider, .. } => provider,
            PoolEvent::LiquidityRemoved { provider, .. } => provider,
            PoolEvent::Swap { trader, .. } => trader,
        }
    }
}

impl Pool {
    /// Journal a committed and settled operation
    pub(crate) fn record(&mut self, event: PoolEvent) {
        log::info!("{:?}", event);
        self.events.push(event);
    }
}
