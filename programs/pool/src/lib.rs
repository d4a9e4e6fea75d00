//! cpswap pool engine
//!
//! A two-asset constant product pool (x·y=k) with a 0.3% swap fee.
//! Liquidity providers deposit both assets and receive claims; claims are
//! burned for a proportional share of the reserves; traders swap one asset
//! for the other along the curve.
//!
//! Every operation takes `&mut Pool` plus one [`AssetLedger`] per asset.
//! It validates and sizes everything with the pure `amm_model` math,
//! commits the ledger, and only then moves assets. If a ledger refuses a
//! movement the completed ones are reversed and the pool is restored, so an
//! operation either fully happens or leaves no trace.

pub mod error;
pub mod events;
pub mod liquidity;
pub mod query;
mod settlement;
pub mod state;
pub mod swap;

pub use adapter_core::{Address, AssetLedger, MockAsset, TransferError};
pub use amm_model::{integer_sqrt, U256};
pub use error::PoolError;
pub use events::PoolEvent;
pub use state::Pool;
pub use swap::SwapDirection;

/// Fee-adjusted output of a swap against `(reserve_in, reserve_out)`
///
/// Pure; usable without a pool.
///
/// # Errors
/// * `InvalidAmount` if `amount_in == 0`
/// * `InsufficientReserves` if either reserve is zero
pub fn get_amount_out(
    amount_in: u128,
    reserve_in: u128,
    reserve_out: u128,
) -> Result<u128, PoolError> {
    Ok(amm_model::get_amount_out(amount_in, reserve_in, reserve_out)?)
}
