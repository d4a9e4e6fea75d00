//! AMM Model - Pure constant product math (x·y=k) for formal verification
//!
//! This crate contains the integer formulas behind the two-asset pool:
//! claim sizing on deposit and withdrawal, the fee-adjusted swap output,
//! spot price, and the invariant product. Intermediates are computed in 256
//! bits so `u128` reserves can be multiplied without overflow.
//!
//! Everything here is total: no panics, no floating point, every failure is
//! an `AmmError`. `cpswap-pool` and the Kani harnesses call these functions
//! directly instead of re-deriving the math.

#![no_std]

pub mod math;

pub use math::{
    claims_for_deposit, get_amount_out, integer_sqrt, invariant, payout_for_withdrawal,
    spot_price,
};

uint::construct_uint! {
    /// 256-bit unsigned integer for intermediate products
    pub struct U256(4);
}

/// Fee numerator kept by the curve (997 / 1000 = 0.3% fee)
pub const FEE_NUMERATOR: u128 = 997;

/// Fee denominator
pub const FEE_DENOMINATOR: u128 = 1000;

/// Error types for AMM operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmmError {
    /// Amount is zero
    InvalidAmount,
    /// Operation needs both reserves nonzero
    InsufficientReserves,
    /// Claim mint rounds down to zero
    InsufficientLiquidityMinted,
    /// Requested claims exceed what is outstanding
    InsufficientBalance,
    /// No claims outstanding
    EmptyPool,
    /// Result does not fit in `u128`
    Overflow,
    /// Post-swap invariant product is below the pre-swap product
    InvariantViolation,
}

impl core::fmt::Display for AmmError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            AmmError::InvalidAmount => "amount must be greater than zero",
            AmmError::InsufficientReserves => "both reserves must be nonzero",
            AmmError::InsufficientLiquidityMinted => "deposit mints zero claims",
            AmmError::InsufficientBalance => "claims exceed outstanding supply",
            AmmError::EmptyPool => "pool has no outstanding claims",
            AmmError::Overflow => "arithmetic overflow",
            AmmError::InvariantViolation => "invariant product decreased",
        };
        f.write_str(msg)
    }
}
