//! Kani harnesses for the constant product math
//!
//! Run with: cargo kani -p proofs-kani
//!
//! Inputs are bounded to 32/64-bit symbolic values so the 256-bit
//! intermediates stay tractable; the formulas are width-independent.

#![no_std]

#[cfg(kani)]
mod amm;
