//! Constant product AMM math (x·y=k) with a 0.3% input fee

use crate::{AmmError, FEE_DENOMINATOR, FEE_NUMERATOR, U256};

/// Narrow a 256-bit intermediate back to `u128`
#[inline]
fn narrow(x: U256) -> Result<u128, AmmError> {
    if x > U256::from(u128::MAX) {
        return Err(AmmError::Overflow);
    }
    Ok(x.low_u128())
}

/// Floor square root by integer Newton iteration
///
/// Starts from `x / 2`, which is at or above the root for every `x >= 2`, so
/// the sequence decreases monotonically onto `floor(sqrt(x))`. The running
/// sum `x0 + x / x0` is bounded by `x + 3`, so no step can overflow.
pub fn integer_sqrt(x: U256) -> U256 {
    let two = U256::from(2u8);
    if x < two {
        return x;
    }

    let mut x0 = x / two;
    let mut x1 = (x0 + x / x0) / two;
    while x1 < x0 {
        x0 = x1;
        x1 = (x0 + x / x0) / two;
    }
    x0
}

/// Invariant product `k = reserve_a * reserve_b`, exact in 256 bits
#[inline]
pub fn invariant(reserve_a: u128, reserve_b: u128) -> U256 {
    U256::from(reserve_a) * U256::from(reserve_b)
}

/// Output of a swap against `(reserve_in, reserve_out)`
///
/// The fee is withheld from the input before it reaches the curve:
/// - in_after_fee = amount_in * 997
/// - amount_out = in_after_fee * reserve_out / (reserve_in * 1000 + in_after_fee)
///
/// Scaling by 1000 instead of dividing first keeps full precision. The
/// result is floored and may be zero for dust inputs. It is always strictly
/// below `reserve_out`.
///
/// # Errors
/// * `InvalidAmount` if `amount_in == 0`
/// * `InsufficientReserves` if either reserve is zero
pub fn get_amount_out(
    amount_in: u128,
    reserve_in: u128,
    reserve_out: u128,
) -> Result<u128, AmmError> {
    if amount_in == 0 {
        return Err(AmmError::InvalidAmount);
    }
    if reserve_in == 0 || reserve_out == 0 {
        return Err(AmmError::InsufficientReserves);
    }

    let in_after_fee = U256::from(amount_in) * U256::from(FEE_NUMERATOR);
    let numerator = in_after_fee * U256::from(reserve_out);
    let denominator = U256::from(reserve_in) * U256::from(FEE_DENOMINATOR) + in_after_fee;

    narrow(numerator / denominator)
}

/// Claims to mint for a deposit of `(amount_a, amount_b)`
///
/// - Empty pool: `isqrt(amount_a * amount_b)`, the geometric mean
/// - Otherwise: `min(amount_a * T / reserve_a, amount_b * T / reserve_b)`
///
/// The ratio of the deposit is not enforced. The smaller of the two
/// ratio-implied mints is used, so an unbalanced deposit never over-mints
/// against either side.
///
/// # Errors
/// * `InvalidAmount` if either amount is zero
/// * `InsufficientReserves` if claims exist but a reserve is zero
/// * `InsufficientLiquidityMinted` if the mint truncates to zero
/// * `Overflow` if the mint does not fit in `u128`
pub fn claims_for_deposit(
    amount_a: u128,
    amount_b: u128,
    reserve_a: u128,
    reserve_b: u128,
    total_claims: u128,
) -> Result<u128, AmmError> {
    if amount_a == 0 || amount_b == 0 {
        return Err(AmmError::InvalidAmount);
    }

    let minted = if total_claims == 0 {
        integer_sqrt(U256::from(amount_a) * U256::from(amount_b))
    } else {
        if reserve_a == 0 || reserve_b == 0 {
            return Err(AmmError::InsufficientReserves);
        }
        let total = U256::from(total_claims);
        let by_a = U256::from(amount_a) * total / U256::from(reserve_a);
        let by_b = U256::from(amount_b) * total / U256::from(reserve_b);
        by_a.min(by_b)
    };

    if minted.is_zero() {
        return Err(AmmError::InsufficientLiquidityMinted);
    }
    narrow(minted)
}

/// Reserve amounts paid out for burning `claims` of `total_claims`
///
/// Each side is `reserve * claims / total_claims`, floored. Truncation
/// always leaves the remainder in the pool.
///
/// # Errors
/// * `InvalidAmount` if `claims == 0`
/// * `EmptyPool` if `total_claims == 0`
/// * `InsufficientBalance` if `claims > total_claims`
pub fn payout_for_withdrawal(
    claims: u128,
    reserve_a: u128,
    reserve_b: u128,
    total_claims: u128,
) -> Result<(u128, u128), AmmError> {
    if claims == 0 {
        return Err(AmmError::InvalidAmount);
    }
    if total_claims == 0 {
        return Err(AmmError::EmptyPool);
    }
    if claims > total_claims {
        return Err(AmmError::InsufficientBalance);
    }

    let burned = U256::from(claims);
    let total = U256::from(total_claims);
    let out_a = narrow(U256::from(reserve_a) * burned / total)?;
    let out_b = narrow(U256::from(reserve_b) * burned / total)?;
    Ok((out_a, out_b))
}

/// Spot price `reserve_b / reserve_a`, floored; zero for an empty A side
pub fn spot_price(reserve_a: u128, reserve_b: u128) -> u128 {
    if reserve_a == 0 {
        return 0;
    }
    reserve_b / reserve_a
}
