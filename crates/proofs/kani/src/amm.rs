//! Proofs for `amm_model`
//!
//! Properties verified:
//! - **Square root is the floor** - r² ≤ x < (r+1)²
//! - **Output below reserve** - a swap can never drain the output side
//! - **Invariant non-decreasing** - x·y after a swap is at least x·y before
//! - **Mint bounded by deposit** - claims never exceed either ratio share
//! - **Payout bounded by reserves** - a withdrawal pays at most the reserve
//! - **Deterministic** - same inputs always produce same outputs

use amm_model::{
    claims_for_deposit, get_amount_out, integer_sqrt, invariant, payout_for_withdrawal,
    AmmError, U256,
};

/// Square root is the floor
#[kani::proof]
#[kani::unwind(40)]
fn sqrt_is_floor() {
    let x: u32 = kani::any();
    let x = U256::from(x);

    let r = integer_sqrt(x);
    let next = r + U256::one();

    assert!(r * r <= x, "sqrt overshoots: r² > x");
    assert!(next * next > x, "sqrt undershoots: (r+1)² ≤ x");
}

/// Output below reserve
///
/// Property: for any nonzero input the output is strictly less than the
/// output reserve, so no swap empties a side of the pool.
#[kani::proof]
#[kani::unwind(8)]
fn amount_out_below_reserve() {
    let amount_in: u64 = kani::any();
    let reserve_in: u64 = kani::any();
    let reserve_out: u64 = kani::any();

    kani::assume(amount_in > 0);
    kani::assume(reserve_in > 0 && reserve_out > 0);

    let out = get_amount_out(amount_in as u128, reserve_in as u128, reserve_out as u128);
    match out {
        Ok(out) => assert!(out < reserve_out as u128, "output drains reserve"),
        Err(_) => assert!(false, "valid inputs must quote"),
    }
}

/// Zero inputs and empty reserves are rejected
#[kani::proof]
#[kani::unwind(8)]
fn amount_out_rejects_degenerate_inputs() {
    let reserve_in: u64 = kani::any();
    let reserve_out: u64 = kani::any();

    assert_eq!(
        get_amount_out(0, reserve_in as u128, reserve_out as u128),
        Err(AmmError::InvalidAmount)
    );
    assert_eq!(
        get_amount_out(1, 0, reserve_out as u128),
        Err(AmmError::InsufficientReserves)
    );
    assert_eq!(
        get_amount_out(1, reserve_in as u128, 0),
        Err(AmmError::InsufficientReserves)
    );
}

/// Invariant non-decreasing
///
/// Property: applying a swap's input and output to the reserves never
/// lowers x·y. The 0.3% fee stays in the pool, so k grows.
#[kani::proof]
#[kani::unwind(8)]
fn swap_never_decreases_invariant() {
    let amount_in: u64 = kani::any();
    let reserve_in: u64 = kani::any();
    let reserve_out: u64 = kani::any();

    kani::assume(amount_in > 0);
    kani::assume(reserve_in > 0 && reserve_out > 0);

    let (amount_in, reserve_in, reserve_out) =
        (amount_in as u128, reserve_in as u128, reserve_out as u128);

    if let Ok(out) = get_amount_out(amount_in, reserve_in, reserve_out) {
        let k0 = invariant(reserve_in, reserve_out);
        let k1 = invariant(reserve_in + amount_in, reserve_out - out);
        assert!(k1 >= k0, "swap decreased the invariant");
    }
}

/// Mint bounded by deposit
///
/// Property: a deposit into a funded pool mints no more than its share on
/// either side: minted · reserve ≤ amount · total for both assets.
#[kani::proof]
#[kani::unwind(8)]
fn mint_bounded_by_both_ratios() {
    let amount_a: u32 = kani::any();
    let amount_b: u32 = kani::any();
    let reserve_a: u32 = kani::any();
    let reserve_b: u32 = kani::any();
    let total: u32 = kani::any();

    kani::assume(reserve_a > 0 && reserve_b > 0 && total > 0);

    if let Ok(minted) = claims_for_deposit(
        amount_a as u128,
        amount_b as u128,
        reserve_a as u128,
        reserve_b as u128,
        total as u128,
    ) {
        let minted = U256::from(minted);
        assert!(minted * U256::from(reserve_a) <= U256::from(amount_a) * U256::from(total));
        assert!(minted * U256::from(reserve_b) <= U256::from(amount_b) * U256::from(total));
    }
}

/// Payout bounded by reserves
///
/// Property: burning c of T claims pays at most the reserves, and burning
/// all of them pays exactly the reserves.
#[kani::proof]
#[kani::unwind(8)]
fn payout_bounded_by_reserves() {
    let claims: u64 = kani::any();
    let reserve_a: u64 = kani::any();
    let reserve_b: u64 = kani::any();
    let total: u64 = kani::any();

    kani::assume(claims > 0 && claims <= total);

    let (claims, reserve_a, reserve_b, total) =
        (claims as u128, reserve_a as u128, reserve_b as u128, total as u128);

    match payout_for_withdrawal(claims, reserve_a, reserve_b, total) {
        Ok((out_a, out_b)) => {
            assert!(out_a <= reserve_a && out_b <= reserve_b, "payout exceeds reserve");
            if claims == total {
                assert_eq!((out_a, out_b), (reserve_a, reserve_b));
            }
        }
        Err(_) => assert!(false, "valid withdrawal must pay out"),
    }
}

/// Deterministic
///
/// Property: the math has no hidden state.
#[kani::proof]
#[kani::unwind(8)]
fn determinism() {
    let amount_in: u64 = kani::any();
    let reserve_in: u64 = kani::any();
    let reserve_out: u64 = kani::any();

    let first = get_amount_out(amount_in as u128, reserve_in as u128, reserve_out as u128);
    let second = get_amount_out(amount_in as u128, reserve_in as u128, reserve_out as u128);

    assert_eq!(first, second, "get_amount_out must be deterministic");
}
