//! Swaps and quotes

use anyhow::{Context, Result};
use colored::Colorize;
use cpswap_pool::SwapDirection;
use std::path::Path;

use crate::display::{event_line, field, header, name, parse_party};
use crate::state::State;

pub fn swap(state_path: &Path, party: &str, direction: SwapDirection, amount_in: u128) -> Result<()> {
    let mut state = State::load(state_path)?;
    let who = parse_party(party)?;

    header("Swap");
    field("Trader", name(&who));
    field("Direction", direction);
    field("Amount in", amount_in);

    let price_before = state.pool.get_price();
    let amount_out = state
        .pool
        .swap(&mut state.asset_a, &mut state.asset_b, &who, direction, amount_in)
        .context("Swap rejected")?;
    let events = state.drain_events();
    state.save(state_path)?;

    field("Amount out", amount_out.to_string().bright_green());
    if amount_out == 0 {
        println!("{}", "Input too small to receive anything".yellow());
    }
    field(
        "Price (B per A)",
        format!("{} -> {}", price_before, state.pool.get_price()),
    );
    for event in &events {
        println!("{}", event_line(event));
    }
    Ok(())
}

pub fn quote(amount_in: u128, reserve_in: u128, reserve_out: u128) -> Result<()> {
    let amount_out = cpswap_pool::get_amount_out(amount_in, reserve_in, reserve_out)
        .context("Cannot quote")?;

    header("Quote");
    field("Amount in", amount_in);
    field("Reserves", format!("{} / {}", reserve_in, reserve_out));
    field("Amount out", amount_out.to_string().bright_green());
    Ok(())
}
