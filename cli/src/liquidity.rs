//! Liquidity provider operations

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::display::{event_line, field, header, name, parse_party};
use crate::state::State;

pub fn add_liquidity(state_path: &Path, party: &str, amount_a: u128, amount_b: u128) -> Result<()> {
    let mut state = State::load(state_path)?;
    let who = parse_party(party)?;

    header("Add Liquidity");
    field("Provider", name(&who));
    field("Amount A", amount_a);
    field("Amount B", amount_b);

    let minted = state
        .pool
        .deposit(&mut state.asset_a, &mut state.asset_b, &who, amount_a, amount_b)
        .context("Deposit rejected")?;
    let events = state.drain_events();
    state.save(state_path)?;

    field("Claims minted", minted.to_string().bright_green());
    field("Claims held", state.pool.claim_balance_of(&who));
    for event in &events {
        println!("{}", event_line(event));
    }
    Ok(())
}

pub fn remove_liquidity(state_path: &Path, party: &str, claims: u128) -> Result<()> {
    let mut state = State::load(state_path)?;
    let who = parse_party(party)?;

    header("Remove Liquidity");
    field("Provider", name(&who));
    field("Claims", claims);

    let (out_a, out_b) = state
        .pool
        .withdraw(&mut state.asset_a, &mut state.asset_b, &who, claims)
        .context("Withdrawal rejected")?;
    let events = state.drain_events();
    state.save(state_path)?;

    field("Received A", out_a.to_string().bright_green());
    field("Received B", out_b.to_string().bright_green());
    field("Claims left", state.pool.claim_balance_of(&who));
    for event in &events {
        println!("{}", event_line(event));
    }
    Ok(())
}
