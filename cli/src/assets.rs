//! Mock asset administration

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::display::{field, header, name, parse_party};
use crate::state::State;
use crate::Asset;

pub fn mint(state_path: &Path, asset: Asset, party: &str, amount: u128) -> Result<()> {
    let mut state = State::load(state_path)?;
    let who = parse_party(party)?;

    let ledger = match asset {
        Asset::A => &mut state.asset_a,
        Asset::B => &mut state.asset_b,
    };
    ledger
        .mint(&who, amount)
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("Failed to mint {} to {}", ledger.symbol(), name(&who)))?;
    let symbol = ledger.symbol().to_string();

    state.save(state_path)?;

    header("Mint");
    field("Asset", &symbol);
    field("To", name(&who));
    field("Amount", amount);
    println!("\n{}", "Minted".bright_green());
    Ok(())
}

pub fn approve(state_path: &Path, asset: Asset, party: &str, amount: u128) -> Result<()> {
    let mut state = State::load(state_path)?;
    let who = parse_party(party)?;
    let spender = *state.pool.address();

    let ledger = match asset {
        Asset::A => &mut state.asset_a,
        Asset::B => &mut state.asset_b,
    };
    ledger.approve(&who, &spender, amount);
    let symbol = ledger.symbol().to_string();

    state.save(state_path)?;

    header("Approve");
    field("Asset", &symbol);
    field("Owner", name(&who));
    field("Spender", name(&spender));
    let shown = if amount == u128::MAX {
        "unlimited".to_string()
    } else {
        amount.to_string()
    };
    field("Allowance", shown);
    Ok(())
}
