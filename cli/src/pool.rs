//! Pool lifecycle and read-only views

use anyhow::{Context, Result};
use colored::Colorize;
use cpswap_pool::U256;
use std::path::Path;

use crate::config::Config;
use crate::display::{event_line, field, header, name, parse_party};
use crate::state::State;

pub fn init(config: &Config, state_path: &Path, force: bool) -> Result<()> {
    header("Initialize Pool");

    if state_path.exists() && !force {
        anyhow::bail!(
            "State file already exists: {}\n\
             Use --force to replace it",
            state_path.display()
        );
    }

    let state = State::create(&config.pool)?;
    state.save(state_path)?;

    field("Pool", name(state.pool.address()));
    field("Asset A", state.asset_a.symbol());
    field("Asset B", state.asset_b.symbol());
    field("State file", state_path.display());
    println!("\n{}", "Pool created".bright_green());
    Ok(())
}

pub fn status(state_path: &Path) -> Result<()> {
    let state = State::load(state_path)?;
    let pool = &state.pool;
    let (reserve_a, reserve_b) = pool.get_reserves();

    header("Pool Status");
    field("Pool", name(pool.address()));
    field(
        "Assets",
        format!("{} / {}", state.asset_a.symbol(), state.asset_b.symbol()),
    );
    field("Reserve A", reserve_a);
    field("Reserve B", reserve_b);
    field("Price (B per A)", pool.get_price());
    field("Total claims", pool.total_claims());
    field("Invariant k", pool.invariant());

    println!();
    if state.history.is_empty() {
        println!("{}", "No events yet".dimmed());
    } else {
        println!("{}", "Recent events:".bright_cyan());
        for event in &state.history {
            println!("  {}", event_line(event));
        }
    }
    Ok(())
}

pub fn balance(state_path: &Path, party: &str) -> Result<()> {
    let state = State::load(state_path)?;
    let who = parse_party(party).context("Failed to resolve party")?;
    let (held_a, held_b) = state.holdings(&who);
    let claims = state.pool.claim_balance_of(&who);

    header("Balance");
    field("Party", name(&who));
    field(state.asset_a.symbol(), held_a);
    field(state.asset_b.symbol(), held_b);
    field("Claims", claims);

    let total = state.pool.total_claims();
    if claims > 0 && total > 0 {
        let (reserve_a, reserve_b) = state.pool.get_reserves();
        // Same floor the pool would pay on a full exit
        let share = |reserve: u128| U256::from(reserve) * U256::from(claims) / U256::from(total);
        let (share_a, share_b) = (share(reserve_a), share(reserve_b));
        field("Redeemable", format!("{} A + {} B", share_a, share_b));
    }
    Ok(())
}
