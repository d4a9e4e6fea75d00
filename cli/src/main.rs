//! cpswap CLI - Local simulator for the constant product pool
//!
//! Keeps a pool and two mock assets in a JSON state file and exposes every
//! pool operation as a subcommand, so liquidity, swaps, and fee accrual can
//! be exercised by hand.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use cpswap_pool::SwapDirection;
use std::path::PathBuf;

mod assets;
mod config;
mod display;
mod liquidity;
mod pool;
mod state;
mod trading;

use config::Config;

#[derive(Parser)]
#[command(name = "cpswap")]
#[command(about = "Constant product pool simulator", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to cpswap.toml (default: ./cpswap.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// State file (overrides state_file from the config)
    #[arg(short, long)]
    state: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Which of the pool's assets a command acts on
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Asset {
    A,
    B,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a fresh pool and two mock assets
    Init {
        /// Overwrite an existing state file
        #[arg(long)]
        force: bool,
    },

    /// Mint mock asset to a party
    Mint {
        #[arg(value_enum)]
        asset: Asset,
        /// Party label or base58 address
        party: String,
        amount: u128,
    },

    /// Let the pool pull up to AMOUNT of an asset from a party
    Approve {
        #[arg(value_enum)]
        asset: Asset,
        party: String,
        amount: u128,
    },

    /// Deposit both assets and receive claims
    AddLiquidity {
        party: String,
        amount_a: u128,
        amount_b: u128,
    },

    /// Burn claims for a share of the reserves
    RemoveLiquidity { party: String, claims: u128 },

    /// Sell one asset for the other
    Swap {
        party: String,
        /// a-to-b or b-to-a
        direction: SwapDirection,
        amount_in: u128,
    },

    /// Fee-adjusted output for an input against arbitrary reserves
    Quote {
        amount_in: u128,
        reserve_in: u128,
        reserve_out: u128,
    },

    /// Reserves, price, claims, and recent events
    Status,

    /// Claims and asset balances of a party
    Balance { party: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = Config::load(cli.config.as_deref())?;
    let state_path = config.state_path(cli.state.as_deref());

    if cli.verbose {
        println!("{} {}", "State file:".bright_cyan(), state_path.display());
    }

    match cli.command {
        Commands::Init { force } => {
            pool::init(&config, &state_path, force)?;
        }
        Commands::Mint { asset, party, amount } => {
            assets::mint(&state_path, asset, &party, amount)?;
        }
        Commands::Approve { asset, party, amount } => {
            assets::approve(&state_path, asset, &party, amount)?;
        }
        Commands::AddLiquidity { party, amount_a, amount_b } => {
            liquidity::add_liquidity(&state_path, &party, amount_a, amount_b)?;
        }
        Commands::RemoveLiquidity { party, claims } => {
            liquidity::remove_liquidity(&state_path, &party, claims)?;
        }
        Commands::Swap { party, direction, amount_in } => {
            trading::swap(&state_path, &party, direction, amount_in)?;
        }
        Commands::Quote { amount_in, reserve_in, reserve_out } => {
            trading::quote(amount_in, reserve_in, reserve_out)?;
        }
        Commands::Status => {
            pool::status(&state_path)?;
        }
        Commands::Balance { party } => {
            pool::balance(&state_path, &party)?;
        }
    }

    Ok(())
}
