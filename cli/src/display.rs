//! Output helpers shared by the commands

use adapter_core::Address;
use anyhow::Result;
use colored::Colorize;
use cpswap_pool::PoolEvent;

/// Parse a party given as a base58 address or a short label
pub fn parse_party(input: &str) -> Result<Address> {
    if let Ok(address) = input.parse::<Address>() {
        return Ok(address);
    }
    Address::from_label(input)
        .map_err(|e| anyhow::anyhow!("Invalid party {:?}: {}", input, e))
}

/// Label if the address has one, base58 otherwise
pub fn name(address: &Address) -> String {
    match address.as_label() {
        Some(label) => label.to_string(),
        None => address.to_string(),
    }
}

pub fn header(title: &str) {
    println!("{}", format!("=== {} ===", title).bright_green().bold());
}

pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("{} {}", format!("{}:", label).bright_cyan(), value);
}

pub fn event_line(event: &PoolEvent) -> String {
    match event {
        PoolEvent::LiquidityAdded { provider, amount_a, amount_b, claims_minted } => format!(
            "{} {} deposited {} A + {} B, minted {}",
            "LiquidityAdded".green(),
            name(provider),
            amount_a,
            amount_b,
            claims_minted
        ),
        PoolEvent::LiquidityRemoved { provider, amount_a_out, amount_b_out, claims_burned } => format!(
            "{} {} burned {}, received {} A + {} B",
            "LiquidityRemoved".yellow(),
            name(provider),
            claims_burned,
            amount_a_out,
            amount_b_out
        ),
        PoolEvent::Swap { trader, amount_in, amount_out, asset_in_is_a } => {
            let (sold, bought) = if *asset_in_is_a { ("A", "B") } else { ("B", "A") };
            format!(
                "{} {} sold {} {} for {} {}",
                "Swap".bright_blue(),
                name(trader),
                amount_in,
                sold,
                amount_out,
                bought
            )
        }
    }
}
