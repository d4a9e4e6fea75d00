//! Simulator configuration (`cpswap.toml`)
//!
//! ```toml
//! state_file = "~/.cpswap/state.json"
//!
//! [pool]
//! address = "pool"
//! asset_a = "TKA"
//! asset_b = "TKB"
//! ```
//!
//! Every key is optional.

use adapter_core::Address;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "cpswap.toml";
pub const DEFAULT_STATE_FILE: &str = "cpswap-state.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub state_file: String,
    pub pool: PoolLabels,
}

/// Labels the simulator turns into identities with `Address::from_label`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolLabels {
    pub address: String,
    pub asset_a: String,
    pub asset_b: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_file: DEFAULT_STATE_FILE.to_string(),
            pool: PoolLabels::default(),
        }
    }
}

impl Default for PoolLabels {
    fn default() -> Self {
        Self {
            address: "pool".to_string(),
            asset_a: "TKA".to_string(),
            asset_b: "TKB".to_string(),
        }
    }
}

impl Config {
    /// Load the configuration
    ///
    /// An explicit `path` must exist. Without one, `./cpswap.toml` is read
    /// if present and the built-in defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !path.exists() {
            if explicit {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            log::debug!("no {} found, using defaults", path.display());
            return Ok(Self::default());
        }

        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&data).with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(data: &str) -> Result<Self> {
        Ok(toml::from_str(data)?)
    }

    /// State file location, `~` expanded; `override_path` wins
    pub fn state_path(&self, override_path: Option<&Path>) -> PathBuf {
        match override_path {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(shellexpand::tilde(&self.state_file).as_ref()),
        }
    }
}

impl PoolLabels {
    /// `(pool, asset_a, asset_b)` identities
    pub fn addresses(&self) -> Result<(Address, Address, Address)> {
        let resolve = |what: &str, label: &str| {
            Address::from_label(label)
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("Invalid {} label: {:?}", what, label))
        };

        Ok((
            resolve("pool address", &self.address)?,
            resolve("asset_a", &self.asset_a)?,
            resolve("asset_b", &self.asset_b)?,
        ))
    }
}
