//! Simulator state file
//!
//! One JSON document holding the pool, both mock assets, and the most
//! recent events. Every command loads it, applies one operation, and
//! writes it back through a temp file + rename so a crash never leaves a
//! half-written state behind.

use adapter_core::{Address, AssetLedger, MockAsset};
use anyhow::{Context, Result};
use cpswap_pool::{Pool, PoolEvent};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::PoolLabels;

/// Events kept in the state file for `status`
pub const HISTORY_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub pool: Pool,
    pub asset_a: MockAsset,
    pub asset_b: MockAsset,
    #[serde(default)]
    pub history: Vec<PoolEvent>,
}

impl State {
    /// Empty pool and two unminted assets named by `labels`
    pub fn create(labels: &PoolLabels) -> Result<Self> {
        let (address, asset_a, asset_b) = labels.addresses()?;
        let pool = Pool::new(address, asset_a, asset_b).context("Failed to create pool")?;

        Ok(Self {
            pool,
            asset_a: MockAsset::new(asset_a, labels.asset_a.as_str()),
            asset_b: MockAsset::new(asset_b, labels.asset_b.as_str()),
            history: Vec::new(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "State file not found: {}\n\
                 Create one with: cpswap init",
                path.display()
            );
        }

        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file: {}", path.display()))?;
        let state: State = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse state file: {}", path.display()))?;

        state
            .validate()
            .with_context(|| format!("Corrupt state file: {}", path.display()))?;
        log::debug!("loaded state from {}", path.display());
        Ok(state)
    }

    fn validate(&self) -> Result<()> {
        self.pool.check_invariants()?;
        if self.asset_a.asset_id() != *self.pool.asset_a()
            || self.asset_b.asset_id() != *self.pool.asset_b()
        {
            anyhow::bail!("asset ledgers do not match the pool's assets");
        }
        Ok(())
    }

    /// Write atomically: serialize to a sibling temp file, then rename
    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("Failed to serialize state")?;

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }

        let tmp = temp_path(path);
        fs::write(&tmp, data)
            .with_context(|| format!("Failed to write state file: {}", tmp.display()))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("Failed to replace state file: {}", path.display()))?;

        log::debug!("saved state to {}", path.display());
        Ok(())
    }

    /// Move the pool's pending events into the history and return them
    pub fn drain_events(&mut self) -> Vec<PoolEvent> {
        let events = self.pool.take_events();
        self.history.extend(events.iter().copied());
        if self.history.len() > HISTORY_LEN {
            let excess = self.history.len() - HISTORY_LEN;
            self.history.drain(..excess);
        }
        events
    }

    /// Asset balances of `party` as `(a, b)`
    pub fn holdings(&self, party: &Address) -> (u128, u128) {
        (self.asset_a.balance_of(party), self.asset_b.balance_of(party))
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
