//! Persistence boundary.
//!
//! The store hands its full state to a [`StateStore`] on every mutation and
//! rehydrates from it at startup. Persistence is fire-and-forget: the dedup
//! logic never depends on a save having completed, and the store works
//! within one session against [`NullStore`].

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use royalacta_core::{
    DistributorEntry, ImportedDistributorStatement, ImportedStatement, RoyaltyEntry,
};

use crate::DEFAULT_EUR_USD_RATE;

/// Everything that survives between sessions, under one logical key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub entries: Vec<RoyaltyEntry>,
    pub statements: Vec<ImportedStatement>,
    pub distributor_entries: Vec<DistributorEntry>,
    pub distributor_statements: Vec<ImportedDistributorStatement>,
    pub eur_usd_rate: f64,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            statements: Vec::new(),
            distributor_entries: Vec::new(),
            distributor_statements: Vec::new(),
            eur_usd_rate: DEFAULT_EUR_USD_RATE,
        }
    }
}

pub trait StateStore {
    /// Previously saved state, if any. Unreadable or corrupt state degrades
    /// to `None`; startup must never fail on a bad state file.
    fn load(&self) -> Option<PersistedState>;
    fn save(&self, state: &PersistedState) -> Result<(), String>;
}

/// Pretty JSON in the platform data directory.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("royalacta")
            .join("state.json")
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Option<PersistedState> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
    }

    fn save(&self, state: &PersistedState) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let json = serde_json::to_string_pretty(state).map_err(|e| e.to_string())?;
        fs::write(&self.path, json).map_err(|e| e.to_string())
    }
}

/// No-op persistence for tests and one-shot invocations.
pub struct NullStore;

impl StateStore for NullStore {
    fn load(&self) -> Option<PersistedState> {
        None
    }

    fn save(&self, _state: &PersistedState) -> Result<(), String> {
        Ok(())
    }
}
