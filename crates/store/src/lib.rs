//! `royalacta-store` — deduplicating entry store.
//!
//! Accumulates parsed batches from many files into two collections (society
//! entries, distributor entries) without double-counting overlapping data.
//! Two guards: an exact file-name reimport check per statement, and a
//! content key per entry that recognizes the same payment re-reported
//! across different files and format variants.

pub mod persist;

use std::collections::HashSet;

use royalacta_core::{
    DateRange, DistributorEntry, ImportedDistributorStatement, ImportedStatement, RoyaltyEntry,
};

use persist::{PersistedState, StateStore};

/// Starting EUR/USD rate until the user sets one.
pub const DEFAULT_EUR_USD_RATE: f64 = 0.92;

/// Result of committing one parsed batch.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    Imported {
        added: usize,
        /// Entries dropped because their content key was already present.
        /// Benign, not surfaced as a warning.
        duplicates_skipped: usize,
    },
    /// The file name was imported before. Carries the user-facing message.
    DuplicateFile(String),
}

pub struct RoyaltyStore<S: StateStore> {
    entries: Vec<RoyaltyEntry>,
    statements: Vec<ImportedStatement>,
    distributor_entries: Vec<DistributorEntry>,
    distributor_statements: Vec<ImportedDistributorStatement>,
    eur_usd_rate: f64,
    society_keys: HashSet<String>,
    distributor_keys: HashSet<String>,
    persistence: S,
}

impl<S: StateStore> RoyaltyStore<S> {
    /// Rehydrate from the persistence collaborator; a missing or unreadable
    /// state degrades to an empty store.
    pub fn new(persistence: S) -> Self {
        let state = persistence.load().unwrap_or_default();
        let society_keys = state.entries.iter().map(society_key).collect();
        let distributor_keys = state.distributor_entries.iter().map(distributor_key).collect();
        Self {
            entries: state.entries,
            statements: state.statements,
            distributor_entries: state.distributor_entries,
            distributor_statements: state.distributor_statements,
            eur_usd_rate: state.eur_usd_rate,
            society_keys,
            distributor_keys,
            persistence,
        }
    }

    // -----------------------------------------------------------------------
    // Imports
    // -----------------------------------------------------------------------

    pub fn add_society_batch(
        &mut self,
        entries: Vec<RoyaltyEntry>,
        mut statement: ImportedStatement,
    ) -> ImportOutcome {
        if self.statements.iter().any(|s| s.file_name == statement.file_name) {
            return ImportOutcome::DuplicateFile(duplicate_file_message(&statement.file_name));
        }

        let incoming = entries.len();
        let mut retained = Vec::with_capacity(incoming);
        for entry in entries {
            if self.society_keys.insert(society_key(&entry)) {
                retained.push(entry);
            }
        }
        let added = retained.len();

        // Counters reflect what was actually stored, not what was parsed.
        statement.entry_count = added;
        statement.total_amount = retained.iter().map(|e| e.amount).sum();

        self.entries.extend(retained);
        self.statements.push(statement);
        self.save();

        ImportOutcome::Imported {
            added,
            duplicates_skipped: incoming - added,
        }
    }

    pub fn add_distributor_batch(
        &mut self,
        entries: Vec<DistributorEntry>,
        mut statement: ImportedDistributorStatement,
    ) -> ImportOutcome {
        if self
            .distributor_statements
            .iter()
            .any(|s| s.file_name == statement.file_name)
        {
            return ImportOutcome::DuplicateFile(duplicate_file_message(&statement.file_name));
        }

        let incoming = entries.len();
        let mut retained = Vec::with_capacity(incoming);
        for entry in entries {
            if self.distributor_keys.insert(distributor_key(&entry)) {
                retained.push(entry);
            }
        }
        let added = retained.len();

        statement.entry_count = added;
        statement.total_amount_usd = retained.iter().map(|e| e.net_amount_usd).sum();
        statement.date_range = period_range(&retained);

        self.distributor_entries.extend(retained);
        self.distributor_statements.push(statement);
        self.save();

        ImportOutcome::Imported {
            added,
            duplicates_skipped: incoming - added,
        }
    }

    // -----------------------------------------------------------------------
    // Removal & settings
    // -----------------------------------------------------------------------

    /// Remove one imported file's contribution, society or distributor.
    /// A real filter over the collections, not a soft delete; the content
    /// keys are rebuilt so the file can be imported again.
    pub fn remove_statement(&mut self, file_name: &str) -> bool {
        let had_society = self.statements.iter().any(|s| s.file_name == file_name);
        let had_distributor = self
            .distributor_statements
            .iter()
            .any(|s| s.file_name == file_name);
        if !had_society && !had_distributor {
            return false;
        }

        if had_society {
            self.statements.retain(|s| s.file_name != file_name);
            self.entries.retain(|e| e.source_file != file_name);
            self.society_keys = self.entries.iter().map(society_key).collect();
        }
        if had_distributor {
            self.distributor_statements.retain(|s| s.file_name != file_name);
            self.distributor_entries.retain(|e| e.source_file != file_name);
            self.distributor_keys = self.distributor_entries.iter().map(distributor_key).collect();
        }

        self.save();
        true
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
        self.statements.clear();
        self.distributor_entries.clear();
        self.distributor_statements.clear();
        self.society_keys.clear();
        self.distributor_keys.clear();
        self.save();
    }

    pub fn set_eur_usd_rate(&mut self, rate: f64) {
        self.eur_usd_rate = rate;
        self.save();
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn entries(&self) -> &[RoyaltyEntry] {
        &self.entries
    }

    pub fn statements(&self) -> &[ImportedStatement] {
        &self.statements
    }

    pub fn distributor_entries(&self) -> &[DistributorEntry] {
        &self.distributor_entries
    }

    pub fn distributor_statements(&self) -> &[ImportedDistributorStatement] {
        &self.distributor_statements
    }

    pub fn eur_usd_rate(&self) -> f64 {
        self.eur_usd_rate
    }

    /// Full state, verbatim, for export and persistence.
    pub fn export_state(&self) -> PersistedState {
        PersistedState {
            entries: self.entries.clone(),
            statements: self.statements.clone(),
            distributor_entries: self.distributor_entries.clone(),
            distributor_statements: self.distributor_statements.clone(),
            eur_usd_rate: self.eur_usd_rate,
        }
    }

    // Fire-and-forget: a failed save never blocks or corrupts the
    // in-memory state.
    fn save(&self) {
        let _ = self.persistence.save(&self.export_state());
    }
}

fn duplicate_file_message(file_name: &str) -> String {
    format!("Die Datei \"{file_name}\" wurde bereits importiert.")
}

/// Content key for society entries. Role is deliberately excluded: two
/// role-split rows of one payment in the same file must both survive, while
/// the same payment re-reported in a compact and a detail file must not.
fn society_key(entry: &RoyaltyEntry) -> String {
    let period = if entry.fiscal_year.is_empty() {
        &entry.distribution_period
    } else {
        &entry.fiscal_year
    };
    format!(
        "{}|{}|{:.10}|{}",
        entry.work_number, entry.category_code, entry.amount, period
    )
}

/// Content key for distributor entries, on the canonical retailer key so
/// differently-spelled aliases of one platform dedup together.
fn distributor_key(entry: &DistributorEntry) -> String {
    format!(
        "{}|{}|{}|{}|{:.6}",
        entry.retailer_key, entry.period, entry.album_name, entry.country_code, entry.net_amount_usd
    )
}

fn period_range(entries: &[DistributorEntry]) -> DateRange {
    let mut range = DateRange::default();
    for entry in entries {
        if entry.period.is_empty() {
            continue;
        }
        if range.from.is_empty() || entry.period < range.from {
            range.from = entry.period.clone();
        }
        if entry.period > range.to {
            range.to = entry.period.clone();
        }
    }
    range
}
