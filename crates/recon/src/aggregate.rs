//! Derived views over the society entries: category, platform and per-work
//! rollups for the reporting surface.

use std::collections::BTreeMap;

use serde::Serialize;

use royalacta_core::{CategoryGroup, DistributorEntry, RoyaltyEntry, SalesType};

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct GroupTotals {
    pub amount_eur: f64,
    pub plays: u64,
    pub entry_count: usize,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SubTotals {
    pub amount_eur: f64,
    pub plays: u64,
}

/// Per-work rollup with its rank by earnings and category/platform splits.
#[derive(Debug, Clone, Serialize)]
pub struct WorkSummary {
    pub rank: usize,
    pub work_number: String,
    pub work_title: String,
    pub total_amount_eur: f64,
    pub total_plays: u64,
    pub by_category: BTreeMap<CategoryGroup, SubTotals>,
    pub by_platform: BTreeMap<String, SubTotals>,
}

pub fn aggregate_by_category(entries: &[RoyaltyEntry]) -> BTreeMap<CategoryGroup, GroupTotals> {
    let mut result: BTreeMap<CategoryGroup, GroupTotals> = BTreeMap::new();
    for entry in entries {
        let totals = result.entry(entry.category_group).or_default();
        totals.amount_eur += entry.amount;
        totals.plays += entry.usage_count;
        totals.entry_count += 1;
    }
    result
}

pub fn aggregate_by_platform(entries: &[RoyaltyEntry]) -> BTreeMap<String, GroupTotals> {
    let mut result: BTreeMap<String, GroupTotals> = BTreeMap::new();
    for entry in entries {
        let totals = result.entry(platform_label(entry).to_string()).or_default();
        totals.amount_eur += entry.amount;
        totals.plays += entry.usage_count;
        totals.entry_count += 1;
    }
    result
}

/// Rollup per work, ranked by total earnings (rank 1 = highest). Works
/// without a number key on their title.
pub fn aggregate_by_work(entries: &[RoyaltyEntry]) -> Vec<WorkSummary> {
    let mut by_work: BTreeMap<&str, WorkSummary> = BTreeMap::new();

    for entry in entries {
        let key = work_key(entry);
        let work = by_work.entry(key).or_insert_with(|| WorkSummary {
            rank: 0,
            work_number: entry.work_number.clone(),
            work_title: entry.work_title.clone(),
            total_amount_eur: 0.0,
            total_plays: 0,
            by_category: BTreeMap::new(),
            by_platform: BTreeMap::new(),
        });
        work.total_amount_eur += entry.amount;
        work.total_plays += entry.usage_count;

        let category = work.by_category.entry(entry.category_group).or_default();
        category.amount_eur += entry.amount;
        category.plays += entry.usage_count;

        let platform = work
            .by_platform
            .entry(platform_label(entry).to_string())
            .or_default();
        platform.amount_eur += entry.amount;
        platform.plays += entry.usage_count;
    }

    let mut works: Vec<WorkSummary> = by_work.into_values().collect();
    works.sort_by(|a, b| b.total_amount_eur.total_cmp(&a.total_amount_eur));
    for (index, work) in works.iter_mut().enumerate() {
        work.rank = index + 1;
    }
    works
}

// ---------------------------------------------------------------------------
// Distributor-side rollups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct DistTotals {
    pub amount_usd: f64,
    pub plays: u64,
    pub entry_count: usize,
}

pub fn aggregate_dist_by_retailer(entries: &[DistributorEntry]) -> BTreeMap<String, DistTotals> {
    dist_rollup(entries, |entry| {
        if !entry.retailer_key.is_empty() {
            entry.retailer_key.clone()
        } else if !entry.retailer.is_empty() {
            entry.retailer.clone()
        } else {
            "unknown".to_string()
        }
    })
}

pub fn aggregate_dist_by_country(entries: &[DistributorEntry]) -> BTreeMap<String, DistTotals> {
    dist_rollup(entries, |entry| {
        if entry.country_code.is_empty() {
            "XX".to_string()
        } else {
            entry.country_code.clone()
        }
    })
}

pub fn aggregate_dist_by_sales_type(
    entries: &[DistributorEntry],
) -> BTreeMap<SalesType, DistTotals> {
    let mut result: BTreeMap<SalesType, DistTotals> = BTreeMap::new();
    for entry in entries {
        let totals = result.entry(entry.sales_type).or_default();
        totals.amount_usd += entry.net_amount_usd;
        totals.plays += entry.quantity;
        totals.entry_count += 1;
    }
    result
}

pub fn aggregate_dist_by_album(entries: &[DistributorEntry]) -> BTreeMap<String, DistTotals> {
    dist_rollup(entries, |entry| {
        if entry.album_name.is_empty() {
            "Unknown Album".to_string()
        } else {
            entry.album_name.clone()
        }
    })
}

pub fn aggregate_dist_by_period(entries: &[DistributorEntry]) -> BTreeMap<String, DistTotals> {
    dist_rollup(entries, |entry| {
        if entry.period.is_empty() {
            "unknown".to_string()
        } else {
            entry.period.clone()
        }
    })
}

pub fn total_dist_usd(entries: &[DistributorEntry]) -> f64 {
    entries.iter().map(|e| e.net_amount_usd).sum()
}

pub fn total_dist_plays(entries: &[DistributorEntry]) -> u64 {
    entries.iter().map(|e| e.quantity).sum()
}

fn dist_rollup(
    entries: &[DistributorEntry],
    key: impl Fn(&DistributorEntry) -> String,
) -> BTreeMap<String, DistTotals> {
    let mut result: BTreeMap<String, DistTotals> = BTreeMap::new();
    for entry in entries {
        let totals = result.entry(key(entry)).or_default();
        totals.amount_usd += entry.net_amount_usd;
        totals.plays += entry.quantity;
        totals.entry_count += 1;
    }
    result
}

pub fn total_earnings(entries: &[RoyaltyEntry]) -> f64 {
    entries.iter().map(|e| e.amount).sum()
}

pub fn total_plays(entries: &[RoyaltyEntry]) -> u64 {
    entries.iter().map(|e| e.usage_count).sum()
}

pub fn unique_works(entries: &[RoyaltyEntry]) -> usize {
    entries
        .iter()
        .map(work_key)
        .collect::<std::collections::BTreeSet<_>>()
        .len()
}

/// Category with the highest earnings, if any entries exist.
pub fn top_category(entries: &[RoyaltyEntry]) -> Option<CategoryGroup> {
    aggregate_by_category(entries)
        .into_iter()
        .max_by(|(_, a), (_, b)| a.amount_eur.total_cmp(&b.amount_eur))
        .map(|(category, _)| category)
}

fn work_key(entry: &RoyaltyEntry) -> &str {
    if entry.work_number.is_empty() {
        &entry.work_title
    } else {
        &entry.work_number
    }
}

fn platform_label(entry: &RoyaltyEntry) -> &str {
    if entry.platform_name.is_empty() {
        "Unbekannt"
    } else {
        &entry.platform_name
    }
}
