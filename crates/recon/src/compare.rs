//! Per-platform reconciliation of the two revenue streams.

use std::collections::BTreeMap;

use royalacta_core::platform::{canonical_platform_key, platform_color, platform_display_name};
use royalacta_core::{DistributorEntry, RoyaltyEntry};

use crate::model::{
    Combined, ComparisonSummary, DistributorSide, MoreIn, PlatformComparison, PlayDiscrepancy,
    SocietySide, TimeSeriesPoint,
};

/// Play counts within this relative difference are reported as equal;
/// reporting-window skew alone produces a few percent.
const PLAY_DISCREPANCY_THRESHOLD_PCT: f64 = 5.0;

#[derive(Default, Clone, Copy)]
struct Bucket {
    revenue: f64,
    plays: u64,
}

/// Match society and distributor revenue per canonical platform and compute
/// the comparison table. Pure; deterministic order via BTreeMap.
pub fn compare(
    society: &[RoyaltyEntry],
    distributor: &[DistributorEntry],
    eur_usd_rate: f64,
) -> ComparisonSummary {
    let mut society_by_platform: BTreeMap<String, Bucket> = BTreeMap::new();
    for entry in society {
        let bucket = society_by_platform
            .entry(canonical_platform_key(&entry.platform_name))
            .or_default();
        bucket.revenue += entry.amount;
        bucket.plays += entry.usage_count;
    }

    let mut distributor_by_platform: BTreeMap<String, Bucket> = BTreeMap::new();
    for entry in distributor {
        let bucket = distributor_by_platform
            .entry(entry.retailer_key.clone())
            .or_default();
        bucket.revenue += entry.net_amount_usd;
        bucket.plays += entry.quantity;
    }

    let mut keys: Vec<&String> = society_by_platform.keys().collect();
    for key in distributor_by_platform.keys() {
        if !society_by_platform.contains_key(key) {
            keys.push(key);
        }
    }

    let mut platforms = Vec::with_capacity(keys.len());
    let mut unmatched_society = Vec::new();
    let mut unmatched_distributor = Vec::new();
    let mut matched_count = 0;

    for key in keys {
        let society_bucket = society_by_platform.get(key).copied();
        let distributor_bucket = distributor_by_platform.get(key).copied();
        match (society_bucket.is_some(), distributor_bucket.is_some()) {
            (true, true) => matched_count += 1,
            (true, false) => unmatched_society.push(key.clone()),
            (false, true) => unmatched_distributor.push(key.clone()),
            (false, false) => continue,
        }

        let society_bucket = society_bucket.unwrap_or_default();
        let distributor_bucket = distributor_bucket.unwrap_or_default();

        let distributor_eur = distributor_bucket.revenue * eur_usd_rate;
        let uplift = if distributor_eur > 0.0 {
            society_bucket.revenue / distributor_eur * 100.0
        } else if society_bucket.revenue > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        let max_plays = society_bucket.plays.max(distributor_bucket.plays);
        let pct_diff = if max_plays > 0 {
            society_bucket.plays.abs_diff(distributor_bucket.plays) as f64 / max_plays as f64
                * 100.0
        } else {
            0.0
        };
        let more_in = if pct_diff < PLAY_DISCREPANCY_THRESHOLD_PCT {
            MoreIn::Equal
        } else if society_bucket.plays > distributor_bucket.plays {
            MoreIn::Society
        } else {
            MoreIn::Distributor
        };

        platforms.push(PlatformComparison {
            platform_key: key.clone(),
            platform_name: platform_display_name(key),
            platform_color: platform_color(key).to_string(),
            society: SocietySide {
                revenue_eur: society_bucket.revenue,
                plays: society_bucket.plays,
                per_play_eur: if society_bucket.plays > 0 {
                    society_bucket.revenue / society_bucket.plays as f64
                } else {
                    0.0
                },
            },
            distributor: DistributorSide {
                revenue_usd: distributor_bucket.revenue,
                plays: distributor_bucket.plays,
                per_play_usd: if distributor_bucket.plays > 0 {
                    distributor_bucket.revenue / distributor_bucket.plays as f64
                } else {
                    0.0
                },
            },
            combined: Combined {
                total_eur: society_bucket.revenue + distributor_eur,
                society_uplift_pct: uplift,
            },
            play_discrepancy: PlayDiscrepancy { pct_diff, more_in },
        });
    }

    platforms.sort_by(|a, b| b.combined.total_eur.total_cmp(&a.combined.total_eur));

    // Aggregate totals from the raw entries, independent of the platform
    // matching above.
    let society_total_eur: f64 = society.iter().map(|e| e.amount).sum();
    let distributor_total_usd: f64 = distributor.iter().map(|e| e.net_amount_usd).sum();
    let distributor_total_eur = distributor_total_usd * eur_usd_rate;

    ComparisonSummary {
        society_total_eur,
        distributor_total_usd,
        distributor_total_eur,
        combined_total_eur: society_total_eur + distributor_total_eur,
        society_uplift_pct: if distributor_total_eur > 0.0 {
            society_total_eur / distributor_total_eur * 100.0
        } else {
            0.0
        },
        platforms,
        matched_count,
        unmatched_society,
        unmatched_distributor,
    }
}

/// Combined revenue per period, lexicographically sorted. Society entries
/// land under their fiscal year, distributor entries under their "YYYY-MM"
/// period; entries without any period are skipped.
pub fn time_series(
    society: &[RoyaltyEntry],
    distributor: &[DistributorEntry],
    eur_usd_rate: f64,
) -> Vec<TimeSeriesPoint> {
    let mut by_period: BTreeMap<String, (f64, f64)> = BTreeMap::new();

    for entry in society {
        let period = if entry.fiscal_year.is_empty() {
            &entry.distribution_period
        } else {
            &entry.fiscal_year
        };
        if period.is_empty() {
            continue;
        }
        by_period.entry(period.clone()).or_default().0 += entry.amount;
    }
    for entry in distributor {
        if entry.period.is_empty() {
            continue;
        }
        by_period.entry(entry.period.clone()).or_default().1 += entry.net_amount_usd;
    }

    by_period
        .into_iter()
        .map(|(period, (society_eur, dist_usd))| TimeSeriesPoint {
            period,
            society_eur,
            distributor_eur: dist_usd * eur_usd_rate,
            combined_eur: society_eur + dist_usd * eur_usd_rate,
        })
        .collect()
}
