//! `royalacta-recon` — Reconciliation and aggregation engine.
//!
//! Pure functions over entry slices: per-platform matching of society and
//! distributor revenue, combined time series, and the category/platform/work
//! rollups behind the reports. No IO, no shared state.

pub mod aggregate;
pub mod compare;
pub mod model;

pub use aggregate::{
    aggregate_by_category, aggregate_by_platform, aggregate_by_work, aggregate_dist_by_album,
    aggregate_dist_by_country, aggregate_dist_by_period, aggregate_dist_by_retailer,
    aggregate_dist_by_sales_type, top_category, total_dist_plays, total_dist_usd, total_earnings,
    total_plays, unique_works, DistTotals, GroupTotals, SubTotals, WorkSummary,
};
pub use compare::{compare, time_series};
pub use model::{ComparisonSummary, MoreIn, PlatformComparison, TimeSeriesPoint};
