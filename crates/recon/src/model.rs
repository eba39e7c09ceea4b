use serde::Serialize;

/// Which side reported more plays for a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoreIn {
    Society,
    Distributor,
    Equal,
}

#[derive(Debug, Clone, Serialize)]
pub struct SocietySide {
    pub revenue_eur: f64,
    pub plays: u64,
    pub per_play_eur: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DistributorSide {
    pub revenue_usd: f64,
    pub plays: u64,
    pub per_play_usd: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Combined {
    pub total_eur: f64,
    /// Society revenue as a percentage of the distributor's EUR revenue.
    /// `f64::INFINITY` when the platform earned society revenue but no
    /// distributor revenue.
    pub society_uplift_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayDiscrepancy {
    pub pct_diff: f64,
    pub more_in: MoreIn,
}

/// Both revenue streams for one canonical platform, matched by key.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformComparison {
    pub platform_key: String,
    pub platform_name: String,
    pub platform_color: String,
    pub society: SocietySide,
    pub distributor: DistributorSide,
    pub combined: Combined,
    pub play_discrepancy: PlayDiscrepancy,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonSummary {
    pub society_total_eur: f64,
    pub distributor_total_usd: f64,
    pub distributor_total_eur: f64,
    pub combined_total_eur: f64,
    pub society_uplift_pct: f64,
    /// Sorted by combined EUR revenue, largest first.
    pub platforms: Vec<PlatformComparison>,
    pub matched_count: usize,
    /// Canonical keys seen only on the society side.
    pub unmatched_society: Vec<String>,
    /// Canonical keys seen only on the distributor side.
    pub unmatched_distributor: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeSeriesPoint {
    pub period: String,
    pub society_eur: f64,
    pub distributor_eur: f64,
    pub combined_eur: f64,
}
