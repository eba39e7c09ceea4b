use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Category groups
// ---------------------------------------------------------------------------

/// Canonical revenue-category group. Unmapped society codes always fall back
/// to `Other`, never to a missing value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryGroup {
    Streaming,
    Download,
    SocialPlatforms,
    Radio,
    Television,
    Live,
    MediaLibraries,
    Physical,
    International,
    Other,
}

impl CategoryGroup {
    /// German display label, as shown in the reference product.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Streaming => "Streaming",
            Self::Download => "Downloads",
            Self::SocialPlatforms => "Social Platforms",
            Self::Radio => "Radio",
            Self::Television => "Fernsehen",
            Self::Live => "Live & Events",
            Self::MediaLibraries => "Mediatheken",
            Self::Physical => "Physisch (CD/Vinyl)",
            Self::International => "International",
            Self::Other => "Sonstige",
        }
    }
}

impl std::fmt::Display for CategoryGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Streaming => "streaming",
            Self::Download => "download",
            Self::SocialPlatforms => "social_platforms",
            Self::Radio => "radio",
            Self::Television => "television",
            Self::Live => "live",
            Self::MediaLibraries => "media_libraries",
            Self::Physical => "physical",
            Self::International => "international",
            Self::Other => "other",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Society entries
// ---------------------------------------------------------------------------

/// One row of attributed collecting-society revenue: one work, one role,
/// one category, one platform, one period. Immutable once created; removed
/// only when its originating statement is removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoyaltyEntry {
    /// Content hash + timestamp nonce. Display key only; dedup uses a
    /// separate content key (see the store crate).
    pub id: String,
    /// Composite "number-version" string; may be empty for malformed rows.
    pub work_number: String,
    pub work_title: String,
    /// Single-letter role code (K/T/B/V/VG).
    pub role: String,
    /// Original fraction/percent string, e.g. "5/12" or "41.67%".
    pub share_raw: String,
    /// In (0,1]; 1.0 when unresolvable.
    pub share_decimal: f64,
    /// Source-specific category abbreviation, e.g. "MOD S".
    pub category_code: String,
    pub category_group: CategoryGroup,
    /// 0 when the source omits it (PDF statements).
    pub usage_count: u64,
    /// Signed EUR amount; corrections can be negative.
    pub amount: f64,
    /// Original amount string, preserved for audit and dedup.
    pub amount_raw: String,
    /// Cleaned platform/licensee display string.
    pub platform_name: String,
    pub fiscal_year: String,
    pub distribution_period: String,
    pub source_file: String,
    /// Unix milliseconds.
    pub imported_at: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementFormat {
    Detail,
    Compact,
    Summary,
    PdfStandard,
}

impl std::fmt::Display for StatementFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Detail => write!(f, "detail"),
            Self::Compact => write!(f, "compact"),
            Self::Summary => write!(f, "summary"),
            Self::PdfStandard => write!(f, "pdf_standard"),
        }
    }
}

/// Metadata about one ingested society file. Deleted together with its
/// entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportedStatement {
    pub id: String,
    pub file_name: String,
    /// "csv" or "pdf".
    pub file_type: String,
    pub format_variant: StatementFormat,
    pub fiscal_year: String,
    pub distribution_period: String,
    pub entry_count: usize,
    pub total_amount: f64,
    /// Human-readable non-fatal issues collected during parsing.
    pub warnings: Vec<String>,
    pub imported_at: u64,
}

// ---------------------------------------------------------------------------
// Distributor entries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesType {
    StreamingSubscription,
    StreamingAd,
    DownloadTrack,
    DownloadAlbum,
    StreamingVideo,
    Other,
}

impl SalesType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::StreamingSubscription => "Streaming (Abo)",
            Self::StreamingAd => "Streaming (Werbung)",
            Self::DownloadTrack => "Download (Track)",
            Self::DownloadAlbum => "Download (Album)",
            Self::StreamingVideo => "Video-Streaming",
            Self::Other => "Sonstige",
        }
    }
}

/// One row of distributor-reported revenue for one track/retailer/period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributorEntry {
    pub id: String,
    /// Normalized "YYYY-MM".
    pub period: String,
    /// Original retailer string, e.g. "Amazon Ad-Supported".
    pub retailer: String,
    /// Canonical platform key shared with the society side, e.g. "amazon".
    pub retailer_key: String,
    /// When the usage occurred (normalized; falls back to `period`).
    pub reporting_period: String,
    pub label_name: String,
    pub main_artist: String,
    pub album_name: String,
    pub track_name: String,
    pub isrc: String,
    /// ISO-2 country code.
    pub country_code: String,
    pub sales_type: SalesType,
    /// Play/unit count.
    pub quantity: u64,
    /// Source-of-truth currency is USD. May be 0 for non-monetized plays.
    pub net_amount_usd: f64,
    pub source_file: String,
    pub imported_at: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportedDistributorStatement {
    pub id: String,
    pub file_name: String,
    /// "xlsx", "csv" or "tsv".
    pub file_type: String,
    /// Vendor profile that matched, or "generic".
    pub distributor_format: String,
    pub entry_count: usize,
    pub total_amount_usd: f64,
    /// Span of observed periods.
    pub date_range: DateRange,
    pub warnings: Vec<String>,
    pub imported_at: u64,
}
