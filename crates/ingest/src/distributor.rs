//! Distributor sales-report parser.
//!
//! Distributors ship ad hoc spreadsheet dialects with no stable schema.
//! Known vendors are matched by scoring hard-coded column profiles against
//! the header row; anything else falls back to pattern-based generic column
//! detection, which needs at least a retailer-like and an amount-like
//! column to accept the file.

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{Duration, NaiveDate};

use royalacta_core::numeric::now_millis;
use royalacta_core::platform::normalize_retailer;
use royalacta_core::sales_type::classify_sales_type;
use royalacta_core::{DateRange, DistributorEntry, ImportedDistributorStatement};

use crate::error::ParseError;

// ---------------------------------------------------------------------------
// Vendor profiles
// ---------------------------------------------------------------------------

/// Canonical column a dialect header can feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Column {
    Period,
    Retailer,
    ReportingPeriod,
    LabelName,
    MainArtist,
    AlbumName,
    TrackName,
    Isrc,
    CountryCode,
    SalesDescription,
    Quantity,
    NetAmount,
}

struct VendorProfile {
    name: &'static str,
    /// Case-insensitive substring matches against the header row; the
    /// fraction found is the profile's score.
    required: &'static [&'static str],
    columns: &'static [(Column, &'static str)],
}

const PROFILES: &[VendorProfile] = &[
    VendorProfile {
        name: "argonauta",
        required: &["retailer", "main artist", "album name", "net amount after fees"],
        columns: &[
            (Column::Period, "period"),
            (Column::Retailer, "retailer"),
            (Column::ReportingPeriod, "retailer reporting period"),
            (Column::LabelName, "label name"),
            (Column::MainArtist, "main artist"),
            (Column::AlbumName, "album name"),
            (Column::TrackName, "track name"),
            (Column::Isrc, "isrc"),
            (Column::CountryCode, "country code a2"),
            (Column::SalesDescription, "sales description"),
            (Column::Quantity, "quantity"),
            (Column::NetAmount, "net amount after fees (usd)"),
        ],
    },
    VendorProfile {
        name: "distrokid",
        required: &["reporting date", "store", "earnings (usd)"],
        columns: &[
            (Column::Period, "reporting date"),
            (Column::Retailer, "store"),
            (Column::ReportingPeriod, "sale month"),
            (Column::MainArtist, "artist"),
            (Column::AlbumName, "album"),
            (Column::TrackName, "title"),
            (Column::Isrc, "isrc"),
            (Column::CountryCode, "country of sale"),
            (Column::SalesDescription, "sale type"),
            (Column::Quantity, "quantity"),
            (Column::NetAmount, "earnings (usd)"),
        ],
    },
    VendorProfile {
        name: "tunecore",
        required: &["store name", "sales period"],
        columns: &[
            (Column::Period, "sales period"),
            (Column::Retailer, "store name"),
            (Column::ReportingPeriod, "sales period"),
            (Column::LabelName, "label"),
            (Column::MainArtist, "artist"),
            (Column::AlbumName, "release title"),
            (Column::TrackName, "song title"),
            (Column::Isrc, "isrc"),
            (Column::CountryCode, "country code"),
            (Column::SalesDescription, "sales type"),
            (Column::Quantity, "quantity"),
            (Column::NetAmount, "total earned"),
        ],
    },
    VendorProfile {
        name: "cdbaby",
        required: &["payable", "qty"],
        columns: &[
            (Column::Period, "trans date"),
            (Column::Retailer, "channel"),
            (Column::MainArtist, "artist"),
            (Column::AlbumName, "album"),
            (Column::TrackName, "disc/track"),
            (Column::Isrc, "upc/ean"),
            (Column::CountryCode, "country"),
            (Column::SalesDescription, "unit"),
            (Column::Quantity, "qty"),
            (Column::NetAmount, "payable"),
        ],
    },
];

/// Generic fallback: per field, ordered header-name patterns; the first
/// pattern contained in any header wins.
const GENERIC_PATTERNS: &[(Column, &[&str])] = &[
    (Column::Period, &["period", "date", "month", "reporting date", "sales period", "trans date"]),
    (Column::Retailer, &["retailer", "store", "store name", "channel", "platform", "service", "dsp"]),
    (Column::MainArtist, &["artist", "main artist", "performer"]),
    (Column::AlbumName, &["album", "album name", "release", "release title", "product"]),
    (Column::TrackName, &["track", "track name", "title", "song", "song title"]),
    (Column::Isrc, &["isrc", "upc", "upc/ean", "ean", "gtin"]),
    (Column::CountryCode, &["country code", "country code a2", "country", "territory", "region"]),
    (Column::SalesDescription, &["sales description", "sales type", "sale type", "type", "unit", "content type"]),
    (Column::Quantity, &["quantity", "qty", "plays", "streams", "units", "count"]),
    (Column::NetAmount, &["net amount", "earnings", "revenue", "payable", "total earned", "amount", "payout"]),
    (Column::LabelName, &["label", "label name"]),
    (Column::ReportingPeriod, &["reporting period", "retailer reporting period", "sale month"]),
];

const SCORE_THRESHOLD: f64 = 0.6;

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct DistributorParseResult {
    pub entries: Vec<DistributorEntry>,
    pub statement: ImportedDistributorStatement,
}

/// Parse one distributor report: `.xlsx`/`.xls` via calamine, `.tsv`/`.txt`
/// tab-delimited, anything else comma-delimited text.
pub fn parse_distributor(bytes: &[u8], file_name: &str) -> Result<DistributorParseResult, ParseError> {
    let ext = file_name
        .to_lowercase()
        .rsplit('.')
        .next()
        .unwrap_or("")
        .to_string();

    let rows = match ext.as_str() {
        "tsv" | "txt" => read_delimited(bytes, b'\t')?,
        "csv" => read_delimited(bytes, b',')?,
        _ => read_workbook(bytes)?,
    };

    if rows.is_empty() {
        return Err(ParseError::Empty);
    }
    if rows.len() < 2 {
        return Err(ParseError::NoDataRows);
    }

    let headers: Vec<String> = rows[0].iter().map(|h| h.trim().to_lowercase()).collect();
    let (format_name, columns) = detect_profile(&headers).ok_or(ParseError::UnknownDialect)?;

    let now = now_millis();
    let mut entries: Vec<DistributorEntry> = Vec::new();
    let mut total_amount_usd = 0.0;
    let mut min_period = String::new();
    let mut max_period = String::new();

    for (i, row) in rows[1..].iter().enumerate() {
        let get = |c: Column| -> &str {
            columns
                .get(&c)
                .and_then(|&idx| row.get(idx))
                .map(|v| v.trim())
                .unwrap_or("")
        };

        let retailer = get(Column::Retailer);
        let net_amount_usd = parse_money(get(Column::NetAmount));
        let quantity = parse_money(get(Column::Quantity)).max(0.0).round() as u64;

        // Blank retailer = vendor summary/total row; all-zero rows carry no
        // information either way.
        if retailer.is_empty() {
            continue;
        }
        if net_amount_usd == 0.0 && quantity == 0 {
            continue;
        }

        let period = normalize_period(get(Column::Period));
        let reporting_period = {
            let rp = normalize_period(get(Column::ReportingPeriod));
            if rp.is_empty() { period.clone() } else { rp }
        };
        if !period.is_empty() {
            if min_period.is_empty() || period < min_period {
                min_period = period.clone();
            }
            if period > max_period {
                max_period = period.clone();
            }
        }
        total_amount_usd += net_amount_usd;

        entries.push(DistributorEntry {
            id: format!("dist_{i}_{now:x}"),
            period,
            retailer: retailer.to_string(),
            retailer_key: normalize_retailer(retailer),
            reporting_period,
            label_name: get(Column::LabelName).to_string(),
            main_artist: get(Column::MainArtist).to_string(),
            album_name: get(Column::AlbumName).to_string(),
            track_name: get(Column::TrackName).to_string(),
            isrc: get(Column::Isrc).to_string(),
            country_code: get(Column::CountryCode)
                .to_uppercase()
                .chars()
                .take(2)
                .collect(),
            sales_type: classify_sales_type(get(Column::SalesDescription)),
            quantity,
            net_amount_usd,
            source_file: file_name.to_string(),
            imported_at: now,
        });
    }

    if entries.is_empty() {
        return Err(ParseError::NoValidEntries);
    }

    let file_type = match ext.as_str() {
        "tsv" | "txt" => "tsv",
        "csv" => "csv",
        _ => "xlsx",
    };
    let statement = ImportedDistributorStatement {
        id: format!("distst_{now:x}"),
        file_name: file_name.to_string(),
        file_type: file_type.to_string(),
        distributor_format: format_name.to_string(),
        entry_count: entries.len(),
        total_amount_usd,
        date_range: DateRange {
            from: min_period,
            to: max_period,
        },
        warnings: Vec::new(),
        imported_at: now,
    };

    Ok(DistributorParseResult { entries, statement })
}

// ---------------------------------------------------------------------------
// Input loading
// ---------------------------------------------------------------------------

fn read_delimited(bytes: &[u8], delimiter: u8) -> Result<Vec<Vec<String>>, ParseError> {
    let content = crate::decode_text(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ParseError::Io(e.to_string()))?;
        rows.push(record.iter().map(|f| f.to_string()).collect());
    }
    Ok(rows)
}

fn read_workbook(bytes: &[u8]) -> Result<Vec<Vec<String>>, ParseError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| ParseError::Io(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ParseError::Empty)?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ParseError::Io(e.to_string()))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect())
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(n) => {
            // Integers without decimals
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{n}")
            }
        }
        Data::Int(n) => format!("{n}"),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::Error(e) => format!("#{e:?}"),
        // Serial number as text; the period normalizer converts it.
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
    }
}

// ---------------------------------------------------------------------------
// Dialect detection
// ---------------------------------------------------------------------------

fn detect_profile(headers: &[String]) -> Option<(&'static str, HashMap<Column, usize>)> {
    let mut best: Option<&VendorProfile> = None;
    let mut best_score = 0.0f64;

    for profile in PROFILES {
        let matched = profile
            .required
            .iter()
            .filter(|req| headers.iter().any(|h| h.contains(*req)))
            .count();
        let score = matched as f64 / profile.required.len() as f64;
        if score > best_score {
            best_score = score;
            best = Some(profile);
        }
    }

    if best_score >= SCORE_THRESHOLD {
        if let Some(profile) = best {
            let mut map = HashMap::new();
            for (column, name) in profile.columns {
                if let Some(idx) = headers.iter().position(|h| h == name || h.contains(name)) {
                    map.insert(*column, idx);
                }
            }
            return Some((profile.name, map));
        }
    }

    // Generic fallback.
    let mut map = HashMap::new();
    for (column, patterns) in GENERIC_PATTERNS {
        for pattern in *patterns {
            if let Some(idx) = headers.iter().position(|h| h.contains(pattern)) {
                map.insert(*column, idx);
                break;
            }
        }
    }
    if map.contains_key(&Column::Retailer) && map.contains_key(&Column::NetAmount) {
        Some(("generic", map))
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Value parsing
// ---------------------------------------------------------------------------

/// Strip currency symbols, thousands commas and whitespace; accountant
/// parentheses mean negative. Unparseable → 0.
fn parse_money(value: &str) -> f64 {
    if value.is_empty() {
        return 0.0;
    }
    let mut cleaned = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '$' | '€' | '£' | '¥' | ',' | ')' => {}
            '(' => cleaned.push('-'),
            c if c.is_whitespace() => {}
            c => cleaned.push(c),
        }
    }
    cleaned.parse::<f64>().unwrap_or(0.0)
}

/// Normalize period spellings ("Mar 2024", "03/2024", "2024-03-15", Excel
/// serials) to "YYYY-MM". Unrecognized input passes through unchanged so
/// nothing is silently dropped.
fn normalize_period(value: &str) -> String {
    let v = value.trim();
    if v.is_empty() {
        return String::new();
    }

    if let Some(period) = excel_serial_period(v) {
        return period;
    }

    let bytes = v.as_bytes();
    let leading_year = bytes.len() >= 6 && bytes[..4].iter().all(u8::is_ascii_digit);

    // ISO "YYYY-MM", "YYYY-MM-DD", plus "YYYY/MM" and "YYYY.MM"
    if leading_year && matches!(bytes[4], b'-' | b'/' | b'.') {
        let month: String = v[5..]
            .chars()
            .take_while(char::is_ascii_digit)
            .take(2)
            .collect();
        if !month.is_empty() {
            return format!("{}-{month:0>2}", &v[..4]);
        }
    }

    // "MM/YYYY", "MM-YYYY", "MM.YYYY"
    let parts: Vec<&str> = v.split(['/', '-', '.']).collect();
    if parts.len() == 2
        && !parts[0].is_empty()
        && parts[0].len() <= 2
        && parts[1].len() == 4
        && parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit()))
    {
        return format!("{}-{:0>2}", parts[1], parts[0]);
    }

    // US "MM/DD/YYYY"
    if v.matches('/').count() == 2 {
        let parts: Vec<&str> = v.split('/').collect();
        if parts.len() == 3
            && parts[2].len() == 4
            && parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit()))
        {
            return format!("{}-{:0>2}", parts[2], parts[0]);
        }
    }

    // English "Month YYYY"
    let words: Vec<&str> = v.split_whitespace().collect();
    if words.len() == 2 && words[1].len() == 4 && words[1].chars().all(|c| c.is_ascii_digit()) {
        if let Some(month) = month_number(words[0]) {
            return format!("{}-{month:02}", words[1]);
        }
    }

    v.to_string()
}

/// Excel serial date (days since 1899-12-30) to "YYYY-MM". The 30000–70000
/// window covers 1982–2061 and rules out plain years and counts.
fn excel_serial_period(v: &str) -> Option<String> {
    if !v.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let serial: f64 = v.parse().ok()?;
    if !(30000.0..70000.0).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?;
    let date = epoch.checked_add_signed(Duration::days(serial as i64 - 25569))?;
    Some(date.format("%Y-%m").to_string())
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name.to_lowercase().as_str() {
        "jan" | "january" => 1,
        "feb" | "february" => 2,
        "mar" | "march" => 3,
        "apr" | "april" => 4,
        "may" => 5,
        "jun" | "june" => 6,
        "jul" | "july" => 7,
        "aug" | "august" => 8,
        "sep" | "september" => 9,
        "oct" | "october" => 10,
        "nov" | "november" => 11,
        "dec" | "december" => 12,
        _ => return None,
    };
    Some(month)
}
