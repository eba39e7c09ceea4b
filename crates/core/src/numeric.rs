//! Locale-aware numeric parsing and deterministic ID hashing.
//!
//! Every function here is total: unparseable input maps to a defined
//! fallback (0 for amounts/counts, 1 for shares) so a single bad cell can
//! never abort a batch or leak NaN into totals.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{SystemTime, UNIX_EPOCH};

/// Decimal convention of a statement's schema generation.
///
/// Legacy society exports use German locale ("1.234,56"); the current
/// generation uses period decimals ("1234.5678"). Applying the wrong
/// convention corrupts amounts by thousands-separator confusion, so parsers
/// must pick the style from the detected generation, unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimalStyle {
    /// "1.234,56" → 1234.56
    Comma,
    /// "1234.5678" → 1234.5678
    Period,
}

/// Parse a number in the given decimal style. Empty or garbage input → 0.0.
pub fn parse_number(value: &str, style: DecimalStyle) -> f64 {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    let normalized = match style {
        DecimalStyle::Comma => trimmed.replace('.', "").replace(',', "."),
        DecimalStyle::Period => trimmed.to_string(),
    };
    normalized.parse::<f64>().unwrap_or(0.0)
}

/// Parse a share attribution: "n/d" fractions ("5/12") or a bare
/// comma-decimal. Absent, zero-denominator or out-of-(0,1] input → 1.0;
/// share attribution must never silently zero out revenue.
pub fn parse_share_fraction(value: &str) -> f64 {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return 1.0;
    }
    if let Some((num, den)) = split_fraction(trimmed) {
        return if den > 0 { num as f64 / den as f64 } else { 1.0 };
    }
    let decimal = parse_number(trimmed, DecimalStyle::Comma);
    if decimal > 0.0 && decimal <= 1.0 {
        decimal
    } else {
        1.0
    }
}

fn split_fraction(value: &str) -> Option<(u64, u64)> {
    let (left, right) = value.split_once('/')?;
    let num = left.trim().parse::<u64>().ok()?;
    let den = right.trim().parse::<u64>().ok()?;
    Some((num, den))
}

/// Deterministic, order-sensitive content hash plus a millisecond-timestamp
/// suffix for uniqueness across repeated imports of identical content.
///
/// Display-layer key only. The authoritative dedup key is computed by the
/// store from selected entry fields.
pub fn content_hash_id(fields: &[&str]) -> String {
    let mut hasher = DefaultHasher::new();
    for field in fields {
        field.hash(&mut hasher);
    }
    format!("{:016x}_{:x}", hasher.finish(), now_millis())
}

/// Unix milliseconds. Clock-before-epoch degrades to 0.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Remove a leading UTF-8 byte order mark before any further parsing.
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}
