//! Collecting-society CSV statement parser.
//!
//! The society shipped at least four header generations: legacy German
//! columns with comma decimals, and the current English machine-readable
//! columns with period decimals, each in detail/compact/summary variants.
//! All of them funnel through one header→field table plus cascading
//! per-field resolution, so a mixed folder of statements imports uniformly.

use std::collections::HashMap;

use regex::Regex;

use royalacta_core::category::{
    abbreviation_for_code, category_group_for, role_for_professional_category, role_for_role_code,
    role_for_text,
};
use royalacta_core::numeric::{
    content_hash_id, now_millis, parse_number, parse_share_fraction, strip_bom, DecimalStyle,
};
use royalacta_core::{ImportedStatement, RoyaltyEntry, StatementFormat};

use crate::error::ParseError;

// ---------------------------------------------------------------------------
// Header → field table
// ---------------------------------------------------------------------------

/// Internal field a CSV column feeds. One enum for all schema generations;
/// resolution cascades below decide which field wins when several are
/// present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Field {
    WorkNumber,
    WorkVersionNumber,
    VersionNumber,
    WorkTitle,
    Role,
    ProfessionalCategory,
    Share,
    SharePercent,
    ShareNumerator,
    ShareDenominator,
    ShareKind,
    Category,
    CategoryCodeLegacy,
    CategoryAbbrevLegacy,
    CategoryGroupLegacy,
    CategoryCode,
    CategoryAbbreviation,
    SegmentGroup,
    DistributionCategory,
    UsageCount,
    UsageCountPerformances,
    UsageCountBroadcasts,
    Amount,
    AmountBooked,
    AmountAlt,
    AmountDelta,
    AmountDefaultSupplement,
    AmountOtherSupplements,
    AmountUnallocated,
    CommissionAmount,
    CommissionRate,
    LicenseValue,
    Licensee,
    Broadcaster,
    CatalogNumber,
    StreamingSubscription,
    FiscalYear,
    UsageYear,
    StatementNumber,
    StatementDate,
    PayoutDate,
    DistributionPeriod,
    DistributionNumber,
    DateOfUseFrom,
    DateOfUseUntil,
    QuarterFrom,
    QuarterUntil,
    DistributionType,
    DistributionCode,
    DebitCredit,
    RevenueType,
    SalesTypeRaw,
    SupplementType,
    Composer,
    Editor,
    Iswc,
    Isrc,
    CarrierCode,
    SalesCountry,
    RepertoireType,
    UsageArea,
    RecordCountCompact,
    RecordCountDetail,
}

/// Map one lower-cased header to its internal field. Covers every column
/// label observed across the legacy German exports and the current English
/// generation (detail, compact and summary variants of both).
fn canonical_field(header: &str) -> Option<Field> {
    use Field::*;
    let field = match header {
        // Work number
        "werk-nr." | "werknummer" | "werknr" | "werk-nr" | "werkfassungsnummer" | "werk"
        | "work_number" => WorkNumber,
        // Combined "123456-001" of the current detail formats
        "work_version_number" => WorkVersionNumber,
        // Version as a separate field
        "fas" | "fassung" | "fassungsnummer" | "version_number" => VersionNumber,
        // Title
        "werktitel" | "werkfassungstitel" | "titel" | "work title" | "titel des werkes"
        | "work_version_titel" => WorkTitle,
        // Role
        "rolle" | "role" | "beteiligtenrolle" | "rol" | "rolle_didas" => Role,
        "berufsgruppe" | "professional_category" => ProfessionalCategory,
        // Share
        "anteil" | "share" => Share,
        "anteil prozent" | "percentage" => SharePercent,
        "zaehler" | "u_zaehler" => ShareNumerator,
        "nenner" | "u_nenner" => ShareDenominator,
        "anteilart" | "ant" => ShareKind,
        // Category
        "sparte" | "bezeichnung abrechnungssparte" | "abrechnungssparte" | "category"
        | "verteilungssparte" => Category,
        "spartennummer" | "spartencode" => CategoryCodeLegacy,
        "spartenkürzel" => CategoryAbbrevLegacy,
        "spartengruppe" => CategoryGroupLegacy,
        "category_code" => CategoryCode,
        "category_abbreviation" => CategoryAbbreviation,
        "segment_group" => SegmentGroup,
        "distribution_category" | "verteilungskategorie" => DistributionCategory,
        // Usage counts
        "nutzungsanzahl" | "usage count" | "nutzungen" | "menge/anzahl" | "quantity" => UsageCount,
        "anzahl aufführungen" | "number_of_performances" => UsageCountPerformances,
        "anzahl ausstrahlungen" | "number_of_broadcasts" => UsageCountBroadcasts,
        // Amounts
        "betrag" | "betrag (brutto)" | "netto-betrag" | "nettobetrag" | "amount"
        | "abrechnungsbetrag" | "ausschuettungsbetrag" | "ausschüttungsbetrag" | "u_betrag"
        | "neu-eur" | "gross_amount" => Amount,
        "betrag gebucht" | "booked_amount" => AmountBooked,
        "alt-eur" => AmountAlt,
        "delta-eur" => AmountDelta,
        "betrag ausfallzuschlag" => AmountDefaultSupplement,
        "betrag sonstige zuschläge" | "amount_other_supplements" => AmountOtherSupplements,
        "betrag nicht programmbelegter anteil" | "amount_unallocated_royalties" => {
            AmountUnallocated
        }
        "kommissionsbetrag" | "commission_amount" => CommissionAmount,
        "kommissionssatz in %" | "commission_rate_in_prc" => CommissionRate,
        "lizenzwert in euro" => LicenseValue,
        // Platform / licensee / broadcaster
        "nutzer" | "sendeanstalt" | "sender" | "plattform" | "lizenznehmer" | "user"
        | "licensee" => Licensee,
        "broadcaster" => Broadcaster,
        "katalognummer" | "catalogue_number" => CatalogNumber,
        "art des streaming-abos" | "type_of_streaming_subscription" => StreamingSubscription,
        // Fiscal year
        "geschäftsjahr" | "geschaeftsjahr" | "gj" | "fiscal year" | "jahr" => FiscalYear,
        "nutzungsjahr" | "year_of_use" => UsageYear,
        // Statement identity
        "abrechnungsnummer" | "abrechnungs-nr." | "abrenr" | "statement_number" => StatementNumber,
        "abre_datum_alt" | "datum der urspruenglichen abrechnung" | "abrechnungsdatum" => {
            StatementDate
        }
        "payout_date" => PayoutDate,
        // Distribution period
        "verteilungstermin" | "ausschüttungstermin" | "vtl-bez" | "period" => DistributionPeriod,
        "vtl-nr" => DistributionNumber,
        "nutzungsdatum von" | "date_of_use_from" => DateOfUseFrom,
        "nutzungsdatum bis" | "date_of_use_until" => DateOfUseUntil,
        "quartal von" | "quarter_from" => QuarterFrom,
        "quartal bis" | "quarter_until" => QuarterUntil,
        // Distribution / revenue classifiers
        "verteilungsart" | "verteilart" | "distribution_type" => DistributionType,
        "distribution_code" => DistributionCode,
        "rück-/nachverrechnung" | "debit_credit_adjustment" => DebitCredit,
        "aufkommensart" | "revenue_type" => RevenueType,
        "umsatzart" => SalesTypeRaw,
        "zuschlagsart" => SupplementType,
        // Participants
        "komponist(en)" | "composer" => Composer,
        "bearbeiter" | "editor" => Editor,
        // Identifiers and misc
        "iswc" => Iswc,
        "isrc" | "identifikator" => Isrc,
        "trägerart" | "carrier_code" => CarrierCode,
        "verkaufsland" | "sales_country" => SalesCountry,
        "repertoire typ" | "type_of_repertoire" => RepertoireType,
        // Summary sheet
        "nutzungsbereich" | "usage_area" => UsageArea,
        "satzzahl in kompaktaufstellung" | "record_count_in_compact_statement" => {
            RecordCountCompact
        }
        "satzzahl in kombinierter aufstellung" | "satzzahl in detailaufstellungen"
        | "record_count_in_detailed_statement" => RecordCountDetail,
        _ => return None,
    };
    Some(field)
}

// ---------------------------------------------------------------------------
// Generation / variant detection
// ---------------------------------------------------------------------------

/// Headers unique to the current (English, machine-readable) generation.
/// Their presence switches the numeric parser to period decimals.
fn is_current_generation(headers: &[String]) -> bool {
    headers.iter().any(|h| {
        matches!(
            h.as_str(),
            "payout_date"
                | "booked_amount"
                | "work_version_number"
                | "work_version_titel"
                | "segment_group"
                | "category_code"
        )
    })
}

fn detect_variant(headers: &[String]) -> StatementFormat {
    let has = |name: &str| headers.iter().any(|h| h == name);

    // Current generation first: its marker columns are unambiguous.
    if has("usage_area") || has("record_count_in_compact_statement") || has("nutzungsbereich") {
        return StatementFormat::Summary;
    }
    if has("category_code") || has("category_abbreviation") {
        return StatementFormat::Compact;
    }
    if has("segment_group") && has("distribution_category") {
        return StatementFormat::Detail;
    }

    // Legacy generation.
    if has("satzzahl in kompaktaufstellung") || has("satzzahl in detailaufstellungen") {
        return StatementFormat::Summary;
    }
    if has("spartencode") || has("spartenkürzel") {
        return StatementFormat::Compact;
    }
    if has("spartengruppe") || has("verdichtungsnummer") {
        return StatementFormat::Detail;
    }
    if has("nutzer") || has("sendeanstalt") || has("nutzungsanzahl") {
        return StatementFormat::Detail;
    }
    if has("werknummer") || has("werk-nr.") || has("werktitel") {
        return StatementFormat::Compact;
    }
    StatementFormat::Summary
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct SocietyCsvResult {
    pub entries: Vec<RoyaltyEntry>,
    pub statement: ImportedStatement,
}

/// Regexes used per row, compiled once per file.
struct RowPatterns {
    paren_code: Regex,
    colon_code: Regex,
    abo_qualifier: Regex,
    corporate_suffix: Regex,
    music_suffix: Regex,
}

impl RowPatterns {
    fn new() -> Self {
        Self {
            // "Music on Demand Streaming (MOD S)" → "MOD S"
            paren_code: Regex::new(r"\(([^)]+)\)\s*$").unwrap(),
            // "MOD S: Music on Demand Streaming" → "MOD S"
            colon_code: Regex::new(r"^([^:]+):").unwrap(),
            // "Premium_HIFI-Family" style subscription qualifiers
            abo_qualifier: Regex::new(r"(?i)[_-](HIFI|normal|premium|free|family).*$").unwrap(),
            corporate_suffix: Regex::new(
                r"(?i)\s+(AS|SA|GmbH|Inc|Ltd|LLC|SE|AG|B\.V\.|BV|AB|Oy|S\.A\.|SAS|S\.r\.l\.)\.?\s*$",
            )
            .unwrap(),
            music_suffix: Regex::new(r"(?i)\s+Music\s*$").unwrap(),
        }
    }
}

/// Parse one society CSV statement (already decoded to UTF-8).
pub fn parse_society_csv(content: &str, file_name: &str) -> Result<SocietyCsvResult, ParseError> {
    let content = strip_bom(content);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ParseError::Io(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(ParseError::NoHeader);
    }

    let columns: Vec<Option<Field>> = headers.iter().map(|h| canonical_field(h)).collect();
    let variant = detect_variant(&headers);
    let style = if is_current_generation(&headers) {
        DecimalStyle::Period
    } else {
        DecimalStyle::Comma
    };

    let patterns = RowPatterns::new();
    let now = now_millis();
    let mut warnings = Vec::new();
    let mut mismatched_rows = 0usize;

    // First non-empty value seen wins; later rows inherit it when blank.
    let mut fiscal_year = String::new();
    let mut distribution_period = String::new();

    let mut entries: Vec<RoyaltyEntry> = Vec::new();

    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(_) => {
                mismatched_rows += 1;
                continue;
            }
        };
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        if record.len() != headers.len() {
            mismatched_rows += 1;
        }

        let mut mapped: HashMap<Field, &str> = HashMap::new();
        for (idx, field) in columns.iter().enumerate() {
            if let Some(field) = field {
                let value = record.get(idx).unwrap_or("").trim();
                if !value.is_empty() {
                    mapped.insert(*field, value);
                }
            }
        }
        let get = |f: Field| -> &str { mapped.get(&f).copied().unwrap_or("") };

        // Rows without a work number and without an amount are section
        // headers or carry-over totals.
        let has_amount = !get(Field::AmountBooked).is_empty() || !get(Field::Amount).is_empty();
        if get(Field::WorkNumber).is_empty()
            && get(Field::WorkVersionNumber).is_empty()
            && !has_amount
        {
            continue;
        }

        // Work number: the current detail formats ship "123456-001"
        // pre-combined; everywhere else number and version are separate and
        // the version is zero-padded to three digits.
        let work_number = {
            let combined = get(Field::WorkVersionNumber).trim_matches('"').trim();
            if !combined.is_empty() {
                combined.to_string()
            } else {
                let base = get(Field::WorkNumber).trim_matches('"').trim();
                let version = get(Field::VersionNumber).trim_matches('"').trim();
                if !base.is_empty() && !version.is_empty() && !base.contains('-') {
                    format!("{base}-{version:0>3}")
                } else {
                    base.to_string()
                }
            }
        };

        let work_title = {
            let t = get(Field::WorkTitle);
            if t.is_empty() { "Unbekannt" } else { t }.to_string()
        };

        // Role: numeric professional category (compact), numeric role code
        // (detail), legacy German text, then the raw value, default composer.
        let prof_cat = get(Field::ProfessionalCategory);
        let role_raw = get(Field::Role);
        let role = role_for_professional_category(prof_cat)
            .or_else(|| role_for_role_code(role_raw))
            .or_else(|| role_for_text(role_raw))
            .map(str::to_string)
            .unwrap_or_else(|| {
                if role_raw.is_empty() {
                    "K".to_string()
                } else {
                    role_raw.to_string()
                }
            });

        // Share: explicit percentage beats the fraction field beats a
        // numerator/denominator pair; otherwise the row is a full share.
        let percent = get(Field::SharePercent);
        let share = get(Field::Share);
        let numerator = get(Field::ShareNumerator);
        let denominator = get(Field::ShareDenominator);
        let (share_raw, share_decimal) = if !percent.is_empty() {
            let pct = parse_number(percent, style);
            let decimal = if pct > 0.0 { pct / 100.0 } else { 1.0 };
            (format!("{pct}%"), decimal)
        } else if !share.is_empty() {
            (share.to_string(), parse_share_fraction(share))
        } else if !numerator.is_empty() && !denominator.is_empty() {
            let raw = format!("{numerator}/{denominator}");
            let decimal = parse_share_fraction(&raw);
            (raw, decimal)
        } else {
            ("100%".to_string(), 1.0)
        };

        // Category: compact abbreviation, compact numeric code,
        // distribution category text, legacy abbreviation, legacy code,
        // then a code extracted from the long description.
        let category_abbr = get(Field::CategoryAbbreviation);
        let category_code_v2 = get(Field::CategoryCode);
        let dist_category = get(Field::DistributionCategory);
        let legacy_abbr = get(Field::CategoryAbbrevLegacy).trim_matches('"').trim();
        let legacy_code = get(Field::CategoryCodeLegacy).trim_matches('"').trim();
        let description = get(Field::Category);

        let (display, mapping_key) = if !category_abbr.is_empty() {
            (category_abbr.to_string(), category_abbr.to_string())
        } else if let Some(abbr) = abbreviation_for_code(category_code_v2) {
            (abbr.to_string(), category_code_v2.to_string())
        } else if !dist_category.is_empty() {
            (dist_category.to_string(), dist_category.to_string())
        } else if !legacy_abbr.is_empty() {
            (legacy_abbr.to_string(), legacy_abbr.to_string())
        } else if !legacy_code.is_empty() {
            let abbr = abbreviation_for_code(legacy_code).unwrap_or(legacy_code);
            (abbr.to_string(), legacy_code.to_string())
        } else if !description.is_empty() {
            let extracted = patterns
                .paren_code
                .captures(description)
                .or_else(|| patterns.colon_code.captures(description))
                .map(|c| c[1].trim().to_string())
                .unwrap_or_else(|| description.to_string());
            (extracted.clone(), extracted)
        } else {
            (String::new(), String::new())
        };
        let category_code = if display.is_empty() { mapping_key.clone() } else { display };
        let category_group = category_group_for(if mapping_key.is_empty() {
            &category_code
        } else {
            &mapping_key
        });

        // Amount: booked amount (final, supplements included) beats the base
        // amount.
        let booked = get(Field::AmountBooked);
        let amount_raw = if !booked.is_empty() {
            booked.to_string()
        } else {
            let base = get(Field::Amount);
            if base.is_empty() { "0" } else { base }.to_string()
        };
        let amount = parse_number(&amount_raw, style);

        // Platform: broadcaster beats licensee; catalogue number or
        // subscription label gives a friendlier name when present.
        let licensee = get(Field::Licensee);
        let sender = get(Field::Broadcaster);
        let platform_name = clean_platform_name(
            if sender.is_empty() { licensee } else { sender },
            get(Field::CatalogNumber),
            get(Field::StreamingSubscription),
            &patterns,
        );

        let usage_str = [
            Field::UsageCount,
            Field::UsageCountPerformances,
            Field::UsageCountBroadcasts,
        ]
        .into_iter()
        .map(get)
        .find(|v| !v.is_empty())
        .unwrap_or("0");
        let usage_count = parse_number(usage_str, style).max(0.0).round() as u64;

        // Year: explicit year fields, then usage date, payout date, original
        // statement date.
        let payout_date = get(Field::PayoutDate);
        let date_of_use = get(Field::DateOfUseFrom);
        let statement_date = get(Field::StatementDate);
        let mut year = {
            let explicit = get(Field::UsageYear);
            if explicit.is_empty() { get(Field::FiscalYear) } else { explicit }.to_string()
        };
        for candidate in [date_of_use, payout_date, statement_date] {
            if !year.is_empty() {
                break;
            }
            if candidate.chars().count() >= 4 {
                year = extract_year(candidate);
            }
        }

        let mut period = get(Field::DistributionPeriod).to_string();
        if period.is_empty() && !payout_date.is_empty() {
            period = payout_date.chars().take(7).collect();
        }

        if !year.is_empty() && fiscal_year.is_empty() {
            fiscal_year = year.clone();
        }
        if !period.is_empty() && distribution_period.is_empty() {
            distribution_period = period.clone();
        }

        let entry_year = if year.is_empty() { fiscal_year.clone() } else { year };
        let entry_period = if period.is_empty() {
            distribution_period.clone()
        } else {
            period
        };
        let period_key = if entry_year.is_empty() { &entry_period } else { &entry_year };

        entries.push(RoyaltyEntry {
            id: content_hash_id(&[
                &work_number,
                &category_code,
                &platform_name,
                period_key,
                &amount_raw,
            ]),
            work_number,
            work_title,
            role,
            share_raw,
            share_decimal,
            category_code,
            category_group,
            usage_count,
            amount,
            amount_raw,
            platform_name,
            fiscal_year: entry_year,
            distribution_period: entry_period,
            source_file: file_name.to_string(),
            imported_at: now,
        });
    }

    if mismatched_rows > 0 {
        warnings.push(format!("{mismatched_rows} Zeilen mit Feldabweichungen"));
    }
    if entries.is_empty() {
        warnings.push("Keine gültigen Einträge gefunden".to_string());
    }

    let total_amount: f64 = entries.iter().map(|e| e.amount).sum();
    let statement = ImportedStatement {
        id: format!("csv_{now}_{file_name}"),
        file_name: file_name.to_string(),
        file_type: "csv".to_string(),
        format_variant: variant,
        fiscal_year: if fiscal_year.is_empty() {
            "Unbekannt".to_string()
        } else {
            fiscal_year.clone()
        },
        distribution_period: if distribution_period.is_empty() {
            if fiscal_year.is_empty() {
                "Unbekannt".to_string()
            } else {
                fiscal_year
            }
        } else {
            distribution_period
        },
        entry_count: entries.len(),
        total_amount,
        warnings,
        imported_at: now,
    };

    Ok(SocietyCsvResult { entries, statement })
}

/// Reduce a licensee/broadcaster cell to a friendly platform name. A
/// catalogue number or subscription label wins over the legal entity name;
/// corporate suffixes come off either way.
fn clean_platform_name(
    licensee: &str,
    catalog: &str,
    subscription: &str,
    patterns: &RowPatterns,
) -> String {
    let friendly = if catalog.is_empty() { subscription } else { catalog };
    if !friendly.is_empty() {
        let trimmed = friendly.trim_end_matches('-');
        let cleaned = patterns.abo_qualifier.replace(trimmed, "");
        let cleaned = cleaned.trim();
        if !cleaned.is_empty() {
            return cleaned.to_string();
        }
    }
    let stripped = patterns.corporate_suffix.replace(licensee, "");
    let stripped = patterns.music_suffix.replace(&stripped, "");
    stripped.trim().to_string()
}

/// Pull a four-digit year out of "YYYY-MM-DD", "DD.MM.YYYY" or a bare year.
fn extract_year(date: &str) -> String {
    let chars: Vec<char> = date.chars().collect();
    if chars.len() >= 5
        && chars[..4].iter().all(|c| c.is_ascii_digit())
        && (chars[4] == '-' || chars[4] == '/')
    {
        return chars[..4].iter().collect();
    }
    if chars.len() >= 4 && chars[chars.len() - 4..].iter().all(|c| c.is_ascii_digit()) {
        return chars[chars.len() - 4..].iter().collect();
    }
    chars.iter().take(4).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use royalacta_core::CategoryGroup;

    fn parse(content: &str) -> SocietyCsvResult {
        parse_society_csv(content, "test.csv").unwrap()
    }

    #[test]
    fn legacy_detail_german_headers() {
        let csv = "\u{feff}Werk-Nr.;Werktitel;Rolle;Anteil;Sparte;Nutzungsanzahl;Betrag;Nutzer;Geschäftsjahr\n\
                   1234567;Mein Lied;Komponist;5/12;Music on Demand Streaming (MOD S);1500;1.234,56;Spotify AB;2023\n";
        let result = parse(csv);
        assert_eq!(result.statement.format_variant, StatementFormat::Detail);
        assert_eq!(result.entries.len(), 1);

        let e = &result.entries[0];
        assert_eq!(e.work_number, "1234567");
        assert_eq!(e.work_title, "Mein Lied");
        assert_eq!(e.role, "K");
        assert!((e.share_decimal - 5.0 / 12.0).abs() < 1e-9);
        assert_eq!(e.category_code, "MOD S");
        assert_eq!(e.category_group, CategoryGroup::Streaming);
        assert_eq!(e.usage_count, 1500);
        assert_eq!(e.amount, 1234.56);
        // Corporate suffix stripped.
        assert_eq!(e.platform_name, "Spotify");
        assert_eq!(e.fiscal_year, "2023");
        assert_eq!(result.statement.fiscal_year, "2023");
    }

    #[test]
    fn current_compact_english_headers() {
        let csv = "work_number;version_number;work_version_titel;professional_category;percentage;category_code;quantity;booked_amount;payout_date\n\
                   123456;1;Titel X;1;41.6666666667;12;100;12.3456;2025-06-15\n";
        let result = parse(csv);
        assert_eq!(result.statement.format_variant, StatementFormat::Compact);

        let e = &result.entries[0];
        // Version zero-padded and concatenated.
        assert_eq!(e.work_number, "123456-001");
        assert_eq!(e.role, "K");
        assert!((e.share_decimal - 0.416666666667).abs() < 1e-9);
        // Numeric category code resolved to its abbreviation.
        assert_eq!(e.category_code, "MOD S");
        assert_eq!(e.category_group, CategoryGroup::Streaming);
        // Period decimals: "12.3456" is a decimal, not thousands grouping.
        assert_eq!(e.amount, 12.3456);
        assert_eq!(e.fiscal_year, "2025");
        assert_eq!(e.distribution_period, "2025-06");
        assert_eq!(result.statement.distribution_period, "2025-06");
    }

    #[test]
    fn booked_amount_beats_base_amount() {
        let csv = "work_number;work_version_titel;amount;booked_amount;category_code\n\
                   111111;T;10.0;12.5;12\n";
        let result = parse(csv);
        assert_eq!(result.entries[0].amount, 12.5);
        assert_eq!(result.entries[0].amount_raw, "12.5");
    }

    #[test]
    fn rows_without_work_number_and_amount_are_skipped() {
        let csv = "Werk-Nr.;Werktitel;Betrag\n\
                   ;Zwischensumme Online;\n\
                   7654321;Lied;0,42\n";
        let result = parse(csv);
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].work_number, "7654321");
    }

    #[test]
    fn short_rows_are_counted_as_field_mismatches() {
        // One row with fewer columns than the header: parsing continues,
        // valid rows survive, and the statement carries a mismatch warning.
        let csv = "Werk-Nr.;Werktitel;Betrag\n\
                   1111111;A;1,00\n\
                   2222222;B;2,00\n\
                   ;Zwischensumme\n\
                   3333333;C;3,00\n";
        let result = parse(csv);
        assert_eq!(result.entries.len(), 3);
        assert!(result
            .statement
            .warnings
            .iter()
            .any(|w| w == "1 Zeilen mit Feldabweichungen"));
    }

    #[test]
    fn summary_sheet_yields_no_entries_but_no_error() {
        let csv = "usage_area;record_count_in_compact_statement\nOnline;431\n";
        let result = parse(csv);
        assert_eq!(result.statement.format_variant, StatementFormat::Summary);
        assert!(result.entries.is_empty());
        assert!(result
            .statement
            .warnings
            .iter()
            .any(|w| w.contains("Keine gültigen Einträge")));
    }

    #[test]
    fn missing_header_is_fatal() {
        assert_eq!(
            parse_society_csv("", "empty.csv").unwrap_err(),
            ParseError::NoHeader
        );
    }

    #[test]
    fn subscription_label_wins_over_licensee() {
        let csv = "Werk-Nr.;Betrag;Lizenznehmer;Art des Streaming-Abos\n\
                   2222222;1,00;Some Legal Entity GmbH;Tidal_HIFI-Family\n";
        let result = parse(csv);
        assert_eq!(result.entries[0].platform_name, "Tidal");
    }

    #[test]
    fn numerator_denominator_pair_builds_fraction() {
        let csv = "Werk-Nr.;Betrag;Zaehler;Nenner\n3333333;5,00;5;12\n";
        let e = &parse(csv).entries[0];
        assert_eq!(e.share_raw, "5/12");
        assert!((e.share_decimal - 5.0 / 12.0).abs() < 1e-9);
    }
}
