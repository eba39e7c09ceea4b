//! Collecting-society PDF statement parser.
//!
//! PDF statements have no fixed grid, so extraction is layout-free: collect
//! positioned text fragments from each page's content stream, rebuild lines
//! by y-coordinate, then recover fields per line with regexes. Labeled
//! header lines (category, platform, fiscal year, distribution date) update
//! running context that applies to the data lines below them.

use lopdf::content::Content;
use lopdf::{Document, Object};
use regex::Regex;

use royalacta_core::category::category_group_for;
use royalacta_core::numeric::{
    content_hash_id, now_millis, parse_number, parse_share_fraction, DecimalStyle,
};
use royalacta_core::{ImportedStatement, RoyaltyEntry, StatementFormat};

use crate::error::ParseError;

#[derive(Debug)]
pub struct SocietyPdfResult {
    pub entries: Vec<RoyaltyEntry>,
    pub statement: ImportedStatement,
}

/// Parse one society PDF statement from its raw bytes.
pub fn parse_society_pdf(bytes: &[u8], file_name: &str) -> Result<SocietyPdfResult, ParseError> {
    let doc = Document::load_mem(bytes).map_err(|e| ParseError::Pdf(e.to_string()))?;
    let pages = extract_page_lines(&doc)?;
    Ok(parse_lines(&pages, file_name))
}

// ---------------------------------------------------------------------------
// Text extraction
// ---------------------------------------------------------------------------

struct Fragment {
    x: f32,
    y: f32,
    text: String,
}

/// Walk every page's decoded content stream and rebuild visual lines.
///
/// The text cursor is tracked through `BT`/`Tm`/`Td`/`TD`/`TL`/`T*`;
/// `Tj`/`'`/`"`/`TJ` emit fragments at the current position. Fragments
/// whose y differs by less than the bucket size (3 units) belong to one
/// line; lines are ordered top-to-bottom (PDF y grows upward), fragments
/// left-to-right.
fn extract_page_lines(doc: &Document) -> Result<Vec<Vec<String>>, ParseError> {
    let mut pages = Vec::new();

    for (_, page_id) in doc.get_pages() {
        let data = doc
            .get_page_content(page_id)
            .map_err(|e| ParseError::Pdf(e.to_string()))?;
        let content = Content::decode(&data).map_err(|e| ParseError::Pdf(e.to_string()))?;

        let mut fragments: Vec<Fragment> = Vec::new();
        let mut x = 0.0f32;
        let mut y = 0.0f32;
        let mut leading = 0.0f32;

        for op in &content.operations {
            let operand = |i: usize| op.operands.get(i);
            match op.operator.as_str() {
                "BT" => {
                    x = 0.0;
                    y = 0.0;
                }
                "Tm" => {
                    x = number(operand(4));
                    y = number(operand(5));
                }
                "Td" => {
                    x += number(operand(0));
                    y += number(operand(1));
                }
                "TD" => {
                    let ty = number(operand(1));
                    x += number(operand(0));
                    y += ty;
                    leading = -ty;
                }
                "TL" => leading = number(operand(0)),
                "T*" => y -= leading,
                "Tj" => push_string(&mut fragments, operand(0), x, y),
                "'" => {
                    y -= leading;
                    push_string(&mut fragments, operand(0), x, y);
                }
                "\"" => {
                    y -= leading;
                    push_string(&mut fragments, operand(2), x, y);
                }
                "TJ" => {
                    if let Some(Object::Array(parts)) = operand(0) {
                        let text: String = parts
                            .iter()
                            .filter_map(|p| match p {
                                Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
                                _ => None,
                            })
                            .collect();
                        if !text.trim().is_empty() {
                            fragments.push(Fragment { x, y, text });
                        }
                    }
                }
                _ => {}
            }
        }

        pages.push(assemble_lines(fragments));
    }

    Ok(pages)
}

fn number(operand: Option<&Object>) -> f32 {
    match operand {
        Some(Object::Integer(i)) => *i as f32,
        Some(Object::Real(r)) => *r,
        _ => 0.0,
    }
}

fn push_string(fragments: &mut Vec<Fragment>, operand: Option<&Object>, x: f32, y: f32) {
    if let Some(Object::String(bytes, _)) = operand {
        let text = decode_pdf_string(bytes);
        if !text.trim().is_empty() {
            fragments.push(Fragment { x, y, text });
        }
    }
}

/// UTF-16BE when BOM-prefixed, Latin-1 otherwise. Close enough to
/// PDFDocEncoding for the printable range these statements use.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}

/// Bucket fragments into lines by y (tolerance 3 units), top-to-bottom,
/// fragments joined left-to-right with single spaces.
fn assemble_lines(fragments: Vec<Fragment>) -> Vec<String> {
    let mut buckets: std::collections::BTreeMap<i64, Vec<Fragment>> =
        std::collections::BTreeMap::new();
    for fragment in fragments {
        let key = (fragment.y / 3.0).round() as i64;
        buckets.entry(key).or_default().push(fragment);
    }

    buckets
        .into_iter()
        .rev()
        .map(|(_, mut line)| {
            line.sort_by(|a, b| a.x.total_cmp(&b.x));
            line.iter()
                .map(|f| f.text.trim())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Line parsing
// ---------------------------------------------------------------------------

struct LinePatterns {
    work_number: Regex,
    amount: Regex,
    share: Regex,
    role: Regex,
    category: Regex,
    year: Regex,
    german_date: Regex,
    fiscal_label: Regex,
    distribution_label: Regex,
    platform_label: Regex,
    whitespace: Regex,
}

impl LinePatterns {
    fn new() -> Self {
        Self {
            work_number: Regex::new(r"(\d{5,9}(?:-\d{1,3})?)").unwrap(),
            // German-grouped amount, optional trailing EUR
            amount: Regex::new(r"(-?\d{1,3}(?:\.\d{3})*,\d{2,10})\s*(?:EUR)?").unwrap(),
            share: Regex::new(r"(\d{1,2}\s*/\s*12)").unwrap(),
            role: Regex::new(r"\b([KTVB])\b").unwrap(),
            category: Regex::new(
                r"(?i)\b(MOD\s*S(?:\s*VR)?|MOD\s*D(?:\s*VR)?|GOP(?:\s*VR)?|VOD\s*[SD](?:\s*VR)?|R(?:\s*VR)?|FS(?:\s*VR)?|T(?:\s*FS)?(?:\s*VR)?|TD(?:\s*VR)?|MED(?:\s*VR)?|U|UD|E|ED|EM|BM|KI|DK(?:\s*VR)?|PHONO\s*VR|BT\s*VR|MT\s*VR|GT\s*VR|A(?:\s*AR|\s*VR)?|WEB(?:\s*VR)?|IR|IFS|KMOD(?:\s*VR)?)\b",
            )
            .unwrap(),
            year: Regex::new(r"\b(20\d{2})\b").unwrap(),
            german_date: Regex::new(r"(\d{2}\.\d{2}\.\d{4})").unwrap(),
            fiscal_label: Regex::new(r"(?i)Geschäftsjahr|GJ|Fiscal").unwrap(),
            distribution_label: Regex::new(r"(?i)Ausschüttung|Verteilung|Distribution").unwrap(),
            platform_label: Regex::new(r"(?i)Sendeanstalt|Nutzer|Plattform|Sender").unwrap(),
            whitespace: Regex::new(r"\s+").unwrap(),
        }
    }
}

/// Parse already-assembled page lines. Split from the PDF extraction so the
/// field recovery is testable without constructing documents.
fn parse_lines(pages: &[Vec<String>], file_name: &str) -> SocietyPdfResult {
    let patterns = LinePatterns::new();
    let now = now_millis();

    let mut entries: Vec<RoyaltyEntry> = Vec::new();
    let mut warnings = Vec::new();

    let mut current_category = String::new();
    let mut current_platform = String::new();
    let mut fiscal_year = String::new();
    let mut distribution_period = String::new();

    for page in pages {
        for text in page {
            if let Some(m) = patterns.category.captures(text) {
                current_category = normalize_category(&m[1], &patterns);
            }

            let year = patterns.year.captures(text).map(|c| c[1].to_string());
            if let Some(year) = &year {
                if fiscal_year.is_empty() {
                    fiscal_year = year.clone();
                }
                if patterns.fiscal_label.is_match(text) {
                    fiscal_year = year.clone();
                }
            }
            if patterns.distribution_label.is_match(text) {
                if let Some(date) = patterns.german_date.captures(text) {
                    distribution_period = date[1].to_string();
                } else if let Some(year) = &year {
                    distribution_period = year.clone();
                }
            }
            if patterns.platform_label.is_match(text) {
                if let Some(rest) = text.splitn(2, ':').nth(1) {
                    let rest = rest.trim();
                    if !rest.is_empty() {
                        current_platform = rest.to_string();
                    }
                }
            }

            // A data line needs both a work number and an amount.
            let (work_m, amount_m) = match (
                patterns.work_number.find(text),
                patterns.amount.captures(text),
            ) {
                (Some(w), Some(a)) => (w, a),
                _ => continue,
            };
            let amount_raw = amount_m[1].to_string();
            let amount_full = amount_m.get(0).unwrap();

            // Title: the stretch between work number and amount, minus
            // role/share/category tokens.
            let mut work_title = "Unbekannt".to_string();
            if amount_full.start() > work_m.end() {
                let middle = &text[work_m.end()..amount_full.start()];
                let cleaned = patterns.role.replace(middle, "");
                let cleaned = patterns.share.replace(&cleaned, "");
                let cleaned = patterns.category.replace(&cleaned, "");
                let cleaned = patterns.whitespace.replace_all(&cleaned, " ");
                let cleaned = cleaned.trim();
                if cleaned.chars().count() > 1 {
                    work_title = cleaned.to_string();
                }
            }

            let category_code = patterns
                .category
                .captures(text)
                .map(|c| normalize_category(&c[1], &patterns))
                .unwrap_or_else(|| current_category.clone());
            let role = patterns
                .role
                .captures(text)
                .map(|c| c[1].to_string())
                .unwrap_or_default();
            let share_raw = patterns
                .share
                .captures(text)
                .map(|c| c[1].to_string())
                .unwrap_or_else(|| "12/12".to_string());

            let work_number = work_m.as_str().to_string();
            entries.push(RoyaltyEntry {
                id: content_hash_id(&[
                    &work_number,
                    &category_code,
                    &current_platform,
                    &fiscal_year,
                    &amount_raw,
                ]),
                work_number,
                work_title,
                role,
                share_decimal: parse_share_fraction(&share_raw),
                share_raw,
                category_group: category_group_for(&category_code),
                category_code,
                // Stream/usage counts are absent from PDF statements.
                usage_count: 0,
                amount: parse_number(&amount_raw, DecimalStyle::Comma),
                amount_raw,
                platform_name: current_platform.clone(),
                fiscal_year: fiscal_year.clone(),
                distribution_period: if distribution_period.is_empty() {
                    fiscal_year.clone()
                } else {
                    distribution_period.clone()
                },
                source_file: file_name.to_string(),
                imported_at: now,
            });
        }
    }

    if entries.is_empty() {
        warnings.push("Keine Einträge im PDF erkannt. Möglicherweise unbekanntes Format.".to_string());
    }

    let total_amount: f64 = entries.iter().map(|e| e.amount).sum();
    let statement = ImportedStatement {
        id: format!("pdf_{now}_{file_name}"),
        file_name: file_name.to_string(),
        file_type: "pdf".to_string(),
        format_variant: StatementFormat::PdfStandard,
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

    SocietyPdfResult { entries, statement }
}

fn normalize_category(raw: &str, patterns: &LinePatterns) -> String {
    patterns
        .whitespace
        .replace_all(raw.trim(), " ")
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use royalacta_core::CategoryGroup;

    fn page(lines: &[&str]) -> Vec<Vec<String>> {
        vec![lines.iter().map(|l| l.to_string()).collect()]
    }

    #[test]
    fn context_headers_apply_to_following_data_lines() {
        let pages = page(&[
            "Abrechnung Geschäftsjahr 2023",
            "Ausschüttung zum 01.04.2024",
            "Nutzer: Spotify",
            "Sparte MOD S",
            "1234567 Mein Lied K 5/12 1.234,56 EUR",
        ]);
        let result = parse_lines(&pages, "stmt.pdf");
        assert_eq!(result.entries.len(), 1);

        let e = &result.entries[0];
        assert_eq!(e.work_number, "1234567");
        assert_eq!(e.work_title, "Mein Lied");
        assert_eq!(e.role, "K");
        assert_eq!(e.share_raw, "5/12");
        assert_eq!(e.category_code, "MOD S");
        assert_eq!(e.category_group, CategoryGroup::Streaming);
        assert_eq!(e.amount, 1234.56);
        assert_eq!(e.usage_count, 0);
        assert_eq!(e.platform_name, "Spotify");
        assert_eq!(e.fiscal_year, "2023");
        assert_eq!(e.distribution_period, "01.04.2024");
    }

    #[test]
    fn line_without_amount_is_not_a_data_line() {
        let pages = page(&["1234567 Nur ein Titel ohne Betrag"]);
        let result = parse_lines(&pages, "stmt.pdf");
        assert!(result.entries.is_empty());
        assert!(result.statement.warnings[0].contains("Keine Einträge im PDF"));
    }

    #[test]
    fn defaults_for_missing_role_and_share() {
        let pages = page(&["7654321 Titel 0,42"]);
        let result = parse_lines(&pages, "stmt.pdf");
        let e = &result.entries[0];
        assert_eq!(e.role, "");
        assert_eq!(e.share_raw, "12/12");
        assert_eq!(e.share_decimal, 1.0);
        assert_eq!(e.work_title, "Titel");
    }

    #[test]
    fn negative_correction_amounts() {
        let pages = page(&["1111111 Storno -2.500,00 EUR"]);
        let result = parse_lines(&pages, "stmt.pdf");
        assert_eq!(result.entries[0].amount, -2500.0);
    }

    #[test]
    fn utf16_and_latin1_string_decoding() {
        assert_eq!(decode_pdf_string(&[0xFE, 0xFF, 0x00, 0x41]), "A");
        assert_eq!(decode_pdf_string(b"Musik"), "Musik");
        // Latin-1 umlaut
        assert_eq!(decode_pdf_string(&[0x4D, 0xFC, 0x6E]), "Mün");
    }

    #[test]
    fn fragments_grouped_into_lines_by_y() {
        let fragments = vec![
            Fragment { x: 200.0, y: 700.1, text: "B".into() },
            Fragment { x: 50.0, y: 699.4, text: "A".into() },
            Fragment { x: 50.0, y: 650.0, text: "C".into() },
        ];
        let lines = assemble_lines(fragments);
        assert_eq!(lines, vec!["A B".to_string(), "C".to_string()]);
    }
}
