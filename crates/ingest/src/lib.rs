//! `royalacta-ingest` — statement ingestion.
//!
//! Detects what kind of statement a file is (society CSV, society PDF,
//! distributor spreadsheet) and parses it into the shared data model.
//! Parsers are pure byte-in/entries-out; nothing here touches the store or
//! the terminal.

pub mod detect;
pub mod distributor;
pub mod error;
pub mod society_csv;
pub mod society_pdf;

pub use detect::{detect_format, FileKind};
pub use distributor::{parse_distributor, DistributorParseResult};
pub use error::ParseError;
pub use society_csv::{parse_society_csv, SocietyCsvResult};
pub use society_pdf::{parse_society_pdf, SocietyPdfResult};

/// Outcome of parsing one file, whichever side it came from.
#[derive(Debug)]
pub enum ParsedBatch {
    Society(SocietyCsvResult),
    SocietyPdf(SocietyPdfResult),
    Distributor(DistributorParseResult),
}

/// Detect the format of a file and run the matching parser.
pub fn parse_file(bytes: &[u8], file_name: &str, mime: &str) -> Result<ParsedBatch, ParseError> {
    let lower = file_name.to_lowercase();
    let binary = mime == "application/pdf"
        || [".pdf", ".xlsx", ".xls"].iter().any(|ext| lower.ends_with(ext));
    let first_line = if binary { None } else { first_text_line(bytes) };
    match detect_format(file_name, mime, first_line.as_deref()) {
        FileKind::SocietyPdf => parse_society_pdf(bytes, file_name).map(ParsedBatch::SocietyPdf),
        FileKind::DistributorSheet => {
            parse_distributor(bytes, file_name).map(ParsedBatch::Distributor)
        }
        FileKind::SocietyCsv => {
            let content = decode_text(bytes);
            parse_society_csv(&content, file_name).map(ParsedBatch::Society)
        }
    }
}

/// First line of a text file, for header-based format detection. Binary
/// containers (PDF, xlsx) never get here; their extensions decide alone.
fn first_text_line(bytes: &[u8]) -> Option<String> {
    let text = decode_text(bytes);
    text.lines().next().map(|l| l.to_string())
}

/// Decode statement bytes as UTF-8, falling back to Windows-1252 (common
/// for Excel-exported CSVs).
pub(crate) fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_1252_fallback() {
        // "Geschäftsjahr" in Windows-1252: ä = 0xE4
        let bytes = b"Gesch\xe4ftsjahr;Betrag";
        assert_eq!(decode_text(bytes), "Geschäftsjahr;Betrag");
    }

    #[test]
    fn dispatcher_routes_distributor_csv() {
        let csv = "Store,Reporting Date,Quantity,Earnings (USD)\nSpotify,2024-01,10,0.5\n";
        let parsed = parse_file(csv.as_bytes(), "report.csv", "text/csv").unwrap();
        assert!(matches!(parsed, ParsedBatch::Distributor(_)));
    }

    #[test]
    fn dispatcher_routes_society_csv() {
        let csv = "Werk-Nr.;Werktitel;Betrag\n1234567;Lied;1,00\n";
        let parsed = parse_file(csv.as_bytes(), "abrechnung.csv", "text/csv").unwrap();
        assert!(matches!(parsed, ParsedBatch::Society(_)));
    }
}
