use std::fmt;

/// Structural parse failures. Each one aborts the affected file; user-facing
/// messages are German, matching the product surface. Row-level anomalies are
/// never errors; they aggregate into statement warnings instead.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// CSV with no header row (or an all-blank one).
    NoHeader,
    /// Workbook without any sheet.
    Empty,
    /// Sheet with a header but zero data rows.
    NoDataRows,
    /// No vendor profile scored high enough and generic detection failed.
    UnknownDialect,
    /// Every row was filtered out (distributor files reject this; society
    /// files downgrade it to a warning).
    NoValidEntries,
    /// PDF bytes could not be loaded or decoded.
    Pdf(String),
    Io(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::NoHeader => write!(f, "CSV enthält keine Spaltenüberschriften"),
            ParseError::Empty => write!(f, "Die Datei enthält keine Daten."),
            ParseError::NoDataRows => write!(f, "Die Datei enthält keine Datenzeilen."),
            ParseError::UnknownDialect => write!(
                f,
                "Unbekanntes Distributor-Format. Erwartete Spalten wie \"Retailer\", \
                 \"Quantity\", \"Earnings\" wurden nicht gefunden."
            ),
            ParseError::NoValidEntries => {
                write!(f, "Keine gültigen Einträge in der Datei gefunden.")
            }
            ParseError::Pdf(msg) => write!(f, "PDF konnte nicht gelesen werden: {msg}"),
            ParseError::Io(msg) => write!(f, "Datei konnte nicht gelesen werden: {msg}"),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<std::io::Error> for ParseError {
    fn from(e: std::io::Error) -> Self {
        ParseError::Io(e.to_string())
    }
}
