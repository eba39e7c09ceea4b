//! Route an uploaded file to the right parser before reading it in full.
//!
//! Extension and MIME settle most cases; `.csv`/`.txt` is ambiguous because
//! both the society and some distributors ship it, so those are decided from
//! the first header line.

/// Which parser a file should be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    SocietyCsv,
    SocietyPdf,
    DistributorSheet,
}

/// Decide the parser for a file from its name, MIME type and (for ambiguous
/// text files) the first line. Unknown extensions default to the society CSV
/// path; its own header validation fails loudly if that guess was wrong.
pub fn detect_format(file_name: &str, mime: &str, first_line: Option<&str>) -> FileKind {
    let lower = file_name.to_lowercase();
    let ext = lower.rsplit('.').next().unwrap_or("");

    if ext == "pdf" || mime == "application/pdf" {
        return FileKind::SocietyPdf;
    }
    // The society never ships spreadsheet containers or TSV.
    if matches!(ext, "xlsx" | "xls" | "tsv") {
        return FileKind::DistributorSheet;
    }

    if let Some(line) = first_line {
        if is_distributor_header(&tokenize_header(line)) {
            return FileKind::DistributorSheet;
        }
    }

    FileKind::SocietyCsv
}

/// Split a header line on comma/semicolon/tab, stripping quotes and case.
pub fn tokenize_header(line: &str) -> Vec<String> {
    line.split(|c| c == ',' || c == ';' || c == '\t')
        .map(|t| t.trim().trim_matches('"').trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Does this header row look like a distributor report rather than a society
/// statement? Society markers veto first; otherwise require at least two
/// distributor markers, since single words like "store" appear in too many
/// contexts.
pub fn is_distributor_header(tokens: &[String]) -> bool {
    const SOCIETY_MARKERS: &[&str] = &[
        "spartencode",
        "werknummer",
        "werktitel",
        "sparte",
        "category_code",
        "work_number",
    ];
    if SOCIETY_MARKERS
        .iter()
        .any(|m| tokens.iter().any(|t| t.contains(m)))
    {
        return false;
    }

    const DISTRIBUTOR_MARKERS: &[&str] = &[
        "retailer",
        "store",
        "store name",
        "channel",
        "earnings",
        "net amount",
        "payable",
    ];
    let matches = DISTRIBUTOR_MARKERS
        .iter()
        .filter(|m| tokens.iter().any(|t| t.contains(*m)))
        .count();
    matches >= 2
}
