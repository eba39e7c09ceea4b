// royalacta CLI - headless royalty statement import and reconciliation

mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use royalacta_ingest::{parse_file, ParsedBatch};
use royalacta_store::persist::JsonFileStore;
use royalacta_store::{ImportOutcome, RoyaltyStore};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE: u8 = 2;
pub const EXIT_IO_ERROR: u8 = 3;
pub const EXIT_PARSE_ERROR: u8 = 4;

#[derive(Parser)]
#[command(name = "royalacta")]
#[command(about = "Royalty statement import and reconciliation")]
#[command(version)]
struct Cli {
    /// State file (default: the platform data directory)
    #[arg(long, global = true, value_name = "FILE")]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import statement files (society CSV/PDF or distributor reports)
    #[command(after_help = "\
Examples:
  royalacta import abrechnung_2024.csv
  royalacta import statement.pdf distrokid_q1.tsv report.xlsx
  royalacta import --state ./demo.json abrechnung.csv")]
    Import {
        /// Files to import; the format of each is detected automatically
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// List imported statements
    Statements,

    /// Remove one imported file and its entries
    Remove {
        /// File name as shown by `statements`
        file: String,
    },

    /// Remove all imported data
    Clear,

    /// Show or set the EUR/USD conversion rate
    Rate {
        /// New rate (EUR per USD); omit to print the current one
        value: Option<f64>,
    },

    /// Reports over the imported data
    Report {
        #[command(subcommand)]
        command: report::ReportCommands,
    },

    /// Write the full state as JSON
    Export {
        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let backend = match cli.state {
        Some(path) => JsonFileStore::new(path),
        None => JsonFileStore::default(),
    };
    let mut store = RoyaltyStore::new(backend);

    let result = match cli.command {
        Commands::Import { files } => cmd_import(&mut store, &files),
        Commands::Statements => cmd_statements(&store),
        Commands::Remove { file } => cmd_remove(&mut store, &file),
        Commands::Clear => {
            store.clear_all();
            println!("all imported data removed");
            Ok(())
        }
        Commands::Rate { value } => cmd_rate(&mut store, value),
        Commands::Report { command } => report::cmd_report(&store, command),
        Commands::Export { output } => cmd_export(&store, output),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO_ERROR, message: msg.into(), hint: None }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self { code: EXIT_PARSE_ERROR, message: msg.into(), hint: None }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }
}

// ============================================================================
// import
// ============================================================================

fn cmd_import(store: &mut RoyaltyStore<JsonFileStore>, files: &[PathBuf]) -> Result<(), CliError> {
    let mut failures = 0usize;

    for path in files {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) => {
                eprintln!("{file_name}: cannot read: {e}");
                failures += 1;
                continue;
            }
        };

        match parse_file(&bytes, &file_name, mime_for(&file_name)) {
            Ok(batch) => report_outcome(&file_name, commit(store, batch)),
            Err(e) => {
                eprintln!("{file_name}: {e}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        Err(CliError::parse(format!("{failures} of {} file(s) failed", files.len())))
    } else {
        Ok(())
    }
}

fn commit(store: &mut RoyaltyStore<JsonFileStore>, batch: ParsedBatch) -> ImportOutcome {
    match batch {
        ParsedBatch::Society(result) => {
            print_warnings(&result.statement.warnings);
            store.add_society_batch(result.entries, result.statement)
        }
        ParsedBatch::SocietyPdf(result) => {
            print_warnings(&result.statement.warnings);
            store.add_society_batch(result.entries, result.statement)
        }
        ParsedBatch::Distributor(result) => {
            print_warnings(&result.statement.warnings);
            store.add_distributor_batch(result.entries, result.statement)
        }
    }
}

fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("note: {warning}");
    }
}

fn report_outcome(file_name: &str, outcome: ImportOutcome) {
    match outcome {
        ImportOutcome::Imported { added, duplicates_skipped } => {
            if duplicates_skipped > 0 {
                println!("{file_name}: {added} entries imported, {duplicates_skipped} duplicates skipped");
            } else {
                println!("{file_name}: {added} entries imported");
            }
        }
        ImportOutcome::DuplicateFile(message) => {
            eprintln!("note: {message}");
        }
    }
}

/// MIME type from the file extension, for format detection. Unknown
/// extensions get an empty string; detection then works off the content.
fn mime_for(file_name: &str) -> &'static str {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".pdf") {
        "application/pdf"
    } else if lower.ends_with(".xlsx") {
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    } else if lower.ends_with(".xls") {
        "application/vnd.ms-excel"
    } else if lower.ends_with(".csv") {
        "text/csv"
    } else if lower.ends_with(".tsv") || lower.ends_with(".txt") {
        "text/tab-separated-values"
    } else {
        ""
    }
}

// ============================================================================
// statements / remove / rate / export
// ============================================================================

fn cmd_statements(store: &RoyaltyStore<JsonFileStore>) -> Result<(), CliError> {
    let statements = store.statements();
    let distributor = store.distributor_statements();
    if statements.is_empty() && distributor.is_empty() {
        println!("no statements imported");
        return Ok(());
    }

    if !statements.is_empty() {
        println!("society statements:");
        for s in statements {
            let period = if s.fiscal_year.is_empty() { &s.distribution_period } else { &s.fiscal_year };
            println!(
                "  {}  [{}]  {} entries  {:.2} EUR  {}",
                s.file_name, s.format_variant, s.entry_count, s.total_amount, period
            );
        }
    }
    if !distributor.is_empty() {
        println!("distributor statements:");
        for s in distributor {
            println!(
                "  {}  [{}]  {} entries  {:.2} USD  {}..{}",
                s.file_name,
                s.distributor_format,
                s.entry_count,
                s.total_amount_usd,
                s.date_range.from,
                s.date_range.to
            );
        }
    }
    Ok(())
}

fn cmd_remove(store: &mut RoyaltyStore<JsonFileStore>, file: &str) -> Result<(), CliError> {
    if store.remove_statement(file) {
        println!("{file}: removed");
        Ok(())
    } else {
        Err(CliError::error(format!("no imported statement named \"{file}\"")))
    }
}

fn cmd_rate(store: &mut RoyaltyStore<JsonFileStore>, value: Option<f64>) -> Result<(), CliError> {
    match value {
        Some(rate) => {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(CliError::error(format!("invalid rate: {rate}")));
            }
            store.set_eur_usd_rate(rate);
            println!("EUR/USD rate set to {rate}");
        }
        None => println!("{}", store.eur_usd_rate()),
    }
    Ok(())
}

fn cmd_export(store: &RoyaltyStore<JsonFileStore>, output: Option<PathBuf>) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(&store.export_state())
        .map_err(|e| CliError::error(e.to_string()))?;
    match output {
        Some(path) => {
            std::fs::write(&path, json).map_err(|e| CliError::io(e.to_string()))?;
            eprintln!("state written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
