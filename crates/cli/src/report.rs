//! `royalacta report` — comparison and aggregation reports.

use clap::Subcommand;

use royalacta_recon::{
    aggregate_by_category, aggregate_by_platform, aggregate_by_work, aggregate_dist_by_country,
    aggregate_dist_by_retailer, aggregate_dist_by_sales_type, compare, time_series, top_category,
    total_dist_plays, total_dist_usd, total_earnings, total_plays, unique_works, MoreIn,
};
use royalacta_store::persist::JsonFileStore;
use royalacta_store::RoyaltyStore;

use crate::CliError;

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Per-platform comparison of society and distributor revenue
    #[command(after_help = "\
Examples:
  royalacta report compare
  royalacta report compare --json | jq .platforms")]
    Compare {
        /// Output JSON instead of the table
        #[arg(long)]
        json: bool,
    },

    /// Combined revenue per period
    Timeline {
        #[arg(long)]
        json: bool,
    },

    /// Society revenue by category group
    Categories {
        #[arg(long)]
        json: bool,
    },

    /// Distributor revenue by retailer, country and sales type
    Distributors {
        #[arg(long)]
        json: bool,
    },

    /// Works ranked by earnings
    Works {
        #[arg(long)]
        json: bool,

        /// Show only the top N works
        #[arg(long, default_value = "20")]
        limit: usize,
    },
}

pub fn cmd_report(store: &RoyaltyStore<JsonFileStore>, cmd: ReportCommands) -> Result<(), CliError> {
    match cmd {
        ReportCommands::Compare { json } => cmd_compare(store, json),
        ReportCommands::Timeline { json } => cmd_timeline(store, json),
        ReportCommands::Categories { json } => cmd_categories(store, json),
        ReportCommands::Distributors { json } => cmd_distributors(store, json),
        ReportCommands::Works { json, limit } => cmd_works(store, json, limit),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CliError::error(e.to_string()))?;
    println!("{json}");
    Ok(())
}

fn cmd_compare(store: &RoyaltyStore<JsonFileStore>, json: bool) -> Result<(), CliError> {
    let summary = compare(store.entries(), store.distributor_entries(), store.eur_usd_rate());
    if json {
        return to_json(&summary);
    }

    println!(
        "{:<18} {:>14} {:>14} {:>12} {:>10} {:>10}",
        "platform", "society EUR", "distrib. USD", "combined EUR", "uplift %", "plays"
    );
    for row in &summary.platforms {
        let uplift = if row.combined.society_uplift_pct.is_infinite() {
            "-".to_string()
        } else {
            format!("{:.1}", row.combined.society_uplift_pct)
        };
        let plays = match row.play_discrepancy.more_in {
            MoreIn::Equal => "equal".to_string(),
            MoreIn::Society => format!("+{:.1}% soc", row.play_discrepancy.pct_diff),
            MoreIn::Distributor => format!("+{:.1}% dist", row.play_discrepancy.pct_diff),
        };
        println!(
            "{:<18} {:>14.2} {:>14.2} {:>12.2} {:>10} {:>10}",
            row.platform_name,
            row.society.revenue_eur,
            row.distributor.revenue_usd,
            row.combined.total_eur,
            uplift,
            plays
        );
    }

    println!();
    println!(
        "total: {:.2} EUR society + {:.2} USD distributor = {:.2} EUR combined (rate {})",
        summary.society_total_eur,
        summary.distributor_total_usd,
        summary.combined_total_eur,
        store.eur_usd_rate()
    );
    println!(
        "matched platforms: {} (society-only: {}, distributor-only: {})",
        summary.matched_count,
        summary.unmatched_society.len(),
        summary.unmatched_distributor.len()
    );
    Ok(())
}

fn cmd_timeline(store: &RoyaltyStore<JsonFileStore>, json: bool) -> Result<(), CliError> {
    let points = time_series(store.entries(), store.distributor_entries(), store.eur_usd_rate());
    if json {
        return to_json(&points);
    }
    println!("{:<10} {:>14} {:>14} {:>14}", "period", "society EUR", "distrib. EUR", "combined EUR");
    for point in &points {
        println!(
            "{:<10} {:>14.2} {:>14.2} {:>14.2}",
            point.period, point.society_eur, point.distributor_eur, point.combined_eur
        );
    }
    Ok(())
}

fn cmd_categories(store: &RoyaltyStore<JsonFileStore>, json: bool) -> Result<(), CliError> {
    let by_category = aggregate_by_category(store.entries());
    if json {
        return to_json(&by_category);
    }
    println!("{:<22} {:>14} {:>12} {:>10}", "category", "amount EUR", "plays", "entries");
    for (category, totals) in &by_category {
        println!(
            "{:<22} {:>14.2} {:>12} {:>10}",
            category.label(),
            totals.amount_eur,
            totals.plays,
            totals.entry_count
        );
    }
    if let Some(top) = top_category(store.entries()) {
        println!();
        println!("top category: {}", top.label());
    }
    Ok(())
}

fn cmd_distributors(store: &RoyaltyStore<JsonFileStore>, json: bool) -> Result<(), CliError> {
    let entries = store.distributor_entries();
    let by_retailer = aggregate_dist_by_retailer(entries);
    let by_country = aggregate_dist_by_country(entries);
    let by_type = aggregate_dist_by_sales_type(entries);

    if json {
        return to_json(&serde_json::json!({
            "by_retailer": by_retailer,
            "by_country": by_country,
            "by_sales_type": by_type,
            "total_usd": total_dist_usd(entries),
            "total_plays": total_dist_plays(entries),
        }));
    }

    println!("{:<18} {:>14} {:>12} {:>10}", "retailer", "amount USD", "plays", "entries");
    for (retailer, totals) in &by_retailer {
        println!(
            "{:<18} {:>14.4} {:>12} {:>10}",
            retailer, totals.amount_usd, totals.plays, totals.entry_count
        );
    }

    println!();
    println!("{:<18} {:>14} {:>12}", "country", "amount USD", "plays");
    for (country, totals) in &by_country {
        println!("{:<18} {:>14.4} {:>12}", country, totals.amount_usd, totals.plays);
    }

    println!();
    println!("{:<22} {:>14} {:>12}", "sales type", "amount USD", "plays");
    for (sales_type, totals) in &by_type {
        println!(
            "{:<22} {:>14.4} {:>12}",
            sales_type.label(),
            totals.amount_usd,
            totals.plays
        );
    }

    println!();
    println!(
        "total: {:.4} USD over {} plays",
        total_dist_usd(entries),
        total_dist_plays(entries)
    );
    Ok(())
}

fn cmd_works(store: &RoyaltyStore<JsonFileStore>, json: bool, limit: usize) -> Result<(), CliError> {
    let works = aggregate_by_work(store.entries());
    if json {
        let capped: Vec<_> = works.iter().take(limit).collect();
        return to_json(&capped);
    }

    println!(
        "{:>4} {:<12} {:<32} {:>14} {:>10}",
        "rank", "work", "title", "amount EUR", "plays"
    );
    for work in works.iter().take(limit) {
        println!(
            "{:>4} {:<12} {:<32} {:>14.2} {:>10}",
            work.rank,
            work.work_number,
            truncate(&work.work_title, 32),
            work.total_amount_eur,
            work.total_plays
        );
    }

    let entries = store.entries();
    println!();
    println!(
        "{} works, {} platforms, {:.2} EUR over {} plays",
        unique_works(entries),
        aggregate_by_platform(entries).len(),
        total_earnings(entries),
        total_plays(entries)
    );
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}
