use royalacta_core::{
    CategoryGroup, DateRange, DistributorEntry, ImportedDistributorStatement, ImportedStatement,
    RoyaltyEntry, SalesType, StatementFormat,
};
use royalacta_store::persist::{JsonFileStore, NullStore, StateStore};
use royalacta_store::{ImportOutcome, RoyaltyStore, DEFAULT_EUR_USD_RATE};

fn society_entry(work: &str, category: &str, amount: f64, year: &str, file: &str) -> RoyaltyEntry {
    RoyaltyEntry {
        id: format!("{work}_{category}_{amount}"),
        work_number: work.to_string(),
        work_title: "Titel".to_string(),
        role: "K".to_string(),
        share_raw: "12/12".to_string(),
        share_decimal: 1.0,
        category_code: category.to_string(),
        category_group: CategoryGroup::Streaming,
        usage_count: 100,
        amount,
        amount_raw: format!("{amount}"),
        platform_name: "Spotify".to_string(),
        fiscal_year: year.to_string(),
        distribution_period: year.to_string(),
        source_file: file.to_string(),
        imported_at: 0,
    }
}

fn society_statement(file: &str, count: usize, total: f64) -> ImportedStatement {
    ImportedStatement {
        id: format!("csv_0_{file}"),
        file_name: file.to_string(),
        file_type: "csv".to_string(),
        format_variant: StatementFormat::Detail,
        fiscal_year: "2024".to_string(),
        distribution_period: "2024".to_string(),
        entry_count: count,
        total_amount: total,
        warnings: Vec::new(),
        imported_at: 0,
    }
}

fn dist_entry(retailer: &str, key: &str, period: &str, amount: f64, file: &str) -> DistributorEntry {
    DistributorEntry {
        id: format!("dist_{retailer}_{period}"),
        period: period.to_string(),
        retailer: retailer.to_string(),
        retailer_key: key.to_string(),
        reporting_period: period.to_string(),
        label_name: String::new(),
        main_artist: "Artist".to_string(),
        album_name: "Album".to_string(),
        track_name: "Track".to_string(),
        isrc: String::new(),
        country_code: "DE".to_string(),
        sales_type: SalesType::StreamingSubscription,
        quantity: 10,
        net_amount_usd: amount,
        source_file: file.to_string(),
        imported_at: 0,
    }
}

fn dist_statement(file: &str) -> ImportedDistributorStatement {
    ImportedDistributorStatement {
        id: format!("distst_{file}"),
        file_name: file.to_string(),
        file_type: "csv".to_string(),
        distributor_format: "generic".to_string(),
        entry_count: 0,
        total_amount_usd: 0.0,
        date_range: DateRange::default(),
        warnings: Vec::new(),
        imported_at: 0,
    }
}

#[test]
fn reimporting_the_same_file_is_rejected() {
    let mut store = RoyaltyStore::new(NullStore);

    let outcome = store.add_society_batch(
        vec![society_entry("1234567", "MOD S", 10.0, "2024", "a.csv")],
        society_statement("a.csv", 1, 10.0),
    );
    assert_eq!(outcome, ImportOutcome::Imported { added: 1, duplicates_skipped: 0 });

    let outcome = store.add_society_batch(
        vec![society_entry("1234567", "MOD S", 10.0, "2024", "a.csv")],
        society_statement("a.csv", 1, 10.0),
    );
    match outcome {
        ImportOutcome::DuplicateFile(msg) => assert!(msg.contains("a.csv")),
        other => panic!("expected duplicate-file outcome, got {other:?}"),
    }

    assert_eq!(store.entries().len(), 1);
    assert_eq!(store.statements().len(), 1);
}

#[test]
fn same_payment_across_files_is_deduplicated() {
    let mut store = RoyaltyStore::new(NullStore);

    store.add_society_batch(
        vec![society_entry("1234567", "MOD S", 12.34, "2024", "compact.csv")],
        society_statement("compact.csv", 1, 12.34),
    );
    // Same (work, category, amount, period) from a different file.
    let outcome = store.add_society_batch(
        vec![
            society_entry("1234567", "MOD S", 12.34, "2024", "detail.csv"),
            society_entry("7654321", "GOP", 1.0, "2024", "detail.csv"),
        ],
        society_statement("detail.csv", 2, 13.34),
    );

    assert_eq!(outcome, ImportOutcome::Imported { added: 1, duplicates_skipped: 1 });
    assert_eq!(store.entries().len(), 2);
    // The second statement's counters cover only what was stored.
    let detail = &store.statements()[1];
    assert_eq!(detail.entry_count, 1);
    assert_eq!(detail.total_amount, 1.0);
}

#[test]
fn role_split_rows_in_one_file_are_kept_separately() {
    // Same work/category/amount/period but different roles: the content key
    // excludes the role, so these collide; they must differ in amount or
    // work to both survive. Different amounts here.
    let mut store = RoyaltyStore::new(NullStore);
    let mut composer = society_entry("1234567", "MOD S", 7.5, "2024", "a.csv");
    composer.role = "K".to_string();
    let mut publisher = society_entry("1234567", "MOD S", 4.5, "2024", "a.csv");
    publisher.role = "V".to_string();

    let outcome =
        store.add_society_batch(vec![composer, publisher], society_statement("a.csv", 2, 12.0));
    assert_eq!(outcome, ImportOutcome::Imported { added: 2, duplicates_skipped: 0 });
}

#[test]
fn distributor_dedup_uses_canonical_retailer_key() {
    let mut store = RoyaltyStore::new(NullStore);

    store.add_distributor_batch(
        vec![dist_entry("Amazon Ad-Supported", "amazon", "2024-03", 0.5, "a.csv")],
        dist_statement("a.csv"),
    );
    // Different raw spelling, same canonical key and content.
    let outcome = store.add_distributor_batch(
        vec![dist_entry("Amazon Music", "amazon", "2024-03", 0.5, "b.csv")],
        dist_statement("b.csv"),
    );

    assert_eq!(outcome, ImportOutcome::Imported { added: 0, duplicates_skipped: 1 });
    assert_eq!(store.distributor_entries().len(), 1);
}

#[test]
fn distributor_statement_range_recomputed_over_retained() {
    let mut store = RoyaltyStore::new(NullStore);
    store.add_distributor_batch(
        vec![
            dist_entry("Spotify", "spotify", "2024-01", 1.0, "a.csv"),
            dist_entry("Spotify", "spotify", "2024-06", 2.0, "a.csv"),
        ],
        dist_statement("a.csv"),
    );

    let statement = &store.distributor_statements()[0];
    assert_eq!(statement.entry_count, 2);
    assert_eq!(statement.total_amount_usd, 3.0);
    assert_eq!(statement.date_range.from, "2024-01");
    assert_eq!(statement.date_range.to, "2024-06");
}

#[test]
fn removing_a_statement_restores_prior_totals_and_allows_reimport() {
    let mut store = RoyaltyStore::new(NullStore);
    store.add_society_batch(
        vec![society_entry("1111111", "R", 5.0, "2024", "a.csv")],
        society_statement("a.csv", 1, 5.0),
    );
    store.add_society_batch(
        vec![society_entry("2222222", "FS", 7.0, "2024", "b.csv")],
        society_statement("b.csv", 1, 7.0),
    );

    assert!(store.remove_statement("b.csv"));
    assert_eq!(store.entries().len(), 1);
    assert_eq!(store.statements().len(), 1);
    assert_eq!(store.entries()[0].work_number, "1111111");

    // Keys were rebuilt: the removed file imports cleanly again.
    let outcome = store.add_society_batch(
        vec![society_entry("2222222", "FS", 7.0, "2024", "b.csv")],
        society_statement("b.csv", 1, 7.0),
    );
    assert_eq!(outcome, ImportOutcome::Imported { added: 1, duplicates_skipped: 0 });

    assert!(!store.remove_statement("never-imported.csv"));
}

#[test]
fn clear_all_empties_both_sides() {
    let mut store = RoyaltyStore::new(NullStore);
    store.add_society_batch(
        vec![society_entry("1111111", "R", 5.0, "2024", "a.csv")],
        society_statement("a.csv", 1, 5.0),
    );
    store.add_distributor_batch(
        vec![dist_entry("Spotify", "spotify", "2024-01", 1.0, "d.csv")],
        dist_statement("d.csv"),
    );

    store.clear_all();
    assert!(store.entries().is_empty());
    assert!(store.statements().is_empty());
    assert!(store.distributor_entries().is_empty());
    assert!(store.distributor_statements().is_empty());
}

#[test]
fn state_round_trips_through_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    {
        let mut store = RoyaltyStore::new(JsonFileStore::new(path.clone()));
        store.add_society_batch(
            vec![society_entry("1234567", "MOD S", 10.0, "2024", "a.csv")],
            society_statement("a.csv", 1, 10.0),
        );
        store.set_eur_usd_rate(0.88);
    }

    let store = RoyaltyStore::new(JsonFileStore::new(path));
    assert_eq!(store.entries().len(), 1);
    assert_eq!(store.statements().len(), 1);
    assert_eq!(store.eur_usd_rate(), 0.88);

    // Dedup state was rebuilt from the loaded entries.
    let mut store = store;
    let outcome = store.add_society_batch(
        vec![society_entry("1234567", "MOD S", 10.0, "2024", "c.csv")],
        society_statement("c.csv", 1, 10.0),
    );
    assert_eq!(outcome, ImportOutcome::Imported { added: 0, duplicates_skipped: 1 });
}

#[test]
fn missing_state_file_degrades_to_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let backend = JsonFileStore::new(dir.path().join("does-not-exist.json"));
    assert!(backend.load().is_none());

    let store = RoyaltyStore::new(backend);
    assert!(store.entries().is_empty());
    assert_eq!(store.eur_usd_rate(), DEFAULT_EUR_USD_RATE);
}
