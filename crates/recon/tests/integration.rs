use royalacta_core::{CategoryGroup, DistributorEntry, RoyaltyEntry, SalesType};
use royalacta_recon::{
    aggregate_by_work, aggregate_dist_by_country, aggregate_dist_by_period,
    aggregate_dist_by_retailer, aggregate_dist_by_sales_type, compare, time_series, top_category,
    total_dist_plays, total_dist_usd, total_earnings, unique_works, MoreIn,
};

fn society_entry(platform: &str, amount: f64, plays: u64, year: &str) -> RoyaltyEntry {
    RoyaltyEntry {
        id: format!("{platform}_{amount}"),
        work_number: "1234567".to_string(),
        work_title: "Titel".to_string(),
        role: "K".to_string(),
        share_raw: "12/12".to_string(),
        share_decimal: 1.0,
        category_code: "MOD S".to_string(),
        category_group: CategoryGroup::Streaming,
        usage_count: plays,
        amount,
        amount_raw: format!("{amount}"),
        platform_name: platform.to_string(),
        fiscal_year: year.to_string(),
        distribution_period: String::new(),
        source_file: "a.csv".to_string(),
        imported_at: 0,
    }
}

fn dist_entry(retailer: &str, key: &str, amount: f64, plays: u64, period: &str) -> DistributorEntry {
    DistributorEntry {
        id: format!("{key}_{period}_{amount}"),
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
        quantity: plays,
        net_amount_usd: amount,
        source_file: "d.csv".to_string(),
        imported_at: 0,
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn matched_platform_combines_both_streams() {
    // 100 EUR society + 50 USD distributor at 0.9 EUR/USD.
    let society = vec![society_entry("Spotify", 100.0, 1000, "2024")];
    let distributor = vec![dist_entry("Spotify", "spotify", 50.0, 1000, "2024-03")];

    let summary = compare(&society, &distributor, 0.9);

    assert!(approx(summary.society_total_eur, 100.0));
    assert!(approx(summary.distributor_total_usd, 50.0));
    assert!(approx(summary.distributor_total_eur, 45.0));
    assert!(approx(summary.combined_total_eur, 145.0));
    assert!(approx(summary.society_uplift_pct, 100.0 / 45.0 * 100.0));
    assert_eq!(summary.matched_count, 1);
    assert!(summary.unmatched_society.is_empty());
    assert!(summary.unmatched_distributor.is_empty());

    let row = &summary.platforms[0];
    assert_eq!(row.platform_key, "spotify");
    assert_eq!(row.platform_name, "Spotify");
    assert!(approx(row.combined.total_eur, 145.0));
    assert!(approx(row.combined.society_uplift_pct, 100.0 / 45.0 * 100.0));
    assert!(approx(row.society.per_play_eur, 0.1));
}

#[test]
fn society_and_distributor_labels_pair_through_canonical_keys() {
    // "Amazon Music GmbH" (society licensee) and "Amazon Ad-Supported"
    // (distributor retailer) are the same platform.
    let society = vec![society_entry("Amazon Music GmbH", 10.0, 100, "2024")];
    let distributor = vec![dist_entry("Amazon Ad-Supported", "amazon", 5.0, 100, "2024-01")];

    let summary = compare(&society, &distributor, 1.0);
    assert_eq!(summary.matched_count, 1);
    assert_eq!(summary.platforms.len(), 1);
    assert_eq!(summary.platforms[0].platform_key, "amazon");
}

#[test]
fn unmatched_platforms_keep_zeroed_counterpart() {
    let society = vec![society_entry("ARD Fernsehen", 80.0, 3, "2024")];
    let distributor = vec![dist_entry("Pandora", "pandora", 4.0, 200, "2024-02")];

    let summary = compare(&society, &distributor, 1.0);
    assert_eq!(summary.matched_count, 0);
    assert_eq!(summary.unmatched_society, vec!["ard fernsehen".to_string()]);
    assert_eq!(summary.unmatched_distributor, vec!["pandora".to_string()]);

    let ard = summary
        .platforms
        .iter()
        .find(|p| p.platform_key == "ard fernsehen")
        .unwrap();
    assert!(approx(ard.distributor.revenue_usd, 0.0));
    assert_eq!(ard.distributor.plays, 0);
    // Society revenue with no distributor counterpart: uplift is unbounded.
    assert!(ard.combined.society_uplift_pct.is_infinite());

    let pandora = summary
        .platforms
        .iter()
        .find(|p| p.platform_key == "pandora")
        .unwrap();
    assert!(approx(pandora.society.revenue_eur, 0.0));
    assert!(approx(pandora.combined.society_uplift_pct, 0.0));
}

#[test]
fn small_play_differences_count_as_equal() {
    // 100 vs 104 plays is a 3.8% difference, below the 5% threshold.
    let society = vec![society_entry("Spotify", 10.0, 100, "2024")];
    let distributor = vec![dist_entry("Spotify", "spotify", 10.0, 104, "2024-01")];
    let summary = compare(&society, &distributor, 1.0);
    assert_eq!(summary.platforms[0].play_discrepancy.more_in, MoreIn::Equal);

    // 100 vs 130 is ~23%: the distributor reported more plays.
    let distributor = vec![dist_entry("Spotify", "spotify", 10.0, 130, "2024-01")];
    let summary = compare(&society, &distributor, 1.0);
    let row = &summary.platforms[0];
    assert_eq!(row.play_discrepancy.more_in, MoreIn::Distributor);
    assert!(row.play_discrepancy.pct_diff > 20.0);
}

#[test]
fn platforms_sorted_by_combined_revenue() {
    let society = vec![
        society_entry("Deezer", 5.0, 10, "2024"),
        society_entry("Spotify", 100.0, 10, "2024"),
        society_entry("Tidal", 20.0, 10, "2024"),
    ];
    let summary = compare(&society, &[], 1.0);
    let keys: Vec<&str> = summary.platforms.iter().map(|p| p.platform_key.as_str()).collect();
    assert_eq!(keys, vec!["spotify", "tidal", "deezer"]);
}

#[test]
fn time_series_is_period_sorted_and_converted() {
    let society = vec![
        society_entry("Spotify", 30.0, 10, "2024"),
        society_entry("Spotify", 12.0, 10, "2023"),
    ];
    let distributor = vec![
        dist_entry("Spotify", "spotify", 10.0, 10, "2024-02"),
        dist_entry("Spotify", "spotify", 20.0, 10, "2024-01"),
    ];

    let points = time_series(&society, &distributor, 0.5);
    let periods: Vec<&str> = points.iter().map(|p| p.period.as_str()).collect();
    assert_eq!(periods, vec!["2023", "2024", "2024-01", "2024-02"]);
    assert!(approx(points[2].distributor_eur, 10.0));
    assert!(approx(points[2].combined_eur, 10.0));
    assert!(approx(points[1].society_eur, 30.0));
}

#[test]
fn entries_without_any_period_are_left_out_of_the_series() {
    let mut entry = society_entry("Spotify", 10.0, 1, "");
    entry.distribution_period = String::new();
    let points = time_series(&[entry], &[], 1.0);
    assert!(points.is_empty());
}

#[test]
fn works_are_ranked_by_earnings() {
    let mut a = society_entry("Spotify", 10.0, 100, "2024");
    a.work_number = "1111111".to_string();
    let mut b = society_entry("Tidal", 25.0, 50, "2024");
    b.work_number = "2222222".to_string();
    b.category_group = CategoryGroup::Radio;
    let mut b2 = society_entry("Spotify", 5.0, 20, "2024");
    b2.work_number = "2222222".to_string();

    let works = aggregate_by_work(&[a, b, b2]);
    assert_eq!(works.len(), 2);
    assert_eq!(works[0].rank, 1);
    assert_eq!(works[0].work_number, "2222222");
    assert!(approx(works[0].total_amount_eur, 30.0));
    assert_eq!(works[0].by_platform.len(), 2);
    assert_eq!(works[0].by_category.len(), 2);
    assert_eq!(works[1].rank, 2);
}

#[test]
fn distributor_rollups_by_retailer_country_and_type() {
    let mut subscription = dist_entry("Spotify", "spotify", 2.0, 100, "2024-01");
    subscription.country_code = "DE".to_string();
    let mut ad = dist_entry("Spotify", "spotify", 0.5, 300, "2024-02");
    ad.country_code = "US".to_string();
    ad.sales_type = SalesType::StreamingAd;
    let mut apple = dist_entry("Apple Music", "apple music", 1.0, 50, "2024-01");
    apple.country_code = "DE".to_string();
    let entries = vec![subscription, ad, apple];

    let by_retailer = aggregate_dist_by_retailer(&entries);
    assert_eq!(by_retailer.len(), 2);
    let spotify = &by_retailer["spotify"];
    assert!(approx(spotify.amount_usd, 2.5));
    assert_eq!(spotify.plays, 400);
    assert_eq!(spotify.entry_count, 2);

    let by_country = aggregate_dist_by_country(&entries);
    assert!(approx(by_country["DE"].amount_usd, 3.0));
    assert_eq!(by_country["US"].plays, 300);

    let by_type = aggregate_dist_by_sales_type(&entries);
    assert!(approx(by_type[&SalesType::StreamingSubscription].amount_usd, 3.0));
    assert_eq!(by_type[&SalesType::StreamingAd].plays, 300);

    let by_period = aggregate_dist_by_period(&entries);
    assert_eq!(by_period["2024-01"].entry_count, 2);

    assert!(approx(total_dist_usd(&entries), 3.5));
    assert_eq!(total_dist_plays(&entries), 450);
}

#[test]
fn summary_statistics_over_entries() {
    let mut radio = society_entry("ARD", 50.0, 1, "2024");
    radio.work_number = String::new();
    radio.work_title = "Ohne Nummer".to_string();
    radio.category_group = CategoryGroup::Radio;
    let streaming = society_entry("Spotify", 10.0, 100, "2024");
    let entries = vec![radio, streaming];

    assert!(approx(total_earnings(&entries), 60.0));
    assert_eq!(unique_works(&entries), 2);
    assert_eq!(top_category(&entries), Some(CategoryGroup::Radio));
    assert_eq!(top_category(&[]), None);
}
