//! Integration tests for the trend reshaper
//!
//! These exercise the documented properties of the derived chart views:
//! city-column completeness, coercion, ranking, and error-record handling.

use mandi::models::TrendRecord;
use mandi::reshape::{
    avg_change_by_trend, distinct_cities, grouped_by_trend, top_trends, DashboardViews,
    TOP_TRENDS_LIMIT,
};
use proptest::prelude::*;

fn record(city: &str, trend: &str, pct: f64) -> TrendRecord {
    TrendRecord {
        city: city.to_string(),
        trend: trend.to_string(),
        pct_change: pct,
        ..Default::default()
    }
}

/// Every grouped row carries exactly one column per distinct input city
#[test]
fn test_grouped_rows_cover_all_cities() {
    let records = vec![
        record("Jaipur", "Bandhani", 42.0),
        record("Surat", "Bandhani", 18.0),
        record("Surat", "Silk Sarees", 25.0),
        record("Indore", "Juttis", 8.0),
    ];
    let views = DashboardViews::build(&records);

    assert_eq!(views.cities, vec!["Jaipur", "Surat", "Indore"]);
    for row in &views.grouped_by_trend {
        assert_eq!(row.cities.len(), 3, "row {} is missing cities", row.trend);
        for city in &views.cities {
            assert!(row.cities.contains_key(city));
        }
    }
}

/// Empty input produces empty views, not an error
#[test]
fn test_empty_input() {
    let views = DashboardViews::build(&[]);
    assert!(views.cities.is_empty());
    assert!(views.grouped_by_trend.is_empty());
    assert!(views.single_city.is_empty());
    assert!(views.avg_change_by_trend.is_empty());
    assert!(views.top_trends.is_empty());
}

/// Coercion cases from the wire: "12.5" -> 12.5, "abc" -> 0, null -> 0, 7 -> 7
#[test]
fn test_pct_change_coercion_from_wire() {
    let json = r#"{"trends": [
        {"city": "A", "trend": "T1", "pct_change": "12.5"},
        {"city": "A", "trend": "T2", "pct_change": "abc"},
        {"city": "A", "trend": "T3", "pct_change": null},
        {"city": "A", "trend": "T4", "pct_change": 7}
    ]}"#;
    let response: mandi::TrendsResponse = serde_json::from_str(json).unwrap();

    let pcts: Vec<f64> = response.trends.iter().map(|t| t.pct_change).collect();
    assert_eq!(pcts, vec![12.5, 0.0, 0.0, 7.0]);
}

/// Mean percent change per trend, rounded to one decimal for display
#[test]
fn test_average_change() {
    let records = vec![
        record("X", "A", 10.0),
        record("Y", "A", 20.0),
        record("X", "B", 5.0),
    ];
    let averages = avg_change_by_trend(&records);

    let a = averages.iter().find(|t| t.name == "A").unwrap();
    let b = averages.iter().find(|t| t.name == "B").unwrap();
    assert_eq!(a.avg_change, 15.0);
    assert_eq!(b.avg_change, 5.0);
}

/// Ranking truncates to the limit and sorts descending
#[test]
fn test_top_trends_truncation() {
    let records: Vec<TrendRecord> = (0..20)
        .map(|i| record("X", &format!("trend-{i:02}"), f64::from(i) * 1.5))
        .collect();
    let top = top_trends(&avg_change_by_trend(&records));

    assert_eq!(top.len(), TOP_TRENDS_LIMIT);
    for pair in top.windows(2) {
        assert!(pair[0].mean >= pair[1].mean);
    }
    assert_eq!(top[0].name, "trend-19");
}

/// One distinct city selects single-city mode; two select multi-city
#[test]
fn test_city_mode_routing() {
    let single = vec![record("Surat", "A", 1.0), record("Surat", "B", 2.0)];
    let views = DashboardViews::build(&single);
    assert!(!views.multi_city);
    assert_eq!(views.single_city.len(), 2);

    let multi = vec![record("Surat", "A", 1.0), record("Jaipur", "B", 2.0)];
    assert!(DashboardViews::build(&multi).multi_city);
}

/// Error records are kept out of numeric aggregation but keep their city
#[test]
fn test_error_records() {
    let records = vec![
        record("Surat", "A", 30.0),
        TrendRecord::error_record("Delhi", "search quota exhausted"),
    ];
    let views = DashboardViews::build(&records);

    assert_eq!(views.cities, vec!["Surat", "Delhi"]);
    assert_eq!(views.avg_change_by_trend.len(), 1);
    assert_eq!(views.grouped_by_trend[0].cities["Delhi"], 0.0);

    // The per-record view still shows the failure
    let error_row = views.single_city.iter().find(|r| r.error.is_some()).unwrap();
    assert_eq!(error_row.change, 0.0);
}

proptest! {
    /// Invariant: every grouped row has one entry per distinct city, and
    /// top_trends never exceeds its limit, for arbitrary inputs.
    #[test]
    fn prop_grouped_rows_complete(
        entries in proptest::collection::vec(
            ("[a-d]", "[w-z]", -100.0f64..100.0),
            0..40,
        )
    ) {
        let records: Vec<TrendRecord> = entries
            .iter()
            .map(|(city, trend, pct)| record(city, trend, *pct))
            .collect();

        let views = DashboardViews::build(&records);
        let cities = distinct_cities(&records);

        for row in &views.grouped_by_trend {
            prop_assert_eq!(row.cities.len(), cities.len());
        }
        prop_assert!(views.top_trends.len() <= TOP_TRENDS_LIMIT);
        prop_assert_eq!(views.single_city.len(), records.len());
        prop_assert_eq!(views.multi_city, cities.len() >= 2);
    }

    /// Ranking is a permutation prefix: every ranked entry exists in the
    /// unranked averages with the same values.
    #[test]
    fn prop_ranking_preserves_entries(
        entries in proptest::collection::vec(
            ("[a-b]", "[u-z]", -50.0f64..50.0),
            1..30,
        )
    ) {
        let records: Vec<TrendRecord> = entries
            .iter()
            .map(|(city, trend, pct)| record(city, trend, *pct))
            .collect();

        let averages = avg_change_by_trend(&records);
        let top = top_trends(&averages);

        for entry in &top {
            let source = averages.iter().find(|a| a.name == entry.name).unwrap();
            prop_assert_eq!(source.avg_change, entry.avg_change);
        }
    }
}

/// Duplicate (city, trend) pairs keep the last value in the grouped view
#[test]
fn test_duplicate_pair_last_wins() {
    let records = vec![record("Surat", "A", 10.0), record("Surat", "A", 30.0)];
    let cities = distinct_cities(&records);
    let rows = grouped_by_trend(&records, &cities);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].cities["Surat"], 30.0);

    // while the average still counts both observations
    let averages = avg_change_by_trend(&records);
    assert_eq!(averages[0].avg_change, 20.0);
}
