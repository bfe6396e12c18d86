//! Chart-ready views derived from flat trend records
//!
//! This module is the algorithmic heart of the dashboard. Given the flat
//! list of [`TrendRecord`]s returned by the trend pipeline, it derives:
//!
//! - a per-trend row with one column per city (multi-city comparison),
//! - a flat per-record view (single-city display),
//! - a ranked top-N list of trends by mean percent change.
//!
//! Everything here is pure and synchronous: no I/O, no shared state,
//! deterministic for identical input order.

pub mod coerce;

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::TrendRecord;
use coerce::round1;

/// Maximum number of entries in the ranked top-trends list
pub const TOP_TRENDS_LIMIT: usize = 8;

/// Per-trend row carrying one column per distinct city
///
/// Invariant: `cities` holds exactly one entry per distinct city present in
/// the full input, 0.0 where the city had no record for this trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedRow {
    pub trend: String,
    #[serde(flatten)]
    pub cities: BTreeMap<String, f64>,
}

/// Per-record row used when only one city is present
///
/// Error-tagged records keep their row (rendered as an error card by the
/// caller) but never contribute to numeric charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleCityRow {
    pub name: String,
    pub change: f64,
    pub popularity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Mean percent change for one trend name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAverage {
    pub name: String,
    /// Mean rounded to one decimal place, display only
    pub avg_change: f64,
    /// Unrounded mean, the ranking sort key
    #[serde(skip)]
    pub mean: f64,
}

/// All derived views for one render cycle
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DashboardViews {
    /// Distinct cities in first-seen order, error-only cities included
    pub cities: Vec<String>,

    /// True when two or more distinct cities are present; selects the
    /// grouped visualization instead of the single-city one
    pub multi_city: bool,

    pub grouped_by_trend: Vec<GroupedRow>,
    pub single_city: Vec<SingleCityRow>,
    pub avg_change_by_trend: Vec<TrendAverage>,
    pub top_trends: Vec<TrendAverage>,
}

impl DashboardViews {
    /// Derive all views from one input sequence
    ///
    /// Empty input produces empty views, never an error.
    #[must_use]
    pub fn build(records: &[TrendRecord]) -> Self {
        let cities = distinct_cities(records);
        let avg_change_by_trend = avg_change_by_trend(records);
        Self {
            multi_city: cities.len() >= 2,
            grouped_by_trend: grouped_by_trend(records, &cities),
            single_city: single_city_rows(records),
            top_trends: top_trends(&avg_change_by_trend),
            avg_change_by_trend,
            cities,
        }
    }
}

/// Distinct cities in first-seen order
///
/// Computed once from the full input and reused both for zero-filling
/// grouped rows and for single-vs-multi-city mode. Error-tagged records
/// still contribute their city, so an all-error city produces zero-filled
/// columns rather than disappearing.
#[must_use]
pub fn distinct_cities(records: &[TrendRecord]) -> Vec<String> {
    let mut cities = Vec::new();
    for record in records {
        if !record.city.is_empty() && !cities.contains(&record.city) {
            cities.push(record.city.clone());
        }
    }
    cities
}

/// One row per distinct trend name, one column per distinct city
///
/// Trend order follows first appearance in the input. A duplicate
/// (city, trend) pair keeps the last value seen. Error-tagged records are
/// excluded from the values but their city still appears as a 0.0 column.
#[must_use]
pub fn grouped_by_trend(records: &[TrendRecord], cities: &[String]) -> Vec<GroupedRow> {
    let mut order: Vec<String> = Vec::new();
    let mut values: HashMap<String, BTreeMap<String, f64>> = HashMap::new();

    for record in records.iter().filter(|r| !r.is_error()) {
        if !values.contains_key(&record.trend) {
            order.push(record.trend.clone());
        }
        values
            .entry(record.trend.clone())
            .or_default()
            .insert(record.city.clone(), record.pct_change);
    }

    order
        .into_iter()
        .map(|trend| {
            let mut row = values.remove(&trend).unwrap_or_default();
            for city in cities {
                row.entry(city.clone()).or_insert(0.0);
            }
            GroupedRow { trend, cities: row }
        })
        .collect()
}

/// One row per input record, for single-city display
#[must_use]
pub fn single_city_rows(records: &[TrendRecord]) -> Vec<SingleCityRow> {
    records
        .iter()
        .map(|record| SingleCityRow {
            name: record.trend.clone(),
            change: if record.is_error() { 0.0 } else { record.pct_change },
            popularity: record.popularity_score,
            error: record.error.clone().filter(|e| !e.is_empty()),
        })
        .collect()
}

/// Arithmetic mean of `pct_change` per trend name, first-seen order
///
/// The mean is computed as sum/count in double precision; `avg_change`
/// carries the value rounded to one decimal for display while `mean` keeps
/// the unrounded sort key. Error-tagged records are excluded.
#[must_use]
pub fn avg_change_by_trend(records: &[TrendRecord]) -> Vec<TrendAverage> {
    let mut order: Vec<String> = Vec::new();
    let mut sums: HashMap<String, (f64, usize)> = HashMap::new();

    for record in records.iter().filter(|r| !r.is_error()) {
        let entry = sums.entry(record.trend.clone()).or_insert_with(|| {
            order.push(record.trend.clone());
            (0.0, 0)
        });
        entry.0 += record.pct_change;
        entry.1 += 1;
    }

    order
        .into_iter()
        .map(|name| {
            let (sum, count) = sums[&name];
            let mean = sum / count as f64;
            TrendAverage {
                name,
                avg_change: round1(mean),
                mean,
            }
        })
        .collect()
}

/// Averages ranked descending by unrounded mean, truncated to 8
///
/// The unrounded mean is the sort key; rounding is display-only, so
/// near-ties keep their true order. The sort is stable, so exact ties keep
/// first-seen input order.
#[must_use]
pub fn top_trends(averages: &[TrendAverage]) -> Vec<TrendAverage> {
    let mut ranked = averages.to_vec();
    ranked.sort_by(|a, b| b.mean.partial_cmp(&a.mean).unwrap_or(Ordering::Equal));
    ranked.truncate(TOP_TRENDS_LIMIT);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(city: &str, trend: &str, pct: f64) -> TrendRecord {
        TrendRecord {
            city: city.to_string(),
            trend: trend.to_string(),
            pct_change: pct,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_input_empty_views() {
        let views = DashboardViews::build(&[]);
        assert!(views.cities.is_empty());
        assert!(!views.multi_city);
        assert!(views.grouped_by_trend.is_empty());
        assert!(views.single_city.is_empty());
        assert!(views.avg_change_by_trend.is_empty());
        assert!(views.top_trends.is_empty());
    }

    #[test]
    fn test_distinct_cities_first_seen_order() {
        let records = vec![
            record("Surat", "A", 1.0),
            record("Jaipur", "A", 2.0),
            record("Surat", "B", 3.0),
        ];
        assert_eq!(distinct_cities(&records), vec!["Surat", "Jaipur"]);
    }

    #[test]
    fn test_grouped_rows_zero_fill() {
        let records = vec![
            record("Surat", "Bandhani", 10.0),
            record("Jaipur", "Bandhani", 20.0),
            record("Jaipur", "Juttis", 5.0),
        ];
        let cities = distinct_cities(&records);
        let rows = grouped_by_trend(&records, &cities);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].trend, "Bandhani");
        assert_eq!(rows[0].cities["Surat"], 10.0);
        assert_eq!(rows[0].cities["Jaipur"], 20.0);
        // Juttis has no Surat record; the column is zero-filled
        assert_eq!(rows[1].trend, "Juttis");
        assert_eq!(rows[1].cities["Surat"], 0.0);
        assert_eq!(rows[1].cities["Jaipur"], 5.0);
    }

    #[test]
    fn test_grouped_row_serializes_city_columns_inline() {
        let records = vec![record("Surat", "Bandhani", 10.0)];
        let rows = grouped_by_trend(&records, &distinct_cities(&records));
        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["trend"], "Bandhani");
        assert_eq!(json["Surat"], 10.0);
    }

    #[test]
    fn test_avg_change_by_trend() {
        let records = vec![
            record("Surat", "A", 10.0),
            record("Jaipur", "A", 20.0),
            record("Surat", "B", 5.0),
        ];
        let averages = avg_change_by_trend(&records);
        assert_eq!(averages.len(), 2);
        assert_eq!(averages[0].name, "A");
        assert_eq!(averages[0].avg_change, 15.0);
        assert_eq!(averages[1].name, "B");
        assert_eq!(averages[1].avg_change, 5.0);
    }

    #[test]
    fn test_avg_change_rounds_display_only() {
        let records = vec![
            record("Surat", "A", 10.0),
            record("Jaipur", "A", 10.1),
            record("Surat", "A", 10.1),
        ];
        let averages = avg_change_by_trend(&records);
        assert_eq!(averages[0].avg_change, 10.1);
        assert!((averages[0].mean - 30.2 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_top_trends_limit_and_order() {
        let records: Vec<TrendRecord> = (0..12)
            .map(|i| record("Surat", &format!("T{i}"), f64::from(i)))
            .collect();
        let top = top_trends(&avg_change_by_trend(&records));

        assert_eq!(top.len(), TOP_TRENDS_LIMIT);
        assert_eq!(top[0].name, "T11");
        assert_eq!(top[7].name, "T4");
    }

    #[test]
    fn test_top_trends_sorts_on_unrounded_mean() {
        // Both round to 10.1 but B's true mean is higher
        let records = vec![
            record("Surat", "A", 10.06),
            record("Surat", "B", 10.09),
        ];
        let top = top_trends(&avg_change_by_trend(&records));
        assert_eq!(top[0].name, "B");
        assert_eq!(top[0].avg_change, top[1].avg_change);
    }

    #[test]
    fn test_top_trends_ties_keep_input_order() {
        let records = vec![
            record("Surat", "First", 7.0),
            record("Surat", "Second", 7.0),
            record("Surat", "Third", 9.0),
        ];
        let top = top_trends(&avg_change_by_trend(&records));
        assert_eq!(top[0].name, "Third");
        assert_eq!(top[1].name, "First");
        assert_eq!(top[2].name, "Second");
    }

    #[test]
    fn test_single_city_mode_detection() {
        let one = vec![record("Surat", "A", 1.0), record("Surat", "B", 2.0)];
        assert!(!DashboardViews::build(&one).multi_city);

        let two = vec![record("Surat", "A", 1.0), record("Jaipur", "A", 2.0)];
        assert!(DashboardViews::build(&two).multi_city);
    }

    #[test]
    fn test_single_city_rows_cover_every_record() {
        let mut records = vec![record("Surat", "A", 4.5)];
        records.push(TrendRecord::error_record("Surat", "model unavailable"));

        let rows = single_city_rows(&records);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "A");
        assert_eq!(rows[0].change, 4.5);
        assert!(rows[1].error.is_some());
        assert_eq!(rows[1].change, 0.0);
    }

    #[test]
    fn test_error_records_excluded_from_aggregation() {
        let records = vec![
            record("Surat", "A", 10.0),
            TrendRecord::error_record("Delhi", "search failed"),
        ];
        let views = DashboardViews::build(&records);

        // Delhi still counts as a city (zero-filled column, multi-city mode)
        assert_eq!(views.cities, vec!["Surat", "Delhi"]);
        assert!(views.multi_city);
        assert_eq!(views.grouped_by_trend.len(), 1);
        assert_eq!(views.grouped_by_trend[0].cities["Delhi"], 0.0);
        assert_eq!(views.avg_change_by_trend.len(), 1);
        assert_eq!(views.avg_change_by_trend[0].name, "A");
    }
}
