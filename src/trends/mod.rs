//! Market trend discovery pipeline
//!
//! One pass per requested city: fetch web search results for the category,
//! ask the LLM to distill them into trend records, then normalize the
//! numeric fields so the charts always have something to draw. A failed
//! city becomes an error-tagged record; the other cities still return.

pub mod images;

use rand::Rng;
use regex::Regex;
use std::sync::OnceLock;

use crate::error::Result;
use crate::llm::{extract_json, LlmClient};
use crate::models::{PopularityTier, TrendQuery, TrendRecord, TrendsResponse};
use crate::reshape::coerce::round1;
use crate::search::{snippet_lines, SearchClient};

/// Fallback percent range when the model supplies no usable number
const FALLBACK_PCT_RANGE: std::ops::RangeInclusive<f64> = 3.0..=65.0;

fn pct_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[-+]?\d+(\.\d+)?").expect("static regex"))
}

/// Trend discovery service combining search and LLM analysis
pub struct TrendsService {
    search: SearchClient,
    llm: LlmClient,
}

impl TrendsService {
    /// Create a new trends service
    pub fn new(search: SearchClient, llm: LlmClient) -> Self {
        Self { search, llm }
    }

    /// Access the underlying search client (shared with the image lookup)
    pub fn search(&self) -> &SearchClient {
        &self.search
    }

    /// Access the underlying LLM client
    pub fn llm(&self) -> &LlmClient {
        &self.llm
    }

    /// Run the pipeline for every requested city
    ///
    /// Per-city failures do not abort the batch; they surface as
    /// error-tagged records so the dashboard can render an error card for
    /// that city while charting the rest.
    pub async fn query(&self, query: &TrendQuery) -> Result<TrendsResponse> {
        query.validate()?;

        let mut trends = Vec::new();
        for city in &query.cities {
            match self.discover_city(city, &query.category).await {
                Ok(mut records) => trends.append(&mut records),
                Err(e) => {
                    tracing::warn!(city = %city, error = %e, "City trend discovery failed");
                    trends.push(TrendRecord::error_record(city, e.to_string()));
                }
            }
        }

        Ok(TrendsResponse { trends })
    }

    /// Discover trends for a single city
    async fn discover_city(&self, city: &str, category: &str) -> Result<Vec<TrendRecord>> {
        let search_query = format!("{category} trends in {city}");
        let results = self.search.organic(&search_query).await?;
        let snippets = snippet_lines(&results);

        tracing::debug!(city = %city, results = results.len(), "Fetched search results");

        let prompt = trend_prompt(city, category, &snippets);
        let response = self.llm.generate(&prompt).await?;

        let cleaned = extract_json(&response);
        let mut records: Vec<TrendRecord> = serde_json::from_str(&cleaned).unwrap_or_else(|e| {
            tracing::warn!(
                city = %city,
                error = %e,
                "Failed to parse trend JSON, returning no records"
            );
            Vec::new()
        });

        let mut rng = rand::thread_rng();
        for record in &mut records {
            record.city = city.to_string();
            normalize_metrics(record, &mut rng);
        }

        tracing::info!(city = %city, trends = records.len(), "City trend discovery complete");
        Ok(records)
    }
}

/// Fill in the numeric fields every chart depends on
///
/// The percent comes from the first signed decimal in the model's
/// `change_pct` string; when absent a uniform random percent stands in.
/// The popularity label and score derive from the percent, keeping a label
/// the model already chose.
pub fn normalize_metrics(record: &mut TrendRecord, rng: &mut impl Rng) {
    let pct = record
        .change_pct
        .as_deref()
        .and_then(extract_pct)
        .unwrap_or_else(|| round1(rng.gen_range(FALLBACK_PCT_RANGE)));

    let tier = PopularityTier::from_pct(pct);

    record.pct_change = pct;
    record.change_pct = Some(format!("{pct:.1}%"));
    record.popularity_score = tier.score();
    if record.popularity.trim().is_empty() {
        record.popularity = tier.label().to_string();
    }
}

/// First signed decimal found in a percent string, rounded to one decimal
#[must_use]
pub fn extract_pct(text: &str) -> Option<f64> {
    pct_regex()
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(round1)
}

/// Prompt asking the model for strict-JSON trend records
fn trend_prompt(city: &str, category: &str, search_results: &str) -> String {
    format!(
        r#"You are an expert fashion and lifestyle trend analyst.

Analyze the following search results about {category} trends in {city},
and return logical insights based on local culture, season, and events.

For each trend, decide its popularity and an estimated Change (%) value.

Rules:
- High 🔥 means Change between 35% and 70%
- Medium ⚡ means Change between 15% and 35%
- Low ❄️ means Change between 0% and 15%
- The Change value should make sense with the reasoning for that city and category.

Return STRICT JSON in this format:
[
  {{
    "city": "{city}",
    "trend": "Trend Name",
    "popularity": "High 🔥 / Medium ⚡ / Low ❄️",
    "change_pct": "45.2%",
    "features": ["Feature 1", "Feature 2"],
    "competitors": ["Competitor 1", "Competitor 2"],
    "local_hotspots": ["Market/Area 1", "Market/Area 2"],
    "tips": ["Tip 1", "Tip 2"]
  }}
]

Search Results:
{search_results}"#
    )
}
