//! Festival-aware inventory planner
//!
//! Produces the full planning report for a seller location: upcoming
//! festivals, top products to stock, nearby demand areas, products to
//! avoid, and AI recommendations. The model is seeded with real upcoming
//! festival dates so the generated plan lines up with the actual calendar,
//! and festival dates are post-processed into display form with a computed
//! days-left counter.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::llm::{extract_json, LlmClient};

/// Festivals fed into the prompt as real calendar context
const PROMPT_FESTIVAL_LIMIT: usize = 6;

/// Major Indian festival dates; filtered to upcoming at prompt time
const FESTIVAL_CALENDAR: &[(&str, &str)] = &[
    ("Raksha Bandhan", "2025-08-09"),
    ("Onam", "2025-09-05"),
    ("Navratri", "2025-09-22"),
    ("Dussehra", "2025-10-02"),
    ("Karwa Chauth", "2025-10-10"),
    ("Diwali", "2025-10-20"),
    ("Christmas", "2025-12-25"),
    ("Makar Sankranti", "2026-01-14"),
    ("Holi", "2026-03-03"),
    ("Eid al-Fitr", "2026-03-20"),
    ("Raksha Bandhan", "2026-08-28"),
    ("Onam", "2026-08-26"),
    ("Navratri", "2026-10-11"),
    ("Dussehra", "2026-10-20"),
    ("Karwa Chauth", "2026-10-29"),
    ("Diwali", "2026-11-08"),
    ("Christmas", "2026-12-25"),
];

/// One upcoming festival with stocking guidance
///
/// `date` arrives from the model as `YYYY-MM-DD` and leaves as a display
/// string ("October 20, 2025") with `days_left` computed against today.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Festival {
    #[serde(default)]
    pub id: u32,
    pub name: String,
    pub date: String,
    #[serde(default)]
    pub days_left: i64,
    #[serde(default)]
    pub urgency: String,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub expected_sales: String,
    #[serde(default)]
    pub preparation: String,
    #[serde(default)]
    pub color: String,
}

/// One product recommended for stocking
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedProduct {
    #[serde(default)]
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub demand: String,
    #[serde(default)]
    pub profit: String,
    #[serde(default)]
    pub units: String,
    #[serde(default)]
    pub trend: String,
    #[serde(default)]
    pub your_price: String,
    #[serde(default)]
    pub stock_level: String,
    #[serde(default)]
    pub urgency: String,
}

/// Demand observed in one nearby area
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalDemand {
    #[serde(default)]
    pub id: u32,
    pub area: String,
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub demand: String,
    #[serde(default)]
    pub distance: String,
    #[serde(default)]
    pub avg_spend: String,
    #[serde(default)]
    pub shoppers: u32,
    #[serde(default)]
    pub peak_hours: String,
}

/// One product to avoid stocking
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvoidProduct {
    #[serde(default)]
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub suggestion: String,
    #[serde(default)]
    pub return_rate: String,
    #[serde(default)]
    pub impact: String,
    #[serde(default)]
    pub loss_amount: String,
}

/// One actionable recommendation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiRecommendation {
    #[serde(default)]
    pub id: u32,
    pub product: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub confidence: String,
    #[serde(default)]
    pub potential_revenue: String,
}

/// Full inventory planning report
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlannerReport {
    #[serde(default)]
    pub upcoming_festivals: Vec<Festival>,
    #[serde(default)]
    pub top_products_to_stock: Vec<RecommendedProduct>,
    #[serde(default)]
    pub nearby_demand: Vec<LocalDemand>,
    #[serde(default)]
    pub avoid_products: Vec<AvoidProduct>,
    #[serde(default)]
    pub ai_recommendations: Vec<AiRecommendation>,
}

/// Generate the full planning report for a seller location
///
/// Unlike the weekly summary there is no fallback here; a failed
/// generation is a failed request.
pub async fn generate_report(llm: &LlmClient, location: &str) -> Result<PlannerReport> {
    let today = Utc::now().date_naive();
    let festivals = upcoming_festivals(today);
    let prompt = planner_prompt(location, &festivals);

    let response = llm.generate(&prompt).await?;
    let value: Value = serde_json::from_str(&extract_json(&response))?;
    let mut report: PlannerReport = serde_json::from_value(unwrap_plan(value))?;

    report.upcoming_festivals = finalize_festivals(report.upcoming_festivals, today);

    tracing::info!(
        location = %location,
        festivals = report.upcoming_festivals.len(),
        "Planner report generated"
    );
    Ok(report)
}

/// Some models wrap the object in an "InventoryPlan" key; unwrap it
fn unwrap_plan(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("InventoryPlan") => {
            map.remove("InventoryPlan").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Upcoming calendar festivals rendered for the prompt
///
/// Past dates are dropped, the rest sorted by date and capped. An empty
/// result is fine; the model then invents plausible festivals on its own.
#[must_use]
pub fn upcoming_festivals(today: NaiveDate) -> Vec<String> {
    let mut upcoming: Vec<(NaiveDate, &str)> = FESTIVAL_CALENDAR
        .iter()
        .filter_map(|(name, date)| {
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .ok()
                .filter(|d| *d >= today)
                .map(|d| (d, *name))
        })
        .collect();
    upcoming.sort_by_key(|(date, _)| *date);

    upcoming
        .into_iter()
        .take(PROMPT_FESTIVAL_LIMIT)
        .map(|(date, name)| format!("{name} ({date})"))
        .collect()
}

/// Reformat festival dates for display and compute the days-left counter
///
/// A festival whose date fails to parse as `YYYY-MM-DD` is kept untouched
/// rather than dropped.
#[must_use]
pub fn finalize_festivals(festivals: Vec<Festival>, today: NaiveDate) -> Vec<Festival> {
    festivals
        .into_iter()
        .map(|mut festival| {
            match NaiveDate::parse_from_str(&festival.date, "%Y-%m-%d") {
                Ok(date) => {
                    festival.days_left = (date - today).num_days();
                    festival.date = date.format("%B %d, %Y").to_string();
                }
                Err(e) => {
                    tracing::warn!(
                        festival = %festival.name,
                        date = %festival.date,
                        error = %e,
                        "Festival date not in expected format, keeping as-is"
                    );
                }
            }
            festival
        })
        .collect()
}

fn planner_prompt(location: &str, real_festivals: &[String]) -> String {
    format!(
        r#"You are an expert Indian retail and inventory planning AI for marketplace sellers.
Seller location: {location}.
Real upcoming festivals: {festivals}.

Generate 4 upcoming festivals, 5 top products, 3 nearby demand areas, 3 avoid products, and 5 AI recommendations.

All product-related insights (top products, nearby demand, avoid products, and AI recommendations) must focus only on ethnic wear and festive fashion items, such as sarees, kurtis, lehengas, dupattas, sherwanis, ethnic jewelry, and related accessories.
Do not include electronics or unrelated items.

Festival dates must use the YYYY-MM-DD format.

Return STRICT JSON:
{{
  "upcomingFestivals": [{{"id": 1, "name": "...", "date": "YYYY-MM-DD", "urgency": "...", "items": ["..."], "expectedSales": "...", "preparation": "...", "color": "..."}}],
  "topProductsToStock": [{{"id": 1, "name": "...", "demand": "...", "profit": "...", "units": "...", "trend": "...", "yourPrice": "...", "stockLevel": "...", "urgency": "..."}}],
  "nearbyDemand": [{{"id": 1, "area": "...", "product": "...", "demand": "...", "distance": "...", "avgSpend": "...", "shoppers": 0, "peakHours": "..."}}],
  "avoidProducts": [{{"id": 1, "name": "...", "reason": "...", "suggestion": "...", "returnRate": "...", "impact": "...", "lossAmount": "..."}}],
  "aiRecommendations": [{{"id": 1, "product": "...", "action": "...", "priority": "...", "reason": "...", "confidence": "...", "potentialRevenue": "..."}}]
}}"#,
        festivals = real_festivals.join(", "),
    )
}
