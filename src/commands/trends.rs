//! `trends` command: run the trend pipeline once and print the ranking
//!
//! Useful for smoke-testing the search and LLM upstreams without starting
//! the server.

use anyhow::{Context, Result};

use crate::config::Config;
use crate::llm::LlmClient;
use crate::models::TrendQuery;
use crate::reshape::DashboardViews;
use crate::search::SearchClient;
use crate::trends::TrendsService;

/// Fetch trends for the given cities and print the ranked result
pub async fn trends(cities: Vec<String>, category: String, top: usize) -> Result<()> {
    let config = Config::from_env()?;
    config.validate()?;

    let search = SearchClient::new(config.search.clone()).context("Failed to create search client")?;
    let llm = LlmClient::with_config(config.llm.clone()).context("Failed to create LLM client")?;
    let service = TrendsService::new(search, llm);

    let query = TrendQuery { cities, category };
    let response = service.query(&query).await?;
    let views = DashboardViews::build(&response.trends);

    for record in response.trends.iter().filter(|r| r.is_error()) {
        println!(
            "! {}: {}",
            record.city,
            record.error.as_deref().unwrap_or("unknown error")
        );
    }

    println!(
        "Cities: {} ({})",
        views.cities.join(", "),
        if views.multi_city { "multi-city" } else { "single-city" }
    );
    println!("Top trends by average change:");
    for (rank, trend) in views.top_trends.iter().take(top).enumerate() {
        println!("  {:>2}. {:<32} {:>6.1}%", rank + 1, trend.name, trend.avg_change);
    }

    Ok(())
}
