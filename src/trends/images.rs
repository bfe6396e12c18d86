//! Feature image lookup
//!
//! Finds real product images for a trend feature: the LLM first refines the
//! feature into an e-commerce search query, then an image search supplies
//! the visuals.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::llm::LlmClient;
use crate::search::SearchClient;

/// Maximum number of image URLs returned per feature
const MAX_IMAGES: usize = 6;

/// Temperature for the query-refinement call
const REFINE_TEMPERATURE: f32 = 0.5;

/// Response of the feature-image lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureImages {
    pub feature: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refined_query: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FeatureImages {
    /// Failure response keeping the echo fields intact
    pub fn failed(feature: &str, category: &str, message: impl Into<String>) -> Self {
        Self {
            feature: feature.to_string(),
            category: category.to_string(),
            refined_query: None,
            images: Vec::new(),
            error: Some(message.into()),
        }
    }
}

/// Look up trending product images for a feature within a category
pub async fn find_feature_images(
    llm: &LlmClient,
    search: &SearchClient,
    feature: &str,
    category: &str,
) -> Result<FeatureImages> {
    let refine_prompt = format!(
        "Refine this term for real e-commerce search: '{feature}' in context of '{category}'. \
         Output only a short query likely to find trending or best-selling items \
         on Amazon, Myntra, or Flipkart."
    );
    let refined = llm
        .generate_with_temperature(&refine_prompt, REFINE_TEMPERATURE)
        .await?;
    let refined_query = refined.trim().to_string();

    let search_query = format!(
        "best selling {refined_query} {category} fashion \
         site:myntra.com OR site:amazon.in OR site:flipkart.com"
    );
    let results = search.images(&search_query).await?;

    let images: Vec<String> = results
        .iter()
        .filter_map(|r| r.url().map(str::to_string))
        .take(MAX_IMAGES)
        .collect();

    tracing::debug!(feature = %feature, images = images.len(), "Feature image lookup complete");

    Ok(FeatureImages {
        feature: feature.to_string(),
        category: category.to_string(),
        refined_query: Some(refined_query),
        images,
        error: None,
    })
}
