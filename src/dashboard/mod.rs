//! Weekly seller summary
//!
//! Produces a short actionable summary of the seller's week from their
//! product inventory and location. Generation failures fall back to a
//! static general-guidance summary so the dashboard card never goes empty.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llm::{extract_json, LlmClient};

/// Weekly actionable summary shown on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
    /// Concise, actionable focus for the week
    pub focus: String,
    /// Key product or category opportunity
    pub opportunity: String,
    /// Key product or category to be cautious about
    pub caution: String,
    /// Single clear next step
    pub action: String,
}

impl WeeklySummary {
    /// General-guidance summary used when generation fails
    pub fn fallback() -> Self {
        Self {
            focus: "Maintain steady stock and monitor demand patterns across top categories."
                .to_string(),
            opportunity: "Capitalize on trending and weather-relevant products this week."
                .to_string(),
            caution: "Avoid overstocking slow-moving or seasonal items nearing demand decline."
                .to_string(),
            action: "Review key listings and adjust pricing or bundles to improve visibility."
                .to_string(),
        }
    }
}

/// Summary request: the seller's products plus their location PIN code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRequest {
    #[serde(default)]
    pub products: Vec<Value>,
    pub pincode: String,
}

/// Generate the weekly summary, falling back on any failure
///
/// There is deliberately no retry here; a failed generation immediately
/// yields the static fallback.
pub async fn generate_summary(llm: &LlmClient, request: &SummaryRequest) -> WeeklySummary {
    let context = build_context(&request.products, &request.pincode);
    let prompt = summary_prompt(&context);

    match llm.generate(&prompt).await {
        Ok(response) => match serde_json::from_str::<WeeklySummary>(&extract_json(&response)) {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse weekly summary, using fallback");
                WeeklySummary::fallback()
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "Weekly summary generation failed, using fallback");
            WeeklySummary::fallback()
        }
    }
}

/// Render the seller's inventory and location as prompt context
#[must_use]
pub fn build_context(products: &[Value], pincode: &str) -> String {
    let mut lines = vec![format!("Seller PIN code: {pincode}")];

    if products.is_empty() {
        lines.push("Inventory: no products listed yet.".to_string());
    } else {
        lines.push(format!("Inventory: {} products.", products.len()));
        for product in products {
            let name = product
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("(unnamed)");
            let category = product
                .get("category")
                .and_then(Value::as_str)
                .unwrap_or("uncategorized");
            let stock = product.get("stock").and_then(Value::as_u64).unwrap_or(0);
            lines.push(format!("- {name} ({category}), stock {stock}"));
        }
    }

    lines.join("\n")
}

fn summary_prompt(context: &str) -> String {
    format!(
        r#"You are an expert e-commerce analyst for sellers in India.
Your task is to provide a short, actionable weekly summary based on the context.

Analyze the following context:
{context}

Instructions:
- Be concise, practical, and encouraging.
- Base your advice strictly on the product inventory and location.
- Do not invent data. If context is limited, give general business guidance.

Return STRICT JSON: {{"focus": "...", "opportunity": "...", "caution": "...", "action": "..."}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_context_empty_inventory() {
        let context = build_context(&[], "302001");
        assert!(context.contains("302001"));
        assert!(context.contains("no products"));
    }

    #[test]
    fn test_build_context_lists_products() {
        let products = vec![
            json!({"name": "Kurti", "category": "Fashion", "stock": 12}),
            json!({"category": "Footwear"}),
        ];
        let context = build_context(&products, "395003");
        assert!(context.contains("2 products"));
        assert!(context.contains("- Kurti (Fashion), stock 12"));
        assert!(context.contains("- (unnamed) (Footwear), stock 0"));
    }

    #[test]
    fn test_fallback_summary_fields() {
        let fallback = WeeklySummary::fallback();
        assert!(!fallback.focus.is_empty());
        assert!(!fallback.opportunity.is_empty());
        assert!(!fallback.caution.is_empty());
        assert!(!fallback.action.is_empty());
    }

    #[test]
    fn test_summary_prompt_embeds_context() {
        let prompt = summary_prompt("Seller PIN code: 110001");
        assert!(prompt.contains("Seller PIN code: 110001"));
        assert!(prompt.contains("STRICT JSON"));
    }
}
