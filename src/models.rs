// Core data structures for the mandi dashboard backend

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::reshape::coerce;

/// One observation of a named market trend for a given city
///
/// Records arrive from the trend pipeline (or directly from clients of the
/// reshape endpoint) with loosely typed numeric fields; `pct_change` and
/// `popularity_score` are coerced at the deserialization edge so every
/// reader sees a plain `f64`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TrendRecord {
    /// Location this observation belongs to
    #[serde(default)]
    pub city: String,

    /// Trend name; absent in upstream data becomes "Unknown"
    #[serde(default = "default_trend_name")]
    pub trend: String,

    /// Percent change, coerced from number or numeric string, 0.0 otherwise
    #[serde(default, deserialize_with = "coerce::lenient_f64")]
    pub pct_change: f64,

    /// Human-readable percent string, e.g. "45.2%"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_pct: Option<String>,

    /// Popularity label; contains "High"/"Medium"/"Low", display styling only
    #[serde(default)]
    pub popularity: String,

    /// Numeric popularity score, 0 when absent
    #[serde(default, deserialize_with = "coerce::lenient_f64")]
    pub popularity_score: f64,

    /// Product features driving the trend
    #[serde(default)]
    pub features: Vec<String>,

    /// Competing sellers or brands
    #[serde(default)]
    pub competitors: Vec<String>,

    /// Local markets or areas where the trend is visible
    #[serde(default)]
    pub local_hotspots: Vec<String>,

    /// Seller tips
    #[serde(default)]
    pub tips: Vec<String>,

    /// When present and non-empty the rest of the record is unusable;
    /// the city is reported as failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn default_trend_name() -> String {
    "Unknown".to_string()
}

impl TrendRecord {
    /// Create a failed-city record carrying only an error message
    pub fn error_record(city: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            error: Some(message.into()),
            ..Default::default()
        }
    }

    /// Whether this record is a per-city failure marker
    pub fn is_error(&self) -> bool {
        self.error.as_deref().is_some_and(|e| !e.is_empty())
    }

    /// Coarse popularity tier derived from the label substring
    pub fn popularity_tier(&self) -> PopularityTier {
        if self.popularity.contains("High") {
            PopularityTier::High
        } else if self.popularity.contains("Medium") {
            PopularityTier::Medium
        } else {
            PopularityTier::Low
        }
    }
}

/// Popularity tier with its display label and numeric score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PopularityTier {
    High,
    Medium,
    Low,
}

impl PopularityTier {
    /// Classify a percent change into a tier
    ///
    /// # Classification
    /// - `pct >= 35.0`: High
    /// - `15.0 <= pct < 35.0`: Medium
    /// - `pct < 15.0`: Low
    #[must_use]
    pub fn from_pct(pct: f64) -> Self {
        if pct >= 35.0 {
            Self::High
        } else if pct >= 15.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Display label including the emoji used by the dashboard
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "High 🔥",
            Self::Medium => "Medium ⚡",
            Self::Low => "Low ❄️",
        }
    }

    /// Numeric popularity score for chart sizing
    pub fn score(&self) -> f64 {
        match self {
            Self::High => 85.0,
            Self::Medium => 55.0,
            Self::Low => 20.0,
        }
    }
}

/// Trend query accepted by `POST /api/trends`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendQuery {
    pub cities: Vec<String>,
    pub category: String,
}

impl TrendQuery {
    /// Reject queries that would produce nothing before any remote call
    pub fn validate(&self) -> Result<()> {
        if self.cities.is_empty() {
            return Err(Error::validation("at least one city is required"));
        }
        if self.category.trim().is_empty() {
            return Err(Error::validation("category is required"));
        }
        Ok(())
    }
}

/// Response envelope of `POST /api/trends`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TrendsResponse {
    pub trends: Vec<TrendRecord>,
}

/// Explicit user identity passed through request handling
///
/// Replaces the ambient authentication lookup of the original dashboard;
/// handlers receive the session rather than consulting a global.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSession {
    pub user_id: String,
    pub email: String,
}

/// Store profile document, keyed by the session user id
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreProfile {
    pub business_name: String,
    pub owner_name: String,
    pub pin_code: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub gst_number: String,
    #[serde(default)]
    pub store_addresses: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl StoreProfile {
    /// Required-field validation before any store call
    pub fn validate(&self) -> Result<()> {
        if self.business_name.trim().is_empty() {
            return Err(Error::validation("business name is required"));
        }
        if self.owner_name.trim().is_empty() {
            return Err(Error::validation("owner name is required"));
        }
        if self.pin_code.trim().is_empty() {
            return Err(Error::validation("PIN code is required"));
        }
        Ok(())
    }
}

/// New product submission accepted by `POST /api/products`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub stock: u32,
    /// Raw image bytes, base64-encoded; uploaded to the object store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
    /// MIME type of the uploaded image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_content_type: Option<String>,
}

impl NewProduct {
    /// Required-field validation before any store call
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("product name is required"));
        }
        if self.category.trim().is_empty() {
            return Err(Error::validation("product category is required"));
        }
        if self.price < 0.0 || !self.price.is_finite() {
            return Err(Error::validation("price must be a non-negative number"));
        }
        Ok(())
    }
}

/// Product document as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDocument {
    pub id: uuid::Uuid,
    pub owner_id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub price: f64,
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_record_defaults() {
        let record: TrendRecord = serde_json::from_str(r#"{"city": "Jaipur"}"#).unwrap();
        assert_eq!(record.city, "Jaipur");
        assert_eq!(record.trend, "Unknown");
        assert_eq!(record.pct_change, 0.0);
        assert!(record.features.is_empty());
        assert!(!record.is_error());
    }

    #[test]
    fn test_pct_change_string_coercion() {
        let record: TrendRecord =
            serde_json::from_str(r#"{"city": "Surat", "trend": "Bandhani", "pct_change": "12.5"}"#)
                .unwrap();
        assert_eq!(record.pct_change, 12.5);
    }

    #[test]
    fn test_error_record() {
        let record = TrendRecord::error_record("Delhi", "upstream timed out");
        assert!(record.is_error());
        assert_eq!(record.city, "Delhi");
        assert_eq!(record.trend, "");

        let empty = TrendRecord {
            error: Some(String::new()),
            ..Default::default()
        };
        assert!(!empty.is_error());
    }

    #[test]
    fn test_popularity_tier_from_pct() {
        assert_eq!(PopularityTier::from_pct(48.0), PopularityTier::High);
        assert_eq!(PopularityTier::from_pct(35.0), PopularityTier::High);
        assert_eq!(PopularityTier::from_pct(20.0), PopularityTier::Medium);
        assert_eq!(PopularityTier::from_pct(3.4), PopularityTier::Low);
        assert_eq!(PopularityTier::High.score(), 85.0);
        assert_eq!(PopularityTier::Medium.label(), "Medium ⚡");
    }

    #[test]
    fn test_popularity_tier_from_label() {
        let record = TrendRecord {
            popularity: "High 🔥".to_string(),
            ..Default::default()
        };
        assert_eq!(record.popularity_tier(), PopularityTier::High);
    }

    #[test]
    fn test_trend_query_validation() {
        let query = TrendQuery {
            cities: vec![],
            category: "Fashion".to_string(),
        };
        assert!(query.validate().is_err());

        let query = TrendQuery {
            cities: vec!["Jaipur".to_string()],
            category: "  ".to_string(),
        };
        assert!(query.validate().is_err());

        let query = TrendQuery {
            cities: vec!["Jaipur".to_string()],
            category: "Fashion".to_string(),
        };
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_profile_validation() {
        let profile = StoreProfile {
            business_name: "Meera Textiles".to_string(),
            owner_name: "Meera Shah".to_string(),
            pin_code: "302001".to_string(),
            ..Default::default()
        };
        assert!(profile.validate().is_ok());

        let missing = StoreProfile::default();
        assert!(missing.validate().is_err());
    }

    #[test]
    fn test_new_product_validation() {
        let product = NewProduct {
            name: "Block-print dupatta".to_string(),
            category: "Fashion".to_string(),
            description: String::new(),
            price: 349.0,
            stock: 40,
            image_base64: None,
            image_content_type: None,
        };
        assert!(product.validate().is_ok());

        let bad_price = NewProduct {
            price: -1.0,
            ..product.clone()
        };
        assert!(bad_price.validate().is_err());
    }
}
