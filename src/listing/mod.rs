//! Product listing content generation
//!
//! Turns a seller's plain-language product description (optionally with a
//! product photo) into SEO copy, WhatsApp marketing text, and natural
//! search phrases. The three parts are generated concurrently; a part that
//! fails is simply omitted rather than failing the whole listing.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::llm::{extract_json, LlmClient};

/// Temperature for the improve pass
const IMPROVE_TEMPERATURE: f32 = 0.6;

/// Temperature for translations; low to keep them literal
const TRANSLATE_TEMPERATURE: f32 = 0.2;

/// SEO-oriented listing copy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoContent {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// WhatsApp marketing copy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatsAppContent {
    pub caption: String,
    pub promotional_message: String,
}

/// Natural search phrases buyers might type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationalContent {
    #[serde(default)]
    pub search_phrases: Vec<String>,
}

/// Which content parts to generate
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ContentOptions {
    #[serde(default = "enabled")]
    pub seo: bool,
    #[serde(default = "enabled")]
    pub whatsapp: bool,
    #[serde(default = "enabled")]
    pub conversational: bool,
}

fn enabled() -> bool {
    true
}

impl Default for ContentOptions {
    fn default() -> Self {
        Self {
            seo: true,
            whatsapp: true,
            conversational: true,
        }
    }
}

/// Complete generated listing content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_content: Option<SeoContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp_content: Option<WhatsAppContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversational_content: Option<ConversationalContent>,
    pub category: String,
}

impl GeneratedContent {
    /// Whether any part was produced
    pub fn has_content(&self) -> bool {
        self.seo_content.is_some()
            || self.whatsapp_content.is_some()
            || self.conversational_content.is_some()
    }
}

/// Listing generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingRequest {
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub options: ContentOptions,
    /// Optional product photo, base64-encoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
}

impl ListingRequest {
    /// Required-field validation before any remote call
    pub fn validate(&self) -> Result<()> {
        if self.description.trim().is_empty() {
            return Err(Error::validation("product description is required"));
        }
        if self.category.trim().is_empty() {
            return Err(Error::validation("product category is required"));
        }
        Ok(())
    }
}

/// Generate listing content for a product description
pub async fn generate_listing(llm: &LlmClient, request: &ListingRequest) -> Result<GeneratedContent> {
    request.validate()?;

    let mut description = request.description.clone();
    if let Some(image) = &request.image_base64 {
        match analyze_image(llm, image).await {
            Ok(insight) => {
                description = format!("{description}\n\nImage insight: {insight}");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Image analysis failed, continuing without insight");
            }
        }
    }

    let options = request.options;
    let category = &request.category;

    let seo = async {
        if options.seo {
            generate_part::<SeoContent>(llm, &seo_prompt(&description, category), "seo").await
        } else {
            None
        }
    };
    let whatsapp = async {
        if options.whatsapp {
            generate_part::<WhatsAppContent>(llm, &whatsapp_prompt(&description, category), "whatsapp")
                .await
        } else {
            None
        }
    };
    let conversational = async {
        if options.conversational {
            generate_part::<ConversationalContent>(
                llm,
                &conversational_prompt(&description, category),
                "conversational",
            )
            .await
        } else {
            None
        }
    };

    let (seo_content, whatsapp_content, conversational_content) =
        futures::join!(seo, whatsapp, conversational);

    let content = GeneratedContent {
        seo_content,
        whatsapp_content,
        conversational_content,
        category: request.category.clone(),
    };

    if !content.has_content() {
        return Err(Error::other("Failed to generate listing content"));
    }

    Ok(content)
}

/// Rewrite existing content for better conversion, keeping its structure
pub async fn improve_listing(llm: &LlmClient, content: &GeneratedContent) -> Result<GeneratedContent> {
    let content_json = serde_json::to_string(content)?;
    let prompt = format!(
        "You are an expert e-commerce copywriter. Improve this content JSON without \
         changing its structure. Return only the improved JSON.\n\n{content_json}"
    );

    let response = llm
        .generate_with_temperature(&prompt, IMPROVE_TEMPERATURE)
        .await?;
    let improved: GeneratedContent = serde_json::from_str(&extract_json(&response))?;
    Ok(improved)
}

/// Translate every text field of the content into the target language
pub async fn translate_listing(
    llm: &LlmClient,
    content: &GeneratedContent,
    language: &str,
) -> Result<GeneratedContent> {
    let mut translated = content.clone();

    if let Some(seo) = &mut translated.seo_content {
        seo.title = translate_text(llm, &seo.title, language).await?;
        seo.description = translate_text(llm, &seo.description, language).await?;
    }

    if let Some(whatsapp) = &mut translated.whatsapp_content {
        whatsapp.caption = translate_text(llm, &whatsapp.caption, language).await?;
        whatsapp.promotional_message =
            translate_text(llm, &whatsapp.promotional_message, language).await?;
    }

    if let Some(conversational) = &mut translated.conversational_content {
        let mut phrases = Vec::with_capacity(conversational.search_phrases.len());
        for phrase in &conversational.search_phrases {
            phrases.push(translate_text(llm, phrase, language).await?);
        }
        conversational.search_phrases = phrases;
    }

    Ok(translated)
}

async fn translate_text(llm: &LlmClient, text: &str, language: &str) -> Result<String> {
    if text.is_empty() {
        return Ok(String::new());
    }
    let prompt =
        format!("Translate this text to {language}. Only reply with the translation.\n\n{text}");
    let response = llm
        .generate_with_temperature(&prompt, TRANSLATE_TEMPERATURE)
        .await?;
    Ok(response.trim().to_string())
}

/// Describe the product photo for the combined description
async fn analyze_image(llm: &LlmClient, image_base64: &str) -> Result<String> {
    let description = llm
        .describe_image(
            "You are a product vision expert. Describe this image for an e-commerce \
             listing in a detailed yet concise way.",
            image_base64,
        )
        .await?;
    Ok(description.trim().to_string())
}

/// One generation attempt for a content part; failures drop the part
async fn generate_part<T: DeserializeOwned>(llm: &LlmClient, prompt: &str, part: &str) -> Option<T> {
    match llm.generate(prompt).await {
        Ok(response) => match serde_json::from_str::<T>(&extract_json(&response)) {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::warn!(part = %part, error = %e, "Failed to parse generated content");
                None
            }
        },
        Err(e) => {
            tracing::warn!(part = %part, error = %e, "Content generation failed");
            None
        }
    }
}

fn seo_prompt(description: &str, category: &str) -> String {
    format!(
        r#"You are an SEO content expert for e-commerce in India.
Write SEO-friendly content for this product.
Description: "{description}"
Category: "{category}"

Return STRICT JSON: {{"title": "...", "description": "...", "tags": ["..."], "keywords": ["..."]}}"#
    )
}

fn whatsapp_prompt(description: &str, category: &str) -> String {
    format!(
        r#"You are a creative marketer for WhatsApp.
Create a catchy caption and promotional message (1-2 emojis).
Description: "{description}"
Category: "{category}"

Return STRICT JSON: {{"caption": "...", "promotional_message": "..."}}"#
    )
}

fn conversational_prompt(description: &str, category: &str) -> String {
    format!(
        r#"You are an AI search expert.
Write 3-5 natural search phrases Indian users might use to find this product.
Description: "{description}"
Category: "{category}"

Return STRICT JSON: {{"search_phrases": ["..."]}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_options_default_all_enabled() {
        let options: ContentOptions = serde_json::from_str("{}").unwrap();
        assert!(options.seo);
        assert!(options.whatsapp);
        assert!(options.conversational);
    }

    #[test]
    fn test_content_options_partial() {
        let options: ContentOptions = serde_json::from_str(r#"{"seo": false}"#).unwrap();
        assert!(!options.seo);
        assert!(options.whatsapp);
    }

    #[test]
    fn test_listing_request_validation() {
        let request = ListingRequest {
            description: String::new(),
            category: "Fashion".to_string(),
            options: ContentOptions::default(),
            image_base64: None,
        };
        assert!(request.validate().is_err());

        let request = ListingRequest {
            description: "Hand-embroidered cotton kurti".to_string(),
            category: "Fashion".to_string(),
            options: ContentOptions::default(),
            image_base64: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_has_content() {
        let empty = GeneratedContent {
            seo_content: None,
            whatsapp_content: None,
            conversational_content: None,
            category: "Fashion".to_string(),
        };
        assert!(!empty.has_content());

        let with_seo = GeneratedContent {
            seo_content: Some(SeoContent {
                title: "Kurti".to_string(),
                description: "Soft cotton".to_string(),
                tags: vec![],
                keywords: vec![],
            }),
            ..empty
        };
        assert!(with_seo.has_content());
    }

    #[test]
    fn test_generated_content_roundtrip() {
        let json = r#"{
            "seo_content": {"title": "t", "description": "d", "tags": [], "keywords": []},
            "category": "Fashion"
        }"#;
        let content: GeneratedContent = serde_json::from_str(json).unwrap();
        assert!(content.seo_content.is_some());
        assert!(content.whatsapp_content.is_none());

        let back = serde_json::to_value(&content).unwrap();
        assert!(back.get("whatsapp_content").is_none());
    }
}
