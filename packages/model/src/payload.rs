//! Typed payloads for structured (block-family) element types.
//!
//! Each structured type stores its content as a JSON object with the schema
//! below (camelCase keys). Missing optional fields fall back to their
//! defaults so content written by older editors still loads.

use crate::element::ElementType;
use crate::error::ContentError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured content, one variant per block-family type
#[derive(Debug, Clone, PartialEq)]
pub enum BlockPayload {
    Hero(HeroContent),
    Features(FeaturesContent),
    Testimonial(TestimonialContent),
    Pricing(PricingContent),
    Faq(FaqContent),
    SocialProof(SocialProofContent),
    Countdown(CountdownContent),
    TrustBadges(TrustBadgesContent),
    Form(FormContent),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroContent {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub subheadline: String,
    #[serde(default)]
    pub button_text: String,
    #[serde(default)]
    pub trust_badges: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturesContent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub features: Vec<FeatureItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureItem {
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialContent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub testimonials: Vec<TestimonialItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialItem {
    #[serde(default)]
    pub quote: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub role: String,
    /// Star rating, 0-5
    #[serde(default)]
    pub rating: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingContent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub plans: Vec<PricingPlan>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPlan {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub button_text: String,
    #[serde(default)]
    pub highlighted: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqContent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub items: Vec<FaqItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqItem {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialProofContent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub stats: Vec<Stat>,
    #[serde(default)]
    pub logos: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stat {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownContent {
    #[serde(default)]
    pub title: String,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub expired_message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustBadgesContent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub badges: Vec<Badge>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormContent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub fields: Vec<FormField>,
    #[serde(default)]
    pub submit_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default = "default_field_type")]
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub placeholder: String,
}

fn default_field_type() -> String {
    "text".to_string()
}

impl BlockPayload {
    /// Parse the JSON content of a structured element
    pub fn parse(element_type: &ElementType, raw: &str) -> Result<Self, ContentError> {
        let malformed = |e: serde_json::Error| ContentError::Malformed {
            element_type: element_type.as_str().to_string(),
            message: e.to_string(),
        };

        let payload = match element_type {
            ElementType::Hero => BlockPayload::Hero(serde_json::from_str(raw).map_err(malformed)?),
            ElementType::Features => {
                BlockPayload::Features(serde_json::from_str(raw).map_err(malformed)?)
            }
            ElementType::Testimonial => {
                BlockPayload::Testimonial(serde_json::from_str(raw).map_err(malformed)?)
            }
            ElementType::Pricing => {
                BlockPayload::Pricing(serde_json::from_str(raw).map_err(malformed)?)
            }
            ElementType::Faq => BlockPayload::Faq(serde_json::from_str(raw).map_err(malformed)?),
            ElementType::SocialProof => {
                BlockPayload::SocialProof(serde_json::from_str(raw).map_err(malformed)?)
            }
            ElementType::Countdown => {
                BlockPayload::Countdown(serde_json::from_str(raw).map_err(malformed)?)
            }
            ElementType::TrustBadges => {
                BlockPayload::TrustBadges(serde_json::from_str(raw).map_err(malformed)?)
            }
            ElementType::Form => BlockPayload::Form(serde_json::from_str(raw).map_err(malformed)?),
            other => return Err(ContentError::NotStructured(other.as_str().to_string())),
        };

        Ok(payload)
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            BlockPayload::Hero(_) => ElementType::Hero,
            BlockPayload::Features(_) => ElementType::Features,
            BlockPayload::Testimonial(_) => ElementType::Testimonial,
            BlockPayload::Pricing(_) => ElementType::Pricing,
            BlockPayload::Faq(_) => ElementType::Faq,
            BlockPayload::SocialProof(_) => ElementType::SocialProof,
            BlockPayload::Countdown(_) => ElementType::Countdown,
            BlockPayload::TrustBadges(_) => ElementType::TrustBadges,
            BlockPayload::Form(_) => ElementType::Form,
        }
    }

    pub fn to_json(&self) -> Result<String, ContentError> {
        let result = match self {
            BlockPayload::Hero(c) => serde_json::to_string(c),
            BlockPayload::Features(c) => serde_json::to_string(c),
            BlockPayload::Testimonial(c) => serde_json::to_string(c),
            BlockPayload::Pricing(c) => serde_json::to_string(c),
            BlockPayload::Faq(c) => serde_json::to_string(c),
            BlockPayload::SocialProof(c) => serde_json::to_string(c),
            BlockPayload::Countdown(c) => serde_json::to_string(c),
            BlockPayload::TrustBadges(c) => serde_json::to_string(c),
            BlockPayload::Form(c) => serde_json::to_string(c),
        };

        result.map_err(|e| ContentError::Malformed {
            element_type: self.element_type().as_str().to_string(),
            message: e.to_string(),
        })
    }

    /// Payload as a JSON value (edit drafts work on this form)
    pub fn to_value(&self) -> Result<serde_json::Value, ContentError> {
        let result = match self {
            BlockPayload::Hero(c) => serde_json::to_value(c),
            BlockPayload::Features(c) => serde_json::to_value(c),
            BlockPayload::Testimonial(c) => serde_json::to_value(c),
            BlockPayload::Pricing(c) => serde_json::to_value(c),
            BlockPayload::Faq(c) => serde_json::to_value(c),
            BlockPayload::SocialProof(c) => serde_json::to_value(c),
            BlockPayload::Countdown(c) => serde_json::to_value(c),
            BlockPayload::TrustBadges(c) => serde_json::to_value(c),
            BlockPayload::Form(c) => serde_json::to_value(c),
        };

        result.map_err(|e| ContentError::Malformed {
            element_type: self.element_type().as_str().to_string(),
            message: e.to_string(),
        })
    }

    /// Validate a JSON value against the schema of `element_type`
    pub fn from_value(
        element_type: &ElementType,
        value: &serde_json::Value,
    ) -> Result<Self, ContentError> {
        Self::parse(element_type, &value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hero_schema() {
        let raw = r#"{"headline":"Grow","subheadline":"Faster","buttonText":"Start","trustBadges":["SSL"]}"#;
        let payload = BlockPayload::parse(&ElementType::Hero, raw).unwrap();

        match payload {
            BlockPayload::Hero(hero) => {
                assert_eq!(hero.headline, "Grow");
                assert_eq!(hero.button_text, "Start");
                assert_eq!(hero.trust_badges, vec!["SSL".to_string()]);
            }
            other => panic!("Expected hero, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let payload = BlockPayload::parse(&ElementType::Faq, r#"{"title":"Questions"}"#).unwrap();
        match payload {
            BlockPayload::Faq(faq) => assert!(faq.items.is_empty()),
            other => panic!("Expected faq, got {:?}", other),
        }
    }

    #[test]
    fn test_countdown_requires_end_time() {
        let err = BlockPayload::parse(&ElementType::Countdown, r#"{"title":"Hurry"}"#).unwrap_err();
        assert!(matches!(err, ContentError::Malformed { .. }));

        let ok = BlockPayload::parse(
            &ElementType::Countdown,
            r#"{"title":"Hurry","endTime":"2030-01-01T00:00:00Z"}"#,
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn test_text_type_is_not_structured() {
        let err = BlockPayload::parse(&ElementType::Headline, "{}").unwrap_err();
        assert!(matches!(err, ContentError::NotStructured(_)));
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        let err = BlockPayload::parse(&ElementType::Pricing, r#"{"plans":"three"}"#).unwrap_err();
        assert!(err.to_string().contains("PRICING"));
    }
}
