//! Persisted records and the funnel (multi-step) view over them.

use crate::element::{parse_elements, serialize_elements, Element};
use crate::error::ModelError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One persisted page/step, as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelRecord {
    pub id: String,
    pub name: String,
    /// JSON string of `Element[]`
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: String,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_url: Option<String>,
}

/// Document-level publishing state. `Draft -> Published` is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishState {
    Draft,
    Published,
}

impl FunnelRecord {
    /// New unpublished record
    pub fn draft(
        id: impl Into<String>,
        name: impl Into<String>,
        user_id: impl Into<String>,
        elements: &[Element],
        now: DateTime<Utc>,
    ) -> Result<Self, ModelError> {
        Ok(Self {
            id: id.into(),
            name: name.into(),
            content: serialize_elements(elements)?,
            created_at: now,
            updated_at: now,
            user_id: user_id.into(),
            is_published: false,
            published_url: None,
        })
    }

    pub fn elements(&self) -> Result<Vec<Element>, ModelError> {
        parse_elements(&self.content)
    }

    pub fn publish_state(&self) -> PublishState {
        if self.is_published {
            PublishState::Published
        } else {
            PublishState::Draft
        }
    }
}

/// Kind of page a funnel step represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    Landing,
    OptIn,
    Sales,
    Order,
    Upsell,
    ThankYou,
    Webinar,
    Replay,
}

impl PageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::Landing => "landing",
            PageType::OptIn => "opt_in",
            PageType::Sales => "sales",
            PageType::Order => "order",
            PageType::Upsell => "upsell",
            PageType::ThankYou => "thank_you",
            PageType::Webinar => "webinar",
            PageType::Replay => "replay",
        }
    }
}

/// One step of a funnel, backed by one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelStep {
    pub document_id: String,
    pub name: String,
    pub page_type: PageType,
}

/// Named, ordered collection of steps a visitor moves through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Funnel {
    pub id: String,
    pub name: String,
    pub steps: Vec<FunnelStep>,
}

impl Funnel {
    pub fn step_index(&self, document_id: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.document_id == document_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementType;

    #[test]
    fn test_record_round_trip() {
        let now = Utc::now();
        let elements = vec![Element::text("h1", ElementType::Headline, "Hi")];
        let record = FunnelRecord::draft("doc", "Page", "user-1", &elements, now).unwrap();

        assert_eq!(record.publish_state(), PublishState::Draft);
        assert_eq!(record.elements().unwrap(), elements);

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"is_published\":false"));
        assert!(!json.contains("published_url"));
    }
}
