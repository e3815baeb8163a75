//! # Elements
//!
//! An element is one atomic content unit on a page: a headline, a button, a
//! hero block. On the wire an element is `{id, type, content, props?,
//! conditions?}` with `content` being either plain text or a JSON-encoded
//! payload whose schema depends on `type`.
//!
//! Content is parsed exactly once, at the load boundary, into [`Content`].
//! Internal code only ever sees typed payloads; the JSON text form is
//! produced again only when the element is written back out.

use crate::conditions::ConditionRule;
use crate::error::{ContentError, ModelError};
use crate::payload::BlockPayload;
use crate::style::TextStyle;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Per-element configuration map. Backed by an ordered map so serialization
/// is byte-stable.
pub type Props = serde_json::Map<String, Value>;

/// Element type tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementType {
    Headline,
    Subheadline,
    Text,
    Button,
    List,
    Image,
    Video,
    Divider,
    Spacer,
    Form,
    Hero,
    Features,
    Testimonial,
    Pricing,
    Faq,
    SocialProof,
    Countdown,
    TrustBadges,
    /// Tag not known to this build (kept verbatim so it survives a save)
    Unknown(String),
}

/// How an element type stores its `content`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Plain text (or a URL for media types)
    Text,
    /// JSON-encoded structured payload
    Structured,
}

impl ElementType {
    /// Every known type, in palette order
    pub const ALL: [ElementType; 18] = [
        ElementType::Headline,
        ElementType::Subheadline,
        ElementType::Text,
        ElementType::Button,
        ElementType::List,
        ElementType::Image,
        ElementType::Video,
        ElementType::Divider,
        ElementType::Spacer,
        ElementType::Form,
        ElementType::Hero,
        ElementType::Features,
        ElementType::Testimonial,
        ElementType::Pricing,
        ElementType::Faq,
        ElementType::SocialProof,
        ElementType::Countdown,
        ElementType::TrustBadges,
    ];

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "HEADLINE" => ElementType::Headline,
            "SUBHEADLINE" => ElementType::Subheadline,
            "TEXT" => ElementType::Text,
            "BUTTON" => ElementType::Button,
            "LIST" => ElementType::List,
            "IMAGE" => ElementType::Image,
            "VIDEO" => ElementType::Video,
            "DIVIDER" => ElementType::Divider,
            "SPACER" => ElementType::Spacer,
            "FORM" => ElementType::Form,
            "HERO" => ElementType::Hero,
            "FEATURES" => ElementType::Features,
            "TESTIMONIAL" => ElementType::Testimonial,
            "PRICING" => ElementType::Pricing,
            "FAQ" => ElementType::Faq,
            "SOCIAL_PROOF" => ElementType::SocialProof,
            "COUNTDOWN" => ElementType::Countdown,
            "TRUST_BADGES" => ElementType::TrustBadges,
            other => ElementType::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ElementType::Headline => "HEADLINE",
            ElementType::Subheadline => "SUBHEADLINE",
            ElementType::Text => "TEXT",
            ElementType::Button => "BUTTON",
            ElementType::List => "LIST",
            ElementType::Image => "IMAGE",
            ElementType::Video => "VIDEO",
            ElementType::Divider => "DIVIDER",
            ElementType::Spacer => "SPACER",
            ElementType::Form => "FORM",
            ElementType::Hero => "HERO",
            ElementType::Features => "FEATURES",
            ElementType::Testimonial => "TESTIMONIAL",
            ElementType::Pricing => "PRICING",
            ElementType::Faq => "FAQ",
            ElementType::SocialProof => "SOCIAL_PROOF",
            ElementType::Countdown => "COUNTDOWN",
            ElementType::TrustBadges => "TRUST_BADGES",
            ElementType::Unknown(tag) => tag,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ElementType::Unknown(_))
    }

    pub fn content_kind(&self) -> ContentKind {
        match self {
            ElementType::Form
            | ElementType::Hero
            | ElementType::Features
            | ElementType::Testimonial
            | ElementType::Pricing
            | ElementType::Faq
            | ElementType::SocialProof
            | ElementType::Countdown
            | ElementType::TrustBadges => ContentKind::Structured,
            _ => ContentKind::Text,
        }
    }

    /// Text-bearing types carry a `props.style` sub-object
    pub fn is_text_bearing(&self) -> bool {
        matches!(
            self,
            ElementType::Headline
                | ElementType::Subheadline
                | ElementType::Text
                | ElementType::Button
                | ElementType::List
        )
    }
}

impl From<String> for ElementType {
    fn from(tag: String) -> Self {
        ElementType::from_tag(&tag)
    }
}

impl From<ElementType> for String {
    fn from(ty: ElementType) -> Self {
        ty.as_str().to_string()
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed element content
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Plain text content
    Text(String),

    /// Typed structured payload
    Block(BlockPayload),

    /// Structured content that failed to parse. The raw text is kept so a
    /// save never destroys what the user had.
    Malformed { raw: String, error: String },
}

impl Content {
    /// Parse wire content for the given type
    pub fn parse(element_type: &ElementType, raw: &str) -> Self {
        match element_type.content_kind() {
            ContentKind::Text => Content::Text(raw.to_string()),
            ContentKind::Structured => match BlockPayload::parse(element_type, raw) {
                Ok(payload) => Content::Block(payload),
                Err(e) => Content::Malformed {
                    raw: raw.to_string(),
                    error: e.to_string(),
                },
            },
        }
    }

    /// Wire representation (text, or JSON for payloads)
    pub fn to_wire(&self) -> Result<String, ContentError> {
        match self {
            Content::Text(text) => Ok(text.clone()),
            Content::Block(payload) => payload.to_json(),
            Content::Malformed { raw, .. } => Ok(raw.clone()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&BlockPayload> {
        match self {
            Content::Block(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Content::Malformed { .. })
    }

    /// True if this content has the shape `element_type` stores
    pub fn fits(&self, element_type: &ElementType) -> bool {
        match (self, element_type.content_kind()) {
            (Content::Text(_), ContentKind::Text) => true,
            (Content::Block(payload), _) => payload.element_type() == *element_type,
            (Content::Malformed { .. }, ContentKind::Structured) => true,
            _ => false,
        }
    }
}

/// An element instance inside a document
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: String,
    pub element_type: ElementType,
    pub content: Content,
    pub props: Props,
    pub conditions: Vec<ConditionRule>,
}

impl Element {
    pub fn new(id: impl Into<String>, element_type: ElementType, content: Content) -> Self {
        Self {
            id: id.into(),
            element_type,
            content,
            props: Props::new(),
            conditions: Vec::new(),
        }
    }

    /// Shorthand for a plain-text element
    pub fn text(id: impl Into<String>, element_type: ElementType, text: impl Into<String>) -> Self {
        Self::new(id, element_type, Content::Text(text.into()))
    }

    pub fn with_props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn with_condition(mut self, rule: ConditionRule) -> Self {
        self.conditions.push(rule);
        self
    }

    /// String prop lookup
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }

    /// Style sub-object on `props.style` (empty when unset or not an object)
    pub fn style(&self) -> TextStyle {
        TextStyle::from_props(&self.props)
    }

    /// Parse an element from its wire shape. Never fails: bad structured
    /// content becomes [`Content::Malformed`].
    pub fn from_record(record: ElementRecord) -> Self {
        let element_type = ElementType::from_tag(&record.element_type);
        let content = Content::parse(&element_type, &record.content);

        Self {
            id: record.id,
            element_type,
            content,
            props: record.props.unwrap_or_default(),
            conditions: record.conditions.unwrap_or_default(),
        }
    }

    pub fn to_record(&self) -> Result<ElementRecord, ContentError> {
        Ok(ElementRecord {
            id: self.id.clone(),
            element_type: self.element_type.as_str().to_string(),
            content: self.content.to_wire()?,
            props: Some(self.props.clone()),
            conditions: if self.conditions.is_empty() {
                None
            } else {
                Some(self.conditions.clone())
            },
        })
    }
}

/// Element wire shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub element_type: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Props>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<ConditionRule>>,
}

/// Parse a persisted `Element[]` JSON string
pub fn parse_elements(json: &str) -> Result<Vec<Element>, ModelError> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }

    let records: Vec<ElementRecord> =
        serde_json::from_str(json).map_err(|e| ModelError::InvalidDocument(e.to_string()))?;

    Ok(records.into_iter().map(Element::from_record).collect())
}

/// Serialize elements to the persisted `Element[]` JSON string.
///
/// Output is deterministic: the same elements always produce the same bytes.
pub fn serialize_elements(elements: &[Element]) -> Result<String, ModelError> {
    let records = elements
        .iter()
        .map(Element::to_record)
        .collect::<Result<Vec<_>, _>>()?;

    serde_json::to_string(&records).map_err(|e| ModelError::Serialize(e.to_string()))
}
