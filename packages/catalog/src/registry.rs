//! # Element Type Registry
//!
//! Immutable table mapping each element type to its default content, default
//! props, and render/edit descriptor. The registry is a plain value handed to
//! whoever needs it; there is no global instance.
//!
//! ## Determinism
//!
//! `default_content` and `default_props` are pure for every type except
//! `COUNTDOWN`, whose default end time is `now + 7 days`. The clock is always
//! passed in, so callers that need reproducible output pin `now`.

use chrono::{DateTime, Duration, Utc};
use funnel_model::{
    Badge, BlockPayload, Content, CountdownContent, Element, ElementType, FaqContent, FaqItem,
    FeatureItem, FeaturesContent, FormContent, FormField, HeroContent, PricingContent,
    PricingPlan, Props, SocialProofContent, Stat, TestimonialContent, TestimonialItem,
    TrustBadgesContent,
};
use serde_json::{json, Value};

/// Default countdown length
pub const COUNTDOWN_DEFAULT_DAYS: i64 = 7;

/// Palette grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Text,
    Media,
    Layout,
    Form,
    Block,
}

/// Form control used to edit a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    TextArea,
    Url,
    Number,
    Checkbox,
    Color,
    DateTime,
    Select(&'static [&'static str]),
    /// Array of items, edited as JSON
    Items,
}

/// Where an edited value lives on the element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTarget {
    /// The whole text content
    Content,
    /// A key of `props`
    Prop(&'static str),
    /// A key of the structured payload
    Payload(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub label: &'static str,
    pub target: FieldTarget,
    pub input: InputKind,
}

const fn field(label: &'static str, target: FieldTarget, input: InputKind) -> FieldSpec {
    FieldSpec {
        label,
        target,
        input,
    }
}

/// Render/edit descriptor for one element type
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    pub element_type: ElementType,
    pub label: &'static str,
    pub category: Category,
    /// Column count on desktop for multi-column blocks
    pub desktop_columns: Option<usize>,
    pub fields: &'static [FieldSpec],
}

impl TypeDescriptor {
    pub fn is_structured(&self) -> bool {
        self.element_type.content_kind() == funnel_model::ContentKind::Structured
    }

    pub fn is_text_bearing(&self) -> bool {
        self.element_type.is_text_bearing()
    }
}

pub const BUTTON_ACTIONS: &[&str] = &["next_page", "previous_page", "url"];

const TEXT_FIELDS: &[FieldSpec] = &[field("Text", FieldTarget::Content, InputKind::TextArea)];

const BUTTON_FIELDS: &[FieldSpec] = &[
    field("Label", FieldTarget::Content, InputKind::Text),
    field("Action", FieldTarget::Prop("action"), InputKind::Select(BUTTON_ACTIONS)),
    field("Link", FieldTarget::Prop("url"), InputKind::Url),
    field(
        "Variant",
        FieldTarget::Prop("variant"),
        InputKind::Select(&["primary", "secondary", "outline"]),
    ),
];

const LIST_FIELDS: &[FieldSpec] = &[
    field("Items (one per line)", FieldTarget::Content, InputKind::TextArea),
    field("Numbered", FieldTarget::Prop("ordered"), InputKind::Checkbox),
];

const IMAGE_FIELDS: &[FieldSpec] = &[
    field("Image URL", FieldTarget::Content, InputKind::Url),
    field("Alt text", FieldTarget::Prop("alt"), InputKind::Text),
    field("Width", FieldTarget::Prop("width"), InputKind::Text),
];

const VIDEO_FIELDS: &[FieldSpec] = &[
    field("Video URL", FieldTarget::Content, InputKind::Url),
    field("Autoplay", FieldTarget::Prop("autoplay"), InputKind::Checkbox),
    field("Show controls", FieldTarget::Prop("controls"), InputKind::Checkbox),
];

const DIVIDER_FIELDS: &[FieldSpec] = &[
    field("Thickness", FieldTarget::Prop("thickness"), InputKind::Number),
    field("Color", FieldTarget::Prop("color"), InputKind::Color),
];

const SPACER_FIELDS: &[FieldSpec] = &[field("Height", FieldTarget::Prop("height"), InputKind::Number)];

const FORM_FIELDS: &[FieldSpec] = &[
    field("Title", FieldTarget::Payload("title"), InputKind::Text),
    field("Fields", FieldTarget::Payload("fields"), InputKind::Items),
    field("Submit label", FieldTarget::Payload("submitText"), InputKind::Text),
    field("After submit", FieldTarget::Prop("action"), InputKind::Select(BUTTON_ACTIONS)),
];

const HERO_FIELDS: &[FieldSpec] = &[
    field("Headline", FieldTarget::Payload("headline"), InputKind::Text),
    field("Subheadline", FieldTarget::Payload("subheadline"), InputKind::TextArea),
    field("Button text", FieldTarget::Payload("buttonText"), InputKind::Text),
    field("Trust badges", FieldTarget::Payload("trustBadges"), InputKind::Items),
];

const FEATURES_FIELDS: &[FieldSpec] = &[
    field("Title", FieldTarget::Payload("title"), InputKind::Text),
    field("Features", FieldTarget::Payload("features"), InputKind::Items),
];

const TESTIMONIAL_FIELDS: &[FieldSpec] = &[
    field("Title", FieldTarget::Payload("title"), InputKind::Text),
    field("Testimonials", FieldTarget::Payload("testimonials"), InputKind::Items),
];

const PRICING_FIELDS: &[FieldSpec] = &[
    field("Title", FieldTarget::Payload("title"), InputKind::Text),
    field("Plans", FieldTarget::Payload("plans"), InputKind::Items),
];

const FAQ_FIELDS: &[FieldSpec] = &[
    field("Title", FieldTarget::Payload("title"), InputKind::Text),
    field("Questions", FieldTarget::Payload("items"), InputKind::Items),
];

const SOCIAL_PROOF_FIELDS: &[FieldSpec] = &[
    field("Title", FieldTarget::Payload("title"), InputKind::Text),
    field("Stats", FieldTarget::Payload("stats"), InputKind::Items),
    field("Logos", FieldTarget::Payload("logos"), InputKind::Items),
];

const COUNTDOWN_FIELDS: &[FieldSpec] = &[
    field("Title", FieldTarget::Payload("title"), InputKind::Text),
    field("Ends at", FieldTarget::Payload("endTime"), InputKind::DateTime),
    field("Expired message", FieldTarget::Payload("expiredMessage"), InputKind::Text),
];

const TRUST_BADGES_FIELDS: &[FieldSpec] = &[
    field("Title", FieldTarget::Payload("title"), InputKind::Text),
    field("Badges", FieldTarget::Payload("badges"), InputKind::Items),
];

fn descriptor(
    element_type: ElementType,
    label: &'static str,
    category: Category,
    desktop_columns: Option<usize>,
    fields: &'static [FieldSpec],
) -> TypeDescriptor {
    TypeDescriptor {
        element_type,
        label,
        category,
        desktop_columns,
        fields,
    }
}

/// Element type catalog
#[derive(Debug, Clone)]
pub struct Registry {
    descriptors: Vec<TypeDescriptor>,
}

impl Registry {
    /// Registry with every built-in type
    pub fn standard() -> Self {
        use ElementType as T;

        Self {
            descriptors: vec![
                descriptor(T::Headline, "Headline", Category::Text, None, TEXT_FIELDS),
                descriptor(T::Subheadline, "Subheadline", Category::Text, None, TEXT_FIELDS),
                descriptor(T::Text, "Paragraph", Category::Text, None, TEXT_FIELDS),
                descriptor(T::Button, "Button", Category::Text, None, BUTTON_FIELDS),
                descriptor(T::List, "Bullet List", Category::Text, None, LIST_FIELDS),
                descriptor(T::Image, "Image", Category::Media, None, IMAGE_FIELDS),
                descriptor(T::Video, "Video", Category::Media, None, VIDEO_FIELDS),
                descriptor(T::Divider, "Divider", Category::Layout, None, DIVIDER_FIELDS),
                descriptor(T::Spacer, "Spacer", Category::Layout, None, SPACER_FIELDS),
                descriptor(T::Form, "Opt-in Form", Category::Form, None, FORM_FIELDS),
                descriptor(T::Hero, "Hero Section", Category::Block, None, HERO_FIELDS),
                descriptor(T::Features, "Features", Category::Block, Some(3), FEATURES_FIELDS),
                descriptor(T::Testimonial, "Testimonials", Category::Block, Some(3), TESTIMONIAL_FIELDS),
                descriptor(T::Pricing, "Pricing Table", Category::Block, Some(3), PRICING_FIELDS),
                descriptor(T::Faq, "FAQ", Category::Block, None, FAQ_FIELDS),
                descriptor(T::SocialProof, "Social Proof", Category::Block, Some(4), SOCIAL_PROOF_FIELDS),
                descriptor(T::Countdown, "Countdown Timer", Category::Block, None, COUNTDOWN_FIELDS),
                descriptor(T::TrustBadges, "Trust Badges", Category::Block, Some(4), TRUST_BADGES_FIELDS),
            ],
        }
    }

    /// Registry restricted to the given types (palette subsets, tests)
    pub fn only(types: &[ElementType]) -> Self {
        let mut registry = Self::standard();
        registry
            .descriptors
            .retain(|d| types.contains(&d.element_type));
        registry
    }

    pub fn descriptor(&self, element_type: &ElementType) -> Option<&TypeDescriptor> {
        self.descriptors
            .iter()
            .find(|d| &d.element_type == element_type)
    }

    pub fn contains(&self, element_type: &ElementType) -> bool {
        self.descriptor(element_type).is_some()
    }

    /// Registered types, in palette order
    pub fn types(&self) -> impl Iterator<Item = &ElementType> {
        self.descriptors.iter().map(|d| &d.element_type)
    }

    pub fn descriptors(&self) -> &[TypeDescriptor] {
        &self.descriptors
    }

    /// Default content for a new element of this type.
    ///
    /// Unregistered types get empty text. `COUNTDOWN` is anchored at
    /// `now + 7 days`.
    pub fn default_content(&self, element_type: &ElementType, now: DateTime<Utc>) -> Content {
        if !self.contains(element_type) {
            return Content::Text(String::new());
        }

        let text = |s: &str| Content::Text(s.to_string());

        match element_type {
            ElementType::Headline => text("Your Compelling Headline Here"),
            ElementType::Subheadline => text("A supporting line that explains the offer"),
            ElementType::Text => text("Tell your visitors what makes this offer worth their time."),
            ElementType::Button => text("Get Started Now"),
            ElementType::List => text("First key benefit\nSecond key benefit\nThird key benefit"),
            ElementType::Image => text("https://placehold.co/800x400"),
            ElementType::Video => text("https://www.youtube.com/embed/VIDEO_ID"),
            ElementType::Divider | ElementType::Spacer => text(""),
            ElementType::Form => Content::Block(BlockPayload::Form(FormContent {
                title: "Get Instant Access".to_string(),
                fields: vec![
                    form_field("first_name", "First name", "text", false),
                    form_field("email", "Email address", "email", true),
                ],
                submit_text: "Send Me The Guide".to_string(),
            })),
            ElementType::Hero => Content::Block(BlockPayload::Hero(HeroContent {
                headline: "Transform Your Business Today".to_string(),
                subheadline: "Join thousands of customers who already grew with us".to_string(),
                button_text: "Start Free Trial".to_string(),
                trust_badges: vec![
                    "No credit card required".to_string(),
                    "Cancel anytime".to_string(),
                ],
            })),
            ElementType::Features => Content::Block(BlockPayload::Features(FeaturesContent {
                title: "Everything You Need".to_string(),
                features: vec![
                    feature("zap", "Fast Setup", "Launch in minutes, not weeks."),
                    feature("shield", "Secure", "Your data is protected end to end."),
                    feature("chart", "Insights", "Know exactly what converts."),
                ],
            })),
            ElementType::Testimonial => {
                Content::Block(BlockPayload::Testimonial(TestimonialContent {
                    title: "What Our Customers Say".to_string(),
                    testimonials: vec![
                        testimonial("This doubled our sign-ups.", "Sarah J.", "Founder"),
                        testimonial("Setup took ten minutes.", "Mike T.", "Marketer"),
                        testimonial("Best investment this year.", "Priya K.", "Coach"),
                    ],
                }))
            }
            ElementType::Pricing => Content::Block(BlockPayload::Pricing(PricingContent {
                title: "Choose Your Plan".to_string(),
                plans: vec![
                    plan("Starter", "$29", false, &["1 funnel", "Email support"]),
                    plan("Pro", "$79", true, &["10 funnels", "Priority support", "A/B tests"]),
                    plan("Agency", "$199", false, &["Unlimited funnels", "Team seats"]),
                ],
            })),
            ElementType::Faq => Content::Block(BlockPayload::Faq(FaqContent {
                title: "Frequently Asked Questions".to_string(),
                items: vec![
                    FaqItem {
                        question: "Can I cancel anytime?".to_string(),
                        answer: "Yes, cancel with one click from your account.".to_string(),
                    },
                    FaqItem {
                        question: "Is there a guarantee?".to_string(),
                        answer: "Every plan has a 30-day money-back guarantee.".to_string(),
                    },
                ],
            })),
            ElementType::SocialProof => {
                Content::Block(BlockPayload::SocialProof(SocialProofContent {
                    title: "Trusted By Thousands".to_string(),
                    stats: vec![
                        stat("10,000+", "Customers"),
                        stat("98%", "Satisfaction"),
                        stat("24/7", "Support"),
                        stat("50+", "Countries"),
                    ],
                    logos: Vec::new(),
                }))
            }
            ElementType::Countdown => Content::Block(BlockPayload::Countdown(CountdownContent {
                title: "Offer Ends In".to_string(),
                end_time: now + Duration::days(COUNTDOWN_DEFAULT_DAYS),
                expired_message: "This offer has expired.".to_string(),
            })),
            ElementType::TrustBadges => {
                Content::Block(BlockPayload::TrustBadges(TrustBadgesContent {
                    title: "Shop With Confidence".to_string(),
                    badges: vec![
                        badge("lock", "Secure Checkout"),
                        badge("refresh", "30-Day Guarantee"),
                        badge("truck", "Fast Delivery"),
                        badge("headset", "Real Support"),
                    ],
                }))
            }
            ElementType::Unknown(_) => Content::Text(String::new()),
        }
    }

    /// Default props for a new element of this type (empty when unregistered)
    pub fn default_props(&self, element_type: &ElementType) -> Props {
        if !self.contains(element_type) {
            return Props::new();
        }

        let value = match element_type {
            ElementType::Headline => json!({ "level": 1 }),
            ElementType::Subheadline => json!({ "level": 2 }),
            ElementType::Button => json!({
                "action": "next_page",
                "url": "#",
                "variant": "primary",
                "size": "large",
            }),
            ElementType::List => json!({ "ordered": false }),
            ElementType::Image => json!({ "alt": "", "width": "100%" }),
            ElementType::Video => json!({ "autoplay": false, "controls": true }),
            ElementType::Divider => json!({ "thickness": 1, "color": "#e5e7eb" }),
            ElementType::Spacer => json!({ "height": 40 }),
            ElementType::Form => json!({ "action": "next_page" }),
            ElementType::Hero => json!({ "background": "#f8fafc", "action": "next_page" }),
            ElementType::Countdown => json!({ "showDays": true }),
            _ => json!({}),
        };

        match value {
            Value::Object(map) => map,
            _ => Props::new(),
        }
    }

    /// Build a fresh element with this type's defaults
    pub fn create_element(
        &self,
        element_type: ElementType,
        id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Element {
        let content = self.default_content(&element_type, now);
        let props = self.default_props(&element_type);
        Element::new(id, element_type, content).with_props(props)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

fn form_field(name: &str, label: &str, field_type: &str, required: bool) -> FormField {
    FormField {
        name: name.to_string(),
        label: label.to_string(),
        field_type: field_type.to_string(),
        required,
        placeholder: String::new(),
    }
}

fn feature(icon: &str, title: &str, description: &str) -> FeatureItem {
    FeatureItem {
        icon: icon.to_string(),
        title: title.to_string(),
        description: description.to_string(),
    }
}

fn testimonial(quote: &str, author: &str, role: &str) -> TestimonialItem {
    TestimonialItem {
        quote: quote.to_string(),
        author: author.to_string(),
        role: role.to_string(),
        rating: 5,
    }
}

fn plan(name: &str, price: &str, highlighted: bool, features: &[&str]) -> PricingPlan {
    PricingPlan {
        name: name.to_string(),
        price: price.to_string(),
        period: "month".to_string(),
        features: features.iter().map(|f| f.to_string()).collect(),
        button_text: "Choose Plan".to_string(),
        highlighted,
    }
}

fn stat(value: &str, label: &str) -> Stat {
    Stat {
        value: value.to_string(),
        label: label.to_string(),
    }
}

fn badge(icon: &str, label: &str) -> Badge {
    Badge {
        icon: icon.to_string(),
        label: label.to_string(),
    }
}
