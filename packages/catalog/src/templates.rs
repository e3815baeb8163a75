//! # Template Catalog
//!
//! Immutable, pre-built multi-page funnel blueprints. Instantiation always
//! hands out a deep copy; the catalog itself is never mutated after
//! construction.

use crate::registry::Registry;
use chrono::{DateTime, Utc};
use funnel_model::{
    Condition, ConditionRule, Element, ElementType, IdGenerator, Operator, PageType, RuleType,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Template identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateType {
    SalesFunnel,
    LeadMagnet,
    Webinar,
    ProductLaunch,
}

impl TemplateType {
    pub const ALL: [TemplateType; 4] = [
        TemplateType::SalesFunnel,
        TemplateType::LeadMagnet,
        TemplateType::Webinar,
        TemplateType::ProductLaunch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateType::SalesFunnel => "SALES_FUNNEL",
            TemplateType::LeadMagnet => "LEAD_MAGNET",
            TemplateType::Webinar => "WEBINAR",
            TemplateType::ProductLaunch => "PRODUCT_LAUNCH",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One page of a template
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub name: String,
    pub page_type: PageType,
    pub content: Vec<Element>,
}

impl Page {
    /// Copy of this page with every element re-identified from `ids`.
    ///
    /// Rule `sourceId`/`targetId` values that point at elements of this page
    /// follow the rename; anything else (step ids for `goto`) is left alone.
    pub fn with_fresh_ids(&self, ids: &mut IdGenerator) -> Page {
        let renames: HashMap<&str, String> = self
            .content
            .iter()
            .map(|el| (el.id.as_str(), ids.new_id()))
            .collect();

        let rename = |id: &str| renames.get(id).cloned().unwrap_or_else(|| id.to_string());

        let content = self
            .content
            .iter()
            .map(|el| {
                let mut copy = el.clone();
                copy.id = rename(&el.id);
                for (i, rule) in copy.conditions.iter_mut().enumerate() {
                    rule.id = format!("{}-rule-{}", copy.id, i + 1);
                    rule.source_id = rename(&rule.source_id);
                    if rule.rule_type != RuleType::Goto {
                        rule.target_id = rule.target_id.as_deref().map(rename);
                    }
                }
                copy
            })
            .collect();

        Page {
            name: self.name.clone(),
            page_type: self.page_type,
            content,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub template_type: TemplateType,
    pub name: String,
    pub description: String,
    pub pages: Vec<Page>,
}

/// Listing entry for pickers and the CLI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateSummary {
    pub template_type: TemplateType,
    pub name: String,
    pub description: String,
    pub pages: Vec<String>,
}

/// The built-in template set
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
}

impl TemplateCatalog {
    /// Build the standard templates from registry defaults.
    ///
    /// `now` anchors any countdown defaults inside the blueprints.
    pub fn standard(registry: &Registry, now: DateTime<Utc>) -> Self {
        let templates = vec![
            sales_funnel(registry, now),
            lead_magnet(registry, now),
            webinar(registry, now),
            product_launch(registry, now),
        ];

        tracing::debug!(count = templates.len(), "Built template catalog");
        Self { templates }
    }

    pub fn get(&self, template_type: TemplateType) -> Option<&Template> {
        self.templates
            .iter()
            .find(|t| t.template_type == template_type)
    }

    /// Deep copy of a template's pages, blueprint ids kept
    pub fn instantiate(&self, template_type: TemplateType) -> Option<Vec<Page>> {
        self.get(template_type).map(|t| t.pages.clone())
    }

    /// Deep copy with fresh element ids drawn from `ids`
    pub fn instantiate_with_ids(
        &self,
        template_type: TemplateType,
        ids: &mut IdGenerator,
    ) -> Option<Vec<Page>> {
        let template = self.get(template_type)?;
        Some(
            template
                .pages
                .iter()
                .map(|page| page.with_fresh_ids(ids))
                .collect(),
        )
    }

    pub fn list(&self) -> Vec<TemplateSummary> {
        self.templates
            .iter()
            .map(|t| TemplateSummary {
                template_type: t.template_type,
                name: t.name.clone(),
                description: t.description.clone(),
                pages: t.pages.iter().map(|p| p.name.clone()).collect(),
            })
            .collect()
    }
}

/// Builds one page's elements with blueprint ids `<prefix>-<page>-<n>`
struct PageBuilder<'a> {
    registry: &'a Registry,
    now: DateTime<Utc>,
    prefix: String,
    elements: Vec<Element>,
}

impl<'a> PageBuilder<'a> {
    fn new(registry: &'a Registry, now: DateTime<Utc>, template: &str, page: usize) -> Self {
        Self {
            registry,
            now,
            prefix: format!("{}-{}", template, page),
            elements: Vec::new(),
        }
    }

    fn next_id(&self) -> String {
        format!("{}-{}", self.prefix, self.elements.len() + 1)
    }

    fn add(mut self, element_type: ElementType) -> Self {
        let element = self
            .registry
            .create_element(element_type, self.next_id(), self.now);
        self.elements.push(element);
        self
    }

    fn text(mut self, element_type: ElementType, text: &str) -> Self {
        let element = self
            .registry
            .create_element(element_type, self.next_id(), self.now);
        self.elements.push(Element {
            content: funnel_model::Content::Text(text.to_string()),
            ..element
        });
        self
    }

    fn prop(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        if let Some(last) = self.elements.last_mut() {
            last.props.insert(key.to_string(), value.into());
        }
        self
    }

    /// Attach a rule to the last element, targeting itself
    fn rule(mut self, rule_type: RuleType, condition: Condition) -> Self {
        if let Some(last) = self.elements.last_mut() {
            let rule = ConditionRule::new(
                format!("{}-rule-{}", last.id, last.conditions.len() + 1),
                last.id.clone(),
                rule_type,
            )
            .with_condition(condition)
            .with_target(last.id.clone());
            last.conditions.push(rule);
        }
        self
    }

    fn page(self, name: &str, page_type: PageType) -> Page {
        Page {
            name: name.to_string(),
            page_type,
            content: self.elements,
        }
    }
}

fn thank_you(registry: &Registry, now: DateTime<Utc>, template: &str, index: usize) -> Page {
    PageBuilder::new(registry, now, template, index)
        .text(ElementType::Headline, "Thank You!")
        .text(
            ElementType::Text,
            "Your order is confirmed. Check your inbox for the receipt.",
        )
        .page("Thank You", PageType::ThankYou)
}

fn sales_funnel(registry: &Registry, now: DateTime<Utc>) -> Template {
    use ElementType as T;

    let sales_page = PageBuilder::new(registry, now, "sales", 0)
        .add(T::Hero)
        .add(T::Features)
        .add(T::Testimonial)
        .add(T::Pricing)
        .add(T::Faq)
        .text(T::Button, "Yes, I Want This!")
        .page("Sales Page", PageType::Sales);

    let order_form = PageBuilder::new(registry, now, "sales", 1)
        .text(T::Headline, "Complete Your Order")
        .add(T::Form)
        .add(T::TrustBadges)
        .page("Order Form", PageType::Order);

    let upsell = PageBuilder::new(registry, now, "sales", 2)
        .text(T::Headline, "Wait! Special One-Time Offer")
        .text(T::Text, "Add the advanced course at 50% off, only on this page.")
        .add(T::Countdown)
        .text(T::Button, "Yes, Add To My Order")
        .text(T::Button, "No Thanks")
        .prop("variant", "outline")
        .page("Upsell", PageType::Upsell);

    Template {
        template_type: TemplateType::SalesFunnel,
        name: "Sales Funnel".to_string(),
        description: "Sales page, order form, one-click upsell and thank-you page".to_string(),
        pages: vec![
            sales_page,
            order_form,
            upsell,
            thank_you(registry, now, "sales", 3),
        ],
    }
}

fn lead_magnet(registry: &Registry, now: DateTime<Utc>) -> Template {
    use ElementType as T;

    let opt_in = PageBuilder::new(registry, now, "lead", 0)
        .text(T::Headline, "Get Your Free Guide")
        .text(T::Subheadline, "The 7-step checklist our best customers use")
        .add(T::Image)
        .add(T::List)
        .add(T::Form)
        .page("Opt-in", PageType::OptIn);

    let delivery = PageBuilder::new(registry, now, "lead", 1)
        .text(T::Headline, "Your Guide Is On Its Way")
        .text(T::Text, "Watch the short video below while you wait.")
        .add(T::Video)
        .page("Thank You", PageType::ThankYou);

    Template {
        template_type: TemplateType::LeadMagnet,
        name: "Lead Magnet".to_string(),
        description: "Opt-in page and delivery page for a free download".to_string(),
        pages: vec![opt_in, delivery],
    }
}

fn webinar(registry: &Registry, now: DateTime<Utc>) -> Template {
    use ElementType as T;

    let registration = PageBuilder::new(registry, now, "webinar", 0)
        .add(T::Hero)
        .add(T::Countdown)
        .add(T::Form)
        .add(T::SocialProof)
        .page("Registration", PageType::Webinar);

    let confirmation = PageBuilder::new(registry, now, "webinar", 1)
        .text(T::Headline, "You're Registered!")
        .text(
            T::Text,
            "Thanks {{first_name}}, we'll email your link before we go live.",
        )
        .rule(
            RuleType::Hide,
            Condition::new("first_name", Operator::Empty, ""),
        )
        .page("Confirmation", PageType::ThankYou);

    let replay = PageBuilder::new(registry, now, "webinar", 2)
        .text(T::Headline, "Watch The Replay")
        .add(T::Video)
        .text(T::Button, "Get The Offer")
        .page("Replay", PageType::Replay);

    Template {
        template_type: TemplateType::Webinar,
        name: "Webinar".to_string(),
        description: "Registration, confirmation and replay pages".to_string(),
        pages: vec![registration, confirmation, replay],
    }
}

fn product_launch(registry: &Registry, now: DateTime<Utc>) -> Template {
    use ElementType as T;

    let launch = PageBuilder::new(registry, now, "launch", 0)
        .add(T::Hero)
        .add(T::Video)
        .add(T::Features)
        .add(T::Testimonial)
        .text(T::Button, "Reserve My Spot")
        .page("Launch", PageType::Landing);

    let order = PageBuilder::new(registry, now, "launch", 1)
        .add(T::Pricing)
        .add(T::Form)
        .add(T::TrustBadges)
        .page("Order", PageType::Order);

    Template {
        template_type: TemplateType::ProductLaunch,
        name: "Product Launch".to_string(),
        description: "Launch page with video, order page and thank-you page".to_string(),
        pages: vec![launch, order, thank_you(registry, now, "launch", 2)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn catalog() -> TemplateCatalog {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        TemplateCatalog::standard(&Registry::standard(), now)
    }

    #[test]
    fn test_every_template_has_two_to_four_pages() {
        let catalog = catalog();
        for ty in TemplateType::ALL {
            let pages = catalog.instantiate(ty).unwrap();
            assert!((2..=4).contains(&pages.len()), "{} has {} pages", ty, pages.len());
        }
    }

    #[test]
    fn test_instantiate_is_a_deep_copy() {
        let catalog = catalog();
        let mut pages = catalog.instantiate(TemplateType::SalesFunnel).unwrap();
        pages[0].content[0]
            .props
            .insert("mutated".to_string(), true.into());
        pages[0].content.clear();

        let fresh = catalog.instantiate(TemplateType::SalesFunnel).unwrap();
        assert!(!fresh[0].content.is_empty());
        assert!(!fresh[0].content[0].props.contains_key("mutated"));
    }

    #[test]
    fn test_two_instantiations_are_equal() {
        let catalog = catalog();
        assert_eq!(
            catalog.instantiate(TemplateType::Webinar),
            catalog.instantiate(TemplateType::Webinar)
        );
    }

    #[test]
    fn test_buttons_navigate_forward_symbolically() {
        let catalog = catalog();
        let pages = catalog.instantiate(TemplateType::SalesFunnel).unwrap();
        let button = pages[0]
            .content
            .iter()
            .find(|el| el.element_type == ElementType::Button)
            .unwrap();

        assert_eq!(button.prop_str("action"), Some("next_page"));
    }

    #[test]
    fn test_fresh_ids_rewire_rules() {
        let catalog = catalog();
        let mut ids = IdGenerator::from_seed("doc".to_string());
        let pages = catalog
            .instantiate_with_ids(TemplateType::Webinar, &mut ids)
            .unwrap();

        let confirmation = &pages[1];
        let text = &confirmation.content[1];
        assert!(text.id.starts_with("doc-"));

        let rule = &text.conditions[0];
        assert_eq!(rule.source_id, text.id);
        assert_eq!(rule.target_id.as_deref(), Some(text.id.as_str()));

        let mut all_ids: Vec<&str> = pages
            .iter()
            .flat_map(|p| p.content.iter().map(|el| el.id.as_str()))
            .collect();
        let total = all_ids.len();
        all_ids.sort();
        all_ids.dedup();
        assert_eq!(all_ids.len(), total);
    }

    #[test]
    fn test_list_and_tags() {
        let catalog = catalog();
        let list = catalog.list();
        assert_eq!(list.len(), 4);
        assert_eq!(list[0].pages[1], "Order Form");

        assert_eq!(TemplateType::from_tag("LEAD_MAGNET"), Some(TemplateType::LeadMagnet));
        assert_eq!(TemplateType::from_tag("NOPE"), None);
    }
}
