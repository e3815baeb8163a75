//! # Rendering Dispatcher
//!
//! Turns a page (ordered elements) into a [`VirtualDomDocument`]: one root
//! node per rendered element, keyed by element id.
//!
//! ## Failure containment
//!
//! Rendering never fails as a whole. An element whose structured content
//! does not parse renders an inline `Invalid <TYPE> data` error node, and an
//! element with an unknown tag renders `Unknown element type: <TAG>`. Every
//! other element on the page renders normally.
//!
//! ## Modes
//!
//! - [`RenderMode::Preview`]: rules applied, hidden elements omitted.
//! - [`RenderMode::Canvas`]: every element rendered; hidden ones are marked
//!   `data-hidden="true"` so the editor can dim them.

use crate::blocks;
use crate::conditions::{evaluate_rules, RuleOutcome};
use crate::device::Device;
use crate::error::EvalError;
use crate::styles::resolved_text_style;
use crate::variables::Scope;
use crate::vdom::{VNode, VirtualDomDocument};
use chrono::{DateTime, Utc};
use funnel_catalog::Registry;
use funnel_model::{BlockPayload, Content, ContentKind, Element, ElementType};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    #[default]
    Preview,
    Canvas,
}

impl FromStr for RenderMode {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "preview" => Ok(RenderMode::Preview),
            "canvas" => Ok(RenderMode::Canvas),
            _ => Err(EvalError::UnknownMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub device: Device,
    pub mode: RenderMode,
    /// Clock used by countdowns
    pub now: DateTime<Utc>,
}

impl RenderOptions {
    pub fn new(device: Device, now: DateTime<Utc>) -> Self {
        Self {
            device,
            mode: RenderMode::Preview,
            now,
        }
    }

    pub fn canvas(mut self) -> Self {
        self.mode = RenderMode::Canvas;
        self
    }
}

/// Output of rendering one page
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub document: VirtualDomDocument,
    /// Target of the first matching `goto` rule
    pub redirect: Option<String>,
}

/// Per-element render context handed to the family renderers
pub(crate) struct RenderCtx<'a> {
    pub element: &'a Element,
    pub scope: &'a Scope,
    pub device: Device,
    pub now: DateTime<Utc>,
    pub desktop_columns: Option<usize>,
}

impl RenderCtx<'_> {
    pub fn text(&self, raw: &str) -> String {
        self.scope.substitute(raw)
    }

    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.element.prop_str(key)
    }
}

pub struct Renderer<'a> {
    registry: &'a Registry,
    options: RenderOptions,
}

impl<'a> Renderer<'a> {
    pub fn new(registry: &'a Registry, options: RenderOptions) -> Self {
        Self { registry, options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render a whole page with its rules applied
    pub fn render_page(&self, elements: &[Element], scope: &Scope) -> RenderedPage {
        let outcome = evaluate_rules(elements, scope);
        let mut document = VirtualDomDocument::new();

        for element in elements {
            let visible = outcome.is_visible(&element.id);
            match (visible, self.options.mode) {
                (true, _) => document.add_node(self.render_element(element, scope)),
                (false, RenderMode::Canvas) => document.add_node(
                    self.render_element(element, scope)
                        .with_attr("data-hidden", "true"),
                ),
                (false, RenderMode::Preview) => {
                    debug!(element_id = %element.id, "Element hidden by rule");
                }
            }
        }

        document.add_style(".funnel-page", self.page_style());

        debug!(
            elements = elements.len(),
            rendered = document.nodes.len(),
            device = %self.options.device,
            "Rendered page"
        );

        RenderedPage {
            document,
            redirect: outcome.redirect,
        }
    }

    /// Rule evaluation without rendering
    pub fn evaluate(&self, elements: &[Element], scope: &Scope) -> RuleOutcome {
        evaluate_rules(elements, scope)
    }

    fn page_style(&self) -> BTreeMap<String, String> {
        let mut props = BTreeMap::new();
        props.insert(
            "max-width".to_string(),
            self.options.device.container_width().to_string(),
        );
        props.insert("margin".to_string(), "0 auto".to_string());
        props.insert("width".to_string(), "100%".to_string());
        props
    }

    /// Render one element wrapped in its keyed root node
    pub fn render_element(&self, element: &Element, scope: &Scope) -> VNode {
        VNode::element("div")
            .with_key(element.id.clone())
            .with_attr("class", "funnel-element")
            .with_attr("data-element-id", element.id.clone())
            .with_attr("data-element-type", element.element_type.as_str())
            .with_child(self.render_body(element, scope))
    }

    fn render_body(&self, element: &Element, scope: &Scope) -> VNode {
        let Some(descriptor) = self.registry.descriptor(&element.element_type) else {
            warn!(
                element_id = %element.id,
                element_type = %element.element_type,
                "Unknown element type"
            );
            return VNode::error(
                format!("Unknown element type: {}", element.element_type),
                Some(element.id.clone()),
            );
        };

        let ctx = RenderCtx {
            element,
            scope,
            device: self.options.device,
            now: self.options.now,
            desktop_columns: descriptor.desktop_columns,
        };

        match element.element_type.content_kind() {
            ContentKind::Text => self.render_text_family(&ctx),
            ContentKind::Structured => match structured_payload(element) {
                Some(payload) => blocks::render_block(&payload, &ctx),
                None => invalid_data(element),
            },
        }
    }

    fn render_text_family(&self, ctx: &RenderCtx<'_>) -> VNode {
        let element = ctx.element;
        let Content::Text(raw) = &element.content else {
            return invalid_data(element);
        };

        match &element.element_type {
            ElementType::Headline => styled(element, heading(element, 1)).with_child(VNode::text(ctx.text(raw))),
            ElementType::Subheadline => {
                styled(element, heading(element, 2)).with_child(VNode::text(ctx.text(raw)))
            }
            ElementType::Text => styled(element, VNode::element("p")).with_child(VNode::text(ctx.text(raw))),
            ElementType::Button => render_button(ctx, raw),
            ElementType::List => render_list(ctx, raw),
            ElementType::Image => render_image(ctx, raw),
            ElementType::Video => render_video(ctx, raw),
            ElementType::Divider => render_divider(ctx),
            ElementType::Spacer => render_spacer(ctx),
            _ => invalid_data(element),
        }
    }
}

/// Typed payload for a structured element. Text content on a structured
/// type (built in code rather than loaded) is parsed on the fly.
fn structured_payload(element: &Element) -> Option<BlockPayload> {
    match &element.content {
        Content::Block(payload) if payload.element_type() == element.element_type => {
            Some(payload.clone())
        }
        Content::Text(raw) => match Content::parse(&element.element_type, raw) {
            Content::Block(payload) => Some(payload),
            _ => None,
        },
        _ => None,
    }
}

fn invalid_data(element: &Element) -> VNode {
    if let Content::Malformed { error, .. } = &element.content {
        warn!(element_id = %element.id, %error, "Malformed element content");
    }
    VNode::error(
        format!("Invalid {} data", element.element_type),
        Some(element.id.clone()),
    )
}

fn heading(element: &Element, default_level: u64) -> VNode {
    let level = element
        .props
        .get("level")
        .and_then(Value::as_u64)
        .unwrap_or(default_level)
        .clamp(1, 6);
    VNode::element(format!("h{}", level))
}

/// Apply the element's resolved text style
fn styled(element: &Element, node: VNode) -> VNode {
    resolved_text_style(&element.element_type, &element.style())
        .css_properties()
        .into_iter()
        .fold(node, |node, (name, value)| node.with_style(name, value))
}

fn render_button(ctx: &RenderCtx<'_>, label: &str) -> VNode {
    let variant = ctx.prop_str("variant").unwrap_or("primary");
    let size = ctx.prop_str("size").unwrap_or("medium");
    let action = ctx.prop_str("action").unwrap_or("url");
    let href = safe_href(ctx.text(ctx.prop_str("url").unwrap_or("#")));

    let node = VNode::element("a")
        .with_attr("class", format!("btn btn-{} btn-{}", variant, size))
        .with_attr("href", href)
        .with_attr("data-action", action)
        .with_style("display", "inline-block")
        .with_style("padding", "16px 32px")
        .with_style("border-radius", "8px")
        .with_style("text-decoration", "none");

    styled(ctx.element, node).with_child(VNode::text(ctx.text(label)))
}

/// Links may be relative, anchors, or use a web/mail/phone scheme; anything
/// else (`javascript:`, `data:`) becomes `#`
pub(crate) fn safe_href(url: String) -> String {
    let url = url.trim();
    let scheme_end = url.find(|c| matches!(c, ':' | '/' | '?' | '#'));
    let allowed = match scheme_end {
        Some(end) if url[end..].starts_with(':') => {
            let scheme = url[..end].to_ascii_lowercase();
            matches!(scheme.as_str(), "http" | "https" | "mailto" | "tel")
        }
        _ => true,
    };

    if allowed {
        url.to_string()
    } else {
        warn!(url, "Unsafe link replaced");
        "#".to_string()
    }
}

fn render_list(ctx: &RenderCtx<'_>, raw: &str) -> VNode {
    let ordered = ctx
        .element
        .props
        .get("ordered")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let items = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(i, line)| {
            VNode::element("li")
                .with_key(i.to_string())
                .with_child(VNode::text(ctx.text(line)))
        })
        .collect();

    styled(ctx.element, VNode::element(if ordered { "ol" } else { "ul" })).with_children(items)
}

fn render_image(ctx: &RenderCtx<'_>, src: &str) -> VNode {
    VNode::element("img")
        .with_attr("src", src.trim())
        .with_attr("alt", ctx.text(ctx.prop_str("alt").unwrap_or("")))
        .with_style("width", ctx.prop_str("width").unwrap_or("100%"))
        .with_style("max-width", "100%")
        .with_style("height", "auto")
}

fn render_video(ctx: &RenderCtx<'_>, src: &str) -> VNode {
    let flag = |key: &str, default: bool| {
        ctx.element
            .props
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(default)
    };

    let mut frame = VNode::element("iframe")
        .with_attr("src", src.trim())
        .with_attr("frameborder", "0")
        .with_attr("allowfullscreen", "true")
        .with_style("position", "absolute")
        .with_style("inset", "0")
        .with_style("width", "100%")
        .with_style("height", "100%");
    if flag("autoplay", false) {
        frame = frame.with_attr("allow", "autoplay");
    }
    if !flag("controls", true) {
        frame = frame.with_attr("data-controls", "false");
    }

    VNode::element("div")
        .with_attr("class", "video-wrapper")
        .with_style("position", "relative")
        .with_style("padding-top", "56.25%")
        .with_child(frame)
}

fn pixels(value: Option<&Value>, default: u64) -> String {
    match value {
        Some(Value::Number(n)) => format!("{}px", n),
        Some(Value::String(s)) if s.chars().all(|c| c.is_ascii_digit()) && !s.is_empty() => {
            format!("{}px", s)
        }
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => format!("{}px", default),
    }
}

fn render_divider(ctx: &RenderCtx<'_>) -> VNode {
    let thickness = pixels(ctx.element.props.get("thickness"), 1);
    let color = ctx.prop_str("color").unwrap_or("#e5e7eb");

    VNode::element("hr")
        .with_style("border", "none")
        .with_style("border-top", format!("{} solid {}", thickness, color))
        .with_style("margin", "24px 0")
}

fn render_spacer(ctx: &RenderCtx<'_>) -> VNode {
    VNode::element("div")
        .with_attr("class", "spacer")
        .with_style("height", pixels(ctx.element.props.get("height"), 40))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use funnel_model::{Condition, ConditionRule, Operator, RuleType};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    fn render_one(element: &Element, device: Device) -> VNode {
        let registry = Registry::standard();
        Renderer::new(&registry, RenderOptions::new(device, now()))
            .render_element(element, &Scope::new())
    }

    #[test]
    fn test_every_type_renders_its_defaults() {
        let registry = Registry::standard();
        for device in Device::ALL {
            let renderer = Renderer::new(&registry, RenderOptions::new(device, now()));
            for ty in ElementType::ALL.iter() {
                let element = registry.create_element(ty.clone(), "el", now());
                let node = renderer.render_element(&element, &Scope::new());

                assert_eq!(node.key(), Some("el"));
                assert!(
                    !node.children()[0].is_error(),
                    "{} rendered an error on {}",
                    ty,
                    device
                );
            }
        }
    }

    #[test]
    fn test_malformed_content_renders_error_node() {
        let element = Element::from_record(funnel_model::ElementRecord {
            id: "hero-1".into(),
            element_type: "HERO".into(),
            content: "{oops".into(),
            props: None,
            conditions: None,
        });

        let node = render_one(&element, Device::Desktop);
        assert_eq!(node.text_content(), "Invalid HERO data");
    }

    #[test]
    fn test_unknown_type_renders_diagnostic() {
        let element = Element::text("c1", ElementType::Unknown("CAROUSEL".into()), "");
        let node = render_one(&element, Device::Desktop);
        assert_eq!(node.text_content(), "Unknown element type: CAROUSEL");
    }

    #[test]
    fn test_style_props_merge_over_defaults() {
        let element = Element::text("h", ElementType::Headline, "Hi")
            .with_prop("style", json!({"color": "#ff0000", "fontSize": 30}));
        let node = render_one(&element, Device::Desktop);
        let h1 = &node.children()[0];

        assert_eq!(h1.tag(), Some("h1"));
        assert_eq!(h1.style("color"), Some("#ff0000"));
        assert_eq!(h1.style("font-size"), Some("30px"));
        assert_eq!(h1.style("font-weight"), Some("700"));
    }

    #[test]
    fn test_variables_are_substituted_in_text() {
        let registry = Registry::standard();
        let renderer = Renderer::new(&registry, RenderOptions::new(Device::Desktop, now()));
        let element = Element::text("t", ElementType::Text, "Hi {{first_name}}");

        let scope = Scope::new().with_fields([("first_name", "Ann")]);
        assert_eq!(renderer.render_element(&element, &scope).text_content(), "Hi Ann");
    }

    #[test]
    fn test_preview_omits_and_canvas_marks_hidden() {
        let registry = Registry::standard();
        let page = vec![
            Element::text("a", ElementType::Text, "always"),
            Element::text("b", ElementType::Text, "vip only").with_condition(
                ConditionRule::new("r", "b", RuleType::Show)
                    .with_condition(Condition::new("plan", Operator::Equals, "vip")),
            ),
        ];

        let preview = Renderer::new(&registry, RenderOptions::new(Device::Desktop, now()))
            .render_page(&page, &Scope::new());
        assert_eq!(preview.document.nodes.len(), 1);

        let canvas = Renderer::new(&registry, RenderOptions::new(Device::Desktop, now()).canvas())
            .render_page(&page, &Scope::new());
        assert_eq!(canvas.document.nodes.len(), 2);
        assert_eq!(
            canvas.document.node_for("b").and_then(|n| n.attr("data-hidden")),
            Some("true")
        );
    }

    #[test]
    fn test_container_width_follows_device() {
        let registry = Registry::standard();
        let page = Renderer::new(&registry, RenderOptions::new(Device::Tablet, now()))
            .render_page(&[], &Scope::new());

        assert_eq!(
            page.document.styles[0].properties.get("max-width").map(String::as_str),
            Some("768px")
        );
    }

    #[test]
    fn test_list_splits_lines() {
        let element = Element::text("l", ElementType::List, "One\n\n Two \nThree");
        let node = render_one(&element, Device::Desktop);
        let list = &node.children()[0];

        assert_eq!(list.tag(), Some("ul"));
        assert_eq!(list.children().len(), 3);
        assert_eq!(list.children()[1].text_content(), "Two");
    }

    #[test]
    fn test_button_carries_action() {
        let registry = Registry::standard();
        let element = registry.create_element(ElementType::Button, "b", now());
        let node = render_one(&element, Device::Desktop);

        assert_eq!(node.children()[0].attr("data-action"), Some("next_page"));
    }

    #[test]
    fn test_button_links_reject_script_schemes() {
        let href = |url: &str| {
            let element = Element::text("b", ElementType::Button, "Go").with_prop("url", url);
            let node = render_one(&element, Device::Desktop);
            node.find(&|n| n.attr("href").is_some())
                .and_then(|n| n.attr("href"))
                .map(str::to_string)
        };

        assert_eq!(href("javascript:alert(1)").as_deref(), Some("#"));
        assert_eq!(href(" JavaScript:alert(1)").as_deref(), Some("#"));
        assert_eq!(href("data:text/html,hi").as_deref(), Some("#"));
        assert_eq!(href("https://x.test/a?b=c:d").as_deref(), Some("https://x.test/a?b=c:d"));
        assert_eq!(href("/thanks").as_deref(), Some("/thanks"));
        assert_eq!(href("#order").as_deref(), Some("#order"));
        assert_eq!(href("mailto:hi@x.test").as_deref(), Some("mailto:hi@x.test"));
    }
}
