//! Renderers for structured (block-family) payloads.

use crate::renderer::{safe_href, RenderCtx};
use crate::vdom::VNode;
use chrono::{DateTime, Utc};
use funnel_model::{
    BlockPayload, CountdownContent, FaqContent, FeaturesContent, FormContent, FormField,
    HeroContent, PricingContent, SocialProofContent, TestimonialContent, TrustBadgesContent,
};

const MAX_PRICING_COLUMNS: usize = 3;

pub(crate) fn render_block(payload: &BlockPayload, ctx: &RenderCtx<'_>) -> VNode {
    match payload {
        BlockPayload::Hero(hero) => render_hero(hero, ctx),
        BlockPayload::Features(features) => render_features(features, ctx),
        BlockPayload::Testimonial(testimonials) => render_testimonials(testimonials, ctx),
        BlockPayload::Pricing(pricing) => render_pricing(pricing, ctx),
        BlockPayload::Faq(faq) => render_faq(faq, ctx),
        BlockPayload::SocialProof(proof) => render_social_proof(proof, ctx),
        BlockPayload::Countdown(countdown) => render_countdown(countdown, ctx),
        BlockPayload::TrustBadges(badges) => render_trust_badges(badges, ctx),
        BlockPayload::Form(form) => render_form(form, ctx),
    }
}

fn section(class: &str) -> VNode {
    VNode::element("section")
        .with_attr("class", class)
        .with_style("padding", "48px 16px")
}

fn title(ctx: &RenderCtx<'_>, text: &str) -> Option<VNode> {
    if text.is_empty() {
        return None;
    }
    Some(
        VNode::element("h2")
            .with_style("text-align", "center")
            .with_child(VNode::text(ctx.text(text))),
    )
}

fn text_el(tag: &str, ctx: &RenderCtx<'_>, text: &str) -> VNode {
    VNode::element(tag).with_child(VNode::text(ctx.text(text)))
}

/// Grid container laid out for the current device
fn grid(columns: usize) -> VNode {
    VNode::element("div")
        .with_attr("class", "grid")
        .with_attr("data-columns", columns.to_string())
        .with_style("display", "grid")
        .with_style(
            "grid-template-columns",
            format!("repeat({}, minmax(0, 1fr))", columns),
        )
        .with_style("gap", "24px")
}

fn device_columns(ctx: &RenderCtx<'_>, fallback: usize) -> usize {
    ctx.device.columns(ctx.desktop_columns.unwrap_or(fallback))
}

fn with_title(node: VNode, ctx: &RenderCtx<'_>, text: &str) -> VNode {
    match title(ctx, text) {
        Some(heading) => node.with_child(heading),
        None => node,
    }
}

fn action_button(ctx: &RenderCtx<'_>, label: &str) -> VNode {
    VNode::element("a")
        .with_attr("class", "btn btn-primary")
        .with_attr("href", safe_href(ctx.text(ctx.prop_str("url").unwrap_or("#"))))
        .with_attr("data-action", ctx.prop_str("action").unwrap_or("next_page"))
        .with_child(VNode::text(ctx.text(label)))
}

fn render_hero(hero: &HeroContent, ctx: &RenderCtx<'_>) -> VNode {
    let mut node = section("hero")
        .with_style("text-align", "center")
        .with_style("background", ctx.prop_str("background").unwrap_or("#f8fafc"))
        .with_child(text_el("h1", ctx, &hero.headline));

    if !hero.subheadline.is_empty() {
        node = node.with_child(text_el("p", ctx, &hero.subheadline));
    }
    if !hero.button_text.is_empty() {
        node = node.with_child(action_button(ctx, &hero.button_text));
    }
    if !hero.trust_badges.is_empty() {
        let badges = hero
            .trust_badges
            .iter()
            .enumerate()
            .map(|(i, b)| text_el("li", ctx, b).with_key(i.to_string()))
            .collect();
        node = node.with_child(
            VNode::element("ul")
                .with_attr("class", "trust-badges")
                .with_children(badges),
        );
    }
    node
}

fn render_features(features: &FeaturesContent, ctx: &RenderCtx<'_>) -> VNode {
    let items = features
        .features
        .iter()
        .enumerate()
        .map(|(i, f)| {
            VNode::element("div")
                .with_key(i.to_string())
                .with_attr("class", "feature")
                .with_attr("data-icon", f.icon.clone())
                .with_child(text_el("h3", ctx, &f.title))
                .with_child(text_el("p", ctx, &f.description))
        })
        .collect();

    with_title(section("features"), ctx, &features.title)
        .with_child(grid(device_columns(ctx, 3)).with_children(items))
}

fn stars(rating: u8) -> String {
    let filled = rating.min(5) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

fn render_testimonials(content: &TestimonialContent, ctx: &RenderCtx<'_>) -> VNode {
    let items = content
        .testimonials
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let cite = if t.role.is_empty() {
                t.author.clone()
            } else {
                format!("{}, {}", t.author, t.role)
            };
            VNode::element("blockquote")
                .with_key(i.to_string())
                .with_child(text_el("p", ctx, &t.quote))
                .with_child(
                    VNode::element("div")
                        .with_attr("class", "rating")
                        .with_attr("aria-label", format!("{} out of 5", t.rating.min(5)))
                        .with_child(VNode::text(stars(t.rating))),
                )
                .with_child(text_el("cite", ctx, &cite))
        })
        .collect();

    with_title(section("testimonials"), ctx, &content.title)
        .with_child(grid(device_columns(ctx, 3)).with_children(items))
}

fn render_pricing(pricing: &PricingContent, ctx: &RenderCtx<'_>) -> VNode {
    let desktop = pricing.plans.len().min(MAX_PRICING_COLUMNS);
    let plans = pricing
        .plans
        .iter()
        .enumerate()
        .map(|(i, plan)| {
            let class = if plan.highlighted {
                "plan plan-highlighted"
            } else {
                "plan"
            };
            let price = if plan.period.is_empty() {
                plan.price.clone()
            } else {
                format!("{}/{}", plan.price, plan.period)
            };
            let features = plan
                .features
                .iter()
                .enumerate()
                .map(|(j, f)| text_el("li", ctx, f).with_key(j.to_string()))
                .collect();

            VNode::element("div")
                .with_key(i.to_string())
                .with_attr("class", class)
                .with_child(text_el("h3", ctx, &plan.name))
                .with_child(
                    VNode::element("div")
                        .with_attr("class", "price")
                        .with_child(VNode::text(ctx.text(&price))),
                )
                .with_child(VNode::element("ul").with_children(features))
                .with_child(action_button(ctx, &plan.button_text))
        })
        .collect();

    with_title(section("pricing"), ctx, &pricing.title)
        .with_child(grid(ctx.device.columns(desktop)).with_children(plans))
}

fn render_faq(faq: &FaqContent, ctx: &RenderCtx<'_>) -> VNode {
    let items = faq
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            VNode::element("details")
                .with_key(i.to_string())
                .with_child(text_el("summary", ctx, &item.question))
                .with_child(text_el("p", ctx, &item.answer))
        })
        .collect();

    with_title(section("faq"), ctx, &faq.title).with_children(items)
}

fn render_social_proof(proof: &SocialProofContent, ctx: &RenderCtx<'_>) -> VNode {
    let stats = proof
        .stats
        .iter()
        .enumerate()
        .map(|(i, stat)| {
            VNode::element("div")
                .with_key(i.to_string())
                .with_attr("class", "stat")
                .with_child(text_el("strong", ctx, &stat.value))
                .with_child(text_el("span", ctx, &stat.label))
        })
        .collect();

    let mut node = with_title(section("social-proof"), ctx, &proof.title)
        .with_child(grid(device_columns(ctx, 4)).with_children(stats));

    if !proof.logos.is_empty() {
        let logos = proof
            .logos
            .iter()
            .enumerate()
            .map(|(i, src)| {
                VNode::element("img")
                    .with_key(i.to_string())
                    .with_attr("src", src.clone())
                    .with_attr("alt", "")
            })
            .collect();
        node = node.with_child(
            VNode::element("div")
                .with_attr("class", "logos")
                .with_children(logos),
        );
    }
    node
}

/// Time left until `end`, or `None` once it has passed
pub fn remaining(end: DateTime<Utc>, now: DateTime<Utc>) -> Option<[(i64, &'static str); 4]> {
    let left = end.signed_duration_since(now);
    if left.num_seconds() <= 0 {
        return None;
    }

    Some([
        (left.num_days(), "Days"),
        (left.num_hours() % 24, "Hours"),
        (left.num_minutes() % 60, "Minutes"),
        (left.num_seconds() % 60, "Seconds"),
    ])
}

fn render_countdown(countdown: &CountdownContent, ctx: &RenderCtx<'_>) -> VNode {
    let node = with_title(section("countdown"), ctx, &countdown.title)
        .with_attr("data-end-time", countdown.end_time.to_rfc3339());

    match remaining(countdown.end_time, ctx.now) {
        Some(units) => {
            let cells = units
                .iter()
                .map(|(value, label)| {
                    VNode::element("div")
                        .with_key(label.to_lowercase())
                        .with_attr("class", "unit")
                        .with_child(VNode::element("strong").with_child(VNode::text(format!("{:02}", value))))
                        .with_child(VNode::element("small").with_child(VNode::text(*label)))
                })
                .collect();
            node.with_child(
                VNode::element("div")
                    .with_attr("class", "timer")
                    .with_style("display", "flex")
                    .with_style("justify-content", "center")
                    .with_style("gap", "16px")
                    .with_children(cells),
            )
        }
        None => node.with_child(
            text_el("p", ctx, &countdown.expired_message).with_attr("class", "expired"),
        ),
    }
}

fn render_trust_badges(content: &TrustBadgesContent, ctx: &RenderCtx<'_>) -> VNode {
    let badges = content
        .badges
        .iter()
        .enumerate()
        .map(|(i, badge)| {
            VNode::element("div")
                .with_key(i.to_string())
                .with_attr("class", "badge")
                .with_attr("data-icon", badge.icon.clone())
                .with_child(text_el("span", ctx, &badge.label))
        })
        .collect();

    with_title(section("trust-badges"), ctx, &content.title)
        .with_child(grid(device_columns(ctx, 4)).with_children(badges))
}

fn form_control(field: &FormField, ctx: &RenderCtx<'_>, control_id: String) -> VNode {
    let control = if field.field_type == "textarea" {
        VNode::element("textarea")
    } else {
        VNode::element("input").with_attr("type", field.field_type.clone())
    };

    let mut control = control
        .with_attr("name", field.name.clone())
        .with_attr("id", control_id);
    if !field.placeholder.is_empty() {
        control = control.with_attr("placeholder", ctx.text(&field.placeholder));
    }
    if field.required {
        control = control.with_attr("required", "true");
    }
    control
}

fn render_form(form: &FormContent, ctx: &RenderCtx<'_>) -> VNode {
    let fields = form
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let label = if field.label.is_empty() {
                &field.name
            } else {
                &field.label
            };
            let control_id = format!("{}-{}-{}", ctx.element.id, i, field.name);
            VNode::element("div")
                .with_key(i.to_string())
                .with_attr("class", "form-field")
                .with_child(text_el("label", ctx, label).with_attr("for", control_id.clone()))
                .with_child(form_control(field, ctx, control_id))
        })
        .collect();

    let mut node = VNode::element("form")
        .with_attr("class", "optin-form")
        .with_attr("data-action", ctx.prop_str("action").unwrap_or("next_page"))
        .with_style("max-width", "480px")
        .with_style("margin", "0 auto");
    if !form.title.is_empty() {
        node = node.with_child(text_el("h3", ctx, &form.title));
    }

    node.with_children(fields).with_child(
        VNode::element("button")
            .with_attr("type", "submit")
            .with_child(VNode::text(ctx.text(&form.submit_text))),
    )
}
