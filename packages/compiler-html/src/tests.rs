use crate::{compile_to_html, CompileError, CompileOptions};
use chrono::{TimeZone, Utc};
use funnel_catalog::{Registry, TemplateCatalog, TemplateType};
use funnel_evaluator::{Device, RenderOptions, Renderer, Scope, VNode, VirtualDomDocument};
use funnel_model::{Element, ElementType};

fn page(nodes: Vec<VNode>) -> VirtualDomDocument {
    let mut document = VirtualDomDocument::new();
    for node in nodes {
        document.add_node(node);
    }
    document
}

#[test]
fn test_compile_simple_page() {
    let document = page(vec![VNode::element("h1").with_child(VNode::text("Hello"))]);
    let html = compile_to_html(&document, CompileOptions::default()).unwrap();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<main class=\"funnel-page\">"));
    assert!(html.contains("<h1>Hello</h1>"));
}

#[test]
fn test_text_and_attributes_are_escaped() {
    let document = page(vec![VNode::element("a")
        .with_attr("href", "/x?a=1&b=\"2\"")
        .with_child(VNode::text("<script>alert(1)</script>"))]);
    let html = compile_to_html(&document, CompileOptions::default()).unwrap();

    assert!(html.contains("href=\"/x?a=1&amp;b=&quot;2&quot;\""));
    assert!(html.contains("&lt;script&gt;"));
    assert!(!html.contains("<script>"));
}

#[test]
fn test_inline_styles_toggle() {
    let document = page(vec![VNode::element("p")
        .with_style("color", "red")
        .with_child(VNode::text("x"))]);

    let inline = compile_to_html(&document, CompileOptions::default()).unwrap();
    assert!(inline.contains("style=\"color: red;\""));

    let options = CompileOptions {
        inline_styles: false,
        ..Default::default()
    };
    let bare = compile_to_html(&document, options).unwrap();
    assert!(!bare.contains("style="));
}

#[test]
fn test_error_nodes_become_alerts() {
    let document = page(vec![VNode::error(
        "Invalid HERO data",
        Some("hero-1".to_string()),
    )]);
    let html = compile_to_html(&document, CompileOptions::default()).unwrap();

    assert!(html.contains(
        "<div class=\"funnel-error\" role=\"alert\" data-element-id=\"hero-1\">Invalid HERO data</div>"
    ));
}

#[test]
fn test_rejects_bad_tag_names() {
    let document = page(vec![VNode::element("div onclick=x")]);
    assert_eq!(
        compile_to_html(&document, CompileOptions::default()).unwrap_err(),
        CompileError::InvalidTag("div onclick=x".into())
    );
}

#[test]
fn test_compact_output() {
    let document = page(vec![VNode::element("hr")]);
    let options = CompileOptions {
        pretty: false,
        ..Default::default()
    };
    let html = compile_to_html(&document, options).unwrap();

    assert!(!html.contains('\n'));
    assert!(html.contains("<hr />"));
}

#[test]
fn test_compile_rendered_template_page() {
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let registry = Registry::standard();
    let catalog = TemplateCatalog::standard(&registry, now);
    let pages = catalog.instantiate(TemplateType::SalesFunnel).unwrap();

    let renderer = Renderer::new(&registry, RenderOptions::new(Device::Tablet, now));
    let rendered = renderer.render_page(&pages[0].content, &Scope::new());
    let html = compile_to_html(&rendered.document, CompileOptions::default()).unwrap();

    assert!(html.contains(".funnel-page { "));
    assert!(html.contains("max-width: 768px;"));
    assert!(!html.contains("funnel-error"));
}

#[test]
fn test_unknown_element_renders_diagnostic() {
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let registry = Registry::standard();
    let renderer = Renderer::new(&registry, RenderOptions::new(Device::Desktop, now));
    let elements = vec![Element::text(
        "x",
        ElementType::Unknown("CAROUSEL".into()),
        "",
    )];

    let rendered = renderer.render_page(&elements, &Scope::new());
    let html = compile_to_html(&rendered.document, CompileOptions::default()).unwrap();

    assert!(html.contains("Unknown element type: CAROUSEL"));
}
