/// Determinism tests - the same page, scope and options always render the
/// same virtual DOM, byte for byte once serialized.
use chrono::{TimeZone, Utc};
use funnel_catalog::{Registry, TemplateCatalog, TemplateType};
use funnel_evaluator::{Device, RenderOptions, Renderer, Scope, VirtualDomDocument};
use funnel_model::Variable;

#[test]
fn test_render_determinism_for_every_template() {
    let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
    let registry = Registry::standard();
    let catalog = TemplateCatalog::standard(&registry, now);
    let scope = Scope::from_variables(&[Variable::new("first_name", "Ann")]);

    for ty in TemplateType::ALL {
        for page in catalog.instantiate(ty).unwrap() {
            let results: Vec<VirtualDomDocument> = (0..10)
                .map(|_| {
                    Renderer::new(&registry, RenderOptions::new(Device::Desktop, now))
                        .render_page(&page.content, &scope)
                        .document
                })
                .collect();

            for i in 1..results.len() {
                assert_eq!(
                    results[0], results[i],
                    "{} / {}: render {} differs from render 0",
                    ty, page.name, i
                );
            }

            let first = serde_json::to_string(&results[0]).expect("serialize");
            let last = serde_json::to_string(&results[9]).expect("serialize");
            assert_eq!(first, last);
        }
    }
}

#[test]
fn test_template_pages_render_without_errors() {
    let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
    let registry = Registry::standard();
    let catalog = TemplateCatalog::standard(&registry, now);

    for ty in TemplateType::ALL {
        for page in catalog.instantiate(ty).unwrap() {
            for device in Device::ALL {
                let rendered = Renderer::new(&registry, RenderOptions::new(device, now).canvas())
                    .render_page(&page.content, &Scope::new());

                assert_eq!(rendered.document.nodes.len(), page.content.len());
                for node in &rendered.document.nodes {
                    assert!(
                        node.find(&|n| n.is_error()).is_none(),
                        "{} / {} rendered an error on {}",
                        ty,
                        page.name,
                        device
                    );
                }
            }
        }
    }
}

#[test]
fn test_webinar_confirmation_substitutes_and_hides() {
    let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
    let registry = Registry::standard();
    let catalog = TemplateCatalog::standard(&registry, now);
    let pages = catalog.instantiate(TemplateType::Webinar).unwrap();
    let confirmation = &pages[1];
    let renderer = Renderer::new(&registry, RenderOptions::new(Device::Desktop, now));

    let with_name = renderer.render_page(
        &confirmation.content,
        &Scope::new().with_fields([("first_name", "Ann")]),
    );
    assert_eq!(with_name.document.nodes.len(), 2);
    assert!(with_name.document.nodes[1].text_content().contains("Thanks Ann"));

    // Without a name the personalised line is hidden
    let anonymous = renderer.render_page(&confirmation.content, &Scope::new());
    assert_eq!(anonymous.document.nodes.len(), 1);
}
