//! Load → edit → auto-save round trips against the in-memory backend

use chrono::{TimeZone, Utc};
use funnel_catalog::{Registry, TemplateCatalog, TemplateType};
use funnel_editor::Direction;
use funnel_model::{ConditionRule, Element, ElementType, FunnelRecord, RuleType};
use funnel_workspace::{
    CollectingNotifier, FunnelService, FunnelWizard, Level, LoadOutcome, Loader, MemoryBackend,
    OpenDocument, SyncConfig, SyncError,
};
use std::sync::Arc;
use std::time::Duration;

fn seeded_backend() -> MemoryBackend {
    let backend = MemoryBackend::new();
    let elements = vec![
        Element::text("h", ElementType::Headline, "Hello"),
        Element::text("b", ElementType::Button, "Go"),
    ];
    backend.insert(FunnelRecord::draft("page-1", "Landing", "user", &elements, Utc::now()).unwrap());
    backend.insert(FunnelRecord::draft("page-2", "Thanks", "user", &[], Utc::now()).unwrap());
    backend
}

fn loader(backend: &MemoryBackend, notifier: &CollectingNotifier) -> Loader<MemoryBackend> {
    Loader::new(
        Arc::new(backend.clone()),
        Arc::new(notifier.clone()),
        SyncConfig::default(),
    )
}

fn expect_loaded(outcome: LoadOutcome) -> OpenDocument {
    match outcome {
        LoadOutcome::Loaded(open) => open,
        LoadOutcome::AlreadyLoaded => panic!("Expected a fresh load"),
    }
}

#[tokio::test]
async fn test_every_mutation_is_written_through() {
    let backend = seeded_backend();
    let mut loader = loader(&backend, &CollectingNotifier::new());
    let mut open = expect_loaded(loader.load("page-1").await.unwrap());

    open.document.move_element("b", Direction::Up).unwrap();
    open.saver.flush().await.unwrap();

    let stored = backend.record("page-1").unwrap().elements().unwrap();
    let ids: Vec<_> = stored.iter().map(|el| el.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "h"]);
}

#[tokio::test]
async fn test_load_is_one_shot_per_id() {
    let backend = seeded_backend();
    let mut loader = loader(&backend, &CollectingNotifier::new());

    expect_loaded(loader.load("page-1").await.unwrap());
    assert!(matches!(
        loader.load("page-1").await.unwrap(),
        LoadOutcome::AlreadyLoaded
    ));

    expect_loaded(loader.load("page-2").await.unwrap());
    assert_eq!(loader.current(), Some("page-2"));
    expect_loaded(loader.load("page-1").await.unwrap());
}

#[tokio::test]
async fn test_missing_document() {
    let backend = seeded_backend();
    let notifier = CollectingNotifier::new();
    let mut loader = loader(&backend, &notifier);

    assert_eq!(
        loader.load("nope").await.unwrap_err(),
        SyncError::NotFound("nope".into())
    );
    assert_eq!(loader.current(), None);
}

#[tokio::test(start_paused = true)]
async fn test_slow_backend_falls_back_to_last_known_good() {
    let backend = seeded_backend();
    let notifier = CollectingNotifier::new();
    let mut loader = loader(&backend, &notifier);

    expect_loaded(loader.load("page-1").await.unwrap());
    expect_loaded(loader.load("page-2").await.unwrap());

    backend.set_latency(Duration::from_secs(60));
    let open = expect_loaded(loader.load("page-1").await.unwrap());

    assert!(open.from_cache);
    assert_eq!(open.document.len(), 2);
    assert_eq!(notifier.count(Level::Warning), 1);
}

#[tokio::test]
async fn test_failure_without_cache_is_reported() {
    let backend = seeded_backend();
    let notifier = CollectingNotifier::new();
    let mut loader = loader(&backend, &notifier);
    backend.set_offline(true);

    assert!(matches!(
        loader.load("page-1").await,
        Err(SyncError::Backend(_))
    ));
    assert_eq!(notifier.count(Level::Error), 1);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_edits_write_latest_state_only() {
    let backend = seeded_backend();
    let mut loader = loader(&backend, &CollectingNotifier::new());
    let mut open = expect_loaded(loader.load("page-1").await.unwrap());
    backend.set_latency(Duration::from_millis(100));

    open.document
        .add_element(Element::text("t1", ElementType::Text, "one"))
        .unwrap();
    // Let the first write get in flight
    tokio::time::sleep(Duration::from_millis(10)).await;

    open.document
        .add_element(Element::text("t2", ElementType::Text, "two"))
        .unwrap();
    open.document
        .add_element(Element::text("t3", ElementType::Text, "three"))
        .unwrap();
    open.saver.flush().await.unwrap();

    assert_eq!(backend.upserts(), 2);
    assert_eq!(open.saver.acked_sequence(), 3);
    let stored = backend.record("page-1").unwrap().elements().unwrap();
    assert_eq!(stored.len(), 5);
    assert_eq!(stored, open.document.elements());
}

#[tokio::test]
async fn test_identical_content_saved_twice_is_written_once() {
    let backend = seeded_backend();
    let mut loader = loader(&backend, &CollectingNotifier::new());
    let open = expect_loaded(loader.load("page-1").await.unwrap());

    let edited = vec![Element::text("h", ElementType::Headline, "Changed")];
    open.saver.schedule(1, edited.clone());
    open.saver.flush().await.unwrap();
    let once = backend.record("page-1").unwrap();

    open.saver.schedule(2, edited);
    open.saver.flush().await.unwrap();
    let twice = backend.record("page-1").unwrap();

    assert_eq!(backend.upserts(), 1);
    assert_eq!(
        serde_json::to_string(&once).unwrap(),
        serde_json::to_string(&twice).unwrap()
    );
}

#[tokio::test]
async fn test_wizard_to_published_funnel() {
    let now = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap();
    let backend = MemoryBackend::new();
    let catalog = TemplateCatalog::standard(&Registry::standard(), now);
    let service = FunnelService::new(Arc::new(backend.clone()), catalog, SyncConfig::default());

    let mut wizard = FunnelWizard::new();
    wizard.set_name("Spring Webinar");
    wizard.next().unwrap();
    wizard.set_template("WEBINAR");
    wizard.next().unwrap();
    let request = wizard.finish().unwrap();

    let funnel = service
        .create_from_template("user-1", &request.name, request.template_type, now)
        .await
        .unwrap();
    assert_eq!(funnel.steps.len(), 3);
    assert_eq!(backend.ids().len(), 3);

    let first = &funnel.steps[0].document_id;
    let published = service.publish(first, now).await.unwrap();
    let url = published.published_url.clone().unwrap();
    assert!(published.is_published);
    assert!(url.starts_with("/p/spring-webinar-registration-"));

    let again = service.publish(first, now).await.unwrap();
    assert_eq!(again.published_url.as_deref(), Some(url.as_str()));
    assert_eq!(backend.upserts(), 4);

    service.delete_funnel(&funnel).await.unwrap();
    assert!(backend.ids().is_empty());
}

#[tokio::test]
async fn test_template_steps_get_distinct_element_ids() {
    let now = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap();
    let backend = MemoryBackend::new();
    let catalog = TemplateCatalog::standard(&Registry::standard(), now);
    let service = FunnelService::new(Arc::new(backend.clone()), catalog, SyncConfig::default());

    let funnel = service
        .create_from_template("user-1", "Sales", TemplateType::SalesFunnel, now)
        .await
        .unwrap();

    let mut all_ids = Vec::new();
    for step in &funnel.steps {
        let record = backend.record(&step.document_id).unwrap();
        all_ids.extend(record.elements().unwrap().into_iter().map(|el| el.id));
    }
    let total = all_ids.len();
    all_ids.sort();
    all_ids.dedup();
    assert_eq!(all_ids.len(), total);
}

#[tokio::test]
async fn test_editing_after_publish_keeps_it_published() {
    let now = Utc::now();
    let backend = seeded_backend();
    let mut loader = loader(&backend, &CollectingNotifier::new());
    let mut open = expect_loaded(loader.load("page-1").await.unwrap());

    let catalog = TemplateCatalog::standard(&Registry::standard(), now);
    let service = FunnelService::new(Arc::new(backend.clone()), catalog, SyncConfig::default());
    let published = service.publish("page-1", now).await.unwrap();

    open.document
        .add_element(Element::text("t", ElementType::Text, "After launch"))
        .unwrap();
    open.saver.flush().await.unwrap();

    let stored = backend.record("page-1").unwrap();
    assert!(stored.is_published);
    assert_eq!(stored.published_url, published.published_url);
    assert_eq!(stored.elements().unwrap(), open.document.elements());
}

#[tokio::test]
async fn test_deleting_a_step_deactivates_rules_pointing_at_it() {
    let now = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap();
    let backend = MemoryBackend::new();
    let catalog = TemplateCatalog::standard(&Registry::standard(), now);
    let service = FunnelService::new(Arc::new(backend.clone()), catalog, SyncConfig::default());
    let mut funnel = service
        .create_from_template("user-1", "Webinar", TemplateType::Webinar, now)
        .await
        .unwrap();

    let first = funnel.steps[0].document_id.clone();
    let replay = funnel.steps[2].document_id.clone();

    let mut record = backend.record(&first).unwrap();
    let mut elements = record.elements().unwrap();
    let source = elements[0].id.clone();
    elements[0]
        .conditions
        .push(ConditionRule::new("to-replay", source, RuleType::Goto).with_target(replay.as_str()));
    record.content = funnel_model::serialize_elements(&elements).unwrap();
    backend.insert(record);

    let deactivated = service.delete_step(&mut funnel, &replay).await.unwrap();

    assert_eq!(deactivated, 1);
    assert_eq!(funnel.steps.len(), 2);
    assert!(backend.record(&replay).is_none());
    let rule = backend.record(&first).unwrap().elements().unwrap()[0]
        .conditions
        .iter()
        .find(|rule| rule.id == "to-replay")
        .cloned()
        .unwrap();
    assert!(!rule.is_active);
}
