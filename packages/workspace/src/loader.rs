//! One-shot document loading.
//!
//! A [`Loader`] serves one editor view. Loading the id it already holds is a
//! no-op; loading a different id replaces the open document. Successful
//! loads are remembered so a failed or slow backend falls back to the
//! last-known-good record.

use crate::backend::DocumentBackend;
use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::external::{with_fallback, Fetched};
use crate::notify::{Notification, Notifier};
use crate::sync::AutoSaver;
use funnel_editor::Document;
use funnel_model::FunnelRecord;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// A loaded document wired to its auto-saver
#[derive(Debug)]
pub struct OpenDocument {
    pub document: Document,
    pub saver: AutoSaver,
    /// Record as it was when loaded
    pub record: FunnelRecord,
    /// Loaded from the last-known-good cache instead of the backend
    pub from_cache: bool,
}

#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(OpenDocument),
    /// The id is already open; nothing was fetched
    AlreadyLoaded,
}

pub struct Loader<B> {
    backend: Arc<B>,
    notifier: Arc<dyn Notifier>,
    config: SyncConfig,
    current: Option<String>,
    last_known_good: HashMap<String, FunnelRecord>,
}

impl<B: DocumentBackend> Loader<B> {
    pub fn new(backend: Arc<B>, notifier: Arc<dyn Notifier>, config: SyncConfig) -> Self {
        Self {
            backend,
            notifier,
            config,
            current: None,
            last_known_good: HashMap::new(),
        }
    }

    /// Id of the currently open document
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Forget the open document so the next load fetches again
    pub fn close(&mut self) {
        self.current = None;
    }

    pub async fn load(&mut self, document_id: &str) -> SyncResult<LoadOutcome> {
        if self.current.as_deref() == Some(document_id) {
            return Ok(LoadOutcome::AlreadyLoaded);
        }

        let cached = self.last_known_good.get(document_id).cloned().map(Some);
        let fetched = with_fallback(
            self.config.load_timeout(),
            self.backend.get_by_id(document_id),
            cached,
        )
        .await
        .inspect_err(|err| {
            warn!(document_id, error = %err, "Load failed");
            self.notifier
                .notify(Notification::error(format!("Could not load {}: {}", document_id, err)));
        })?;

        let from_cache = fetched.is_cached();
        if let Fetched::Cached { error, .. } = &fetched {
            self.notifier.notify(Notification::warning(format!(
                "Showing the last saved copy of {}: {}",
                document_id, error
            )));
        }

        let record = fetched
            .into_value()
            .ok_or_else(|| SyncError::NotFound(document_id.to_string()))?;
        let elements = record.elements()?;

        let mut document = Document::from_elements(record.id.clone(), elements);
        let saver = AutoSaver::spawn(
            record.clone(),
            document.version(),
            self.backend.clone(),
            self.notifier.clone(),
            self.config,
        );
        document.attach_sink(Box::new(saver.clone()));

        info!(
            document_id,
            elements = document.len(),
            from_cache,
            "Document loaded"
        );

        if !from_cache {
            self.last_known_good
                .insert(document_id.to_string(), record.clone());
        }
        self.current = Some(document_id.to_string());

        Ok(LoadOutcome::Loaded(OpenDocument {
            document,
            saver,
            record,
            from_cache,
        }))
    }
}
