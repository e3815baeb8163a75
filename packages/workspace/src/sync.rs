//! # Auto-save
//!
//! Every document change is written through to the backend as a full
//! snapshot. Snapshots are tagged with the document version and handed to a
//! single writer task:
//!
//! ```text
//! mutation ─→ schedule(version, elements) ─→ watch slot (latest only)
//!                                                  ↓
//!                                writer task: one upsert in flight at a time
//!                                                  ↓
//!                                        acked sequence ─→ flush()
//! ```
//!
//! - At most one write is in flight. Snapshots scheduled meanwhile replace
//!   each other in the slot, so only the newest is written next.
//! - A snapshot older than one already scheduled is dropped, so stored state
//!   never moves back to an earlier version.
//! - A snapshot whose serialized content equals the last stored content is
//!   not written at all.
//! - Each write re-reads the stored record and replaces only its content, so
//!   fields changed elsewhere (publish state, URL) are kept.
//! - Failed writes are logged and notified. They are not retried; the next
//!   change writes the full snapshot again.

use crate::backend::DocumentBackend;
use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::external::with_timeout;
use crate::notify::{Notification, Notifier};
use chrono::Utc;
use funnel_editor::SnapshotSink;
use funnel_model::{serialize_elements, Element, FunnelRecord};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Full element list at one document version
#[derive(Debug, Clone)]
struct Snapshot {
    sequence: u64,
    elements: Vec<Element>,
}

/// Handle to a document's writer task. Cloning shares the same writer.
#[derive(Clone)]
pub struct AutoSaver {
    document_id: String,
    scheduled: Arc<watch::Sender<Option<Snapshot>>>,
    acked: watch::Receiver<u64>,
}

impl std::fmt::Debug for AutoSaver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoSaver")
            .field("document_id", &self.document_id)
            .field("scheduled", &self.scheduled_sequence())
            .field("acked", &self.acked_sequence())
            .finish()
    }
}

impl AutoSaver {
    /// Spawn the writer for `record`. Must be called inside a tokio runtime.
    ///
    /// `record` is the state the document was loaded from; sequence numbers
    /// start above `base_sequence` (the version the document was loaded at).
    pub fn spawn<B: DocumentBackend>(
        record: FunnelRecord,
        base_sequence: u64,
        backend: Arc<B>,
        notifier: Arc<dyn Notifier>,
        config: SyncConfig,
    ) -> Self {
        let document_id = record.id.clone();
        let (scheduled_tx, scheduled_rx) = watch::channel(None);
        let (acked_tx, acked_rx) = watch::channel(base_sequence);

        let writer = Writer {
            document_id: document_id.clone(),
            stored_content: record.content,
            backend,
            notifier,
            timeout: config.write_timeout(),
            acked: acked_tx,
        };
        tokio::spawn(writer.run(scheduled_rx));

        Self {
            document_id,
            scheduled: Arc::new(scheduled_tx),
            acked: acked_rx,
        }
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Queue a snapshot. Returns `false` if a newer one is already queued.
    pub fn schedule(&self, sequence: u64, elements: Vec<Element>) -> bool {
        let accepted = self.scheduled.send_if_modified(|slot| {
            let newer = slot.as_ref().map_or(true, |s| sequence > s.sequence);
            if newer {
                *slot = Some(Snapshot { sequence, elements });
            }
            newer
        });

        if !accepted {
            debug!(
                document_id = %self.document_id,
                sequence,
                "Dropped stale snapshot"
            );
        }
        accepted
    }

    /// Highest sequence handed to `schedule`
    pub fn scheduled_sequence(&self) -> u64 {
        self.scheduled
            .borrow()
            .as_ref()
            .map_or(0, |snapshot| snapshot.sequence)
    }

    /// Highest sequence the writer has finished with (written, skipped or failed)
    pub fn acked_sequence(&self) -> u64 {
        *self.acked.borrow()
    }

    /// Wait until every scheduled snapshot has been handled
    pub async fn flush(&self) -> SyncResult<()> {
        let target = self.scheduled_sequence();
        let mut acked = self.acked.clone();
        acked
            .wait_for(|sequence| *sequence >= target)
            .await
            .map_err(|_| SyncError::WriterStopped(self.document_id.clone()))?;
        Ok(())
    }
}

impl SnapshotSink for AutoSaver {
    fn snapshot_changed(&self, version: u64, elements: &[Element]) {
        self.schedule(version, elements.to_vec());
    }
}

struct Writer<B> {
    document_id: String,
    /// Content of the last successful write
    stored_content: String,
    backend: Arc<B>,
    notifier: Arc<dyn Notifier>,
    timeout: Duration,
    acked: watch::Sender<u64>,
}

impl<B: DocumentBackend> Writer<B> {
    async fn run(mut self, mut scheduled: watch::Receiver<Option<Snapshot>>) {
        while scheduled.changed().await.is_ok() {
            let Some(snapshot) = scheduled.borrow_and_update().clone() else {
                continue;
            };

            if snapshot.sequence <= *self.acked.borrow() {
                continue;
            }

            if let Err(err) = self.write(&snapshot).await {
                error!(
                    document_id = %self.document_id,
                    sequence = snapshot.sequence,
                    error = %err,
                    "Auto-save failed"
                );
                self.notifier
                    .notify(Notification::error(format!("Could not save changes: {}", err)));
            }

            self.acked.send_replace(snapshot.sequence);
        }

        debug!(document_id = %self.document_id, "Auto-save writer stopped");
    }

    async fn write(&mut self, snapshot: &Snapshot) -> SyncResult<()> {
        let content = serialize_elements(&snapshot.elements)?;
        if content == self.stored_content {
            debug!(
                document_id = %self.document_id,
                sequence = snapshot.sequence,
                "Content unchanged, write skipped"
            );
            return Ok(());
        }

        let stored = with_timeout(self.timeout, self.backend.get_by_id(&self.document_id))
            .await?
            .ok_or_else(|| SyncError::NotFound(self.document_id.clone()))?;
        let next = FunnelRecord {
            content,
            updated_at: Utc::now(),
            ..stored
        };

        with_timeout(self.timeout, self.backend.upsert(next.clone())).await?;

        info!(
            document_id = %self.document_id,
            sequence = snapshot.sequence,
            bytes = next.content.len(),
            "Saved"
        );
        self.stored_content = next.content;
        Ok(())
    }
}
