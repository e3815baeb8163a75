//! Document store collaborator.
//!
//! The store is a plain key-value table of [`FunnelRecord`]s. Everything the
//! engine needs is `get_by_id`, `upsert` and `delete`.

use crate::error::{SyncError, SyncResult};
use funnel_model::FunnelRecord;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

pub trait DocumentBackend: Send + Sync + 'static {
    fn get_by_id(&self, id: &str) -> impl Future<Output = SyncResult<Option<FunnelRecord>>> + Send;

    fn upsert(&self, record: FunnelRecord) -> impl Future<Output = SyncResult<()>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = SyncResult<()>> + Send;
}

#[derive(Debug, Default)]
struct MemoryState {
    records: HashMap<String, FunnelRecord>,
    upserts: usize,
    latency: Duration,
    offline: bool,
}

/// In-process backend with optional latency and outage simulation
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps for `latency` before touching the table
    pub fn with_latency(self, latency: Duration) -> Self {
        self.lock().latency = latency;
        self
    }

    pub fn set_latency(&self, latency: Duration) {
        self.lock().latency = latency;
    }

    /// While offline every call fails
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Seed a record without counting it as a write
    pub fn insert(&self, record: FunnelRecord) {
        self.lock().records.insert(record.id.clone(), record);
    }

    pub fn record(&self, id: &str) -> Option<FunnelRecord> {
        self.lock().records.get(id).cloned()
    }

    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.lock().records.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of successful upserts so far
    pub fn upserts(&self) -> usize {
        self.lock().upserts
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn round_trip(&self) -> SyncResult<()> {
        let latency = self.lock().latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if self.lock().offline {
            return Err(SyncError::Backend("backend unreachable".to_string()));
        }
        Ok(())
    }
}

impl DocumentBackend for MemoryBackend {
    async fn get_by_id(&self, id: &str) -> SyncResult<Option<FunnelRecord>> {
        self.round_trip().await?;
        Ok(self.record(id))
    }

    async fn upsert(&self, record: FunnelRecord) -> SyncResult<()> {
        self.round_trip().await?;
        let mut state = self.lock();
        state.upserts += 1;
        state.records.insert(record.id.clone(), record);
        Ok(())
    }

    async fn delete(&self, id: &str) -> SyncResult<()> {
        self.round_trip().await?;
        match self.lock().records.remove(id) {
            Some(_) => Ok(()),
            None => Err(SyncError::NotFound(id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_upsert_then_get() {
        let backend = MemoryBackend::new();
        let record = FunnelRecord::draft("doc", "Page", "user", &[], Utc::now()).unwrap();

        backend.upsert(record.clone()).await.unwrap();

        assert_eq!(backend.get_by_id("doc").await.unwrap(), Some(record));
        assert_eq!(backend.upserts(), 1);
    }

    #[tokio::test]
    async fn test_offline_fails_every_call() {
        let backend = MemoryBackend::new();
        backend.set_offline(true);

        assert!(matches!(
            backend.get_by_id("doc").await,
            Err(SyncError::Backend(_))
        ));
        assert!(backend.delete("doc").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_missing_record() {
        let backend = MemoryBackend::new();
        assert_eq!(
            backend.delete("nope").await,
            Err(SyncError::NotFound("nope".into()))
        );
    }
}
