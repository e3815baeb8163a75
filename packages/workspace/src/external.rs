//! Guards for calls to collaborators outside the engine's control.
//!
//! Every backend call goes through [`with_timeout`]; reads that have a
//! last-known-good value go through [`with_fallback`] instead.

use crate::error::{SyncError, SyncResult};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Fail with `SyncError::Timeout` if `call` does not finish within `limit`
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> SyncResult<T>
where
    F: Future<Output = SyncResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(SyncError::Timeout(limit)),
    }
}

/// Result of a guarded call that may have fallen back to cached data
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Fresh(T),
    /// The call failed; `value` is the cached copy
    Cached { value: T, error: SyncError },
}

impl<T> Fetched<T> {
    pub fn value(&self) -> &T {
        match self {
            Fetched::Fresh(value) | Fetched::Cached { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Fetched::Fresh(value) | Fetched::Cached { value, .. } => value,
        }
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, Fetched::Cached { .. })
    }
}

/// Like [`with_timeout`], but a failure returns `cached` when there is one
pub async fn with_fallback<T, F>(limit: Duration, call: F, cached: Option<T>) -> SyncResult<Fetched<T>>
where
    F: Future<Output = SyncResult<T>>,
{
    match with_timeout(limit, call).await {
        Ok(value) => Ok(Fetched::Fresh(value)),
        Err(error) => match cached {
            Some(value) => {
                warn!(error = %error, "Collaborator call failed, using cached data");
                Ok(Fetched::Cached { value, error })
            }
            None => Err(error),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn slow(value: u32) -> SyncResult<u32> {
        tokio::time::sleep(Duration::from_secs(10)).await;
        Ok(value)
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fires() {
        let result = with_timeout(Duration::from_secs(1), slow(1)).await;
        assert_eq!(result, Err(SyncError::Timeout(Duration::from_secs(1))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_to_cached() {
        let fetched = with_fallback(Duration::from_secs(1), slow(1), Some(7))
            .await
            .unwrap();
        assert!(fetched.is_cached());
        assert_eq!(*fetched.value(), 7);
    }

    #[tokio::test]
    async fn test_fresh_value_wins() {
        let fetched = with_fallback(Duration::from_secs(1), async { Ok(3) }, Some(7))
            .await
            .unwrap();
        assert_eq!(fetched, Fetched::Fresh(3));
    }

    #[tokio::test]
    async fn test_failure_without_cache() {
        let result: SyncResult<Fetched<u32>> = with_fallback(
            Duration::from_secs(1),
            async { Err(SyncError::Backend("down".into())) },
            None,
        )
        .await;
        assert_eq!(result, Err(SyncError::Backend("down".into())));
    }
}
