//! Request identity and cancellation for screen loads
//!
//! Every `open` of a screen begins a new request: the previous request's
//! token is cancelled, which aborts its in-flight network futures, and its
//! id stops being current, so any write it still attempts is rejected.

use super::ViewError;
use crate::api::ClientError;
use std::future::Future;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

/// One load of a screen
#[derive(Debug, Clone)]
pub struct RequestHandle {
    id: Uuid,
    token: CancellationToken,
}

impl RequestHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Run a backend call, aborting it when the request is cancelled
    pub async fn run<T, F>(&self, call: F) -> Result<T, ViewError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => {
                debug!(request_id = %self.id, "Dropping cancelled backend call");
                Err(ViewError::Cancelled)
            }
            result = call => result.map_err(ViewError::Client),
        }
    }
}

/// Tracks the current request of a screen
#[derive(Debug, Default)]
pub struct RequestScope {
    current: Mutex<Option<RequestHandle>>,
}

impl RequestScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, cancelling the current one.
    ///
    /// Returns the new handle and the id of the request it replaced.
    pub fn begin(&self) -> (RequestHandle, Option<Uuid>) {
        let handle = RequestHandle {
            id: Uuid::new_v4(),
            token: CancellationToken::new(),
        };
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        let previous = current.replace(handle.clone());
        let previous_id = previous.map(|p| {
            p.token.cancel();
            p.id
        });
        (handle, previous_id)
    }

    /// Whether `id` is still the request whose results may be applied
    pub fn is_current(&self, id: Uuid) -> bool {
        let current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        current
            .as_ref()
            .map_or(false, |h| h.id == id && !h.token.is_cancelled())
    }

    /// Handle of the current request, for actions that should die with it
    pub fn current(&self) -> Option<RequestHandle> {
        let current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        current.clone()
    }

    pub fn current_id(&self) -> Option<Uuid> {
        let current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        current.as_ref().map(|h| h.id)
    }

    /// Cancel the current request (screen closed). Returns its id.
    pub fn cancel(&self) -> Option<Uuid> {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        current.take().map(|h| {
            h.token.cancel();
            h.id
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_begin_cancels_previous() {
        let scope = RequestScope::new();
        let (first, replaced) = scope.begin();
        assert!(replaced.is_none());
        assert!(scope.is_current(first.id()));

        let (second, replaced) = scope.begin();
        assert_eq!(replaced, Some(first.id()));
        assert!(first.is_cancelled());
        assert!(!scope.is_current(first.id()));
        assert!(scope.is_current(second.id()));
    }

    #[test]
    fn test_cancel_clears_current() {
        let scope = RequestScope::new();
        let (handle, _) = scope.begin();
        assert_eq!(scope.cancel(), Some(handle.id()));
        assert!(handle.is_cancelled());
        assert!(!scope.is_current(handle.id()));
        assert_eq!(scope.current_id(), None);
    }

    #[tokio::test]
    async fn test_run_aborts_on_cancel() {
        let scope = RequestScope::new();
        let (handle, _) = scope.begin();
        let slow = async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok::<_, ClientError>(1)
        };

        let canceller = {
            let token = handle.token().clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                token.cancel();
            })
        };

        let result = handle.run(slow).await;
        assert!(matches!(result, Err(ViewError::Cancelled)));
        canceller.await.unwrap();
    }

    #[tokio::test]
    async fn test_run_passes_results_through() {
        let (handle, _) = RequestScope::new().begin();
        let value = handle.run(async { Ok::<_, ClientError>(7) }).await.unwrap();
        assert_eq!(value, 7);
    }
}
