use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// Thread-safe handle to a manager shared between tasks.
///
/// Manager operations take `&mut self`, so two requests can only overlap through
/// shared ownership. The handle serialises them: a second caller waits until the
/// first request's response has been applied, and the list always reflects the
/// last request issued rather than the last response to arrive.
pub struct ManagerHandle<M> {
    inner: Arc<Mutex<M>>,
}

impl<M> Clone for ManagerHandle<M> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<M> ManagerHandle<M> {
    pub fn new(manager: M) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    /// Waits for exclusive access. Hold the guard across the whole operation:
    /// `handle.lock().await.refresh().await`.
    pub async fn lock(&self) -> MutexGuard<'_, M> {
        self.inner.lock().await
    }

    /// Runs a synchronous read against the manager.
    pub async fn read<F, O>(&self, f: F) -> O
    where
        F: FnOnce(&M) -> O,
    {
        let guard = self.inner.lock().await;
        f(&*guard)
    }

    /// Returns the manager when this is the last handle.
    pub fn try_unwrap(self) -> Result<M, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}
