//! Shared types for the API layer.

use std::sync::{Arc, Mutex};

use clinic_core::{ClinicError, ClinicManager, ClinicResult};

use crate::api::error::ApiError;

/// Shared context for all API routes.
#[derive(Clone)]
pub struct AppState {
    manager: Arc<Mutex<ClinicManager>>,
}

impl AppState {
    pub fn new(manager: ClinicManager) -> Self {
        Self {
            manager: Arc::new(Mutex::new(manager)),
        }
    }

    /// Run one manager operation on the blocking pool.
    ///
    /// Store calls do SQLite or file I/O, so they stay off the async
    /// workers. The lock is held only for the duration of `op`.
    pub async fn run<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut ClinicManager) -> ClinicResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let manager = Arc::clone(&self.manager);
        let result = tokio::task::spawn_blocking(move || -> ClinicResult<T> {
            let mut guard = manager.lock()?;
            op(&mut guard)
        })
        .await
        .map_err(|e| ClinicError::StoreUnavailable(format!("Store task failed: {e}")))?;

        Ok(result?)
    }
}
