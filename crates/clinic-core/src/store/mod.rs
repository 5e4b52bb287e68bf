//! Record store abstraction.
//!
//! The manager talks to storage only through [`RecordStore`]. Two backings
//! implement it:
//!
//! - [`crate::db::Database`]: SQLite document store with separate `patients`
//!   and `visits` tables, visits keyed by `patient_id`.
//! - [`crate::local::LocalStore`]: a single JSON blob in a key-value medium,
//!   visits embedded in their patient. Every mutation rewrites the blob.

use thiserror::Error;

use crate::models::{Patient, Visit};

/// Storage errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Conflict(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Result of removing a patient together with its visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeOutcome {
    /// Whether the patient row/record existed and was removed
    pub patient_removed: bool,
    /// Number of visits removed
    pub visits_removed: usize,
}

/// Persistence capability required by [`crate::ClinicManager`].
///
/// Listing methods return records in insertion order.
pub trait RecordStore: Send {
    /// Insert a patient. Fails with [`StoreError::Conflict`] if the phone
    /// number is already registered.
    fn insert_patient(&mut self, patient: &Patient) -> StoreResult<()>;

    /// Patients whose name or phone contains `term` (ASCII case-insensitive).
    /// `None` returns every patient.
    fn find_patients(&self, term: Option<&str>) -> StoreResult<Vec<Patient>>;

    fn find_patient(&self, id: &str) -> StoreResult<Option<Patient>>;

    /// Remove a patient record only. Returns whether it existed.
    fn delete_patient(&mut self, id: &str) -> StoreResult<bool>;

    fn insert_visit(&mut self, visit: &Visit) -> StoreResult<()>;

    fn find_visits(&self, patient_id: &str) -> StoreResult<Vec<Visit>>;

    /// Remove one visit of one patient. Returns whether it existed.
    fn delete_visit(&mut self, patient_id: &str, visit_id: &str) -> StoreResult<bool>;

    /// Remove every visit of a patient. Returns the number removed.
    fn delete_visits(&mut self, patient_id: &str) -> StoreResult<usize>;

    /// Remove a patient and all of its visits.
    ///
    /// The default runs two independent steps: visits first, then the
    /// patient. A failure between them leaves the patient in place with
    /// none of its visits. Backings that can do better override this.
    fn delete_patient_cascade(&mut self, id: &str) -> StoreResult<CascadeOutcome> {
        let visits_removed = self.delete_visits(id)?;
        let patient_removed = self.delete_patient(id).inspect_err(|e| {
            tracing::warn!(
                patient_id = id,
                visits_removed,
                error = %e,
                "Patient delete failed after its visits were removed"
            );
        })?;

        Ok(CascadeOutcome {
            patient_removed,
            visits_removed,
        })
    }
}
