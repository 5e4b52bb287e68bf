//! Clinic Core Library
//!
//! Patient and visit record management for a small clinic.
//!
//! # Architecture
//!
//! ```text
//!                  ClinicManager
//!          (validate, search, cascade delete)
//!                        │
//!                 dyn RecordStore
//!                        │
//!          ┌─────────────┴─────────────┐
//!          ▼                           ▼
//!      Database                  LocalStore<K>
//!  patients + visits         one JSON blob under
//!   tables (SQLite)          "patients", visits
//!                            embedded per patient
//!                                      │
//!                              MemoryKv / FileKv
//! ```
//!
//! # Modules
//!
//! - [`models`]: Domain types (Patient, Visit, and their request shapes)
//! - [`store`]: The `RecordStore` capability and storage errors
//! - [`db`]: SQLite document store
//! - [`local`]: Single-blob key-value store
//! - [`manager`]: The `ClinicManager` operations
//! - [`export`]: Patient directory export

pub mod db;
pub mod export;
pub mod local;
pub mod manager;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use db::Database;
pub use export::{ExportFormat, PatientDirectory};
pub use local::{FileKv, KeyValueStore, LocalStore, MemoryKv};
pub use manager::ClinicManager;
pub use models::{NewPatient, NewVisit, Patient, PatientWithVisits, Visit};
pub use store::{CascadeOutcome, RecordStore, StoreError, StoreResult};

// =========================================================================
// Error Type
// =========================================================================

/// Errors surfaced by [`ClinicManager`] operations.
#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),
}

pub type ClinicResult<T> = Result<T, ClinicError>;

impl From<StoreError> for ClinicError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(detail) => ClinicError::Conflict(detail),
            StoreError::NotFound(detail) => ClinicError::NotFound(detail),
            other => ClinicError::StoreUnavailable(other.to_string()),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for ClinicError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ClinicError::StoreUnavailable(format!("Lock poisoned: {}", e))
    }
}
