//! HTTP API for patients and visits.
//!
//! Routes are nested under `/api/`. Every handler takes the shared
//! [`AppState`], locks the manager for one operation, and maps
//! [`clinic_core::ClinicError`] onto a status code with a `{"error": ...}`
//! body.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod types;

pub use error::ApiError;
pub use router::{api_router, app};
pub use types::AppState;
