//! Clinic Server
//!
//! HTTP front end for [`clinic_core`]. The [`config`] module reads the
//! environment, [`api`] exposes patient and visit routes under `/api/`.

pub mod api;
pub mod config;

pub use api::{app, AppState};
pub use config::{ConfigError, ServerConfig, StoreConfig};
