//! Export functionality for patient directories.

mod directory;

pub use directory::*;
