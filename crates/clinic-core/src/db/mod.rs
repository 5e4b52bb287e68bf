//! SQLite document store.

mod schema;
mod patients;
mod visits;

pub use schema::*;

pub use crate::store::{StoreError, StoreResult};

use rusqlite::Connection;
use std::path::Path;

use crate::models::{Patient, Visit};
use crate::store::{CascadeOutcome, RecordStore};

/// Patients and visits held in one SQLite file (or in memory).
///
/// The schema is applied on every open; statements are idempotent.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    /// Private in-memory store, discarded on drop.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub(crate) fn transaction(&mut self) -> StoreResult<rusqlite::Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }
}

impl RecordStore for Database {
    fn insert_patient(&mut self, patient: &Patient) -> StoreResult<()> {
        Database::insert_patient(self, patient)
    }

    fn find_patients(&self, term: Option<&str>) -> StoreResult<Vec<Patient>> {
        match term {
            Some(term) => self.search_patients(term),
            None => self.list_patients(),
        }
    }

    fn find_patient(&self, id: &str) -> StoreResult<Option<Patient>> {
        self.get_patient(id)
    }

    fn delete_patient(&mut self, id: &str) -> StoreResult<bool> {
        Database::delete_patient(self, id)
    }

    fn insert_visit(&mut self, visit: &Visit) -> StoreResult<()> {
        Database::insert_visit(self, visit)
    }

    fn find_visits(&self, patient_id: &str) -> StoreResult<Vec<Visit>> {
        self.list_visits(patient_id)
    }

    fn delete_visit(&mut self, patient_id: &str, visit_id: &str) -> StoreResult<bool> {
        Database::delete_visit(self, patient_id, visit_id)
    }

    fn delete_visits(&mut self, patient_id: &str) -> StoreResult<usize> {
        Database::delete_visits(self, patient_id)
    }

    fn delete_patient_cascade(&mut self, id: &str) -> StoreResult<CascadeOutcome> {
        self.delete_patient_with_visits(id)
    }
}
