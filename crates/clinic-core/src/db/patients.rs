//! Patient database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, StoreError, StoreResult};
use crate::models::Patient;
use crate::store::CascadeOutcome;

const PATIENT_COLUMNS: &str = "id, name, phone, address, created_at";

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        address: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Build a `LIKE` pattern matching `term` literally anywhere in a column.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl Database {
    /// Insert a new patient.
    pub fn insert_patient(&self, patient: &Patient) -> StoreResult<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO patients (id, name, phone, address, name_key, phone_key, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    patient.id,
                    patient.name,
                    patient.phone,
                    patient.address,
                    patient.name.to_lowercase(),
                    patient.phone.to_lowercase(),
                    patient.created_at,
                ],
            )
            .map_err(|e| match &e {
                rusqlite::Error::SqliteFailure(err, _)
                    if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
                {
                    StoreError::Conflict(format!(
                        "phone {} is already registered",
                        patient.phone
                    ))
                }
                _ => e.into(),
            })?;
        Ok(())
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: &str) -> StoreResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?"),
                [id],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Search patients by name or phone (substring, case-insensitive).
    ///
    /// Matches against the stored lowercase keys, so the comparison folds
    /// case the same way [`Patient::matches`] does.
    pub fn search_patients(&self, term: &str) -> StoreResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {PATIENT_COLUMNS}
            FROM patients
            WHERE name_key LIKE ?1 ESCAPE '\' OR phone_key LIKE ?1 ESCAPE '\'
            ORDER BY rowid
            "#
        ))?;

        let pattern = contains_pattern(&term.to_lowercase());
        let rows = stmt.query_map([pattern], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// List all patients in registration order.
    pub fn list_patients(&self) -> StoreResult<Vec<Patient>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {PATIENT_COLUMNS} FROM patients ORDER BY rowid"))?;

        let rows = stmt.query_map([], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a patient row. Fails while visits still reference it.
    pub fn delete_patient(&self, id: &str) -> StoreResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM patients WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Delete a patient and its visits in one transaction.
    pub fn delete_patient_with_visits(&mut self, id: &str) -> StoreResult<CascadeOutcome> {
        let tx = self.transaction()?;
        let visits_removed = tx.execute("DELETE FROM visits WHERE patient_id = ?", [id])?;
        let patients_removed = tx.execute("DELETE FROM patients WHERE id = ?", [id])?;
        tx.commit()?;

        Ok(CascadeOutcome {
            patient_removed: patients_removed > 0,
            visits_removed,
        })
    }
}
