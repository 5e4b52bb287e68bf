//! Visit database operations.

use rusqlite::{params, Row};

use super::{Database, StoreResult};
use crate::models::Visit;

fn visit_from_row(row: &Row<'_>) -> rusqlite::Result<Visit> {
    Ok(Visit {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        disease: row.get(2)?,
        medication: row.get(3)?,
        date: row.get(4)?,
        created_at: row.get(5)?,
    })
}

impl Database {
    /// Insert a new visit. The owning patient must exist.
    pub fn insert_visit(&self, visit: &Visit) -> StoreResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO visits (id, patient_id, disease, medication, date, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                visit.id,
                visit.patient_id,
                visit.disease,
                visit.medication,
                visit.date,
                visit.created_at,
            ],
        )?;
        Ok(())
    }

    /// List a patient's visits in the order they were recorded.
    pub fn list_visits(&self, patient_id: &str) -> StoreResult<Vec<Visit>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, patient_id, disease, medication, date, created_at
            FROM visits
            WHERE patient_id = ?
            ORDER BY rowid
            "#,
        )?;

        let rows = stmt.query_map([patient_id], visit_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a single visit belonging to `patient_id`.
    pub fn delete_visit(&self, patient_id: &str, visit_id: &str) -> StoreResult<bool> {
        let rows_affected = self.conn.execute(
            "DELETE FROM visits WHERE id = ? AND patient_id = ?",
            [visit_id, patient_id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Delete all visits of a patient.
    pub fn delete_visits(&self, patient_id: &str) -> StoreResult<usize> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM visits WHERE patient_id = ?", [patient_id])?;
        Ok(rows_affected)
    }
}
