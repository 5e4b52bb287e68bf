//! SQLite schema definition.

/// Complete database schema for the clinic document store.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    phone TEXT NOT NULL UNIQUE CHECK (length(trim(phone)) > 0),
    address TEXT,
    -- Lowercased name and phone, folded in Rust so search ignores case beyond ASCII
    name_key TEXT NOT NULL,
    phone_key TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_patients_name ON patients(name);

-- ============================================================================
-- Visits (owned by exactly one patient)
-- ============================================================================

CREATE TABLE IF NOT EXISTS visits (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(id),
    disease TEXT NOT NULL CHECK (length(trim(disease)) > 0),
    medication TEXT,
    date TEXT NOT NULL,                          -- YYYY-MM-DD
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_visits_patient ON visits(patient_id);

-- Visits never change owner
CREATE TRIGGER IF NOT EXISTS visits_owner_immutable BEFORE UPDATE OF patient_id ON visits
BEGIN
    SELECT RAISE(ABORT, 'Visits cannot be reassigned to another patient');
END;
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn
    }

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = setup();
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }

    #[test]
    fn test_phone_unique() {
        let conn = setup();
        conn.execute(
            "INSERT INTO patients (id, name, phone, name_key, phone_key) VALUES ('p1', 'John', '123', 'john', '123')",
            [],
        )
        .unwrap();

        let result = conn.execute(
            "INSERT INTO patients (id, name, phone, name_key, phone_key) VALUES ('p2', 'Jane', '123', 'jane', '123')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_name_rejected() {
        let conn = setup();
        let result = conn.execute(
            "INSERT INTO patients (id, name, phone, name_key, phone_key) VALUES ('p1', '   ', '123', '   ', '123')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_visit_requires_existing_patient() {
        let conn = setup();
        let result = conn.execute(
            "INSERT INTO visits (id, patient_id, disease, date) VALUES ('v1', 'nobody', 'Flu', '2024-01-10')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_visit_owner_immutable() {
        let conn = setup();
        conn.execute_batch(
            r#"
            INSERT INTO patients (id, name, phone, name_key, phone_key) VALUES ('p1', 'John', '1', 'john', '1');
            INSERT INTO patients (id, name, phone, name_key, phone_key) VALUES ('p2', 'Jane', '2', 'jane', '2');
            INSERT INTO visits (id, patient_id, disease, date) VALUES ('v1', 'p1', 'Flu', '2024-01-10');
            "#,
        )
        .unwrap();

        let result = conn.execute("UPDATE visits SET patient_id = 'p2' WHERE id = 'v1'", []);
        assert!(result.is_err());
    }
}
