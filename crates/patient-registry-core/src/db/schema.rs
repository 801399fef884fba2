//! SQLite schema definition.

/// Complete database schema for the patient registry.
///
/// Every statement is guarded with `IF NOT EXISTS`, so applying the schema to
/// an already-initialized database is a no-op.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Patients (append-only)
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    date_of_birth TEXT NOT NULL,                 -- YYYY-MM-DD, shifted to UTC+05:30
    gender TEXT NOT NULL,
    email TEXT,
    phone TEXT,
    address TEXT,
    created_at DATE DEFAULT CURRENT_DATE
);

-- Default listing order
CREATE INDEX IF NOT EXISTS idx_patient_name ON patients (last_name, first_name);
"#;
