//! Patient database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::dates::normalize_date_of_birth;
use crate::models::{NewPatient, Patient};

const PATIENT_COLUMNS: &str = "id, first_name, last_name, date_of_birth, gender, \
                               email, phone, address, created_at";

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        date_of_birth: row.get(3)?,
        gender: row.get(4)?,
        email: row.get(5)?,
        phone: row.get(6)?,
        address: row.get(7)?,
        created_at: row.get(8)?,
    })
}

impl Database {
    /// Insert a new patient, returning the assigned id.
    ///
    /// The date of birth is normalized to UTC+05:30 and blank optional fields
    /// are stored as NULL.
    pub fn insert_patient(&self, patient: &NewPatient) -> DbResult<i64> {
        let date_of_birth = normalize_date_of_birth(&patient.date_of_birth)
            .ok_or_else(|| DbError::InvalidDate(patient.date_of_birth.clone()))?;

        let id = self.conn.query_row(
            r#"
            INSERT INTO patients (
                first_name, last_name, date_of_birth, gender, email, phone, address
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING id
            "#,
            params![
                patient.first_name,
                patient.last_name,
                date_of_birth,
                patient.gender,
                patient.stored_email(),
                patient.stored_phone(),
                patient.stored_address(),
            ],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// Get a patient by id.
    pub fn get_patient(&self, id: i64) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?"),
                [id],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all patients by last name, then first name.
    pub fn list_patients(&self) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients ORDER BY last_name, first_name"
        ))?;

        let rows = stmt.query_map([], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Search patients whose first or last name contains `term`.
    ///
    /// Both sides are lowercased with Unicode rules before matching. The term
    /// is wrapped in `%` as-is, so an empty term matches every patient and
    /// `%`/`_` inside it act as wildcards.
    pub fn search_patients_by_name(&self, term: &str) -> DbResult<Vec<Patient>> {
        let pattern = format!("%{}%", term);
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {PATIENT_COLUMNS}
            FROM patients
            WHERE unicode_lower(first_name) LIKE unicode_lower(?1)
               OR unicode_lower(last_name) LIKE unicode_lower(?1)
            ORDER BY last_name, first_name
            "#
        ))?;

        let rows = stmt.query_map([pattern], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Count registered patients.
    pub fn count_patients(&self) -> DbResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}
