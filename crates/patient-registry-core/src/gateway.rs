//! Storage gateway: the only path to the patient database.
//!
//! The gateway owns one lazily opened [`Database`]. The first successful
//! [`StorageGateway::acquire`] opens it and applies the schema; later calls
//! hand out the same handle. A failed open leaves the slot empty so the next
//! call starts over.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::GatewayConfig;
use crate::db::{Database, DbError};
use crate::models::{NewPatient, Patient, QueryResult};

/// Shared handle to the open database.
pub type SharedDatabase = Arc<Mutex<Database>>;

/// Errors from the structured gateway operations.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Database initialization failed: {0}")]
    Initialization(#[source] DbError),

    #[error("Patient write failed: {0}")]
    Write(#[source] DbError),

    #[error("Patient read failed: {0}")]
    Read(#[source] DbError),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Owner of the single database handle.
pub struct StorageGateway {
    config: GatewayConfig,
    slot: Mutex<Option<SharedDatabase>>,
    initializations: AtomicU64,
}

/// Lock a mutex, recovering the guard if a previous holder panicked.
/// A panic mid-statement leaves the connection usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl StorageGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            slot: Mutex::new(None),
            initializations: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Number of times the database was opened and the schema applied.
    pub fn initializations(&self) -> u64 {
        self.initializations.load(Ordering::SeqCst)
    }

    /// Whether a handle is currently open.
    pub fn is_initialized(&self) -> bool {
        lock(&self.slot).is_some()
    }

    /// Return the shared handle, opening the database on first use.
    ///
    /// Concurrent callers block on the slot, so the schema is applied once.
    pub fn acquire(&self) -> GatewayResult<SharedDatabase> {
        let mut slot = lock(&self.slot);
        if let Some(db) = slot.as_ref() {
            return Ok(Arc::clone(db));
        }

        let db = Database::open_with(&self.config).map_err(|e| {
            warn!(error = %e, "Patient database initialization failed");
            GatewayError::Initialization(e)
        })?;
        let count = self.initializations.fetch_add(1, Ordering::SeqCst) + 1;
        info!(initializations = count, "Patient database ready");

        let db = Arc::new(Mutex::new(db));
        *slot = Some(Arc::clone(&db));
        Ok(db)
    }

    /// Register a patient and return the new id.
    pub fn register_patient(&self, patient: &NewPatient) -> GatewayResult<i64> {
        let handle = self.acquire()?;
        let db = lock(&handle);
        let id = db.insert_patient(patient).map_err(GatewayError::Write)?;
        debug!(id, "Registered patient");
        Ok(id)
    }

    /// All patients ordered by last name, then first name.
    pub fn list_patients(&self) -> GatewayResult<Vec<Patient>> {
        let handle = self.acquire()?;
        let db = lock(&handle);
        let patients = db.list_patients().map_err(GatewayError::Read)?;
        debug!(count = patients.len(), "Listed patients");
        Ok(patients)
    }

    /// Patients whose first or last name contains `term`, case-insensitively.
    /// An empty term matches everyone.
    pub fn search_patients_by_name(&self, term: &str) -> GatewayResult<Vec<Patient>> {
        let handle = self.acquire()?;
        let db = lock(&handle);
        let patients = db
            .search_patients_by_name(term)
            .map_err(GatewayError::Read)?;
        debug!(term, count = patients.len(), "Searched patients");
        Ok(patients)
    }

    pub fn get_patient(&self, id: i64) -> GatewayResult<Option<Patient>> {
        let handle = self.acquire()?;
        let db = lock(&handle);
        db.get_patient(id).map_err(GatewayError::Read)
    }

    pub fn count_patients(&self) -> GatewayResult<u64> {
        let handle = self.acquire()?;
        let db = lock(&handle);
        db.count_patients().map_err(GatewayError::Read)
    }

    /// Run a free-form statement. Never fails: errors, including a failed
    /// initialization, are reported inside the envelope.
    pub fn execute_query(&self, sql: &str, params: &[Value]) -> QueryResult {
        let handle = match self.acquire() {
            Ok(handle) => handle,
            Err(e) => return QueryResult::failed(e.to_string()),
        };

        let db = lock(&handle);
        match db.execute_raw(sql, params, self.config.console_read_only) {
            Ok(rows) => {
                debug!(rows = rows.len(), "Console query succeeded");
                QueryResult::ok(rows)
            }
            Err(e) => {
                warn!(error = %e, "Console query failed");
                QueryResult::failed(e.to_string())
            }
        }
    }
}

impl Default for StorageGateway {
    fn default() -> Self {
        Self::new(GatewayConfig::default())
    }
}
