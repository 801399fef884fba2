//! Patient Registry Core Library
//!
//! Local-first patient registry backed by an embedded SQLite database.
//!
//! # Architecture
//!
//! ```text
//!   Host app (registration form, directory, query console)
//!                          │
//!                   PatientRegistry
//!                  ┌───────┴────────┐
//!                  ▼                ▼
//!           ReadinessState    StorageGateway ──▶ Database (SQLite)
//!       loading/ready/failed   acquire() once      patients table
//! ```
//!
//! # Core Principle
//!
//! **The gateway is the only path to the database.** Consumers check readiness
//! before issuing queries; the gateway opens the database lazily and never
//! caches a failed open.
//!
//! # Modules
//!
//! - [`db`]: SQLite database layer
//! - [`models`]: Domain types (Patient, NewPatient, QueryResult)
//! - [`gateway`]: Shared handle, typed operations and the free-form query path
//! - [`readiness`]: Startup state machine
//! - [`registry`]: Composition root
//! - [`dates`]: Date-of-birth normalization
//! - [`config`]: Gateway settings

pub mod config;
pub mod dates;
pub mod db;
pub mod gateway;
pub mod models;
pub mod readiness;
pub mod registry;

// Re-export commonly used types
pub use config::{GatewayConfig, StorageLocation};
pub use db::Database;
pub use gateway::{GatewayError, GatewayResult, SharedDatabase, StorageGateway};
pub use models::{NewPatient, Patient, QueryResult, QueryRow};
pub use readiness::{Readiness, ReadinessState, INIT_FAILED_MESSAGE};
pub use registry::PatientRegistry;

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::Arc;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum RegistryError {
    #[error("Initialization error: {0}")]
    InitializationError(String),

    #[error("Write error: {0}")]
    WriteError(String),

    #[error("Read error: {0}")]
    ReadError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<GatewayError> for RegistryError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::Initialization(_) => RegistryError::InitializationError(e.to_string()),
            GatewayError::Write(_) => RegistryError::WriteError(e.to_string()),
            GatewayError::Read(_) => RegistryError::ReadError(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(e: serde_json::Error) -> Self {
        RegistryError::InvalidInput(e.to_string())
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open a registry backed by a database file and start it.
///
/// Startup failure is reported through [`RegistryCore::readiness`].
#[uniffi::export]
pub fn open_registry(path: String) -> Arc<RegistryCore> {
    RegistryCore::started(GatewayConfig::file(path))
}

/// Open an in-memory registry (non-persistent) and start it.
#[uniffi::export]
pub fn open_registry_in_memory() -> Arc<RegistryCore> {
    RegistryCore::started(GatewayConfig::in_memory())
}

/// Open a registry from a JSON configuration document and start it.
#[uniffi::export]
pub fn open_registry_with_config(config_json: String) -> Result<Arc<RegistryCore>, RegistryError> {
    let config = GatewayConfig::from_json(&config_json)?;
    Ok(RegistryCore::started(config))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe registry wrapper for FFI.
#[derive(uniffi::Object)]
pub struct RegistryCore {
    registry: PatientRegistry,
}

impl RegistryCore {
    fn started(config: GatewayConfig) -> Arc<Self> {
        let registry = PatientRegistry::new(config);
        registry.start();
        Arc::new(Self { registry })
    }
}

#[uniffi::export]
impl RegistryCore {
    // =========================================================================
    // Readiness
    // =========================================================================

    pub fn readiness(&self) -> FfiReadiness {
        self.registry.readiness().current().into()
    }

    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Register a patient; returns the new id.
    pub fn register_patient(&self, patient: FfiNewPatient) -> Result<i64, RegistryError> {
        Ok(self.registry.gateway().register_patient(&patient.into())?)
    }

    /// All patients ordered by last name, then first name.
    pub fn list_patients(&self) -> Result<Vec<FfiPatient>, RegistryError> {
        let patients = self.registry.gateway().list_patients()?;
        Ok(patients.into_iter().map(Into::into).collect())
    }

    /// Case-insensitive substring search on first and last name.
    pub fn search_patients_by_name(&self, term: String) -> Result<Vec<FfiPatient>, RegistryError> {
        let patients = self.registry.gateway().search_patients_by_name(&term)?;
        Ok(patients.into_iter().map(Into::into).collect())
    }

    pub fn get_patient(&self, id: i64) -> Result<Option<FfiPatient>, RegistryError> {
        Ok(self.registry.gateway().get_patient(id)?.map(Into::into))
    }

    pub fn count_patients(&self) -> Result<u64, RegistryError> {
        Ok(self.registry.gateway().count_patients()?)
    }

    // =========================================================================
    // Query Console
    // =========================================================================

    /// Run a free-form statement. `params_json` is a JSON array of values.
    /// Failures, including malformed parameters, come back in the envelope.
    pub fn execute_query(&self, sql: String, params_json: String) -> FfiQueryResult {
        let params: Vec<serde_json::Value> = if params_json.trim().is_empty() {
            Vec::new()
        } else {
            match serde_json::from_str(&params_json) {
                Ok(params) => params,
                Err(e) => return QueryResult::failed(format!("Invalid parameters: {e}")).into(),
            }
        };
        self.registry.gateway().execute_query(&sql, &params).into()
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe readiness.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum FfiReadiness {
    Loading,
    Ready,
    Failed { message: String },
}

impl From<Readiness> for FfiReadiness {
    fn from(readiness: Readiness) -> Self {
        match readiness {
            Readiness::Loading => FfiReadiness::Loading,
            Readiness::Ready => FfiReadiness::Ready,
            Readiness::Failed(message) => FfiReadiness::Failed { message },
        }
    }
}

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: Option<String>,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            first_name: patient.first_name,
            last_name: patient.last_name,
            date_of_birth: patient.date_of_birth,
            gender: patient.gender,
            email: patient.email,
            phone: patient.phone,
            address: patient.address,
            created_at: patient.created_at,
        }
    }
}

/// FFI-safe registration payload.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewPatient {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl From<FfiNewPatient> for NewPatient {
    fn from(patient: FfiNewPatient) -> Self {
        NewPatient {
            first_name: patient.first_name,
            last_name: patient.last_name,
            date_of_birth: patient.date_of_birth,
            gender: patient.gender,
            email: patient.email,
            phone: patient.phone,
            address: patient.address,
        }
    }
}

/// FFI-safe query envelope. Rows travel as a JSON array of objects.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiQueryResult {
    pub success: bool,
    pub data_json: String,
    pub row_count: u32,
    pub error: Option<String>,
}

impl From<QueryResult> for FfiQueryResult {
    fn from(result: QueryResult) -> Self {
        let data_json = serde_json::Value::Array(
            result
                .data
                .iter()
                .cloned()
                .map(serde_json::Value::Object)
                .collect(),
        )
        .to_string();
        Self {
            success: result.success,
            row_count: result.data.len() as u32,
            data_json,
            error: result.error,
        }
    }
}
