//! Database layer for the patient registry.

mod patients;
mod query;
mod schema;

pub use query::*;
pub use schema::*;

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{GatewayConfig, StorageLocation};

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid date of birth: {0:?}")]
    InvalidDate(String),

    #[error("Only one statement can run per query")]
    MultipleStatements,

    #[error("Statement modifies the database and the console is read-only")]
    ReadOnly,
}

pub type DbResult<T> = Result<T, DbError>;

/// Name of the Unicode-aware lowercase scalar available to every statement.
pub const UNICODE_LOWER: &str = "unicode_lower";

/// SQLite's built-in `lower()` and `LIKE` only fold ASCII.
fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        UNICODE_LOWER,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|s| s.to_lowercase())),
    )
}

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database described by `config` and apply the schema.
    pub fn open_with(config: &GatewayConfig) -> DbResult<Self> {
        let conn = match &config.storage {
            StorageLocation::InMemory => Connection::open_in_memory()?,
            StorageLocation::File { path } => Connection::open(path)?,
        };
        conn.busy_timeout(config.busy_timeout())?;
        register_functions(&conn)?;
        info!(storage = ?config.storage, "Opened patient database");

        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        Self::open_with(&GatewayConfig::file(path.as_ref()))
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        Self::open_with(&GatewayConfig::in_memory())
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        debug!("Patient schema applied");
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}
