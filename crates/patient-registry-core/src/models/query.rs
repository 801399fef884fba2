//! Free-form query result envelope.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One result row: column name to value, in column order.
pub type QueryRow = Map<String, Value>;

/// Outcome of a free-form query. Failures are carried as data, never raised.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryResult {
    pub success: bool,
    pub data: Vec<QueryRow>,
    pub error: Option<String>,
}

impl QueryResult {
    pub fn ok(data: Vec<QueryRow>) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// Column names of the first row; empty when there are no rows.
    pub fn columns(&self) -> Vec<&str> {
        self.data
            .first()
            .map(|row| row.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
