//! Query console session.

use serde_json::Value;
use thiserror::Error;

use patient_registry_core::{PatientRegistry, QueryResult};

use crate::messages::present;
use crate::render::ConsoleTable;

/// Query the console starts with.
pub const DEFAULT_QUERY: &str = "SELECT * FROM patients";

/// Reasons a console run did not reach the database.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    #[error("Registry is not ready")]
    NotReady,

    #[error("Query is empty")]
    EmptyQuery,
}

/// What the console shows after a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleOutput {
    /// Envelope with the friendly error message applied.
    pub result: QueryResult,
    /// Present for successful, non-empty results.
    pub table: Option<ConsoleTable>,
}

/// A console bound to a registry.
pub struct QueryConsole<'a> {
    registry: &'a PatientRegistry,
}

impl<'a> QueryConsole<'a> {
    pub fn new(registry: &'a PatientRegistry) -> Self {
        Self { registry }
    }

    /// Run `sql` with positional parameters.
    ///
    /// Refuses to run before the registry is ready or when `sql` is blank.
    pub fn run(&self, sql: &str, params: &[Value]) -> Result<ConsoleOutput, ConsoleError> {
        if !self.registry.readiness().is_ready() {
            return Err(ConsoleError::NotReady);
        }
        if sql.trim().is_empty() {
            return Err(ConsoleError::EmptyQuery);
        }

        let result = present(self.registry.gateway().execute_query(sql, params));
        let table = ConsoleTable::from_result(&result);
        Ok(ConsoleOutput { result, table })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::MALFORMED_QUERY_MESSAGE;
    use patient_registry_core::{GatewayConfig, NewPatient};

    fn started() -> PatientRegistry {
        let registry = PatientRegistry::new(GatewayConfig::in_memory());
        registry.start();
        registry
    }

    #[test]
    fn test_not_ready() {
        let registry = PatientRegistry::new(GatewayConfig::in_memory());
        let console = QueryConsole::new(&registry);
        assert_eq!(console.run(DEFAULT_QUERY, &[]), Err(ConsoleError::NotReady));
        assert!(!registry.gateway().is_initialized());
    }

    #[test]
    fn test_blank_query() {
        let registry = started();
        let console = QueryConsole::new(&registry);
        assert_eq!(console.run("  \n", &[]), Err(ConsoleError::EmptyQuery));
    }

    #[test]
    fn test_default_query_renders_table() {
        let registry = started();
        registry
            .gateway()
            .register_patient(&NewPatient::new("Ana", "Rao", "1990-05-01", "female"))
            .unwrap();

        let output = QueryConsole::new(&registry).run(DEFAULT_QUERY, &[]).unwrap();
        assert!(output.result.success);

        let table = output.table.unwrap();
        assert_eq!(
            table.columns,
            vec![
                "id",
                "first_name",
                "last_name",
                "date_of_birth",
                "gender",
                "email",
                "phone",
                "address",
                "created_at"
            ]
        );
        assert_eq!(table.rows[0][1], "Ana");
        assert_eq!(table.rows[0][3], "01/05/1990");
        assert_eq!(table.rows[0][5], "null");
        assert_eq!(table.summary(), "Showing 1 record");
    }

    #[test]
    fn test_syntax_error_is_friendly() {
        let registry = started();
        let output = QueryConsole::new(&registry).run("SELEC * FROM x", &[]).unwrap();
        assert!(!output.result.success);
        assert_eq!(output.result.error.as_deref(), Some(MALFORMED_QUERY_MESSAGE));
        assert!(output.table.is_none());
    }
}
