//! Free-form statement execution for the query console.

use rusqlite::{params_from_iter, Batch};
use rusqlite::types::{Value as SqlValue, ValueRef};
use serde_json::{Number, Value};

use super::{Database, DbError, DbResult};
use crate::models::QueryRow;

/// Convert a JSON parameter into a bindable SQLite value.
///
/// Arrays and objects are bound as their JSON text.
pub fn json_to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => n.as_f64().map_or(SqlValue::Null, SqlValue::Real),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => SqlValue::Text(value.to_string()),
    }
}

/// Convert a column value into JSON. Blobs become arrays of bytes.
pub fn sql_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Array(bytes.iter().map(|b| Value::from(*b)).collect()),
    }
}

impl Database {
    /// Execute a single parameterized statement and collect its rows.
    ///
    /// Statements that produce no rows (DDL, INSERT without RETURNING) yield an
    /// empty vector, as does input holding only whitespace or comments. Input
    /// with more than one statement is rejected before anything runs. With
    /// `read_only` set, statements that would write are rejected too.
    pub fn execute_raw(&self, sql: &str, params: &[Value], read_only: bool) -> DbResult<Vec<QueryRow>> {
        let mut batch = Batch::new(&self.conn, sql);
        let Some(mut stmt) = batch.next()? else {
            return Ok(Vec::new());
        };
        if batch.next()?.is_some() {
            return Err(DbError::MultipleStatements);
        }
        if read_only && !stmt.readonly() {
            return Err(DbError::ReadOnly);
        }

        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        let mut rows = stmt.query(params_from_iter(params.iter().map(json_to_sql)))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = QueryRow::new();
            for (idx, name) in columns.iter().enumerate() {
                record.insert(name.clone(), sql_to_json(row.get_ref(idx)?));
            }
            out.push(record);
        }
        Ok(out)
    }
}
