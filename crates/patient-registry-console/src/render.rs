//! Tabular rendering of console results.

use chrono::FixedOffset;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;

use patient_registry_core::dates::{parse_instant, STORAGE_OFFSET_MINUTES};
use patient_registry_core::QueryResult;

/// Columns always rendered as dates.
const DATE_COLUMNS: &[&str] = &["created_at", "date_of_birth"];

const NULL_CELL: &str = "null";

/// Render a date as `DD/MM/YYYY` at UTC+05:30. Unparseable input is returned
/// unchanged.
pub fn format_regional_date(value: &str) -> String {
    let Some(offset) = FixedOffset::east_opt((STORAGE_OFFSET_MINUTES * 60) as i32) else {
        return value.to_string();
    };
    parse_instant(value)
        .map(|instant| instant.with_timezone(&offset).format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| value.to_string())
}

/// `YYYY-MM-DD`, optionally followed by `T` and anything.
fn looks_like_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() < 10 {
        return false;
    }
    let shape_ok = bytes[..10].iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    shape_ok && (bytes.len() == 10 || bytes[10] == b'T')
}

/// Display text for one cell.
pub fn display_cell(column: &str, value: &Value) -> String {
    match value {
        Value::Null => NULL_CELL.to_string(),
        Value::String(s) if DATE_COLUMNS.contains(&column) || looks_like_date(s) => {
            format_regional_date(s)
        }
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
    }
}

/// A successful, non-empty result laid out for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ConsoleTable {
    /// `None` for failed or empty results; there is nothing to tabulate.
    pub fn from_result(result: &QueryResult) -> Option<Self> {
        if !result.success || result.data.is_empty() {
            return None;
        }

        let columns = result.columns().into_iter().map(String::from).collect();
        let rows = result
            .data
            .iter()
            .map(|row| {
                row.iter()
                    .map(|(column, value)| display_cell(column, value))
                    .collect()
            })
            .collect();

        Some(Self { columns, rows })
    }

    /// Footer line, e.g. "Showing 1 record".
    pub fn summary(&self) -> String {
        let noun = if self.rows.len() == 1 { "record" } else { "records" };
        format!("Showing {} {}", self.rows.len(), noun)
    }

    /// Column-aligned plain text with a header rule.
    pub fn to_text(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.columns.iter().cloned());
        for row in &self.rows {
            builder.push_record(row.iter().cloned());
        }
        builder.build().with(Style::psql()).to_string()
    }

    /// RFC 4180 CSV of the displayed cells.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        for record in std::iter::once(&self.columns).chain(&self.rows) {
            let fields: Vec<String> = record.iter().map(|f| csv_field(f)).collect();
            out.push_str(&fields.join(","));
            out.push_str("\r\n");
        }
        out
    }
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
