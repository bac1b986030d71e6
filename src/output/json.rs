//! JSON output format

use std::io::Write;

use anyhow::Result;

use crate::model::{CellValue, Table, TIMESTAMP_FORMAT};

use super::OutputFormatter;

/// Renders a table as a JSON array of row arrays
pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-finite floats have no JSON form and become `null`
pub fn cell_value_to_json(value: &CellValue) -> serde_json::Value {
    match value {
        CellValue::Null => serde_json::Value::Null,
        CellValue::Bool(b) => serde_json::Value::Bool(*b),
        CellValue::Int(i) => serde_json::json!(*i),
        CellValue::Float(f) => serde_json::json!(*f),
        CellValue::Text(s) => serde_json::Value::String(s.clone()),
        CellValue::Timestamp(ts) => {
            serde_json::Value::String(ts.format(TIMESTAMP_FORMAT).to_string())
        }
    }
}

pub fn table_to_json(table: &Table) -> serde_json::Value {
    serde_json::Value::Array(
        table
            .rows
            .iter()
            .map(|row| serde_json::Value::Array(row.iter().map(cell_value_to_json).collect()))
            .collect(),
    )
}

impl OutputFormatter for JsonOutput {
    fn render(&self, table: &Table, writer: &mut dyn Write) -> Result<()> {
        let output = table_to_json(table);

        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &output)?;
        } else {
            serde_json::to_writer(&mut *writer, &output)?;
        }
        writeln!(writer)?;

        Ok(())
    }
}
