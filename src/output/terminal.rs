//! Plain-text table summary for the terminal

use std::io::Write;

use anyhow::Result;

use crate::model::Table;

use super::OutputFormatter;

/// Row count, widest row, and the widened type of each column
pub struct SummaryOutput {
    label: String,
}

impl SummaryOutput {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl OutputFormatter for SummaryOutput {
    fn render(&self, table: &Table, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "{}", self.label)?;
        writeln!(writer, "  rows:    {}", table.row_count())?;
        writeln!(writer, "  columns: {}", table.max_row_len())?;

        let types = table.column_types();
        if !types.is_empty() {
            writeln!(writer)?;
            let width = (types.len() - 1).to_string().len();
            for (i, t) in types.iter().enumerate() {
                writeln!(writer, "  [{:>width$}] {}", i, t, width = width)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row;

    #[test]
    fn test_summary() {
        let table = Table::from_rows(vec![row!["a", 1.0], row!["b", 2, true]]);
        let mut buf = Vec::new();
        SummaryOutput::new("data.csv").render(&table, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();

        assert!(out.starts_with("data.csv\n"));
        assert!(out.contains("rows:    2"));
        assert!(out.contains("columns: 3"));
        assert!(out.contains("[0] text"));
        assert!(out.contains("[1] float"));
        assert!(out.contains("[2] bool"));
    }
}
