//! Output layer: delimited text writer and table renderers

mod json;
mod terminal;
pub mod writer;

use std::io::Write;

use anyhow::Result;

use crate::model::Table;

pub use json::{cell_value_to_json, table_to_json, JsonOutput};
pub use terminal::SummaryOutput;
pub use writer::{format_cell, format_row, render, render_lines, LINE_ENDING};

/// Trait for table renderers
pub trait OutputFormatter {
    /// Render a table to a writer
    fn render(&self, table: &Table, writer: &mut dyn Write) -> Result<()>;
}

/// Render a table to stdout
pub fn render_to_stdout(formatter: &dyn OutputFormatter, table: &Table) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    formatter.render(table, &mut stdout)
}
