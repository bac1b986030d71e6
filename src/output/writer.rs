//! Delimited text writer

use std::borrow::Cow;

use crate::config::CsvConfig;
use crate::model::{CellValue, Row, Table};
use crate::parser::{escape_newlines, reads_back_as_text};

/// Line terminator of the host platform
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// Format one cell as a field.
///
/// Line breaks in text are always escaped. Text is quoted only when it would
/// otherwise be read back as another kind of value, or when it contains the
/// quote character, the separator or a carriage return.
pub fn format_cell<'a>(cell: &'a CellValue, config: &CsvConfig) -> Cow<'a, str> {
    match cell {
        CellValue::Null => Cow::Borrowed(""),
        CellValue::Text(s) => {
            let escaped = escape_newlines(s);
            if needs_quoting(&escaped, config) {
                Cow::Owned(quote_field(&escaped, config.quote))
            } else {
                escaped
            }
        }
        CellValue::Float(_) | CellValue::Int(_) | CellValue::Bool(_) | CellValue::Timestamp(_) => {
            Cow::Owned(cell.to_string())
        }
    }
}

fn needs_quoting(text: &str, config: &CsvConfig) -> bool {
    // A bare trailing '\r' would merge into a "\r\n" terminator on read
    text.contains(config.quote)
        || text.contains(config.separator)
        || text.contains('\r')
        || !reads_back_as_text(text)
}

fn quote_field(text: &str, quote: char) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push(quote);
    for c in text.chars() {
        if c == quote {
            quoted.push(quote);
        }
        quoted.push(c);
    }
    quoted.push(quote);
    quoted
}

/// Join the formatted cells of a row with the separator
pub fn format_row(row: &Row, config: &CsvConfig) -> String {
    let mut line = String::new();
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            line.push(config.separator);
        }
        line.push_str(&format_cell(cell, config));
    }
    line
}

/// One formatted line per non-empty row, without terminators
pub fn render_lines<'a>(
    table: &'a Table,
    config: &'a CsvConfig,
) -> impl Iterator<Item = String> + 'a {
    table
        .rows
        .iter()
        .filter(|row| !row.is_empty())
        .map(move |row| format_row(row, config))
}

/// Whole-table text, every line terminated with [`LINE_ENDING`]
pub fn render(table: &Table, config: &CsvConfig) -> String {
    let mut out = String::new();
    for line in render_lines(table, config) {
        out.push_str(&line);
        out.push_str(LINE_ENDING);
    }
    out
}
