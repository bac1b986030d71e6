//! Parser layer: line tokenizer and field type converter

mod convert;
mod tokenizer;

pub use self::convert::{convert_field, infer_scalar, reads_back_as_text, NEWLINE_TOKEN};
pub use self::tokenizer::{parse_line, split_line};

pub(crate) use self::convert::escape_newlines;

use crate::config::CsvConfig;
use crate::model::Table;

/// Parse decoded text into a table, one row per line.
///
/// Both `\n` and `\r\n` terminate a line. A final terminator does not add an
/// empty row.
pub fn parse_text(text: &str, config: &CsvConfig) -> Table {
    let rows = text
        .lines()
        .map(|line| parse_line(line, config.separator, config.quote))
        .collect();
    Table::from_rows(rows)
}
