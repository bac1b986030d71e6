//! semicsv - typed delimited-text codec
//!
//! Reads and writes semicolon-separated text (separator and quote are
//! configurable), inferring a typed value for every field and quoting on
//! write only where needed to read the same value back.

pub mod buffer;
pub mod codec;
pub mod config;
pub mod error;
pub mod jsonfile;
pub mod logging;
pub mod model;
pub mod output;
pub mod parser;

pub use buffer::MessageBuffer;
pub use codec::Csv;
pub use config::CsvConfig;
pub use error::{CsvError, Result};
pub use model::{CellType, CellValue, Row, Table};
