//! The codec instance: configuration plus the table it reads into and writes from

use std::io::{Read, Write};
use std::path::Path;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::config::CsvConfig;
use crate::error::{CsvError, Result};
use crate::model::{CellValue, Row, Table};
use crate::output;
use crate::parser;

/// Reads and writes one table with a fixed dialect.
///
/// Not synchronized: share an instance across threads only behind a lock,
/// or use one instance per thread.
#[derive(Debug, Clone, Default)]
pub struct Csv {
    config: CsvConfig,
    table: Table,
}

impl Csv {
    /// Codec with `;` separator, `"` quote and UTF-8
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CsvConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            table: Table::new(),
        })
    }

    pub fn with_separator(separator: char) -> Result<Self> {
        Self::with_config(CsvConfig::default().with_separator(separator))
    }

    pub fn config(&self) -> &CsvConfig {
        &self.config
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }

    pub fn rows(&self) -> &[Row] {
        &self.table.rows
    }

    pub fn rows_mut(&mut self) -> &mut Vec<Row> {
        &mut self.table.rows
    }

    pub fn into_table(self) -> Table {
        self.table
    }

    /// Replace the table with the rows parsed from `text`
    pub fn parse_str(&mut self, text: &str) {
        self.table = parser::parse_text(text, &self.config);
        debug!(rows = self.table.row_count(), "parsed table");
    }

    /// The table as delimited text, before encoding
    pub fn render(&self) -> String {
        output::render(&self.table, &self.config)
    }

    /// Replace the table with the contents of `path`.
    ///
    /// On failure the current table is left untouched.
    pub fn read_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| CsvError::from_io(path, e))?;
        debug!(path = %path.display(), bytes = bytes.len(), "read file");
        self.load_bytes(&bytes);
        Ok(())
    }

    /// Replace the table with everything `reader` yields
    pub fn read_from<R: Read>(&mut self, mut reader: R) -> Result<()> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.load_bytes(&bytes);
        Ok(())
    }

    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.encoded();
        std::fs::write(path, &bytes).map_err(|source| CsvError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), rows = self.table.row_count(), "wrote file");
        Ok(())
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.encoded())?;
        writer.flush()?;
        Ok(())
    }

    /// Non-blocking [`Csv::read_file`]
    pub async fn read_file_async(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| CsvError::from_io(path, e))?;
        debug!(path = %path.display(), bytes = bytes.len(), "read file");
        self.load_bytes(&bytes);
        Ok(())
    }

    pub async fn read_from_async<R: AsyncRead + Unpin>(&mut self, mut reader: R) -> Result<()> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        self.load_bytes(&bytes);
        Ok(())
    }

    /// Non-blocking [`Csv::write_file`]; output is byte-identical
    pub async fn write_file_async(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.encoded();
        tokio::fs::write(path, &bytes)
            .await
            .map_err(|source| CsvError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), rows = self.table.row_count(), "wrote file");
        Ok(())
    }

    pub async fn write_to_async<W: AsyncWrite + Unpin>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.encoded()).await?;
        writer.flush().await?;
        Ok(())
    }

    /// See [`Table::trim_empty_values`]
    pub fn trim_empty_values(&mut self) {
        self.table.trim_empty_values();
    }

    /// See [`Table::normalize_row_lengths`]
    pub fn normalize_row_lengths(&mut self, fill: CellValue) {
        self.table.normalize_row_lengths(fill);
    }

    fn load_bytes(&mut self, bytes: &[u8]) {
        let (text, used, had_errors) = self.config.encoding.decode(bytes);
        if had_errors {
            warn!(
                encoding = used.name(),
                "malformed byte sequences replaced while decoding"
            );
        }
        self.parse_str(&text);
    }

    fn encoded(&self) -> Vec<u8> {
        let text = self.render();
        let (bytes, used, unmappable) = self.config.encoding.encode(&text);
        if unmappable {
            warn!(
                encoding = used.name(),
                "characters without a mapping written as numeric references"
            );
        }
        bytes.into_owned()
    }
}
