//! Configuration handling for the codec

use encoding_rs::{Encoding, UTF_8};

use crate::error::{CsvError, Result};

/// Default field separator
pub const DEFAULT_SEPARATOR: char = ';';

/// Default quote character
pub const DEFAULT_QUOTE: char = '"';

/// Dialect and encoding of one codec instance.
///
/// The same settings apply to reading and writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvConfig {
    /// Field separator
    pub separator: char,
    /// Quote character used to force text and protect separators
    pub quote: char,
    /// Character encoding of files and streams
    pub encoding: &'static Encoding,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            quote: DEFAULT_QUOTE,
            encoding: UTF_8,
        }
    }
}

impl CsvConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field separator
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Set the quote character
    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    /// Set the character encoding
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Set the character encoding from a WHATWG label such as `utf-8` or `windows-1252`
    pub fn with_encoding_label(self, label: &str) -> Result<Self> {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| CsvError::UnknownEncoding(label.to_string()))?;
        Ok(self.with_encoding(encoding))
    }

    /// Check that the dialect can be scanned unambiguously
    pub fn validate(&self) -> Result<()> {
        if self.separator == self.quote {
            return Err(CsvError::InvalidConfig(format!(
                "separator and quote are both {:?}",
                self.separator
            )));
        }
        for (role, c) in [("separator", self.separator), ("quote", self.quote)] {
            if c == '\n' || c == '\r' {
                return Err(CsvError::InvalidConfig(format!(
                    "{} cannot be a line break",
                    role
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CsvConfig::default();
        assert_eq!(config.separator, ';');
        assert_eq!(config.quote, '"');
        assert_eq!(config.encoding, UTF_8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_encoding_label() {
        let config = CsvConfig::new().with_encoding_label("latin1").unwrap();
        assert_eq!(config.encoding, encoding_rs::WINDOWS_1252);

        let err = CsvConfig::new().with_encoding_label("klingon").unwrap_err();
        assert!(matches!(err, CsvError::UnknownEncoding(_)));
    }

    #[test]
    fn test_validate_rejects_ambiguous_dialects() {
        assert!(CsvConfig::new().with_separator('"').validate().is_err());
        assert!(CsvConfig::new().with_separator('\n').validate().is_err());
        assert!(CsvConfig::new().with_quote('\r').validate().is_err());
        assert!(CsvConfig::new().with_separator('|').with_quote('\'').validate().is_ok());
    }
}
