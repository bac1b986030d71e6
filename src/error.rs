//! Error types for the codec

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the codec and its helpers.
///
/// Parsing itself never fails: malformed quoting and ambiguous values are
/// resolved permissively, so every variant here comes from I/O, configuration
/// or the JSON helper.
#[derive(Debug, Error)]
pub enum CsvError {
    /// The source path does not exist
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Read or write failure on a named path
    #[error("I/O error on {}: {}", path.display(), source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Read or write failure on a caller-supplied stream
    #[error("stream I/O error: {0}")]
    Stream(#[from] std::io::Error),

    #[error("unknown encoding label: {0}")]
    UnknownEncoding(String),

    #[error("invalid codec configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error on {}: {}", path.display(), source)]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl CsvError {
    /// Classify an I/O error raised while accessing `path`
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            CsvError::NotFound { path }
        } else {
            CsvError::Io { path, source }
        }
    }
}

pub type Result<T> = std::result::Result<T, CsvError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_classified() {
        let err = CsvError::from_io(
            "missing.csv",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, CsvError::NotFound { .. }));
        assert_eq!(err.to_string(), "file not found: missing.csv");
    }

    #[test]
    fn test_other_io_errors_keep_source() {
        let err = CsvError::from_io(
            "locked.csv",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, CsvError::Io { .. }));
    }
}
