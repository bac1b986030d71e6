//! Load and save JSON documents on disk

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::{CsvError, Result};

/// Deserialize `path` into `T`. A missing file yields `None`.
pub fn load<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Option<T>> {
    let path = path.as_ref();
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(CsvError::from_io(path, e)),
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| CsvError::Json {
            path: path.to_path_buf(),
            source,
        })
}

/// Serialize `value` to `path` with two-space indentation
pub fn save<T: Serialize + ?Sized>(value: &T, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(value).map_err(|source| CsvError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    write(path, json.as_bytes())
}

/// Untyped load. Unlike [`load`], a missing file is an error.
pub fn load_value(path: impl AsRef<Path>) -> Result<serde_json::Value> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| CsvError::from_io(path, e))?;
    serde_json::from_str(&text).map_err(|source| CsvError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Untyped save, indenting each level with `indentation` copies of `indent_char`
pub fn save_value(
    value: &serde_json::Value,
    path: impl AsRef<Path>,
    indentation: usize,
    indent_char: char,
) -> Result<()> {
    let path = path.as_ref();
    let indent: String = std::iter::repeat(indent_char).take(indentation).collect();

    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
    value
        .serialize(&mut serializer)
        .map_err(|source| CsvError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    write(path, &buf)
}

fn write(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).map_err(|source| CsvError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellValue, Table};
    use crate::row;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Settings {
        separator: char,
        columns: Vec<String>,
    }

    #[test]
    fn test_typed_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            separator: '|',
            columns: vec!["Name".into(), "Age".into()],
        };

        save(&settings, &path).unwrap();
        let loaded: Option<Settings> = load(&path).unwrap();
        assert_eq!(loaded, Some(settings));
    }

    #[test]
    fn test_table_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.json");
        let table = Table::from_rows(vec![
            row!["Name", "When", "Count"],
            row!["2024-01-01T00:00:00", 3, f64::INFINITY],
        ]);

        save(&table, &path).unwrap();
        let loaded: Table = load(&path).unwrap().unwrap();
        assert!(matches!(loaded.rows[1][0], CellValue::Text(_)));
        assert!(matches!(loaded.rows[1][1], CellValue::Int(3)));
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");

        let loaded: Option<Settings> = load(&path).unwrap();
        assert!(loaded.is_none());
        assert!(matches!(load_value(&path), Err(CsvError::NotFound { .. })));
    }

    #[test]
    fn test_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result: Result<Option<Settings>> = load(&path);
        assert!(matches!(result, Err(CsvError::Json { .. })));
    }

    #[test]
    fn test_custom_indentation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("value.json");
        let value = serde_json::json!({ "a": [1] });

        save_value(&value, &path, 1, '\t').unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "{\n\t\"a\": [\n\t\t1\n\t]\n}"
        );
        assert_eq!(load_value(&path).unwrap(), value);
    }
}
