//! Table, Row, and Cell data structures

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::schema::CellType;

/// Timestamp projection used when writing. The fraction is omitted when zero.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A cell value with type information.
///
/// Serialized with an explicit variant tag, so text that looks like a number
/// or a date keeps its kind through a JSON save and load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CellValue {
    Null,
    Float(#[serde(with = "float_repr")] f64),
    Int(i64),
    Bool(bool),
    Timestamp(NaiveDateTime),
    Text(String),
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => {
                // Handle NaN comparison
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            (CellValue::Timestamp(a), CellValue::Timestamp(b)) => a == b,
            // Cross-type numeric comparison
            (CellValue::Int(a), CellValue::Float(b)) => (*a as f64) == *b,
            (CellValue::Float(a), CellValue::Int(b)) => *a == (*b as f64),
            _ => false,
        }
    }
}

impl CellValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Null, or text that is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// The kind of value held
    pub fn cell_type(&self) -> CellType {
        match self {
            CellValue::Null => CellType::Null,
            CellValue::Float(_) => CellType::Float,
            CellValue::Int(_) => CellType::Int,
            CellValue::Bool(_) => CellType::Bool,
            CellValue::Timestamp(_) => CellType::Timestamp,
            CellValue::Text(_) => CellType::Text,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of `Float` and `Int` cells
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(f) => Some(*f),
            CellValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&NaiveDateTime> {
        match self {
            CellValue::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }
}

/// String projection of a float that reads back as the same float
pub fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        f.to_string()
    }
}

/// JSON has no NaN or infinities, so those are stored as their written words
mod float_repr {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::format_float;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_str(&format_float(*value))
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Word(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(f) => Ok(f),
            Repr::Word(word) => match word.as_str() {
                "NaN" => Ok(f64::NAN),
                "Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                other => Err(D::Error::custom(format!("invalid float: {}", other))),
            },
        }
    }
}

/// Written form of a value, before any quoting. `Null` projects to the empty string.
impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Float(v) => f.write_str(&format_float(*v)),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Bool(true) => f.write_str("True"),
            CellValue::Bool(false) => f.write_str("False"),
            CellValue::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<i32> for CellValue {
    fn from(i: i32) -> Self {
        CellValue::Int(i64::from(i))
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(ts: NaiveDateTime) -> Self {
        CellValue::Timestamp(ts)
    }
}

impl<T> From<Option<T>> for CellValue
where
    T: Into<CellValue>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Null,
        }
    }
}

/// A row is addressed by column position only
pub type Row = Vec<CellValue>;

/// Build a [`Row`] from heterogeneous values
#[macro_export]
macro_rules! row {
    () => { $crate::model::Row::new() };
    ($($value:expr),+ $(,)?) => {
        vec![$($crate::model::CellValue::from($value)),+]
    };
}

/// An in-memory matrix of typed cells
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    /// All rows, in source order
    pub rows: Vec<Row>,
}

impl Table {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Add a row to the table
    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row, 0 for an empty table
    pub fn max_row_len(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Get a cell by row and column position
    pub fn get(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Remove every blank cell from every row, wherever it sits.
    ///
    /// Cells after a removed one shift left, so column alignment is not
    /// preserved across rows.
    pub fn trim_empty_values(&mut self) {
        for row in &mut self.rows {
            row.retain(|cell| !cell.is_blank());
        }
    }

    /// Pad every row with `fill` up to the length of the longest row
    pub fn normalize_row_lengths(&mut self, fill: CellValue) {
        let max_len = self.max_row_len();
        for row in &mut self.rows {
            if row.len() < max_len {
                row.resize(max_len, fill.clone());
            }
        }
    }

    /// Widened type of each column position across all rows
    pub fn column_types(&self) -> Vec<CellType> {
        let mut types = vec![CellType::Null; self.max_row_len()];
        for row in &self.rows {
            for (inferred, cell) in types.iter_mut().zip(row) {
                *inferred = inferred.widen(cell.cell_type());
            }
        }
        types
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_projection() {
        assert_eq!(CellValue::Null.to_string(), "");
        assert_eq!(CellValue::Bool(true).to_string(), "True");
        assert_eq!(CellValue::Bool(false).to_string(), "False");
        assert_eq!(CellValue::Int(-42).to_string(), "-42");
        assert_eq!(CellValue::Float(30.0).to_string(), "30");
        assert_eq!(CellValue::Float(3.25).to_string(), "3.25");
        assert_eq!(CellValue::Float(f64::NAN).to_string(), "NaN");
        assert_eq!(CellValue::Float(f64::NEG_INFINITY).to_string(), "-Infinity");

        let ts = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(8, 5, 0)
            .unwrap();
        assert_eq!(CellValue::Timestamp(ts).to_string(), "2024-03-09 08:05:00");
        let ts = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_milli_opt(8, 5, 0, 250)
            .unwrap();
        assert_eq!(CellValue::Timestamp(ts).to_string(), "2024-03-09 08:05:00.250");
    }

    #[test]
    fn test_numeric_equality() {
        assert_eq!(CellValue::Int(30), CellValue::Float(30.0));
        assert_eq!(CellValue::Float(f64::NAN), CellValue::Float(f64::NAN));
        assert_ne!(CellValue::Int(30), CellValue::Text("30".into()));
    }

    #[test]
    fn test_json_keeps_variants() {
        let table = Table::from_rows(vec![
            row!["2024-01-01T00:00:00", 3, f64::NAN, None::<i64>],
            row!["42", true, f64::NEG_INFINITY, 2.5],
        ]);
        let json = serde_json::to_string(&table).unwrap();
        let back: Table = serde_json::from_str(&json).unwrap();

        assert!(matches!(back.rows[0][0], CellValue::Text(_)));
        assert!(matches!(back.rows[0][1], CellValue::Int(3)));
        assert!(matches!(back.rows[0][2], CellValue::Float(f) if f.is_nan()));
        assert!(back.rows[0][3].is_null());
        assert!(matches!(back.rows[1][0], CellValue::Text(_)));
        assert_eq!(back, table);
    }

    #[test]
    fn test_row_macro() {
        let row = row!["John", 30, true, None::<i64>];
        assert_eq!(
            row,
            vec![
                CellValue::Text("John".into()),
                CellValue::Int(30),
                CellValue::Bool(true),
                CellValue::Null
            ]
        );
        assert!(row![].is_empty());
    }

    #[test]
    fn test_trim_removes_all_blank_cells() {
        let mut table = Table::from_rows(vec![
            row![None::<i64>, "John", None::<i64>, 30],
            row![None::<i64>, None::<i64>],
            row!["  ", "Doe", ""],
        ]);
        table.trim_empty_values();

        assert_eq!(table.rows[0], row!["John", 30]);
        assert!(table.rows[1].is_empty());
        assert_eq!(table.rows[2], row!["Doe"]);
    }

    #[test]
    fn test_normalize_pads_with_fill() {
        let mut table = Table::from_rows(vec![row!["John"], row!["Doe", 30], row![]]);
        table.normalize_row_lengths(CellValue::from("Missing"));

        assert_eq!(table.rows[0], row!["John", "Missing"]);
        assert_eq!(table.rows[1], row!["Doe", 30]);
        assert_eq!(table.rows[2], row!["Missing", "Missing"]);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut once = Table::from_rows(vec![row![1], row![1, 2, 3], row![1, 2]]);
        once.normalize_row_lengths(CellValue::Null);
        let mut twice = once.clone();
        twice.normalize_row_lengths(CellValue::Null);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_empty_table() {
        let mut table = Table::new();
        table.normalize_row_lengths(CellValue::Null);
        assert!(table.is_empty());
    }

    #[test]
    fn test_column_types() {
        let table = Table::from_rows(vec![
            row!["Name", 1.5, true],
            row!["Doe", 2, None::<bool>, "extra"],
        ]);
        assert_eq!(
            table.column_types(),
            vec![CellType::Text, CellType::Float, CellType::Bool, CellType::Text]
        );
    }
}
