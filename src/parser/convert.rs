//! Raw field to typed cell conversion
//!
//! Inference order is fixed: blank, quoted text, float, integer, boolean,
//! timestamp, then plain text. The first rule that matches wins. The writer
//! shares [`infer_scalar`] so that what it leaves unquoted is read back as
//! the same kind of value.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::model::CellValue;

/// Two-character token standing for a line break inside a field
pub const NEWLINE_TOKEN: &str = "\\n";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%d/%m/%Y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

/// Convert one raw field, as captured by the tokenizer, into a cell.
///
/// A field wrapped in `quote` is always text, whatever it contains. Doubled
/// quotes have already been collapsed by the tokenizer, so only the
/// surrounding pair is stripped here.
pub fn convert_field(raw: &str, quote: char) -> CellValue {
    if raw.trim().is_empty() {
        return CellValue::Null;
    }

    if let Some(inner) = strip_quotes(raw, quote) {
        return CellValue::Text(unescape_newlines(inner).into_owned());
    }

    infer_scalar(raw).unwrap_or_else(|| CellValue::Text(unescape_newlines(raw).into_owned()))
}

/// Float, integer, boolean or timestamp reading of `s`, in that order
pub fn infer_scalar(s: &str) -> Option<CellValue> {
    if let Some(f) = parse_float(s) {
        return Some(CellValue::Float(f));
    }
    if let Some(i) = parse_int(s) {
        return Some(CellValue::Int(i));
    }
    if let Some(b) = parse_bool(s) {
        return Some(CellValue::Bool(b));
    }
    parse_timestamp(s).map(CellValue::Timestamp)
}

/// True when an unquoted field holding `s` would be read back as text
pub fn reads_back_as_text(s: &str) -> bool {
    !s.trim().is_empty() && infer_scalar(s).is_none()
}

fn strip_quotes(raw: &str, quote: char) -> Option<&str> {
    raw.strip_prefix(quote)?.strip_suffix(quote)
}

pub(crate) fn unescape_newlines(s: &str) -> Cow<'_, str> {
    if s.contains(NEWLINE_TOKEN) {
        Cow::Owned(s.replace(NEWLINE_TOKEN, "\n"))
    } else {
        Cow::Borrowed(s)
    }
}

pub(crate) fn escape_newlines(s: &str) -> Cow<'_, str> {
    if s.contains('\n') {
        Cow::Owned(s.replace('\n', NEWLINE_TOKEN))
    } else {
        Cow::Borrowed(s)
    }
}

/// Locale-invariant decimal grammar, plus `NaN` and `Infinity`
fn parse_float(s: &str) -> Option<f64> {
    let trimmed = s.trim();

    if trimmed.eq_ignore_ascii_case("nan") {
        return Some(f64::NAN);
    }
    if trimmed.eq_ignore_ascii_case("infinity") || trimmed.eq_ignore_ascii_case("+infinity") {
        return Some(f64::INFINITY);
    }
    if trimmed.eq_ignore_ascii_case("-infinity") {
        return Some(f64::NEG_INFINITY);
    }

    // Rust also accepts "inf" and "nan" spellings; keep those as text
    let unsigned = trimmed.strip_prefix(&['+', '-'][..]).unwrap_or(trimmed);
    if !unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }

    trimmed.parse::<f64>().ok()
}

fn parse_int(s: &str) -> Option<i64> {
    s.trim().parse::<i64>().ok()
}

fn parse_bool(s: &str) -> Option<bool> {
    let trimmed = s.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Timestamps with or without a time part. Offsets are normalized to UTC.
fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
