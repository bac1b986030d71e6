//! Single-pass line tokenizer

use tracing::trace;

use crate::model::Row;

use super::convert::convert_field;

/// Split one line (without its terminator) into raw fields.
///
/// Raw fields keep their surrounding quotes so the converter can tell quoted
/// text apart; a doubled quote inside a quoted region is collapsed to one.
/// An empty line has no fields, while a trailing separator yields a trailing
/// empty field.
pub fn split_line(line: &str, separator: char, quote: char) -> Vec<String> {
    let mut fields = Vec::new();
    scan(line, separator, quote, |raw| fields.push(raw.to_string()));
    fields
}

/// Split one line and convert every field into a typed cell
pub fn parse_line(line: &str, separator: char, quote: char) -> Row {
    let mut row = Row::new();
    let balanced = scan(line, separator, quote, |raw| row.push(convert_field(raw, quote)));
    if !balanced {
        trace!(line, "unbalanced quote, rest of line read as quoted");
    }
    row
}

/// Walk `line` once, handing each raw field to `emit`. Returns false when a
/// quoted region is still open at end of line.
fn scan<F>(line: &str, separator: char, quote: char, mut emit: F) -> bool
where
    F: FnMut(&str),
{
    if line.is_empty() {
        return true;
    }

    let mut field = String::with_capacity(line.len().min(64));
    let mut inside_quote = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if c == quote {
            field.push(c);
            if inside_quote && chars.peek() == Some(&quote) {
                // Doubled quote is a literal quote
                chars.next();
            } else {
                inside_quote = !inside_quote;
            }
        } else if c == separator && !inside_quote {
            emit(&field);
            field.clear();
        } else {
            field.push(c);
        }
    }

    emit(&field);
    !inside_quote
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;
    use crate::row;

    #[test]
    fn test_split_simple() {
        assert_eq!(split_line("a;b;c", ';', '"'), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_line_has_no_fields() {
        assert!(split_line("", ';', '"').is_empty());
        assert!(parse_line("", ';', '"').is_empty());
    }

    #[test]
    fn test_trailing_separator_keeps_empty_field() {
        assert_eq!(parse_line("a;", ';', '"'), row!["a", None::<i64>]);
        assert_eq!(split_line(";", ';', '"'), vec!["", ""]);
    }

    #[test]
    fn test_quoted_separator() {
        assert_eq!(
            split_line("\"John\";30;\"Hello; World\"", ';', '"'),
            vec!["\"John\"", "30", "\"Hello; World\""]
        );
        assert_eq!(
            parse_line("\"John\";30;\"Hello; World\"", ';', '"'),
            row!["John", 30.0, "Hello; World"]
        );
    }

    #[test]
    fn test_doubled_quote_escape() {
        assert_eq!(split_line("\"John\"\"Junior\"", ';', '"'), vec!["\"John\"Junior\""]);
        assert_eq!(parse_line("\"John\"\"Junior\"", ';', '"'), row!["John\"Junior"]);
        assert_eq!(parse_line("\"\"\"\"", ';', '"'), row!["\""]);
    }

    #[test]
    fn test_empty_quoted_field() {
        assert_eq!(parse_line("\"\";x", ';', '"'), row!["", "x"]);
    }

    #[test]
    fn test_quoted_numbers_stay_text() {
        assert_eq!(
            parse_line("Doe;\"25\";false", ';', '"'),
            row!["Doe", "25", false]
        );
    }

    #[test]
    fn test_unbalanced_quote_is_permissive() {
        let row = parse_line("a;\"b;c", ';', '"');
        assert_eq!(row.len(), 2);
        assert_eq!(row[0], CellValue::Text("a".into()));
        assert_eq!(row[1], CellValue::Text("\"b;c".into()));
    }

    #[test]
    fn test_custom_dialect() {
        assert_eq!(
            parse_line("Name|'Age|x'|30", '|', '\''),
            row!["Name", "Age|x", 30.0]
        );
    }

    #[test]
    fn test_multibyte_content() {
        assert_eq!(parse_line("été;\"naïve; ok\"", ';', '"'), row!["été", "naïve; ok"]);
    }
}
