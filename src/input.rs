//! Parsing of the uploaded raw table.
//!
//! The expected format is a headerless CSV with a single numeric column,
//! one observation per row. Anything else is a [`AnalysisError::Parse`].

use crate::error::{AnalysisError, Result};

/// Parse uploaded bytes into the raw value column.
///
/// Rows are read in order; each must contain exactly one field that parses
/// as a finite number. Blank lines are skipped. An empty file is an error.
pub fn parse_column(bytes: &[u8]) -> Result<Vec<f64>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut values = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| AnalysisError::Parse(e.to_string()))?;
        if record.len() != 1 {
            return Err(AnalysisError::Parse(format!(
                "row {}: expected a single column, found {} fields",
                row + 1,
                record.len()
            )));
        }
        let field = &record[0];
        let value: f64 = field.parse().map_err(|_| {
            AnalysisError::Parse(format!("row {}: not a number: '{}'", row + 1, field))
        })?;
        if !value.is_finite() {
            return Err(AnalysisError::Parse(format!(
                "row {}: value is not finite: '{}'",
                row + 1,
                field
            )));
        }
        values.push(value);
    }

    if values.is_empty() {
        return Err(AnalysisError::Parse("file contains no data rows".to_string()));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_numeric_column() {
        let values = parse_column(b"589\n561\n640.5\n-12\n").unwrap();
        assert_eq!(values, vec![589.0, 561.0, 640.5, -12.0]);
    }

    #[test]
    fn tolerates_surrounding_whitespace_and_blank_lines() {
        let values = parse_column(b" 1.5 \n\n2.5\n").unwrap();
        assert_eq!(values, vec![1.5, 2.5]);
    }

    #[test]
    fn rejects_non_numeric_row() {
        let err = parse_column(b"1\nabc\n3\n").unwrap_err();
        match err {
            AnalysisError::Parse(msg) => {
                assert!(msg.contains("row 2"), "unexpected message: {msg}");
                assert!(msg.contains("abc"));
            }
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_multiple_columns() {
        let err = parse_column(b"1,2\n3,4\n").unwrap_err();
        assert!(matches!(err, AnalysisError::Parse(_)));
    }

    #[test]
    fn rejects_non_finite_values() {
        let err = parse_column(b"1\ninf\n").unwrap_err();
        assert!(matches!(err, AnalysisError::Parse(_)));

        let err = parse_column(b"NaN\n").unwrap_err();
        assert!(matches!(err, AnalysisError::Parse(_)));
    }

    #[test]
    fn rejects_empty_file() {
        let err = parse_column(b"").unwrap_err();
        assert!(matches!(err, AnalysisError::Parse(_)));
    }

    #[test]
    fn single_row_is_valid() {
        assert_eq!(parse_column(b"42\n").unwrap(), vec![42.0]);
    }
}
