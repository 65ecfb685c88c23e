//! The loaded table and per-column type inference.

use polars::prelude::{Column, DataFrame, DataType};
use serde::Serialize;

use crate::csv::repair_headers;
use crate::error::AttemptError;

/// Cell texts read as missing values.
pub const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-NaN", "-nan", "<NA>", "N/A", "NA", "NULL", "NaN", "None",
    "n/a", "nan", "null",
];

/// Ordered, named, equal-length columns.
#[derive(Debug, Clone)]
pub struct Table {
    frame: DataFrame,
}

/// Name, dtype and null count of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub dtype: String,
    pub null_count: usize,
}

impl Table {
    /// Builds a table from a header row and equal-width data rows.
    ///
    /// Header cells are repaired into unique names and every column's dtype
    /// is inferred from its cells.
    pub fn from_rows(header: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, AttemptError> {
        let names = repair_headers(header);
        let mut cells: Vec<Vec<String>> = vec![Vec::with_capacity(rows.len()); names.len()];
        for row in rows {
            if row.len() != names.len() {
                return Err(AttemptError::Frame {
                    message: format!("row has {} cells, expected {}", row.len(), names.len()),
                });
            }
            for (column, cell) in cells.iter_mut().zip(row) {
                column.push(cell);
            }
        }
        let columns = names
            .iter()
            .zip(&cells)
            .map(|(name, values)| infer_column(name, values))
            .collect();
        Ok(Self {
            frame: DataFrame::new(columns)?,
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.frame.width()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.frame.column(name).ok()
    }

    pub fn schema_summary(&self) -> Vec<ColumnSummary> {
        self.frame
            .get_columns()
            .iter()
            .map(|column| ColumnSummary {
                name: column.name().to_string(),
                dtype: column.dtype().to_string(),
                null_count: column.null_count(),
            })
            .collect()
    }
}

/// Cells are trimmed before matching, as they are before parsing.
fn is_missing(cell: &str) -> bool {
    MISSING_TOKENS.contains(&cell.trim())
}

fn parse_bool(cell: &str) -> Option<bool> {
    if cell.eq_ignore_ascii_case("true") {
        Some(true)
    } else if cell.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Parses every present cell, or gives up on the first one that fails.
fn parse_all<T>(cells: &[Option<&str>], parse: impl Fn(&str) -> Option<T>) -> Option<Vec<Option<T>>> {
    cells
        .iter()
        .map(|cell| match cell {
            None => Some(None),
            Some(text) => parse(text.trim()).map(Some),
        })
        .collect()
}

/// Picks the narrowest dtype that holds every present cell:
/// Int64, then Float64, then Boolean, then String.
fn infer_column(name: &str, values: &[String]) -> Column {
    let cells: Vec<Option<&str>> = values
        .iter()
        .map(|cell| (!is_missing(cell)).then_some(cell.as_str()))
        .collect();

    if cells.iter().all(Option::is_none) {
        return Column::full_null(name.into(), cells.len(), &DataType::Float64);
    }
    if let Some(ints) = parse_all(&cells, |text| text.parse::<i64>().ok()) {
        return Column::new(name.into(), ints);
    }
    if let Some(floats) = parse_all(&cells, |text| text.parse::<f64>().ok()) {
        return Column::new(name.into(), floats);
    }
    if let Some(bools) = parse_all(&cells, parse_bool) {
        return Column::new(name.into(), bools);
    }
    Column::new(name.into(), cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    fn rows(values: &[&[&str]]) -> Vec<Vec<String>> {
        values.iter().map(|row| strings(row)).collect()
    }

    #[test]
    fn test_infers_column_dtypes() {
        let table = Table::from_rows(
            strings(&["id", "score", "flag", "name"]),
            rows(&[
                &["1", "2.5", "true", "alpha"],
                &["2", "3", "FALSE", "beta"],
                &["3", "", "True", "NA"],
            ]),
        )
        .unwrap();

        let frame = table.frame();
        assert_eq!(frame.column("id").unwrap().dtype(), &DataType::Int64);
        assert_eq!(frame.column("score").unwrap().dtype(), &DataType::Float64);
        assert_eq!(frame.column("flag").unwrap().dtype(), &DataType::Boolean);
        assert_eq!(frame.column("name").unwrap().dtype(), &DataType::String);
        assert_eq!(frame.column("score").unwrap().null_count(), 1);
        assert_eq!(frame.column("name").unwrap().null_count(), 1);
    }

    #[test]
    fn test_all_missing_column_is_float() {
        let table =
            Table::from_rows(strings(&["a", "b"]), rows(&[&["1", ""], &["2", "NaN"]])).unwrap();
        let column = table.column("b").unwrap();
        assert_eq!(column.dtype(), &DataType::Float64);
        assert_eq!(column.null_count(), 2);
    }

    #[test]
    fn test_padded_missing_tokens_are_null() {
        let table = Table::from_rows(
            strings(&["a", "b"]),
            rows(&[&["1", " NA"], &["2", "3"], &[" 4 ", "5"], &["5", " n/a "]]),
        )
        .unwrap();
        assert_eq!(table.column("a").unwrap().dtype(), &DataType::Int64);
        let b = table.column("b").unwrap();
        assert_eq!(b.dtype(), &DataType::Int64);
        assert_eq!(b.null_count(), 2);
    }

    #[test]
    fn test_mixed_numbers_and_text_stay_text() {
        let table = Table::from_rows(strings(&["v"]), rows(&[&["1"], &["two"]])).unwrap();
        assert_eq!(table.column("v").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_duplicate_headers_are_made_unique() {
        let table = Table::from_rows(strings(&["x", "x", ""]), rows(&[&["1", "2", "3"]])).unwrap();
        assert_eq!(table.column_names(), vec!["x", "x.1", "Unnamed: 2"]);
    }

    #[test]
    fn test_schema_summary() {
        let table = Table::from_rows(strings(&["a"]), rows(&[&["1"], &[""]])).unwrap();
        assert_eq!(
            table.schema_summary(),
            vec![ColumnSummary {
                name: "a".to_string(),
                dtype: "i64".to_string(),
                null_count: 1,
            }]
        );
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let result = Table::from_rows(strings(&["a", "b"]), rows(&[&["1"]]));
        assert!(matches!(result, Err(AttemptError::Frame { .. })));
    }
}
