//! Strict decoding and malformed-row tolerant parsing of delimited text.

use std::borrow::Cow;
use std::fmt;

use ::csv::{ErrorKind, Position, ReaderBuilder, StringRecord};
use encoding_rs::{Encoding, UTF_8};
use serde::Serialize;

use crate::error::AttemptError;
use crate::table::Table;

/// Why a data row was left out of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// The row splits into a different number of fields than the header.
    FieldCount { expected: usize, found: usize },
    /// The reader could not make sense of the row.
    Malformed { message: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldCount { expected, found } => {
                write!(f, "expected {expected} fields, found {found}")
            }
            Self::Malformed { message } => f.write_str(message),
        }
    }
}

/// A data row dropped during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// 1-based physical line where the row starts.
    pub line: u64,
    pub reason: SkipReason,
}

/// Output of one successful parse.
#[derive(Debug, Clone)]
pub struct ParsedTable {
    pub table: Table,
    pub skipped_rows: Vec<SkippedRow>,
}

/// Turns the raw bytes of a file into a table under a given encoding.
///
/// One call is one attempt of the loader's fallback chain.
pub trait DelimitedParser {
    fn parse(
        &self,
        bytes: &[u8],
        encoding: &'static Encoding,
        delimiter: u8,
    ) -> Result<ParsedTable, AttemptError>;
}

impl<P: DelimitedParser + ?Sized> DelimitedParser for &P {
    fn parse(
        &self,
        bytes: &[u8],
        encoding: &'static Encoding,
        delimiter: u8,
    ) -> Result<ParsedTable, AttemptError> {
        (**self).parse(bytes, encoding, delimiter)
    }
}

/// Default parser backed by the `csv` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvParser;

impl DelimitedParser for CsvParser {
    fn parse(
        &self,
        bytes: &[u8],
        encoding: &'static Encoding,
        delimiter: u8,
    ) -> Result<ParsedTable, AttemptError> {
        let text = decode_strict(bytes, encoding)?;
        parse_text(&text, delimiter)
    }
}

/// Decodes bytes, treating any malformed sequence as fatal.
///
/// A byte-order mark is stripped only when it belongs to `encoding`.
pub fn decode_strict<'a>(
    bytes: &'a [u8],
    encoding: &'static Encoding,
) -> Result<Cow<'a, str>, AttemptError> {
    let body = match Encoding::for_bom(bytes) {
        Some((bom_encoding, bom_len)) if bom_encoding == encoding => &bytes[bom_len..],
        _ => bytes,
    };
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| AttemptError::Decode {
            encoding: encoding.name(),
            valid_up_to: (encoding == UTF_8)
                .then(|| std::str::from_utf8(body).err().map(|e| e.valid_up_to()))
                .flatten(),
        })
}

fn record_line(record: &StringRecord) -> u64 {
    record.position().map_or(0, Position::line)
}

/// Only truly empty lines are blank. A whitespace-only line is a one-field
/// record: a null cell in a one-column table, a short row otherwise.
fn is_blank(record: &StringRecord) -> bool {
    record.len() <= 1 && record.iter().all(str::is_empty)
}

fn owned_fields(record: &StringRecord) -> Vec<String> {
    record.iter().map(str::to_string).collect()
}

fn parse_text(text: &str, delimiter: u8) -> Result<ParsedTable, AttemptError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut records = reader.records();

    let header = loop {
        match records.next() {
            None => return Err(AttemptError::MissingHeader),
            Some(Ok(record)) if is_blank(&record) => continue,
            Some(Ok(record)) => break owned_fields(&record),
            Some(Err(err)) => {
                return Err(AttemptError::Parse {
                    line: err.position().map_or(0, Position::line),
                    message: err.to_string(),
                });
            }
        }
    };

    let mut rows = Vec::new();
    let mut skipped_rows = Vec::new();
    for result in records {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                let line = err.position().map_or(0, Position::line);
                if matches!(err.kind(), ErrorKind::Io(_)) {
                    return Err(AttemptError::Parse {
                        line,
                        message: err.to_string(),
                    });
                }
                tracing::debug!(line, error = %err, "skipping malformed row");
                skipped_rows.push(SkippedRow {
                    line,
                    reason: SkipReason::Malformed {
                        message: err.to_string(),
                    },
                });
                continue;
            }
        };
        if is_blank(&record) {
            continue;
        }
        if record.len() != header.len() {
            let line = record_line(&record);
            tracing::debug!(
                line,
                expected = header.len(),
                found = record.len(),
                "skipping row with unexpected field count"
            );
            skipped_rows.push(SkippedRow {
                line,
                reason: SkipReason::FieldCount {
                    expected: header.len(),
                    found: record.len(),
                },
            });
            continue;
        }
        rows.push(owned_fields(&record));
    }

    let table = Table::from_rows(header, rows)?;
    Ok(ParsedTable {
        table,
        skipped_rows,
    })
}
