//! Delimited text decoding and parsing.

mod header;
mod reader;

pub use header::repair_headers;
pub use reader::{CsvParser, DelimitedParser, ParsedTable, SkipReason, SkippedRow, decode_strict};
