//! Robust tabular ingestion.
//!
//! This crate recovers a usable table from a delimited text file whose
//! encoding is unknown and whose rows may be malformed.
//!
//! # Features
//!
//! - **Encoding Detection**: BOM sniffing and `chardetng` statistics over a
//!   bounded byte prefix
//! - **Fallback Chain**: detected encoding, then two fixed alternates, each
//!   attempt reported with its own failure reason
//! - **Malformed Rows**: rows with the wrong field count are skipped and
//!   reported, never fatal
//! - **Type Inference**: Int64, Float64, Boolean or String per column, in a
//!   Polars `DataFrame`
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use tabstat_ingest::{LoadOptions, RobustLoader};
//!
//! let loader = RobustLoader::new(LoadOptions::default().with_delimiter(b';'));
//! let report = loader.load_with_report(Path::new("survey.csv"))?;
//! println!("{} rows via {}", report.table.height(), report.encoding.name());
//! ```

mod csv;
mod detect;
mod error;
mod loader;
mod options;
mod table;

// === Error Types ===
pub use error::{AttemptError, AttemptFailure, AttemptStage, IngestionError, Result};

// === Encoding Detection ===
pub use detect::{
    ChardetDetector, DEFAULT_PREFIX_BYTES, EncodingDetector, EncodingGuess, read_prefix,
};

// === Parsing ===
pub use csv::{CsvParser, DelimitedParser, ParsedTable, SkipReason, SkippedRow, decode_strict};

// === Loading ===
pub use loader::{LoadReport, RobustLoader, load};
pub use options::{DEFAULT_FALLBACK_ENCODINGS, LoadOptions};

// === Table ===
pub use table::{ColumnSummary, MISSING_TOKENS, Table};

pub use encoding_rs::Encoding;
