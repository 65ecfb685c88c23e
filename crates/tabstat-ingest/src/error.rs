//! Error types for tabular ingestion.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Position of an attempt in the encoding fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStage {
    /// The encoding proposed by the detector.
    Detected,
    /// First fixed alternate encoding.
    FallbackA,
    /// Second fixed alternate encoding.
    FallbackB,
}

impl AttemptStage {
    /// All stages in the order they are tried.
    pub const ORDER: [AttemptStage; 3] = [Self::Detected, Self::FallbackA, Self::FallbackB];
}

impl fmt::Display for AttemptStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Detected => f.write_str("detected"),
            Self::FallbackA => f.write_str("fallback A"),
            Self::FallbackB => f.write_str("fallback B"),
        }
    }
}

/// Why a single decode-and-parse attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    /// The detector proposed a label the encoding registry does not know.
    #[error("unknown encoding label '{label}'")]
    UnknownEncoding { label: String },

    /// The bytes contain a sequence that is malformed in this encoding.
    #[error("{}", describe_decode(.encoding, .valid_up_to))]
    Decode {
        encoding: &'static str,
        valid_up_to: Option<usize>,
    },

    /// The decoded text holds no header row.
    #[error("no header row found")]
    MissingHeader,

    /// The delimited reader gave up on the input.
    #[error("parse error at line {line}: {message}")]
    Parse { line: u64, message: String },

    /// The parsed cells could not be assembled into a table.
    #[error("failed to build table: {message}")]
    Frame { message: String },
}

fn describe_decode(encoding: &str, valid_up_to: &Option<usize>) -> String {
    match valid_up_to {
        Some(offset) => {
            format!("bytes are not valid {encoding} (first invalid byte at offset {offset})")
        }
        None => format!("bytes are not valid {encoding}"),
    }
}

impl From<polars::prelude::PolarsError> for AttemptError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::Frame {
            message: err.to_string(),
        }
    }
}

/// One failed tier of the fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFailure {
    pub stage: AttemptStage,
    /// Encoding name, or the raw label when it could not be resolved.
    pub encoding: String,
    pub error: AttemptError,
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.stage, self.encoding, self.error)
    }
}

fn join_attempts(attempts: &[AttemptFailure]) -> String {
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that can occur while loading a table.
#[derive(Debug, Error)]
pub enum IngestionError {
    // === File System Errors ===
    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Fallback Chain ===
    /// Every encoding in the fallback chain failed.
    #[error("all encoding attempts failed for {path}: {}", join_attempts(.attempts))]
    EncodingsExhausted {
        path: PathBuf,
        attempts: Vec<AttemptFailure>,
    },
}

impl IngestionError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestionError::FileNotFound {
            path: PathBuf::from("/path/to/file.csv"),
        };
        assert_eq!(err.to_string(), "file not found: /path/to/file.csv");
    }

    #[test]
    fn test_exhausted_lists_every_attempt() {
        let err = IngestionError::EncodingsExhausted {
            path: PathBuf::from("data.csv"),
            attempts: vec![
                AttemptFailure {
                    stage: AttemptStage::Detected,
                    encoding: "bogus".to_string(),
                    error: AttemptError::UnknownEncoding {
                        label: "bogus".to_string(),
                    },
                },
                AttemptFailure {
                    stage: AttemptStage::FallbackA,
                    encoding: "UTF-8".to_string(),
                    error: AttemptError::Decode {
                        encoding: "UTF-8",
                        valid_up_to: Some(3),
                    },
                },
                AttemptFailure {
                    stage: AttemptStage::FallbackB,
                    encoding: "windows-1252".to_string(),
                    error: AttemptError::MissingHeader,
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "all encoding attempts failed for data.csv: \
             detected (bogus): unknown encoding label 'bogus'; \
             fallback A (UTF-8): bytes are not valid UTF-8 (first invalid byte at offset 3); \
             fallback B (windows-1252): no header row found"
        );
    }

    #[test]
    fn test_io_not_found_maps_to_file_not_found() {
        let source = std::io::Error::from(std::io::ErrorKind::NotFound);
        let err = IngestionError::io(std::path::Path::new("x.csv"), source);
        assert!(matches!(err, IngestionError::FileNotFound { .. }));
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("test".into());
        let attempt_err: AttemptError = polars_err.into();
        assert!(matches!(attempt_err, AttemptError::Frame { .. }));
    }
}
