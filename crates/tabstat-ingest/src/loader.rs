//! Fail-soft table loading across an ordered chain of encodings.
//!
//! The detected encoding is tried first, then the two configured fallbacks.
//! Every attempt decodes the whole file strictly and parses it while
//! skipping malformed rows. The first attempt that produces a table wins;
//! when all three fail, the caller gets every attempt's reason.

use std::path::Path;

use encoding_rs::{Encoding, UTF_8};
use tracing::{info, info_span, warn};

use crate::csv::{CsvParser, DelimitedParser, SkippedRow};
use crate::detect::{ChardetDetector, EncodingDetector, EncodingGuess, read_prefix};
use crate::error::{AttemptError, AttemptFailure, AttemptStage, IngestionError, Result};
use crate::options::LoadOptions;
use crate::table::Table;

/// Everything learned while loading a file.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub table: Table,
    /// Encoding of the attempt that succeeded.
    pub encoding: &'static Encoding,
    /// Stage of the attempt that succeeded.
    pub stage: AttemptStage,
    /// What the detector proposed.
    pub guess: EncodingGuess,
    /// Data rows dropped as malformed, in file order.
    pub skipped_rows: Vec<SkippedRow>,
    /// Failed attempts before the successful one.
    pub failed_attempts: Vec<AttemptFailure>,
}

impl LoadReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped_rows.len()
    }
}

/// Loads delimited files whose encoding is not known up front.
#[derive(Debug, Clone, Default)]
pub struct RobustLoader<D = ChardetDetector, P = CsvParser> {
    detector: D,
    parser: P,
    options: LoadOptions,
}

impl RobustLoader {
    pub fn new(options: LoadOptions) -> Self {
        Self {
            detector: ChardetDetector::default(),
            parser: CsvParser,
            options,
        }
    }
}

impl<D, P> RobustLoader<D, P>
where
    D: EncodingDetector,
    P: DelimitedParser,
{
    /// Swap the encoding detector.
    pub fn with_detector<D2: EncodingDetector>(self, detector: D2) -> RobustLoader<D2, P> {
        RobustLoader {
            detector,
            parser: self.parser,
            options: self.options,
        }
    }

    /// Swap the parser that runs each attempt.
    pub fn with_parser<P2: DelimitedParser>(self, parser: P2) -> RobustLoader<D, P2> {
        RobustLoader {
            detector: self.detector,
            parser,
            options: self.options,
        }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Load a file into a [`Table`].
    pub fn load(&self, path: &Path) -> Result<Table> {
        self.load_with_report(path).map(|report| report.table)
    }

    /// Load a file and report which attempt succeeded and which rows were skipped.
    pub fn load_with_report(&self, path: &Path) -> Result<LoadReport> {
        let span = info_span!("load_table", path = %path.display());
        let _guard = span.enter();

        let prefix = read_prefix(path, self.options.prefix_bytes)?;
        let guess = self.detector.detect(&prefix);
        drop(prefix);
        let bytes = std::fs::read(path).map_err(|e| IngestionError::io(path, e))?;

        let [fallback_a, fallback_b] = self.options.fallback_encodings;
        let candidates = [
            (AttemptStage::Detected, resolve_guess(&guess)),
            (AttemptStage::FallbackA, Ok(fallback_a)),
            (AttemptStage::FallbackB, Ok(fallback_b)),
        ];

        let mut failures: Vec<AttemptFailure> = Vec::with_capacity(candidates.len());
        for (stage, candidate) in candidates {
            let (name, outcome) = match candidate {
                Ok(encoding) => {
                    info!(%stage, encoding = encoding.name(), "attempting to read file");
                    let outcome = self
                        .parser
                        .parse(&bytes, encoding, self.options.delimiter)
                        .map(|parsed| (encoding, parsed));
                    (encoding.name().to_string(), outcome)
                }
                Err((label, error)) => (label, Err(error)),
            };

            match outcome {
                Ok((encoding, parsed)) => {
                    info!(
                        %stage,
                        encoding = encoding.name(),
                        rows = parsed.table.height(),
                        columns = parsed.table.width(),
                        "file read successfully"
                    );
                    if !parsed.skipped_rows.is_empty() {
                        warn!(
                            skipped = parsed.skipped_rows.len(),
                            "skipped malformed rows"
                        );
                    }
                    return Ok(LoadReport {
                        table: parsed.table,
                        encoding,
                        stage,
                        guess,
                        skipped_rows: parsed.skipped_rows,
                        failed_attempts: failures,
                    });
                }
                Err(error) => {
                    warn!(%stage, encoding = %name, %error, "failed to read file");
                    failures.push(AttemptFailure {
                        stage,
                        encoding: name,
                        error,
                    });
                }
            }
        }

        Err(IngestionError::EncodingsExhausted {
            path: path.to_path_buf(),
            attempts: failures,
        })
    }
}

/// Maps the detector's guess to the encoding of the first attempt.
///
/// No label means the parser's default codec, UTF-8. An unknown label fails
/// the attempt and keeps the label for the report.
fn resolve_guess(
    guess: &EncodingGuess,
) -> std::result::Result<&'static Encoding, (String, AttemptError)> {
    let Some(label) = guess.label.as_deref() else {
        return Ok(UTF_8);
    };
    guess.encoding().ok_or_else(|| {
        (
            label.to_string(),
            AttemptError::UnknownEncoding {
                label: label.to_string(),
            },
        )
    })
}

/// Load a delimited file with the default detector and fallback chain.
pub fn load(path: impl AsRef<Path>, delimiter: u8, prefix_bytes: usize) -> Result<Table> {
    let options = LoadOptions::default()
        .with_delimiter(delimiter)
        .with_prefix_bytes(prefix_bytes);
    RobustLoader::new(options).load(path.as_ref())
}
