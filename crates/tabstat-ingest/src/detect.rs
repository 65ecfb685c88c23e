//! Encoding detection over a bounded byte prefix.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};
use serde::{Deserialize, Serialize};

use crate::error::{IngestionError, Result};

/// Number of leading bytes inspected when no other count is configured.
pub const DEFAULT_PREFIX_BYTES: usize = 10_000;

/// A detector's proposal for the text encoding of a file.
///
/// The label is a WHATWG encoding label. It may be absent when the detector
/// has nothing to offer; that is not an error, the loader falls back on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncodingGuess {
    pub label: Option<String>,
    pub confidence: Option<f32>,
}

impl EncodingGuess {
    /// A guess with no label.
    pub fn none() -> Self {
        Self::default()
    }

    /// A guess naming an encoding label.
    pub fn named(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            confidence: None,
        }
    }

    /// Attach a confidence score in `[0, 1]`.
    #[must_use]
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Resolve the label through the encoding registry.
    pub fn encoding(&self) -> Option<&'static Encoding> {
        self.label
            .as_deref()
            .and_then(|label| Encoding::for_label(label.trim().as_bytes()))
    }
}

/// Proposes an encoding for a byte prefix.
///
/// Implementations must be pure functions of the prefix.
pub trait EncodingDetector {
    fn detect(&self, prefix: &[u8]) -> EncodingGuess;
}

impl<F> EncodingDetector for F
where
    F: Fn(&[u8]) -> EncodingGuess,
{
    fn detect(&self, prefix: &[u8]) -> EncodingGuess {
        self(prefix)
    }
}

/// Default detector: byte-order marks first, then `chardetng` statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChardetDetector;

impl EncodingDetector for ChardetDetector {
    fn detect(&self, prefix: &[u8]) -> EncodingGuess {
        if prefix.is_empty() {
            return EncodingGuess::none();
        }
        if let Some((encoding, _)) = Encoding::for_bom(prefix) {
            return EncodingGuess::named(encoding.name()).with_confidence(1.0);
        }
        // ASCII decodes identically under UTF-8, and UTF-8 rejects stray high
        // bytes later in the file instead of silently mis-decoding them.
        if Encoding::ascii_valid_up_to(prefix) == prefix.len() {
            return EncodingGuess::named(UTF_8.name());
        }
        let mut detector = chardetng::EncodingDetector::new();
        // The prefix may cut a multi-byte sequence, so it is never the last buffer.
        detector.feed(prefix, false);
        let encoding = detector.guess(None, true);
        EncodingGuess::named(encoding.name())
    }
}

/// Read at most `limit` bytes from the start of a file.
pub fn read_prefix(path: &Path, limit: usize) -> Result<Vec<u8>> {
    let file = File::open(path).map_err(|e| IngestionError::io(path, e))?;
    let mut buffer = Vec::with_capacity(limit.min(64 * 1024));
    file.take(limit as u64)
        .read_to_end(&mut buffer)
        .map_err(|e| IngestionError::io(path, e))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_prefix_has_no_label() {
        let guess = ChardetDetector::default().detect(&[]);
        assert_eq!(guess, EncodingGuess::none());
        assert!(guess.encoding().is_none());
    }

    #[test]
    fn test_bom_wins_with_full_confidence() {
        let guess = ChardetDetector::default().detect(b"\xFF\xFEa\x00,\x00b\x00");
        assert_eq!(guess.label.as_deref(), Some("UTF-16LE"));
        assert_eq!(guess.confidence, Some(1.0));

        let guess = ChardetDetector::default().detect(b"\xEF\xBB\xBFa,b\n");
        assert_eq!(guess.encoding(), Some(UTF_8));
    }

    #[test]
    fn test_ascii_prefix_is_utf8() {
        let guess = ChardetDetector::default().detect(b"name,value\nalpha,1\n");
        assert_eq!(guess.encoding(), Some(UTF_8));
        assert!(guess.confidence.is_none());
    }

    #[test]
    fn test_valid_utf8_is_detected() {
        let text = "name,city\nJos\u{e9},M\u{fc}nchen\nZo\u{eb},K\u{f8}benhavn\n".repeat(20);
        let guess = ChardetDetector::default().detect(text.as_bytes());
        assert_eq!(guess.encoding(), Some(UTF_8));
    }

    #[test]
    fn test_latin1_bytes_are_not_utf8() {
        let bytes = b"name,city\nJos\xE9,M\xFCnchen\nZo\xEB,K\xF8benhavn\n".repeat(20);
        let guess = ChardetDetector::default().detect(&bytes);
        let encoding = guess.encoding().expect("label resolves");
        assert_ne!(encoding, UTF_8);
    }

    #[test]
    fn test_closure_detector() {
        let detector = |_: &[u8]| EncodingGuess::named("latin1");
        let guess = detector.detect(b"x");
        assert_eq!(guess.encoding(), Some(encoding_rs::WINDOWS_1252));
    }

    #[test]
    fn test_unknown_label_does_not_resolve() {
        assert!(EncodingGuess::named("not-a-codec").encoding().is_none());
    }

    #[test]
    fn test_read_prefix_truncates() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", "a".repeat(100)).unwrap();
        assert_eq!(read_prefix(file.path(), 10).unwrap().len(), 10);
        assert_eq!(read_prefix(file.path(), 1_000).unwrap().len(), 100);
    }

    #[test]
    fn test_read_prefix_missing_file() {
        let result = read_prefix(Path::new("/definitely/not/here.csv"), 10);
        assert!(matches!(result, Err(IngestionError::FileNotFound { .. })));
    }
}
