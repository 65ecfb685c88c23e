//! Loader configuration.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use serde::{Deserialize, Serialize};

use crate::detect::DEFAULT_PREFIX_BYTES;

/// Encodings tried after the detected one, in order.
///
/// UTF-8 is strict and fails loudly on foreign bytes; ISO-8859-1 (mapped to
/// windows-1252 by the WHATWG registry) decodes any byte, so it goes last.
pub const DEFAULT_FALLBACK_ENCODINGS: [&Encoding; 2] = [UTF_8, WINDOWS_1252];

/// Options for [`crate::RobustLoader`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Field delimiter byte. Defaults to `b','`.
    pub delimiter: u8,

    /// Leading bytes handed to the encoding detector. Defaults to 10,000.
    pub prefix_bytes: usize,

    /// Fallback A and fallback B.
    pub fallback_encodings: [&'static Encoding; 2],
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            prefix_bytes: DEFAULT_PREFIX_BYTES,
            fallback_encodings: DEFAULT_FALLBACK_ENCODINGS,
        }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set how many leading bytes the detector sees.
    #[must_use]
    pub fn with_prefix_bytes(mut self, prefix_bytes: usize) -> Self {
        self.prefix_bytes = prefix_bytes;
        self
    }

    /// Replace the two fallback encodings.
    #[must_use]
    pub fn with_fallback_encodings(mut self, fallbacks: [&'static Encoding; 2]) -> Self {
        self.fallback_encodings = fallbacks;
        self
    }
}
