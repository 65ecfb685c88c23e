//! Reproducible statistics for tabular samples.
//!
//! # Features
//!
//! - **Sample Normalization**: one [`IntoSample`] boundary for slices,
//!   vectors, arrays, nested rows and Polars series
//! - **Bootstrap Estimation**: percentile and BCa intervals from a locally
//!   seeded generator, bit-identical for identical inputs
//! - **Summaries**: mean, median and standard deviation rendered as plain
//!   text or LaTeX, with an optional interval for the mean
//!
//! # Example
//!
//! ```ignore
//! use tabstat_stats::{BootstrapConfig, SummaryOptions, Statistic, estimate, summarize};
//!
//! let data = [2.1, 3.4, 1.9, 4.2, 3.3];
//! let ci = estimate(&data, &Statistic::Mean, &BootstrapConfig::default())?;
//! println!("{:.2} [{:.2}, {:.2}]", ci.point_estimate, ci.lower, ci.upper);
//!
//! let line = summarize(&data, &SummaryOptions::default().with_ci(true))?;
//! ```

mod bootstrap;
mod error;
mod format;
mod percentile;
mod sample;
mod statistic;
mod summary;

// === Error Types ===
pub use error::{InvalidInputError, Result};

// === Samples & Statistics ===
pub use sample::{IntoSample, Sample};
pub use statistic::{ResampleStatistic, Statistic, mean, median, std_dev, variance};

// === Bootstrap ===
pub use bootstrap::{
    BootstrapConfig, BootstrapMethod, BootstrapResult, DEFAULT_CONFIDENCE_LEVEL,
    DEFAULT_RESAMPLES, DEFAULT_SEED, bootstrap_mean, estimate,
};
pub use percentile::percentile;

// === Summaries ===
pub use format::{format_fixed, format_percent_label};
pub use summary::{DescriptiveStats, SummaryOptions, SummaryStyle, describe, summarize};
