//! One-line descriptive summaries: mean, median, standard deviation and an
//! optional bootstrap interval for the mean.

use serde::{Deserialize, Serialize};

use crate::bootstrap::{
    BootstrapConfig, BootstrapMethod, DEFAULT_CONFIDENCE_LEVEL, DEFAULT_RESAMPLES, DEFAULT_SEED,
    estimate,
};
use crate::error::Result;
use crate::format::{format_fixed, format_percent_label};
use crate::sample::{IntoSample, Sample};
use crate::statistic::{ResampleStatistic, Statistic, mean, median, std_dev};

/// Unrounded descriptive statistics of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DescriptiveStats {
    pub n: usize,
    pub mean: f64,
    pub median: f64,
    /// Bessel-corrected.
    pub std_dev: f64,
}

/// Output template of [`summarize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStyle {
    /// `M = 3.00, Mdn = 3.00, SD = 1.58, 95% CI = [2.00, 4.00]`
    #[default]
    Plain,
    /// The same statistics as inline LaTeX math, APA style.
    Latex,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryOptions {
    pub include_ci: bool,
    pub confidence_level: f64,
    /// Decimals for every rendered number.
    pub digits: usize,
    pub n_resamples: usize,
    pub seed: u64,
    pub method: BootstrapMethod,
    pub style: SummaryStyle,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            include_ci: false,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            digits: 2,
            n_resamples: DEFAULT_RESAMPLES,
            seed: DEFAULT_SEED,
            method: BootstrapMethod::default(),
            style: SummaryStyle::default(),
        }
    }
}

impl SummaryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_ci(mut self, include_ci: bool) -> Self {
        self.include_ci = include_ci;
        self
    }

    #[must_use]
    pub fn with_confidence_level(mut self, confidence_level: f64) -> Self {
        self.confidence_level = confidence_level;
        self
    }

    #[must_use]
    pub fn with_digits(mut self, digits: usize) -> Self {
        self.digits = digits;
        self
    }

    #[must_use]
    pub fn with_resamples(mut self, n_resamples: usize) -> Self {
        self.n_resamples = n_resamples;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_method(mut self, method: BootstrapMethod) -> Self {
        self.method = method;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: SummaryStyle) -> Self {
        self.style = style;
        self
    }

    /// Estimator settings for the interval on the mean.
    pub fn bootstrap_config(&self) -> BootstrapConfig {
        BootstrapConfig::default()
            .with_resamples(self.n_resamples)
            .with_confidence_level(self.confidence_level)
            .with_seed(self.seed)
            .with_method(self.method)
    }
}

/// Mean, median and standard deviation of at least two observations.
pub fn describe<S: IntoSample>(sample: S) -> Result<DescriptiveStats> {
    let sample = sample.into_sample()?;
    sample.require(Statistic::StdDev.name(), 2)?;
    Ok(compute(&sample))
}

fn compute(sample: &Sample) -> DescriptiveStats {
    let values = sample.values();
    DescriptiveStats {
        n: values.len(),
        mean: mean(values),
        median: median(values),
        std_dev: std_dev(values),
    }
}

/// Renders a descriptive summary of `sample`.
///
/// All input checks, including the interval settings when `include_ci` is
/// set, run before anything is computed.
pub fn summarize<S: IntoSample>(sample: S, options: &SummaryOptions) -> Result<String> {
    let sample = sample.into_sample()?;
    sample.require(Statistic::StdDev.name(), 2)?;
    let config = options.bootstrap_config();
    if options.include_ci {
        config.validate()?;
    }

    let stats = compute(&sample);
    let digits = options.digits;
    let mut body = format!(
        "M = {}, Mdn = {}, SD = {}",
        format_fixed(stats.mean, digits),
        format_fixed(stats.median, digits),
        format_fixed(stats.std_dev, digits),
    );

    if options.include_ci {
        let interval = estimate(&sample, &Statistic::Mean, &config)?;
        let label = format_percent_label(interval.confidence_level);
        let bounds = format!(
            "[{}, {}]",
            format_fixed(interval.lower, digits),
            format_fixed(interval.upper, digits)
        );
        match options.style {
            SummaryStyle::Plain => body.push_str(&format!(", {label}% CI = {bounds}")),
            SummaryStyle::Latex => body.push_str(&format!(", {label}\\% \\text{{CI}} = {bounds}")),
        }
    }

    Ok(match options.style {
        SummaryStyle::Plain => body,
        SummaryStyle::Latex => format!("${body}$"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidInputError;

    #[test]
    fn test_describe() {
        let stats = describe([1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(stats.n, 5);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.median, 3.0);
        assert!((stats.std_dev - 2.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_describe_needs_two_values() {
        assert_eq!(
            describe([1.0]),
            Err(InvalidInputError::TooFewObservations {
                statistic: "standard deviation",
                required: 2,
                actual: 1,
            })
        );
    }

    #[test]
    fn test_plain_without_ci() {
        let text = summarize([1.0, 2.0, 3.0, 4.0, 5.0], &SummaryOptions::default()).unwrap();
        assert_eq!(text, "M = 3.00, Mdn = 3.00, SD = 1.58");
    }

    #[test]
    fn test_latex_without_ci() {
        let options = SummaryOptions::default().with_style(SummaryStyle::Latex);
        let text = summarize([1i64, 2, 3, 4, 5], &options).unwrap();
        assert_eq!(text, "$M = 3.00, Mdn = 3.00, SD = 1.58$");
    }

    #[test]
    fn test_invalid_ci_settings_ignored_without_ci() {
        let options = SummaryOptions::default().with_confidence_level(2.0);
        assert!(summarize([1.0, 2.0], &options).is_ok());
        assert!(summarize([1.0, 2.0], &options.with_ci(true)).is_err());
    }

    #[test]
    fn test_bootstrap_config_mirrors_options() {
        let options = SummaryOptions::default()
            .with_resamples(123)
            .with_seed(9)
            .with_confidence_level(0.9)
            .with_method(BootstrapMethod::Bca);
        let config = options.bootstrap_config();
        assert_eq!(config.n_resamples, 123);
        assert_eq!(config.seed, 9);
        assert_eq!(config.confidence_level, 0.9);
        assert_eq!(config.method, BootstrapMethod::Bca);
    }
}
