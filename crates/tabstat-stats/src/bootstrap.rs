//! Reproducible bootstrap confidence intervals.
//!
//! Each call owns a generator seeded from its config, so identical inputs
//! give bit-identical intervals and no state leaks between calls.
//!
//! # Methods
//!
//! - **Percentile**: bounds read off the sorted bootstrap distribution at
//!   `(1 - cl) / 2` and `1 - (1 - cl) / 2`.
//! - **BCa**: the same distribution read at levels shifted by a bias
//!   correction `z0` and a jackknife acceleration `a`.

use std::fmt;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::{debug, debug_span, warn};

use crate::error::{InvalidInputError, Result};
use crate::percentile::percentile;
use crate::sample::IntoSample;
use crate::statistic::{ResampleStatistic, mean};

pub const DEFAULT_RESAMPLES: usize = 10_000;
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;
pub const DEFAULT_SEED: u64 = 42;

/// How bounds are read from the bootstrap distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BootstrapMethod {
    #[default]
    Percentile,
    /// Bias-corrected and accelerated.
    Bca,
}

impl fmt::Display for BootstrapMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootstrapMethod::Percentile => f.write_str("percentile"),
            BootstrapMethod::Bca => f.write_str("BCa"),
        }
    }
}

/// Settings for one [`estimate`] call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    pub n_resamples: usize,
    /// Strictly between 0 and 1.
    pub confidence_level: f64,
    pub seed: u64,
    pub method: BootstrapMethod,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            n_resamples: DEFAULT_RESAMPLES,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            seed: DEFAULT_SEED,
            method: BootstrapMethod::default(),
        }
    }
}

impl BootstrapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_resamples(mut self, n_resamples: usize) -> Self {
        self.n_resamples = n_resamples;
        self
    }

    #[must_use]
    pub fn with_confidence_level(mut self, confidence_level: f64) -> Self {
        self.confidence_level = confidence_level;
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

    /// Checks the resample count and confidence level.
    pub fn validate(&self) -> Result<()> {
        if self.n_resamples == 0 {
            return Err(InvalidInputError::InvalidResampleCount {
                count: self.n_resamples,
            });
        }
        let level = self.confidence_level;
        if level.is_nan() || level <= 0.0 || level >= 1.0 {
            return Err(InvalidInputError::InvalidConfidenceLevel { level });
        }
        Ok(())
    }
}

/// A confidence interval together with the settings that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BootstrapResult {
    /// The statistic on the original sample.
    pub point_estimate: f64,
    pub lower: f64,
    pub upper: f64,
    pub confidence_level: f64,
    pub n_resamples: usize,
    pub method: BootstrapMethod,
    pub seed: u64,
}

impl BootstrapResult {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Bootstrap confidence interval for `statistic` over `sample`.
///
/// The sample is converted and the config validated before any resampling.
///
/// # Errors
///
/// Any [`InvalidInputError`] from sample conversion, a sample smaller than
/// the statistic's minimum, or an invalid config.
pub fn estimate<S, T>(
    sample: S,
    statistic: &T,
    config: &BootstrapConfig,
) -> Result<BootstrapResult>
where
    S: IntoSample,
    T: ResampleStatistic + ?Sized,
{
    let sample = sample.into_sample()?;
    sample.require(statistic.name(), statistic.min_observations())?;
    config.validate()?;

    let span = debug_span!(
        "bootstrap",
        n = sample.len(),
        n_resamples = config.n_resamples,
        seed = config.seed,
        method = %config.method
    );
    let _guard = span.enter();

    let values = sample.values();
    let point_estimate = statistic.compute(values);
    let distribution = resample_distribution(values, statistic, config.n_resamples, config.seed);
    let alpha = (1.0 - config.confidence_level) / 2.0;

    let (lower, upper) = match config.method {
        BootstrapMethod::Percentile => percentile_bounds(&distribution, alpha),
        BootstrapMethod::Bca => bca_bounds(values, statistic, point_estimate, &distribution, alpha)
            .unwrap_or_else(|| {
                warn!("degenerate bootstrap distribution, falling back to percentile bounds");
                percentile_bounds(&distribution, alpha)
            }),
    };
    debug!(point_estimate, lower, upper, "bootstrap interval computed");

    Ok(BootstrapResult {
        point_estimate,
        lower,
        upper,
        confidence_level: config.confidence_level,
        n_resamples: config.n_resamples,
        method: config.method,
        seed: config.seed,
    })
}

/// Percentile bootstrap interval for the mean, with the confidence given in
/// percent (95 for a 95% interval).
pub fn bootstrap_mean<S: IntoSample>(
    sample: S,
    n_resamples: usize,
    ci_percent: f64,
    seed: u64,
) -> Result<BootstrapResult> {
    let config = BootstrapConfig::default()
        .with_resamples(n_resamples)
        .with_confidence_level(ci_percent / 100.0)
        .with_seed(seed);
    estimate(sample, &mean, &config)
}

/// Statistic of each same-size resample drawn with replacement, sorted.
fn resample_distribution<T>(values: &[f64], statistic: &T, n_resamples: usize, seed: u64) -> Vec<f64>
where
    T: ResampleStatistic + ?Sized,
{
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let n = values.len();
    let mut resample = vec![0.0; n];
    let mut distribution = Vec::with_capacity(n_resamples);
    for _ in 0..n_resamples {
        for slot in &mut resample {
            *slot = values[rng.random_range(0..n)];
        }
        distribution.push(statistic.compute(&resample));
    }
    distribution.sort_by(f64::total_cmp);
    distribution
}

fn percentile_bounds(sorted: &[f64], alpha: f64) -> (f64, f64) {
    (percentile(sorted, alpha), percentile(sorted, 1.0 - alpha))
}

/// BCa bounds, or `None` when the bias correction is not finite.
fn bca_bounds<T>(
    values: &[f64],
    statistic: &T,
    point_estimate: f64,
    sorted: &[f64],
    alpha: f64,
) -> Option<(f64, f64)>
where
    T: ResampleStatistic + ?Sized,
{
    // Ties count half, so a flat distribution gives z0 = 0.
    let below = sorted.iter().filter(|&&t| t < point_estimate).count();
    let at_or_below = sorted.iter().filter(|&&t| t <= point_estimate).count();
    let share = (below + at_or_below) as f64 / (2 * sorted.len()) as f64;
    let normal = Normal::standard();
    let z0 = normal.inverse_cdf(share);
    if !z0.is_finite() {
        return None;
    }

    let a = acceleration(values, statistic);
    let adjusted = |z: f64| {
        let shifted = z0 + z;
        normal.cdf(z0 + shifted / (1.0 - a * shifted))
    };
    let lower_level = adjusted(normal.inverse_cdf(alpha));
    let upper_level = adjusted(normal.inverse_cdf(1.0 - alpha));
    if !lower_level.is_finite() || !upper_level.is_finite() {
        return None;
    }
    debug!(z0, a, lower_level, upper_level, "BCa levels");
    Some((percentile(sorted, lower_level), percentile(sorted, upper_level)))
}

/// Jackknife acceleration; zero when it cannot be estimated.
fn acceleration<T>(values: &[f64], statistic: &T) -> f64
where
    T: ResampleStatistic + ?Sized,
{
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mut leave_one_out = Vec::with_capacity(n - 1);
    let jackknife: Vec<f64> = (0..n)
        .map(|i| {
            leave_one_out.clear();
            leave_one_out.extend_from_slice(&values[..i]);
            leave_one_out.extend_from_slice(&values[i + 1..]);
            statistic.compute(&leave_one_out)
        })
        .collect();

    let center = mean(&jackknife);
    let (cubed, squared) = jackknife.iter().fold((0.0, 0.0), |(cubed, squared), &t| {
        let d = center - t;
        (cubed + d * d * d, squared + d * d)
    });
    let denominator = 6.0 * squared.powf(1.5);
    let a = cubed / denominator;
    if a.is_finite() { a } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistic::Statistic;
    use std::cell::Cell;

    fn ramp(n: usize) -> Vec<f64> {
        (1..=n).map(|i| i as f64).collect()
    }

    #[test]
    fn test_config_defaults() {
        let config = BootstrapConfig::default();
        assert_eq!(config.n_resamples, 10_000);
        assert_eq!(config.confidence_level, 0.95);
        assert_eq!(config.seed, 42);
        assert_eq!(config.method, BootstrapMethod::Percentile);
    }

    #[test]
    fn test_config_validation() {
        assert_eq!(
            BootstrapConfig::default().with_resamples(0).validate(),
            Err(InvalidInputError::InvalidResampleCount { count: 0 })
        );
        for level in [0.0, 1.0, -0.5, 95.0] {
            assert_eq!(
                BootstrapConfig::default()
                    .with_confidence_level(level)
                    .validate(),
                Err(InvalidInputError::InvalidConfidenceLevel { level })
            );
        }
        assert!(
            BootstrapConfig::default()
                .with_confidence_level(f64::NAN)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_validation_happens_before_resampling() {
        let calls = Cell::new(0usize);
        let counting = |v: &[f64]| {
            calls.set(calls.get() + 1);
            mean(v)
        };
        let config = BootstrapConfig::default().with_confidence_level(1.0);
        assert!(estimate(ramp(5), &counting, &config).is_err());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_statistic_minimum_is_enforced() {
        let err = estimate([1.0], &Statistic::StdDev, &BootstrapConfig::default()).unwrap_err();
        assert_eq!(
            err,
            InvalidInputError::TooFewObservations {
                statistic: "standard deviation",
                required: 2,
                actual: 1,
            }
        );
    }

    #[test]
    fn test_single_observation_gives_point_interval() {
        let result = estimate([4.0], &mean, &BootstrapConfig::default().with_resamples(50)).unwrap();
        assert_eq!(result.point_estimate, 4.0);
        assert_eq!(result.lower, 4.0);
        assert_eq!(result.upper, 4.0);
        assert_eq!(result.width(), 0.0);
    }

    #[test]
    fn test_resample_distribution_is_sorted_and_sized() {
        let dist = resample_distribution(&ramp(10), &mean, 200, 7);
        assert_eq!(dist.len(), 200);
        assert!(dist.windows(2).all(|w| w[0] <= w[1]));
        assert!(dist.iter().all(|&m| (1.0..=10.0).contains(&m)));
    }

    #[test]
    fn test_acceleration_is_zero_for_symmetric_mean() {
        assert!(acceleration(&ramp(9), &mean).abs() < 1e-12);
        assert_eq!(acceleration(&[3.0], &mean), 0.0);
        assert_eq!(acceleration(&[2.0, 2.0, 2.0], &mean), 0.0);
    }

    #[test]
    fn test_bca_falls_back_when_bias_is_infinite() {
        let calls = Cell::new(0usize);
        // First call is the point estimate; every resample lies above it.
        let shifted = |_: &[f64]| {
            let call = calls.get();
            calls.set(call + 1);
            if call == 0 { 0.0 } else { 1.0 }
        };
        let config = BootstrapConfig::default()
            .with_resamples(100)
            .with_method(BootstrapMethod::Bca);
        let result = estimate(ramp(5), &shifted, &config).unwrap();
        assert_eq!(result.point_estimate, 0.0);
        assert_eq!((result.lower, result.upper), (1.0, 1.0));
        assert_eq!(result.method, BootstrapMethod::Bca);
    }

    #[test]
    fn test_bca_without_bias_or_skew_matches_percentile() {
        // Median of a symmetric ramp gives z0 = 0; the symmetric sample gives a = 0.
        let sorted = ramp(100);
        let (lower, upper) = bca_bounds(&ramp(3), &mean, 50.5, &sorted, 0.025).unwrap();
        let (p_lower, p_upper) = percentile_bounds(&sorted, 0.025);
        assert!((lower - p_lower).abs() < 1e-6, "{lower} vs {p_lower}");
        assert!((upper - p_upper).abs() < 1e-6, "{upper} vs {p_upper}");

        assert!(bca_bounds(&ramp(3), &mean, 0.0, &sorted, 0.025).is_none());
    }

    #[test]
    fn test_bca_brackets_point_estimate() {
        let sample: Vec<f64> = (0..40).map(|i| f64::from(i % 7) + f64::from(i) * 0.1).collect();
        let config = BootstrapConfig::default()
            .with_resamples(2_000)
            .with_method(BootstrapMethod::Bca);
        let result = estimate(&sample, &mean, &config).unwrap();
        assert!(result.lower < result.point_estimate);
        assert!(result.point_estimate < result.upper);
    }

    #[test]
    fn test_bootstrap_mean_takes_percent() {
        let result = bootstrap_mean(ramp(10), 500, 90.0, 1).unwrap();
        assert_eq!(result.confidence_level, 0.9);
        assert_eq!(result.n_resamples, 500);
        assert_eq!(result.seed, 1);
        assert_eq!(result.point_estimate, 5.5);

        assert!(matches!(
            bootstrap_mean(ramp(10), 500, 100.0, 1),
            Err(InvalidInputError::InvalidConfidenceLevel { .. })
        ));
    }
}
