//! Statistics evaluated on a sample and on each bootstrap resample.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A pure function of a sample, called once per resample.
///
/// Any `Fn(&[f64]) -> f64` is a statistic. Implementors that need more than
/// one observation say so through [`ResampleStatistic::min_observations`],
/// which the estimator checks before resampling.
pub trait ResampleStatistic {
    fn compute(&self, values: &[f64]) -> f64;

    fn min_observations(&self) -> usize {
        1
    }

    /// Name used in validation errors.
    fn name(&self) -> &'static str {
        "statistic"
    }
}

impl<F> ResampleStatistic for F
where
    F: Fn(&[f64]) -> f64,
{
    fn compute(&self, values: &[f64]) -> f64 {
        self(values)
    }
}

/// The built-in statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Statistic {
    #[default]
    Mean,
    Median,
    StdDev,
}

impl ResampleStatistic for Statistic {
    fn compute(&self, values: &[f64]) -> f64 {
        match self {
            Statistic::Mean => mean(values),
            Statistic::Median => median(values),
            Statistic::StdDev => std_dev(values),
        }
    }

    fn min_observations(&self) -> usize {
        match self {
            Statistic::Mean | Statistic::Median => 1,
            Statistic::StdDev => 2,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Statistic::Mean => "mean",
            Statistic::Median => "median",
            Statistic::StdDev => "standard deviation",
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Arithmetic mean. NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Middle value, or the average of the two middle values. NaN when empty.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Sample variance with Bessel's correction, via Welford's update.
/// NaN for fewer than two values.
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let mut running_mean = 0.0;
    let mut sum_sq = 0.0;
    for (i, &x) in values.iter().enumerate() {
        let delta = x - running_mean;
        running_mean += delta / (i + 1) as f64;
        sum_sq += delta * (x - running_mean);
    }
    sum_sq / (values.len() - 1) as f64
}

/// Sample standard deviation with Bessel's correction.
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}
