//! Numeric samples and the conversion boundary into them.

use polars::prelude::{Column, DataType, Series};
use serde::Serialize;

use crate::error::{InvalidInputError, Result};

/// A non-empty sequence of finite values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Sample {
    values: Vec<f64>,
}

impl Sample {
    /// Validates `values` into a sample.
    ///
    /// # Errors
    ///
    /// `EmptySample` for no values, `NonFinite` for the first NaN or infinity.
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(InvalidInputError::EmptySample);
        }
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(InvalidInputError::NonFinite { index, value });
        }
        Ok(Self { values })
    }

    /// Builds a sample from a numeric series, skipping null cells.
    pub fn from_series_dropping_nulls(series: &Series) -> Result<Self> {
        let values = numeric_cells(series)?.into_iter().flatten().collect();
        Self::new(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; kept for the `len` convention.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn require(&self, statistic: &'static str, required: usize) -> Result<()> {
        if self.len() < required {
            return Err(InvalidInputError::TooFewObservations {
                statistic,
                required,
                actual: self.len(),
            });
        }
        Ok(())
    }
}

impl AsRef<[f64]> for Sample {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

/// Conversion of caller data into a validated [`Sample`].
///
/// Implemented for slices, vectors and arrays of `f64`, `f32`, `i64` and
/// `i32`, for row-major nested vectors, and for numeric Polars series and
/// columns. Nulls in a series are rejected; use
/// [`Sample::from_series_dropping_nulls`] to skip them instead.
pub trait IntoSample {
    fn into_sample(self) -> Result<Sample>;
}

impl IntoSample for Sample {
    fn into_sample(self) -> Result<Sample> {
        Ok(self)
    }
}

impl IntoSample for &Sample {
    fn into_sample(self) -> Result<Sample> {
        Ok(self.clone())
    }
}

impl IntoSample for Vec<f64> {
    fn into_sample(self) -> Result<Sample> {
        Sample::new(self)
    }
}

macro_rules! impl_into_sample {
    ($($ty:ty),*) => {
        $(
            impl IntoSample for &[$ty] {
                fn into_sample(self) -> Result<Sample> {
                    Sample::new(self.iter().map(|&v| v as f64).collect())
                }
            }

            impl<const N: usize> IntoSample for [$ty; N] {
                fn into_sample(self) -> Result<Sample> {
                    self.as_slice().into_sample()
                }
            }

            impl<const N: usize> IntoSample for &[$ty; N] {
                fn into_sample(self) -> Result<Sample> {
                    self.as_slice().into_sample()
                }
            }

            impl IntoSample for &Vec<$ty> {
                fn into_sample(self) -> Result<Sample> {
                    self.as_slice().into_sample()
                }
            }
        )*
    };
}

impl_into_sample!(f64, f32, i64, i32);

macro_rules! impl_into_sample_owned {
    ($($ty:ty),*) => {
        $(
            impl IntoSample for Vec<$ty> {
                fn into_sample(self) -> Result<Sample> {
                    self.as_slice().into_sample()
                }
            }
        )*
    };
}

impl_into_sample_owned!(f32, i64, i32);

/// Rows are flattened in order; indices in errors count across rows.
impl IntoSample for Vec<Vec<f64>> {
    fn into_sample(self) -> Result<Sample> {
        Sample::new(self.into_iter().flatten().collect())
    }
}

impl IntoSample for &Series {
    fn into_sample(self) -> Result<Sample> {
        let cells = numeric_cells(self)?;
        let values = cells
            .into_iter()
            .enumerate()
            .map(|(index, cell)| cell.ok_or(InvalidInputError::MissingValue { index }))
            .collect::<Result<Vec<f64>>>()?;
        Sample::new(values)
    }
}

impl IntoSample for &Column {
    fn into_sample(self) -> Result<Sample> {
        self.as_materialized_series().into_sample()
    }
}

/// Casts a numeric series to `f64` cells, nulls preserved.
fn numeric_cells(series: &Series) -> Result<Vec<Option<f64>>> {
    let unsupported = || InvalidInputError::UnsupportedDtype {
        dtype: series.dtype().to_string(),
    };
    match series.dtype() {
        DataType::Int32
        | DataType::Int64
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Float32
        | DataType::Float64 => {}
        _ => return Err(unsupported()),
    }
    let cast = series
        .cast(&DataType::Float64)
        .map_err(|_| unsupported())?;
    let floats = cast.f64().map_err(|_| unsupported())?;
    Ok(floats.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::NamedFrom;

    #[test]
    fn test_rejects_empty() {
        assert_eq!(
            Vec::<f64>::new().into_sample(),
            Err(InvalidInputError::EmptySample)
        );
        let empty: &[i32] = &[];
        assert_eq!(empty.into_sample(), Err(InvalidInputError::EmptySample));
    }

    #[test]
    fn test_rejects_non_finite() {
        let err = vec![1.0, f64::NAN, 3.0].into_sample().unwrap_err();
        assert!(matches!(err, InvalidInputError::NonFinite { index: 1, .. }));
        let err = [1.0f32, f32::INFINITY].into_sample().unwrap_err();
        assert!(matches!(err, InvalidInputError::NonFinite { index: 1, .. }));
    }

    #[test]
    fn test_integer_inputs() {
        let sample = vec![1i64, 2, 3].into_sample().unwrap();
        assert_eq!(sample.values(), &[1.0, 2.0, 3.0]);
        let sample = [4i32, 5].into_sample().unwrap();
        assert_eq!(sample.values(), &[4.0, 5.0]);
    }

    #[test]
    fn test_nested_vectors_flatten_row_major() {
        let sample = vec![vec![1.0, 2.0], vec![], vec![3.0]].into_sample().unwrap();
        assert_eq!(sample.values(), &[1.0, 2.0, 3.0]);

        let err = vec![vec![1.0], vec![2.0, f64::NAN]].into_sample().unwrap_err();
        assert!(matches!(err, InvalidInputError::NonFinite { index: 2, .. }));
    }

    #[test]
    fn test_series_input() {
        let series = Series::new("x".into(), [1i64, 2, 3]);
        assert_eq!((&series).into_sample().unwrap().values(), &[1.0, 2.0, 3.0]);

        let column = Column::new("y".into(), [0.5f64, 1.5]);
        assert_eq!((&column).into_sample().unwrap().values(), &[0.5, 1.5]);
    }

    #[test]
    fn test_series_nulls() {
        let series = Series::new("x".into(), vec![Some(1.0f64), None, Some(3.0)]);
        assert_eq!(
            (&series).into_sample(),
            Err(InvalidInputError::MissingValue { index: 1 })
        );
        let sample = Sample::from_series_dropping_nulls(&series).unwrap();
        assert_eq!(sample.values(), &[1.0, 3.0]);
    }

    #[test]
    fn test_all_null_series_is_empty() {
        let series = Series::new("x".into(), vec![None::<f64>, None]);
        assert_eq!(
            Sample::from_series_dropping_nulls(&series),
            Err(InvalidInputError::EmptySample)
        );
    }

    #[test]
    fn test_string_series_is_unsupported() {
        let series = Series::new("s".into(), ["a", "b"]);
        assert!(matches!(
            (&series).into_sample(),
            Err(InvalidInputError::UnsupportedDtype { .. })
        ));
    }

    #[test]
    fn test_too_few_observations() {
        let sample = Sample::new(vec![1.0]).unwrap();
        assert_eq!(
            sample.require("standard deviation", 2),
            Err(InvalidInputError::TooFewObservations {
                statistic: "standard deviation",
                required: 2,
                actual: 1,
            })
        );
        assert!(sample.require("mean", 1).is_ok());
    }
}
