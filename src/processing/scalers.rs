//! Per-column feature scaling, fitted on one dataset and applied to others.

use std::cmp::Ordering;

use crate::error::{KnnError, Result};
use crate::r#type::Coordinate;
use crate::util::{validate_dim, validate_rows};

/// A column-wise transform learned from data.
pub trait Scaler<N: Coordinate> {
    /// Learn the per-column parameters from `data`.
    ///
    /// Fails with [`KnnError::InvalidInput`] if `data` is empty, ragged or not finite.
    fn fit<P: AsRef<[N]>>(&mut self, data: &[P]) -> Result<()>;

    /// Apply the learned transform to every row of `data`.
    ///
    /// Fails with [`KnnError::ModelUnfitted`] before [`fit`][Scaler::fit], and with
    /// [`KnnError::InvalidInput`] if a row's width differs from the fitted data.
    fn transform<P: AsRef<[N]>>(&self, data: &[P]) -> Result<Vec<Vec<N>>>;

    /// Fit on `data`, then transform it.
    fn fit_transform<P: AsRef<[N]>>(&mut self, data: &[P]) -> Result<Vec<Vec<N>>> {
        self.fit(data)?;
        self.transform(data)
    }
}

/// Rescale each column to `[0, 1]` by its minimum and maximum.
///
/// Constant columns map to zero.
#[derive(Debug, Clone, Default)]
pub struct MinMaxScaler<N> {
    data_min: Option<Vec<N>>,
    data_max: Option<Vec<N>>,
}

impl<N: Coordinate> MinMaxScaler<N> {
    /// Create an unfitted scaler.
    pub fn new() -> Self {
        Self {
            data_min: None,
            data_max: None,
        }
    }

    /// Per-column minimum of the fitted data.
    pub fn data_min(&self) -> Option<&[N]> {
        self.data_min.as_deref()
    }

    /// Per-column maximum of the fitted data.
    pub fn data_max(&self) -> Option<&[N]> {
        self.data_max.as_deref()
    }
}

impl<N: Coordinate> Scaler<N> for MinMaxScaler<N> {
    fn fit<P: AsRef<[N]>>(&mut self, data: &[P]) -> Result<()> {
        let dim = validate_rows(data)?;

        let mut data_min = vec![N::infinity(); dim];
        let mut data_max = vec![N::neg_infinity(); dim];
        for row in data {
            for (j, &x) in row.as_ref().iter().enumerate() {
                data_min[j] = data_min[j].min(x);
                data_max[j] = data_max[j].max(x);
            }
        }

        self.data_min = Some(data_min);
        self.data_max = Some(data_max);
        Ok(())
    }

    fn transform<P: AsRef<[N]>>(&self, data: &[P]) -> Result<Vec<Vec<N>>> {
        let (Some(data_min), Some(data_max)) = (&self.data_min, &self.data_max) else {
            return Err(KnnError::ModelUnfitted);
        };
        scale_columns(data, data_min, data_max, |min, max| max - min)
    }
}

/// Center each column on its median and divide by its interquartile range.
///
/// Quartiles are linearly interpolated between the closest ranks. Columns with a zero
/// interquartile range map to zero.
#[derive(Debug, Clone, Default)]
pub struct RobustScaler<N> {
    median: Option<Vec<N>>,
    iqr: Option<Vec<N>>,
}

impl<N: Coordinate> RobustScaler<N> {
    /// Create an unfitted scaler.
    pub fn new() -> Self {
        Self {
            median: None,
            iqr: None,
        }
    }

    /// Per-column median of the fitted data.
    pub fn median(&self) -> Option<&[N]> {
        self.median.as_deref()
    }

    /// Per-column interquartile range of the fitted data.
    pub fn iqr(&self) -> Option<&[N]> {
        self.iqr.as_deref()
    }
}

impl<N: Coordinate> Scaler<N> for RobustScaler<N> {
    fn fit<P: AsRef<[N]>>(&mut self, data: &[P]) -> Result<()> {
        let dim = validate_rows(data)?;

        let mut median = Vec::with_capacity(dim);
        let mut iqr = Vec::with_capacity(dim);
        for j in 0..dim {
            let mut column: Vec<N> = data.iter().map(|row| row.as_ref()[j]).collect();
            column.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
            median.push(quantile(&column, 0.5));
            iqr.push(quantile(&column, 0.75) - quantile(&column, 0.25));
        }

        self.median = Some(median);
        self.iqr = Some(iqr);
        Ok(())
    }

    fn transform<P: AsRef<[N]>>(&self, data: &[P]) -> Result<Vec<Vec<N>>> {
        let (Some(median), Some(iqr)) = (&self.median, &self.iqr) else {
            return Err(KnnError::ModelUnfitted);
        };
        scale_columns(data, median, iqr, |_, iqr| iqr)
    }
}

/// `(x - offset) / scale_of(offset, param)` per column, zero where the scale is zero.
fn scale_columns<N: Coordinate, P: AsRef<[N]>>(
    data: &[P],
    offsets: &[N],
    params: &[N],
    scale_of: impl Fn(N, N) -> N,
) -> Result<Vec<Vec<N>>> {
    validate_dim(data, offsets.len())?;

    let scales: Vec<N> = offsets
        .iter()
        .zip(params)
        .map(|(&offset, &param)| scale_of(offset, param))
        .collect();

    let rows = data
        .iter()
        .map(|row| {
            row.as_ref()
                .iter()
                .zip(offsets.iter().zip(&scales))
                .map(|(&x, (&offset, &scale))| {
                    if scale == N::zero() {
                        N::zero()
                    } else {
                        (x - offset) / scale
                    }
                })
                .collect()
        })
        .collect();
    Ok(rows)
}

/// Linearly interpolated quantile of a sorted, non-empty slice.
fn quantile<N: Coordinate>(sorted: &[N], q: f64) -> N {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = N::from_f64(position - lower as f64).unwrap_or_else(N::zero);
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
