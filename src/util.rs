//! Shape validation shared by the tree, the classifier and the scalers.

use std::collections::HashSet;

use bytemuck::cast_slice;

use crate::error::{KnnError, Result};
use crate::r#type::Coordinate;

/// Hashable identity of a point: the raw bytes of its coordinates, with `-0.0` folded into `0.0`
/// so that identity matches elementwise float equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct PointKey(Vec<u8>);

impl PointKey {
    pub(crate) fn new<N: Coordinate>(point: &[N]) -> Self {
        let canonical: Vec<N> = point
            .iter()
            .map(|&c| if c == N::zero() { N::zero() } else { c })
            .collect();
        Self(cast_slice(&canonical).to_vec())
    }
}

/// Check that `rows` is a non-empty rectangular collection of finite points and return its
/// dimension.
pub(crate) fn validate_rows<N: Coordinate, P: AsRef<[N]>>(rows: &[P]) -> Result<usize> {
    let first = rows
        .first()
        .ok_or_else(|| KnnError::InvalidInput("Points must not be empty".to_string()))?;
    let dim = first.as_ref().len();
    if dim == 0 {
        return Err(KnnError::InvalidInput(
            "Points must have at least one coordinate".to_string(),
        ));
    }
    validate_dim(rows, dim)?;
    Ok(dim)
}

/// Check that every row has exactly `dim` finite coordinates. An empty collection is valid.
pub(crate) fn validate_dim<N: Coordinate, P: AsRef<[N]>>(rows: &[P], dim: usize) -> Result<()> {
    for (i, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        if row.len() != dim {
            return Err(KnnError::InvalidInput(format!(
                "Point {} has {} coordinates when expected {}.",
                i,
                row.len(),
                dim
            )));
        }
        if row.iter().any(|c| !c.is_finite()) {
            return Err(KnnError::InvalidInput(format!(
                "Point {} has a non-finite coordinate.",
                i
            )));
        }
    }
    Ok(())
}

/// Check that no two rows are elementwise equal.
pub(crate) fn validate_unique<N: Coordinate, P: AsRef<[N]>>(rows: &[P]) -> Result<()> {
    let mut seen = HashSet::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        if !seen.insert(PointKey::new(row.as_ref())) {
            return Err(KnnError::InvalidInput(format!(
                "Points should be unique, point {} is a duplicate.",
                i
            )));
        }
    }
    Ok(())
}
