//! Distance metrics for nearest-neighbor queries.
//!
//! Any `Fn(&[N], &[N]) -> N` can be used as a metric. This module also provides the Minkowski
//! family (Euclidean, Manhattan, Chebyshev and general `p`), for which the k-d tree's pruning
//! rule is exact: the distance between two points is never smaller than their difference along
//! any single axis.

use num_traits::Float;

/// A distance between two points of equal dimension.
///
/// The k-d tree skips a subtree when the query's distance to the splitting plane along one axis
/// is not smaller than the current k-th best distance. Results are only exact for metrics that
/// are bounded below by that per-axis difference.
pub trait Metric<N>: Sync {
    /// Calculate the distance between `a` and `b`.
    fn distance(&self, a: &[N], b: &[N]) -> N;
}

impl<N, F> Metric<N> for F
where
    F: Fn(&[N], &[N]) -> N + Sync,
{
    #[inline]
    fn distance(&self, a: &[N], b: &[N]) -> N {
        self(a, b)
    }
}

/// Euclidean (L2) distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl<N: Float> Metric<N> for Euclidean {
    #[inline]
    fn distance(&self, a: &[N], b: &[N]) -> N {
        a.iter()
            .zip(b)
            .fold(N::zero(), |acc, (&x, &y)| {
                let d = x - y;
                acc + d * d
            })
            .sqrt()
    }
}

/// Manhattan (L1) distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Manhattan;

impl<N: Float> Metric<N> for Manhattan {
    #[inline]
    fn distance(&self, a: &[N], b: &[N]) -> N {
        a.iter()
            .zip(b)
            .fold(N::zero(), |acc, (&x, &y)| acc + (x - y).abs())
    }
}

/// Chebyshev (L∞) distance: the largest per-axis difference.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chebyshev;

impl<N: Float> Metric<N> for Chebyshev {
    #[inline]
    fn distance(&self, a: &[N], b: &[N]) -> N {
        a.iter()
            .zip(b)
            .fold(N::zero(), |acc, (&x, &y)| acc.max((x - y).abs()))
    }
}

/// Minkowski distance of order `p`.
///
/// `p` should be at least 1; below that the function is not a metric and tree queries may miss
/// neighbors.
#[derive(Debug, Clone, Copy)]
pub struct Minkowski {
    /// The order of the norm.
    pub p: f64,
}

impl Minkowski {
    /// Create a new Minkowski metric of order `p`.
    pub fn new(p: f64) -> Self {
        Self { p }
    }
}

impl<N: Float> Metric<N> for Minkowski {
    fn distance(&self, a: &[N], b: &[N]) -> N {
        let p = N::from(self.p).unwrap_or_else(N::one);
        a.iter()
            .zip(b)
            .fold(N::zero(), |acc, (&x, &y)| acc + (x - y).abs().powf(p))
            .powf(p.recip())
    }
}
