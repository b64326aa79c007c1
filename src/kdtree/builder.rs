use std::cmp::Ordering;

use log::debug;

use crate::distance::Metric;
use crate::error::{KnnError, Result};
use crate::kdtree::node::{Internal, Item, Leaf, Node};
use crate::kdtree::KDTree;
use crate::r#type::Coordinate;
use crate::util::{validate_rows, validate_unique};

/// The default leaf size used by [`KDTreeBuilder::new`]
pub const DEFAULT_LEAF_SIZE: usize = 16;

/// A builder to create a [`KDTree`].
///
/// ```
/// use knn_index::distance::Euclidean;
/// use knn_index::kdtree::KDTreeBuilder;
///
/// let mut builder = KDTreeBuilder::new_with_leaf_size(Euclidean, 1);
/// builder.add(&[0., 0.]);
/// builder.add(&[1., 1.]);
/// builder.add(&[2., 2.]);
/// let tree = builder.finish().unwrap();
///
/// let neighbors = tree.nearest(&[1.9, 1.8], 2).unwrap();
/// assert_eq!(neighbors[0].index, 2);
/// assert_eq!(neighbors[1].index, 1);
/// ```
pub struct KDTreeBuilder<N: Coordinate, M: Metric<N>> {
    points: Vec<Vec<N>>,
    leaf_size: usize,
    metric: M,
}

impl<N: Coordinate, M: Metric<N>> KDTreeBuilder<N, M> {
    /// Create a new builder with the provided metric and the default leaf size.
    pub fn new(metric: M) -> Self {
        Self::new_with_leaf_size(metric, DEFAULT_LEAF_SIZE)
    }

    /// Create a new builder with the provided metric and leaf size.
    ///
    /// A subset of points becomes a leaf once it holds fewer than `2 * leaf_size + 1` points.
    pub fn new_with_leaf_size(metric: M, leaf_size: usize) -> Self {
        Self {
            points: vec![],
            leaf_size,
            metric,
        }
    }

    /// Add a point to the index.
    ///
    /// This returns the insertion index, which [`KDTree`] queries report back in
    /// [`Neighbor::index`][crate::kdtree::Neighbor::index].
    pub fn add(&mut self, point: &[N]) -> usize {
        let index = self.points.len();
        self.points.push(point.to_vec());
        index
    }

    /// Add every point of a rectangular collection, in order.
    pub fn add_points<P: AsRef<[N]>>(&mut self, points: &[P]) {
        self.points.reserve(points.len());
        for point in points {
            self.add(point.as_ref());
        }
    }

    /// The number of points added so far.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if no point has been added.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consume this builder, validating the points and building a KDTree ready for queries.
    ///
    /// Fails with [`KnnError::InvalidArgument`] if the leaf size is zero, and with
    /// [`KnnError::InvalidInput`] if no points were added, the points do not share one
    /// dimension, a coordinate is not finite, or two points are equal.
    pub fn finish(self) -> Result<KDTree<N, M>> {
        if self.leaf_size == 0 {
            return Err(KnnError::InvalidArgument(
                "Leaf size must be positive".to_string(),
            ));
        }

        let dim = validate_rows(&self.points)?;
        validate_unique(&self.points)?;

        let num_items = self.points.len();
        let items = self
            .points
            .into_iter()
            .enumerate()
            .map(|(index, coords)| Item {
                index,
                coords: coords.into_boxed_slice(),
            })
            .collect();

        let root = build_node(items, self.leaf_size, dim);
        debug!(
            "built kd-tree over {} points of dimension {} (leaf size {}, depth {})",
            num_items,
            dim,
            self.leaf_size,
            root.depth()
        );

        Ok(KDTree {
            root,
            dim,
            leaf_size: self.leaf_size,
            num_items,
            metric: self.metric,
        })
    }
}

/// Recursively split `items` around the median of their widest axis.
fn build_node<N: Coordinate>(mut items: Vec<Item<N>>, leaf_size: usize, dim: usize) -> Node<N> {
    if items.len() < leaf_size.saturating_mul(2).saturating_add(1) {
        return Node::Leaf(Leaf { items });
    }

    let axis = widest_axis(&items, dim);

    // stable, so equal coordinates keep their insertion order
    items.sort_by(|a, b| {
        a.coords[axis]
            .partial_cmp(&b.coords[axis])
            .unwrap_or(Ordering::Equal)
    });

    let m = items.len() / 2;
    let right = items.split_off(m + 1);
    // m is now the last index
    let key = items.swap_remove(m);
    let left = items;

    Node::Internal(Internal {
        key,
        axis,
        left: Box::new(build_node(left, leaf_size, dim)),
        right: Box::new(build_node(right, leaf_size, dim)),
    })
}

/// The axis with the largest variance; the first one wins ties.
fn widest_axis<N: Coordinate>(items: &[Item<N>], dim: usize) -> usize {
    let n = N::from_usize(items.len()).unwrap_or_else(N::one);

    let mut best_axis = 0;
    let mut best_spread = N::neg_infinity();
    for axis in 0..dim {
        let mean = items
            .iter()
            .fold(N::zero(), |acc, item| acc + item.coords[axis])
            / n;
        let spread = items.iter().fold(N::zero(), |acc, item| {
            let d = item.coords[axis] - mean;
            acc + d * d
        }) / n;
        if spread > best_spread {
            best_spread = spread;
            best_axis = axis;
        }
    }
    best_axis
}
