#[cfg(feature = "rayon")]
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::distance::Metric;
use crate::error::{KnnError, Result};
use crate::heap::BoundedHeap;
use crate::kdtree::node::{Item, Node};
use crate::kdtree::KDTreeBuilder;
use crate::r#type::Coordinate;
use crate::util::validate_dim;

/// An immutable k-d tree over points of one fixed dimension.
///
/// Usually this will be created from scratch via [`KDTreeBuilder`], or with [`KDTree::build`].
#[derive(Clone)]
pub struct KDTree<N: Coordinate, M: Metric<N>> {
    pub(crate) root: Node<N>,
    pub(crate) dim: usize,
    pub(crate) leaf_size: usize,
    pub(crate) num_items: usize,
    pub(crate) metric: M,
}

/// A point returned by a nearest-neighbor query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a, N> {
    /// The insertion index of the point in the data the tree was built from.
    pub index: usize,
    /// The metric's distance from the query to this point.
    pub distance: N,
    /// The coordinates of this point.
    pub point: &'a [N],
}

impl<N: Coordinate, M: Metric<N>> KDTree<N, M> {
    /// Build a tree over `points`.
    ///
    /// The metric is not used during construction; it is kept for queries.
    ///
    /// ```
    /// use knn_index::distance::Euclidean;
    /// use knn_index::kdtree::KDTree;
    ///
    /// let points = vec![[1., 2.], [2., 3.], [3., 4.], [5., 5.], [6., 6.]];
    /// let tree = KDTree::build(&points, 2, Euclidean).unwrap();
    ///
    /// let mut found: Vec<usize> = tree
    ///     .nearest(&[2., 2.], 3)
    ///     .unwrap()
    ///     .iter()
    ///     .map(|neighbor| neighbor.index)
    ///     .collect();
    /// found.sort();
    /// assert_eq!(found, vec![0, 1, 2]);
    /// ```
    pub fn build<P: AsRef<[N]>>(points: &[P], leaf_size: usize, metric: M) -> Result<Self> {
        let mut builder = KDTreeBuilder::new_with_leaf_size(metric, leaf_size);
        builder.add_points(points);
        builder.finish()
    }

    /// The dimension shared by every point in this tree.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The number of points in this tree.
    pub fn num_items(&self) -> usize {
        self.num_items
    }

    /// The leaf size this tree was built with.
    pub fn leaf_size(&self) -> usize {
        self.leaf_size
    }

    /// The metric used by queries.
    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// Access the root node of the KDTree for manual traversal.
    pub fn root(&self) -> &Node<N> {
        &self.root
    }

    /// The number of levels of this tree.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Find the `k` nearest points to each of `points`.
    ///
    /// Each inner vector is ordered by ascending distance, ties in the order they were found.
    /// If the tree holds fewer than `k` points, every point is returned.
    pub fn query<P: AsRef<[N]> + Sync>(
        &self,
        points: &[P],
        k: usize,
    ) -> Result<Vec<Vec<Neighbor<'_, N>>>> {
        check_k(k)?;
        validate_dim(points, self.dim)?;

        #[cfg(feature = "rayon")]
        {
            points
                .par_iter()
                .map(|point| self.find_k_neighbors(point.as_ref(), k))
                .collect()
        }

        #[cfg(not(feature = "rayon"))]
        {
            points
                .iter()
                .map(|point| self.find_k_neighbors(point.as_ref(), k))
                .collect()
        }
    }

    /// Find the `k` nearest points to a single `point`.
    pub fn nearest(&self, point: &[N], k: usize) -> Result<Vec<Neighbor<'_, N>>> {
        check_k(k)?;
        validate_dim(&[point], self.dim)?;
        self.find_k_neighbors(point, k)
    }

    fn find_k_neighbors(&self, point: &[N], k: usize) -> Result<Vec<Neighbor<'_, N>>> {
        let mut heap = BoundedHeap::new(k)?;
        self.search(&self.root, point, &mut heap);

        let neighbors = heap
            .into_sorted_vec()
            .into_iter()
            .map(|(distance, item)| Neighbor {
                index: item.index,
                distance,
                point: &item.coords,
            })
            .collect();
        Ok(neighbors)
    }

    /// Depth-first branch-and-bound search, near side first.
    fn search<'a>(
        &'a self,
        node: &'a Node<N>,
        point: &[N],
        heap: &mut BoundedHeap<N, &'a Item<N>>,
    ) {
        match node {
            Node::Leaf(leaf) => {
                // no pruning possible within a bucket
                for item in &leaf.items {
                    heap.push(self.metric.distance(&item.coords, point), item);
                }
            }
            Node::Internal(internal) => {
                let key = &internal.key;
                heap.push(self.metric.distance(&key.coords, point), key);

                let split = key.coords[internal.axis];
                let value = point[internal.axis];
                let (near, far) = if value < split {
                    (&internal.left, &internal.right)
                } else {
                    (&internal.right, &internal.left)
                };

                self.search(near, point, heap);

                // the far side can only hold closer points if the splitting plane is closer
                // than the current k-th best
                if (split - value).abs() < heap.get_max() {
                    self.search(far, point, heap);
                }
            }
        }
    }
}

fn check_k(k: usize) -> Result<()> {
    if k == 0 {
        return Err(KnnError::InvalidArgument(
            "Number of neighbors must be positive".to_string(),
        ));
    }
    Ok(())
}
