use std::collections::{BTreeSet, HashMap};

use log::debug;

use crate::distance::Metric;
use crate::error::{KnnError, Result};
use crate::kdtree::KDTree;
use crate::r#type::Coordinate;
use crate::util::{validate_dim, PointKey};

/// Majority-vote classifier over the `k` nearest training points.
///
/// Queries that coincide with a training point skip the tree and predict that point's label
/// with certainty.
///
/// ```
/// use knn_index::distance::Euclidean;
/// use knn_index::KNNClassifier;
///
/// let features = vec![[1., 2.], [2., 3.], [3., 4.], [5., 5.], [6., 6.]];
/// let labels = vec![0, 0, 1, 1, 1];
///
/// let mut classifier = KNNClassifier::new(3, 2, Euclidean);
/// classifier.fit(&features, &labels).unwrap();
///
/// assert_eq!(classifier.predict(&[[2., 2.]]).unwrap(), vec![0]);
/// assert_eq!(classifier.predict(&[[5., 5.]]).unwrap(), vec![1]);
/// ```
pub struct KNNClassifier<N: Coordinate, L, M: Metric<N>> {
    k: usize,
    leaf_size: usize,
    metric: M,
    model: Option<FittedModel<N, L, M>>,
}

struct FittedModel<N: Coordinate, L, M: Metric<N>> {
    tree: KDTree<N, M>,
    /// Training point to class position, for the exact-match path.
    lookup: HashMap<PointKey, usize>,
    /// Class position of each training point, by insertion index.
    targets: Vec<usize>,
    /// Sorted unique labels.
    classes: Vec<L>,
}

impl<N: Coordinate, L: Ord + Clone, M: Metric<N> + Clone> KNNClassifier<N, L, M> {
    /// Create an unfitted classifier voting over `k` neighbors, with a tree of the given leaf
    /// size.
    pub fn new(k: usize, leaf_size: usize, metric: M) -> Self {
        Self {
            k,
            leaf_size,
            metric,
            model: None,
        }
    }

    /// The number of neighbors that vote.
    pub fn k(&self) -> usize {
        self.k
    }

    /// The leaf size of the underlying tree.
    pub fn leaf_size(&self) -> usize {
        self.leaf_size
    }

    /// Returns `true` once [`fit`][Self::fit] has succeeded.
    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    /// The sorted unique labels seen by `fit`, which is the column order of
    /// [`predict_proba`][Self::predict_proba].
    pub fn classes(&self) -> Option<&[L]> {
        self.model.as_ref().map(|model| model.classes.as_slice())
    }

    /// The tree built by the last successful `fit`.
    pub fn tree(&self) -> Option<&KDTree<N, M>> {
        self.model.as_ref().map(|model| &model.tree)
    }

    /// Fit the classifier, replacing any previous model.
    ///
    /// On error the previous model, if any, is kept.
    pub fn fit<P: AsRef<[N]>>(&mut self, features: &[P], labels: &[L]) -> Result<()> {
        if features.len() != labels.len() {
            return Err(KnnError::InvalidInput(format!(
                "Features and labels must be the same length, got {} and {}.",
                features.len(),
                labels.len()
            )));
        }
        if self.k == 0 {
            return Err(KnnError::InvalidArgument(
                "Number of neighbors must be positive".to_string(),
            ));
        }

        let tree = KDTree::build(features, self.leaf_size, self.metric.clone())?;

        let classes: Vec<L> = labels
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let targets: Vec<usize> = labels
            .iter()
            .map(|label| classes.binary_search(label).unwrap_or_else(|i| i))
            .collect();
        let lookup = features
            .iter()
            .zip(&targets)
            .map(|(point, &class)| (PointKey::new(point.as_ref()), class))
            .collect();

        debug!(
            "fitted classifier on {} samples with {} classes (k = {})",
            features.len(),
            classes.len(),
            self.k
        );

        self.model = Some(FittedModel {
            tree,
            lookup,
            targets,
            classes,
        });
        Ok(())
    }

    /// Class probabilities for each of `points`, in the order of [`classes`][Self::classes].
    ///
    /// Each probability is the fraction of the neighbors found that carry that label. This is
    /// `count / k` unless the training set holds fewer than `k` points, in which case every
    /// training point votes.
    pub fn predict_proba<P: AsRef<[N]>>(&self, points: &[P]) -> Result<Vec<Vec<f64>>> {
        let model = self.model.as_ref().ok_or(KnnError::ModelUnfitted)?;
        validate_dim(points, model.tree.dim())?;
        points
            .iter()
            .map(|point| model.probabilities(point.as_ref(), self.k))
            .collect()
    }

    /// The most probable label for each of `points`. Ties go to the smallest label.
    pub fn predict<P: AsRef<[N]>>(&self, points: &[P]) -> Result<Vec<L>> {
        let model = self.model.as_ref().ok_or(KnnError::ModelUnfitted)?;
        validate_dim(points, model.tree.dim())?;

        points
            .iter()
            .map(|point| {
                let row = model.probabilities(point.as_ref(), self.k)?;
                let mut best = 0;
                for (i, &p) in row.iter().enumerate() {
                    if p > row[best] {
                        best = i;
                    }
                }
                Ok(model.classes[best].clone())
            })
            .collect()
    }
}

impl<N: Coordinate, L, M: Metric<N>> FittedModel<N, L, M> {
    fn probabilities(&self, point: &[N], k: usize) -> Result<Vec<f64>> {
        let mut probabilities = vec![0.0; self.classes.len()];

        if let Some(&class) = self.lookup.get(&PointKey::new(point)) {
            probabilities[class] = 1.0;
            return Ok(probabilities);
        }

        let neighbors = self.tree.nearest(point, k)?;
        for neighbor in &neighbors {
            probabilities[self.targets[neighbor.index]] += 1.0;
        }

        if !neighbors.is_empty() {
            let total = neighbors.len() as f64;
            for p in probabilities.iter_mut() {
                *p /= total;
            }
        }
        Ok(probabilities)
    }
}
