//! A k-nearest-neighbor classifier backed by a [`KDTree`][crate::kdtree::KDTree].

mod knn;

pub use knn::KNNClassifier;

#[cfg(test)]
mod test;
