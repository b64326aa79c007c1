//! Splitting a labelled dataset into training and test parts.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{KnnError, Result};

/// The four parts produced by [`train_test_split`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit<X, Y> {
    /// Training features.
    pub x_train: Vec<X>,
    /// Test features.
    pub x_test: Vec<X>,
    /// Training labels, aligned with `x_train`.
    pub y_train: Vec<Y>,
    /// Test labels, aligned with `x_test`.
    pub y_test: Vec<Y>,
}

/// Split `x` and `y` into training and test parts.
///
/// The first `floor(n * (1 - test_size))` samples, after an optional shuffle driven by `rng`, go
/// to the training part. Pass a seeded generator for a reproducible split.
///
/// ```
/// use knn_index::processing::train_test_split;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let x: Vec<[f64; 2]> = (0..10).map(|i| [i as f64, 0.]).collect();
/// let y: Vec<u8> = (0..10).map(|i| i % 2).collect();
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let split = train_test_split(&x, &y, 0.2, true, &mut rng).unwrap();
/// assert_eq!(split.x_train.len(), 8);
/// assert_eq!(split.y_test.len(), 2);
/// ```
pub fn train_test_split<X: Clone, Y: Clone, R: Rng + ?Sized>(
    x: &[X],
    y: &[Y],
    test_size: f64,
    shuffle: bool,
    rng: &mut R,
) -> Result<TrainTestSplit<X, Y>> {
    if !(0.0..=1.0).contains(&test_size) {
        return Err(KnnError::InvalidArgument(format!(
            "test_size must be between 0 and 1, got {}",
            test_size
        )));
    }
    if x.len() != y.len() {
        return Err(KnnError::InvalidInput(format!(
            "X and Y must be of the same length, got {} and {}.",
            x.len(),
            y.len()
        )));
    }

    let mut indices: Vec<usize> = (0..x.len()).collect();
    if shuffle {
        indices.shuffle(rng);
    }

    let split = (x.len() as f64 * (1.0 - test_size)) as usize;
    let (train, test) = indices.split_at(split);

    Ok(TrainTestSplit {
        x_train: train.iter().map(|&i| x[i].clone()).collect(),
        x_test: test.iter().map(|&i| x[i].clone()).collect(),
        y_train: train.iter().map(|&i| y[i].clone()).collect(),
        y_test: test.iter().map(|&i| y[i].clone()).collect(),
    })
}
