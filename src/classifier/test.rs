use approx::assert_relative_eq;
use rand::seq::SliceRandom;

use crate::classifier::KNNClassifier;
use crate::distance::{Euclidean, Manhattan};
use crate::test::{random_points, seeded_rng};
use crate::KnnError;

fn sample_data() -> (Vec<[f64; 2]>, Vec<i32>, Vec<[f64; 2]>) {
    let x_train = vec![[1., 2.], [2., 3.], [3., 4.], [5., 5.], [6., 6.]];
    let y_train = vec![0, 0, 1, 1, 1];
    let x_test = vec![[2., 2.], [4., 5.]];
    (x_train, y_train, x_test)
}

#[test]
fn exact_match_is_one_hot() {
    let train = vec![[0., 1.], [1., 0.], [0., 0.], [1., 1.]];
    let target = vec![0, 1, 0, 1];
    let mut knn = KNNClassifier::new(3, 2, Euclidean);
    knn.fit(&train, &target).unwrap();

    assert_eq!(knn.predict_proba(&[[0., 1.]]).unwrap(), vec![vec![1., 0.]]);
    assert_eq!(knn.predict_proba(&[[1., 1.]]).unwrap(), vec![vec![0., 1.]]);
}

#[test]
fn exact_match_ignores_k() {
    let (x_train, y_train, _) = sample_data();
    for k in [1, 3, 5, 50] {
        let mut knn = KNNClassifier::new(k, 1, Euclidean);
        knn.fit(&x_train, &y_train).unwrap();
        assert_eq!(knn.predict_proba(&[[3., 4.]]).unwrap(), vec![vec![0., 1.]]);
    }
}

#[test]
fn votes_over_the_k_nearest() {
    let (x_train, y_train, _) = sample_data();
    let mut knn = KNNClassifier::new(3, 2, Euclidean);
    knn.fit(&x_train, &y_train).unwrap();

    let proba = knn.predict_proba(&[[2., 2.]]).unwrap();
    assert_relative_eq!(proba[0][0], 2. / 3.);
    assert_relative_eq!(proba[0][1], 1. / 3.);
    assert_eq!(knn.predict(&[[2., 2.]]).unwrap(), vec![0]);
}

#[test]
fn predict() {
    let (x_train, y_train, x_test) = sample_data();
    let mut knn = KNNClassifier::new(3, 2, Euclidean);
    knn.fit(&x_train, &y_train).unwrap();

    let predictions = knn.predict(&x_test).unwrap();
    assert_eq!(predictions.len(), x_test.len());
    assert!(predictions.iter().all(|p| [0, 1].contains(p)));
    assert_eq!(predictions, vec![0, 1]);
}

#[test]
fn predict_proba() {
    let (x_train, y_train, x_test) = sample_data();
    let mut knn = KNNClassifier::new(3, 2, Euclidean);
    knn.fit(&x_train, &y_train).unwrap();

    let proba = knn.predict_proba(&x_test).unwrap();
    assert_eq!(proba.len(), x_test.len());
    for row in &proba {
        assert_eq!(row.len(), 2);
        assert!(row.iter().all(|&p| (0.0..=1.0).contains(&p)));
        assert_relative_eq!(row.iter().sum::<f64>(), 1.0);
    }
}

#[test]
fn predict_proba_equal_probability() {
    let mut rng = seeded_rng(11);
    for count in [10, 100, 500, 1000] {
        let features = random_points(&mut rng, count, 2);
        let mut target: Vec<u8> = (0..count).map(|i| (i % 2) as u8).collect();
        target.shuffle(&mut rng);
        let x_test = random_points(&mut rng, 100, 2);

        let mut knn = KNNClassifier::new(count, 2, Euclidean);
        knn.fit(&features, &target).unwrap();
        let result = knn.predict_proba(&x_test).unwrap();

        for column in 0..2 {
            let mean = result.iter().map(|row| row[column]).sum::<f64>() / result.len() as f64;
            assert_relative_eq!(mean, 0.5, epsilon = 1e-9);
        }
        for row in &result {
            assert_relative_eq!(row.iter().sum::<f64>(), 1.0, epsilon = 1e-6);
        }
    }
}

#[test]
fn rows_sum_to_one_for_random_data() {
    let mut rng = seeded_rng(5);
    let features = random_points(&mut rng, 400, 3);
    let labels: Vec<u32> = (0..400).map(|i| i % 4).collect();
    let queries = random_points(&mut rng, 50, 3);

    let mut knn = KNNClassifier::new(7, 3, Manhattan);
    knn.fit(&features, &labels).unwrap();
    assert_eq!(knn.classes(), Some(&[0, 1, 2, 3][..]));

    for row in knn.predict_proba(&queries).unwrap() {
        assert_eq!(row.len(), 4);
        assert_relative_eq!(row.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        for p in row {
            // each probability is a multiple of 1/k
            assert_relative_eq!((p * 7.0).round(), p * 7.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn ties_go_to_the_first_label() {
    let features = vec![[0., 0.], [2., 0.]];
    let labels = vec!["b", "a"];
    let mut knn = KNNClassifier::new(2, 1, Euclidean);
    knn.fit(&features, &labels).unwrap();

    assert_eq!(knn.classes(), Some(&["a", "b"][..]));
    assert_eq!(knn.predict_proba(&[[1., 0.]]).unwrap(), vec![vec![0.5, 0.5]]);
    assert_eq!(knn.predict(&[[1., 0.]]).unwrap(), vec!["a"]);
}

#[test]
fn fewer_points_than_k() {
    let features = vec![[0., 0.], [1., 0.], [5., 5.]];
    let labels = vec![1, 1, 2];
    let mut knn = KNNClassifier::new(10, 1, Euclidean);
    knn.fit(&features, &labels).unwrap();

    let proba = knn.predict_proba(&[[0.5, 0.5]]).unwrap();
    assert_relative_eq!(proba[0][0], 2. / 3.);
    assert_relative_eq!(proba[0][1], 1. / 3.);
}

#[test]
fn infinite_distances_still_vote() {
    let features = vec![[0., 0.], [1., 0.], [0., 1.]];
    let labels = vec![0, 1, 1];
    let isolated = |a: &[f64], b: &[f64]| if a == b { 0.0 } else { f64::INFINITY };
    let mut knn = KNNClassifier::new(2, 1, isolated);
    knn.fit(&features, &labels).unwrap();

    let neighbors = knn.tree().unwrap().nearest(&[9., 9.], 2).unwrap();
    assert_eq!(neighbors.len(), 2);
    assert!(neighbors.iter().all(|n| n.distance == f64::INFINITY));

    let proba = knn.predict_proba(&[[9., 9.]]).unwrap();
    assert!(proba[0].iter().all(|p| p.is_finite()));
    assert_relative_eq!(proba[0].iter().sum::<f64>(), 1.0);
}

#[test]
fn unfitted_model() {
    let knn = KNNClassifier::<f64, i32, _>::new(3, 2, Euclidean);
    assert!(!knn.is_fitted());
    assert!(knn.classes().is_none());
    assert!(knn.tree().is_none());
    assert_eq!(knn.predict(&[[0., 0.]]), Err(KnnError::ModelUnfitted));
    assert_eq!(knn.predict_proba(&[[0., 0.]]), Err(KnnError::ModelUnfitted));
}

#[test]
fn rejects_invalid_fit_data() {
    let (x_train, y_train, _) = sample_data();

    let mut knn = KNNClassifier::new(3, 2, Euclidean);
    assert!(matches!(
        knn.fit(&x_train, &y_train[..4]),
        Err(KnnError::InvalidInput(_))
    ));

    let duplicated = vec![[1., 1.], [1., 1.]];
    assert!(matches!(
        knn.fit(&duplicated, &[0, 1]),
        Err(KnnError::InvalidInput(_))
    ));

    let mut knn = KNNClassifier::new(0, 2, Euclidean);
    assert!(matches!(
        knn.fit(&x_train, &y_train),
        Err(KnnError::InvalidArgument(_))
    ));

    let mut knn = KNNClassifier::new(3, 0, Euclidean);
    assert!(matches!(
        knn.fit(&x_train, &y_train),
        Err(KnnError::InvalidArgument(_))
    ));
}

#[test]
fn rejects_queries_of_the_wrong_dimension() {
    let (x_train, y_train, _) = sample_data();
    let mut knn = KNNClassifier::new(3, 2, Euclidean);
    knn.fit(&x_train, &y_train).unwrap();

    assert!(matches!(
        knn.predict(&[[1., 2., 3.]]),
        Err(KnnError::InvalidInput(_))
    ));
}

#[test]
fn refit_replaces_the_model() {
    let (x_train, y_train, _) = sample_data();
    let mut knn = KNNClassifier::new(1, 2, Euclidean);
    knn.fit(&x_train, &y_train).unwrap();
    assert_eq!(knn.classes(), Some(&[0, 1][..]));

    let features = vec![[0., 0., 0.], [1., 1., 1.], [2., 2., 2.]];
    knn.fit(&features, &[7, 5, 6]).unwrap();
    assert_eq!(knn.classes(), Some(&[5, 6, 7][..]));
    assert_eq!(knn.tree().map(|tree| tree.dim()), Some(3));
    assert_eq!(
        knn.predict_proba(&[[0.9, 1.1, 1.0]]).unwrap(),
        vec![vec![1., 0., 0.]]
    );

    // a failed fit keeps the previous model
    assert!(knn.fit(&features, &[1, 2]).is_err());
    assert_eq!(knn.classes(), Some(&[5, 6, 7][..]));
}
