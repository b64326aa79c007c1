//! Example classifying a synthetic three-class dataset.
//!
//! The features are scaled, split into training and test parts, fitted with a KNN classifier,
//! and the predictions scored.

use knn_index::distance::{Euclidean, Manhattan, Metric};
use knn_index::processing::{
    accuracy_score, confusion_matrix, f1_score, train_test_split, MinMaxScaler, RobustScaler,
    Scaler,
};
use knn_index::KNNClassifier;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Three noisy clusters, the second feature on a much larger scale than the first.
fn generate_clusters(rng: &mut StdRng, per_class: usize) -> (Vec<Vec<f64>>, Vec<&'static str>) {
    let centers = [
        ("setosa", [1.0, 100.0]),
        ("versicolor", [4.0, 300.0]),
        ("virginica", [6.0, 500.0]),
    ];

    let mut features = Vec::with_capacity(per_class * centers.len());
    let mut labels = Vec::with_capacity(per_class * centers.len());
    for (label, [x, y]) in centers {
        for _ in 0..per_class {
            features.push(vec![
                x + rng.gen_range(-1.5..1.5),
                y + rng.gen_range(-150.0..150.0),
            ]);
            labels.push(label);
        }
    }
    (features, labels)
}

fn main() {
    let mut rng = StdRng::seed_from_u64(42);
    let (features, labels) = generate_clusters(&mut rng, 100);

    let split = train_test_split(&features, &labels, 0.25, true, &mut rng).unwrap();
    println!(
        "{} training samples, {} test samples\n",
        split.x_train.len(),
        split.x_test.len()
    );

    println!("1. Unscaled features, Euclidean:");
    evaluate(&split.x_train, &split.y_train, &split.x_test, &split.y_test, Euclidean);

    println!("\n2. Min-max scaled features, Euclidean:");
    let mut scaler = MinMaxScaler::new();
    let x_train = scaler.fit_transform(&split.x_train).unwrap();
    let x_test = scaler.transform(&split.x_test).unwrap();
    evaluate(&x_train, &split.y_train, &x_test, &split.y_test, Euclidean);

    println!("\n3. Robust scaled features, Manhattan:");
    let mut scaler = RobustScaler::new();
    let x_train = scaler.fit_transform(&split.x_train).unwrap();
    let x_test = scaler.transform(&split.x_test).unwrap();
    evaluate(&x_train, &split.y_train, &x_test, &split.y_test, Manhattan);
}

fn evaluate<M: Metric<f64> + Clone>(
    x_train: &[Vec<f64>],
    y_train: &[&'static str],
    x_test: &[Vec<f64>],
    y_test: &[&'static str],
    metric: M,
) {
    let mut classifier = KNNClassifier::new(5, 8, metric);
    classifier.fit(x_train, y_train).unwrap();

    let predictions = classifier.predict(x_test).unwrap();
    println!("  accuracy: {:.3}", accuracy_score(&predictions, y_test).unwrap());
    println!("  macro F1: {:.3}", f1_score(&predictions, y_test, 0.0).unwrap());

    let cm = confusion_matrix(&predictions, y_test).unwrap();
    println!("  confusion matrix (rows are true labels):");
    for (label, row) in cm.labels().iter().zip(cm.matrix()) {
        println!("    {:<12} {:?}", label, row);
    }

    let proba = classifier.predict_proba(&x_test[..1]).unwrap();
    println!(
        "  probabilities of the first test sample over {:?}: {:?}",
        classifier.classes().unwrap_or_default(),
        proba[0]
    );
}
