//! Classification scores comparing predicted labels to true labels.

use std::collections::BTreeSet;

use crate::error::{KnnError, Result};

/// Counts of (true label, predicted label) pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix<L> {
    labels: Vec<L>,
    /// `matrix[t][p]` counts samples of true label `labels[t]` predicted as `labels[p]`.
    matrix: Vec<Vec<usize>>,
}

impl<L> ConfusionMatrix<L> {
    /// The sorted labels indexing both rows and columns.
    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    /// Rows are true labels, columns are predicted labels.
    pub fn matrix(&self) -> &[Vec<usize>] {
        &self.matrix
    }

    /// Samples of class `i` predicted as class `i`.
    pub fn true_positives(&self, i: usize) -> usize {
        self.matrix[i][i]
    }

    /// Samples of another class predicted as class `i`.
    pub fn false_positives(&self, i: usize) -> usize {
        self.matrix.iter().map(|row| row[i]).sum::<usize>() - self.matrix[i][i]
    }

    /// Samples of class `i` predicted as another class.
    pub fn false_negatives(&self, i: usize) -> usize {
        self.matrix[i].iter().sum::<usize>() - self.matrix[i][i]
    }

    fn f1(&self, i: usize) -> f64 {
        let tp = self.true_positives(i) as f64;
        let precision = tp / (tp + self.false_positives(i) as f64);
        let recall = tp / (tp + self.false_negatives(i) as f64);
        2.0 * precision * recall / (precision + recall)
    }
}

fn check_lengths<L>(y_pred: &[L], y_true: &[L]) -> Result<()> {
    if y_pred.is_empty() || y_true.is_empty() {
        return Err(KnnError::InvalidInput("Empty y_pred or y_true".to_string()));
    }
    if y_pred.len() != y_true.len() {
        return Err(KnnError::InvalidInput(format!(
            "y_pred and y_true must have the same length, got {} and {}.",
            y_pred.len(),
            y_true.len()
        )));
    }
    Ok(())
}

/// Build the confusion matrix over the sorted union of labels in both slices.
pub fn confusion_matrix<L: Ord + Clone>(y_pred: &[L], y_true: &[L]) -> Result<ConfusionMatrix<L>> {
    check_lengths(y_pred, y_true)?;

    let labels: Vec<L> = y_true
        .iter()
        .chain(y_pred)
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let position = |label: &L| labels.binary_search(label).unwrap_or_else(|i| i);

    let mut matrix = vec![vec![0; labels.len()]; labels.len()];
    for (t, p) in y_true.iter().zip(y_pred) {
        matrix[position(t)][position(p)] += 1;
    }

    Ok(ConfusionMatrix { labels, matrix })
}

/// The fraction of positions where the prediction equals the true label.
pub fn accuracy_score<L: PartialEq>(y_pred: &[L], y_true: &[L]) -> Result<f64> {
    check_lengths(y_pred, y_true)?;
    let correct = y_pred.iter().zip(y_true).filter(|(p, t)| p == t).count();
    Ok(correct as f64 / y_true.len() as f64)
}

/// F1 score.
///
/// With two labels this is the F1 of the larger (positive) label. With more, it is the
/// unweighted mean of every label's F1. Returns `zero_division` when a score would need a label
/// without true positives, including when only one label occurs at all.
pub fn f1_score<L: Ord + Clone>(y_pred: &[L], y_true: &[L], zero_division: f64) -> Result<f64> {
    let cm = confusion_matrix(y_pred, y_true)?;
    let n = cm.labels.len();

    match n {
        1 => Ok(zero_division),
        2 => {
            if cm.true_positives(1) == 0 {
                return Ok(zero_division);
            }
            Ok(cm.f1(1))
        }
        _ => {
            if (0..n).any(|i| cm.true_positives(i) == 0) {
                return Ok(zero_division);
            }
            Ok((0..n).map(|i| cm.f1(i)).sum::<f64>() / n as f64)
        }
    }
}
