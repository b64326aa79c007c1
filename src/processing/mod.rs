//! Helpers used around the classifier: evaluation metrics, feature scaling and train/test
//! splitting.

pub mod metrics;
pub mod scalers;
pub mod split;

pub use metrics::{accuracy_score, confusion_matrix, f1_score, ConfusionMatrix};
pub use scalers::{MinMaxScaler, RobustScaler, Scaler};
pub use split::{train_test_split, TrainTestSplit};
