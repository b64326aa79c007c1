use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KnnError {
    /// Malformed point data: empty, ragged, non-finite, duplicated, or of the wrong dimension.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A parameter outside of its allowed range, such as `k == 0` or `leaf_size == 0`.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A model or scaler was used before being fitted.
    #[error("Model unfitted")]
    ModelUnfitted,
}

pub type Result<T> = std::result::Result<T, KnnError>;
