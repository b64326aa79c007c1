#![doc = include_str!("../README.md")]

pub mod classifier;
pub mod distance;
mod error;
pub mod heap;
pub mod kdtree;
pub mod processing;
mod r#type;
mod util;

pub use classifier::KNNClassifier;
pub use error::{KnnError, Result};
pub use r#type::Coordinate;

#[cfg(test)]
pub(crate) mod test;
