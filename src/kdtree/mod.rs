//! An immutable k-d tree answering exact k-nearest-neighbor queries under a caller-supplied
//! metric.

#![warn(missing_docs)]

mod builder;
mod index;
mod node;

pub use builder::{KDTreeBuilder, DEFAULT_LEAF_SIZE};
pub use index::{KDTree, Neighbor};
pub use node::{Internal, Item, Leaf, Node};
