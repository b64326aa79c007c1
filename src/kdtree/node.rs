//! The node structure of a [`KDTree`][crate::kdtree::KDTree], exposed for manual traversal.

/// A point stored in the tree, along with its insertion index.
#[derive(Debug, Clone, PartialEq)]
pub struct Item<N> {
    pub(crate) index: usize,
    pub(crate) coords: Box<[N]>,
}

impl<N> Item<N> {
    /// The position of this point in the data the tree was built from.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The coordinates of this point.
    #[inline]
    pub fn coords(&self) -> &[N] {
        &self.coords
    }
}

/// A node of the tree: either a bucket of points or a split.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<N> {
    /// A terminal bucket of points.
    Leaf(Leaf<N>),
    /// A split around a pivot point.
    Internal(Internal<N>),
}

/// A terminal node holding fewer than `2 * leaf_size + 1` points.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf<N> {
    pub(crate) items: Vec<Item<N>>,
}

impl<N> Leaf<N> {
    /// The points in this bucket.
    pub fn items(&self) -> &[Item<N>] {
        &self.items
    }
}

/// An internal node in the KDTree.
#[derive(Debug, Clone, PartialEq)]
pub struct Internal<N> {
    /// The median point along `axis`, itself a candidate during search.
    pub(crate) key: Item<N>,

    /// The coordinate index the children of this node are split over.
    pub(crate) axis: usize,

    pub(crate) left: Box<Node<N>>,
    pub(crate) right: Box<Node<N>>,
}

impl<N> Internal<N> {
    /// The pivot point of this split.
    pub fn key(&self) -> &Item<N> {
        &self.key
    }

    /// The coordinate index this node splits on.
    pub fn axis(&self) -> usize {
        self.axis
    }

    /// The child holding points at or below the pivot along [`axis`][Self::axis].
    ///
    /// Note that this **does not include** the pivot itself.
    pub fn left_child(&self) -> &Node<N> {
        &self.left
    }

    /// The child holding points at or above the pivot along [`axis`][Self::axis].
    ///
    /// Note that this **does not include** the pivot itself.
    pub fn right_child(&self) -> &Node<N> {
        &self.right
    }
}

impl<N> Node<N> {
    /// Returns `true` if this is a leaf node without children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Returns `true` if this is an intermediate node with children.
    #[inline]
    pub fn is_parent(&self) -> bool {
        !self.is_leaf()
    }

    /// The number of points stored in this subtree, pivots included.
    pub fn num_items(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.items.len(),
            Node::Internal(internal) => {
                1 + internal.left.num_items() + internal.right.num_items()
            }
        }
    }

    /// The number of levels of this subtree. A single leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Internal(internal) => {
                1 + internal.left.depth().max(internal.right.depth())
            }
        }
    }
}
