//! A fixed-capacity heap that keeps the `k` closest candidates seen so far.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use num_traits::Float;

use crate::error::{KnnError, Result};

/// One slot of a [`BoundedHeap`].
///
/// Slots with `item == None` are sentinels: placeholders at infinite distance that the heap
/// starts with, so that the worst kept distance is always defined.
#[derive(Debug, Clone)]
pub struct HeapEntry<N, T> {
    /// Distance of the candidate to the query.
    pub distance: N,
    /// Insertion stamp, only used to order candidates at equal distance.
    pub id: u64,
    /// The candidate, or `None` for a sentinel.
    pub item: Option<T>,
}

impl<N: Float, T> PartialEq for HeapEntry<N, T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<N: Float, T> Eq for HeapEntry<N, T> {}

impl<N: Float, T> Ord for HeapEntry<N, T> {
    /// Greater means worse: a sentinel, then farther away, then at equal distance, inserted
    /// earlier.
    fn cmp(&self, other: &Self) -> Ordering {
        self.item
            .is_none()
            .cmp(&other.item.is_none())
            .then_with(|| compare_distance(self.distance, other.distance))
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Total order on distances with NaN above every number.
fn compare_distance<N: Float>(a: N, b: N) -> Ordering {
    a.partial_cmp(&b)
        .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

impl<N: Float, T> PartialOrd for HeapEntry<N, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Keeps the `k` smallest-distance candidates pushed into it.
///
/// The heap is created full of `k` sentinels at infinite distance. While a sentinel remains, every
/// push replaces one, whatever its distance. Once `k` real candidates are kept, a push is
/// accepted only when it is strictly closer than the current worst entry, which it then
/// replaces.
///
/// ```
/// use knn_index::heap::BoundedHeap;
///
/// let mut heap = BoundedHeap::new(2).unwrap();
/// assert_eq!(heap.get_max(), f64::INFINITY);
/// heap.push(3.0, "c");
/// heap.push(1.0, "a");
/// heap.push(2.0, "b");
/// assert_eq!(heap.get_max(), 2.0);
/// assert_eq!(heap.into_sorted_vec(), vec![(1.0, "a"), (2.0, "b")]);
/// ```
#[derive(Debug, Clone)]
pub struct BoundedHeap<N: Float, T> {
    heap: BinaryHeap<HeapEntry<N, T>>,
    capacity: usize,
    num_items: usize,
    next_id: u64,
}

impl<N: Float, T> BoundedHeap<N, T> {
    /// Create a heap keeping at most `capacity` candidates.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(KnnError::InvalidArgument(
                "Number of neighbors must be positive".to_string(),
            ));
        }

        let mut heap = BinaryHeap::with_capacity(capacity);
        for id in 0..capacity as u64 {
            heap.push(HeapEntry {
                distance: N::infinity(),
                id,
                item: None,
            });
        }

        Ok(Self {
            heap,
            capacity,
            num_items: 0,
            next_id: capacity as u64,
        })
    }

    /// Offer a candidate. Returns `true` if it was kept.
    ///
    /// Every push consumes an insertion stamp, whether or not it is kept.
    pub fn push(&mut self, distance: N, item: T) -> bool {
        let id = self.next_id;
        self.next_id += 1;

        if self.num_items == self.capacity
            && compare_distance(distance, self.get_max()) != Ordering::Less
        {
            return false;
        }

        if let Some(mut worst) = self.heap.peek_mut() {
            if worst.item.is_none() {
                self.num_items += 1;
            }
            *worst = HeapEntry {
                distance,
                id,
                item: Some(item),
            };
            true
        } else {
            false
        }
    }

    /// The worst (largest) kept distance, or infinity while fewer than `capacity` candidates
    /// have been kept.
    #[inline]
    pub fn get_max(&self) -> N {
        self.heap
            .peek()
            .map(|entry| entry.distance)
            .unwrap_or_else(N::infinity)
    }

    /// All kept slots in arbitrary order, sentinels included.
    pub fn get_all_elements(&self) -> impl Iterator<Item = &HeapEntry<N, T>> {
        self.heap.iter()
    }

    /// The number of real (non-sentinel) candidates kept.
    pub fn len(&self) -> usize {
        self.num_items
    }

    /// Returns `true` if no real candidate has been kept yet.
    pub fn is_empty(&self) -> bool {
        self.num_items == 0
    }

    /// The maximum number of candidates this heap keeps.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Consume the heap, returning the real candidates by ascending distance, ties in insertion
    /// order.
    pub fn into_sorted_vec(self) -> Vec<(N, T)> {
        let mut entries: Vec<HeapEntry<N, T>> = self
            .heap
            .into_vec()
            .into_iter()
            .filter(|entry| entry.item.is_some())
            .collect();
        entries.sort_by(|a, b| {
            compare_distance(a.distance, b.distance).then_with(|| a.id.cmp(&b.id))
        });
        entries
            .into_iter()
            .filter_map(|entry| entry.item.map(|item| (entry.distance, item)))
            .collect()
    }
}
