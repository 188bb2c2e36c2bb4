//! Common traits for the tree-backed heaps
//!
//! This module provides the error type shared by every heap operation and the
//! [`Heap`] trait implemented by each ordering variant of
//! [`TreeHeap`](crate::heap::TreeHeap).
//!
//! The trait covers the operations every priority queue has (`push`, `peek`,
//! `pop`, `merge_from`). Operations specific to the linked-tree layout, such
//! as `replace`, `delete`, or the deduplicating `merge`, live on the concrete
//! type.

use crate::order::Comparator;
use crate::record::{Entry, Record};
use thiserror::Error;

/// Error type for heap operations
///
/// Expected absence (popping an empty heap, looking up a missing record) is
/// reported through `Option`. These errors cover input the heap refuses to
/// act on. Broken internal invariants are not represented here: they panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    /// The entry could not be turned into a heap record (unorderable value,
    /// sentinel handle, or unparseable text)
    #[error("entry is not a valid heap record")]
    InvalidInput,
    /// No node in the heap matches the requested record
    #[error("record not found in heap")]
    NotFound,
    /// The two heaps order their elements differently
    #[error("heaps use incompatible orderings")]
    OrderMismatch,
}

/// Base trait for heap/priority queue data structures
///
/// Elements are [`Record`]s: a label plus an orderable value. Which record is
/// on top depends on the heap's [`Comparator`]: the smallest value for a
/// min-heap, the largest for a max-heap.
///
/// # Example
///
/// ```rust
/// use tree_heaps::Heap;
/// use tree_heaps::heap::MinHeap;
///
/// let mut heap: MinHeap<i32> = MinHeap::new();
/// heap.push(("three", 3)).unwrap();
/// heap.push(("one", 1)).unwrap();
/// heap.push(("two", 2)).unwrap();
///
/// assert_eq!(heap.peek().map(|r| r.value), Some(1));
/// assert_eq!(heap.pop().map(|r| r.label), Some("one".to_string()));
/// ```
pub trait Heap<V> {
    /// Ordering policy used by this heap
    type Order: Comparator<V>;

    /// Creates a new empty heap
    fn new() -> Self;

    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool;

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Returns the ordering policy of this heap
    fn order(&self) -> &Self::Order;

    /// Inserts an entry
    ///
    /// Malformed entries are rejected with [`HeapError::InvalidInput`] and
    /// leave the heap untouched.
    ///
    /// # Time Complexity
    /// O(log n)
    fn push<E: Into<Entry<V>>>(&mut self, entry: E) -> Result<(), HeapError>;

    /// Returns a copy of the top record without removing it
    ///
    /// # Time Complexity
    /// O(1)
    fn peek(&self) -> Option<Record<V>>;

    /// Removes and returns the top record
    ///
    /// # Time Complexity
    /// O(log n)
    fn pop(&mut self) -> Option<Record<V>>;

    /// Pushes every record of `other` into this heap, leaving `other` intact
    ///
    /// No deduplication takes place: the resulting length is the sum of both
    /// lengths.
    ///
    /// # Time Complexity
    /// O(m log(n + m)) where m is the size of `other`
    fn merge_from(&mut self, other: &Self) -> Result<(), HeapError>;
}
