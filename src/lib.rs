//! Array-Free Binary Heaps for Rust
//!
//! This crate provides a binary heap whose elements live in linked tree nodes
//! rather than in a contiguous array. The tree is nonetheless kept complete:
//! the position of each new element is derived from the element count with
//! the same row/column arithmetic an array-backed heap uses implicitly, and
//! reached by walking child links from the root.
//!
//! # Features
//!
//! - **Min-heap and max-heap** from one engine, selected by a [`Comparator`]
//!   either as a type parameter ([`MinHeap`], [`MaxHeap`]) or at construction
//!   time ([`DirectedHeap`])
//! - **Labelled records**: every element is a free-form label plus an
//!   orderable value, validated once at the boundary
//! - **Arbitrary deletion** and **replace-top** in O(log n) repair work
//! - **Merging**: a non-destructive deduplicating `merge`, an in-place
//!   `merge_from`, and a consuming `union`
//! - **Inspection**: a compact `{value:left|right}` rendering of the tree and
//!   self-checks for shape and heap order
//!
//! # Example
//!
//! ```rust
//! use tree_heaps::{Heap, MaxHeap};
//!
//! let mut heap: MaxHeap<u32> = MaxHeap::new();
//! heap.push(("The Matrix", 70)).unwrap();
//! heap.push(("Inception", 86)).unwrap();
//! heap.push(("Alien", 98)).unwrap();
//!
//! assert_eq!(heap.peek().map(|r| r.label), Some("Alien".to_string()));
//! assert_eq!(heap.replace(("Aliens", 99)).unwrap().map(|r| r.value), Some(98));
//! assert_eq!(heap.inspect(), "{99:{70:{}|{}}|{86:{}|{}}}");
//! ```

pub mod heap;
pub mod node;
pub mod order;
pub mod position;
pub mod record;
pub mod traits;

// Re-export the main types for convenience
pub use heap::{DirectedHeap, MaxHeap, MinHeap, TreeHeap};
pub use order::{Comparator, Direction, MaxOrder, MinOrder};
pub use record::{Entry, Record};
pub use traits::{Heap, HeapError};
