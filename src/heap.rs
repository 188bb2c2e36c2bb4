//! Array-free binary heap
//!
//! [`TreeHeap`] is a binary heap whose elements live in linked tree nodes
//! instead of a vector. The tree is kept *complete* (every row full except the
//! last, which fills left to right) by computing, for the n-th element, the
//! slot an array-backed heap would have used and walking there from the root
//! through child links (see [`position`](crate::position)).
//!
//! # Time Complexity
//!
//! | Operation      | Complexity |
//! |----------------|------------|
//! | `push`         | O(log n)   |
//! | `pop`          | O(log n)   |
//! | `peek`         | O(1)       |
//! | `replace`      | O(log n)   |
//! | `delete`       | O(n)       |
//! | `merge`        | O(n log n) |
//! | `merge_from`   | O(m log n) |
//! | `union`        | O(n log n) |
//!
//! `delete` and `find` scan the tree because heap order says nothing about
//! where a given record lives.
//!
//! # Algorithm Overview
//!
//! **Insert**: attach the new node under the parent of slot `len + 1`, then
//! sift up. Sift-up exchanges records, never links: the node objects stay
//! where they are and the record travels towards the root.
//!
//! **Remove**: move the record of the last slot into the node being removed,
//! detach the last node, find the new last node by walking to slot `len`, then
//! sift the moved record down (and, for an arbitrary node, up).
//!
//! **Sibling order**: at each level a repair pass visits, two siblings are
//! exchanged when the left one holds the naturally larger value, provided
//! neither record would then sit above a child it must not precede.
//!
//! # Example
//!
//! ```rust
//! use tree_heaps::Heap;
//! use tree_heaps::heap::MinHeap;
//!
//! let mut heap: MinHeap<i32> = [("c", 3), ("a", 1), ("b", 2)].into_iter().collect();
//! assert_eq!(heap.inspect(), "{1:{2:{}|{}}|{3:{}|{}}}");
//! assert_eq!(heap.pop().map(|r| r.value), Some(1));
//! assert_eq!(heap.pop().map(|r| r.value), Some(2));
//! assert_eq!(heap.pop().map(|r| r.value), Some(3));
//! assert_eq!(heap.pop(), None);
//! ```

use crate::node::NodeRef;
use crate::order::{siblings_reversed, Comparator, Direction, MaxOrder, MinOrder};
use crate::position::{insertion_path, slot_path, SlotPosition};
use crate::record::{Entry, Record};
use crate::traits::{Heap, HeapError};
use log::{debug, trace};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::fmt;
use std::hash::Hash;

/// Binary heap built from linked tree nodes
///
/// The ordering policy `C` decides which record sits at the root; see
/// [`MinHeap`], [`MaxHeap`] and [`DirectedHeap`].
pub struct TreeHeap<V, C = MinOrder> {
    /// Root node, or the sentinel when the heap is empty
    root: NodeRef<V>,
    /// Node occupying slot `len`: the source of the replacement record on removal
    last: NodeRef<V>,
    /// Number of nodes reachable from `root`
    len: usize,
    order: C,
}

/// Heap with the smallest value at the root
pub type MinHeap<V> = TreeHeap<V, MinOrder>;

/// Heap with the largest value at the root
pub type MaxHeap<V> = TreeHeap<V, MaxOrder>;

/// Heap whose direction is chosen at construction time
pub type DirectedHeap<V> = TreeHeap<V, Direction>;

impl<V: PartialOrd + Clone, C: Comparator<V>> Heap<V> for TreeHeap<V, C> {
    type Order = C;

    fn new() -> Self {
        Self::with_order(C::default())
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn len(&self) -> usize {
        self.len
    }

    fn order(&self) -> &C {
        &self.order
    }

    fn push<E: Into<Entry<V>>>(&mut self, entry: E) -> Result<(), HeapError> {
        let node = entry.into().into_node()?;
        self.push_node(node);
        Ok(())
    }

    fn peek(&self) -> Option<Record<V>> {
        self.root.record()
    }

    fn pop(&mut self) -> Option<Record<V>> {
        let root = self.root.clone();
        if root.is_valid() {
            debug!("removing root of heap with {} nodes", self.len);
        }
        self.remove_node(&root)
    }

    fn merge_from(&mut self, other: &Self) -> Result<(), HeapError> {
        self.ensure_compatible(other)?;
        for record in other.to_vec() {
            self.push_node(NodeRef::from_record(record));
        }
        Ok(())
    }
}

impl<V: PartialOrd + Clone, C: Comparator<V>> TreeHeap<V, C> {
    /// Creates an empty heap ordered by `order`
    pub fn with_order(order: C) -> Self {
        Self {
            root: NodeRef::Empty,
            last: NodeRef::Empty,
            len: 0,
            order,
        }
    }

    /// Builds a heap from entries, pushing them in order
    ///
    /// Entries that fail validation are skipped.
    pub fn from_entries<I, E>(entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Entry<V>>,
    {
        Self::from_entries_with_order(C::default(), entries)
    }

    /// Same as [`from_entries`](Self::from_entries)
    pub fn heapify<I, E>(entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Entry<V>>,
    {
        Self::from_entries(entries)
    }

    /// Builds a heap ordered by `order` from entries, pushing them in order
    ///
    /// Entries that fail validation are skipped.
    pub fn from_entries_with_order<I, E>(order: C, entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Entry<V>>,
    {
        let mut heap = Self::with_order(order);
        heap.extend(entries);
        heap
    }

    /// Root node handle, or the sentinel when empty
    pub fn root(&self) -> &NodeRef<V> {
        &self.root
    }

    /// Handle to the node occupying the last slot, or the sentinel when empty
    pub fn last_node(&self) -> &NodeRef<V> {
        &self.last
    }

    /// Removes the top record and puts `entry` in its place
    ///
    /// Returns the previous top record. On an empty heap the entry is simply
    /// pushed and `Ok(None)` is returned.
    pub fn replace<E: Into<Entry<V>>>(&mut self, entry: E) -> Result<Option<Record<V>>, HeapError> {
        let replacement = entry.into().into_record()?;
        if !self.root.is_valid() {
            self.push_node(NodeRef::from_record(replacement));
            return Ok(None);
        }

        debug!("replacing root of heap with {} nodes", self.len);
        let previous = self.root.replace_record(replacement);
        self.sift_down(self.root.clone());
        Ok(previous)
    }

    /// Removes the node whose record equals `entry` and returns its record
    pub fn delete<E: Into<Entry<V>>>(&mut self, entry: E) -> Result<Record<V>, HeapError> {
        let record = entry.into().into_record()?;
        let node = self.root.find(&record).ok_or(HeapError::NotFound)?;
        debug!("deleting node from heap with {} nodes", self.len);
        self.remove_node(&node).ok_or(HeapError::NotFound)
    }

    /// Returns the stored record equal to `entry`, if any
    ///
    /// Invalid entries are never found.
    pub fn find<E: Into<Entry<V>>>(&self, entry: E) -> Option<Record<V>> {
        self.find_node(entry).and_then(|node| node.record())
    }

    /// Returns the node holding a record equal to `entry`, if any
    pub fn find_node<E: Into<Entry<V>>>(&self, entry: E) -> Option<NodeRef<V>> {
        let record = entry.into().into_record().ok()?;
        self.root.find(&record)
    }

    /// Returns true when a record equal to `entry` is stored in the heap
    pub fn contains<E: Into<Entry<V>>>(&self, entry: E) -> bool {
        self.find_node(entry).is_some()
    }

    /// Records in pre-order (node, left subtree, right subtree)
    ///
    /// Only the first element is guaranteed to be the top record; the rest
    /// follow the tree layout, not value order.
    pub fn to_vec(&self) -> Vec<Record<V>> {
        let mut out = Vec::with_capacity(self.len);
        self.root.pre_order(&mut out);
        out
    }

    /// Detaches every node and leaves the heap empty
    pub fn clear(&mut self) {
        self.root.clean();
        self.root = NodeRef::Empty;
        self.last = NodeRef::Empty;
        self.len = 0;
    }

    /// Checks that the tree is complete and consistent with `len`
    ///
    /// Verifies that node numbering is contiguous from 1 to `len`, that every
    /// child links back to its parent, and that the tracked last node sits in
    /// slot `len`.
    pub fn verify_shape(&self) -> bool {
        let mut queue = VecDeque::new();
        let mut count = 0usize;
        let mut highest_slot = 0usize;
        if self.root.is_valid() {
            if self.root.parent().is_valid() {
                return false;
            }
            queue.push_back((self.root.clone(), 1usize));
        }

        while let Some((node, slot)) = queue.pop_front() {
            count += 1;
            highest_slot = highest_slot.max(slot);
            for (child, child_slot) in [(node.left(), 2 * slot), (node.right(), 2 * slot + 1)] {
                if child.is_valid() {
                    if !child.parent().ptr_eq(&node) {
                        return false;
                    }
                    queue.push_back((child, child_slot));
                }
            }
        }

        if count != self.len || highest_slot != count {
            return false;
        }
        if self.len == 0 {
            return !self.last.is_valid();
        }
        self.root.walk(&slot_path(self.len)).ptr_eq(&self.last)
    }

    /// Checks that no parent is out of order against either of its children
    pub fn verify_heap_property(&self) -> bool {
        let mut stack = vec![self.root.clone()];
        while let Some(node) = stack.pop() {
            for child in [node.left(), node.right()] {
                if child.is_valid() {
                    if node.out_of_order(&child, &self.order) {
                        return false;
                    }
                    stack.push(child);
                }
            }
        }
        true
    }

    fn ensure_compatible(&self, other: &Self) -> Result<(), HeapError> {
        if self.order.is_compatible(&other.order) {
            Ok(())
        } else {
            Err(HeapError::OrderMismatch)
        }
    }

    fn push_node(&mut self, node: NodeRef<V>) {
        if !self.root.is_valid() {
            trace!("inserting root");
            self.root = node.clone();
            self.last = node;
            self.len = 1;
            return;
        }

        self.len += 1;
        let position = SlotPosition::of(self.len);
        trace!(
            "inserting slot {} at row {} column {} (row capacity {}, tree capacity {})",
            position.slot,
            position.row,
            position.column,
            position.row_capacity,
            position.tree_capacity
        );

        let parent = self.root.walk(&insertion_path(self.len));
        assert!(
            parent.is_valid(),
            "no parent node on the path to slot {}",
            self.len
        );
        let side = parent.attach_child(node.clone());
        debug_assert_eq!(
            slot_path(self.len).last(),
            Some(&side),
            "slot {} attached on the wrong side",
            self.len
        );

        self.last = node.clone();
        self.sift_up(node);
    }

    /// Removes `target` from the tree, returning the record it held
    fn remove_node(&mut self, target: &NodeRef<V>) -> Option<Record<V>> {
        let removed = target.record()?;

        if target.ptr_eq(&self.last) {
            self.detach_last();
            return Some(removed);
        }

        target.swap_contents(&self.last);
        self.detach_last();

        let settled = self.sift_down(target.clone());
        if settled.ptr_eq(target) {
            // Nothing moved down, so the record from the last slot may belong
            // higher up (only possible when target is not the root).
            self.sift_up(target.clone());
        }
        Some(removed)
    }

    /// Unlinks the node in slot `len` and locates the new last node
    fn detach_last(&mut self) {
        let last = std::mem::take(&mut self.last);
        last.detach();
        self.len -= 1;

        if self.len == 0 {
            self.root = NodeRef::Empty;
            return;
        }
        self.last = self.root.walk(&slot_path(self.len));
        assert!(
            self.last.is_valid(),
            "slot {} is missing after removal",
            self.len
        );
    }

    /// Moves the record held by `node` towards the root until its parent
    /// precedes it, returning the node where the record came to rest
    fn sift_up(&self, node: NodeRef<V>) -> NodeRef<V> {
        let mut current = self.order_with_sibling(node);
        loop {
            let parent = current.parent();
            if !parent.out_of_order(&current, &self.order) {
                return current;
            }
            parent.swap_contents(&current);
            current = self.order_with_sibling(parent);
        }
    }

    /// Moves the record held by `node` away from the root until it precedes
    /// both children, returning the node where the record came to rest
    fn sift_down(&self, node: NodeRef<V>) -> NodeRef<V> {
        let mut current = node;
        loop {
            let right = current.right();
            if right.is_valid() {
                self.order_with_sibling(right);
            }

            let Some(child) = self.preferred_child(&current) else {
                return current;
            };
            if !current.out_of_order(&child, &self.order) {
                return current;
            }
            current.swap_contents(&child);
            current = child;
        }
    }

    /// The child that must sit above its sibling, preferring the left on ties
    fn preferred_child(&self, node: &NodeRef<V>) -> Option<NodeRef<V>> {
        let left = node.left();
        let right = node.right();
        match (left.is_valid(), right.is_valid()) {
            (false, false) => None,
            (true, false) => Some(left),
            (false, true) => Some(right),
            (true, true) => {
                if left.out_of_order(&right, &self.order) {
                    Some(right)
                } else {
                    Some(left)
                }
            }
        }
    }

    /// Exchanges a right child with its left sibling when the two are in
    /// reverse natural order and the exchange keeps the heap property
    ///
    /// Returns the node now holding the record `node` held.
    fn order_with_sibling(&self, node: NodeRef<V>) -> NodeRef<V> {
        // Guarded: sibling order is natural order, so an unconditional swap
        // can lift a record above a child it must not precede (max order).
        let parent = node.parent();
        let left = parent.left();
        if !left.is_valid() || left.ptr_eq(&node) || !parent.right().ptr_eq(&node) {
            return node;
        }

        if left.test_values(&node, siblings_reversed)
            && self.fits_under(&left, &node)
            && self.fits_under(&node, &left)
        {
            left.swap_contents(&node);
            return left;
        }
        node
    }

    /// Returns true when the record of `holder` could sit at `slot` without
    /// being out of order against the children of `slot`
    fn fits_under(&self, holder: &NodeRef<V>, slot: &NodeRef<V>) -> bool {
        [slot.left(), slot.right()]
            .iter()
            .all(|child| !holder.out_of_order(child, &self.order))
    }
}

impl<V, C> TreeHeap<V, C>
where
    V: PartialOrd + Clone + Hash + Eq,
    C: Comparator<V>,
{
    /// Returns a new heap holding the records of both heaps, without duplicates
    ///
    /// Duplicates are full-record matches (label and value). Neither operand
    /// is modified.
    pub fn merge(&self, other: &Self) -> Result<Self, HeapError> {
        self.ensure_compatible(other)?;
        let combined = Self::distinct(self.to_vec().into_iter().chain(other.to_vec()));
        Ok(Self::from_entries_with_order(self.order.clone(), combined))
    }

    /// Pushes every record of `other` into this heap and returns it
    ///
    /// Same as [`Heap::merge_from`], chainable. `other` is left intact and no
    /// deduplication takes place.
    pub fn merge_into(&mut self, other: &Self) -> Result<&mut Self, HeapError> {
        self.merge_from(other)?;
        Ok(self)
    }

    /// Empties both heaps into a new one holding their distinct records
    pub fn union(&mut self, other: &mut Self) -> Result<Self, HeapError> {
        self.ensure_compatible(other)?;
        let combined = Self::distinct(self.to_vec().into_iter().chain(other.to_vec()));
        other.clear();
        self.clear();
        Ok(Self::from_entries_with_order(self.order.clone(), combined))
    }

    fn distinct(records: impl Iterator<Item = Record<V>>) -> Vec<Record<V>> {
        let mut seen = FxHashSet::default();
        records.filter(|record| seen.insert(record.clone())).collect()
    }
}

impl<V: PartialOrd + Clone + fmt::Debug, C: Comparator<V>> TreeHeap<V, C> {
    /// Logs every record in pre-order at debug level and returns them
    pub fn display(&self) -> Vec<Record<V>> {
        let records = self.to_vec();
        for record in &records {
            debug!("{:?}", record);
        }
        records
    }
}

impl<V: fmt::Display, C> TreeHeap<V, C> {
    /// Renders the tree as nested `{value:left|right}` groups, `{}` for no node
    pub fn inspect(&self) -> String {
        self.root.inspect()
    }
}

impl<V: fmt::Display, C> fmt::Display for TreeHeap<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect())
    }
}

impl<V, C: fmt::Debug> fmt::Debug for TreeHeap<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeHeap")
            .field("len", &self.len)
            .field("order", &self.order)
            .finish()
    }
}

impl<V: PartialOrd + Clone, C: Comparator<V>> Default for TreeHeap<V, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, C, E> Extend<E> for TreeHeap<V, C>
where
    V: PartialOrd + Clone,
    C: Comparator<V>,
    E: Into<Entry<V>>,
{
    fn extend<I: IntoIterator<Item = E>>(&mut self, entries: I) {
        for entry in entries {
            if let Err(err) = self.push(entry) {
                debug!("skipping entry: {}", err);
            }
        }
    }
}

impl<V, C, E> FromIterator<E> for TreeHeap<V, C>
where
    V: PartialOrd + Clone,
    C: Comparator<V>,
    E: Into<Entry<V>>,
{
    fn from_iter<I: IntoIterator<Item = E>>(entries: I) -> Self {
        Self::from_entries(entries)
    }
}
