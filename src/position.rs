//! Coordinate arithmetic for array-free complete trees
//!
//! A complete binary tree numbered top-to-bottom, left-to-right from 1 has the
//! same shape as an array-backed binary heap. Given a slot number, this module
//! computes the row and column that slot occupies and derives the sequence of
//! left/right turns leading to it from the root, so a linked tree can be kept
//! complete without ever storing an index.
//!
//! ```text
//!  Row  Capacity  Tree capacity
//!    0      1         1                      1
//!                                       /        \
//!    1      2         3               2            3
//!                                   /   \        /   \
//!    2      4         7            4     5      6     7
//!                                 / \   / \    / \   / \
//!    3      8        15          8   9 10 11  12 13 14 15
//! ```
//!
//! For slot n:
//!
//! - `row = floor(log2(n))`
//! - `row_capacity = 2^row`
//! - `tree_capacity = 2^(row + 1) - 1`
//! - `column = row_capacity - (tree_capacity - n)`, 1-based within the row
//!
//! Walking from the target row back towards the root, an even column means
//! the slot is a right child and an odd column a left child; the parent's
//! column is the current one halved and rounded up.

use smallvec::SmallVec;

/// One turn on the way down from the root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Descend into the left child
    Left,
    /// Descend into the right child
    Right,
}

/// Root-first sequence of turns. A tree with `usize` slots is at most 63
/// levels deep; the inline capacity covers trees of up to 2^16 nodes.
pub type Path = SmallVec<[Step; 16]>;

/// Row/column coordinates of a slot in a complete binary tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPosition {
    /// 1-based slot number the coordinates were computed for
    pub slot: usize,
    /// Depth of the slot; the root is row 0
    pub row: u32,
    /// 1-based position within the row
    pub column: usize,
    /// Number of slots in this row
    pub row_capacity: usize,
    /// Number of slots in a full tree down to and including this row
    pub tree_capacity: usize,
}

impl SlotPosition {
    /// Computes the coordinates of `slot`
    ///
    /// Slot numbers below 1 are treated as the root.
    pub fn of(slot: usize) -> Self {
        let slot = slot.max(1);
        let row = slot.ilog2();
        let row_capacity = 1usize << row;
        // Written as a sum so the deepest representable row does not overflow.
        let tree_capacity = row_capacity + (row_capacity - 1);
        let column = row_capacity - (tree_capacity - slot);
        Self {
            slot,
            row,
            column,
            row_capacity,
            tree_capacity,
        }
    }

    /// Returns true for the root slot
    pub fn is_root(&self) -> bool {
        self.row == 0
    }

    /// Root-first turns leading to this slot
    pub fn path(&self) -> Path {
        let mut path = Path::new();
        let mut column = self.column;
        for _ in 0..self.row {
            path.push(if column % 2 == 0 { Step::Right } else { Step::Left });
            column = (column + 1) / 2;
        }
        path.reverse();
        path
    }
}

/// Root-first path to `slot` itself; empty for the root
pub fn slot_path(slot: usize) -> Path {
    SlotPosition::of(slot).path()
}

/// Root-first path to the parent of `slot`
///
/// A new node for `slot` is attached as a child of the node this path leads
/// to. For the root slot there is no parent and the path is empty; callers
/// handle that case themselves.
pub fn insertion_path(slot: usize) -> Path {
    let mut path = slot_path(slot);
    path.pop();
    path
}
