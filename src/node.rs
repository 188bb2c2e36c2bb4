//! Linked tree nodes
//!
//! A heap node holds one [`Record`] plus links to its parent and its two
//! children. Absence is represented by a sentinel rather than by optional
//! links: every relation accessor on [`NodeRef`] returns another `NodeRef`,
//! and the [`NodeRef::Empty`] variant answers every query about itself
//! (no children, no parent, no record, incomparable).
//!
//! **Memory Model**: Strong references flow from the root downward (left,
//! right). Weak references flow upward (parent) to avoid reference cycles, so
//! dropping the root frees the whole tree.
//!
//! Repair passes never relink nodes. They exchange the records held by two
//! nodes (`swap_contents`) and leave the tree shape untouched; only insertion
//! and `detach` change structure. These mutators are crate-private: handles
//! given out by a heap can be navigated and read, not restructured.

use crate::order::Comparator;
use crate::position::Step;
use crate::record::Record;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt::{self, Write};
use std::mem;
use std::rc::{Rc, Weak};

/// Type alias for node reference (strong reference)
type Link<V> = Rc<RefCell<TreeNode<V>>>;

/// Type alias for weak node reference (for parent links)
type WeakLink<V> = Weak<RefCell<TreeNode<V>>>;

/// Tree node contents
///
/// Only reachable through a [`NodeRef`].
pub struct TreeNode<V> {
    record: Record<V>,
    /// Weak back-reference; `Weak::new()` for the root or a detached node
    parent: WeakLink<V>,
    left: NodeRef<V>,
    right: NodeRef<V>,
}

/// Handle to a tree node, or the sentinel standing in for "no node"
pub enum NodeRef<V> {
    /// A live node
    Occupied(Link<V>),
    /// The sentinel: no state, no relations, never valid
    Empty,
}

impl<V> Clone for NodeRef<V> {
    fn clone(&self) -> Self {
        match self {
            NodeRef::Occupied(link) => NodeRef::Occupied(Rc::clone(link)),
            NodeRef::Empty => NodeRef::Empty,
        }
    }
}

impl<V> Default for NodeRef<V> {
    fn default() -> Self {
        NodeRef::Empty
    }
}

impl<V: fmt::Debug> fmt::Debug for NodeRef<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRef::Occupied(link) => {
                let node = link.borrow();
                f.debug_struct("TreeNode")
                    .field("label", &node.record.label)
                    .field("value", &node.record.value)
                    .field("has_parent", &(node.parent.strong_count() > 0))
                    .finish()
            }
            NodeRef::Empty => f.write_str("Empty"),
        }
    }
}

impl<V> NodeRef<V> {
    /// Creates a detached node
    pub fn new(label: impl Into<String>, value: V) -> Self {
        Self::from_record(Record::new(label, value))
    }

    /// Creates a detached node holding `record`
    pub fn from_record(record: Record<V>) -> Self {
        NodeRef::Occupied(Rc::new(RefCell::new(TreeNode {
            record,
            parent: Weak::new(),
            left: NodeRef::Empty,
            right: NodeRef::Empty,
        })))
    }

    /// Returns true for a live node, false for the sentinel
    pub fn is_valid(&self) -> bool {
        matches!(self, NodeRef::Occupied(_))
    }

    /// Returns true when both handles refer to the same live node
    ///
    /// The sentinel is never identical to anything, itself included.
    pub fn ptr_eq(&self, other: &NodeRef<V>) -> bool {
        match (self, other) {
            (NodeRef::Occupied(a), NodeRef::Occupied(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Left child, or the sentinel
    pub fn left(&self) -> NodeRef<V> {
        self.child(Step::Left)
    }

    /// Right child, or the sentinel
    pub fn right(&self) -> NodeRef<V> {
        self.child(Step::Right)
    }

    /// Child in the direction of `step`, or the sentinel
    pub fn child(&self, step: Step) -> NodeRef<V> {
        match self {
            NodeRef::Occupied(link) => {
                let node = link.borrow();
                match step {
                    Step::Left => node.left.clone(),
                    Step::Right => node.right.clone(),
                }
            }
            NodeRef::Empty => NodeRef::Empty,
        }
    }

    /// Parent, or the sentinel for a root or detached node
    pub fn parent(&self) -> NodeRef<V> {
        match self {
            NodeRef::Occupied(link) => link
                .borrow()
                .parent
                .upgrade()
                .map_or(NodeRef::Empty, NodeRef::Occupied),
            NodeRef::Empty => NodeRef::Empty,
        }
    }

    /// Returns true when this node has a parent or any child
    pub fn is_attached(&self) -> bool {
        match self {
            NodeRef::Occupied(link) => {
                let node = link.borrow();
                node.parent.strong_count() > 0 || node.left.is_valid() || node.right.is_valid()
            }
            NodeRef::Empty => false,
        }
    }

    /// Follows `path` from this node; the sentinel once the path runs off the tree
    pub fn walk(&self, path: &[Step]) -> NodeRef<V> {
        let mut current = self.clone();
        for step in path {
            if !current.is_valid() {
                break;
            }
            current = current.child(*step);
        }
        current
    }

    /// Applies `f` to this node's value; `None` for the sentinel
    pub fn with_value<R>(&self, f: impl FnOnce(&V) -> R) -> Option<R> {
        match self {
            NodeRef::Occupied(link) => Some(f(&link.borrow().record.value)),
            NodeRef::Empty => None,
        }
    }

    /// Attaches a detached node as this node's first free child
    ///
    /// Returns the side the child was placed on.
    ///
    /// # Panics
    ///
    /// Panics when called on the sentinel or when both child slots are
    /// already occupied. Either means the insertion coordinates were wrong,
    /// and continuing would break the complete-tree shape.
    pub(crate) fn attach_child(&self, child: NodeRef<V>) -> Step {
        let NodeRef::Occupied(link) = self else {
            panic!("cannot attach a child to the sentinel node");
        };
        if let NodeRef::Occupied(child_link) = &child {
            child_link.borrow_mut().parent = Rc::downgrade(link);
        }
        let mut node = link.borrow_mut();
        if !node.left.is_valid() {
            node.left = child;
            Step::Left
        } else if !node.right.is_valid() {
            node.right = child;
            Step::Right
        } else {
            panic!("insertion target already has two children");
        }
    }

    /// Exchanges the records held by two nodes without touching any link
    ///
    /// Swapping a node with itself or with the sentinel does nothing.
    pub(crate) fn swap_contents(&self, other: &NodeRef<V>) {
        if let (NodeRef::Occupied(a), NodeRef::Occupied(b)) = (self, other) {
            if !Rc::ptr_eq(a, b) {
                mem::swap(&mut a.borrow_mut().record, &mut b.borrow_mut().record);
            }
        }
    }

    /// Replaces this node's record, returning the previous one
    pub(crate) fn replace_record(&self, record: Record<V>) -> Option<Record<V>> {
        match self {
            NodeRef::Occupied(link) => Some(mem::replace(&mut link.borrow_mut().record, record)),
            NodeRef::Empty => None,
        }
    }

    /// Unlinks this node from its parent
    ///
    /// The parent's slot is reset to the sentinel. Children stay attached to
    /// this node.
    pub(crate) fn detach(&self) {
        let NodeRef::Occupied(link) = self else {
            return;
        };
        let parent = mem::take(&mut link.borrow_mut().parent);
        if let Some(parent) = parent.upgrade() {
            let mut parent = parent.borrow_mut();
            if parent.left.ptr_eq(self) {
                parent.left = NodeRef::Empty;
            } else if parent.right.ptr_eq(self) {
                parent.right = NodeRef::Empty;
            }
        }
    }

    /// Detaches every node of this subtree, children first
    pub(crate) fn clean(&self) {
        let NodeRef::Occupied(link) = self else {
            return;
        };
        let (left, right) = {
            let mut node = link.borrow_mut();
            (mem::take(&mut node.left), mem::take(&mut node.right))
        };
        left.clean();
        right.clean();
        self.detach();
    }

    /// Number of live nodes in this subtree
    pub fn count(&self) -> usize {
        match self {
            NodeRef::Occupied(_) => 1 + self.left().count() + self.right().count(),
            NodeRef::Empty => 0,
        }
    }
}

impl<V: Clone> NodeRef<V> {
    /// Copy of the record held by this node; `None` for the sentinel
    pub fn record(&self) -> Option<Record<V>> {
        match self {
            NodeRef::Occupied(link) => Some(link.borrow().record.clone()),
            NodeRef::Empty => None,
        }
    }

    /// Label held by this node; `None` for the sentinel
    pub fn label(&self) -> Option<String> {
        match self {
            NodeRef::Occupied(link) => Some(link.borrow().record.label.clone()),
            NodeRef::Empty => None,
        }
    }

    /// Value held by this node; `None` for the sentinel
    pub fn value(&self) -> Option<V> {
        self.with_value(V::clone)
    }

    /// Appends the records of this subtree in pre-order (node, left, right)
    ///
    /// The result follows tree layout, not value order.
    pub fn pre_order(&self, out: &mut Vec<Record<V>>) {
        if let NodeRef::Occupied(link) = self {
            let (left, right) = {
                let node = link.borrow();
                out.push(node.record.clone());
                (node.left.clone(), node.right.clone())
            };
            left.pre_order(out);
            right.pre_order(out);
        }
    }
}

impl<V: PartialEq> NodeRef<V> {
    /// Pre-order search for a node whose record equals `record`
    ///
    /// Heap order says nothing about where an equal record lives, so the
    /// whole subtree may be visited.
    pub fn find(&self, record: &Record<V>) -> Option<NodeRef<V>> {
        let NodeRef::Occupied(link) = self else {
            return None;
        };
        let (left, right) = {
            let node = link.borrow();
            if node.record == *record {
                return Some(self.clone());
            }
            (node.left.clone(), node.right.clone())
        };
        left.find(record).or_else(|| right.find(record))
    }
}

impl<V: PartialOrd> NodeRef<V> {
    /// Compares the values of two nodes
    ///
    /// Returns `None` whenever the sentinel is involved.
    pub fn compare(&self, other: &NodeRef<V>) -> Option<Ordering> {
        match (self, other) {
            (NodeRef::Occupied(a), NodeRef::Occupied(b)) => {
                let a = a.borrow();
                let b = b.borrow();
                a.record.value.partial_cmp(&b.record.value)
            }
            _ => None,
        }
    }

    /// Evaluates `predicate(self.value, other.value)`; false when either side
    /// is the sentinel
    pub(crate) fn test_values(&self, other: &NodeRef<V>, predicate: impl FnOnce(&V, &V) -> bool) -> bool {
        match (self, other) {
            (NodeRef::Occupied(a), NodeRef::Occupied(b)) => {
                let a = a.borrow();
                let b = b.borrow();
                predicate(&a.record.value, &b.record.value)
            }
            _ => false,
        }
    }

    /// Returns true when this node, as a parent, violates the heap property
    /// against `child` under `order`
    pub fn out_of_order<C: Comparator<V>>(&self, child: &NodeRef<V>, order: &C) -> bool {
        self.test_values(child, |parent, child| order.out_of_order(parent, child))
    }
}

impl<V: fmt::Display> NodeRef<V> {
    /// Renders the subtree as `{value:left|right}`, with `{}` for the sentinel
    pub fn inspect(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_inspect(&mut out);
        out
    }

    fn write_inspect<W: Write>(&self, out: &mut W) -> fmt::Result {
        match self {
            NodeRef::Occupied(link) => {
                let node = link.borrow();
                write!(out, "{{{}:", node.record.value)?;
                node.left.write_inspect(out)?;
                out.write_char('|')?;
                node.right.write_inspect(out)?;
                out.write_char('}')
            }
            NodeRef::Empty => out.write_str("{}"),
        }
    }
}
