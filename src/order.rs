//! Ordering policies
//!
//! The same tree machinery implements both a min-heap and a max-heap; the only
//! difference is which of two values belongs closer to the root. That decision
//! is delegated to a [`Comparator`], chosen either at compile time
//! ([`MinOrder`], [`MaxOrder`]) or when the heap is constructed
//! ([`Direction`]).

use std::fmt;

/// A two-argument ordering predicate shared by the heap engine and its nodes
///
/// Implementations decide which value has priority. They must be consistent:
/// `precedes(a, b)` and `precedes(b, a)` are never both true.
pub trait Comparator<V: ?Sized>: Clone + Default + fmt::Debug {
    /// Returns true when `a` belongs strictly above `b`
    fn precedes(&self, a: &V, b: &V) -> bool;

    /// Returns true when a parent holding `parent` violates the heap property
    /// against a child holding `child`
    fn out_of_order(&self, parent: &V, child: &V) -> bool {
        self.precedes(child, parent)
    }

    /// Returns true when heaps ordered by `self` and `other` can be combined
    fn is_compatible(&self, _other: &Self) -> bool {
        true
    }
}

/// Ascending order: the smallest value sits at the root
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MinOrder;

impl<V: PartialOrd + ?Sized> Comparator<V> for MinOrder {
    fn precedes(&self, a: &V, b: &V) -> bool {
        a < b
    }
}

/// Descending order: the largest value sits at the root
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MaxOrder;

impl<V: PartialOrd + ?Sized> Comparator<V> for MaxOrder {
    fn precedes(&self, a: &V, b: &V) -> bool {
        a > b
    }
}

/// Ordering chosen when the heap is constructed
///
/// Two heaps built with different directions cannot be merged; the merge
/// operations report [`HeapError::OrderMismatch`](crate::HeapError::OrderMismatch).
///
/// ```rust
/// use tree_heaps::Heap;
/// use tree_heaps::heap::DirectedHeap;
/// use tree_heaps::order::Direction;
///
/// let mut heap: DirectedHeap<i32> = DirectedHeap::with_order(Direction::Descending);
/// heap.push(("low", 1)).unwrap();
/// heap.push(("high", 9)).unwrap();
/// assert_eq!(heap.peek().map(|r| r.value), Some(9));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Min-heap
    #[default]
    Ascending,
    /// Max-heap
    Descending,
}

impl<V: PartialOrd + ?Sized> Comparator<V> for Direction {
    fn precedes(&self, a: &V, b: &V) -> bool {
        match self {
            Direction::Ascending => a < b,
            Direction::Descending => a > b,
        }
    }

    fn is_compatible(&self, other: &Self) -> bool {
        self == other
    }
}

/// Sibling order is independent of the heap direction: when the heap property
/// allows it, the left child holds the naturally smaller value.
pub(crate) fn siblings_reversed<V: PartialOrd + ?Sized>(left: &V, right: &V) -> bool {
    left > right
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_order() {
        assert!(MinOrder.precedes(&1, &2));
        assert!(!MinOrder.precedes(&2, &1));
        assert!(!MinOrder.precedes(&2, &2));
        assert!(MinOrder.out_of_order(&5, &3));
        assert!(!MinOrder.out_of_order(&3, &3));
    }

    #[test]
    fn test_max_order() {
        assert!(MaxOrder.precedes(&2, &1));
        assert!(!MaxOrder.precedes(&1, &2));
        assert!(MaxOrder.out_of_order(&3, &5));
        assert!(!MaxOrder.out_of_order(&5, &3));
    }

    #[test]
    fn test_direction_matches_static_orders() {
        for (a, b) in [(1, 2), (2, 1), (4, 4)] {
            assert_eq!(
                Comparator::<i32>::precedes(&Direction::Ascending, &a, &b),
                MinOrder.precedes(&a, &b)
            );
            assert_eq!(
                Comparator::<i32>::precedes(&Direction::Descending, &a, &b),
                MaxOrder.precedes(&a, &b)
            );
        }
    }

    #[test]
    fn test_compatibility() {
        assert!(Comparator::<i32>::is_compatible(&MinOrder, &MinOrder));
        assert!(Comparator::<i32>::is_compatible(
            &Direction::Descending,
            &Direction::Descending
        ));
        assert!(!Comparator::<i32>::is_compatible(
            &Direction::Ascending,
            &Direction::Descending
        ));
    }

    #[test]
    fn test_nan_never_precedes() {
        let nan = f64::NAN;
        assert!(!MinOrder.precedes(&nan, &1.0));
        assert!(!MinOrder.precedes(&1.0, &nan));
        assert!(!siblings_reversed(&nan, &1.0));
    }
}
