//! Property-based tests using proptest
//!
//! These tests generate random sequences of operations and verify that the
//! tree stays complete, that heap order holds after every step, and that the
//! combining operations account for every record.

use proptest::prelude::*;
use std::collections::HashSet;
use tree_heaps::order::Comparator;
use tree_heaps::{Direction, DirectedHeap, Heap, MaxHeap, MinHeap, Record, TreeHeap};

#[derive(Debug, Clone)]
enum Op {
    Push(i32),
    Pop,
    Replace(i32),
    /// Delete the n-th live record, modulo the current length
    Delete(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (-50i32..50).prop_map(Op::Push),
        2 => Just(Op::Pop),
        1 => (-50i32..50).prop_map(Op::Replace),
        1 => any::<usize>().prop_map(Op::Delete),
    ]
}

/// The value a heap ordered by `order` must have on top
fn best<C: Comparator<i32>>(order: &C, records: &[Record<i32>]) -> Option<i32> {
    records
        .iter()
        .map(|r| r.value)
        .reduce(|a, b| if order.precedes(&b, &a) { b } else { a })
}

/// Apply operations and check every invariant after each step
fn test_operation_sequence<C: Comparator<i32>>(
    mut heap: TreeHeap<i32, C>,
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut live: Vec<Record<i32>> = Vec::new();

    for (step, op) in ops.into_iter().enumerate() {
        match op {
            Op::Push(value) => {
                let record = Record::new(format!("push {step}"), value);
                heap.push(&record).unwrap();
                live.push(record);
            }
            Op::Pop => {
                let expected = best(heap.order(), &live);
                let popped = heap.pop();
                prop_assert_eq!(popped.as_ref().map(|r| r.value), expected);
                if let Some(record) = popped {
                    let pos = live.iter().position(|r| *r == record).unwrap();
                    live.remove(pos);
                }
            }
            Op::Replace(value) => {
                let expected = best(heap.order(), &live);
                let record = Record::new(format!("replace {step}"), value);
                let previous = heap.replace(&record).unwrap();
                prop_assert_eq!(previous.as_ref().map(|r| r.value), expected);
                if let Some(previous) = previous {
                    let pos = live.iter().position(|r| *r == previous).unwrap();
                    live.remove(pos);
                }
                live.push(record);
            }
            Op::Delete(index) => {
                if live.is_empty() {
                    continue;
                }
                let target = live.remove(index % live.len());
                prop_assert_eq!(heap.delete(&target), Ok(target));
            }
        }

        prop_assert_eq!(heap.len(), live.len());
        prop_assert!(heap.verify_shape());
        prop_assert!(heap.verify_heap_property());
        prop_assert_eq!(heap.peek().map(|r| r.value), best(heap.order(), &live));
    }

    Ok(())
}

/// Test that draining yields values in priority order
fn test_drain_order<C: Comparator<i32>>(
    mut heap: TreeHeap<i32, C>,
    values: Vec<i32>,
) -> Result<(), TestCaseError> {
    for (i, value) in values.iter().enumerate() {
        heap.push((format!("{i}"), *value)).unwrap();
    }
    let mut previous: Option<i32> = None;
    let mut count = 0;
    while let Some(record) = heap.pop() {
        if let Some(prev) = previous {
            prop_assert!(!heap.order().precedes(&record.value, &prev));
        }
        previous = Some(record.value);
        count += 1;
    }
    prop_assert_eq!(count, values.len());
    Ok(())
}

/// Test that merge deduplicates and leaves both operands intact
fn test_merge_invariant<C: Comparator<i32>>(
    order: C,
    left: Vec<i32>,
    right: Vec<i32>,
) -> Result<(), TestCaseError> {
    // Labels are derived from values, so equal values are equal records
    let build = |values: &[i32]| {
        TreeHeap::<i32, C>::from_entries_with_order(
            order.clone(),
            values.iter().map(|v| (format!("v{v}"), *v)),
        )
    };
    let a = build(&left);
    let b = build(&right);

    let merged = a.merge(&b).unwrap();
    let distinct: HashSet<i32> = left.iter().chain(right.iter()).copied().collect();

    prop_assert_eq!(merged.len(), distinct.len());
    prop_assert_eq!(a.len(), left.len());
    prop_assert_eq!(b.len(), right.len());
    prop_assert!(merged.verify_shape());
    prop_assert!(merged.verify_heap_property());
    Ok(())
}

/// Test that union consumes both operands
fn test_union_invariant<C: Comparator<i32>>(
    order: C,
    left: Vec<i32>,
    right: Vec<i32>,
) -> Result<(), TestCaseError> {
    let build = |values: &[i32]| {
        TreeHeap::<i32, C>::from_entries_with_order(
            order.clone(),
            values.iter().map(|v| (format!("v{v}"), *v)),
        )
    };
    let mut a = build(&left);
    let mut b = build(&right);

    let combined = a.union(&mut b).unwrap();
    let distinct: HashSet<i32> = left.iter().chain(right.iter()).copied().collect();

    prop_assert!(a.is_empty());
    prop_assert!(b.is_empty());
    prop_assert!(!a.root().is_valid());
    prop_assert!(!b.root().is_valid());
    prop_assert_eq!(combined.len(), distinct.len());
    prop_assert!(combined.verify_heap_property());
    Ok(())
}

proptest! {
    #[test]
    fn test_min_operation_sequence(ops in prop::collection::vec(op_strategy(), 0..120)) {
        test_operation_sequence(MinHeap::new(), ops)?;
    }

    #[test]
    fn test_max_operation_sequence(ops in prop::collection::vec(op_strategy(), 0..120)) {
        test_operation_sequence(MaxHeap::new(), ops)?;
    }

    #[test]
    fn test_directed_operation_sequence(
        descending in any::<bool>(),
        ops in prop::collection::vec(op_strategy(), 0..120)
    ) {
        let direction = if descending { Direction::Descending } else { Direction::Ascending };
        test_operation_sequence(DirectedHeap::with_order(direction), ops)?;
    }

    #[test]
    fn test_min_drain_order(values in prop::collection::vec(-1000i32..1000, 0..200)) {
        test_drain_order(MinHeap::new(), values)?;
    }

    #[test]
    fn test_max_drain_order(values in prop::collection::vec(-1000i32..1000, 0..200)) {
        test_drain_order(MaxHeap::new(), values)?;
    }

    #[test]
    fn test_min_merge_invariant(
        left in prop::collection::vec(-30i32..30, 0..40),
        right in prop::collection::vec(-30i32..30, 0..40)
    ) {
        test_merge_invariant(tree_heaps::MinOrder, left, right)?;
    }

    #[test]
    fn test_max_merge_invariant(
        left in prop::collection::vec(-30i32..30, 0..40),
        right in prop::collection::vec(-30i32..30, 0..40)
    ) {
        test_merge_invariant(tree_heaps::MaxOrder, left, right)?;
    }

    #[test]
    fn test_union_invariant_both_directions(
        descending in any::<bool>(),
        left in prop::collection::vec(-30i32..30, 0..40),
        right in prop::collection::vec(-30i32..30, 0..40)
    ) {
        let direction = if descending { Direction::Descending } else { Direction::Ascending };
        test_union_invariant(direction, left, right)?;
    }
}
