//! Integration tests for the ring array.

use parallax_adapter::collections::RingArray;
use parallax_adapter::error::Error;
use proptest::prelude::*;
use std::collections::VecDeque;

fn drain<T>(array: &mut RingArray<T>) -> Vec<T> {
    std::iter::from_fn(|| array.pop_front()).collect()
}

#[test]
fn test_fifo_order_across_wrap() {
    let mut array = RingArray::new(10);
    for i in 1..=10 {
        array.push_back(i);
    }
    for expected in 1..=5 {
        assert_eq!(array.pop_front(), Some(expected));
    }
    for i in 11..=15 {
        array.push_back(i);
    }
    assert_eq!(array.capacity(), 10);
    assert!(array.is_full());
    assert_eq!(drain(&mut array), (6..=15).collect::<Vec<_>>());
}

#[test]
fn test_grow_from_wrapped_end() {
    let mut array = RingArray::new(10);
    for i in 0..9 {
        array.push_back(i);
        assert_eq!(array.pop_front(), Some(i));
    }

    for i in 0..10 {
        array.push_back(i);
    }
    assert_eq!(array.capacity(), 10);
    array.push_back(10);
    assert!(array.capacity() > 10);
    assert_eq!(array.len(), 11);
    assert_eq!(drain(&mut array), (0..=10).collect::<Vec<_>>());
}

#[test]
fn test_push_sorted_interleaves() {
    let mut array = RingArray::new(4);
    for odd in [1, 3, 5, 7, 9] {
        array.push_back(odd);
    }
    for even in [8, 6, 4, 2, 0] {
        array.push_sorted(even, |a: &i32, b: &i32| a.cmp(b));
        let snapshot: Vec<_> = array.iter().copied().collect();
        assert!(snapshot.is_sorted());
    }
    assert_eq!(drain(&mut array), (0..10).collect::<Vec<_>>());
}

#[test]
fn test_drop_element_each_index() {
    let original: Vec<u32> = (100..108).collect();
    for i in 0..original.len() {
        let mut array = RingArray::new(8);
        // Rotate so the window wraps the physical end.
        for _ in 0..5 {
            array.push_back(0);
            array.pop_front();
        }
        array.extend(original.iter().copied());

        assert_eq!(array.drop_element(i), Some(original[i]));
        let mut expected = original.clone();
        expected.remove(i);
        assert_eq!(array.iter().copied().collect::<Vec<_>>(), expected);
    }
}

#[test]
fn test_out_of_range_access() {
    let mut array: RingArray<u8> = [1, 2, 3].into_iter().collect();
    assert_eq!(array.peek_nth(3), None);
    assert_eq!(array.drop_element(3), None);
    assert_eq!(
        array.remove(5).unwrap_err(),
        Error::IndexOutOfRange { index: 5, len: 3 }
    );
    assert_eq!(
        array.insert(4, 9).unwrap_err(),
        Error::IndexOutOfRange { index: 4, len: 3 }
    );
    array.insert(3, 4).unwrap();
    assert_eq!(array.remove(0), Ok(1));
    assert_eq!(array.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
}

#[test]
fn test_reorder_buffer_by_sequence() {
    #[derive(Debug, PartialEq)]
    struct Packet {
        seq: u16,
        payload: &'static str,
    }

    let mut pending = RingArray::new(2);
    for (seq, payload) in [(3, "c"), (1, "a"), (4, "d"), (2, "b")] {
        pending.push_sorted(Packet { seq, payload }, |a, b| a.seq.cmp(&b.seq));
    }

    assert_eq!(pending.find(|p| p.seq == 4), Some(3));
    let payloads: String = pending.into_iter().map(|p| p.payload).collect();
    assert_eq!(payloads, "abcd");
}

#[derive(Clone, Debug)]
enum Op {
    PushBack(u32),
    PushFront(u32),
    PopFront,
    PopBack,
    Drop(usize),
    PushSorted(u32),
    Sort,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u32>().prop_map(Op::PushBack),
        any::<u32>().prop_map(Op::PushFront),
        Just(Op::PopFront),
        Just(Op::PopBack),
        (0usize..24).prop_map(Op::Drop),
        (0u32..64).prop_map(Op::PushSorted),
        Just(Op::Sort),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_matches_vecdeque(
        capacity in 0usize..6,
        ops in proptest::collection::vec(op_strategy(), 0..128),
    ) {
        let mut array = RingArray::new(capacity);
        let mut model: VecDeque<u32> = VecDeque::new();

        for op in ops {
            match op {
                Op::PushBack(v) => {
                    array.push_back(v);
                    model.push_back(v);
                }
                Op::PushFront(v) => {
                    array.push_front(v);
                    model.push_front(v);
                }
                Op::PopFront => prop_assert_eq!(array.pop_front(), model.pop_front()),
                Op::PopBack => prop_assert_eq!(array.pop_back(), model.pop_back()),
                Op::Drop(i) => prop_assert_eq!(array.drop_element(i), model.remove(i)),
                Op::PushSorted(v) => {
                    // Only meaningful on sorted contents.
                    array.sort(|a, b| a.cmp(b));
                    model.make_contiguous().sort();
                    array.push_sorted(v, |a, b| a.cmp(b));
                    let pos = model.partition_point(|x| *x <= v);
                    model.insert(pos, v);
                }
                Op::Sort => {
                    array.sort(|a, b| a.cmp(b));
                    model.make_contiguous().sort();
                }
            }

            prop_assert_eq!(array.len(), model.len());
            prop_assert!(array.len() <= array.capacity());
            prop_assert_eq!(array.peek_front(), model.front());
            prop_assert_eq!(array.peek_back(), model.back());
        }

        prop_assert_eq!(array.iter().rev().copied().collect::<Vec<_>>(),
                        model.iter().rev().copied().collect::<Vec<_>>());
    }

    #[test]
    fn prop_drop_element_keeps_survivor_order(
        values in proptest::collection::vec(any::<u16>(), 1..32),
        rotate in 0usize..32,
        pick in any::<proptest::sample::Index>(),
    ) {
        let mut array = RingArray::new(values.len());
        for _ in 0..rotate {
            array.push_back(0);
            array.pop_front();
        }
        array.extend(values.iter().copied());

        let i = pick.index(values.len());
        prop_assert_eq!(array.drop_element(i), Some(values[i]));

        let mut expected = values.clone();
        expected.remove(i);
        prop_assert_eq!(array.iter().copied().collect::<Vec<_>>(), expected);
    }
}
