use std::collections::VecDeque;

use proptest::prelude::*;
use slablist::{Error, List, Slot};

#[derive(Debug, Clone)]
enum Op {
    PushFront(u32),
    PushBack(u32),
    InsertAfter(usize, u32),
    Remove(usize),
    RemoveStale,
    PopFront,
    PopBack,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u32>().prop_map(Op::PushFront),
        any::<u32>().prop_map(Op::PushBack),
        (any::<usize>(), any::<u32>()).prop_map(|(i, v)| Op::InsertAfter(i, v)),
        any::<usize>().prop_map(Op::Remove),
        Just(Op::RemoveStale),
        Just(Op::PopFront),
        Just(Op::PopBack),
    ]
}

proptest! {
    #[test]
    fn list_matches_vecdeque(capacity in 1usize..24, ops in prop::collection::vec(op(), 0..200)) {
        let mut list = List::with_capacity(capacity).unwrap();
        let mut model: VecDeque<(Slot, u32)> = VecDeque::new();
        let mut stale: Option<Slot> = None;

        for op in ops {
            let full = model.len() == capacity;
            match op {
                Op::PushFront(v) => match list.push_front(v) {
                    Ok(slot) => model.push_front((slot, v)),
                    Err(e) => {
                        prop_assert!(full);
                        prop_assert_eq!(e, Error::Exhausted(capacity));
                    }
                },
                Op::PushBack(v) => match list.push_back(v) {
                    Ok(slot) => model.push_back((slot, v)),
                    Err(e) => {
                        prop_assert!(full);
                        prop_assert_eq!(e, Error::Exhausted(capacity));
                    }
                },
                Op::InsertAfter(i, v) => {
                    if model.is_empty() {
                        continue;
                    }
                    let i = i % model.len();
                    match list.insert_after(Some(model[i].0), v) {
                        Ok(slot) => model.insert(i + 1, (slot, v)),
                        Err(_) => prop_assert!(full),
                    }
                }
                Op::Remove(i) => {
                    if model.is_empty() {
                        continue;
                    }
                    let (slot, v) = model.remove(i % model.len()).unwrap();
                    prop_assert_eq!(list.remove(slot), Ok(v));
                    stale = Some(slot);
                }
                Op::RemoveStale => {
                    if let Some(slot) = stale.take() {
                        if !model.iter().any(|(s, _)| *s == slot) {
                            prop_assert_eq!(list.remove(slot), Err(Error::InvalidSlot(slot)));
                        }
                    }
                }
                Op::PopFront => {
                    prop_assert_eq!(list.pop_front(), model.pop_front().map(|(_, v)| v));
                }
                Op::PopBack => {
                    prop_assert_eq!(list.pop_back(), model.pop_back().map(|(_, v)| v));
                }
            }

            list.assert_invariants();
            let forward: Vec<(Slot, u32)> = list.entries().map(|(s, v)| (s, *v)).collect();
            prop_assert_eq!(&forward, &model.iter().copied().collect::<Vec<_>>());
            let backward: Vec<Slot> = list.entries().rev().map(|(s, _)| s).collect();
            prop_assert_eq!(backward.len(), list.len());
            prop_assert!(backward.iter().rev().eq(forward.iter().map(|(s, _)| s)));
        }
    }
}
