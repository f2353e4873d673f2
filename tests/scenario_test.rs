use slablist::{Error, List, Slot};

fn forward(list: &List<u32>) -> Vec<u32> {
    list.iter().copied().collect()
}

#[test]
fn test_insert_remove_reinsert_scenario() {
    let mut list = List::with_capacity(4).unwrap();
    list.insert_after(None, 10).unwrap();
    let twenty = list.insert_after(None, 20).unwrap();
    list.insert_after(None, 30).unwrap();
    assert_eq!(forward(&list), vec![30, 20, 10]);

    assert_eq!(list.remove(twenty), Ok(20));
    assert_eq!(forward(&list), vec![30, 10]);

    let head = list.head().unwrap();
    list.insert_after(Some(head), 40).unwrap();
    assert_eq!(forward(&list), vec![30, 40, 10]);
    assert_eq!(list.len(), 3);
    assert_eq!(list.free(), 1);
    list.assert_invariants();
}

#[test]
fn test_round_trip_to_empty() {
    const N: usize = 64;
    let mut list = List::with_capacity(N).unwrap();
    let slots: Vec<Slot> = (0..N as u32).map(|v| list.push_back(v).unwrap()).collect();
    assert!(list.is_full());

    for (expected, slot) in slots.iter().enumerate().rev() {
        assert_eq!(list.remove(*slot), Ok(expected as u32));
        list.assert_invariants();
    }
    assert!(list.is_empty());
    assert_eq!(list.free(), list.capacity());
    assert_eq!(list.head(), None);
    assert_eq!(list.tail(), None);
}

#[test]
fn test_capacity_one() {
    let mut list = List::with_capacity(1).unwrap();
    let only = list.push_back(1).unwrap();
    assert_eq!(list.push_back(2), Err(Error::Exhausted(1)));
    assert_eq!(list.insert_after(Some(only), 2), Err(Error::Exhausted(1)));
    assert_eq!(list.len(), 1);
    assert_eq!(forward(&list), vec![1]);
    list.assert_invariants();
}

#[test]
fn test_freed_slot_is_reused_with_fresh_payload() {
    let mut list = List::with_capacity(3).unwrap();
    list.push_back(1).unwrap();
    let middle = list.push_back(2).unwrap();
    list.push_back(3).unwrap();

    list.remove(middle).unwrap();
    let reused = list.push_front(99).unwrap();
    assert_eq!(reused, middle);
    assert_eq!(list.get(reused), Ok(&99));
    assert_eq!(forward(&list), vec![99, 1, 3]);
    list.assert_invariants();
}

#[test]
fn test_forward_and_backward_walks_agree() {
    let mut list = List::with_capacity(16).unwrap();
    let mut slots = Vec::new();
    for v in 0..16 {
        let slot = if v % 3 == 0 {
            list.push_front(v).unwrap()
        } else {
            list.push_back(v).unwrap()
        };
        slots.push(slot);
    }
    for slot in slots.iter().step_by(4) {
        list.remove(*slot).unwrap();
    }

    let forward: Vec<_> = list.entries().map(|(slot, _)| slot).collect();
    let mut backward: Vec<_> = list.entries().rev().map(|(slot, _)| slot).collect();
    backward.reverse();
    assert_eq!(forward, backward);
    assert_eq!(forward.len(), list.len());
    list.assert_invariants();
}

#[test]
fn test_invalid_anchor_is_rejected() {
    let mut list = List::with_capacity(2).unwrap();
    assert_eq!(list.insert_after(Some(0), 1), Err(Error::InvalidSlot(0)));
    assert_eq!(list.insert_before(Some(5), 1), Err(Error::InvalidSlot(5)));
    assert!(list.is_empty());
    assert_eq!(list.free(), 2);
    list.assert_invariants();
}
