use slablist::List;

#[test]
fn test_manual_construction() {
    // Create a new empty list
    let mut list = List::with_capacity(5).unwrap();

    // Push elements manually
    list.push_front(1).unwrap();
    list.push_front(2).unwrap();
    list.push_front(3).unwrap();
    list.push_front(4).unwrap();
    list.push_front(5).unwrap();

    assert_eq!(list.len(), 5);
    assert!(list.push_front(6).is_err());

    // When iterating, elements should come out in reverse order of insertion
    let output: Vec<_> = list.iter().copied().collect();
    assert_eq!(output, vec![5, 4, 3, 2, 1]);
    list.assert_invariants();
}
