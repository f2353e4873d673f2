//! A doubly-linked list that never allocates after construction.
//!
//! Nodes live in a single contiguous arena sized once by
//! [`List::with_capacity`] and are addressed by 32-bit [`Slot`] indices
//! instead of pointers. A node is two slot indices followed by the value,
//! so a `List<u32>` fits five nodes in a 64-byte cache line.
//!
//! ```
//! use slablist::List;
//!
//! let mut list = List::with_capacity(4).unwrap();
//! let a = list.push_back(1).unwrap();
//! let c = list.push_back(3).unwrap();
//! list.insert_after(Some(a), 2).unwrap();
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
//!
//! assert_eq!(list.remove(c), Ok(3));
//! assert!(list.get(c).is_err());
//! ```
//!
//! Slots handed out by inserts stay valid until the node is removed, and
//! may be reused by the very next insert afterwards.

use std::{fmt, mem::MaybeUninit};

use static_assertions::const_assert_eq;
use tracing::{debug, trace};

mod error;
mod iter;

pub use error::Error;
pub use iter::{Cursor, Direction, Entries, Iter};

/// Index of a node in the arena.
pub type Slot = u32;

/// Sentinel meaning "no node".
pub const NUL: Slot = Slot::MAX;

/// Stored in `prev` of slots that sit on the free chain.
const FREE: Slot = Slot::MAX - 1;

/// Largest supported capacity. Valid slots stay below `FREE`.
pub const MAX_CAPACITY: usize = FREE as usize;

#[repr(C)]
struct Node<T> {
    prev: Slot,
    next: Slot,
    value: MaybeUninit<T>,
}

const_assert_eq!(std::mem::size_of::<Node<u32>>(), 12);
const_assert_eq!(std::mem::size_of::<Node<u64>>(), 16);

impl<T> Node<T> {
    fn free(next: Slot) -> Self {
        Node {
            prev: FREE,
            next,
            value: MaybeUninit::uninit(),
        }
    }

    #[inline]
    fn is_live(&self) -> bool {
        self.prev != FREE
    }
}

/// A fixed-capacity doubly-linked list backed by a contiguous arena.
pub struct List<T> {
    nodes: Box<[Node<T>]>,
    free_head: Slot,
    head: Slot,
    tail: Slot,
    len: usize,
    generation: u64,
}

impl<T> List<T> {
    /// Create a new list with the given capacity.
    ///
    /// The whole arena is allocated here; no later operation allocates.
    pub fn with_capacity(capacity: usize) -> Result<Self, Error> {
        if capacity == 0 || capacity > MAX_CAPACITY {
            return Err(Error::InvalidCapacity(capacity));
        }
        let nodes: Box<[Node<T>]> = (0..capacity)
            .map(|i| {
                if i + 1 < capacity {
                    Node::free((i + 1) as Slot)
                } else {
                    Node::free(NUL)
                }
            })
            .collect();
        debug!(
            capacity,
            node_size = std::mem::size_of::<Node<T>>(),
            "allocated list arena"
        );
        Ok(Self {
            nodes,
            free_head: 0,
            head: NUL,
            tail: NUL,
            len: 0,
            generation: 0,
        })
    }

    /// Return the capacity of the list.
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Return the length of the list.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return the number of elements that can still be stored.
    pub fn free(&self) -> usize {
        self.capacity() - self.len()
    }

    /// Return true if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return true if the list is full.
    pub fn is_full(&self) -> bool {
        self.free_head == NUL
    }

    /// Return true if `slot` currently holds a value.
    pub fn contains(&self, slot: Slot) -> bool {
        self.live_index(slot).is_ok()
    }

    /// Slot of the first element.
    pub fn head(&self) -> Option<Slot> {
        Self::link(self.head)
    }

    /// Slot of the last element.
    pub fn tail(&self) -> Option<Slot> {
        Self::link(self.tail)
    }

    /// Slot following `slot`, or `None` if `slot` is the tail.
    pub fn next_slot(&self, slot: Slot) -> Result<Option<Slot>, Error> {
        let idx = self.live_index(slot)?;
        Ok(Self::link(self.nodes[idx].next))
    }

    /// Slot preceding `slot`, or `None` if `slot` is the head.
    pub fn prev_slot(&self, slot: Slot) -> Result<Option<Slot>, Error> {
        let idx = self.live_index(slot)?;
        Ok(Self::link(self.nodes[idx].prev))
    }

    /// Reference to the first element.
    pub fn front(&self) -> Option<&T> {
        self.get(self.head).ok()
    }

    /// Reference to the last element.
    pub fn back(&self) -> Option<&T> {
        self.get(self.tail).ok()
    }

    /// Reference to the element stored at `slot`.
    pub fn get(&self, slot: Slot) -> Result<&T, Error> {
        let idx = self.live_index(slot)?;
        // SAFETY: live nodes always hold an initialized value.
        Ok(unsafe { self.nodes[idx].value.assume_init_ref() })
    }

    /// Mutable reference to the element stored at `slot`.
    pub fn get_mut(&mut self, slot: Slot) -> Result<&mut T, Error> {
        let idx = self.live_index(slot)?;
        // SAFETY: live nodes always hold an initialized value.
        Ok(unsafe { self.nodes[idx].value.assume_init_mut() })
    }

    /// Insert `value` right after `anchor`, or at the front if `anchor` is `None`.
    ///
    /// Returns the slot of the new element. On error the list is left
    /// untouched and `value` is dropped.
    pub fn insert_after(&mut self, anchor: Option<Slot>, value: T) -> Result<Slot, Error> {
        let (prev, next) = match anchor {
            Some(anchor) => {
                let idx = self.live_index(anchor)?;
                (anchor, self.nodes[idx].next)
            }
            None => (NUL, self.head),
        };
        let slot = self.acquire_slot()?;
        self.attach(slot, prev, next, value);
        Ok(slot)
    }

    /// Insert `value` right before `anchor`, or at the back if `anchor` is `None`.
    pub fn insert_before(&mut self, anchor: Option<Slot>, value: T) -> Result<Slot, Error> {
        let (prev, next) = match anchor {
            Some(anchor) => {
                let idx = self.live_index(anchor)?;
                (self.nodes[idx].prev, anchor)
            }
            None => (self.tail, NUL),
        };
        let slot = self.acquire_slot()?;
        self.attach(slot, prev, next, value);
        Ok(slot)
    }

    /// Prepend an element to the beginning of the list.
    pub fn push_front(&mut self, value: T) -> Result<Slot, Error> {
        self.insert_after(None, value)
    }

    /// Append an element to the end of the list.
    pub fn push_back(&mut self, value: T) -> Result<Slot, Error> {
        self.insert_before(None, value)
    }

    /// Remove an element from the list given its slot.
    ///
    /// The slot becomes invalid immediately and goes back to the arena.
    pub fn remove(&mut self, slot: Slot) -> Result<T, Error> {
        let idx = self.live_index(slot)?;
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        if prev == NUL {
            self.head = next;
        } else {
            debug_assert_eq!(self.nodes[prev as usize].next, slot);
            self.nodes[prev as usize].next = next;
        }
        if next == NUL {
            self.tail = prev;
        } else {
            debug_assert_eq!(self.nodes[next as usize].prev, slot);
            self.nodes[next as usize].prev = prev;
        }
        // SAFETY: the node was live, and is marked free right below so the
        // value is never read again.
        let value = unsafe { self.nodes[idx].value.assume_init_read() };
        self.release_slot(slot);
        debug_assert!(self.len > 0);
        self.len -= 1;
        self.generation = self.generation.wrapping_add(1);
        Ok(value)
    }

    /// Remove and return the head element of the list.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.head == NUL {
            return None;
        }
        self.remove(self.head).ok()
    }

    /// Remove and return the tail element of the list.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.tail == NUL {
            return None;
        }
        self.remove(self.tail).ok()
    }

    /// Drop every element, returning all slots to the arena.
    pub fn clear(&mut self) {
        let dropped = self.len;
        while self.pop_front().is_some() {}
        debug!(dropped, capacity = self.capacity(), "cleared list");
    }

    /// Append every value of `iter` to the back of the list.
    ///
    /// Stops at the first value that doesn't fit and returns
    /// [`Error::Exhausted`]; values inserted before that point stay.
    pub fn try_extend<I: IntoIterator<Item = T>>(&mut self, iter: I) -> Result<(), Error> {
        for value in iter {
            self.push_back(value)?;
        }
        Ok(())
    }

    /// Iterate over the values, front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.entries())
    }

    /// Iterate over `(slot, value)` pairs, front to back.
    ///
    /// Use `.rev()` to walk from the tail.
    pub fn entries(&self) -> Entries<'_, T> {
        Entries::new(self)
    }

    /// Detached cursor starting at the head.
    ///
    /// Unlike [`List::entries`] it doesn't borrow the list, so the list may
    /// be modified while the cursor is held; the cursor then reports
    /// [`Error::ConcurrentModification`] instead of yielding stale slots.
    pub fn cursor_front(&self) -> Cursor {
        Cursor::new(self.head, self.generation, Direction::Forward)
    }

    /// Detached cursor starting at the tail.
    pub fn cursor_back(&self) -> Cursor {
        Cursor::new(self.tail, self.generation, Direction::Backward)
    }

    /// Check every structural invariant, panicking on the first violation.
    ///
    /// Walks the list in both directions and the whole free chain, so this
    /// is O(capacity). Meant for tests and debugging.
    pub fn assert_invariants(&self) {
        let capacity = self.capacity();
        assert!(self.len <= capacity, "len {} > capacity {}", self.len, capacity);
        assert_eq!(self.head == NUL, self.len == 0, "head/len mismatch");
        assert_eq!(self.tail == NUL, self.len == 0, "tail/len mismatch");

        let mut forward = Vec::with_capacity(self.len);
        let mut prev = NUL;
        let mut slot = self.head;
        while slot != NUL {
            assert!(forward.len() < capacity, "cycle in forward links");
            let node = &self.nodes[slot as usize];
            assert!(node.is_live(), "free slot {} linked into list", slot);
            assert_eq!(node.prev, prev, "broken prev link at slot {}", slot);
            forward.push(slot);
            prev = slot;
            slot = node.next;
        }
        assert_eq!(prev, self.tail, "forward walk doesn't end at tail");
        assert_eq!(forward.len(), self.len, "forward walk length");

        let mut backward = Vec::with_capacity(self.len);
        let mut slot = self.tail;
        while slot != NUL {
            assert!(backward.len() < capacity, "cycle in backward links");
            backward.push(slot);
            slot = self.nodes[slot as usize].prev;
        }
        backward.reverse();
        assert_eq!(forward, backward, "backward walk differs");

        let mut free = 0;
        let mut slot = self.free_head;
        while slot != NUL {
            assert!(free < capacity, "cycle in free chain");
            let node = &self.nodes[slot as usize];
            assert!(!node.is_live(), "live slot {} on free chain", slot);
            free += 1;
            slot = node.next;
        }
        assert_eq!(free, self.free(), "free chain length");
        let live = self.nodes.iter().filter(|node| node.is_live()).count();
        assert_eq!(live, self.len, "live slot count");
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// Slot of the node next to `slot` in `direction`, `NUL` at the end.
    ///
    /// `slot` must be live.
    pub(crate) fn step(&self, slot: Slot, direction: Direction) -> Slot {
        let node = &self.nodes[slot as usize];
        match direction {
            Direction::Forward => node.next,
            Direction::Backward => node.prev,
        }
    }

    fn live_index(&self, slot: Slot) -> Result<usize, Error> {
        match self.nodes.get(slot as usize) {
            Some(node) if node.is_live() => Ok(slot as usize),
            _ => Err(Error::InvalidSlot(slot)),
        }
    }

    fn link(slot: Slot) -> Option<Slot> {
        if slot == NUL {
            None
        } else {
            Some(slot)
        }
    }

    fn acquire_slot(&mut self) -> Result<Slot, Error> {
        let slot = self.free_head;
        if slot == NUL {
            trace!(capacity = self.capacity(), "arena exhausted");
            return Err(Error::Exhausted(self.capacity()));
        }
        self.free_head = self.nodes[slot as usize].next;
        Ok(slot)
    }

    fn release_slot(&mut self, slot: Slot) {
        let node = &mut self.nodes[slot as usize];
        node.prev = FREE;
        node.next = self.free_head;
        self.free_head = slot;
    }

    /// Link a freshly acquired `slot` between `prev` and `next`.
    fn attach(&mut self, slot: Slot, prev: Slot, next: Slot, value: T) {
        let node = &mut self.nodes[slot as usize];
        node.prev = prev;
        node.next = next;
        node.value = MaybeUninit::new(value);
        if prev == NUL {
            self.head = slot;
        } else {
            self.nodes[prev as usize].next = slot;
        }
        if next == NUL {
            self.tail = slot;
        } else {
            self.nodes[next as usize].prev = slot;
        }
        self.len += 1;
        debug_assert!(self.len <= self.capacity());
        self.generation = self.generation.wrapping_add(1);
    }
}

impl<T> Drop for List<T> {
    fn drop(&mut self) {
        if !std::mem::needs_drop::<T>() {
            return;
        }
        let mut slot = self.head;
        while slot != NUL {
            let node = &mut self.nodes[slot as usize];
            slot = node.next;
            // SAFETY: every node reachable from head is live.
            unsafe { node.value.assume_init_drop() };
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> core::ops::Index<Slot> for List<T> {
    type Output = T;

    fn index(&self, slot: Slot) -> &Self::Output {
        match self.get(slot) {
            Ok(value) => value,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T> core::ops::IndexMut<Slot> for List<T> {
    fn index_mut(&mut self, slot: Slot) -> &mut Self::Output {
        match self.get_mut(slot) {
            Ok(value) => value,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Builds a list exactly as large as the number of items, keeping their order.
///
/// # Panics
///
/// Panics if there are more than [`MAX_CAPACITY`] items.
impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let values: Vec<T> = iter.into_iter().collect();
        let mut list = match Self::with_capacity(values.len().max(1)) {
            Ok(list) => list,
            Err(e) => panic!("{}", e),
        };
        for value in values {
            if let Err(e) = list.push_back(value) {
                panic!("{}", e);
            }
        }
        list
    }
}

/// Appends to the back of the list.
///
/// # Panics
///
/// Panics if the arena fills up; use [`List::try_extend`] to handle that.
impl<T> Extend<T> for List<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        if let Err(e) = self.try_extend(iter) {
            panic!("{}", e);
        }
    }
}

#[test]
fn test() {
    let mut list = List::with_capacity(3).unwrap();
    let a = list.push_front(1).unwrap();
    let b = list.push_front(2).unwrap();
    list.push_front(3).unwrap();
    assert_eq!(list.len(), 3);
    assert_eq!(list.push_front(4), Err(Error::Exhausted(3)));
    list.remove(a).unwrap();
    list.remove(b).unwrap();
    assert_eq!(list.len(), 1);
    let cv = list.pop_back().unwrap();
    assert_eq!(3, cv);
    list.assert_invariants();
}

#[test]
fn test_capacity_bounds() {
    assert_eq!(
        List::<u32>::with_capacity(0).unwrap_err(),
        Error::InvalidCapacity(0)
    );
    #[cfg(target_pointer_width = "64")]
    assert_eq!(
        List::<u32>::with_capacity(MAX_CAPACITY + 1).unwrap_err(),
        Error::InvalidCapacity(MAX_CAPACITY + 1)
    );
}

#[test]
fn test_free_chain_is_lifo() {
    let mut list = List::with_capacity(4).unwrap();
    let slots: Vec<Slot> = (0..4).map(|i| list.push_back(i).unwrap()).collect();
    assert_eq!(slots, vec![0, 1, 2, 3]);
    list.remove(1).unwrap();
    list.remove(3).unwrap();
    assert_eq!(list.push_back(10), Ok(3));
    assert_eq!(list.push_back(11), Ok(1));
    list.assert_invariants();
}

#[test]
fn test_double_remove_is_detected() {
    let mut list = List::with_capacity(2).unwrap();
    let a = list.push_back("a".to_string()).unwrap();
    assert_eq!(list.remove(a).as_deref(), Ok("a"));
    assert_eq!(list.remove(a), Err(Error::InvalidSlot(a)));
    assert_eq!(list.remove(NUL), Err(Error::InvalidSlot(NUL)));
    assert_eq!(list.remove(7), Err(Error::InvalidSlot(7)));
    assert!(list.is_empty());
    list.assert_invariants();
}

#[test]
fn test_failed_insert_leaves_list_unchanged() {
    let mut list = List::with_capacity(2).unwrap();
    let a = list.push_back(1).unwrap();
    list.remove(a).unwrap();
    list.push_back(2).unwrap();
    let generation = list.generation();
    assert_eq!(list.insert_after(Some(a + 1), 3), Err(Error::InvalidSlot(a + 1)));
    list.push_back(4).unwrap();
    let generation_full = list.generation();
    assert!(generation_full > generation);
    assert_eq!(list.insert_before(None, 5), Err(Error::Exhausted(2)));
    assert_eq!(list.generation(), generation_full);
    assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![2, 4]);
    list.assert_invariants();
}

#[test]
fn test_drop_releases_values() {
    use std::rc::Rc;

    let tracker = Rc::new(());
    {
        let mut list = List::with_capacity(8).unwrap();
        for _ in 0..5 {
            list.push_back(Rc::clone(&tracker)).unwrap();
        }
        let head = list.head().unwrap();
        drop(list.remove(head).unwrap());
        assert_eq!(Rc::strong_count(&tracker), 5);
    }
    assert_eq!(Rc::strong_count(&tracker), 1);
}
