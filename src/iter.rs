use std::iter::FusedIterator;

use tracing::trace;

use crate::{Error, List, Slot, NUL};

/// Iterator over `(slot, &value)` pairs of a [`List`].
///
/// Walks `next` links from the head, or `prev` links from the tail when
/// consumed from the back. The two ends never cross.
pub struct Entries<'a, T> {
    list: &'a List<T>,
    front: Slot,
    back: Slot,
    remaining: usize,
}

impl<'a, T> Entries<'a, T> {
    pub(crate) fn new(list: &'a List<T>) -> Self {
        Entries {
            list,
            front: list.head().unwrap_or(NUL),
            back: list.tail().unwrap_or(NUL),
            remaining: list.len(),
        }
    }
}

impl<'a, T> Iterator for Entries<'a, T> {
    type Item = (Slot, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.front;
        let value = self.list.get(slot).ok()?;
        self.front = self.list.step(slot, Direction::Forward);
        self.remaining -= 1;
        Some((slot, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Entries<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.back;
        let value = self.list.get(slot).ok()?;
        self.back = self.list.step(slot, Direction::Backward);
        self.remaining -= 1;
        Some((slot, value))
    }
}

impl<T> ExactSizeIterator for Entries<'_, T> {}

impl<T> FusedIterator for Entries<'_, T> {}

impl<T> Clone for Entries<'_, T> {
    fn clone(&self) -> Self {
        Entries {
            list: self.list,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

/// Iterator over the values of a [`List`].
pub struct Iter<'a, T> {
    entries: Entries<'a, T>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(entries: Entries<'a, T>) -> Self {
        Iter { entries }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        self.entries.next_back().map(|(_, value)| value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            entries: self.entries.clone(),
        }
    }
}

/// Which link a [`Cursor`] follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Head to tail, following `next`.
    Forward,
    /// Tail to head, following `prev`.
    Backward,
}

/// A position in a [`List`] that doesn't borrow it.
///
/// The cursor remembers the list's generation when it was created. Any
/// insert or remove bumps the generation, after which [`Cursor::advance`]
/// fails with [`Error::ConcurrentModification`]; [`Cursor::restart`]
/// re-seats it at the matching end.
///
/// A cursor must only be used with the list that created it.
///
/// ```
/// use slablist::{Error, List};
///
/// let mut list: List<u32> = (1..=3).collect();
/// let mut cursor = list.cursor_front();
/// assert_eq!(cursor.advance(&list).unwrap().map(|(_, v)| *v), Some(1));
///
/// list.pop_back();
/// assert_eq!(cursor.advance(&list), Err(Error::ConcurrentModification));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    slot: Slot,
    generation: u64,
    direction: Direction,
}

impl Cursor {
    pub(crate) fn new(slot: Slot, generation: u64, direction: Direction) -> Self {
        Cursor {
            slot,
            generation,
            direction,
        }
    }

    /// The direction this cursor walks in.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Slot the next call to [`Cursor::advance`] yields, `None` at the end.
    pub fn peek_slot(&self) -> Option<Slot> {
        if self.slot == NUL {
            None
        } else {
            Some(self.slot)
        }
    }

    /// Yield the current element and move past it.
    pub fn advance<'a, T>(&mut self, list: &'a List<T>) -> Result<Option<(Slot, &'a T)>, Error> {
        if list.generation() != self.generation {
            trace!(
                cursor = self.generation,
                list = list.generation(),
                "stale cursor"
            );
            return Err(Error::ConcurrentModification);
        }
        if self.slot == NUL {
            return Ok(None);
        }
        let slot = self.slot;
        let value = list.get(slot)?;
        self.slot = list.step(slot, self.direction);
        Ok(Some((slot, value)))
    }

    /// Move back to the head (forward cursors) or tail (backward cursors)
    /// and accept the list's current state.
    pub fn restart<T>(&mut self, list: &List<T>) {
        *self = match self.direction {
            Direction::Forward => list.cursor_front(),
            Direction::Backward => list.cursor_back(),
        };
    }
}
