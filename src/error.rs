use thiserror::Error;

use crate::Slot;

/// An error.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Error)]
pub enum Error {
    /// Capacity is zero or does not fit in a slot index.
    #[error("Invalid capacity: {0}")]
    InvalidCapacity(usize),
    /// Every slot of the arena is in use.
    #[error("Arena exhausted ({0} slots)")]
    Exhausted(usize),
    /// Slot is out of range or not currently live.
    #[error("Invalid slot: {0}")]
    InvalidSlot(Slot),
    /// The list was structurally modified after a cursor was taken.
    #[error("List modified during traversal")]
    ConcurrentModification,
}
