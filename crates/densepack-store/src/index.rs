//! Slot index table: handle to dense position translation.
//!
//! [`IndexTable`] holds one [`SlotEntry`] per slot. It never touches the
//! payload; it only answers "where does this handle live right now?" and
//! records where each slot's element has been moved to.

use densepack_core::{Handle, StoreError};

/// Per-slot bookkeeping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SlotEntry {
    /// Generation valid for the slot's current (or next) occupant.
    pub generation: u32,
    /// Dense position of the occupant, `None` while the slot is empty.
    pub dense: Option<u32>,
}

impl SlotEntry {
    /// Whether the slot currently holds an element.
    pub fn is_occupied(&self) -> bool {
        self.dense.is_some()
    }
}

/// Result of freeing a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum Unbound {
    /// The generation was bumped; the slot may be reused.
    Reusable,
    /// The generation is already `u32::MAX`. The slot must be retired,
    /// since reusing it would repeat a generation.
    Exhausted,
}

/// Forward mapping from slot number to dense position and generation.
pub struct IndexTable {
    entries: Box<[SlotEntry]>,
}

impl IndexTable {
    /// Create a table with `capacity` empty slots at generation 0.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: vec![SlotEntry::default(); capacity].into_boxed_slice(),
        }
    }

    /// Translate a handle into the dense position of its element.
    ///
    /// Out-of-range slots, empty slots, and generation mismatches all
    /// produce the same [`StoreError::StaleHandle`].
    pub fn resolve(&self, handle: Handle) -> Result<usize, StoreError> {
        let stale = StoreError::StaleHandle { handle };
        let entry = self.entries.get(handle.slot() as usize).ok_or(stale.clone())?;
        match entry.dense {
            Some(dense) if entry.generation == handle.generation() => Ok(dense as usize),
            _ => Err(stale),
        }
    }

    /// Point `slot` at dense position `dense`.
    ///
    /// Used both when a slot is first occupied and when compaction moves
    /// its element. The generation is left untouched.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of range. Callers only pass slots taken from
    /// the allocator, which are always in range.
    pub fn bind(&mut self, slot: u32, dense: u32) {
        self.entries[slot as usize].dense = Some(dense);
    }

    /// Mark `slot` empty and advance its generation.
    ///
    /// This is the only place a generation changes.
    pub fn unbind(&mut self, slot: u32) -> Unbound {
        let entry = &mut self.entries[slot as usize];
        entry.dense = None;
        match entry.generation.checked_add(1) {
            Some(next) => {
                entry.generation = next;
                Unbound::Reusable
            }
            None => Unbound::Exhausted,
        }
    }

    /// Current generation of `slot`, used to stamp a new handle.
    pub fn generation(&self, slot: u32) -> u32 {
        self.entries[slot as usize].generation
    }

    /// Entry for `slot`, if in range.
    pub fn entry(&self, slot: u32) -> Option<&SlotEntry> {
        self.entries.get(slot as usize)
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no slots.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(slot, entry)` pairs in slot order.
    pub fn entries(&self) -> impl Iterator<Item = (u32, &SlotEntry)> {
        (0u32..).zip(self.entries.iter())
    }

    #[cfg(test)]
    pub(crate) fn set_generation(&mut self, slot: u32, generation: u32) {
        self.entries[slot as usize].generation = generation;
    }
}
