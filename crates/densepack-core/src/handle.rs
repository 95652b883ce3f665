//! Generational handles.
//!
//! A [`Handle`] names one logical element for its whole lifetime. It pairs
//! a slot number with the generation that slot carried when the element was
//! inserted, so a handle to a slot that has since been freed and reused is
//! detected as stale rather than aliasing the new occupant.

use std::fmt;

/// Opaque identifier for an element in a packed store.
///
/// Two handles are equal only if both the slot and the generation match.
/// A handle stays valid until the element it names is removed; after that
/// it never resolves again, even once its slot is reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle {
    slot: u32,
    generation: u32,
}

impl Handle {
    /// Rebuild a handle from its raw parts.
    ///
    /// Stores only hand out handles through insertion. A handle built here
    /// that was never issued simply fails to resolve.
    pub const fn from_raw_parts(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    /// Slot number this handle refers to.
    pub const fn slot(&self) -> u32 {
        self.slot
    }

    /// Generation the slot carried when this handle was issued.
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.slot, self.generation)
    }
}
