//! Slot allocation and dense back-references.
//!
//! [`HandleAllocator`] owns a single permutation of all slot numbers,
//! partitioned into three contiguous regions:
//!
//! ```text
//! order: [ live slots, dense order | free slots | retired slots ]
//!          0 .. len                  len .. usable  usable .. capacity
//! ```
//!
//! The live region doubles as the dense-to-slot back-reference: `order[i]`
//! is the slot owning dense position `i`. Because removal always compacts
//! by swapping with the last live position, the freed slot lands exactly
//! on the boundary and the free slots stay a suffix. Picking a slot for a
//! new element is therefore just `order[len]`.

/// Free-slot pool and dense-to-slot back-reference table.
pub struct HandleAllocator {
    order: Box<[u32]>,
    /// Slots whose generation is exhausted, parked at the tail of `order`.
    retired: usize,
}

impl HandleAllocator {
    /// Create an allocator for `capacity` slots.
    ///
    /// Slots are initially free in ascending order, so a fresh store hands
    /// out slots `0, 1, 2, ...`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds `u32::MAX`. `StoreConfig::validate()`
    /// rejects such capacities before an allocator is built.
    pub fn new(capacity: usize) -> Self {
        let capacity = u32::try_from(capacity).expect("capacity validated to fit u32");
        Self {
            order: (0..capacity).collect(),
            retired: 0,
        }
    }

    /// Total number of slots, including retired ones.
    pub fn capacity(&self) -> usize {
        self.order.len()
    }

    /// Number of slots that can still be occupied (capacity minus retired).
    pub fn usable(&self) -> usize {
        self.order.len() - self.retired
    }

    /// Number of retired slots.
    pub fn retired(&self) -> usize {
        self.retired
    }

    /// The slot the next insertion should claim, given `len` live elements.
    ///
    /// Returns `None` when every usable slot is occupied.
    pub fn next_free(&self, len: usize) -> Option<u32> {
        if len < self.usable() {
            Some(self.order[len])
        } else {
            None
        }
    }

    /// The slot recorded at dense position `pos`.
    pub fn slot_at(&self, pos: usize) -> Option<u32> {
        self.order.get(pos).copied()
    }

    /// Free the slot at dense position `pos` when `last` is the final live
    /// position.
    ///
    /// The freed slot is exchanged with the one at `last`, which puts it on
    /// the free boundary once the live count drops. Returns the slot that
    /// moved into `pos`, or `None` if `pos` was already the last position.
    pub fn release(&mut self, pos: usize, last: usize) -> Option<u32> {
        if pos == last {
            return None;
        }
        self.order.swap(pos, last);
        Some(self.order[pos])
    }

    /// Park the free slot at `pos` in the retired region.
    ///
    /// `pos` must lie in the free region. The slot is exchanged with the
    /// last usable position and the usable range shrinks by one.
    pub fn retire(&mut self, pos: usize) {
        let tail = self.usable() - 1;
        debug_assert!(pos <= tail, "retire position {pos} beyond usable range");
        self.order.swap(pos, tail);
        self.retired += 1;
    }

    /// Back-references for the first `len` positions.
    pub fn live(&self, len: usize) -> &[u32] {
        &self.order[..len]
    }

    /// The whole permutation, for invariant checks.
    pub fn order(&self) -> &[u32] {
        &self.order
    }
}
