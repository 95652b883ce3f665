//! The packed store: dense payload array plus handle translation.
//!
//! [`PackedStore`] ties together the [`IndexTable`] (slot to dense
//! position), the [`HandleAllocator`] (free slots and dense to slot), and a
//! `Vec<T>` holding the payloads. After every operation the payloads occupy
//! positions `[0, len)` with no gaps.
//!
//! Removal compacts in O(1) by moving the last element into the vacated
//! position (swap-remove) and re-binding that element's slot. This is why
//! iteration order is not stable across removals.

use std::fmt;

use densepack_core::{Handle, StoreError};

use crate::allocator::HandleAllocator;
use crate::config::{ConfigError, StoreConfig};
use crate::index::{IndexTable, Unbound};
use crate::iter::{Entries, EntriesMut, Iter, IterMut};
use crate::metrics::StoreMetrics;

/// Fixed-capacity contiguous storage addressed by generational handles.
///
/// # Ownership and threading
///
/// The store has a single owner. Every mutation takes `&mut self` and
/// touches the index and the payload array together, so there is no
/// internal locking. To share a store across threads, put the whole store
/// behind one `Mutex` or `RwLock`.
///
/// # Iteration order
///
/// [`iter()`](Self::iter) walks the dense array. Removing any element other
/// than the last one moves the last element into its place, so callers must
/// not rely on traversal order surviving a removal.
pub struct PackedStore<T> {
    config: StoreConfig,
    index: IndexTable,
    allocator: HandleAllocator,
    /// Payloads, always exactly `len` long. Never reallocates.
    dense: Vec<T>,
    metrics: StoreMetrics,
}

impl<T> PackedStore<T> {
    /// Create an empty store from a validated config.
    pub fn new(config: StoreConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let capacity = config.capacity;
        Ok(Self {
            config,
            index: IndexTable::new(capacity),
            allocator: HandleAllocator::new(capacity),
            dense: Vec::with_capacity(capacity),
            metrics: StoreMetrics::default(),
        })
    }

    /// Create an empty store holding at most `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Result<Self, ConfigError> {
        Self::new(StoreConfig::new(capacity))
    }

    // ── Mutation ───────────────────────────────────────────────────

    /// Insert `value` and return the handle that names it.
    ///
    /// Fails with [`StoreError::CapacityExceeded`] when every usable slot
    /// is occupied; the store is left unchanged in that case.
    pub fn insert(&mut self, value: T) -> Result<Handle, StoreError> {
        let len = self.dense.len();
        let Some(slot) = self.allocator.next_free(len) else {
            self.metrics.capacity_rejections += 1;
            return Err(StoreError::CapacityExceeded {
                capacity: self.allocator.usable(),
            });
        };
        let generation = self.index.generation(slot);
        self.dense.push(value);
        // len < capacity <= u32::MAX.
        self.index.bind(slot, len as u32);
        self.metrics.inserts += 1;
        Ok(Handle::from_raw_parts(slot, generation))
    }

    /// Remove the element named by `handle` and return it.
    ///
    /// The last element in dense order moves into the vacated position.
    /// `handle` never resolves again afterwards, even once its slot is
    /// reused by a later insertion.
    pub fn remove(&mut self, handle: Handle) -> Result<T, StoreError> {
        let dense = self.resolve_counted(handle)?;
        Ok(self.remove_at(handle.slot(), dense))
    }

    /// Remove every element, invalidating all outstanding handles.
    pub fn clear(&mut self) {
        for pos in (0..self.dense.len()).rev() {
            let slot = self.allocator.live(pos + 1)[pos];
            drop(self.remove_at(slot, pos));
        }
    }

    fn remove_at(&mut self, slot: u32, dense: usize) -> T {
        let last = self.dense.len() - 1;
        let value = self.dense.swap_remove(dense);
        if let Some(moved) = self.allocator.release(dense, last) {
            // dense < last < capacity <= u32::MAX.
            self.index.bind(moved, dense as u32);
            self.metrics.relocations += 1;
        }
        // The freed slot now sits at `last`, the head of the free region.
        if self.index.unbind(slot) == Unbound::Exhausted {
            self.allocator.retire(last);
            self.metrics.retired_slots += 1;
        }
        self.metrics.removals += 1;
        value
    }

    fn resolve_counted(&mut self, handle: Handle) -> Result<usize, StoreError> {
        self.index.resolve(handle).inspect_err(|_| {
            self.metrics.stale_rejections += 1;
        })
    }

    // ── Lookup ─────────────────────────────────────────────────────

    /// Borrow the element named by `handle`.
    ///
    /// The borrow ends before the next insertion or removal, either of
    /// which may relocate elements.
    pub fn get(&self, handle: Handle) -> Result<&T, StoreError> {
        let dense = self.index.resolve(handle)?;
        Ok(&self.dense[dense])
    }

    /// Mutably borrow the element named by `handle`.
    pub fn get_mut(&mut self, handle: Handle) -> Result<&mut T, StoreError> {
        let dense = self.resolve_counted(handle)?;
        Ok(&mut self.dense[dense])
    }

    /// Whether `handle` names a live element.
    pub fn contains(&self, handle: Handle) -> bool {
        self.index.resolve(handle).is_ok()
    }

    /// Current dense position of the element named by `handle`.
    ///
    /// Useful for indexing parallel arrays kept in the same order. The
    /// position is only meaningful until the next removal.
    pub fn index_of(&self, handle: Handle) -> Result<usize, StoreError> {
        self.index.resolve(handle)
    }

    /// Handle of the element at dense position `pos`, if `pos < len`.
    pub fn handle_at(&self, pos: usize) -> Option<Handle> {
        if pos >= self.dense.len() {
            return None;
        }
        let slot = self.allocator.slot_at(pos)?;
        Some(Handle::from_raw_parts(slot, self.index.generation(slot)))
    }

    // ── Iteration ──────────────────────────────────────────────────

    /// Iterate elements in current dense order.
    pub fn iter(&self) -> Iter<'_, T> {
        self.dense.iter()
    }

    /// Iterate elements mutably in current dense order.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        self.dense.iter_mut()
    }

    /// Iterate `(Handle, &T)` pairs in current dense order.
    pub fn entries(&self) -> Entries<'_, T> {
        let len = self.dense.len();
        Entries::new(self.allocator.live(len), &self.dense, &self.index)
    }

    /// Iterate `(Handle, &mut T)` pairs in current dense order.
    pub fn entries_mut(&mut self) -> EntriesMut<'_, T> {
        let len = self.dense.len();
        EntriesMut::new(self.allocator.live(len), &mut self.dense, &self.index)
    }

    /// The packed elements as one contiguous slice.
    pub fn as_slice(&self) -> &[T] {
        &self.dense
    }

    /// The packed elements as one contiguous mutable slice.
    ///
    /// Elements may be modified in place but not reordered; the slice
    /// cannot change which handle names which position.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.dense
    }

    // ── Introspection ──────────────────────────────────────────────

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Whether the store holds no elements.
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// How many more elements can be inserted right now.
    pub fn remaining(&self) -> usize {
        self.allocator.usable() - self.dense.len()
    }

    /// Number of slots retired after exhausting their generation counter.
    pub fn retired_slots(&self) -> usize {
        self.allocator.retired()
    }

    /// The configuration this store was built with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Cumulative operation counters.
    pub fn metrics(&self) -> &StoreMetrics {
        &self.metrics
    }

    /// Check every structural invariant, returning a description of the
    /// first violation found.
    pub fn validate(&self) -> Result<(), String> {
        let capacity = self.allocator.capacity();
        let len = self.dense.len();
        let usable = self.allocator.usable();
        if len > usable || usable > capacity {
            return Err(format!(
                "len {len} / usable {usable} / capacity {capacity} out of order"
            ));
        }
        if self.index.len() != capacity {
            return Err(format!(
                "index has {} slots, allocator has {capacity}",
                self.index.len()
            ));
        }

        let mut seen = vec![false; capacity];
        for (pos, &slot) in self.allocator.order().iter().enumerate() {
            let Some(flag) = seen.get_mut(slot as usize) else {
                return Err(format!("slot {slot} at position {pos} out of range"));
            };
            if std::mem::replace(flag, true) {
                return Err(format!("slot {slot} appears twice in back-references"));
            }
            let Some(entry) = self.index.entry(slot) else {
                return Err(format!("slot {slot} missing from index"));
            };
            if pos < len {
                if entry.dense != Some(pos as u32) {
                    return Err(format!(
                        "slot {slot} owns position {pos} but index says {:?}",
                        entry.dense
                    ));
                }
            } else if entry.is_occupied() {
                return Err(format!("free slot {slot} at position {pos} is occupied"));
            } else if pos >= usable && entry.generation != u32::MAX {
                return Err(format!(
                    "retired slot {slot} has reusable generation {}",
                    entry.generation
                ));
            }
        }

        let occupied = self.index.entries().filter(|(_, e)| e.is_occupied()).count();
        if occupied != len {
            return Err(format!("{occupied} occupied slots but {len} live elements"));
        }
        Ok(())
    }
}

impl<T: fmt::Debug> fmt::Debug for PackedStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

impl<'a, T> IntoIterator for &'a PackedStore<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut PackedStore<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(capacity: usize) -> PackedStore<char> {
        PackedStore::with_capacity(capacity).unwrap()
    }

    #[test]
    fn new_store_is_empty() {
        let s = store(4);
        assert!(s.is_empty());
        assert_eq!(s.len(), 0);
        assert_eq!(s.capacity(), 4);
        assert_eq!(s.remaining(), 4);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn zero_capacity_rejected() {
        assert!(matches!(
            PackedStore::<u8>::with_capacity(0),
            Err(ConfigError::ZeroCapacity)
        ));
    }

    #[test]
    fn insert_then_get_round_trip() {
        let mut s = store(4);
        let h = s.insert('x').unwrap();
        assert_eq!(s.get(h), Ok(&'x'));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn first_handles_use_ascending_slots_at_generation_zero() {
        let mut s = store(3);
        for expected in 0..3 {
            let h = s.insert('a').unwrap();
            assert_eq!(h.slot(), expected);
            assert_eq!(h.generation(), 0);
        }
    }

    #[test]
    fn insert_past_capacity_fails_without_mutation() {
        let mut s = store(2);
        let a = s.insert('a').unwrap();
        let b = s.insert('b').unwrap();
        assert_eq!(
            s.insert('c'),
            Err(StoreError::CapacityExceeded { capacity: 2 })
        );
        assert_eq!(s.as_slice(), &['a', 'b']);
        assert_eq!(s.get(a), Ok(&'a'));
        assert_eq!(s.get(b), Ok(&'b'));
        assert_eq!(s.metrics().capacity_rejections, 1);
        assert_eq!(s.metrics().inserts, 2);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn remove_middle_swaps_last_into_hole() {
        let mut s = store(5);
        let h: Vec<_> = "ABCDE".chars().map(|c| s.insert(c).unwrap()).collect();

        assert_eq!(s.remove(h[1]), Ok('B'));
        assert_eq!(s.as_slice(), &['A', 'E', 'C', 'D']);
        assert_eq!(s.get(h[4]), Ok(&'E'));
        assert_eq!(s.index_of(h[4]), Ok(1));
        assert_eq!(s.get(h[0]), Ok(&'A'));
        assert_eq!(s.get(h[1]), Err(StoreError::StaleHandle { handle: h[1] }));
        assert_eq!(s.metrics().relocations, 1);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn remove_last_moves_nothing() {
        let mut s = store(3);
        let a = s.insert('a').unwrap();
        let b = s.insert('b').unwrap();
        assert_eq!(s.remove(b), Ok('b'));
        assert_eq!(s.as_slice(), &['a']);
        assert_eq!(s.index_of(a), Ok(0));
        assert_eq!(s.metrics().relocations, 0);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn double_remove_is_stale() {
        let mut s = store(2);
        let h = s.insert('a').unwrap();
        s.remove(h).unwrap();
        assert_eq!(s.remove(h), Err(StoreError::StaleHandle { handle: h }));
        assert_eq!(s.metrics().stale_rejections, 1);
        assert_eq!(s.metrics().removals, 1);
    }

    #[test]
    fn freed_slot_is_reused_with_new_generation() {
        let mut s = store(3);
        let _a = s.insert('a').unwrap();
        let b = s.insert('b').unwrap();
        let _c = s.insert('c').unwrap();
        s.remove(b).unwrap();

        let d = s.insert('d').unwrap();
        assert_eq!(d.slot(), b.slot());
        assert_eq!(d.generation(), b.generation() + 1);
        assert_ne!(d, b);
        assert!(s.get(b).is_err());
        assert_eq!(s.get(d), Ok(&'d'));
        assert!(s.validate().is_ok());
    }

    #[test]
    fn never_issued_and_removed_handles_look_the_same() {
        let mut s = store(4);
        let h = s.insert('a').unwrap();
        s.remove(h).unwrap();
        let never = Handle::from_raw_parts(3, 0);
        let outside = Handle::from_raw_parts(1000, 0);
        assert!(matches!(s.get(h), Err(StoreError::StaleHandle { .. })));
        assert!(matches!(s.get(never), Err(StoreError::StaleHandle { .. })));
        assert!(matches!(s.get(outside), Err(StoreError::StaleHandle { .. })));
    }

    #[test]
    fn get_mut_writes_through() {
        let mut s = store(2);
        let h = s.insert('a').unwrap();
        *s.get_mut(h).unwrap() = 'z';
        assert_eq!(s.get(h), Ok(&'z'));
    }

    #[test]
    fn get_mut_stale_counts_rejection() {
        let mut s = store(2);
        assert!(s.get_mut(Handle::from_raw_parts(0, 0)).is_err());
        assert_eq!(s.metrics().stale_rejections, 1);
    }

    #[test]
    fn entries_report_live_handles() {
        let mut s = store(4);
        let a = s.insert('a').unwrap();
        let b = s.insert('b').unwrap();
        let c = s.insert('c').unwrap();
        s.remove(a).unwrap();
        let got: Vec<_> = s.entries().map(|(h, &v)| (h, v)).collect();
        assert_eq!(got, vec![(c, 'c'), (b, 'b')]);
        assert_eq!(s.handle_at(0), Some(c));
        assert_eq!(s.handle_at(2), None);
    }

    #[test]
    fn entries_mut_updates_in_place() {
        let mut s = store(3);
        s.insert('a').unwrap();
        s.insert('b').unwrap();
        for (_, v) in s.entries_mut() {
            *v = v.to_ascii_uppercase();
        }
        assert_eq!(s.as_slice(), &['A', 'B']);
    }

    #[test]
    fn clear_invalidates_everything() {
        let mut s = store(3);
        let handles: Vec<_> = "abc".chars().map(|c| s.insert(c).unwrap()).collect();
        s.clear();
        assert!(s.is_empty());
        for h in handles {
            assert!(!s.contains(h));
        }
        assert_eq!(s.metrics().removals, 3);
        assert_eq!(s.metrics().relocations, 0);
        assert!(s.validate().is_ok());
        assert!(s.insert('d').is_ok());
    }

    #[test]
    fn exhausted_generation_retires_slot() {
        let mut s = store(2);
        s.index.set_generation(0, u32::MAX);
        let h = s.insert('a').unwrap();
        assert_eq!(h.generation(), u32::MAX);
        s.remove(h).unwrap();

        assert_eq!(s.retired_slots(), 1);
        assert_eq!(s.metrics().retired_slots, 1);
        assert_eq!(s.remaining(), 1);
        assert!(s.validate().is_ok());

        let next = s.insert('b').unwrap();
        assert_eq!(next.slot(), 1);
        assert_eq!(
            s.insert('c'),
            Err(StoreError::CapacityExceeded { capacity: 1 })
        );
        assert!(s.get(h).is_err());
    }

    #[test]
    fn retiring_while_others_live_keeps_invariants() {
        let mut s = store(4);
        let a = s.insert('a').unwrap();
        let b = s.insert('b').unwrap();
        let _c = s.insert('c').unwrap();
        s.index.set_generation(a.slot(), u32::MAX);
        // Rebuild `a` with the forced generation so it resolves.
        let a = Handle::from_raw_parts(a.slot(), u32::MAX);
        s.remove(a).unwrap();
        assert!(s.validate().is_ok());
        s.remove(b).unwrap();
        assert!(s.validate().is_ok());
        assert_eq!(s.remaining(), 2);
        let d = s.insert('d').unwrap();
        let e = s.insert('e').unwrap();
        assert_ne!(d.slot(), a.slot());
        assert_ne!(e.slot(), a.slot());
        assert!(s.insert('f').is_err());
        assert!(s.validate().is_ok());
    }

    #[test]
    fn debug_lists_handles_and_values() {
        let mut s = store(2);
        s.insert('q').unwrap();
        assert_eq!(format!("{s:?}"), "{Handle { slot: 0, generation: 0 }: 'q'}");
    }

    #[test]
    fn into_iterator_for_references() {
        let mut s = store(3);
        s.insert('a').unwrap();
        s.insert('b').unwrap();
        for v in &mut s {
            *v = '-';
        }
        let collected: String = (&s).into_iter().collect();
        assert_eq!(collected, "--");
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn invariants_hold_under_random_ops(
                ops in proptest::collection::vec((any::<bool>(), 0usize..16), 1..200),
            ) {
                let mut s = PackedStore::<usize>::with_capacity(8).unwrap();
                let mut live: Vec<Handle> = Vec::new();
                let mut dead: Vec<Handle> = Vec::new();
                for (i, (is_insert, pick)) in ops.into_iter().enumerate() {
                    if is_insert {
                        match s.insert(i) {
                            Ok(h) => live.push(h),
                            Err(e) => {
                                prop_assert_eq!(live.len(), 8);
                                prop_assert_eq!(e, StoreError::CapacityExceeded { capacity: 8 });
                            }
                        }
                    } else if !live.is_empty() {
                        let h = live.swap_remove(pick % live.len());
                        prop_assert!(s.remove(h).is_ok());
                        dead.push(h);
                    }
                    prop_assert_eq!(s.validate(), Ok(()));
                    prop_assert_eq!(s.len(), live.len());
                }
                for h in &live {
                    prop_assert!(s.contains(*h));
                }
                for h in &dead {
                    prop_assert!(!s.contains(*h));
                }
            }

            #[test]
            fn generation_strictly_increases_per_slot(rounds in 1usize..50) {
                let mut s = PackedStore::<u8>::with_capacity(1).unwrap();
                let mut last: Option<Handle> = None;
                for _ in 0..rounds {
                    let h = s.insert(0).unwrap();
                    if let Some(prev) = last {
                        prop_assert_eq!(h.slot(), prev.slot());
                        prop_assert!(h.generation() > prev.generation());
                    }
                    s.remove(h).unwrap();
                    last = Some(h);
                }
            }
        }
    }
}
