//! Iterators over a packed store.
//!
//! Plain element iteration is a slice walk over the dense prefix.
//! [`Entries`] and [`EntriesMut`] additionally pair each element with its
//! handle, recovered through the dense-to-slot back-reference.
//!
//! All of them yield elements in current dense order. That order changes
//! whenever an element other than the last one is removed.

use std::iter::FusedIterator;

use densepack_core::Handle;

use crate::index::IndexTable;

/// Iterator over shared references in dense order.
pub type Iter<'a, T> = std::slice::Iter<'a, T>;

/// Iterator over mutable references in dense order.
pub type IterMut<'a, T> = std::slice::IterMut<'a, T>;

/// Iterator over `(Handle, &T)` pairs in dense order.
pub struct Entries<'a, T> {
    slots: std::slice::Iter<'a, u32>,
    values: std::slice::Iter<'a, T>,
    index: &'a IndexTable,
}

impl<'a, T> Entries<'a, T> {
    pub(crate) fn new(slots: &'a [u32], values: &'a [T], index: &'a IndexTable) -> Self {
        debug_assert_eq!(slots.len(), values.len());
        Self {
            slots: slots.iter(),
            values: values.iter(),
            index,
        }
    }
}

impl<'a, T> Iterator for Entries<'a, T> {
    type Item = (Handle, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = *self.slots.next()?;
        let value = self.values.next()?;
        let handle = Handle::from_raw_parts(slot, self.index.generation(slot));
        Some((handle, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl<T> ExactSizeIterator for Entries<'_, T> {}
impl<T> FusedIterator for Entries<'_, T> {}

/// Iterator over `(Handle, &mut T)` pairs in dense order.
pub struct EntriesMut<'a, T> {
    slots: std::slice::Iter<'a, u32>,
    values: std::slice::IterMut<'a, T>,
    index: &'a IndexTable,
}

impl<'a, T> EntriesMut<'a, T> {
    pub(crate) fn new(slots: &'a [u32], values: &'a mut [T], index: &'a IndexTable) -> Self {
        debug_assert_eq!(slots.len(), values.len());
        Self {
            slots: slots.iter(),
            values: values.iter_mut(),
            index,
        }
    }
}

impl<'a, T> Iterator for EntriesMut<'a, T> {
    type Item = (Handle, &'a mut T);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = *self.slots.next()?;
        let value = self.values.next()?;
        let handle = Handle::from_raw_parts(slot, self.index.generation(slot));
        Some((handle, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl<T> ExactSizeIterator for EntriesMut<'_, T> {}
impl<T> FusedIterator for EntriesMut<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_pair_slots_with_current_generation() {
        let mut index = IndexTable::new(3);
        index.bind(2, 0);
        index.bind(0, 1);
        let _ = index.unbind(0);
        index.bind(0, 1);
        let slots = [2u32, 0];
        let values = ["c", "a"];
        let got: Vec<_> = Entries::new(&slots, &values, &index).collect();
        assert_eq!(
            got,
            vec![
                (Handle::from_raw_parts(2, 0), &"c"),
                (Handle::from_raw_parts(0, 1), &"a"),
            ]
        );
    }

    #[test]
    fn entries_report_exact_len() {
        let index = IndexTable::new(2);
        let slots = [0u32, 1];
        let values = [1, 2];
        let it = Entries::new(&slots, &values, &index);
        assert_eq!(it.len(), 2);
    }

    #[test]
    fn entries_mut_allow_in_place_update() {
        let index = IndexTable::new(2);
        let slots = [1u32, 0];
        let mut values = [10, 20];
        for (handle, v) in EntriesMut::new(&slots, &mut values, &index) {
            *v += handle.slot() as i32;
        }
        assert_eq!(values, [11, 20]);
    }
}
