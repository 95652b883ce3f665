//! Reference model for model-based store tests.
//!
//! [`ReferenceModel`] tracks which handles should be live and what they
//! should hold, using an `IndexMap` so iteration over the model is
//! deterministic for a given operation sequence. [`replay`] drives a real
//! [`PackedStore`] and the model side by side and reports the first
//! divergence.

use std::fmt::Debug;

use densepack_core::{Handle, StoreError};
use densepack_store::PackedStore;
use indexmap::IndexMap;

/// One scripted store operation.
///
/// Indices select among the model's live (or dead) handles modulo their
/// count, so any `usize` is a valid pick.
#[derive(Clone, Debug)]
pub enum Op<T> {
    /// Insert a value.
    Insert(T),
    /// Remove the live handle at this pick.
    Remove(usize),
    /// Remove a previously removed handle; must be rejected.
    RemoveStale(usize),
    /// Overwrite the value behind the live handle at this pick.
    Set(usize, T),
    /// Remove everything.
    Clear,
}

/// Expected state of a packed store.
pub struct ReferenceModel<T> {
    capacity: usize,
    live: IndexMap<Handle, T>,
    dead: Vec<Handle>,
}

impl<T: Clone + PartialEq + Debug> ReferenceModel<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            live: IndexMap::new(),
            dead: Vec::new(),
        }
    }

    /// Handles that should currently resolve, in insertion order.
    pub fn live(&self) -> impl Iterator<Item = (&Handle, &T)> {
        self.live.iter()
    }

    /// Handles that must never resolve again.
    pub fn dead(&self) -> &[Handle] {
        &self.dead
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    fn pick_live(&self, pick: usize) -> Option<Handle> {
        if self.live.is_empty() {
            return None;
        }
        self.live.get_index(pick % self.live.len()).map(|(h, _)| *h)
    }

    fn pick_dead(&self, pick: usize) -> Option<Handle> {
        if self.dead.is_empty() {
            return None;
        }
        Some(self.dead[pick % self.dead.len()])
    }

    /// Apply `op` to both `store` and the model.
    pub fn apply(&mut self, store: &mut PackedStore<T>, op: &Op<T>) -> Result<(), String> {
        match op {
            Op::Insert(value) => match store.insert(value.clone()) {
                Ok(handle) => {
                    if self.live.len() >= self.capacity {
                        return Err(format!("insert succeeded at capacity {}", self.capacity));
                    }
                    if self.dead.contains(&handle) || self.live.contains_key(&handle) {
                        return Err(format!("insert reissued handle {handle}"));
                    }
                    self.live.insert(handle, value.clone());
                }
                Err(StoreError::CapacityExceeded { .. }) if self.live.len() == self.capacity => {}
                Err(e) => return Err(format!("unexpected insert error: {e}")),
            },
            Op::Remove(pick) => {
                let Some(handle) = self.pick_live(*pick) else {
                    return Ok(());
                };
                let expected = self.live.shift_remove(&handle);
                let got = store
                    .remove(handle)
                    .map_err(|e| format!("remove {handle} failed: {e}"))?;
                if expected.as_ref() != Some(&got) {
                    return Err(format!("remove {handle}: expected {expected:?}, got {got:?}"));
                }
                self.dead.push(handle);
            }
            Op::RemoveStale(pick) => {
                let Some(handle) = self.pick_dead(*pick) else {
                    return Ok(());
                };
                match store.remove(handle) {
                    Err(StoreError::StaleHandle { handle: h }) if h == handle => {}
                    other => return Err(format!("stale remove {handle} gave {other:?}")),
                }
            }
            Op::Set(pick, value) => {
                let Some(handle) = self.pick_live(*pick) else {
                    return Ok(());
                };
                let slot = store
                    .get_mut(handle)
                    .map_err(|e| format!("get_mut {handle} failed: {e}"))?;
                *slot = value.clone();
                self.live.insert(handle, value.clone());
            }
            Op::Clear => {
                store.clear();
                self.dead.extend(self.live.drain(..).map(|(h, _)| h));
            }
        }
        Ok(())
    }

    /// Compare `store` against the model.
    pub fn check(&self, store: &PackedStore<T>) -> Result<(), String> {
        store.validate()?;
        if store.len() != self.live.len() {
            return Err(format!(
                "store holds {} elements, model {}",
                store.len(),
                self.live.len()
            ));
        }
        for (handle, expected) in &self.live {
            match store.get(*handle) {
                Ok(got) if got == expected => {}
                other => return Err(format!("get {handle}: expected {expected:?}, got {other:?}")),
            }
        }
        for handle in &self.dead {
            if store.contains(*handle) {
                return Err(format!("dead handle {handle} still resolves"));
            }
        }
        for (pos, (handle, value)) in store.entries().enumerate() {
            if store.index_of(handle) != Ok(pos) {
                return Err(format!("entry {pos} handle {handle} resolves elsewhere"));
            }
            if self.live.get(&handle) != Some(value) {
                return Err(format!("entry {pos} {handle} => {value:?} not in model"));
            }
        }
        Ok(())
    }
}

/// Replay `ops` against a fresh store of `capacity`, checking after each.
///
/// Returns the store and model on success so callers can make further
/// assertions about the final state.
pub fn replay<T: Clone + PartialEq + Debug>(
    capacity: usize,
    ops: &[Op<T>],
) -> Result<(PackedStore<T>, ReferenceModel<T>), String> {
    let mut store = PackedStore::with_capacity(capacity).map_err(|e| e.to_string())?;
    let mut model = ReferenceModel::new(capacity);
    for (i, op) in ops.iter().enumerate() {
        model
            .apply(&mut store, op)
            .map_err(|e| format!("op {i} {op:?}: {e}"))?;
        model
            .check(&store)
            .map_err(|e| format!("after op {i} {op:?}: {e}"))?;
    }
    Ok((store, model))
}
