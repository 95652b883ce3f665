//! Cumulative operation counters for a packed store.
//!
//! [`StoreMetrics`] is updated by mutating operations and read back by
//! callers for telemetry or assertions. The store itself never prints.

/// Cumulative counters since the store was created.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreMetrics {
    /// Successful insertions.
    pub inserts: u64,
    /// Successful removals, including those performed by `clear()`.
    pub removals: u64,
    /// Elements moved into a vacated dense position by swap compaction.
    pub relocations: u64,
    /// Insertions rejected because the store was full.
    pub capacity_rejections: u64,
    /// Stale or unknown handles passed to a mutating operation.
    pub stale_rejections: u64,
    /// Slots permanently retired after exhausting their generation.
    pub retired_slots: u32,
}
