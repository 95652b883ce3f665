//! Benchmark profiles and utilities for the densepack store.
//!
//! - [`filled_store`]: a store of [`Mesh`] filled to a given occupancy
//! - [`churn_order`]: deterministic removal order for churn benchmarks

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use densepack_core::Handle;
use densepack_store::PackedStore;
pub use densepack_test_utils::Mesh;

/// Reference capacity used by the benchmarks (10K elements).
pub const REFERENCE_CAPACITY: usize = 10_000;

/// Build a store of `capacity` and insert `count` meshes.
///
/// Returns the store and the handles in insertion order.
///
/// # Panics
///
/// Panics if `capacity` is zero or `count > capacity`.
pub fn filled_store(capacity: usize, count: usize) -> (PackedStore<Mesh>, Vec<Handle>) {
    let mut store = PackedStore::with_capacity(capacity).unwrap();
    let handles = (0..count)
        .map(|i| store.insert(Mesh::new(i as i32)).unwrap())
        .collect();
    (store, handles)
}

/// A deterministic permutation of `0..n` for removal order.
///
/// Uses a fixed odd stride so consecutive removals land far apart in dense
/// order, forcing a relocation on nearly every removal.
pub fn churn_order(n: usize) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }
    let stride = largest_coprime_stride(n);
    (0..n).map(|i| (i * stride) % n).collect()
}

fn largest_coprime_stride(n: usize) -> usize {
    let mut stride = (n / 2) | 1;
    while gcd(stride, n) != 1 {
        stride += 2;
    }
    stride
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}
