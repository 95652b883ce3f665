//! Fixed-capacity packed storage with generational handles.
//!
//! A [`PackedStore`] keeps its elements in a hole-free prefix of one
//! contiguous array while handing callers stable [`Handle`]s. Lookup,
//! insertion and removal are O(1); iteration is a plain slice walk.
//!
//! # Architecture
//!
//! ```text
//! PackedStore<T>
//! ├── IndexTable       slot → (dense position, generation)
//! ├── HandleAllocator  dense position → slot, free slots as a suffix
//! ├── Vec<T>           payloads in [0, len), never reallocated
//! └── StoreMetrics     cumulative counters
//! ```
//!
//! # Handles
//!
//! A handle is a slot number plus the generation the slot carried when the
//! element was inserted. Removing an element bumps its slot's generation,
//! so every handle previously issued for that slot stops resolving. A slot
//! whose generation reaches `u32::MAX` is retired instead of wrapping.
//!
//! # Errors
//!
//! Only two things can go wrong at runtime: the store is full
//! ([`StoreError::CapacityExceeded`]) or a handle no longer names a live
//! element ([`StoreError::StaleHandle`]). Neither panics.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod allocator;
pub mod config;
pub mod index;
pub mod iter;
pub mod metrics;
pub mod store;

// Public re-exports for the primary API surface.
pub use config::{ConfigError, StoreConfig};
pub use densepack_core::{Handle, StoreError};
pub use iter::{Entries, EntriesMut, Iter, IterMut};
pub use metrics::StoreMetrics;
pub use store::PackedStore;
