//! densepack: fixed-capacity packed storage addressed by generational handles.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the densepack sub-crates. For most users, adding `densepack` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use densepack::prelude::*;
//!
//! let mut meshes: PackedStore<u32> = PackedStore::with_capacity(4).unwrap();
//! let a = meshes.insert(10).unwrap();
//! let b = meshes.insert(20).unwrap();
//! let c = meshes.insert(30).unwrap();
//!
//! // Removing `a` moves the last element into its place.
//! assert_eq!(meshes.remove(a), Ok(10));
//! assert_eq!(meshes.as_slice(), &[30, 20]);
//!
//! // Surviving handles still resolve; the removed one reports an error.
//! assert_eq!(meshes.get(b), Ok(&20));
//! assert_eq!(meshes.get(c), Ok(&30));
//! assert!(matches!(meshes.get(a), Err(StoreError::StaleHandle { .. })));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `densepack-core` | `Handle`, `StoreError` |
//! | [`store`] | `densepack-store` | `PackedStore`, config, iterators, metrics |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Handle and error types (`densepack-core`).
pub use densepack_core as types;

/// Packed store, configuration, iterators and metrics (`densepack-store`).
pub use densepack_store as store;

/// Common imports for typical usage.
///
/// ```rust
/// use densepack::prelude::*;
/// ```
pub mod prelude {
    pub use densepack_core::{Handle, StoreError};
    pub use densepack_store::{ConfigError, PackedStore, StoreConfig, StoreMetrics};
}
