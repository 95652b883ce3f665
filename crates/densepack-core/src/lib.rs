//! Core types for the densepack packed store.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the opaque [`Handle`] handed out on insertion and the [`StoreError`]
//! returned by every fallible store operation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod handle;

pub use error::StoreError;
pub use handle::Handle;
