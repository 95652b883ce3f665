//! Test fixtures and reference models for densepack development.
//!
//! - [`Mesh`]: a small opaque payload standing in for per-object render data.
//! - [`ReferenceModel`]: an `IndexMap`-backed model of a packed store used
//!   to check a real store operation by operation.
//! - [`Op`] and [`replay`]: a scripted operation sequence applied to both.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod model;

pub use model::{replay, Op, ReferenceModel};

/// Dummy per-object payload.
///
/// Real meshes carry vertex and index buffers; tests only need a value
/// that identifies which instance they are looking at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Mesh {
    pub dummy: i32,
}

impl Mesh {
    pub fn new(dummy: i32) -> Self {
        Self { dummy }
    }
}
