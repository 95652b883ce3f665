//! Error types for packed store operations.
//!
//! There are exactly two runtime failure modes: the store is full, or a
//! handle does not name a live element. Both are returned to the caller;
//! neither is ever raised as a panic.

use std::error::Error;
use std::fmt;

use crate::handle::Handle;

/// Errors returned by packed store operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// Insertion attempted while every usable slot is occupied.
    CapacityExceeded {
        /// Number of slots the store can currently hold.
        capacity: usize,
    },
    /// The handle does not resolve to a live element.
    ///
    /// Covers handles whose element was removed, handles whose slot was
    /// never issued, and slot numbers outside the store. These cases are
    /// deliberately not distinguished.
    StaleHandle {
        /// The handle that failed to resolve.
        handle: Handle,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded { capacity } => {
                write!(f, "store capacity exceeded: all {capacity} slots occupied")
            }
            Self::StaleHandle { handle } => {
                write!(f, "stale or unknown handle {handle}")
            }
        }
    }
}

impl Error for StoreError {}
