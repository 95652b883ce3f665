//! Store configuration, validation, and error types.

use std::error::Error;
use std::fmt;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`StoreConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Capacity is zero; a store must hold at least one element.
    ZeroCapacity,
    /// Capacity does not fit in `u32` (slots are stored as `u32`).
    CapacityOverflow {
        /// The configured capacity.
        value: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity => write!(f, "capacity must be at least 1"),
            Self::CapacityOverflow { value } => {
                write!(f, "capacity {value} exceeds u32::MAX")
            }
        }
    }
}

impl Error for ConfigError {}

// ── StoreConfig ────────────────────────────────────────────────────

/// Configuration for a [`PackedStore`](crate::PackedStore).
///
/// Validated at construction; immutable afterwards. The store never grows
/// past `capacity`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Maximum number of live elements. Must be in `1..=u32::MAX`.
    ///
    /// Default: 256.
    pub capacity: usize,
}

impl StoreConfig {
    /// Default capacity.
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Create a config with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if u32::try_from(self.capacity).is_err() {
            return Err(ConfigError::CapacityOverflow {
                value: self.capacity,
            });
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
