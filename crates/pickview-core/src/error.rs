//! Error types for pickview-core.

use thiserror::Error;

/// The main error type for picking operations.
#[derive(Error, Debug)]
pub enum PickError {
    /// The point count does not fit the 24-bit color-ID address space.
    #[error("point count {count} exceeds the color-ID address space (max {max})")]
    AddressSpaceExceeded { count: usize, max: usize },
}

/// A specialized Result type for picking operations.
pub type Result<T> = std::result::Result<T, PickError>;
