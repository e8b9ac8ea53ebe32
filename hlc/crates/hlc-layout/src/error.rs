//! Error Module - Layout Error Types
//!
//! Every calculator operation fails with the same kind of error:
//! an invalid configuration. The remaining variants belong to the
//! helper modules (size parsing, compressed oops).
//!
//! # Error Categories
//!
//! ## Configuration Errors
//! - `InvalidConfiguration` - a field breaks a divisibility, power-of-two
//!   or range rule
//!
//! ## Input Errors
//! - `InvalidSize` - a size string such as `"8g"` could not be parsed
//! - `AddressOutOfRange` - address outside the compressed-oop heap
//! - `MisalignedAddress` - address between two object boundaries

use thiserror::Error;

/// The rule a configuration field broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Violation {
    /// Field must be strictly positive
    #[error("must be greater than 0")]
    Zero,

    /// Field must be a power of two
    #[error("{value} is not a power of two")]
    NotPowerOfTwo { value: u64 },

    /// Field must divide evenly by another field
    #[error("{value} is not a multiple of {divisor_field} ({divisor})")]
    NotMultiple {
        value: u64,
        divisor_field: &'static str,
        divisor: u64,
    },

    /// Field must be aligned to an alignment unit
    #[error("{value:#x} is not aligned to {alignment} bytes")]
    Misaligned { value: u64, alignment: u64 },

    /// Field exceeds an upper bound
    #[error("{value} exceeds the maximum of {max}")]
    TooLarge { value: u64, max: u64 },

    /// Derived value does not fit in 64 bits
    #[error("derived size overflows 64 bits")]
    Overflow,
}

/// Main error type for all layout operations
///
/// # Examples
///
/// ```rust
/// use hlc_layout::{HeapLayoutConfig, LayoutError, calculator};
///
/// let config = HeapLayoutConfig::default().with_heap_size(1000);
/// match calculator::region_count(&config) {
///     Err(LayoutError::InvalidConfiguration { field, .. }) => {
///         assert_eq!(field, "heap_size_bytes");
///     }
///     other => panic!("unexpected: {:?}", other),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Configuration breaks an invariant
    ///
    /// **When returned:** heap not a multiple of region size, region size
    /// not a multiple of card size, or a size that must be a power of two
    /// is not.
    ///
    /// **Recovery strategy:** none, report the configuration to the user
    #[error("Invalid configuration: {field} {violation}")]
    InvalidConfiguration {
        field: &'static str,
        violation: Violation,
    },

    /// Size string could not be parsed
    #[error("Invalid size: {0}")]
    InvalidSize(String),

    /// Address lies outside the heap covered by compressed oops
    #[error("Address {address:#x} out of range [{start:#x}, {end:#x})")]
    AddressOutOfRange { address: u64, start: u64, end: u64 },

    /// Address is not aligned to the object alignment
    #[error("Address {address:#x} is not aligned to {alignment} bytes")]
    MisalignedAddress { address: u64, alignment: u64 },
}

impl LayoutError {
    /// Shorthand for an `InvalidConfiguration` error
    pub fn invalid(field: &'static str, violation: Violation) -> Self {
        LayoutError::InvalidConfiguration { field, violation }
    }

    /// Check if this error came from configuration validation
    pub fn is_configuration(&self) -> bool {
        matches!(self, LayoutError::InvalidConfiguration { .. })
    }
}

/// Result type alias for layout operations
pub type Result<T> = std::result::Result<T, LayoutError>;
