//! Configuration Module - Heap Layout Parameters
//!
//! Holds the handful of constants that fully determine the size of the
//! collector's auxiliary structures. The value is immutable and passed
//! explicitly to every calculation.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result, Violation};
use crate::util::constants::{
    BITS_PER_BYTE, DEFAULT_CARD_SIZE, DEFAULT_HEAP_SIZE, DEFAULT_OBJECT_ALIGNMENT,
    DEFAULT_REGION_SIZE,
};
use crate::util::parse_size;

/// Heap layout configuration
///
/// Stores the parameters the auxiliary-structure sizes derive from.
/// Every field has a default matching an 8GB heap with 4MB regions.
///
/// # Examples
///
/// ```rust
/// use hlc_layout::HeapLayoutConfig;
///
/// // 8GB heap, 4MB regions, 512 byte cards, 8 byte alignment
/// let config = HeapLayoutConfig::default();
/// assert!(config.validate().is_ok());
///
/// // 2GB heap with 1MB regions
/// let config = HeapLayoutConfig::default()
///     .with_heap_size(2 * 1024 * 1024 * 1024)
///     .with_region_size(1024 * 1024);
/// assert_eq!(config.region_count().unwrap(), 2048);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeapLayoutConfig {
    /// Heap size in bytes
    ///
    /// Must be an exact multiple of `region_size_bytes`.
    /// Default: 8GB
    pub heap_size_bytes: u64,

    /// Region size in bytes
    ///
    /// Power of two, exact multiple of `card_size_bytes`.
    /// Default: 4MB
    pub region_size_bytes: u64,

    /// Card size in bytes
    ///
    /// One card table byte covers this much heap.
    /// Default: 512 bytes
    pub card_size_bytes: u64,

    /// Minimum object alignment in bytes
    ///
    /// One mark bit covers `object_alignment_bytes * 8` bytes of heap.
    /// Default: 8 bytes
    pub object_alignment_bytes: u64,
}

impl Default for HeapLayoutConfig {
    fn default() -> Self {
        HeapLayoutConfig {
            heap_size_bytes: DEFAULT_HEAP_SIZE,
            region_size_bytes: DEFAULT_REGION_SIZE,
            card_size_bytes: DEFAULT_CARD_SIZE,
            object_alignment_bytes: DEFAULT_OBJECT_ALIGNMENT,
        }
    }
}

impl HeapLayoutConfig {
    /// Create a configuration with default card size and alignment
    pub fn new(heap_size_bytes: u64, region_size_bytes: u64) -> Self {
        HeapLayoutConfig {
            heap_size_bytes,
            region_size_bytes,
            ..Default::default()
        }
    }

    pub fn with_heap_size(mut self, bytes: u64) -> Self {
        self.heap_size_bytes = bytes;
        self
    }

    pub fn with_region_size(mut self, bytes: u64) -> Self {
        self.region_size_bytes = bytes;
        self
    }

    pub fn with_card_size(mut self, bytes: u64) -> Self {
        self.card_size_bytes = bytes;
        self
    }

    pub fn with_object_alignment(mut self, bytes: u64) -> Self {
        self.object_alignment_bytes = bytes;
        self
    }

    /// Validate configuration
    ///
    /// Checks the rules in order: every field positive, sizes that must
    /// be powers of two are, region divides by card, heap divides by
    /// region. Returns the first violation found.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hlc_layout::HeapLayoutConfig;
    ///
    /// let config = HeapLayoutConfig::default().with_card_size(500);
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("heap_size_bytes", self.heap_size_bytes),
            ("region_size_bytes", self.region_size_bytes),
            ("card_size_bytes", self.card_size_bytes),
            ("object_alignment_bytes", self.object_alignment_bytes),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(LayoutError::invalid(field, Violation::Zero));
            }
        }

        let pow2 = [
            ("region_size_bytes", self.region_size_bytes),
            ("card_size_bytes", self.card_size_bytes),
            ("object_alignment_bytes", self.object_alignment_bytes),
        ];
        for (field, value) in pow2 {
            if !value.is_power_of_two() {
                return Err(LayoutError::invalid(field, Violation::NotPowerOfTwo { value }));
            }
        }

        if self.region_size_bytes % self.card_size_bytes != 0 {
            return Err(LayoutError::invalid(
                "region_size_bytes",
                Violation::NotMultiple {
                    value: self.region_size_bytes,
                    divisor_field: "card_size_bytes",
                    divisor: self.card_size_bytes,
                },
            ));
        }

        if self.heap_size_bytes % self.region_size_bytes != 0 {
            return Err(LayoutError::invalid(
                "heap_size_bytes",
                Violation::NotMultiple {
                    value: self.heap_size_bytes,
                    divisor_field: "region_size_bytes",
                    divisor: self.region_size_bytes,
                },
            ));
        }

        if self.object_alignment_bytes.checked_mul(BITS_PER_BYTE).is_none() {
            return Err(LayoutError::invalid(
                "object_alignment_bytes",
                Violation::Overflow,
            ));
        }

        Ok(())
    }

    /// Number of regions, `heap / region`
    pub fn region_count(&self) -> Result<u64> {
        self.validate()?;
        Ok(self.heap_size_bytes / self.region_size_bytes)
    }

    /// Number of cards in one region, `region / card`
    pub fn cards_per_region(&self) -> Result<u64> {
        self.validate()?;
        Ok(self.region_size_bytes / self.card_size_bytes)
    }

    /// Bytes of heap covered by one mark bit, `alignment * 8`
    pub fn mark_distance_bytes(&self) -> Result<u64> {
        self.validate()?;
        Ok(self.object_alignment_bytes * BITS_PER_BYTE)
    }

    /// `log2(region_size_bytes)`
    pub fn log_region_size(&self) -> Result<u32> {
        self.validate()?;
        Ok(self.region_size_bytes.trailing_zeros())
    }

    /// `log2(card_size_bytes)`
    pub fn log_card_size(&self) -> Result<u32> {
        self.validate()?;
        Ok(self.card_size_bytes.trailing_zeros())
    }

    /// Build configuration from environment variables
    ///
    /// Overrides defaults with environment variables, each accepting a
    /// size string such as `8g` or `4194304`:
    /// - HLC_HEAP_SIZE
    /// - HLC_REGION_SIZE
    /// - HLC_CARD_SIZE
    /// - HLC_OBJECT_ALIGNMENT
    ///
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        let vars: [(&str, &mut u64); 4] = [
            ("HLC_HEAP_SIZE", &mut config.heap_size_bytes),
            ("HLC_REGION_SIZE", &mut config.region_size_bytes),
            ("HLC_CARD_SIZE", &mut config.card_size_bytes),
            ("HLC_OBJECT_ALIGNMENT", &mut config.object_alignment_bytes),
        ];

        for (name, slot) in vars {
            if let Ok(val) = std::env::var(name) {
                match parse_size(&val) {
                    Ok(size) => *slot = size,
                    Err(e) => log::warn!("Ignoring {}={}: {}", name, val, e),
                }
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::constants::{GB, MB};

    #[test]
    fn test_default_config() {
        let config = HeapLayoutConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.heap_size_bytes, 8 * GB);
        assert_eq!(config.region_size_bytes, 4 * MB);
        assert_eq!(config.card_size_bytes, 512);
        assert_eq!(config.object_alignment_bytes, 8);
    }

    #[test]
    fn test_derived_values() {
        let config = HeapLayoutConfig::default();
        assert_eq!(config.region_count().unwrap(), 2048);
        assert_eq!(config.cards_per_region().unwrap(), 8192);
        assert_eq!(config.mark_distance_bytes().unwrap(), 64);
        assert_eq!(config.log_region_size().unwrap(), 22);
        assert_eq!(config.log_card_size().unwrap(), 9);
    }

    #[test]
    fn test_zero_heap() {
        let config = HeapLayoutConfig::default().with_heap_size(0);
        assert_eq!(
            config.validate(),
            Err(LayoutError::invalid("heap_size_bytes", Violation::Zero))
        );
    }

    #[test]
    fn test_region_not_power_of_two() {
        let config = HeapLayoutConfig::new(6 * MB * 10, 6 * MB);
        assert_eq!(
            config.validate(),
            Err(LayoutError::invalid(
                "region_size_bytes",
                Violation::NotPowerOfTwo { value: 6 * MB }
            ))
        );
    }

    #[test]
    fn test_region_smaller_than_card() {
        let config = HeapLayoutConfig::new(4096, 256);
        assert_eq!(
            config.validate(),
            Err(LayoutError::invalid(
                "region_size_bytes",
                Violation::NotMultiple {
                    value: 256,
                    divisor_field: "card_size_bytes",
                    divisor: 512,
                }
            ))
        );
    }

    #[test]
    fn test_heap_not_region_multiple() {
        let config = HeapLayoutConfig::default().with_heap_size(8 * GB + MB);
        let err = config.region_count().unwrap_err();
        assert_eq!(
            err,
            LayoutError::invalid(
                "heap_size_bytes",
                Violation::NotMultiple {
                    value: 8 * GB + MB,
                    divisor_field: "region_size_bytes",
                    divisor: 4 * MB,
                }
            )
        );
    }

    #[test]
    fn test_toml_defaults_fill_missing_fields() {
        let config: HeapLayoutConfig = toml::from_str("heap_size_bytes = 2147483648").unwrap();
        assert_eq!(config.heap_size_bytes, 2 * GB);
        assert_eq!(config.region_size_bytes, 4 * MB);
    }
}
