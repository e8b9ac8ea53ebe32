//! Compressed Oops - 32-bit Object References
//!
//! A compressed reference stores `(address - base) >> shift` in 32 bits,
//! where `shift = log2(object alignment)`. Where the heap ends decides how
//! much of that machinery is needed:
//!
//! ```text
//! heap end <= 4GB              Unscaled    narrow = address
//! heap end <= 4GB << shift     ZeroBased   narrow = address >> shift
//! otherwise                    HeapBased   narrow = (address - base) >> shift
//!
//! Example: base 0x6_0000_0000, 8GB heap, 8 byte alignment
//!          end  0x8_0000_0000 (32GB)  ->  ZeroBased, shift 3
//! ```

use std::fmt;

use serde::Serialize;

use crate::error::{LayoutError, Result, Violation};
use crate::util::Alignment;

/// Range addressable by an unshifted 32-bit value: 4GB
pub const UNSCALED_LIMIT: u64 = 1 << 32;

/// How compressed references are decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OopMode {
    /// Heap fits below 4GB, no shift and no base
    Unscaled,
    /// Heap fits below `4GB << shift`, shift but no base
    ZeroBased,
    /// Heap ends higher, shift plus heap base
    HeapBased,
}

impl fmt::Display for OopMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OopMode::Unscaled => "unscaled",
            OopMode::ZeroBased => "zero-based",
            OopMode::HeapBased => "heap-based",
        };
        f.write_str(name)
    }
}

/// Compressed-oop geometry for one heap placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompressedOops {
    heap_base: u64,
    heap_size: u64,
    object_alignment: u64,
    mode: OopMode,
}

impl CompressedOops {
    /// Describe compressed oops for a heap at `heap_base`
    ///
    /// # Returns
    /// * `Ok(Self)` - geometry for this heap
    /// * `Err(LayoutError::InvalidConfiguration)` - alignment not a power of
    ///   two, base misaligned, heap empty, or heap larger than 32-bit
    ///   references can span
    ///
    /// # Examples
    /// ```
    /// use hlc_layout::oops::{CompressedOops, OopMode};
    ///
    /// let oops = CompressedOops::new(0x6_0000_0000, 8 << 30, 8).unwrap();
    /// assert_eq!(oops.mode(), OopMode::ZeroBased);
    /// assert_eq!(oops.shift(), 3);
    /// ```
    pub fn new(heap_base: u64, heap_size: u64, object_alignment: u64) -> Result<Self> {
        if object_alignment == 0 {
            return Err(LayoutError::invalid("object_alignment_bytes", Violation::Zero));
        }
        if !object_alignment.is_power_of_two() {
            return Err(LayoutError::invalid(
                "object_alignment_bytes",
                Violation::NotPowerOfTwo {
                    value: object_alignment,
                },
            ));
        }
        if heap_size == 0 {
            return Err(LayoutError::invalid("heap_size_bytes", Violation::Zero));
        }
        if !Alignment::is_aligned(heap_base, object_alignment) {
            return Err(LayoutError::invalid(
                "heap_base",
                Violation::Misaligned {
                    value: heap_base,
                    alignment: object_alignment,
                },
            ));
        }

        let shift = object_alignment.trailing_zeros();
        let max_heap = Self::max_heap_for_shift(shift)?;
        if heap_size > max_heap {
            return Err(LayoutError::invalid(
                "heap_size_bytes",
                Violation::TooLarge {
                    value: heap_size,
                    max: max_heap,
                },
            ));
        }

        let heap_end = heap_base
            .checked_add(heap_size)
            .ok_or_else(|| LayoutError::invalid("heap_base", Violation::Overflow))?;

        let mode = if heap_end <= UNSCALED_LIMIT {
            OopMode::Unscaled
        } else if heap_end <= max_heap {
            OopMode::ZeroBased
        } else {
            OopMode::HeapBased
        };

        Ok(CompressedOops {
            heap_base,
            heap_size,
            object_alignment,
            mode,
        })
    }

    fn max_heap_for_shift(shift: u32) -> Result<u64> {
        UNSCALED_LIMIT
            .checked_shl(shift)
            .filter(|max| max >> shift == UNSCALED_LIMIT)
            .ok_or_else(|| LayoutError::invalid("object_alignment_bytes", Violation::Overflow))
    }

    pub fn mode(&self) -> OopMode {
        self.mode
    }

    pub fn heap_base(&self) -> u64 {
        self.heap_base
    }

    pub fn heap_end(&self) -> u64 {
        self.heap_base + self.heap_size
    }

    /// Shift applied when encoding; zero in unscaled mode
    pub fn shift(&self) -> u32 {
        match self.mode {
            OopMode::Unscaled => 0,
            _ => self.object_alignment.trailing_zeros(),
        }
    }

    /// Base subtracted when encoding; non-zero only in heap-based mode
    pub fn encoding_base(&self) -> u64 {
        match self.mode {
            OopMode::HeapBased => self.heap_base,
            _ => 0,
        }
    }

    /// Largest heap 32-bit references can span at this alignment
    pub fn max_heap_size(&self) -> u64 {
        UNSCALED_LIMIT << self.object_alignment.trailing_zeros()
    }

    /// Compress an in-heap, aligned address
    pub fn encode(&self, address: u64) -> Result<u32> {
        if address < self.heap_base || address >= self.heap_end() {
            return Err(LayoutError::AddressOutOfRange {
                address,
                start: self.heap_base,
                end: self.heap_end(),
            });
        }
        if !Alignment::is_aligned(address, self.object_alignment) {
            return Err(LayoutError::MisalignedAddress {
                address,
                alignment: self.object_alignment,
            });
        }

        let narrow = (address - self.encoding_base()) >> self.shift();
        log::trace!("encode {:#x} -> {:#x} ({})", address, narrow, self.mode);

        u32::try_from(narrow).map_err(|_| LayoutError::AddressOutOfRange {
            address,
            start: self.heap_base,
            end: self.heap_end(),
        })
    }

    /// Expand a compressed reference back to an address
    pub fn decode(&self, narrow: u32) -> u64 {
        self.encoding_base() + ((narrow as u64) << self.shift())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::constants::GB;

    const BASE: u64 = 0x0000_0006_0000_0000;

    #[test]
    fn test_eight_gb_zero_based() {
        let oops = CompressedOops::new(BASE, 8 * GB, 8).unwrap();
        assert_eq!(oops.mode(), OopMode::ZeroBased);
        assert_eq!(oops.shift(), 3);
        assert_eq!(oops.heap_end(), 0x0000_0008_0000_0000);
        assert_eq!(oops.max_heap_size(), 32 * GB);
        assert_eq!(oops.encoding_base(), 0);
    }

    #[test]
    fn test_encode_addresses() {
        let oops = CompressedOops::new(BASE, 8 * GB, 8).unwrap();
        assert_eq!(oops.encode(BASE).unwrap(), 0xC000_0000);
        assert_eq!(oops.encode(BASE + 8).unwrap(), 0xC000_0001);
        assert_eq!(oops.encode(BASE + 8 * GB - 8).unwrap(), 0xFFFF_FFFF);
    }

    #[test]
    fn test_decode_inverts_encode() {
        let oops = CompressedOops::new(BASE, 8 * GB, 8).unwrap();
        for addr in [BASE, BASE + 1024 * 1024, BASE + 4 * GB, BASE + 8 * GB - 8] {
            assert_eq!(oops.decode(oops.encode(addr).unwrap()), addr);
        }
    }

    #[test]
    fn test_unscaled_low_heap() {
        let oops = CompressedOops::new(0x1000_0000, GB, 8).unwrap();
        assert_eq!(oops.mode(), OopMode::Unscaled);
        assert_eq!(oops.shift(), 0);
        assert_eq!(oops.encode(0x1000_0008).unwrap(), 0x1000_0008);
    }

    #[test]
    fn test_heap_based_high_heap() {
        let base = 0x7f00_0000_0000;
        let oops = CompressedOops::new(base, 8 * GB, 8).unwrap();
        assert_eq!(oops.mode(), OopMode::HeapBased);
        assert_eq!(oops.encode(base + 16).unwrap(), 2);
        assert_eq!(oops.decode(2), base + 16);
    }

    #[test]
    fn test_rejects_bad_geometry() {
        assert!(CompressedOops::new(BASE, 8 * GB, 12).is_err());
        assert!(CompressedOops::new(BASE + 4, 8 * GB, 8).is_err());
        assert!(CompressedOops::new(BASE, 0, 8).is_err());
        assert!(matches!(
            CompressedOops::new(BASE, 64 * GB, 8),
            Err(LayoutError::InvalidConfiguration {
                violation: Violation::TooLarge { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_overflowing_geometry() {
        assert_eq!(
            CompressedOops::new(u64::MAX - 7, 16, 8),
            Err(LayoutError::invalid("heap_base", Violation::Overflow))
        );
        assert_eq!(
            CompressedOops::new(0, GB, 1 << 32),
            Err(LayoutError::invalid("object_alignment_bytes", Violation::Overflow))
        );
    }

    #[test]
    fn test_encode_rejects_outside_and_misaligned() {
        let oops = CompressedOops::new(BASE, 8 * GB, 8).unwrap();
        assert!(matches!(
            oops.encode(BASE - 8),
            Err(LayoutError::AddressOutOfRange { .. })
        ));
        assert!(matches!(
            oops.encode(BASE + 8 * GB),
            Err(LayoutError::AddressOutOfRange { .. })
        ));
        assert!(matches!(
            oops.encode(BASE + 3),
            Err(LayoutError::MisalignedAddress { .. })
        ));
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(OopMode::ZeroBased.to_string(), "zero-based");
    }
}
