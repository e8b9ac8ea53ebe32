//! Alignment Utilities
//!
//! Helper functions for power-of-two arithmetic on 64-bit sizes.

/// Alignment - utility for alignment operations
pub struct Alignment;

impl Alignment {
    /// Check if value is a non-zero power of two
    pub fn is_power_of_two(value: u64) -> bool {
        value.is_power_of_two()
    }

    /// Base-2 logarithm, rounded down
    ///
    /// Returns `None` for zero.
    ///
    /// # Examples
    /// ```
    /// use hlc_layout::util::Alignment;
    ///
    /// assert_eq!(Alignment::log2(4 * 1024 * 1024), Some(22));
    /// assert_eq!(Alignment::log2(3), Some(1));
    /// assert_eq!(Alignment::log2(0), None);
    /// ```
    pub fn log2(value: u64) -> Option<u32> {
        value.checked_ilog2()
    }

    /// Largest power of two that is `<= value`
    ///
    /// Returns `None` for zero.
    pub fn round_down_pow2(value: u64) -> Option<u64> {
        Self::log2(value).map(|log| 1u64 << log)
    }

    /// Align value up to boundary
    ///
    /// `alignment` must be a power of two. Returns `None` on overflow.
    ///
    /// # Examples
    /// ```
    /// use hlc_layout::util::Alignment;
    ///
    /// assert_eq!(Alignment::align_up(100, 8), Some(104));
    /// assert_eq!(Alignment::align_up(64, 8), Some(64));
    /// ```
    pub fn align_up(value: u64, alignment: u64) -> Option<u64> {
        debug_assert!(alignment.is_power_of_two());
        value
            .checked_add(alignment - 1)
            .map(|v| v & !(alignment - 1))
    }

    /// Align value down to boundary
    pub fn align_down(value: u64, alignment: u64) -> u64 {
        debug_assert!(alignment.is_power_of_two());
        value & !(alignment - 1)
    }

    /// Check if value is aligned
    pub fn is_aligned(value: u64, alignment: u64) -> bool {
        debug_assert!(alignment.is_power_of_two());
        value & (alignment - 1) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_down_pow2() {
        assert_eq!(Alignment::round_down_pow2(1), Some(1));
        assert_eq!(Alignment::round_down_pow2(5 * 1024 * 1024), Some(4 * 1024 * 1024));
        assert_eq!(Alignment::round_down_pow2(0), None);
    }

    #[test]
    fn test_align_up_overflow() {
        assert_eq!(Alignment::align_up(u64::MAX, 8), None);
        assert_eq!(Alignment::align_up(0, 8), Some(0));
    }

    #[test]
    fn test_align_down_and_is_aligned() {
        assert_eq!(Alignment::align_down(4097, 4096), 4096);
        assert!(Alignment::is_aligned(0x6_0000_0000, 8));
        assert!(!Alignment::is_aligned(0x6_0000_0004, 8));
    }
}
