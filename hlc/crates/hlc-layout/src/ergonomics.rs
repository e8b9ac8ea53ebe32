//! Region Size Ergonomics
//!
//! Picks a region size when the user gives none, the way the collector
//! does at startup: aim for about 2048 regions over the average of the
//! initial and maximum heap, round down to a power of two and clamp to
//! [1MB, 32MB].
//!
//! ```text
//! heap    average/2048   pow2     clamped
//! 512MB   256KB          256KB    1MB
//! 2GB     1MB            1MB      1MB
//! 8GB     4MB            4MB      4MB
//! 12GB    6MB            4MB      4MB
//! 128GB   64MB           64MB     32MB
//! ```

use crate::config::HeapLayoutConfig;
use crate::error::{LayoutError, Result, Violation};
use crate::util::constants::MB;
use crate::util::Alignment;

/// Smallest region the collector will pick: 1MB
pub const MIN_REGION_SIZE: u64 = MB;

/// Largest region the collector will pick: 32MB
pub const MAX_REGION_SIZE: u64 = 32 * MB;

/// Region count the sizing aims for
pub const TARGET_REGION_COUNT: u64 = 2048;

/// Ergonomic region size for a heap growing from `initial_heap` to `max_heap`
///
/// # Examples
/// ```
/// use hlc_layout::ergonomics::ergonomic_region_size;
///
/// const GB: u64 = 1024 * 1024 * 1024;
/// assert_eq!(ergonomic_region_size(8 * GB, 8 * GB), 4 * 1024 * 1024);
/// ```
pub fn ergonomic_region_size(initial_heap: u64, max_heap: u64) -> u64 {
    let target = region_size_target(initial_heap, max_heap).max(MIN_REGION_SIZE);

    let size = Alignment::round_down_pow2(target)
        .unwrap_or(MIN_REGION_SIZE)
        .clamp(MIN_REGION_SIZE, MAX_REGION_SIZE);

    log::debug!(
        "Ergonomic region size for heap {}..{}: {} bytes",
        initial_heap,
        max_heap,
        size
    );

    size
}

/// Per-region share of the average heap, before rounding and clamping
pub fn region_size_target(initial_heap: u64, max_heap: u64) -> u64 {
    // Halve before adding so two huge heaps cannot overflow
    let average = initial_heap / 2 + max_heap / 2 + (initial_heap % 2 + max_heap % 2) / 2;
    average / TARGET_REGION_COUNT
}

/// True when the power-of-two target fell outside [1MB, 32MB] and
/// [`ergonomic_region_size`] returned a bound instead
pub fn region_size_clamped(initial_heap: u64, max_heap: u64) -> bool {
    match Alignment::round_down_pow2(region_size_target(initial_heap, max_heap)) {
        Some(size) => !(MIN_REGION_SIZE..=MAX_REGION_SIZE).contains(&size),
        None => true,
    }
}

/// Default configuration with an ergonomically sized region
///
/// The heap is rounded up to a whole number of regions.
pub fn ergonomic_config(heap_size: u64) -> Result<HeapLayoutConfig> {
    if heap_size == 0 {
        return Err(LayoutError::invalid("heap_size_bytes", Violation::Zero));
    }

    let region_size = ergonomic_region_size(heap_size, heap_size);
    let aligned_heap = Alignment::align_up(heap_size, region_size)
        .ok_or_else(|| LayoutError::invalid("heap_size_bytes", Violation::Overflow))?;

    if aligned_heap != heap_size {
        log::debug!(
            "Heap {} rounded up to {} to fit whole regions",
            heap_size,
            aligned_heap
        );
    }

    let config = HeapLayoutConfig::new(aligned_heap, region_size);
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::constants::GB;

    #[test]
    fn test_known_heaps() {
        assert_eq!(ergonomic_region_size(8 * GB, 8 * GB), 4 * MB);
        assert_eq!(ergonomic_region_size(2 * GB, 2 * GB), MB);
        assert_eq!(ergonomic_region_size(512 * MB, 512 * MB), MB);
        assert_eq!(ergonomic_region_size(12 * GB, 12 * GB), 4 * MB);
        assert_eq!(ergonomic_region_size(64 * GB, 64 * GB), 32 * MB);
        assert_eq!(ergonomic_region_size(128 * GB, 128 * GB), 32 * MB);
    }

    #[test]
    fn test_uses_average_heap() {
        // average of 2GB and 14GB is 8GB
        assert_eq!(ergonomic_region_size(2 * GB, 14 * GB), 4 * MB);
    }

    #[test]
    fn test_extremes_do_not_overflow() {
        assert_eq!(ergonomic_region_size(0, 0), MIN_REGION_SIZE);
        assert_eq!(ergonomic_region_size(u64::MAX, u64::MAX), MAX_REGION_SIZE);
    }

    #[test]
    fn test_target_is_average_over_region_count() {
        assert_eq!(region_size_target(8 * GB, 8 * GB), 4 * MB);
        assert_eq!(region_size_target(2 * GB, 14 * GB), 4 * MB);
        // Odd halves still add up to the true average
        assert_eq!(region_size_target(4097, 4097 * 2047), 2048);
    }

    #[test]
    fn test_clamped_matches_chosen_size() {
        assert!(!region_size_clamped(8 * GB, 8 * GB));
        assert!(!region_size_clamped(2 * GB, 2 * GB));
        assert!(!region_size_clamped(64 * GB, 64 * GB));
        assert!(!region_size_clamped(127 * GB, 127 * GB));
        assert!(region_size_clamped(512 * MB, 512 * MB));
        assert!(region_size_clamped(128 * GB, 128 * GB));
        assert!(region_size_clamped(0, 0));
        assert!(region_size_clamped(u64::MAX, u64::MAX));
    }

    #[test]
    fn test_clamped_agrees_with_unclamped_pow2() {
        for heap in [MB, 300 * MB, 3 * GB, 40 * GB, 100 * GB, 1024 * GB] {
            let raw = Alignment::round_down_pow2(region_size_target(heap, heap));
            let size = ergonomic_region_size(heap, heap);
            assert_eq!(region_size_clamped(heap, heap), raw != Some(size), "heap {heap}");
        }
    }

    #[test]
    fn test_ergonomic_config_rounds_heap_up() {
        let config = ergonomic_config(100 * MB + 1).unwrap();
        assert_eq!(config.region_size_bytes, MB);
        assert_eq!(config.heap_size_bytes, 101 * MB);
        assert_eq!(config.region_count().unwrap(), 101);
    }

    #[test]
    fn test_ergonomic_config_eight_gb() {
        let config = ergonomic_config(8 * GB).unwrap();
        assert_eq!(config, HeapLayoutConfig::default());
    }

    #[test]
    fn test_ergonomic_config_zero() {
        assert!(ergonomic_config(0).unwrap_err().is_configuration());
    }
}
