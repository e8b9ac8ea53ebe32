//! Heap Layout Calculator
//!
//! Pure derivation of auxiliary-structure sizes from a [`HeapLayoutConfig`].
//!
//! Structures sized here:
//! ```text
//! Heap: 8GB, card 512B, alignment 8B
//!
//! Card table         1 byte per card         8GB / 512       = 16MB
//! Block offset table shadows the card table  8GB / 512       = 16MB
//! Card counts table  1 byte per card         8GB / 512       = 16MB
//! Mark bitmap (x2)   1 bit per 64 bytes      8GB / 64 / 8    = 16MB each
//!                                                       total = 80MB
//! ```
//!
//! The mark bitmap is reported twice: `mark_bitmap_size_bytes` is the real
//! size (one bit per mark distance), `mark_bitmap_size_bits_as_bytes` is the
//! unconverted bit count. The second is diagnostic only and never feeds the
//! overhead totals.
//!
//! Every function validates the configuration first and fails with
//! [`LayoutError::InvalidConfiguration`] on the first broken rule.

use serde::Serialize;

use crate::config::HeapLayoutConfig;
use crate::error::{LayoutError, Result, Violation};
use crate::util::constants::{BITS_PER_BYTE, MARK_BITMAP_COUNT};

/// Number of regions in the heap
pub fn region_count(cfg: &HeapLayoutConfig) -> Result<u64> {
    cfg.region_count()
}

/// Number of cards covering one region
pub fn cards_per_region(cfg: &HeapLayoutConfig) -> Result<u64> {
    cfg.cards_per_region()
}

/// Bytes of heap represented by one mark bit
pub fn mark_distance(cfg: &HeapLayoutConfig) -> Result<u64> {
    cfg.mark_distance_bytes()
}

/// Card table size in bytes, one byte per card
pub fn card_table_size(cfg: &HeapLayoutConfig) -> Result<u64> {
    cfg.validate()?;
    Ok(cfg.heap_size_bytes / cfg.card_size_bytes)
}

/// Block offset table size in bytes
///
/// Same granularity as the card table.
pub fn block_offset_table_size(cfg: &HeapLayoutConfig) -> Result<u64> {
    card_table_size(cfg)
}

/// Card counts table size in bytes
///
/// Same granularity as the card table.
pub fn card_counts_table_size(cfg: &HeapLayoutConfig) -> Result<u64> {
    card_table_size(cfg)
}

/// Size of one mark bitmap in bytes
///
/// One bit per mark distance, converted to bytes:
/// `heap / mark_distance / 8`.
///
/// # Examples
/// ```
/// use hlc_layout::{calculator, HeapLayoutConfig};
///
/// let config = HeapLayoutConfig::default();
/// assert_eq!(calculator::mark_bitmap_size_bytes(&config).unwrap(), 16 * 1024 * 1024);
/// ```
pub fn mark_bitmap_size_bytes(cfg: &HeapLayoutConfig) -> Result<u64> {
    Ok(mark_bitmap_size_bits_as_bytes(cfg)? / BITS_PER_BYTE)
}

/// Number of mark bits, `heap / mark_distance`
///
/// Diagnostic only. This is a bit count; reading it as a byte count
/// overstates the bitmap eightfold.
pub fn mark_bitmap_size_bits_as_bytes(cfg: &HeapLayoutConfig) -> Result<u64> {
    let distance = cfg.mark_distance_bytes()?;
    Ok(cfg.heap_size_bytes / distance)
}

/// Total fixed overhead in bytes
///
/// Card table, block offset table and card counts table, plus the
/// previous and next mark bitmaps.
pub fn fixed_overhead_total(cfg: &HeapLayoutConfig) -> Result<u64> {
    let tables = [
        card_table_size(cfg)?,
        block_offset_table_size(cfg)?,
        card_counts_table_size(cfg)?,
    ];
    let bitmaps = mark_bitmap_size_bytes(cfg)?.checked_mul(MARK_BITMAP_COUNT);

    tables
        .into_iter()
        .try_fold(0u64, |acc, size| acc.checked_add(size))
        .zip(bitmaps)
        .and_then(|(tables, bitmaps)| tables.checked_add(bitmaps))
        .ok_or_else(|| LayoutError::invalid("heap_size_bytes", Violation::Overflow))
}

/// Fixed overhead as a fraction of the heap (not a percentage)
pub fn fixed_overhead_fraction(cfg: &HeapLayoutConfig) -> Result<f64> {
    let total = fixed_overhead_total(cfg)?;
    Ok(total as f64 / cfg.heap_size_bytes as f64)
}

/// Auxiliary bytes attributable to a single region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegionOverhead {
    pub card_table_bytes: u64,
    pub block_offset_table_bytes: u64,
    pub card_counts_table_bytes: u64,
    /// One bitmap's share; the total counts both bitmaps
    pub mark_bitmap_bytes: u64,
    pub total_bytes: u64,
}

/// Per-region share of the fixed overhead
pub fn region_overhead(cfg: &HeapLayoutConfig) -> Result<RegionOverhead> {
    let cards = cfg.cards_per_region()?;
    let bitmap = cfg.region_size_bytes / cfg.mark_distance_bytes()? / BITS_PER_BYTE;
    let total_bytes = cards
        .checked_mul(3)
        .zip(bitmap.checked_mul(MARK_BITMAP_COUNT))
        .and_then(|(tables, bitmaps)| tables.checked_add(bitmaps))
        .ok_or_else(|| LayoutError::invalid("region_size_bytes", Violation::Overflow))?;

    Ok(RegionOverhead {
        card_table_bytes: cards,
        block_offset_table_bytes: cards,
        card_counts_table_bytes: cards,
        mark_bitmap_bytes: bitmap,
        total_bytes,
    })
}

/// Snapshot of every derived value for one configuration
///
/// # Examples
/// ```
/// use hlc_layout::{HeapLayout, HeapLayoutConfig};
///
/// let layout = HeapLayout::compute(&HeapLayoutConfig::default()).unwrap();
/// assert_eq!(layout.region_count, 2048);
/// assert_eq!(layout.fixed_overhead_bytes, 80 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeapLayout {
    pub config: HeapLayoutConfig,
    pub region_count: u64,
    pub cards_per_region: u64,
    pub log_region_size: u32,
    pub mark_distance_bytes: u64,
    pub card_table_bytes: u64,
    pub block_offset_table_bytes: u64,
    pub card_counts_table_bytes: u64,
    pub mark_bitmap_bytes: u64,
    pub mark_bitmap_bits_as_bytes: u64,
    pub fixed_overhead_bytes: u64,
    pub fixed_overhead_fraction: f64,
    pub per_region: RegionOverhead,
}

impl HeapLayout {
    /// Compute the full layout, failing on the first invalid field
    pub fn compute(cfg: &HeapLayoutConfig) -> Result<Self> {
        let layout = HeapLayout {
            config: *cfg,
            region_count: region_count(cfg)?,
            cards_per_region: cards_per_region(cfg)?,
            log_region_size: cfg.log_region_size()?,
            mark_distance_bytes: mark_distance(cfg)?,
            card_table_bytes: card_table_size(cfg)?,
            block_offset_table_bytes: block_offset_table_size(cfg)?,
            card_counts_table_bytes: card_counts_table_size(cfg)?,
            mark_bitmap_bytes: mark_bitmap_size_bytes(cfg)?,
            mark_bitmap_bits_as_bytes: mark_bitmap_size_bits_as_bytes(cfg)?,
            fixed_overhead_bytes: fixed_overhead_total(cfg)?,
            fixed_overhead_fraction: fixed_overhead_fraction(cfg)?,
            per_region: region_overhead(cfg)?,
        };

        log::debug!(
            "Layout for {} byte heap: {} regions, {} bytes fixed overhead",
            cfg.heap_size_bytes,
            layout.region_count,
            layout.fixed_overhead_bytes
        );

        Ok(layout)
    }

    /// Fixed overhead as a percentage of the heap
    pub fn fixed_overhead_percent(&self) -> f64 {
        self.fixed_overhead_fraction * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::constants::{GB, MB};

    fn eight_gb() -> HeapLayoutConfig {
        HeapLayoutConfig::new(8 * GB, 4 * MB)
    }

    #[test]
    fn test_eight_gb_tables() {
        let cfg = eight_gb();
        assert_eq!(region_count(&cfg).unwrap(), 2048);
        assert_eq!(card_table_size(&cfg).unwrap(), 16 * MB);
        assert_eq!(block_offset_table_size(&cfg).unwrap(), 16 * MB);
        assert_eq!(card_counts_table_size(&cfg).unwrap(), 16 * MB);
    }

    #[test]
    fn test_eight_gb_bitmaps() {
        let cfg = eight_gb();
        assert_eq!(mark_distance(&cfg).unwrap(), 64);
        assert_eq!(mark_bitmap_size_bytes(&cfg).unwrap(), 16 * MB);
        assert_eq!(mark_bitmap_size_bits_as_bytes(&cfg).unwrap(), 128 * MB);
    }

    #[test]
    fn test_eight_gb_overhead() {
        let cfg = eight_gb();
        assert_eq!(fixed_overhead_total(&cfg).unwrap(), 80 * MB);

        let fraction = fixed_overhead_fraction(&cfg).unwrap();
        assert!((fraction - 0.009765625).abs() < 1e-12);
        let layout = HeapLayout::compute(&cfg).unwrap();
        assert!((layout.fixed_overhead_percent() - 0.9766).abs() < 1e-4);
    }

    #[test]
    fn test_two_gb_one_mb_regions() {
        let cfg = HeapLayoutConfig::new(2 * GB, MB);
        assert_eq!(region_count(&cfg).unwrap(), 2048);
        assert_eq!(card_table_size(&cfg).unwrap(), 4 * MB);
    }

    #[test]
    fn test_region_overhead() {
        let per_region = region_overhead(&eight_gb()).unwrap();
        assert_eq!(per_region.card_table_bytes, 8192);
        assert_eq!(per_region.mark_bitmap_bytes, 8192);
        assert_eq!(per_region.total_bytes, 5 * 8192);
        assert_eq!(per_region.total_bytes * 2048, 80 * MB);
    }

    #[test]
    fn test_region_overhead_overflow() {
        let cfg = HeapLayoutConfig {
            heap_size_bytes: 1 << 63,
            region_size_bytes: 1 << 63,
            card_size_bytes: 1,
            object_alignment_bytes: 8,
        };
        assert_eq!(
            region_overhead(&cfg),
            Err(LayoutError::invalid("region_size_bytes", Violation::Overflow))
        );
    }

    #[test]
    fn test_invalid_config_propagates() {
        let cfg = eight_gb().with_heap_size(8 * GB + 512);
        assert!(card_table_size(&cfg).unwrap_err().is_configuration());
        assert!(fixed_overhead_total(&cfg).is_err());
        assert!(HeapLayout::compute(&cfg).is_err());
    }

    #[test]
    fn test_bitmap_truncates_small_heap() {
        // 4KB heap / 64 = 64 bits = 8 bytes
        let cfg = HeapLayoutConfig::new(4096, 4096);
        assert_eq!(mark_bitmap_size_bits_as_bytes(&cfg).unwrap(), 64);
        assert_eq!(mark_bitmap_size_bytes(&cfg).unwrap(), 8);
    }
}
