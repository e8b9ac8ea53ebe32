//! Util Module - Shared Utilities
//!
//! Size constants and helpers used throughout the calculator.

pub mod alignment;
pub mod size;

pub use alignment::Alignment;
pub use size::{format_bytes, parse_size};

/// Constants for heap layout
pub mod constants {
    /// 1 Kilobyte
    pub const KB: u64 = 1024;
    /// 1 Megabyte
    pub const MB: u64 = 1024 * 1024;
    /// 1 Gigabyte
    pub const GB: u64 = 1024 * 1024 * 1024;

    /// Bits in one byte
    pub const BITS_PER_BYTE: u64 = 8;

    /// Default heap size: 8GB
    pub const DEFAULT_HEAP_SIZE: u64 = 8 * GB;
    /// Default region size: 4MB
    pub const DEFAULT_REGION_SIZE: u64 = 4 * MB;
    /// Default card size: 512 bytes
    pub const DEFAULT_CARD_SIZE: u64 = 512;
    /// Default object alignment: 8 bytes
    pub const DEFAULT_OBJECT_ALIGNMENT: u64 = 8;

    /// Bitmaps allocated per heap (previous and next marking)
    pub const MARK_BITMAP_COUNT: u64 = 2;
}
