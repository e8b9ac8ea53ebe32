//! # HLC - Heap Layout Calculator
//!
//! Deterministic sizing of the fixed-overhead structures a region-based
//! garbage collector keeps next to its heap: card table, block offset
//! table, card counts table and the two concurrent-marking bitmaps.
//!
//! ## Quick Start
//!
//! ```rust
//! use hlc_layout::{HeapLayout, HeapLayoutConfig};
//!
//! fn main() -> Result<(), hlc_layout::LayoutError> {
//!     // 8GB heap, 4MB regions, 512 byte cards, 8 byte object alignment
//!     let config = HeapLayoutConfig::default();
//!     let layout = HeapLayout::compute(&config)?;
//!
//!     assert_eq!(layout.region_count, 2048);
//!     assert_eq!(layout.card_table_bytes, 16 * 1024 * 1024);
//!     assert_eq!(layout.mark_bitmap_bytes, 16 * 1024 * 1024);
//!     assert_eq!(layout.fixed_overhead_bytes, 80 * 1024 * 1024);
//!     Ok(())
//! }
//! ```
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────── heap (8GB) ────────────────────────┐
//! │ region 0 │ region 1 │ ...                   │ region 2047  │  4MB each
//! └──────────┴──────────┴───────────────────────┴──────────────┘
//!   │ 8192 cards of 512B per region
//!   ▼
//! card table 16MB | BOT 16MB | card counts 16MB | prev bitmap 16MB | next bitmap 16MB
//! ```
//!
//! ## Modules
//!
//! - [`calculator`]: the sizing functions and the [`HeapLayout`] snapshot
//! - [`config`]: [`HeapLayoutConfig`] and its validation
//! - [`ergonomics`]: default region size selection
//! - [`oops`]: compressed reference geometry
//! - [`error`]: [`LayoutError`]
//! - [`util`]: size parsing, formatting and alignment helpers
//!
//! Nothing here performs I/O or holds state; every function may be called
//! from any thread.

pub mod calculator;
pub mod config;
pub mod error;
pub mod ergonomics;
pub mod oops;
pub mod util;

// Re-export main types for convenience
pub use calculator::{HeapLayout, RegionOverhead};
pub use config::HeapLayoutConfig;
pub use error::{LayoutError, Result, Violation};
pub use oops::{CompressedOops, OopMode};

/// HLC version string from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
