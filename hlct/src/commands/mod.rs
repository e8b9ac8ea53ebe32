//! Command modules for the hlct CLI.
//!
//! Each subcommand lives in its own file and produces a report.

pub mod common;
pub mod traits;

pub mod layout;
pub mod oops;
pub mod region_size;

// Re-export command types and functions
pub use layout::{run_layout, LayoutArgs};
pub use oops::{run_oops, OopsArgs};
pub use region_size::{run_region_size, RegionSizeArgs};
