//! Region-size command implementation.
//!
//! Reports the region size the collector would pick for a heap and how
//! many regions that yields.

use hlc_layout::ergonomics::{ergonomic_region_size, region_size_clamped};
use hlc_layout::util::Alignment;
use hlc_layout::{HeapLayoutConfig, LayoutError, Violation};
use serde::Serialize;

use crate::commands::traits::Command;
use crate::error::{HlctError, Result};
use crate::report::{Report, TextTable};

/// Arguments for the region-size command.
#[derive(Debug, Clone)]
pub struct RegionSizeArgs {
    /// Maximum heap size in bytes.
    pub heap: u64,
    /// Initial heap size in bytes (defaults to the maximum).
    pub initial: Option<u64>,
}

/// Ergonomic region sizing result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionSizeReport {
    pub initial_heap_bytes: u64,
    pub max_heap_bytes: u64,
    /// Maximum heap rounded up to whole regions
    pub aligned_heap_bytes: u64,
    pub region_size_bytes: u64,
    pub region_count: u64,
    pub log_region_size: u32,
    /// Region size hit the 1MB or 32MB bound
    pub clamped: bool,
}

/// Region-size command handler.
pub struct RegionSizeCommand {
    args: RegionSizeArgs,
}

impl RegionSizeCommand {
    fn validate(&self) -> Result<u64> {
        let initial = self.args.initial.unwrap_or(self.args.heap);
        if self.args.heap == 0 {
            return Err(LayoutError::invalid("heap_size_bytes", Violation::Zero).into());
        }
        if initial > self.args.heap {
            return Err(HlctError::Validation(format!(
                "initial heap ({}) exceeds maximum heap ({})",
                initial, self.args.heap
            )));
        }
        Ok(initial)
    }
}

impl Command for RegionSizeCommand {
    type Args = RegionSizeArgs;
    type Output = RegionSizeReport;

    fn new(args: Self::Args) -> Self {
        Self { args }
    }

    fn execute(&self) -> Result<Self::Output> {
        let initial = self.validate()?;
        let region = ergonomic_region_size(initial, self.args.heap);
        let aligned = Alignment::align_up(self.args.heap, region)
            .ok_or_else(|| LayoutError::invalid("heap_size_bytes", Violation::Overflow))?;

        let config = HeapLayoutConfig::new(aligned, region);

        Ok(RegionSizeReport {
            initial_heap_bytes: initial,
            max_heap_bytes: self.args.heap,
            aligned_heap_bytes: aligned,
            region_size_bytes: region,
            region_count: config.region_count()?,
            log_region_size: config.log_region_size()?,
            clamped: region_size_clamped(initial, self.args.heap),
        })
    }

    fn name() -> &'static str {
        "region-size"
    }
}

impl Report for RegionSizeReport {
    fn render_text(&self) -> String {
        let mut table = TextTable::new("Ergonomic region size")
            .bytes("initial heap", self.initial_heap_bytes)
            .bytes("maximum heap", self.max_heap_bytes);
        if self.aligned_heap_bytes != self.max_heap_bytes {
            table = table.bytes("aligned heap", self.aligned_heap_bytes);
        }
        table
            .bytes("region size", self.region_size_bytes)
            .value("region count", self.region_count)
            .value("log2 region size", self.log_region_size)
            .value("clamped", self.clamped)
            .render()
    }
}

/// Run the region-size command.
pub fn run_region_size(args: RegionSizeArgs) -> Result<RegionSizeReport> {
    let command = RegionSizeCommand::new(args);
    tracing::info!("Running {}", RegionSizeCommand::name());
    command.execute()
}
