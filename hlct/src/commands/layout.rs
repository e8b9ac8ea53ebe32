//! Layout command implementation.
//!
//! Resolves heap parameters from flags and configuration defaults and
//! computes the full auxiliary-structure layout.

use hlc_layout::{ergonomics, HeapLayout, HeapLayoutConfig};

use crate::commands::traits::Command;
use crate::error::Result;
use crate::report::{Report, TextTable};

/// Arguments for the layout command.
#[derive(Debug, Clone, Default)]
pub struct LayoutArgs {
    /// Parameters used where no flag is given.
    pub defaults: HeapLayoutConfig,
    /// Heap size in bytes.
    pub heap: Option<u64>,
    /// Region size in bytes.
    pub region: Option<u64>,
    /// Card size in bytes.
    pub card: Option<u64>,
    /// Object alignment in bytes.
    pub alignment: Option<u64>,
    /// Pick the region size from the heap size.
    pub ergonomic: bool,
}

/// Layout command handler.
pub struct LayoutCommand {
    args: LayoutArgs,
}

impl LayoutCommand {
    /// Merge flags over defaults into one configuration.
    fn resolve_config(&self) -> Result<HeapLayoutConfig> {
        let args = &self.args;
        let heap = args.heap.unwrap_or(args.defaults.heap_size_bytes);

        let base = match (args.ergonomic, args.region) {
            (true, None) => ergonomics::ergonomic_config(heap)?
                .with_card_size(args.defaults.card_size_bytes)
                .with_object_alignment(args.defaults.object_alignment_bytes),
            (true, Some(region)) => {
                tracing::warn!("--ergonomic ignored because --region was given");
                args.defaults.with_heap_size(heap).with_region_size(region)
            }
            (false, region) => args
                .defaults
                .with_heap_size(heap)
                .with_region_size(region.unwrap_or(args.defaults.region_size_bytes)),
        };

        let mut config = base;
        if let Some(card) = args.card {
            config = config.with_card_size(card);
        }
        if let Some(alignment) = args.alignment {
            config = config.with_object_alignment(alignment);
        }

        tracing::debug!(?config, "Resolved layout configuration");
        Ok(config)
    }
}

impl Command for LayoutCommand {
    type Args = LayoutArgs;
    type Output = HeapLayout;

    fn new(args: Self::Args) -> Self {
        Self { args }
    }

    fn execute(&self) -> Result<Self::Output> {
        let config = self.resolve_config()?;
        Ok(HeapLayout::compute(&config)?)
    }

    fn name() -> &'static str {
        "layout"
    }
}

impl Report for HeapLayout {
    fn render_text(&self) -> String {
        TextTable::new("Heap layout")
            .bytes("heap size", self.config.heap_size_bytes)
            .bytes("region size", self.config.region_size_bytes)
            .value("region count", self.region_count)
            .value("log2 region size", self.log_region_size)
            .bytes("card size", self.config.card_size_bytes)
            .value("cards per region", self.cards_per_region)
            .bytes("mark distance", self.mark_distance_bytes)
            .bytes("card table", self.card_table_bytes)
            .bytes("block offset table", self.block_offset_table_bytes)
            .bytes("card counts table", self.card_counts_table_bytes)
            .bytes("mark bitmap (each)", self.mark_bitmap_bytes)
            .value("mark bits (diagnostic)", self.mark_bitmap_bits_as_bytes)
            .bytes("fixed overhead", self.fixed_overhead_bytes)
            .value("overhead of heap", format!("{:.4}%", self.fixed_overhead_percent()))
            .bytes("overhead per region", self.per_region.total_bytes)
            .render()
    }
}

/// Run the layout command.
pub fn run_layout(args: LayoutArgs) -> Result<HeapLayout> {
    let command = LayoutCommand::new(args);
    tracing::info!("Running {}", LayoutCommand::name());
    command.execute()
}
