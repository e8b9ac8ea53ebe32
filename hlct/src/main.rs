//! hlct - command-line front end for the heap layout calculator.
//!
//! Parses heap parameters from flags, the optional `hlct.toml` and the
//! `HLC_*` environment, runs the selected calculation and prints the
//! report as text or JSON.

mod commands;
mod config;
mod error;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{
    common::{parse_address_arg, parse_size_arg, OutputFormat},
    run_layout, run_oops, run_region_size, LayoutArgs, OopsArgs, RegionSizeArgs,
};
use config::Config;
use error::{HlctError, Result};
use report::render;

/// hlct - heap layout calculator
///
/// Sizes the card table, block offset table, card counts table and mark
/// bitmaps a region-based collector keeps next to its heap.
#[derive(Parser, Debug)]
#[command(name = "hlct")]
#[command(author = "HLC Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Heap layout calculator for region-based collectors", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, env = "HLCT_VERBOSE")]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "HLCT_CONFIG")]
    config: Option<PathBuf>,

    /// Disable color output
    #[arg(long, global = true, env = "HLCT_NO_COLOR")]
    no_color: bool,

    /// Report format (default: from config, else text)
    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the hlct CLI.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute the fixed-overhead layout for a heap
    ///
    /// Missing flags fall back to the config file, then the HLC_*
    /// environment, then an 8GB heap with 4MB regions.
    Layout(LayoutCommand),

    /// Show the region size chosen for a heap
    RegionSize(RegionSizeCommand),

    /// Describe compressed-oop geometry and encode addresses
    Oops(OopsCommand),
}

/// Arguments for the layout subcommand.
#[derive(Parser, Debug)]
struct LayoutCommand {
    /// Heap size (e.g. 8g, 512m, 8589934592)
    #[arg(long, value_parser = parse_size_arg)]
    heap: Option<u64>,

    /// Region size (power of two)
    #[arg(long, value_parser = parse_size_arg)]
    region: Option<u64>,

    /// Card size (power of two)
    #[arg(long, value_parser = parse_size_arg)]
    card: Option<u64>,

    /// Minimum object alignment in bytes (power of two)
    #[arg(long, value_parser = parse_size_arg)]
    alignment: Option<u64>,

    /// Pick the region size from the heap size
    #[arg(short, long)]
    ergonomic: bool,
}

/// Arguments for the region-size subcommand.
#[derive(Parser, Debug)]
struct RegionSizeCommand {
    /// Maximum heap size
    #[arg(long, value_parser = parse_size_arg)]
    heap: u64,

    /// Initial heap size (default: maximum heap size)
    #[arg(long, value_parser = parse_size_arg)]
    initial: Option<u64>,
}

/// Arguments for the oops subcommand.
#[derive(Parser, Debug)]
struct OopsCommand {
    /// Heap size (default: from config)
    #[arg(long, value_parser = parse_size_arg)]
    heap: Option<u64>,

    /// Heap base address, hex or decimal (default: from config)
    #[arg(long, value_parser = parse_address_arg)]
    base: Option<u64>,

    /// Object alignment in bytes (default: from config)
    #[arg(long, value_parser = parse_size_arg)]
    alignment: Option<u64>,

    /// Addresses to encode, hex or decimal
    #[arg(long = "address", value_parser = parse_address_arg)]
    addresses: Vec<u64>,
}

/// Main entry point for the hlct CLI.
///
/// Errors are printed with their `Display` form and exit with status 1.
fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.no_color) {
        eprintln!("{}", e);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Load configuration, run the command and print its report.
fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let format = cli.format.unwrap_or(config.format);

    let output = execute_command(cli.command, &config, format)?;
    println!("{}", output.trim_end());
    Ok(())
}

/// Initialize the logging system.
///
/// Logs go to stderr so stdout carries only the report. Records from
/// the library's `log` calls are forwarded to the same subscriber.
fn init_logging(verbose: bool, no_color: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    let subscriber = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|e| HlctError::Config(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(config_path: Option<&std::path::Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

/// Execute the selected command and render its report.
fn execute_command(command: Commands, config: &Config, format: OutputFormat) -> Result<String> {
    match command {
        Commands::Layout(args) => execute_layout(args, config, format),
        Commands::RegionSize(args) => execute_region_size(args, format),
        Commands::Oops(args) => execute_oops(args, config, format),
    }
}

/// Execute the layout command.
fn execute_layout(args: LayoutCommand, config: &Config, format: OutputFormat) -> Result<String> {
    let layout_args = LayoutArgs {
        defaults: config.layout,
        heap: args.heap,
        region: args.region,
        card: args.card,
        alignment: args.alignment,
        ergonomic: args.ergonomic,
    };
    render(&run_layout(layout_args)?, format)
}

/// Execute the region-size command.
fn execute_region_size(args: RegionSizeCommand, format: OutputFormat) -> Result<String> {
    let region_args = RegionSizeArgs {
        heap: args.heap,
        initial: args.initial,
    };
    render(&run_region_size(region_args)?, format)
}

/// Execute the oops command.
fn execute_oops(args: OopsCommand, config: &Config, format: OutputFormat) -> Result<String> {
    let oops_args = OopsArgs {
        heap_base: args.base.unwrap_or(config.oops.heap_base),
        heap: args.heap.unwrap_or(config.layout.heap_size_bytes),
        alignment: args.alignment.unwrap_or(config.layout.object_alignment_bytes),
        addresses: args.addresses,
    };
    render(&run_oops(oops_args)?, format)
}
