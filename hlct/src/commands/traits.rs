//! Command trait for the hlct CLI.
//!
//! Every subcommand turns its arguments into a report; printing is left
//! to the caller so the same command serves text and JSON output.

use crate::error::Result;
use crate::report::Report;

/// Standard command trait that all hlct commands implement.
///
/// # Type Parameters
/// * `Args` - The resolved arguments for this command
/// * `Output` - The report this command produces
pub trait Command {
    /// The arguments type for this command.
    type Args;

    /// The report returned by this command.
    type Output: Report;

    /// Create a new command instance with the given arguments.
    fn new(args: Self::Args) -> Self;

    /// Execute the command.
    fn execute(&self) -> Result<Self::Output>;

    /// Get the command name.
    fn name() -> &'static str;
}
