//! Report rendering for the hlct CLI.
//!
//! Each command output renders either as an aligned text table or as a
//! pretty-printed JSON object. Reports go to stdout; logs go to stderr.

use std::fmt::Display;

use hlc_layout::util::format_bytes;
use serde::Serialize;

use crate::commands::common::OutputFormat;
use crate::error::Result;

/// A command output that can be printed in every supported format
pub trait Report: Serialize {
    /// Human-readable rendering
    fn render_text(&self) -> String;
}

/// Render a report in the requested format
pub fn render<R: Report>(report: &R, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(report.render_text()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

/// Titled two-column table with labels padded to a common width
#[derive(Debug, Default)]
pub struct TextTable {
    title: String,
    rows: Vec<(String, String)>,
}

impl TextTable {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    /// Row showing a byte count and its binary-unit form
    pub fn bytes(self, label: &str, bytes: u64) -> Self {
        self.value(label, format!("{:>15} B  ({})", bytes, format_bytes(bytes)))
    }

    /// Row showing a plain value
    pub fn value(mut self, label: &str, value: impl Display) -> Self {
        self.rows.push((label.to_string(), value.to_string()));
        self
    }

    /// Row showing an address in hex
    pub fn address(self, label: &str, address: u64) -> Self {
        self.value(label, format!("{:#018x}", address))
    }

    pub fn render(&self) -> String {
        let width = self.rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

        let mut out = format!("=== {} ===\n", self.title);
        for (label, value) in &self.rows {
            out.push_str(&format!("  {:<width$}  {}\n", label, value, width = width));
        }
        out
    }
}
