//! Common types and utilities for hlct commands.
//!
//! Output format selection and the value parsers clap uses for size
//! and address arguments.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use hlc_layout::util::parse_size;

// ============================================================================
// Output Format
// ============================================================================

/// Supported report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned human-readable table
    #[default]
    Text,
    /// Pretty-printed JSON object
    Json,
}

// ============================================================================
// Argument Parsers
// ============================================================================

/// Parse a size argument such as `8g`, `4MiB` or `512`.
pub fn parse_size_arg(s: &str) -> std::result::Result<u64, String> {
    parse_size(s).map_err(|e| e.to_string())
}

/// Parse an address argument, hexadecimal with `0x` prefix or decimal.
///
/// Underscores are accepted as digit separators.
pub fn parse_address_arg(s: &str) -> std::result::Result<u64, String> {
    let cleaned: String = s.trim().chars().filter(|c| *c != '_').collect();

    let parsed = match cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => cleaned.parse::<u64>(),
    };

    parsed.map_err(|e| format!("invalid address '{}': {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size_arg() {
        assert_eq!(parse_size_arg("8g"), Ok(8 << 30));
        assert!(parse_size_arg("eight").is_err());
    }

    #[test]
    fn test_parse_address_arg() {
        assert_eq!(parse_address_arg("0x6_0000_0000"), Ok(0x6_0000_0000));
        assert_eq!(parse_address_arg("0X10"), Ok(16));
        assert_eq!(parse_address_arg("4096"), Ok(4096));
        assert!(parse_address_arg("0xZZ").is_err());
    }

    #[test]
    fn test_output_format_from_toml_value() {
        #[derive(Deserialize)]
        struct Wrapper {
            format: OutputFormat,
        }
        let w: Wrapper = toml::from_str("format = \"json\"").unwrap();
        assert_eq!(w.format, OutputFormat::Json);
    }
}
