//! Size Strings
//!
//! Parsing of JVM-style size arguments (`8g`, `4m`, `512k`, `4MiB`)
//! and human-readable byte formatting for reports.

use super::constants::{GB, KB, MB};
use crate::error::{LayoutError, Result};

const TB: u64 = 1024 * GB;

/// Parse a size string into bytes
///
/// Accepts a decimal integer followed by an optional unit:
/// `k`, `m`, `g`, `t` (case-insensitive), optionally followed by
/// `b` or `ib`. A bare `b` or no suffix means bytes.
///
/// # Examples
/// ```
/// use hlc_layout::util::parse_size;
///
/// assert_eq!(parse_size("8g").unwrap(), 8 * 1024 * 1024 * 1024);
/// assert_eq!(parse_size("4MiB").unwrap(), 4 * 1024 * 1024);
/// assert_eq!(parse_size("512").unwrap(), 512);
/// assert!(parse_size("8x").is_err());
/// ```
pub fn parse_size(input: &str) -> Result<u64> {
    let trimmed = input.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(split);

    if digits.is_empty() {
        return Err(LayoutError::InvalidSize(format!(
            "'{}' does not start with a number",
            input
        )));
    }

    let value: u64 = digits
        .parse()
        .map_err(|_| LayoutError::InvalidSize(format!("'{}' is too large", input)))?;

    let multiplier = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "b" => 1,
        "k" | "kb" | "kib" => KB,
        "m" | "mb" | "mib" => MB,
        "g" | "gb" | "gib" => GB,
        "t" | "tb" | "tib" => TB,
        other => {
            return Err(LayoutError::InvalidSize(format!(
                "unknown unit '{}' in '{}'",
                other, input
            )))
        }
    };

    value
        .checked_mul(multiplier)
        .ok_or_else(|| LayoutError::InvalidSize(format!("'{}' overflows 64 bits", input)))
}

/// Format bytes with the largest binary unit that keeps the value >= 1
///
/// Exact multiples print without decimals (`16 MiB`), others with two
/// (`1.50 GiB`).
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [(u64, &str); 4] = [(TB, "TiB"), (GB, "GiB"), (MB, "MiB"), (KB, "KiB")];

    for (unit, name) in UNITS {
        if bytes >= unit {
            return if bytes % unit == 0 {
                format!("{} {}", bytes / unit, name)
            } else {
                format!("{:.2} {}", bytes as f64 / unit as f64, name)
            };
        }
    }

    format!("{} B", bytes)
}
