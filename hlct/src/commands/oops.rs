//! Oops command implementation.
//!
//! Describes compressed-reference geometry for a heap placement and
//! encodes sample addresses.

use hlc_layout::{CompressedOops, OopMode};
use serde::Serialize;

use crate::commands::traits::Command;
use crate::error::Result;
use crate::report::{Report, TextTable};

/// Arguments for the oops command.
#[derive(Debug, Clone)]
pub struct OopsArgs {
    /// Address the heap starts at.
    pub heap_base: u64,
    /// Heap size in bytes.
    pub heap: u64,
    /// Object alignment in bytes.
    pub alignment: u64,
    /// Addresses to encode.
    pub addresses: Vec<u64>,
}

/// One encoded address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedAddress {
    pub address: u64,
    pub narrow: u32,
    pub decoded: u64,
}

/// Compressed-oop geometry result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OopsReport {
    pub heap_base: u64,
    pub heap_end: u64,
    pub object_alignment_bytes: u64,
    pub mode: OopMode,
    pub shift: u32,
    pub encoding_base: u64,
    pub max_heap_size_bytes: u64,
    pub encoded: Vec<EncodedAddress>,
}

/// Oops command handler.
pub struct OopsCommand {
    args: OopsArgs,
}

impl Command for OopsCommand {
    type Args = OopsArgs;
    type Output = OopsReport;

    fn new(args: Self::Args) -> Self {
        Self { args }
    }

    fn execute(&self) -> Result<Self::Output> {
        let oops = CompressedOops::new(self.args.heap_base, self.args.heap, self.args.alignment)?;

        let encoded = self
            .args
            .addresses
            .iter()
            .map(|&address| -> Result<EncodedAddress> {
                let narrow = oops.encode(address)?;
                Ok(EncodedAddress {
                    address,
                    narrow,
                    decoded: oops.decode(narrow),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(OopsReport {
            heap_base: oops.heap_base(),
            heap_end: oops.heap_end(),
            object_alignment_bytes: self.args.alignment,
            mode: oops.mode(),
            shift: oops.shift(),
            encoding_base: oops.encoding_base(),
            max_heap_size_bytes: oops.max_heap_size(),
            encoded,
        })
    }

    fn name() -> &'static str {
        "oops"
    }
}

impl Report for OopsReport {
    fn render_text(&self) -> String {
        let table = TextTable::new("Compressed oops")
            .address("heap base", self.heap_base)
            .address("heap end", self.heap_end)
            .bytes("object alignment", self.object_alignment_bytes)
            .value("mode", self.mode)
            .value("shift", self.shift)
            .address("encoding base", self.encoding_base)
            .bytes("max heap", self.max_heap_size_bytes);

        self.encoded
            .iter()
            .fold(table, |table, e| {
                table.value(
                    &format!("{:#018x}", e.address),
                    format!("-> {:#010x} -> {:#018x}", e.narrow, e.decoded),
                )
            })
            .render()
    }
}

/// Run the oops command.
pub fn run_oops(args: OopsArgs) -> Result<OopsReport> {
    let command = OopsCommand::new(args);
    tracing::info!("Running {}", OopsCommand::name());
    command.execute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HlctError;
    use hlc_layout::LayoutError;

    const GB: u64 = 1 << 30;
    const BASE: u64 = 0x6_0000_0000;

    fn args(addresses: Vec<u64>) -> OopsArgs {
        OopsArgs {
            heap_base: BASE,
            heap: 8 * GB,
            alignment: 8,
            addresses,
        }
    }

    #[test]
    fn test_eight_gb_report() {
        let report = run_oops(args(vec![BASE + 8])).unwrap();
        assert_eq!(report.mode, OopMode::ZeroBased);
        assert_eq!(report.shift, 3);
        assert_eq!(report.max_heap_size_bytes, 32 * GB);
        assert_eq!(report.encoded[0].narrow, 0xC000_0001);
        assert_eq!(report.encoded[0].decoded, BASE + 8);
    }

    #[test]
    fn test_address_outside_heap_fails() {
        let err = run_oops(args(vec![BASE + 8 * GB])).unwrap_err();
        assert!(matches!(
            err,
            HlctError::Layout(LayoutError::AddressOutOfRange { .. })
        ));
    }

    #[test]
    fn test_text_report() {
        let text = run_oops(args(vec![BASE])).unwrap().render_text();
        assert!(text.contains("zero-based"));
        assert!(text.contains("0x0000000600000000"));
        assert!(text.contains("-> 0xc0000000"));
    }

    #[test]
    fn test_mode_serializes_kebab_case() {
        let report = run_oops(args(Vec::new())).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["mode"], "zero-based");
    }
}
