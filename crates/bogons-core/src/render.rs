//! Definitions file rendering
//!
//! Output shape, consumed by an nftables `include`:
//!
//! ```text
//! # Generated at 2024-05-01 12:00:00Z by bogons-gen 0.1.0
//! # <provenance comments>
//!
//! define IPV4_BOGONS = {
//!   0.0.0.0/8,
//!   10.0.0.0/8,
//! }
//!
//! define IPV6_BOGONS = {}
//! ```
//!
//! Every element is on its own line with a trailing comma, and an empty set
//! is written as `{}` on the definition line. Rendering is a pure function of
//! the dataset, timestamp included.

use std::fmt::Write;

use crate::engine::BogonDataset;
use crate::error::Result;
use crate::network::{Family, NetworkRange};

/// Timestamp format of the header line (always UTC)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%SZ";

const PROVENANCE: &[&str] = &[
    "# Based on https://team-cymru.com/community-services/bogon-reference/",
    "# Regenerated in full on every run, local edits will be lost",
];

/// Render a dataset into the definitions text format
pub fn render(dataset: &BogonDataset) -> Result<Vec<u8>> {
    let mut out = String::new();
    render_into(&mut out, dataset)?;
    Ok(out.into_bytes())
}

/// Render a dataset into any `fmt::Write` sink
pub fn render_into<W: Write>(out: &mut W, dataset: &BogonDataset) -> Result<()> {
    writeln!(
        out,
        "# Generated at {} by bogons-gen {}",
        dataset.generated_at.format(TIMESTAMP_FORMAT),
        env!("CARGO_PKG_VERSION")
    )?;
    for line in PROVENANCE {
        writeln!(out, "{}", line)?;
    }

    write_definition(out, Family::V4, &dataset.ipv4)?;
    write_definition(out, Family::V6, &dataset.ipv6)?;
    Ok(())
}

fn write_definition<W: Write>(out: &mut W, family: Family, ranges: &[NetworkRange]) -> std::fmt::Result {
    writeln!(out)?;

    let name = family.definition_name();
    if ranges.is_empty() {
        return writeln!(out, "define {} = {{}}", name);
    }

    writeln!(out, "define {} = {{", name)?;
    for range in ranges {
        writeln!(out, "  {},", range)?;
    }
    writeln!(out, "}}")
}
