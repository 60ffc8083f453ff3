//! Feed fetching and validation
//!
//! A feed is a sequence of lines, each either a `#` comment or a CIDR
//! literal of the feed's address family. Any other line aborts the fetch:
//! a truncated or corrupted bogon list is worse than no new list at all.

use tokio_stream::StreamExt;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::network::{Family, NetworkRange, is_family};
use crate::traits::FeedSource;

/// Fetch one feed and return its ranges in input order
///
/// # Errors
///
/// - `Error::Transport`: the request or a body read failed
/// - `Error::Parse`: a non-comment line is not a CIDR literal
/// - `Error::FamilyMismatch`: a literal belongs to the other family
///
/// Ranges accumulated before an error are discarded.
pub async fn fetch_list(source: &dyn FeedSource, url: &str, family: Family) -> Result<Vec<NetworkRange>> {
    debug!("Requesting {} feed from {} via {}", family, url, source.name());

    let mut lines = source
        .open(url)
        .await
        .map_err(|e| Error::transport(family, url, e.to_string()))?;

    let mut ranges = Vec::new();
    let mut line_number = 0;

    while let Some(line) = lines.next().await {
        line_number += 1;
        let line = line.map_err(|e| Error::transport(family, url, e.to_string()))?;

        if let Some(network) = parse_line(&line, family, line_number)? {
            ranges.push(network);
        }
    }

    info!("Fetched {} feed: {} ranges", family, ranges.len());
    Ok(ranges)
}

/// Parse a single feed line
///
/// Returns `Ok(None)` for comment lines. A trailing `\r` is ignored so that
/// CRLF feeds parse the same as LF feeds; no other whitespace is trimmed.
pub fn parse_line(line: &str, family: Family, line_number: usize) -> Result<Option<NetworkRange>> {
    let line = line.strip_suffix('\r').unwrap_or(line);

    if line.starts_with('#') {
        return Ok(None);
    }

    let network: NetworkRange = line.parse().map_err(|e: ipnet::AddrParseError| Error::Parse {
        family,
        line_number,
        line: line.to_string(),
        message: e.to_string(),
    })?;

    if !is_family(&network, family) {
        return Err(Error::FamilyMismatch {
            family,
            line_number,
            network,
        });
    }

    Ok(Some(network))
}
