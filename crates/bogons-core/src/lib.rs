// # bogons-core
//
// Core library for generating nftables bogon definitions.
//
// ## Architecture Overview
//
// One run is a single fetch → validate → render → publish pass:
// - **FeedSource**: Trait for retrieving a feed as a stream of text lines
// - **fetcher**: Parses and validates one feed into ordered network ranges
// - **Generator**: Runs the IPv4 and IPv6 fetches concurrently under one deadline
// - **render**: Serializes a `BogonDataset` into the definitions text format
// - **output**: Publishes rendered bytes to stdout or atomically to a file
//
// ## Design Principles
//
// 1. **Fail Loudly**: One bad line invalidates the whole feed, nothing is retried
// 2. **No Partial Output**: The destination is only touched after rendering succeeded
// 3. **Library-First**: No process exits or signal handling here, the binary owns those
// 4. **Transport-Agnostic**: HTTP lives behind `FeedSource` in a separate crate

pub mod config;
pub mod engine;
pub mod error;
pub mod fetcher;
pub mod network;
pub mod output;
pub mod render;
pub mod traits;

// Re-export core types for convenience
pub use config::{GeneratorConfig, HttpConfig};
pub use engine::{BogonDataset, GenerationReport, Generator};
pub use error::{Error, Result};
pub use network::{Family, NetworkRange};
pub use output::Destination;
pub use traits::{FeedSource, LineStream};
