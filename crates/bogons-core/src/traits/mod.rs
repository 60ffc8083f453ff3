//! Core traits for bogon list generation
//!
//! - [`FeedSource`]: Retrieve a feed body as a stream of lines

pub mod feed_source;

pub use feed_source::{FeedSource, LineStream};
