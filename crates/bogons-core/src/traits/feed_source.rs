// # Feed Source Trait
//
// Defines the interface for retrieving a bogon feed body.
//
// ## Implementations
//
// - HTTP(S) via reqwest: `bogons-http` crate
// - In-memory doubles: `tests/common`
//
// ## Usage
//
// ```rust,ignore
// use bogons_core::FeedSource;
// use tokio_stream::StreamExt;
//
// #[tokio::main]
// async fn main() -> bogons_core::Result<()> {
//     let source = /* FeedSource implementation */;
//
//     let mut lines = source.open("https://example.net/fullbogons-ipv4.txt").await?;
//     while let Some(line) = lines.next().await {
//         println!("{}", line?);
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::pin::Pin;
use tokio_stream::Stream;

/// Lines of a feed body, in order, without their `\n` terminators
pub type LineStream = Pin<Box<dyn Stream<Item = Result<String, crate::Error>> + Send + 'static>>;

/// Trait for feed transports
///
/// A source performs exactly one request per `open()` call and streams the
/// body back; it does not parse, validate or retry. Deadlines are applied by
/// the caller, so dropping the returned stream (or the `open()` future) must
/// abort the underlying request.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Issue one GET against `url` and stream the body line by line
    ///
    /// # Returns
    ///
    /// - `Ok(LineStream)`: The request succeeded and the body can be read
    /// - `Err(Error)`: Connection failure or non-success status
    ///
    /// Read failures after the headers arrived are yielded as `Err` items
    /// of the stream.
    async fn open(&self, url: &str) -> Result<LineStream, crate::Error>;

    /// Short name used in logs
    fn name(&self) -> &'static str {
        "unknown"
    }
}
