// # HTTP Feed Source
//
// This crate provides the HTTP(S) feed source for bogon list generation.
//
// ## Behavior
//
// - One GET per `open()` call, no retries (a failed run is simply rerun)
// - Non-2xx status is an error
// - The body is streamed chunk by chunk and split on `\n`; it is never
//   buffered whole
// - Bodies larger than `max_feed_bytes` are rejected, whether announced by
//   `Content-Length` or discovered while streaming
//
// ## Deadlines
//
// The overall deadline belongs to the caller. Dropping the `open()` future
// or the returned stream drops the in-flight response, which aborts the
// request. Only a connect timeout is configured on the client itself.

use bogons_core::config::HttpConfig;
use bogons_core::traits::{FeedSource, LineStream};
use bogons_core::{Error, Result};

use std::time::Duration;

/// HTTP feed source
pub struct HttpFeedSource {
    /// HTTP client
    client: reqwest::Client,

    /// Maximum accepted body size
    max_feed_bytes: usize,
}

impl HttpFeedSource {
    /// Create a new HTTP feed source
    pub fn new(config: &HttpConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_feed_bytes: config.max_feed_bytes,
        })
    }
}

#[async_trait::async_trait]
impl FeedSource for HttpFeedSource {
    async fn open(&self, url: &str) -> Result<LineStream> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::http(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::http(format!("HTTP error: {}", response.status())));
        }

        if let Some(content_length) = response.content_length()
            && content_length > self.max_feed_bytes as u64
        {
            return Err(Error::http(format!(
                "Response too large: {} bytes (max: {} bytes)",
                content_length, self.max_feed_bytes
            )));
        }

        tracing::debug!("Streaming {} ({})", url, response.status());

        Ok(line_stream(response, self.max_feed_bytes))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Splits streamed bytes into `\n`-terminated lines
///
/// `start` marks the first byte not yet returned and `scanned` the first byte
/// not yet searched for a newline, so every byte is scanned once. Consumed
/// bytes are only compacted away before the next chunk is appended.
#[derive(Debug, Default)]
struct LineBuffer {
    bytes: Vec<u8>,
    start: usize,
    scanned: usize,
}

impl LineBuffer {
    /// Append a chunk of the body
    fn push(&mut self, chunk: &[u8]) {
        if self.start > 0 {
            self.bytes.drain(..self.start);
            self.scanned -= self.start;
            self.start = 0;
        }
        self.bytes.extend_from_slice(chunk);
    }

    /// Take the next complete line, if there is one
    fn next_line(&mut self) -> Option<String> {
        let offset = self.bytes[self.scanned..].iter().position(|b| *b == b'\n');
        match offset {
            Some(offset) => {
                let end = self.scanned + offset;
                let line = String::from_utf8_lossy(&self.bytes[self.start..end]).into_owned();
                self.start = end + 1;
                self.scanned = self.start;
                Some(line)
            }
            None => {
                self.scanned = self.bytes.len();
                None
            }
        }
    }

    /// Take whatever is left after the body ended without a final newline
    fn finish(&mut self) -> Option<String> {
        if self.start >= self.bytes.len() {
            return None;
        }
        let rest = String::from_utf8_lossy(&self.bytes[self.start..]).into_owned();
        *self = Self::default();
        Some(rest)
    }
}

/// Read state carried between polls of a line stream
struct LineReader {
    response: reqwest::Response,
    buffer: LineBuffer,
    received: usize,
    max_bytes: usize,
    exhausted: bool,
}

fn line_stream(response: reqwest::Response, max_bytes: usize) -> LineStream {
    let reader = LineReader {
        response,
        buffer: LineBuffer::default(),
        received: 0,
        max_bytes,
        exhausted: false,
    };

    Box::pin(futures::stream::try_unfold(reader, |mut reader| async move {
        loop {
            if let Some(line) = reader.buffer.next_line() {
                return Ok(Some((line, reader)));
            }

            if reader.exhausted {
                return Ok(reader.buffer.finish().map(|line| (line, reader)));
            }

            match reader.response.chunk().await {
                Ok(Some(chunk)) => {
                    reader.received += chunk.len();
                    if reader.received > reader.max_bytes {
                        return Err(Error::http(format!(
                            "Response exceeded {} bytes",
                            reader.max_bytes
                        )));
                    }
                    reader.buffer.push(&chunk);
                }
                Ok(None) => reader.exhausted = true,
                Err(e) => {
                    return Err(Error::http(format!("Failed to read response: {}", e)));
                }
            }
        }
    }))
}
