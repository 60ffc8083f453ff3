//! Error types for bogon list generation
//!
//! Every failure is fatal to a run. The variants name the stage that failed
//! so the binary can report it without further context.

use thiserror::Error;

use crate::network::{Family, NetworkRange};

/// Result type alias for generator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP failure, or deadline expiry, while fetching a feed
    #[error("Transport error fetching {family} feed from {url}: {message}")]
    Transport {
        family: Family,
        url: String,
        message: String,
    },

    /// A non-comment line is not a CIDR literal
    #[error("Parse error in {family} feed at line {line_number}: {line:?}: {message}")]
    Parse {
        family: Family,
        /// 1-based line number within the feed body
        line_number: usize,
        line: String,
        message: String,
    },

    /// A valid CIDR literal of the wrong address family
    #[error("{family} feed line {line_number}: {network} is not an {family} network")]
    FamilyMismatch {
        family: Family,
        line_number: usize,
        network: NetworkRange,
    },

    /// Rendering the definitions text failed
    #[error("Render error: {0}")]
    Render(String),

    /// Staging, flushing or renaming the output failed
    #[error("Write error for {path}: {message}")]
    Write { path: String, message: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Raw HTTP client failure, before the fetcher attaches feed context
    #[error("HTTP error: {0}")]
    Http(String),
}

impl Error {
    /// Create a transport error for a feed
    pub fn transport(family: Family, url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            family,
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a write error for an output path
    pub fn write(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Write {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Short name of the pipeline stage this error belongs to
    pub fn stage(&self) -> &'static str {
        match self {
            Error::Transport { .. } | Error::Http(_) => "fetch",
            Error::Parse { .. } => "parse",
            Error::FamilyMismatch { .. } => "validate",
            Error::Render(_) => "render",
            Error::Write { .. } => "write",
            Error::Config(_) => "config",
        }
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Self::Render(err.to_string())
    }
}
