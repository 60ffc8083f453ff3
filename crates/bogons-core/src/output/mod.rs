// # Output
//
// Publishes rendered definitions to their destination.
//
// - `Destination::Stdout`: written directly, no atomicity possible
// - `Destination::File`: staged next to the target and renamed over it,
//   see [`file::write_atomic`]

pub mod file;

use std::convert::Infallible;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::{Error, Result};

pub use file::write_atomic;

/// Where the definitions end up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Standard output, selected with `-`
    Stdout,

    /// A file, replaced atomically
    File(PathBuf),
}

impl FromStr for Destination {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s == "-" {
            Ok(Destination::Stdout)
        } else {
            Ok(Destination::File(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Stdout => f.write_str("stdout"),
            Destination::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Write fully rendered bytes to `destination`
pub async fn publish(bytes: &[u8], destination: &Destination) -> Result<()> {
    match destination {
        Destination::Stdout => write_stream(&mut tokio::io::stdout(), bytes, "stdout").await,
        Destination::File(path) => write_atomic(path, bytes).await,
    }
}

/// Write all of `bytes` to a stream and flush it
async fn write_stream<W>(writer: &mut W, bytes: &[u8], name: &str) -> Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    writer
        .write_all(bytes)
        .await
        .map_err(|e| Error::write(name, e.to_string()))?;
    writer
        .flush()
        .await
        .map_err(|e| Error::write(name, e.to_string()))
}
