//! Bogon list generator
//!
//! The Generator is responsible for:
//! - Fetching the IPv4 and IPv6 feeds concurrently under one deadline
//! - Aggregating both into a `BogonDataset`
//! - Rendering and publishing the definitions file
//!
//! ## Architecture
//!
//! ```text
//!                 ┌──────────────┐
//!                 │  Generator   │
//!                 └──────────────┘
//!                   │          │
//!        fetch IPv4 │          │ fetch IPv6      (concurrent, shared deadline)
//!                   ▼          ▼
//!                 ┌──────────────┐
//!                 │  FeedSource  │
//!                 └──────────────┘
//!                   │          │
//!                   └────┬─────┘  join: both Ok, or the first error
//!                        ▼
//!                  BogonDataset ──► render ──► publish
//! ```
//!
//! Each fetch owns its own line stream and result vector; the two only
//! meet at the join, so a failure in either feed can never leave a
//! half-populated dataset behind.

use chrono::{DateTime, Utc};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::fetcher::fetch_list;
use crate::network::{Family, NetworkRange};
use crate::output::{Destination, publish};
use crate::render::render;
use crate::traits::FeedSource;

/// Result of one successful fetch of both feeds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BogonDataset {
    /// When both feeds finished fetching
    pub generated_at: DateTime<Utc>,

    /// IPv4 ranges, in feed order
    pub ipv4: Vec<NetworkRange>,

    /// IPv6 ranges, in feed order
    pub ipv6: Vec<NetworkRange>,
}

impl BogonDataset {
    /// Ranges of one family
    pub fn ranges(&self, family: Family) -> &[NetworkRange] {
        match family {
            Family::V4 => &self.ipv4,
            Family::V6 => &self.ipv6,
        }
    }
}

/// Summary of a completed `Generator::generate()` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub generated_at: DateTime<Utc>,
    pub ipv4_count: usize,
    pub ipv6_count: usize,
    pub bytes_written: usize,
}

/// Core generator
///
/// ## Lifecycle
///
/// 1. Create with [`Generator::new()`]
/// 2. Call [`Generator::generate()`] (or [`Generator::run()`] for the dataset alone)
/// 3. Drop
///
/// A generator holds no state between calls, so calling `run()` twice against
/// unchanged feeds yields datasets that differ only in `generated_at`.
pub struct Generator {
    /// Transport used for both feeds
    source: Box<dyn FeedSource>,

    /// Feed URLs and deadline
    config: GeneratorConfig,
}

impl Generator {
    /// Create a new generator
    ///
    /// # Returns
    ///
    /// - `Ok(Generator)`: The configuration is valid
    /// - `Err(Error::Config)`: It is not
    pub fn new(source: Box<dyn FeedSource>, config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { source, config })
    }

    /// The configuration this generator runs with
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Fetch both feeds and aggregate them
    ///
    /// The first failing feed cancels the other one and becomes the result.
    /// Hitting the deadline is reported as a transport error of the feed
    /// that was still in flight.
    pub async fn run(&self) -> Result<BogonDataset> {
        let deadline = Instant::now() + self.config.timeout();
        debug!("Fetching feeds with a deadline of {:?}", self.config.timeout());

        let ipv4 = self.fetch_before(deadline, Family::V4, &self.config.ipv4_url);
        let ipv6 = self.fetch_before(deadline, Family::V6, &self.config.ipv6_url);

        let (ipv4, ipv6) = tokio::try_join!(ipv4, ipv6)?;

        Ok(BogonDataset {
            generated_at: Utc::now(),
            ipv4,
            ipv6,
        })
    }

    /// Fetch, render and publish in one go
    ///
    /// Nothing is written to `destination` unless fetching and rendering
    /// both succeeded.
    pub async fn generate(&self, destination: &Destination) -> Result<GenerationReport> {
        let dataset = self.run().await?;
        publish_dataset(&dataset, destination).await
    }

    async fn fetch_before(&self, deadline: Instant, family: Family, url: &str) -> Result<Vec<NetworkRange>> {
        match tokio::time::timeout_at(deadline, fetch_list(self.source.as_ref(), url, family)).await {
            Ok(result) => result,
            Err(_) => Err(Error::transport(
                family,
                url,
                format!("deadline of {:?} exceeded", self.config.timeout()),
            )),
        }
    }
}

/// Render a dataset and publish it to `destination`
pub async fn publish_dataset(dataset: &BogonDataset, destination: &Destination) -> Result<GenerationReport> {
    let bytes = render(dataset)?;
    debug!("Rendered {} bytes", bytes.len());

    publish(&bytes, destination).await?;

    info!(
        "Published {} IPv4 and {} IPv6 ranges to {}",
        dataset.ipv4.len(),
        dataset.ipv6.len(),
        destination
    );

    Ok(GenerationReport {
        generated_at: dataset.generated_at,
        ipv4_count: dataset.ipv4.len(),
        ipv6_count: dataset.ipv6.len(),
        bytes_written: bytes.len(),
    })
}
