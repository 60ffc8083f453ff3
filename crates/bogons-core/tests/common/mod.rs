//! Test doubles and common utilities for contract tests
//!
//! Feeds are served from memory, split into lines the same way the HTTP
//! source splits a response body.

#![allow(dead_code)]

use bogons_core::error::{Error, Result};
use bogons_core::traits::{FeedSource, LineStream};
use bogons_core::{BogonDataset, GeneratorConfig};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const IPV4_URL: &str = "http://feeds.test/fullbogons-ipv4.txt";
pub const IPV6_URL: &str = "http://feeds.test/fullbogons-ipv6.txt";

/// What a feed URL answers with
#[derive(Debug, Clone)]
pub enum FeedResponse {
    /// A complete body
    Body(String),
    /// The request itself fails
    Refused(String),
    /// Some lines arrive, then the connection breaks
    BrokenAfter(String, String),
    /// The request never completes
    Stall,
}

/// A FeedSource serving canned responses per URL
pub struct StaticFeedSource {
    feeds: HashMap<String, FeedResponse>,
    open_count: Arc<AtomicUsize>,
}

impl StaticFeedSource {
    /// Serve `ipv4` and `ipv6` at the default test URLs
    pub fn new(ipv4: FeedResponse, ipv6: FeedResponse) -> Self {
        let mut feeds = HashMap::new();
        feeds.insert(IPV4_URL.to_string(), ipv4);
        feeds.insert(IPV6_URL.to_string(), ipv6);

        Self {
            feeds,
            open_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Serve two plain bodies
    pub fn bodies(ipv4: &str, ipv6: &str) -> Self {
        Self::new(
            FeedResponse::Body(ipv4.to_string()),
            FeedResponse::Body(ipv6.to_string()),
        )
    }

    /// Counter of open() calls, shared with clones taken before boxing
    pub fn open_counter(&self) -> Arc<AtomicUsize> {
        self.open_count.clone()
    }
}

#[async_trait::async_trait]
impl FeedSource for StaticFeedSource {
    async fn open(&self, url: &str) -> Result<LineStream> {
        self.open_count.fetch_add(1, Ordering::SeqCst);

        match self.feeds.get(url) {
            Some(FeedResponse::Body(body)) => {
                let lines: Vec<Result<String>> = split_lines(body).into_iter().map(Ok).collect();
                Ok(Box::pin(tokio_stream::iter(lines)))
            }
            Some(FeedResponse::Refused(reason)) => Err(Error::http(reason.clone())),
            Some(FeedResponse::BrokenAfter(body, reason)) => {
                let mut items: Vec<Result<String>> =
                    split_lines(body).into_iter().map(Ok).collect();
                items.push(Err(Error::http(reason.clone())));
                Ok(Box::pin(tokio_stream::iter(items)))
            }
            Some(FeedResponse::Stall) => {
                std::future::pending::<()>().await;
                unreachable!("pending() never resolves")
            }
            None => Err(Error::http(format!("HTTP error: 404 Not Found ({})", url))),
        }
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Split a body on `\n` without yielding an empty token after a final newline
pub fn split_lines(body: &str) -> Vec<String> {
    body.split_inclusive('\n')
        .map(|line| line.strip_suffix('\n').unwrap_or(line).to_string())
        .collect()
}

/// Configuration pointing at the test URLs
pub fn test_config() -> GeneratorConfig {
    GeneratorConfig::new().with_urls(IPV4_URL, IPV6_URL)
}

/// Dataset contents as strings, ignoring the timestamp
pub fn dataset_strings(dataset: &BogonDataset) -> (Vec<String>, Vec<String>) {
    (
        dataset.ipv4.iter().map(|n| n.to_string()).collect(),
        dataset.ipv6.iter().map(|n| n.to_string()).collect(),
    )
}

/// A realistic excerpt of the IPv4 feed
pub const IPV4_SAMPLE: &str = "# last updated 1714564801 (Wed May  1 12:00:01 2024 GMT)\n\
0.0.0.0/8\n\
10.0.0.0/8\n\
100.64.0.0/10\n\
127.0.0.0/8\n\
169.254.0.0/16\n\
172.16.0.0/12\n\
192.168.0.0/16\n";

/// A realistic excerpt of the IPv6 feed
pub const IPV6_SAMPLE: &str = "# last updated 1714564801 (Wed May  1 12:00:01 2024 GMT)\n\
::/8\n\
100::/8\n\
200::/7\n\
2001:db8::/32\n\
fc00::/7\n\
fe80::/10\n";
