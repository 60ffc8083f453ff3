//! Configuration types for bogon list generation
//!
//! Every field has a default, so an empty document deserializes to the
//! production setup (Team Cymru fullbogons feeds, one minute deadline).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Team Cymru fullbogons IPv4 feed
pub const DEFAULT_IPV4_URL: &str = "https://www.team-cymru.org/Services/Bogons/fullbogons-ipv4.txt";

/// Team Cymru fullbogons IPv6 feed
pub const DEFAULT_IPV6_URL: &str = "https://www.team-cymru.org/Services/Bogons/fullbogons-ipv6.txt";

/// Main generator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// URL of the IPv4 feed
    #[serde(default = "default_ipv4_url")]
    pub ipv4_url: String,

    /// URL of the IPv6 feed
    #[serde(default = "default_ipv6_url")]
    pub ipv6_url: String,

    /// Deadline for both fetches together (in seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpConfig,
}

impl GeneratorConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            ipv4_url: default_ipv4_url(),
            ipv6_url: default_ipv6_url(),
            timeout_secs: default_timeout_secs(),
            http: HttpConfig::default(),
        }
    }

    /// Point both feeds at other URLs
    pub fn with_urls(mut self, ipv4_url: impl Into<String>, ipv6_url: impl Into<String>) -> Self {
        self.ipv4_url = ipv4_url.into();
        self.ipv6_url = ipv6_url.into();
        self
    }

    /// Set the shared fetch deadline
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// The shared fetch deadline as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        validate_url("IPv4 feed", &self.ipv4_url)?;
        validate_url("IPv6 feed", &self.ipv6_url)?;

        if self.timeout_secs == 0 {
            return Err(crate::Error::config("Fetch timeout must be > 0"));
        }

        self.http.validate()
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP transport configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Maximum accepted size of one feed body (in bytes)
    ///
    /// The full IPv6 list is a few hundred kilobytes, so the default leaves
    /// ample margin while still bounding memory for a misbehaving server.
    #[serde(default = "default_max_feed_bytes")]
    pub max_feed_bytes: usize,

    /// TCP/TLS connect timeout (in seconds)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl HttpConfig {
    /// Validate the HTTP configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.max_feed_bytes == 0 {
            return Err(crate::Error::config("Maximum feed size must be > 0"));
        }
        if self.connect_timeout_secs == 0 {
            return Err(crate::Error::config("Connect timeout must be > 0"));
        }
        if self.user_agent.trim().is_empty() {
            return Err(crate::Error::config("User-Agent cannot be empty"));
        }
        Ok(())
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            max_feed_bytes: default_max_feed_bytes(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn validate_url(what: &str, url: &str) -> Result<(), crate::Error> {
    if url.is_empty() {
        return Err(crate::Error::config(format!("{} URL cannot be empty", what)));
    }
    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(crate::Error::config(format!(
            "{} URL must use HTTP or HTTPS scheme. Got: {}",
            what, url
        )));
    }
    Ok(())
}

fn default_ipv4_url() -> String {
    DEFAULT_IPV4_URL.to_string()
}

fn default_ipv6_url() -> String {
    DEFAULT_IPV6_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_feed_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("bogons-gen/{}", env!("CARGO_PKG_VERSION"))
}
