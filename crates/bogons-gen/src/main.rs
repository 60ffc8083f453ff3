// # bogons-gen - nftables bogon definitions generator
//
// This binary is a thin integration layer:
// 1. Parsing the destination argument
// 2. Reading configuration from environment variables
// 3. Initializing logging and the runtime
// 4. Running one generation and mapping the outcome to an exit code
//
// All fetching, validation, rendering and publishing lives in bogons-core.
//
// ## Usage
//
// ```bash
// bogons-gen /etc/nftables.d/bogons.nft   # atomically replace the file
// bogons-gen -                            # write to stdout
// ```
//
// ## Configuration
//
// - `BOGONS_IPV4_URL`: IPv4 feed URL (default: Team Cymru fullbogons-ipv4.txt)
// - `BOGONS_IPV6_URL`: IPv6 feed URL (default: Team Cymru fullbogons-ipv6.txt)
// - `BOGONS_TIMEOUT_SECS`: Deadline for fetching both feeds (default: 60)
// - `BOGONS_MAX_FEED_BYTES`: Maximum size of one feed body (default: 10 MiB)
// - `BOGONS_LOG_LEVEL`: trace, debug, info, warn or error (default: info)
//
// Logs go to stderr so that `-` output stays clean.

use anyhow::{Context, Result};
use bogons_core::engine::publish_dataset;
use bogons_core::{Destination, GenerationReport, Generator, GeneratorConfig};
use bogons_http::HttpFeedSource;
use clap::Parser;
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy)]
enum GenExitCode {
    /// Definitions published
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Fetch, parse, validation, render or write failure
    RuntimeError = 2,
    /// Interrupted before publishing
    Interrupted = 130,
}

impl From<GenExitCode> for ExitCode {
    fn from(code: GenExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Generate nftables bogon definitions from the Team Cymru fullbogons feeds
#[derive(Debug, Parser)]
#[command(name = "bogons-gen", version, about)]
struct Cli {
    /// Output file, replaced atomically, or `-` for stdout
    destination: String,
}

/// Exit code for a command line that did not parse
///
/// `--help` and `--version` surface as errors printed to stdout.
fn usage_exit_code(error: &clap::Error) -> GenExitCode {
    if error.use_stderr() {
        GenExitCode::ConfigError
    } else {
        GenExitCode::Success
    }
}

/// Application configuration
struct Config {
    generator: GeneratorConfig,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let mut generator = GeneratorConfig::default();

        if let Ok(url) = env::var("BOGONS_IPV4_URL") {
            generator.ipv4_url = url;
        }
        if let Ok(url) = env::var("BOGONS_IPV6_URL") {
            generator.ipv6_url = url;
        }
        if let Ok(secs) = env::var("BOGONS_TIMEOUT_SECS") {
            generator.timeout_secs = secs
                .parse()
                .with_context(|| format!("BOGONS_TIMEOUT_SECS is not a number: {}", secs))?;
        }
        if let Ok(bytes) = env::var("BOGONS_MAX_FEED_BYTES") {
            generator.http.max_feed_bytes = bytes
                .parse()
                .with_context(|| format!("BOGONS_MAX_FEED_BYTES is not a number: {}", bytes))?;
        }

        Ok(Self {
            generator,
            log_level: env::var("BOGONS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.generator.validate()?;

        if !(1..=3600).contains(&self.generator.timeout_secs) {
            anyhow::bail!(
                "BOGONS_TIMEOUT_SECS must be between 1 and 3600 seconds. Got: {}",
                self.generator.timeout_secs
            );
        }

        if self.generator.ipv4_url.starts_with("http://") || self.generator.ipv6_url.starts_with("http://")
        {
            eprintln!(
                "WARNING: a feed URL uses HTTP (not HTTPS). \
                 Its contents can be altered in transit."
            );
        }

        self.level()?;
        Ok(())
    }

    fn level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "BOGONS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Printing only fails if the terminal is gone
            let _ = e.print();
            return usage_exit_code(&e).into();
        }
    };

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return GenExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return GenExitCode::ConfigError.into();
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.level().unwrap_or(Level::INFO))
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return GenExitCode::ConfigError.into();
    }

    let Ok(destination) = cli.destination.parse::<Destination>();

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return GenExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(run(config.generator, &destination));

    match result {
        Ok(Some(report)) => {
            info!(
                "Generated {} IPv4 and {} IPv6 bogons at {}",
                report.ipv4_count, report.ipv6_count, report.generated_at
            );
            GenExitCode::Success.into()
        }
        Ok(None) => GenExitCode::Interrupted.into(),
        Err(e) => {
            error!("Generation failed: {:#}", e);
            GenExitCode::RuntimeError.into()
        }
    }
}

/// Run one generation
///
/// Only the fetch phase can be interrupted; once both feeds are in, the
/// run renders and publishes without checking for signals. Returns `None`
/// if a signal arrived first.
async fn run(config: GeneratorConfig, destination: &Destination) -> Result<Option<GenerationReport>> {
    let source = HttpFeedSource::new(&config.http)?;
    let generator = Generator::new(Box::new(source), config)?;

    info!(
        "Fetching {} and {}",
        generator.config().ipv4_url,
        generator.config().ipv6_url
    );

    let dataset = tokio::select! {
        dataset = generator.run() => dataset.map_err(stage_error)?,
        // A failed handler setup disables this branch instead of aborting the run
        Ok(name) = wait_for_shutdown() => {
            error!("Received {}, aborting before publishing", name);
            return Ok(None);
        }
    };

    let report = publish_dataset(&dataset, destination)
        .await
        .map_err(stage_error)?;

    Ok(Some(report))
}

fn stage_error(e: bogons_core::Error) -> anyhow::Error {
    anyhow::anyhow!("{} stage failed: {}", e.stage(), e)
}

/// Wait for SIGTERM or SIGINT
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for CTRL-C
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
