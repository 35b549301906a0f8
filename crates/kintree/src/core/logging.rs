//! Logging infrastructure for the layout pipeline
//!
//! Structured logging built on the `tracing` crate. The pipeline emits spans
//! per stage and events for notable decisions (rank conflicts, reshuffles);
//! logging is disabled by default and never affects algorithmic results.
//!
//! # Log Levels
//!
//! - `trace`: per-node decisions, very verbose
//! - `debug`: per-stage summaries
//! - `info`: one event per completed layout (default)
//! - `warn`: recovered problems such as conflicting rank assignments
//! - `error`: fatal input errors
//!
//! # Environment Variables
//!
//! - `KINTREE_LOG_LEVEL`: set log level (trace|debug|info|warn|error)
//! - `KINTREE_LOG_FORMAT`: set log format (compact|pretty|json)
//! - `RUST_LOG`: alternative level filter (tracing-subscriber standard),
//!   including per-module filters such as
//!   `RUST_LOG="info,kintree::layout::rank=trace"`

use std::io;
use std::str::FromStr;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact single-line format
    Compact,
    /// Pretty multi-line format with colors
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl LogFormat {
    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

/// Initialize the tracing subscriber with the given log level and format
///
/// # Arguments
///
/// * `level` - Optional log level string (trace|debug|info|warn|error).
///   If None, uses `KINTREE_LOG_LEVEL` or `RUST_LOG`, or defaults to `info`.
/// * `format` - Optional log format (compact|pretty|json).
///   If None, uses `KINTREE_LOG_FORMAT`, or defaults to `compact`.
///
/// # Returns
///
/// Returns an error if initialization fails (e.g., subscriber already
/// initialized).
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = level
        .map(|s| s.to_string())
        .or_else(|| std::env::var("KINTREE_LOG_LEVEL").ok())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    let log_format = format
        .map(|s| s.to_string())
        .or_else(|| std::env::var("KINTREE_LOG_FORMAT").ok())
        .unwrap_or_else(|| "compact".to_string());

    let filter = if log_level == "off" {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&log_level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let format = LogFormat::from_str(&log_format)
        .map_err(|e| format!("Invalid log format: {}", e))?;

    match format {
        LogFormat::Compact => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(io::stderr)
                        .with_target(false)
                        .with_level(true)
                        .with_file(false)
                        .with_line_number(false)
                        .with_span_events(FmtSpan::NONE),
                )
                .try_init()?;
        }
        LogFormat::Pretty => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(io::stderr)
                        .with_target(true)
                        .with_level(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_span_events(FmtSpan::ACTIVE)
                        .pretty(),
                )
                .try_init()?;
        }
        LogFormat::Json => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(io::stderr)
                        .with_target(true)
                        .with_level(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_span_events(FmtSpan::ACTIVE)
                        .json(),
                )
                .try_init()?;
        }
    }

    Ok(())
}

/// Initialize logging with default settings (info level, compact format)
pub fn init_default_logging() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(None, None)
}
