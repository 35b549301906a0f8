//! Command-line interface for the kintree utility
//!
//! Reads a JSON array of relationship links, computes the layout for a chosen
//! focus person, and writes the positioned nodes and connector lines back out
//! as JSON. The drawing itself is left to whatever consumes the output.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::debug;

use kintree::core::logging::init_logging;
use kintree::layout::rank::assign_ranks;
use kintree::{LayoutConfig, Link, TreeLayout};

/// Kintree - Compute family-tree layouts from relationship lists
#[derive(Parser)]
#[command(name = "kintree")]
#[command(about = "A Rust utility to compute family-tree layouts from JSON relationship lists")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute a layout for a JSON list of relationship links
    Layout {
        /// Person to center the tree on
        #[arg(short, long)]
        focus: String,

        /// Input file containing a JSON array of links (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the layout JSON (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Horizontal space allotted to one person box, in rendering units
        #[arg(long, default_value_t = LayoutConfig::default().node_width)]
        node_width: f64,

        /// Minimum horizontal gap between neighbouring boxes
        #[arg(long, default_value_t = LayoutConfig::default().min_h_spacing)]
        min_h_spacing: f64,

        /// Horizontal gap between the boxes of a couple
        #[arg(long, default_value_t = LayoutConfig::default().partner_h_spacing)]
        partner_h_spacing: f64,

        /// Vertical distance between generations
        #[arg(long, default_value_t = LayoutConfig::default().rank_height)]
        rank_height: f64,

        /// Vertical distance between stacked child-line crossbars
        #[arg(long, default_value_t = LayoutConfig::default().line_v_spacing)]
        line_v_spacing: f64,

        /// Seed for the ordering retry shuffle
        #[arg(long, default_value_t = LayoutConfig::default().seed)]
        seed: u64,

        /// Pretty-print the output JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Parse a link file and report rank statistics without computing coordinates
    Check {
        /// Person to center the tree on
        #[arg(short, long)]
        focus: String,

        /// Input file containing a JSON array of links (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

/// Main application driver
pub struct KintreeApp;

impl KintreeApp {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, cli: Cli) -> Result<()> {
        if let Err(e) = init_logging(Some(cli.log_level.as_str()), Some(cli.log_format.as_str()))
        {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        match cli.command {
            Commands::Layout {
                focus,
                input,
                output,
                node_width,
                min_h_spacing,
                partner_h_spacing,
                rank_height,
                line_v_spacing,
                seed,
                pretty,
            } => {
                let links = read_links(input)?;
                let engine = TreeLayout::with_config(LayoutConfig {
                    node_width,
                    min_h_spacing,
                    partner_h_spacing,
                    rank_height,
                    line_v_spacing,
                    seed,
                });
                let result = engine.layout(&focus, &links)?;

                let json = if pretty {
                    serde_json::to_string_pretty(&result)?
                } else {
                    serde_json::to_string(&result)?
                };
                write_output(output, &json)?;
                Ok(())
            }

            Commands::Check { focus, input } => {
                let links = read_links(input)?;
                let ranks = assign_ranks(&focus, &links)?;

                let people: usize = ranks.iter().map(|row| row.len()).sum();
                println!("links: {}", links.len());
                println!("people: {}", people);
                println!("generations: {}", ranks.len());
                for (index, row) in ranks.iter().enumerate() {
                    println!("  generation {}: {} people", index, row.len());
                }
                Ok(())
            }
        }
    }
}

impl Default for KintreeApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Read and parse the link list from a file or stdin
fn read_links(input: Option<PathBuf>) -> Result<Vec<Link>> {
    let text = read_input(input)?;
    let links: Vec<Link> =
        serde_json::from_str(&text).context("input is not a valid JSON array of links")?;
    if links.is_empty() {
        return Err(anyhow!("input contains no links"));
    }
    debug!(link_count = links.len(), "parsed links");
    Ok(links)
}

/// Read input from a file or stdin (when the path is `-` or absent)
fn read_input(input: Option<PathBuf>) -> Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

/// Write output to a file or stdout (when the path is `-` or absent)
fn write_output(output: Option<PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) if path.as_os_str() != "-" => {
            fs::write(&path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        _ => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(content.as_bytes())?;
            handle.write_all(b"\n")?;
        }
    }
    Ok(())
}
