//! Command-line interface definitions.
//!
//! Uses clap derive API for argument parsing.

use clap::{Args, Parser, Subcommand};

use hazardwatch::config::{
    DEFAULT_CLUSTER_RADIUS_M, DEFAULT_HOTSPOT_RADIUS_M, DEFAULT_MIN_REPORTS,
};
use hazardwatch::output::Format;
use hazardwatch::source::ReportSource;
use hazardwatch::{HotspotConfig, Location};

/// Hotspot clustering and geofence alerts for citizen hazard reports.
#[derive(Parser, Debug)]
#[command(name = "hazardwatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    pub quiet: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Cluster reports into hotspots and print them
    Cluster(ClusterArgs),

    /// Check a location against hotspot and report geofences (one-shot)
    Check(CheckArgs),

    /// Re-check a location periodically, printing only new alerts
    Watch(WatchArgs),
}

/// Clustering thresholds shared by every command.
#[derive(Args, Debug, Clone, Copy)]
pub struct EngineArgs {
    /// Minimum reports for a cluster to become a hotspot
    #[arg(long, default_value_t = DEFAULT_MIN_REPORTS)]
    pub min_reports: usize,

    /// Cluster radius in meters, measured from the seed report
    #[arg(long, default_value_t = DEFAULT_CLUSTER_RADIUS_M)]
    pub cluster_radius: f64,

    /// Geofence radius around each hotspot center, in meters
    #[arg(long, default_value_t = DEFAULT_HOTSPOT_RADIUS_M)]
    pub hotspot_radius: f64,
}

impl EngineArgs {
    pub fn config(self) -> HotspotConfig {
        HotspotConfig::default()
            .with_min_reports(self.min_reports)
            .with_cluster_radius(self.cluster_radius)
            .with_hotspot_radius(self.hotspot_radius)
    }
}

/// Arguments for the `cluster` command.
#[derive(Parser, Debug)]
pub struct ClusterArgs {
    /// Report list as JSON (path, or "-" for stdin)
    #[arg(long, short = 'r', value_parser = parse_source)]
    pub reports: ReportSource,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// Also print reports that did not join any hotspot
    #[arg(long)]
    pub unclustered: bool,

    /// Output format
    #[arg(long, short = 'f', default_value = "human", value_parser = parse_format)]
    pub format: Format,
}

/// Arguments for the `check` command.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Report list as JSON (path, or "-" for stdin)
    #[arg(long, short = 'r', value_parser = parse_source)]
    pub reports: ReportSource,

    /// Current location: lat,lng
    #[arg(long, short = 'l', value_parser = parse_location)]
    pub location: Location,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// Output format
    #[arg(long, short = 'f', default_value = "human", value_parser = parse_format)]
    pub format: Format,
}

/// Arguments for the `watch` command.
#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// Report list as a JSON file, re-read on every poll
    #[arg(long, short = 'r', value_parser = parse_source)]
    pub reports: ReportSource,

    /// Current location: lat,lng
    #[arg(long, short = 'l', value_parser = parse_location)]
    pub location: Location,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// Poll interval in seconds (minimum 5)
    #[arg(long, default_value = "30")]
    pub poll_interval: u64,

    /// Run a single poll and exit
    #[arg(long)]
    pub once: bool,

    /// Output format
    #[arg(long, short = 'f', default_value = "human", value_parser = parse_format)]
    pub format: Format,
}

/// Parse an output format from string.
fn parse_format(s: &str) -> Result<Format, String> {
    s.parse()
}

/// Parse a location from string.
fn parse_location(s: &str) -> Result<Location, String> {
    s.parse()
}

/// Parse a report source from string.
fn parse_source(s: &str) -> Result<ReportSource, String> {
    s.parse()
}
