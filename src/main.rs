//! HazardWatch - hotspot and geofence alerts from your terminal.
//!
//! Reads the report list exported by the report store, clusters it into
//! hotspots, and checks a location against hotspot and report geofences.

use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use hazardwatch::dedup::DedupeRing;
use hazardwatch::output::{self, WriterSink};
use hazardwatch::source::ReportSource;
use hazardwatch::{ClusterResult, HotspotConfig, build_clusters, check_cluster_result, deliver_all};

mod cli;

use cli::{Cli, Command};

/// Shortest allowed interval between polls of the report source.
const MIN_POLL_INTERVAL_SECS: u64 = 5;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Cluster(args) => cmd_cluster(args),
        Command::Check(args) => cmd_check(args),
        Command::Watch(args) => cmd_watch(args),
    }
}

/// Initialize tracing subscriber.
fn init_tracing(verbose: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Fetch reports and cluster them with a validated config.
fn load_and_cluster(source: &ReportSource, config: &HotspotConfig) -> Result<ClusterResult> {
    config.validate().context("invalid clustering options")?;
    let reports = source
        .fetch()
        .with_context(|| format!("failed to load reports from {source}"))?;
    Ok(build_clusters(&reports, config))
}

/// Execute the `cluster` command - print hotspots (and optionally leftovers).
fn cmd_cluster(args: cli::ClusterArgs) -> Result<()> {
    let result = load_and_cluster(&args.reports, &args.engine.config())?;

    tracing::info!(
        "{} hotspots, {} unclustered reports",
        result.hotspots.len(),
        result.unclustered_reports.len()
    );

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    output::write_hotspots(&mut handle, &result.hotspots, args.format)?;
    if args.unclustered {
        output::write_reports(&mut handle, &result.unclustered_reports, args.format)?;
    }

    Ok(())
}

/// Execute the `check` command - one-shot geofence check.
fn cmd_check(args: cli::CheckArgs) -> Result<()> {
    let result = load_and_cluster(&args.reports, &args.engine.config())?;
    let notifications = check_cluster_result(args.location, &result);

    if notifications.is_empty() {
        tracing::info!("no geofences triggered at {},{}", args.location.lat, args.location.lng);
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    output::write_notifications(&mut handle, &notifications, args.format)?;

    Ok(())
}

/// Execute the `watch` command - periodic re-check, new alerts only.
fn cmd_watch(args: cli::WatchArgs) -> Result<()> {
    if args.reports == ReportSource::Stdin && !args.once {
        anyhow::bail!("watch needs a report file to re-read; use --once with stdin");
    }

    let poll_interval = args.poll_interval.max(MIN_POLL_INTERVAL_SECS);
    if poll_interval != args.poll_interval {
        tracing::warn!("poll interval clamped to minimum of {MIN_POLL_INTERVAL_SECS} seconds");
    }

    let config = args.engine.config();
    config.validate().context("invalid clustering options")?;

    // Bounded record of alerts already shown
    let mut dedup = DedupeRing::with_default_capacity();
    let mut sink = WriterSink::new(io::stdout(), args.format);

    tracing::info!(
        "watching {} at {},{} (poll every {}s)",
        args.reports,
        args.location.lat,
        args.location.lng,
        poll_interval
    );

    if args.once {
        poll_watch(&args, &config, &mut dedup, &mut sink, 1)?;
        return Ok(());
    }

    let mut poll_count = 0u64;

    loop {
        poll_count += 1;

        if let Err(e) = poll_watch(&args, &config, &mut dedup, &mut sink, poll_count) {
            tracing::warn!("poll failed, will retry: {e:#}");
        }

        std::thread::sleep(Duration::from_secs(poll_interval));
    }
}

/// One watch iteration: recompute from scratch and emit unseen alerts.
fn poll_watch<W: Write>(
    args: &cli::WatchArgs,
    config: &HotspotConfig,
    dedup: &mut DedupeRing,
    sink: &mut WriterSink<W>,
    poll_count: u64,
) -> Result<()> {
    let result = load_and_cluster(&args.reports, config)?;
    let notifications = check_cluster_result(args.location, &result);
    let surfaced = dedup.surface(&notifications);

    let update_count = surfaced.iter().filter(|(r, _)| r.is_update()).count();
    let fresh: Vec<_> = surfaced.into_iter().map(|(_, n)| n).collect();

    deliver_all(sink, &fresh).context("failed to write alerts")?;

    if !fresh.is_empty() {
        tracing::debug!(
            "poll #{}: {} active, {} new, {} updated (dedup rate: {:.1}%)",
            poll_count,
            notifications.len(),
            fresh.len() - update_count,
            update_count,
            dedup.dupe_rate() * 100.0
        );
    }

    Ok(())
}
