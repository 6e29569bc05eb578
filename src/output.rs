//! Output formatters for hotspots, reports and notifications.
//!
//! Supports human-readable (with colors), JSON, and NDJSON formats.

use std::io::{self, Write};

use serde::Serialize;

use crate::errors::HazardError;
use crate::geofence::NotificationSink;
use crate::models::{Hotspot, Notification, NotificationKind, Report, Severity};

// ANSI color codes
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

// Severity colors
const RED: &str = "\x1b[91m"; // high
const ORANGE: &str = "\x1b[38;5;208m"; // medium
const YELLOW: &str = "\x1b[93m"; // low

const ICON_HIGH: &str = "🚨";
const ICON_MEDIUM: &str = "⚠️";
const ICON_LOW: &str = "📍";

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Human-readable terminal output (default)
    #[default]
    Human,
    /// JSON array
    Json,
    /// Newline-delimited JSON (one object per line)
    Ndjson,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "ndjson" => Ok(Self::Ndjson),
            _ => Err(format!("unknown format: {s} (expected: human, json, ndjson)")),
        }
    }
}

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::High => RED,
        Severity::Medium => ORANGE,
        Severity::Low => YELLOW,
    }
}

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::High => ICON_HIGH,
        Severity::Medium => ICON_MEDIUM,
        Severity::Low => ICON_LOW,
    }
}

fn write_json<W: Write, T: Serialize>(writer: &mut W, items: &[T]) -> io::Result<()> {
    let json = serde_json::to_string_pretty(items)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{json}")
}

fn write_ndjson<W: Write, T: Serialize>(writer: &mut W, items: &[T]) -> io::Result<()> {
    for item in items {
        let json = serde_json::to_string(item)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writeln!(writer, "{json}")?;
    }
    Ok(())
}

/// Write hotspots in human-readable format.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_hotspots_human<W: Write>(writer: &mut W, hotspots: &[Hotspot]) -> io::Result<()> {
    for hotspot in hotspots {
        let color = severity_color(hotspot.severity);
        let icon = severity_icon(hotspot.severity);
        let breakdown = hotspot
            .type_distribution
            .iter()
            .map(|(t, c)| format!("{t}:{c}"))
            .collect::<Vec<_>>()
            .join(", ");

        writeln!(
            writer,
            "{icon} {color}{BOLD}{label:6}{RESET} │ \
             {count:>3} reports │ \
             {dominant:11} │ \
             {lat:.4}, {lng:.4} │ \
             {DIM}r={radius:.0}m{RESET} │ \
             {DIM}{breakdown}{RESET}",
            label = hotspot.severity.label(),
            count = hotspot.report_count,
            dominant = hotspot.dominant_type.as_str(),
            lat = hotspot.center_lat,
            lng = hotspot.center_lng,
            radius = hotspot.radius,
        )?;
    }
    Ok(())
}

/// Write unclustered reports in human-readable format.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_reports_human<W: Write>(writer: &mut W, reports: &[Report]) -> io::Result<()> {
    for report in reports {
        let fence = report
            .geofence()
            .map(|r| format!(" {DIM}geofence {r:.0}m{RESET}"))
            .unwrap_or_default();
        writeln!(
            writer,
            "{ICON_LOW} {BOLD}{:11}{RESET} │ {:.4}, {:.4} │ {} │ {}{fence}",
            report.report_type.as_str(),
            report.lat,
            report.lng,
            report.created_at.format("%Y-%m-%d %H:%M"),
            report.description,
        )?;
    }
    Ok(())
}

/// Write notifications in human-readable format.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_notifications_human<W: Write>(
    writer: &mut W,
    notifications: &[Notification],
) -> io::Result<()> {
    for n in notifications {
        let color = severity_color(n.severity);
        let icon = match n.kind {
            NotificationKind::Hotspot => severity_icon(n.severity),
            NotificationKind::Report => ICON_LOW,
        };
        writeln!(
            writer,
            "{icon} {color}{BOLD}{}{RESET} │ {} │ {DIM}{}m away{RESET}",
            n.title, n.message, n.distance_m
        )?;
    }
    Ok(())
}

/// Write hotspots in the specified format.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_hotspots<W: Write>(writer: &mut W, hotspots: &[Hotspot], format: Format) -> io::Result<()> {
    match format {
        Format::Human => write_hotspots_human(writer, hotspots),
        Format::Json => write_json(writer, hotspots),
        Format::Ndjson => write_ndjson(writer, hotspots),
    }
}

/// Write reports in the specified format.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_reports<W: Write>(writer: &mut W, reports: &[Report], format: Format) -> io::Result<()> {
    match format {
        Format::Human => write_reports_human(writer, reports),
        Format::Json => write_json(writer, reports),
        Format::Ndjson => write_ndjson(writer, reports),
    }
}

/// Write notifications in the specified format.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_notifications<W: Write>(
    writer: &mut W,
    notifications: &[Notification],
    format: Format,
) -> io::Result<()> {
    match format {
        Format::Human => write_notifications_human(writer, notifications),
        Format::Json => write_json(writer, notifications),
        Format::Ndjson => write_ndjson(writer, notifications),
    }
}

/// Notification sink that renders each alert to a writer as it arrives.
///
/// JSON format degrades to NDJSON here since alerts are streamed one by one.
pub struct WriterSink<W: Write> {
    writer: W,
    format: Format,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W, format: Format) -> Self {
        Self { writer, format }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> NotificationSink for WriterSink<W> {
    fn deliver(&mut self, notification: &Notification) -> Result<(), HazardError> {
        let one = std::slice::from_ref(notification);
        match self.format {
            Format::Human => write_notifications_human(&mut self.writer, one)?,
            Format::Json | Format::Ndjson => write_ndjson(&mut self.writer, one)?,
        }
        // Flush after each alert for real-time output
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geofence::deliver_all;

    fn sample_notification() -> Notification {
        Notification {
            id: "report-3".into(),
            kind: NotificationKind::Report,
            title: "Near reported issue".into(),
            message: "Flood: Water over the road".into(),
            severity: Severity::Low,
            distance_m: 42,
            hotspot_id: None,
            report_id: Some("3".into()),
            report_count: None,
        }
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("human".parse::<Format>().unwrap(), Format::Human);
        assert_eq!("JSON".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("ndjson".parse::<Format>().unwrap(), Format::Ndjson);
        assert!("invalid".parse::<Format>().is_err());
    }

    #[test]
    fn test_notifications_ndjson() {
        let mut out = Vec::new();
        write_notifications(&mut out, &[sample_notification()], Format::Ndjson).unwrap();
        let text = String::from_utf8(out).unwrap();
        let value: serde_json::Value = serde_json::from_str(text.trim()).unwrap();

        assert_eq!(value["kind"], "report");
        assert_eq!(value["severity"], "low");
        assert_eq!(value["distance_m"], 42);
        assert_eq!(value["report_id"], "3");
        assert!(value.get("hotspot_id").is_none());
    }

    #[test]
    fn test_notifications_human() {
        let mut out = Vec::new();
        write_notifications(&mut out, &[sample_notification()], Format::Human).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Near reported issue"));
        assert!(text.contains("42m away"));
    }

    #[test]
    fn test_writer_sink_streams_lines() {
        let mut sink = WriterSink::new(Vec::new(), Format::Json);
        deliver_all(&mut sink, &[sample_notification(), sample_notification()]).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text.lines().count(), 2);
    }
}
