//! Geofence evaluation against hotspots and individually geofenced reports.
//!
//! The evaluator is stateless: every call returns the full set of currently
//! triggered notifications. Use [`crate::dedup::DedupeRing`] to surface only
//! new ones across calls.

use crate::errors::HazardError;
use crate::geo::Location;
use crate::models::{ClusterResult, Hotspot, Notification, NotificationKind, Report, Severity};

/// Check a location against every hotspot and geofenced unclustered report.
///
/// Hotspot notifications come first, then report notifications, each group in
/// input order. Reports without a geofence radius never alert on their own.
#[must_use]
pub fn check_geofences(
    location: Location,
    hotspots: &[Hotspot],
    unclustered_reports: &[Report],
) -> Vec<Notification> {
    let hotspot_alerts = hotspots.iter().filter_map(|hotspot| {
        let distance = location.distance_to(hotspot.center_lat, hotspot.center_lng);
        (distance <= hotspot.radius).then(|| hotspot_notification(hotspot, distance))
    });

    let report_alerts = unclustered_reports.iter().filter_map(|report| {
        let radius = report.geofence()?;
        let distance = location.distance_to(report.lat, report.lng);
        (distance <= radius).then(|| report_notification(report, distance))
    });

    hotspot_alerts.chain(report_alerts).collect()
}

/// Convenience wrapper taking a whole [`ClusterResult`].
#[must_use]
pub fn check_cluster_result(location: Location, result: &ClusterResult) -> Vec<Notification> {
    check_geofences(location, &result.hotspots, &result.unclustered_reports)
}

fn hotspot_notification(hotspot: &Hotspot, distance: f64) -> Notification {
    Notification {
        id: format!("hotspot-{}", hotspot.id),
        kind: NotificationKind::Hotspot,
        title: format!("Entering {} Priority Zone", hotspot.severity.label()),
        message: format!(
            "{} {} reports in this area",
            hotspot.report_count, hotspot.dominant_type
        ),
        severity: hotspot.severity,
        distance_m: round_meters(distance),
        hotspot_id: Some(hotspot.id.clone()),
        report_id: None,
        report_count: Some(hotspot.report_count),
    }
}

fn report_notification(report: &Report, distance: f64) -> Notification {
    Notification {
        id: format!("report-{}", report.id),
        kind: NotificationKind::Report,
        title: "Near reported issue".to_string(),
        message: format!("{}: {}", report.report_type, report.description),
        severity: Severity::Low,
        distance_m: round_meters(distance),
        hotspot_id: None,
        report_id: Some(report.id.clone()),
        report_count: None,
    }
}

// Only called for distances already within a finite radius.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_meters(distance: f64) -> u64 {
    distance.round() as u64
}

/// Destination for notifications produced by a geofence check.
///
/// Delivery (terminal, OS alert, push) is up to the implementor.
pub trait NotificationSink {
    /// Deliver a single notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot accept the notification.
    fn deliver(&mut self, notification: &Notification) -> Result<(), HazardError>;
}

impl NotificationSink for Vec<Notification> {
    fn deliver(&mut self, notification: &Notification) -> Result<(), HazardError> {
        self.push(notification.clone());
        Ok(())
    }
}

/// Deliver every notification in order, stopping at the first failure.
///
/// # Errors
///
/// Propagates the first sink error.
pub fn deliver_all<S: NotificationSink + ?Sized>(
    sink: &mut S,
    notifications: &[Notification],
) -> Result<(), HazardError> {
    for notification in notifications {
        sink.deliver(notification)?;
    }
    Ok(())
}
