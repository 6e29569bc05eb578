//! Greedy seed-based clustering of reports into hotspots.
//!
//! Each unused report seeds a candidate cluster holding every other unused
//! report within `cluster_radius_m` of the seed itself (not of a running
//! centroid). Candidates that reach `min_reports` are committed; smaller ones
//! are discarded and their seed stays available to later clusters. The result
//! depends on input order, so callers should keep the store's ordering stable.
//!
//! Cost is O(n²) in the number of reports: recompute once per poll, not once
//! per location update.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::classify;
use crate::config::HotspotConfig;
use crate::geo::haversine_distance;
use crate::models::{ClusterResult, Hotspot, Report};

/// Cluster reports using the current time as the hotspot timestamp.
#[must_use]
pub fn build_clusters(reports: &[Report], config: &HotspotConfig) -> ClusterResult {
    build_clusters_at(reports, config, Utc::now())
}

/// Cluster reports, stamping hotspots with `now`.
#[must_use]
pub fn build_clusters_at(
    reports: &[Report],
    config: &HotspotConfig,
    now: DateTime<Utc>,
) -> ClusterResult {
    let mut used = vec![false; reports.len()];
    let mut hotspots = Vec::new();

    for (seed_idx, seed) in reports.iter().enumerate() {
        if used[seed_idx] {
            continue;
        }

        let members: Vec<usize> = std::iter::once(seed_idx)
            .chain((0..reports.len()).filter(|&idx| {
                idx != seed_idx
                    && !used[idx]
                    && haversine_distance(seed.lat, seed.lng, reports[idx].lat, reports[idx].lng)
                        <= config.cluster_radius_m
            }))
            .collect();

        if members.len() < config.min_reports {
            continue;
        }

        for &idx in &members {
            used[idx] = true;
        }
        let member_reports: Vec<Report> = members.iter().map(|&idx| reports[idx].clone()).collect();
        hotspots.push(make_hotspot(seed, member_reports, config, now));
    }

    let unclustered_reports: Vec<Report> = reports
        .iter()
        .zip(&used)
        .filter(|(_, used)| !**used)
        .map(|(report, _)| report.clone())
        .collect();

    debug!(
        "clustered {} reports: {} hotspots, {} unclustered",
        reports.len(),
        hotspots.len(),
        unclustered_reports.len()
    );

    ClusterResult {
        hotspots,
        unclustered_reports,
    }
}

#[allow(clippy::cast_precision_loss)]
fn make_hotspot(
    seed: &Report,
    members: Vec<Report>,
    config: &HotspotConfig,
    now: DateTime<Utc>,
) -> Hotspot {
    // Plain arithmetic mean of degrees, not a spherical centroid
    let n = members.len() as f64;
    let center_lat = members.iter().map(|r| r.lat).sum::<f64>() / n;
    let center_lng = members.iter().map(|r| r.lng).sum::<f64>() / n;

    let classification = classify::classify(&members);

    Hotspot {
        id: format!("hotspot-{}", seed.id),
        center_lat,
        center_lng,
        report_count: members.len(),
        reports: members,
        dominant_type: classification.dominant_type,
        type_distribution: classification.type_distribution,
        radius: config.hotspot_radius_m,
        severity: classification.severity,
        created_at: now,
    }
}
