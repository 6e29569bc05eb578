//! HazardWatch - hotspot clustering and geofence alerting for hazard reports.
//!
//! Groups citizen hazard reports into hotspots, classifies their severity,
//! and checks a location against hotspot and per-report geofences.
//! The engine is synchronous and pure: it consumes a report list and a
//! location and returns data. Fetching, persistence and delivery belong to
//! the caller.
//!
//! ```no_run
//! use hazardwatch::{HotspotConfig, Location, build_clusters, check_geofences};
//!
//! # fn demo(reports: Vec<hazardwatch::Report>) -> Result<(), hazardwatch::HazardError> {
//! let result = build_clusters(&reports, &HotspotConfig::default());
//! let here = Location::new(19.076, 72.8777)?;
//! for alert in check_geofences(here, &result.hotspots, &result.unclustered_reports) {
//!     println!("{}: {}", alert.title, alert.message);
//! }
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod cluster;
pub mod config;
pub mod dedup;
pub mod errors;
pub mod geo;
pub mod geofence;
pub mod models;
pub mod output;
pub mod source;

pub use classify::TypeDistribution;
pub use cluster::{build_clusters, build_clusters_at};
pub use config::HotspotConfig;
pub use errors::HazardError;
pub use geo::{Location, haversine_distance};
pub use geofence::{NotificationSink, check_cluster_result, check_geofences, deliver_all};
pub use models::{
    ClusterResult, Hotspot, Notification, NotificationKind, Report, ReportType, Severity,
};
