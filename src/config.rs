//! Hotspot engine configuration.

use serde::{Deserialize, Serialize};

use crate::errors::HazardError;

/// Minimum number of reports for a cluster to become a hotspot.
pub const DEFAULT_MIN_REPORTS: usize = 5;

/// Reports within this many meters of a seed report join its cluster.
pub const DEFAULT_CLUSTER_RADIUS_M: f64 = 1000.0;

/// Geofence radius around a hotspot center, in meters.
pub const DEFAULT_HOTSPOT_RADIUS_M: f64 = 500.0;

/// Tunable thresholds for clustering and geofencing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HotspotConfig {
    pub min_reports: usize,
    pub cluster_radius_m: f64,
    pub hotspot_radius_m: f64,
}

impl Default for HotspotConfig {
    fn default() -> Self {
        Self {
            min_reports: DEFAULT_MIN_REPORTS,
            cluster_radius_m: DEFAULT_CLUSTER_RADIUS_M,
            hotspot_radius_m: DEFAULT_HOTSPOT_RADIUS_M,
        }
    }
}

impl HotspotConfig {
    #[must_use]
    pub fn with_min_reports(mut self, min_reports: usize) -> Self {
        self.min_reports = min_reports;
        self
    }

    #[must_use]
    pub fn with_cluster_radius(mut self, meters: f64) -> Self {
        self.cluster_radius_m = meters;
        self
    }

    #[must_use]
    pub fn with_hotspot_radius(mut self, meters: f64) -> Self {
        self.hotspot_radius_m = meters;
        self
    }

    /// Reject configurations the engine cannot use meaningfully.
    ///
    /// # Errors
    ///
    /// Returns [`HazardError::Config`] for a zero report threshold or a
    /// non-positive / non-finite radius.
    pub fn validate(&self) -> Result<(), HazardError> {
        if self.min_reports == 0 {
            return Err(HazardError::Config("min_reports must be at least 1".into()));
        }
        if !self.cluster_radius_m.is_finite() || self.cluster_radius_m <= 0.0 {
            return Err(HazardError::Config(format!(
                "cluster radius must be positive, got {}",
                self.cluster_radius_m
            )));
        }
        if !self.hotspot_radius_m.is_finite() || self.hotspot_radius_m <= 0.0 {
            return Err(HazardError::Config(format!(
                "hotspot radius must be positive, got {}",
                self.hotspot_radius_m
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HotspotConfig::default();
        assert_eq!(config.min_reports, 5);
        assert!((config.cluster_radius_m - 1000.0).abs() < f64::EPSILON);
        assert!((config.hotspot_radius_m - 500.0).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = HotspotConfig::default()
            .with_min_reports(3)
            .with_cluster_radius(250.0)
            .with_hotspot_radius(100.0);
        assert_eq!(config.min_reports, 3);
        assert!((config.cluster_radius_m - 250.0).abs() < f64::EPSILON);
        assert!((config.hotspot_radius_m - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(HotspotConfig::default().with_min_reports(0).validate().is_err());
        assert!(HotspotConfig::default().with_cluster_radius(0.0).validate().is_err());
        assert!(HotspotConfig::default().with_cluster_radius(f64::NAN).validate().is_err());
        assert!(HotspotConfig::default().with_hotspot_radius(-5.0).validate().is_err());
    }
}
