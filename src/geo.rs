//! Great-circle distance and coordinate handling.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::errors::HazardError;

/// Mean Earth radius in meters for haversine calculations.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate the great-circle distance between two points using the haversine formula.
///
/// Returns distance in meters. No validation is performed: non-finite input
/// yields `NaN`, which compares false against every radius threshold.
#[must_use]
pub fn haversine_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1 * PI / 180.0;
    let lat2_rad = lat2 * PI / 180.0;
    let delta_lat = (lat2 - lat1) * PI / 180.0;
    let delta_lng = (lng2 - lng1) * PI / 180.0;

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Check that a coordinate pair is finite and within WGS-84 bounds.
///
/// # Errors
///
/// Returns [`HazardError::InvalidCoordinate`] when either value is out of range.
pub fn validate_coordinate(lat: f64, lng: f64) -> Result<(), HazardError> {
    let lat_ok = lat.is_finite() && (-90.0..=90.0).contains(&lat);
    let lng_ok = lng.is_finite() && (-180.0..=180.0).contains(&lng);
    if lat_ok && lng_ok {
        Ok(())
    } else {
        Err(HazardError::InvalidCoordinate { lat, lng })
    }
}

/// A user position in decimal degrees.
///
/// Deserializing goes through [`Location::new`], so range checks always apply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLocation")]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Deserialize)]
struct RawLocation {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawLocation> for Location {
    type Error = HazardError;

    fn try_from(raw: RawLocation) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lng)
    }
}

impl Location {
    /// Create a validated location.
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinate is not finite or out of range.
    pub fn new(lat: f64, lng: f64) -> Result<Self, HazardError> {
        validate_coordinate(lat, lng)?;
        Ok(Self { lat, lng })
    }

    /// Distance in meters to another point.
    #[must_use]
    pub fn distance_to(&self, lat: f64, lng: f64) -> f64 {
        haversine_distance(self.lat, self.lng, lat, lng)
    }
}

impl std::str::FromStr for Location {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 2 {
            return Err(format!(
                "location requires 2 values (lat,lng), got {}",
                parts.len()
            ));
        }

        let vals: Result<Vec<f64>, _> = parts.iter().map(|p| p.trim().parse::<f64>()).collect();
        let vals = vals.map_err(|e| format!("invalid number in location: {e}"))?;

        Self::new(vals[0], vals[1]).map_err(|e| e.to_string())
    }
}
