//! Data models for hazard reports, hotspots and notifications.
//!
//! `Report` matches the row shape served by the report store
//! (`GET /api/reports`): snake_case columns, a serial id and decimal-degree
//! coordinates that may arrive either as JSON numbers or as numeric strings.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::classify::TypeDistribution;
use crate::errors::HazardError;
use crate::geo;

/// Hazard category chosen by the reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportType {
    Flood,
    OilSpill,
    HighWaves,
    MarineFire,
    Accident,
    DeadFish,
    Other,
}

impl ReportType {
    /// Display label, as submitted by the report form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flood => "Flood",
            Self::OilSpill => "Oil Spill",
            Self::HighWaves => "High Waves",
            Self::MarineFire => "Marine Fire",
            Self::Accident => "Accident",
            Self::DeadFish => "Dead Fish",
            Self::Other => "Other",
        }
    }
}

impl From<&str> for ReportType {
    /// Lenient parse: "Oil Spill", "OilSpill" and "oil_spill" all match.
    /// Anything unrecognised is `Other`.
    fn from(s: &str) -> Self {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "flood" => Self::Flood,
            "oilspill" => Self::OilSpill,
            "highwaves" => Self::HighWaves,
            "marinefire" => Self::MarineFire,
            "accident" => Self::Accident,
            "deadfish" => Self::DeadFish,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ReportType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ReportType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map_or(Self::Other, Self::from))
    }
}

/// A single citizen hazard report. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Store-assigned id (serial integer or string)
    #[serde(deserialize_with = "de_id")]
    pub id: String,

    #[serde(default, deserialize_with = "de_text")]
    pub reporter_name: String,

    pub report_type: ReportType,

    #[serde(default, deserialize_with = "de_text")]
    pub description: String,

    /// Latitude in decimal degrees (WGS-84)
    #[serde(deserialize_with = "de_coord")]
    pub lat: f64,

    /// Longitude in decimal degrees (WGS-84)
    #[serde(deserialize_with = "de_coord")]
    pub lng: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_path: Option<String>,

    /// Individual alert radius in meters, if the reporter set one
    #[serde(
        default,
        deserialize_with = "de_opt_coord",
        skip_serializing_if = "Option::is_none"
    )]
    pub geofence_radius: Option<f64>,

    /// Set by the store on insert; rows without one are rejected
    #[serde(deserialize_with = "de_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Report {
    /// Radius of this report's individual geofence, if it has a usable one.
    ///
    /// A zero radius is treated the same as no radius.
    #[must_use]
    pub fn geofence(&self) -> Option<f64> {
        self.geofence_radius.filter(|r| *r > 0.0)
    }

    /// Validate the report before it enters the engine.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty id, an invalid coordinate or a
    /// negative / non-finite geofence radius.
    pub fn validate(&self) -> Result<(), HazardError> {
        if self.id.trim().is_empty() {
            return Err(HazardError::Validation("empty report ID".into()));
        }
        geo::validate_coordinate(self.lat, self.lng)?;
        if let Some(radius) = self.geofence_radius {
            if !radius.is_finite() || radius < 0.0 {
                return Err(HazardError::Validation(format!(
                    "report {}: geofence radius {radius} must be a non-negative number",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

/// Hotspot priority, derived from member count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Upper-case label used in alert titles.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A committed cluster of nearby reports.
///
/// Always recomputed from the full report set, never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hotspot {
    /// `hotspot-<seed report id>`
    pub id: String,
    pub center_lat: f64,
    pub center_lng: f64,
    /// Members in discovery order, seed first
    pub reports: Vec<Report>,
    pub report_count: usize,
    pub dominant_type: ReportType,
    pub type_distribution: TypeDistribution,
    /// Geofence radius in meters
    pub radius: f64,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

/// Partition of a report set into hotspots and leftovers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClusterResult {
    pub hotspots: Vec<Hotspot>,
    pub unclustered_reports: Vec<Report>,
}

impl ClusterResult {
    /// Total number of reports across hotspots and leftovers.
    #[must_use]
    pub fn total_reports(&self) -> usize {
        self.unclustered_reports.len()
            + self.hotspots.iter().map(|h| h.reports.len()).sum::<usize>()
    }

    /// Find a hotspot by id.
    #[must_use]
    pub fn hotspot(&self, id: &str) -> Option<&Hotspot> {
        self.hotspots.iter().find(|h| h.id == id)
    }
}

/// What kind of geofence produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Hotspot,
    Report,
}

/// A proximity alert. Regenerated on every geofence check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    /// `hotspot-<hotspot id>` or `report-<report id>`
    pub id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub severity: Severity,
    /// Rounded distance from the location to the geofence center
    pub distance_m: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotspot_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_count: Option<usize>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Int(i64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberRepr {
    Number(f64),
    Text(String),
}

impl NumberRepr {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            Self::Number(n) => Ok(n),
            Self::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("expected a number, got {s:?}"))),
        }
    }
}

fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Int(n) => n.to_string(),
        IdRepr::Text(s) => s,
    })
}

fn de_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn de_coord<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    NumberRepr::deserialize(deserializer)?.into_f64()
}

fn de_opt_coord<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Option::<NumberRepr>::deserialize(deserializer)?
        .map(NumberRepr::into_f64)
        .transpose()
}

fn de_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?
        .ok_or_else(|| serde::de::Error::custom("created_at must not be null"))?;
    parse_timestamp(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

/// Parse RFC 3339, or a naive `YYYY-MM-DD[T ]HH:MM:SS[.f]` timestamp taken as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
