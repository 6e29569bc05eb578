//! Error types for hazardwatch.
//!
//! Uses `thiserror` for library-style error definitions.

use thiserror::Error;

/// Errors that can occur in hazardwatch operations.
#[derive(Error, Debug)]
pub enum HazardError {
    /// Reading a report source failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed
    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Latitude/longitude outside WGS-84 bounds or not finite
    #[error("Invalid coordinate ({lat}, {lng})")]
    InvalidCoordinate { lat: f64, lng: f64 },

    /// Report validation failed
    #[error("Invalid report data: {0}")]
    Validation(String),

    /// Engine configuration rejected
    #[error("Invalid configuration: {0}")]
    Config(String),
}
