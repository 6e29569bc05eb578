//! Report source: loads the report list exported by the report store.
//!
//! Accepts the JSON array returned by the store's report listing (one object
//! per row). Rows that fail to decode or validate are skipped with a warning
//! instead of being silently dropped later by `NaN` distance comparisons.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::errors::HazardError;
use crate::models::Report;

/// Where to read reports from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportSource {
    /// A JSON file, re-read on every fetch
    File(PathBuf),
    /// Standard input, read once
    Stdin,
}

impl std::str::FromStr for ReportSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err("report source must not be empty".into()),
            "-" => Ok(Self::Stdin),
            path => Ok(Self::File(PathBuf::from(path))),
        }
    }
}

impl std::fmt::Display for ReportSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdin => f.write_str("<stdin>"),
        }
    }
}

impl ReportSource {
    /// Read and validate the current report set.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or is not a JSON array
    /// of reports. Individual invalid rows are skipped, not fatal.
    #[instrument(skip(self), fields(source = %self))]
    pub fn fetch(&self) -> Result<Vec<Report>, HazardError> {
        let raw = match self {
            Self::File(path) => read_file(path)?,
            Self::Stdin => {
                let mut buf = String::new();
                io::stdin().read_to_string(&mut buf)?;
                buf
            }
        };
        parse_reports(&raw)
    }
}

fn read_file(path: &Path) -> Result<String, HazardError> {
    debug!("reading reports from {}", path.display());
    Ok(fs::read_to_string(path)?)
}

/// Parse a JSON array of report rows, keeping only valid reports.
///
/// Each row is decoded on its own, so one malformed row (non-numeric
/// coordinate, null timestamp) is skipped without losing the rest.
/// Input order is preserved; clustering depends on it.
///
/// # Errors
///
/// Returns an error if the document is not a JSON array.
pub fn parse_reports(raw: &str) -> Result<Vec<Report>, HazardError> {
    let rows: Vec<Value> = serde_json::from_str(raw)?;
    let total = rows.len();

    let reports: Vec<Report> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(idx, row)| {
            let label = row_label(idx, &row);
            let report = match serde_json::from_value::<Report>(row) {
                Ok(report) => report,
                Err(e) => {
                    warn!("skipping report {label}: {e}");
                    return None;
                }
            };
            match report.validate() {
                Ok(()) => Some(report),
                Err(e) => {
                    warn!("skipping report {label}: {e}");
                    None
                }
            }
        })
        .collect();

    debug!("loaded {} reports ({} rejected)", reports.len(), total - reports.len());
    Ok(reports)
}

/// `#<index> (id <id>)` for log lines, tolerating rows without a usable id.
fn row_label(idx: usize, row: &Value) -> String {
    match row.get("id") {
        Some(Value::String(id)) => format!("#{idx} (id {id})"),
        Some(Value::Number(id)) => format!("#{idx} (id {id})"),
        _ => format!("#{idx}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_parse() {
        assert_eq!("-".parse::<ReportSource>().unwrap(), ReportSource::Stdin);
        assert_eq!(
            "reports.json".parse::<ReportSource>().unwrap(),
            ReportSource::File(PathBuf::from("reports.json"))
        );
        assert!("  ".parse::<ReportSource>().is_err());
    }

    #[test]
    fn test_parse_reports_skips_invalid_rows() {
        let raw = r#"[
            {"id": 1, "report_type": "Flood", "description": "a", "lat": 10.0, "lng": 20.0,
             "created_at": "2024-06-01T00:00:00Z"},
            {"id": 2, "report_type": "Flood", "description": "b", "lat": 95.0, "lng": 20.0,
             "created_at": "2024-06-01T00:00:00Z"},
            {"id": 3, "report_type": "Accident", "description": "c", "lat": "10.001", "lng": "20.001",
             "created_at": "2024-06-01T00:00:00Z"}
        ]"#;

        let reports = parse_reports(raw).unwrap();
        let ids: Vec<&str> = reports.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_parse_reports_skips_undecodable_rows() {
        let raw = r#"[
            {"id": 1, "report_type": "Flood", "lat": 10.0, "lng": 20.0,
             "created_at": "2024-06-01T00:00:00Z"},
            {"id": 2, "report_type": "Flood", "lat": "n/a", "lng": 20.0,
             "created_at": "2024-06-01T00:00:00Z"},
            {"id": 3, "report_type": "Flood", "lat": null, "lng": 20.0,
             "created_at": "2024-06-01T00:00:00Z"},
            {"id": 4, "report_type": "Flood", "lat": 10.0, "lng": 20.0,
             "created_at": null},
            {"id": 5, "report_type": "Flood", "lat": 10.0, "lng": 20.0},
            "not a row",
            {"id": 7, "report_type": "Oil Spill", "lat": "10.002", "lng": 20.0,
             "created_at": "2024-06-01 08:30:00"}
        ]"#;

        let reports = parse_reports(raw).unwrap();
        let ids: Vec<&str> = reports.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "7"]);
    }

    #[test]
    fn test_row_label() {
        let row: Value = serde_json::json!({"id": 12});
        assert_eq!(row_label(3, &row), "#3 (id 12)");
        assert_eq!(row_label(0, &Value::Null), "#0");
    }

    #[test]
    fn test_parse_reports_rejects_non_array() {
        assert!(matches!(
            parse_reports(r#"{"error": "Database error"}"#),
            Err(HazardError::Parse(_))
        ));
    }

    #[test]
    fn test_fetch_file() {
        let path = std::env::temp_dir().join(format!("hazardwatch-{}.json", std::process::id()));
        fs::write(
            &path,
            r#"[{"id": 9, "report_type": "High Waves", "lat": 1.0, "lng": 2.0,
                 "created_at": "2024-06-01T00:00:00Z"}]"#,
        )
        .unwrap();

        let reports = ReportSource::File(path.clone()).fetch().unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].id, "9");
    }

    #[test]
    fn test_fetch_missing_file() {
        let source = ReportSource::File(PathBuf::from("/nonexistent/hazardwatch/reports.json"));
        assert!(matches!(source.fetch(), Err(HazardError::Io(_))));
    }
}
