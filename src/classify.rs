//! Hotspot classification: type breakdown, dominant type and severity.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::models::{Report, ReportType, Severity};

/// Member count at which a hotspot becomes high priority.
pub const HIGH_SEVERITY_COUNT: usize = 8;

/// Member count at which a hotspot becomes medium priority.
pub const MEDIUM_SEVERITY_COUNT: usize = 6;

/// Per-type report counts, in the order each type was first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeDistribution {
    entries: Vec<(ReportType, usize)>,
}

impl TypeDistribution {
    /// Count report types across a cluster's members.
    #[must_use]
    pub fn from_reports(reports: &[Report]) -> Self {
        let mut dist = Self::default();
        for report in reports {
            dist.record(report.report_type);
        }
        dist
    }

    /// Increment the count for one report type.
    pub fn record(&mut self, report_type: ReportType) {
        match self.entries.iter_mut().find(|(t, _)| *t == report_type) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((report_type, 1)),
        }
    }

    /// Count for a single type (zero if never seen).
    #[must_use]
    pub fn count(&self, report_type: ReportType) -> usize {
        self.entries
            .iter()
            .find(|(t, _)| *t == report_type)
            .map_or(0, |(_, c)| *c)
    }

    /// The most frequent type. Ties go to the type seen first.
    #[must_use]
    pub fn dominant(&self) -> Option<ReportType> {
        let mut best: Option<(ReportType, usize)> = None;
        for &(report_type, count) in &self.entries {
            // strict > keeps the earlier entry on ties
            if best.is_none_or(|(_, best_count)| count > best_count) {
                best = Some((report_type, count));
            }
        }
        best.map(|(t, _)| t)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ReportType, usize)> + '_ {
        self.entries.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for TypeDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (report_type, count) in &self.entries {
            map.serialize_entry(report_type.as_str(), count)?;
        }
        map.end()
    }
}

/// Severity for a hotspot with the given number of members.
#[must_use]
pub fn severity_for(report_count: usize) -> Severity {
    match report_count {
        n if n >= HIGH_SEVERITY_COUNT => Severity::High,
        n if n >= MEDIUM_SEVERITY_COUNT => Severity::Medium,
        _ => Severity::Low,
    }
}

/// Derived metadata for one committed cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub type_distribution: TypeDistribution,
    pub dominant_type: ReportType,
    pub severity: Severity,
}

/// Classify a cluster's members.
///
/// An empty member list never occurs for a committed cluster; it classifies
/// as `Other` / `Low`.
#[must_use]
pub fn classify(members: &[Report]) -> Classification {
    let type_distribution = TypeDistribution::from_reports(members);
    let dominant_type = type_distribution.dominant().unwrap_or(ReportType::Other);
    Classification {
        type_distribution,
        dominant_type,
        severity: severity_for(members.len()),
    }
}
