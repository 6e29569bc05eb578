//! Bounded tracker of notifications already surfaced to the user.
//!
//! The geofence evaluator reports every zone the location is currently
//! inside. This ring remembers which of those were already shown so repeated
//! checks only surface new alerts. Follows NASA Power of 10: bounded
//! resources, no unbounded growth over long sessions.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::models::{Notification, NotificationKind};

/// Default capacity for the deduplication ring.
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Notification ids already surfaced, bounded by insertion age.
///
/// `revisions` answers lookups; `order` decides which id is evicted once
/// `capacity` is reached. Both always hold the same set of ids.
#[derive(Debug)]
pub struct DedupeRing {
    /// id -> hotspot member count when last shown (0 for report alerts)
    revisions: HashMap<String, u64>,
    /// ids, oldest first
    order: VecDeque<String>,
    capacity: usize,
    checks: u64,
    dupes: u64,
}

impl DedupeRing {
    /// # Panics
    ///
    /// Panics if capacity is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be positive");

        Self {
            revisions: HashMap::new(),
            order: VecDeque::new(),
            capacity,
            checks: 0,
            dupes: 0,
        }
    }

    #[must_use]
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Check whether a notification should be surfaced, and mark it seen.
    ///
    /// A higher `revision` than the stored one (a hotspot that gained
    /// members) counts as an update.
    pub fn check_and_mark(&mut self, id: &str, revision: u64) -> DedupeResult {
        self.checks += 1;

        let Some(stored) = self.revisions.get_mut(id) else {
            self.remember(id.to_string(), revision);
            return DedupeResult::New;
        };

        if revision > *stored {
            *stored = revision;
            DedupeResult::Updated
        } else {
            self.dupes += 1;
            DedupeResult::Duplicate
        }
    }

    /// Filter a fresh geofence result down to alerts worth surfacing.
    ///
    /// Entries for zones no longer in `notifications` are dropped first, so
    /// leaving a zone and coming back alerts again.
    pub fn surface(&mut self, notifications: &[Notification]) -> Vec<(DedupeResult, Notification)> {
        let active: HashSet<&str> = notifications.iter().map(|n| n.id.as_str()).collect();
        self.retain(|id| active.contains(id));

        notifications
            .iter()
            .filter_map(|n| {
                let result = self.check_and_mark(&n.id, revision_of(n));
                result.should_emit().then(|| (result, n.clone()))
            })
            .collect()
    }

    /// Keep only the IDs for which `keep` returns true.
    pub fn retain<F: FnMut(&str) -> bool>(&mut self, mut keep: F) {
        self.revisions.retain(|id, _| keep(id));
        let revisions = &self.revisions;
        self.order.retain(|id| revisions.contains_key(id));
    }

    fn remember(&mut self, id: String, revision: u64) {
        if self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.revisions.remove(&oldest);
            }
        }
        self.order.push_back(id.clone());
        self.revisions.insert(id, revision);

        debug_assert_eq!(self.order.len(), self.revisions.len());
        debug_assert!(self.order.len() <= self.capacity);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }

    #[must_use]
    pub fn total_seen(&self) -> u64 {
        self.checks
    }

    #[must_use]
    pub fn total_dupes(&self) -> u64 {
        self.dupes
    }

    /// Share of checks that were duplicates (0.0 to 1.0).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn dupe_rate(&self) -> f64 {
        match self.checks {
            0 => 0.0,
            checks => self.dupes as f64 / checks as f64,
        }
    }

    /// Forget everything, e.g. after the user dismisses all alerts.
    pub fn clear(&mut self) {
        self.revisions.clear();
        self.order.clear();
        self.checks = 0;
        self.dupes = 0;
    }
}

impl Default for DedupeRing {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

fn revision_of(notification: &Notification) -> u64 {
    match notification.kind {
        NotificationKind::Hotspot => notification.report_count.map_or(0, |c| c as u64),
        NotificationKind::Report => 0,
    }
}

/// Result of a deduplication check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupeResult {
    /// Never seen before (or seen, left, and re-entered)
    New,
    /// Seen, but the hotspot has grown since
    Updated,
    /// Already surfaced
    Duplicate,
}

impl DedupeResult {
    #[must_use]
    pub fn should_emit(self) -> bool {
        match self {
            Self::New | Self::Updated => true,
            Self::Duplicate => false,
        }
    }

    #[must_use]
    pub fn is_update(self) -> bool {
        matches!(self, Self::Updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    fn hotspot_alert(id: &str, count: usize) -> Notification {
        Notification {
            id: format!("hotspot-{id}"),
            kind: NotificationKind::Hotspot,
            title: "Entering LOW Priority Zone".into(),
            message: format!("{count} Flood reports in this area"),
            severity: Severity::Low,
            distance_m: 10,
            hotspot_id: Some(id.into()),
            report_id: None,
            report_count: Some(count),
        }
    }

    #[test]
    fn test_new_and_duplicate() {
        let mut ring = DedupeRing::new(100);

        assert_eq!(ring.check_and_mark("hotspot-a", 5), DedupeResult::New);
        assert_eq!(ring.check_and_mark("report-1", 0), DedupeResult::New);
        assert_eq!(ring.check_and_mark("hotspot-a", 5), DedupeResult::Duplicate);

        assert_eq!(ring.len(), 2);
        assert_eq!(ring.total_seen(), 3);
        assert_eq!(ring.total_dupes(), 1);
    }

    #[test]
    fn test_growing_hotspot_is_update() {
        let mut ring = DedupeRing::new(100);

        assert_eq!(ring.check_and_mark("hotspot-a", 5), DedupeResult::New);
        assert_eq!(ring.check_and_mark("hotspot-a", 6), DedupeResult::Updated);
        assert_eq!(ring.check_and_mark("hotspot-a", 5), DedupeResult::Duplicate);
        assert!(DedupeResult::Updated.is_update());
    }

    #[test]
    fn test_bounded_capacity() {
        let mut ring = DedupeRing::new(3);

        ring.check_and_mark("a", 0);
        ring.check_and_mark("b", 0);
        ring.check_and_mark("c", 0);
        ring.check_and_mark("d", 0);
        assert_eq!(ring.len(), 3);

        // "a" was evicted
        assert_eq!(ring.check_and_mark("a", 0), DedupeResult::New);
        assert_eq!(ring.check_and_mark("c", 0), DedupeResult::Duplicate);
    }

    #[test]
    fn test_surface_only_new_alerts() {
        let mut ring = DedupeRing::default();
        let first = vec![hotspot_alert("a", 5)];

        assert_eq!(ring.surface(&first).len(), 1);
        assert!(ring.surface(&first).is_empty());

        let grown = vec![hotspot_alert("a", 6), hotspot_alert("b", 5)];
        let surfaced = ring.surface(&grown);
        let results: Vec<DedupeResult> = surfaced.iter().map(|(r, _)| *r).collect();
        assert_eq!(results, vec![DedupeResult::Updated, DedupeResult::New]);
    }

    #[test]
    fn test_reentering_zone_alerts_again() {
        let mut ring = DedupeRing::default();
        let inside = vec![hotspot_alert("a", 5)];

        assert_eq!(ring.surface(&inside).len(), 1);
        assert!(ring.surface(&[]).is_empty());
        assert!(ring.is_empty());

        let surfaced = ring.surface(&inside);
        assert_eq!(surfaced.len(), 1);
        assert_eq!(surfaced[0].0, DedupeResult::New);
    }

    #[test]
    fn test_eviction_after_retain_stays_consistent() {
        let mut ring = DedupeRing::new(2);

        ring.check_and_mark("a", 0);
        ring.check_and_mark("b", 0);
        ring.retain(|id| id != "a");
        assert_eq!(ring.len(), 1);

        ring.check_and_mark("c", 0);
        ring.check_and_mark("d", 0);
        // "b" was oldest and is evicted; "c" and "d" remain
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.check_and_mark("b", 0), DedupeResult::New);
        assert_eq!(ring.check_and_mark("d", 0), DedupeResult::Duplicate);
    }

    #[test]
    fn test_dupe_rate() {
        let mut ring = DedupeRing::new(100);

        ring.check_and_mark("a", 0);
        ring.check_and_mark("a", 0);
        ring.check_and_mark("a", 0);
        ring.check_and_mark("b", 0);

        assert!((ring.dupe_rate() - 0.5).abs() < 0.01);
        ring.clear();
        assert!(ring.dupe_rate().abs() < f64::EPSILON);
    }
}
