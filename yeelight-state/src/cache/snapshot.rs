//! Read-only view of one cached light

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::model::PropertySet;

/// Copy of a light's cached state, taken without holding any lock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub properties: PropertySet,
    /// When a full `get_prop` refresh last succeeded, `None` before the first
    pub last_refreshed_at: Option<DateTime<Utc>>,
    /// When an acknowledged command last patched the cache
    pub last_updated_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Whether the properties came from the light at least once
    pub fn is_refreshed(&self) -> bool {
        self.last_refreshed_at.is_some()
    }

    /// Time since the last full refresh, measured against `now`
    pub fn staleness(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.last_refreshed_at.map(|at| now - at)
    }

    /// Whether optimistic updates were applied after the last refresh
    pub fn has_unconfirmed_updates(&self) -> bool {
        match (self.last_updated_at, self.last_refreshed_at) {
            (Some(updated), Some(refreshed)) => updated > refreshed,
            (Some(_), None) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(refreshed: Option<i64>, updated: Option<i64>) -> Snapshot {
        let at = |secs| DateTime::<Utc>::from_timestamp(secs, 0);
        Snapshot {
            properties: PropertySet::default(),
            last_refreshed_at: refreshed.and_then(at),
            last_updated_at: updated.and_then(at),
        }
    }

    #[test]
    fn test_staleness() {
        let snap = snapshot(Some(1_000), None);
        let now = DateTime::<Utc>::from_timestamp(1_030, 0).unwrap();
        assert_eq!(snap.staleness(now), Some(Duration::seconds(30)));
        assert!(snapshot(None, None).staleness(now).is_none());
    }

    #[test]
    fn test_unconfirmed_updates() {
        assert!(!snapshot(None, None).has_unconfirmed_updates());
        assert!(snapshot(None, Some(5)).has_unconfirmed_updates());
        assert!(snapshot(Some(1), Some(5)).has_unconfirmed_updates());
        assert!(!snapshot(Some(9), Some(5)).has_unconfirmed_updates());
    }
}
