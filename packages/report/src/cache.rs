//! TTL cache for composed reports.
//!
//! Entries are immutable snapshots behind an `Arc`; a write replaces
//! the whole entry. Concurrent readers never block each other, and two
//! callers racing on the same cold key may both recompute; the second
//! write simply wins with an identical value.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};

use crate::{Report, ReportError, ReportKey};

/// Default report TTL.
pub const REPORT_TTL_MINUTES: i64 = 60;

/// In-memory TTL cache keyed by [`ReportKey`].
pub struct ReportCache {
    ttl: Duration,
    entries: RwLock<HashMap<ReportKey, (DateTime<Utc>, Arc<Report>)>>,
}

impl Default for ReportCache {
    fn default() -> Self {
        Self::new(Duration::minutes(REPORT_TTL_MINUTES))
    }
}

impl ReportCache {
    /// Creates a cache with the given TTL.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached report when present and fresh.
    #[must_use]
    pub fn get(&self, key: &ReportKey, now: DateTime<Utc>) -> Option<Arc<Report>> {
        self.entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .filter(|(cached_at, _)| now - *cached_at < self.ttl)
            .map(|(_, report)| Arc::clone(report))
    }

    /// Stores a report, replacing any previous entry for the key.
    pub fn insert(&self, key: ReportKey, report: Report, now: DateTime<Utc>) -> Arc<Report> {
        let report = Arc::new(report);
        self.entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key, (now, Arc::clone(&report)));
        report
    }

    /// Serves the cached report or composes and caches a fresh one.
    ///
    /// # Errors
    ///
    /// Propagates the builder's error on a miss; nothing is cached in
    /// that case.
    pub fn get_or_build(
        &self,
        key: &ReportKey,
        now: DateTime<Utc>,
        build: impl FnOnce() -> Result<Report, ReportError>,
    ) -> Result<Arc<Report>, ReportError> {
        if let Some(cached) = self.get(key, now) {
            log::debug!("report cache hit for {}", key.segment);
            return Ok(cached);
        }
        let report = build()?;
        Ok(self.insert(key.clone(), report, now))
    }

    /// Drops every entry.
    pub fn invalidate(&self) {
        self.entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use audience_atlas_analytics::aggregate::national_fallback;
    use chrono::TimeZone as _;

    use super::*;

    fn key() -> ReportKey {
        ReportKey {
            segment: "Coffee".to_string(),
            category: None,
            include_non_residential: false,
        }
    }

    fn report(now: DateTime<Utc>) -> Report {
        Report {
            segment: "Coffee".to_string(),
            category: None,
            key_metrics: Vec::new(),
            hotspots: Vec::new(),
            demographics: national_fallback(0),
            overlaps: Vec::new(),
            generated_at: now,
        }
    }

    #[test]
    fn hit_within_ttl_skips_recompute() {
        let cache = ReportCache::default();
        let t0 = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

        let first = cache
            .get_or_build(&key(), t0, || Ok(report(t0)))
            .unwrap();
        let second = cache
            .get_or_build(&key(), t0 + Duration::minutes(30), || {
                panic!("builder must not run on a warm cache")
            })
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn expires_after_ttl() {
        let cache = ReportCache::default();
        let t0 = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let t1 = t0 + Duration::minutes(61);

        cache.get_or_build(&key(), t0, || Ok(report(t0))).unwrap();
        assert!(cache.get(&key(), t1).is_none());

        let rebuilt = cache.get_or_build(&key(), t1, || Ok(report(t1))).unwrap();
        assert_eq!(rebuilt.generated_at, t1);
    }

    #[test]
    fn distinct_keys_are_independent() {
        let cache = ReportCache::default();
        let t0 = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

        cache.insert(key(), report(t0), t0);
        let other = ReportKey {
            category: Some("beverages".to_string()),
            ..key()
        };
        assert!(cache.get(&other, t0).is_none());
    }

    #[test]
    fn builder_error_is_not_cached() {
        let cache = ReportCache::default();
        let t0 = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

        let err = cache.get_or_build(&key(), t0, || {
            Err(ReportError::UnknownSegment {
                segment: "Coffee".to_string(),
            })
        });
        assert!(err.is_err());
        assert!(cache.get(&key(), t0).is_none());
    }

    #[test]
    fn invalidate_clears_entries() {
        let cache = ReportCache::default();
        let t0 = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        cache.insert(key(), report(t0), t0);
        cache.invalidate();
        assert!(cache.get(&key(), t0).is_none());
    }
}
