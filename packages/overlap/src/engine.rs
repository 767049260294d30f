//! Overlap lookup and sampled-Jaccard fallback.
//!
//! The precomputed table is symmetric: every artifact row is inserted
//! under both segments, so a lookup keyed by either side succeeds.
//! Fallback results are cached per process; a cache write replaces the
//! whole entry, and duplicate concurrent recomputation on a miss is
//! tolerated rather than serializing writers.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use audience_atlas_audience::AudienceMembershipIndex;
use audience_atlas_geo::GeoRecordStore;
use audience_atlas_sources::PrecomputedOverlapSource;

use crate::{OverlapError, SegmentOverlap};

/// Other segments sampled on the fallback path.
pub const SAMPLE_SEGMENTS: usize = 30;

/// Codes per segment entering the Jaccard sets.
pub const JACCARD_TOP_CODES: usize = 100;

/// Pairwise overlap queries over the membership index.
pub struct OverlapEngine<'a> {
    geo: &'a GeoRecordStore,
    audience: &'a AudienceMembershipIndex,
    /// Lowercased segment -> ranked partners, when the artifact is present.
    table: Option<HashMap<String, Vec<SegmentOverlap>>>,
    /// Fallback-path results, lowercased segment -> ranked partners.
    cache: RwLock<HashMap<String, Arc<Vec<SegmentOverlap>>>>,
}

impl<'a> OverlapEngine<'a> {
    /// Creates an engine without a precomputed artifact; every query
    /// uses the sampled fallback path.
    #[must_use]
    pub fn new(geo: &'a GeoRecordStore, audience: &'a AudienceMembershipIndex) -> Self {
        Self {
            geo,
            audience,
            table: None,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Creates an engine backed by the batch-produced overlap artifact.
    ///
    /// # Errors
    ///
    /// Returns [`OverlapError`] if the artifact cannot be read.
    pub fn with_precomputed(
        geo: &'a GeoRecordStore,
        audience: &'a AudienceMembershipIndex,
        source: &dyn PrecomputedOverlapSource,
    ) -> Result<Self, OverlapError> {
        let rows = source.fetch_overlaps()?;
        let mut table: HashMap<String, Vec<SegmentOverlap>> = HashMap::new();

        for row in rows {
            table
                .entry(row.segment_a.to_lowercase())
                .or_default()
                .push(SegmentOverlap {
                    segment: row.segment_b.clone(),
                    overlap_percentage: row.overlap_percentage,
                });
            table
                .entry(row.segment_b.to_lowercase())
                .or_default()
                .push(SegmentOverlap {
                    segment: row.segment_a,
                    overlap_percentage: row.overlap_percentage,
                });
        }

        for partners in table.values_mut() {
            sort_ranked(partners);
        }

        log::info!("loaded precomputed overlaps for {} segments", table.len());

        Ok(Self {
            geo,
            audience,
            table: Some(table),
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// Whether the precomputed lookup path is active.
    #[must_use]
    pub const fn has_precomputed(&self) -> bool {
        self.table.is_some()
    }

    /// The geo store backing this engine.
    #[must_use]
    pub const fn geo(&self) -> &'a GeoRecordStore {
        self.geo
    }

    /// The membership index backing this engine.
    #[must_use]
    pub const fn audience(&self) -> &'a AudienceMembershipIndex {
        self.audience
    }

    /// Returns up to `limit` overlap partners for the segment, ranked
    /// descending by overlap percentage.
    #[must_use]
    pub fn overlaps_for(&self, segment: &str, limit: usize) -> Vec<SegmentOverlap> {
        if let Some(table) = &self.table {
            let mut ranked = table
                .get(&segment.to_lowercase())
                .cloned()
                .unwrap_or_default();
            ranked.truncate(limit);
            return ranked;
        }

        let Some(canonical) = self.audience.resolve_segment(segment) else {
            return Vec::new();
        };

        let key = canonical.to_lowercase();
        if let Some(cached) = self
            .cache
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&key)
        {
            let mut ranked = (**cached).clone();
            ranked.truncate(limit);
            return ranked;
        }

        let computed = Arc::new(self.sample_overlaps(canonical));
        // Snapshot replace; a concurrent writer computing the same key
        // just wins the race with an identical value.
        self.cache
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key, Arc::clone(&computed));

        let mut ranked = (*computed).clone();
        ranked.truncate(limit);
        ranked
    }

    /// Symmetric pairwise overlap percentage, `None` when either segment
    /// is unknown.
    #[must_use]
    pub fn overlap_between(&self, a: &str, b: &str) -> Option<f64> {
        if let Some(table) = &self.table {
            return table.get(&a.to_lowercase()).and_then(|partners| {
                partners
                    .iter()
                    .find(|p| p.segment.eq_ignore_ascii_case(b))
                    .map(|p| p.overlap_percentage)
            });
        }

        let a = self.audience.resolve_segment(a)?;
        let b = self.audience.resolve_segment(b)?;
        Some(self.jaccard_percentage(a, b))
    }

    /// Samples up to [`SAMPLE_SEGMENTS`] other segments (alphabetical,
    /// deterministic) and ranks them by Jaccard similarity.
    fn sample_overlaps(&self, canonical: &str) -> Vec<SegmentOverlap> {
        let mut ranked: Vec<SegmentOverlap> = self
            .audience
            .segment_names()
            .filter(|other| *other != canonical)
            .take(SAMPLE_SEGMENTS)
            .map(|other| SegmentOverlap {
                segment: other.to_string(),
                overlap_percentage: self.jaccard_percentage(canonical, other),
            })
            .collect();
        sort_ranked(&mut ranked);
        log::debug!("sampled {} overlap partners for {canonical}", ranked.len());
        ranked
    }

    fn jaccard_percentage(&self, a: &str, b: &str) -> f64 {
        let a_set = self.top_code_set(a);
        let b_set = self.top_code_set(b);
        jaccard(&a_set, &b_set) * 100.0
    }

    fn top_code_set(&self, segment: &str) -> HashSet<String> {
        self.audience
            .top_for_segment(segment, JACCARD_TOP_CODES)
            .into_iter()
            .map(|entry| entry.code)
            .collect()
    }
}

/// |intersection| / |union|; 0.0 for an empty union.
#[must_use]
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let ratio = intersection as f64 / union as f64;
    ratio
}

/// Descending by percentage, ties alphabetical for determinism.
fn sort_ranked(partners: &mut [SegmentOverlap]) {
    partners.sort_by(|x, y| {
        y.overlap_percentage
            .partial_cmp(&x.overlap_percentage)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| x.segment.cmp(&y.segment))
    });
}

#[cfg(test)]
mod tests {
    use audience_atlas_audience_models::MembershipRow;
    use audience_atlas_geo_models::GeoRecord;
    use audience_atlas_sources::PrecomputedOverlapRow;
    use audience_atlas_sources::fixtures::StaticOverlapSource;
    use chrono::Utc;

    use super::*;

    fn row(segment: &str, code: &str, weight: f64) -> MembershipRow {
        MembershipRow {
            segment: segment.to_string(),
            geo_code: code.to_string(),
            weight,
            seed: None,
            date: None,
        }
    }

    fn geo() -> GeoRecordStore {
        GeoRecordStore::from_records(vec![GeoRecord {
            code: "10001".to_string(),
            population: 1000,
            ..Default::default()
        }])
    }

    fn audience() -> AudienceMembershipIndex {
        AudienceMembershipIndex::from_rows(vec![
            // Coffee and Oral Care share 2 of 4 distinct codes.
            row("Coffee", "10001", 10.0),
            row("Coffee", "10002", 9.0),
            row("Coffee", "10003", 8.0),
            row("Oral Care", "10002", 7.0),
            row("Oral Care", "10003", 6.0),
            row("Oral Care", "10004", 5.0),
            row("Snacks", "20001", 4.0),
        ])
    }

    #[test]
    fn precomputed_lookup_returns_artifact_value() {
        let geo = geo();
        let audience = audience();
        let source = StaticOverlapSource::new(vec![PrecomputedOverlapRow {
            segment_a: "Coffee".to_string(),
            segment_b: "Oral Care".to_string(),
            overlap_percentage: 24.0,
            intersection_size: 48,
            union_size: 200,
            computed_at: Utc::now(),
        }]);
        let engine = OverlapEngine::with_precomputed(&geo, &audience, &source).unwrap();

        assert!(engine.has_precomputed());
        let ranked = engine.overlaps_for("Coffee", 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].segment, "Oral Care");
        assert!((ranked[0].overlap_percentage - 24.0).abs() < f64::EPSILON);
    }

    #[test]
    fn precomputed_lookup_is_symmetric() {
        let geo = geo();
        let audience = audience();
        let source = StaticOverlapSource::new(vec![PrecomputedOverlapRow {
            segment_a: "Coffee".to_string(),
            segment_b: "Oral Care".to_string(),
            overlap_percentage: 24.0,
            intersection_size: 48,
            union_size: 200,
            computed_at: Utc::now(),
        }]);
        let engine = OverlapEngine::with_precomputed(&geo, &audience, &source).unwrap();

        let ab = engine.overlap_between("Coffee", "Oral Care").unwrap();
        let ba = engine.overlap_between("Oral Care", "Coffee").unwrap();
        assert!((ab - ba).abs() < 1e-9);
        assert!((ab - 24.0).abs() < 1e-9);
    }

    #[test]
    fn fallback_jaccard_is_symmetric() {
        let geo = geo();
        let audience = audience();
        let engine = OverlapEngine::new(&geo, &audience);

        let ab = engine.overlap_between("Coffee", "Oral Care").unwrap();
        let ba = engine.overlap_between("Oral Care", "Coffee").unwrap();
        assert!((ab - ba).abs() < 1e-9);
        // 2 shared of 4 distinct codes.
        assert!((ab - 50.0).abs() < 1e-9);
    }

    #[test]
    fn fallback_ranks_and_caches() {
        let geo = geo();
        let audience = audience();
        let engine = OverlapEngine::new(&geo, &audience);

        let ranked = engine.overlaps_for("Coffee", 10);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].segment, "Oral Care");
        for pair in ranked.windows(2) {
            assert!(pair[0].overlap_percentage >= pair[1].overlap_percentage);
        }

        // Second call serves the cached snapshot.
        let again = engine.overlaps_for("Coffee", 10);
        assert_eq!(ranked, again);
    }

    #[test]
    fn unknown_segment_is_empty() {
        let geo = geo();
        let audience = audience();
        let engine = OverlapEngine::new(&geo, &audience);
        assert!(engine.overlaps_for("Nonexistent", 5).is_empty());
        assert!(engine.overlap_between("Coffee", "Nonexistent").is_none());
    }

    #[test]
    fn jaccard_empty_union_is_zero() {
        assert!((jaccard(&HashSet::new(), &HashSet::new()) - 0.0).abs() < f64::EPSILON);
    }
}
