//! Segment-agnostic "typical audience" baseline.
//!
//! One aggregate profile per segment over its top-50 geographies, then
//! the per-metric median across all segment profiles. The median keeps
//! the baseline from tilting toward segments that dominate
//! multi-category high-income metros. Valid for 7 days and persisted
//! across restarts.

use audience_atlas_analytics_models::{BaselineSnapshot, DemographicAggregate};
use audience_atlas_audience::AudienceMembershipIndex;
use audience_atlas_geo::GeoRecordStore;
use audience_atlas_geo_models::LifestyleShares;
use audience_atlas_sources::baseline_store::BaselineStore;
use chrono::{DateTime, Duration, Utc};
use rayon::prelude::*;

use crate::AnalyticsError;
use crate::aggregate::WeightedAggregator;

/// How long a persisted baseline stays valid.
pub const BASELINE_TTL_DAYS: i64 = 7;

/// Geographies per segment entering the per-segment profile.
pub const TOP_CODES_PER_SEGMENT: usize = 50;

/// Below this many usable segment profiles the snapshot is best-effort.
pub const MIN_SEGMENTS: usize = 3;

/// Computes and persists the cross-segment baseline.
pub struct BaselineCalculator<'a> {
    geo: &'a GeoRecordStore,
    audience: &'a AudienceMembershipIndex,
    store: &'a dyn BaselineStore,
}

impl<'a> BaselineCalculator<'a> {
    /// Creates a calculator over the given repositories.
    #[must_use]
    pub const fn new(
        geo: &'a GeoRecordStore,
        audience: &'a AudienceMembershipIndex,
        store: &'a dyn BaselineStore,
    ) -> Self {
        Self {
            geo,
            audience,
            store,
        }
    }

    /// Returns the current baseline, recomputing only when the persisted
    /// snapshot is missing or older than [`BASELINE_TTL_DAYS`].
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError`] if the persistence store fails.
    pub fn current(&self, now: DateTime<Utc>) -> Result<BaselineSnapshot, AnalyticsError> {
        if let Some(snapshot) = self.store.load()?
            && now - snapshot.calculated_at < Duration::days(BASELINE_TTL_DAYS)
        {
            log::debug!(
                "serving baseline from {} ({} segments)",
                snapshot.calculated_at,
                snapshot.segment_count,
            );
            return Ok(snapshot);
        }
        self.recalculate(now)
    }

    /// Forces a fresh computation and overwrites the persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError`] if the persistence store fails.
    pub fn recalculate(&self, now: DateTime<Utc>) -> Result<BaselineSnapshot, AnalyticsError> {
        let snapshot = self.compute(now);
        self.store.save(&snapshot)?;
        Ok(snapshot)
    }

    /// Computes the snapshot without touching persistence.
    ///
    /// Segments fan out across the rayon pool; profiles are re-sorted by
    /// segment name before the median pass so the result never depends
    /// on completion order.
    #[must_use]
    pub fn compute(&self, now: DateTime<Utc>) -> BaselineSnapshot {
        let aggregator = WeightedAggregator::new(self.geo);
        let names: Vec<&str> = self.audience.segment_names().collect();

        let mut profiles: Vec<(&str, DemographicAggregate)> = names
            .par_iter()
            .filter_map(|segment| {
                let top = self
                    .audience
                    .top_for_segment(segment, TOP_CODES_PER_SEGMENT);
                let profile = aggregator.aggregate(&top);
                // Segments with no resolvable codes are excluded entirely.
                (profile.matched_count > 0 && !profile.used_fallback)
                    .then_some((*segment, profile))
            })
            .collect();
        profiles.sort_by(|a, b| a.0.cmp(b.0));

        if profiles.len() < MIN_SEGMENTS {
            log::warn!(
                "only {} usable segment profiles (minimum {MIN_SEGMENTS}); baseline is best-effort",
                profiles.len(),
            );
        }

        let snapshot = snapshot_from_profiles(
            &profiles.iter().map(|(_, p)| p).collect::<Vec<_>>(),
            now,
        );
        log::info!(
            "computed baseline across {} segments",
            snapshot.segment_count,
        );
        snapshot
    }
}

/// Median of the values; 0.0 for an empty slice.
#[must_use]
pub fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        f64::midpoint(values[mid - 1], values[mid])
    } else {
        values[mid]
    }
}

fn median_of(profiles: &[&DemographicAggregate], metric: impl Fn(&DemographicAggregate) -> f64) -> f64 {
    let mut values: Vec<f64> = profiles.iter().map(|p| metric(p)).collect();
    median(&mut values)
}

fn snapshot_from_profiles(
    profiles: &[&DemographicAggregate],
    now: DateTime<Utc>,
) -> BaselineSnapshot {
    BaselineSnapshot {
        median_household_income: median_of(profiles, |p| p.median_household_income),
        median_age: median_of(profiles, |p| p.median_age),
        bachelors_share: median_of(profiles, |p| p.bachelors_share),
        homeownership_rate: median_of(profiles, |p| p.homeownership_rate),
        household_size: median_of(profiles, |p| p.household_size),
        median_home_value: median_of(profiles, |p| p.median_home_value),
        lifestyle: LifestyleShares {
            self_employed: median_of(profiles, |p| p.lifestyle.self_employed),
            married: median_of(profiles, |p| p.lifestyle.married),
            dual_income: median_of(profiles, |p| p.lifestyle.dual_income),
            mean_commute_minutes: median_of(profiles, |p| p.lifestyle.mean_commute_minutes),
            charitable_givers: median_of(profiles, |p| p.lifestyle.charitable_givers),
            stem_degree: median_of(profiles, |p| p.lifestyle.stem_degree),
            veteran: median_of(profiles, |p| p.lifestyle.veteran),
            rent_burden: median_of(profiles, |p| p.lifestyle.rent_burden),
        },
        segment_count: profiles.len() as u64,
        calculated_at: now,
    }
}
