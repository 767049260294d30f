//! Report composition across the aggregation, baseline, and overlap
//! engines.

use audience_atlas_analytics::aggregate::WeightedAggregator;
use audience_atlas_analytics::baseline::BaselineCalculator;
use audience_atlas_analytics_models::BaselineSnapshot;
use audience_atlas_audience::AudienceMembershipIndex;
use audience_atlas_geo::GeoRecordStore;
use audience_atlas_overlap::OverlapEngine;
use audience_atlas_overlap::markets::assign_representative_markets;
use audience_atlas_overlap::over_index::{OVER_INDEX_MAX, OVER_INDEX_MIN, pair_over_index};
use audience_atlas_sources::baseline_store::BaselineStore;
use chrono::{DateTime, Utc};

use crate::{Hotspot, MetricDelta, OverlapEntry, Report, ReportError, ReportKey};

/// Hotspots listed per report.
pub const HOTSPOT_LIMIT: usize = 10;

/// Overlap partners listed per report.
pub const OVERLAP_LIMIT: usize = 5;

/// Codes entering the segment aggregate and hotspot ranking.
const PROFILE_TOP_CODES: usize = 200;

/// Candidate cities per overlap partner entering diversification.
const CANDIDATE_CITIES: usize = 5;

/// Composes reports from the shared engines.
pub struct ReportBuilder<'a> {
    geo: &'a GeoRecordStore,
    audience: &'a AudienceMembershipIndex,
    overlap: &'a OverlapEngine<'a>,
    baseline: BaselineCalculator<'a>,
}

impl<'a> ReportBuilder<'a> {
    /// Creates a builder over the shared repositories and engines.
    #[must_use]
    pub const fn new(
        geo: &'a GeoRecordStore,
        audience: &'a AudienceMembershipIndex,
        overlap: &'a OverlapEngine<'a>,
        baseline_store: &'a dyn BaselineStore,
    ) -> Self {
        Self {
            geo,
            audience,
            overlap,
            baseline: BaselineCalculator::new(geo, audience, baseline_store),
        }
    }

    /// Composes the full report for a key.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::UnknownSegment`] if the segment cannot be
    /// resolved, or an analytics error if baseline persistence fails.
    pub fn build(&self, key: &ReportKey, now: DateTime<Utc>) -> Result<Report, ReportError> {
        let canonical = self
            .audience
            .resolve_segment(&key.segment)
            .ok_or_else(|| ReportError::UnknownSegment {
                segment: key.segment.clone(),
            })?
            .to_string();

        let top = self.audience.top_for_segment(&canonical, PROFILE_TOP_CODES);
        let demographics = WeightedAggregator::new(self.geo).aggregate(&top);
        let baseline = self.baseline.current(now)?;

        let key_metrics = key_metrics(&demographics, &baseline);
        let hotspots = hotspots(self.geo, &top);
        let overlaps = self.overlaps(&canonical);

        log::debug!(
            "composed report for {canonical}: {} hotspots, {} overlaps",
            hotspots.len(),
            overlaps.len(),
        );

        Ok(Report {
            segment: canonical,
            category: key.category.clone(),
            key_metrics,
            hotspots,
            demographics,
            overlaps,
            generated_at: now,
        })
    }

    /// Ranked overlap list with diversified representative markets.
    fn overlaps(&self, canonical: &str) -> Vec<OverlapEntry> {
        let ranked = self.overlap.overlaps_for(canonical, OVERLAP_LIMIT);

        let detailed: Vec<(String, f64, f64, Vec<String>)> = ranked
            .into_iter()
            .map(|partner| {
                let pair = pair_over_index(self.geo, self.audience, canonical, &partner.segment);
                let candidates: Vec<String> = pair
                    .cities
                    .iter()
                    .take(CANDIDATE_CITIES)
                    .map(|c| format!("{}, {}", c.city, c.state))
                    .collect();
                (
                    partner.segment,
                    partner.overlap_percentage,
                    pair.over_index,
                    candidates,
                )
            })
            .collect();

        let pools: Vec<(String, Vec<String>)> = detailed
            .iter()
            .map(|(segment, _, _, candidates)| (segment.clone(), candidates.clone()))
            .collect();
        let assigned = assign_representative_markets(&pools);

        detailed
            .into_iter()
            .zip(assigned)
            .map(
                |((segment, overlap_percentage, over_index, _), (_, market))| OverlapEntry {
                    segment,
                    overlap_percentage,
                    over_index,
                    representative_market: market,
                },
            )
            .collect()
    }
}

fn key_metrics(
    demographics: &audience_atlas_analytics_models::DemographicAggregate,
    baseline: &BaselineSnapshot,
) -> Vec<MetricDelta> {
    [
        (
            "medianHouseholdIncome",
            demographics.median_household_income,
            baseline.median_household_income,
        ),
        ("medianAge", demographics.median_age, baseline.median_age),
        (
            "bachelorsShare",
            demographics.bachelors_share,
            baseline.bachelors_share,
        ),
        (
            "homeownershipRate",
            demographics.homeownership_rate,
            baseline.homeownership_rate,
        ),
        (
            "householdSize",
            demographics.household_size,
            baseline.household_size,
        ),
        (
            "medianHomeValue",
            demographics.median_home_value,
            baseline.median_home_value,
        ),
    ]
    .into_iter()
    .map(|(metric, value, base)| MetricDelta {
        metric: metric.to_string(),
        value,
        baseline: base,
        delta_percentage: if base > 0.0 {
            (value - base) / base * 100.0
        } else {
            0.0
        },
    })
    .collect()
}

/// Top weighted codes with a weight-relative over-index. Codes missing
/// from the geo store keep their place with empty location fields.
fn hotspots(
    geo: &GeoRecordStore,
    top: &[audience_atlas_audience_models::WeightedCode],
) -> Vec<Hotspot> {
    if top.is_empty() {
        return Vec::new();
    }
    #[allow(clippy::cast_precision_loss)]
    let mean_weight = top.iter().map(|e| e.weight).sum::<f64>() / top.len() as f64;

    top.iter()
        .take(HOTSPOT_LIMIT)
        .map(|entry| {
            let (city, state) = geo.get(&entry.code).map_or_else(
                || (String::new(), String::new()),
                |record| (record.location.city.clone(), record.location.state.clone()),
            );
            let over_index = if mean_weight > 0.0 {
                (entry.weight / mean_weight).clamp(OVER_INDEX_MIN, OVER_INDEX_MAX)
            } else {
                OVER_INDEX_MIN
            };
            Hotspot {
                code: entry.code.clone(),
                city,
                state,
                weight: entry.weight,
                over_index,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use audience_atlas_audience_models::MembershipRow;
    use audience_atlas_geo_models::{Economics, GeoRecord, LocationInfo};
    use audience_atlas_sources::baseline_store::MemoryBaselineStore;
    use chrono::TimeZone as _;

    use super::*;

    fn record(code: &str, city: &str, income: f64) -> GeoRecord {
        GeoRecord {
            code: code.to_string(),
            population: 10_000,
            economics: Economics {
                median_household_income: income,
                ..Default::default()
            },
            household_size: 2.5,
            location: LocationInfo {
                city: city.to_string(),
                state: "TX".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

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
        GeoRecordStore::from_records(vec![
            record("75001", "Dallas", 60_000.0),
            record("78701", "Austin", 80_000.0),
            record("77001", "Houston", 70_000.0),
        ])
    }

    fn audience() -> AudienceMembershipIndex {
        AudienceMembershipIndex::from_rows(vec![
            row("Coffee", "75001", 100.0),
            row("Coffee", "78701", 50.0),
            row("Coffee", "77001", 25.0),
            row("Tea", "75001", 90.0),
            row("Tea", "78701", 45.0),
            row("Snacks", "77001", 30.0),
            row("Snacks", "75001", 20.0),
        ])
    }

    fn key(segment: &str) -> ReportKey {
        ReportKey {
            segment: segment.to_string(),
            category: Some("beverages".to_string()),
            include_non_residential: false,
        }
    }

    #[test]
    fn composes_full_report() {
        let geo = geo();
        let audience = audience();
        let overlap = OverlapEngine::new(&geo, &audience);
        let store = MemoryBaselineStore::new();
        let builder = ReportBuilder::new(&geo, &audience, &overlap, &store);
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();

        let report = builder.build(&key("coffee"), now).unwrap();
        assert_eq!(report.segment, "Coffee");
        assert_eq!(report.category.as_deref(), Some("beverages"));
        assert_eq!(report.hotspots.len(), 3);
        assert_eq!(report.hotspots[0].code, "75001");
        assert_eq!(report.hotspots[0].city, "Dallas");
        assert!(!report.key_metrics.is_empty());
        assert!(!report.overlaps.is_empty());
        assert_eq!(report.generated_at, now);
    }

    #[test]
    fn hotspot_over_index_is_bounded() {
        let geo = geo();
        let audience = audience();
        let overlap = OverlapEngine::new(&geo, &audience);
        let store = MemoryBaselineStore::new();
        let builder = ReportBuilder::new(&geo, &audience, &overlap, &store);
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();

        let report = builder.build(&key("Coffee"), now).unwrap();
        for hotspot in &report.hotspots {
            assert!(hotspot.over_index >= OVER_INDEX_MIN);
            assert!(hotspot.over_index <= OVER_INDEX_MAX);
        }
    }

    #[test]
    fn overlap_entries_carry_bounded_over_index() {
        let geo = geo();
        let audience = audience();
        let overlap = OverlapEngine::new(&geo, &audience);
        let store = MemoryBaselineStore::new();
        let builder = ReportBuilder::new(&geo, &audience, &overlap, &store);
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();

        let report = builder.build(&key("Coffee"), now).unwrap();
        for entry in &report.overlaps {
            assert!(entry.over_index >= OVER_INDEX_MIN);
            assert!(entry.over_index <= OVER_INDEX_MAX);
        }
    }

    #[test]
    fn unknown_segment_errors() {
        let geo = geo();
        let audience = audience();
        let overlap = OverlapEngine::new(&geo, &audience);
        let store = MemoryBaselineStore::new();
        let builder = ReportBuilder::new(&geo, &audience, &overlap, &store);
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();

        let err = builder.build(&key("Nonexistent"), now).unwrap_err();
        assert!(matches!(err, ReportError::UnknownSegment { .. }));
    }

    #[test]
    fn baseline_deltas_use_percentages() {
        let geo = geo();
        let audience = audience();
        let overlap = OverlapEngine::new(&geo, &audience);
        let store = MemoryBaselineStore::new();
        let builder = ReportBuilder::new(&geo, &audience, &overlap, &store);
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();

        let report = builder.build(&key("Coffee"), now).unwrap();
        let income = report
            .key_metrics
            .iter()
            .find(|m| m.metric == "medianHouseholdIncome")
            .unwrap();
        assert!(income.baseline > 0.0);
        let expected = (income.value - income.baseline) / income.baseline * 100.0;
        assert!((income.delta_percentage - expected).abs() < 1e-9);
    }
}
