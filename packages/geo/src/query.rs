//! Range-filtered distribution queries over the geo store.
//!
//! Buckets use the fixed boundaries from the shared bucket module so
//! summaries line up with aggregate profiles and report breakdowns.

use std::collections::BTreeMap;

use audience_atlas_geo_models::bucket::{
    AGE_BUCKETS, COMMUTE_BUCKETS, EDUCATION_BUCKETS, INCOME_BUCKETS, age_bucket, commute_bucket,
    education_bucket, income_bucket,
};
use audience_atlas_geo_models::{
    BucketCount, DistributionSummary, GeoQueryFilters, GeoRecord, UrbanicityClass,
};

use crate::GeoRecordStore;

impl GeoRecordStore {
    /// Runs a range-filtered query and summarizes the matched records
    /// into fixed-boundary distributions.
    ///
    /// An empty match produces a summary with all-zero buckets and no
    /// dominant class rather than an error.
    #[must_use]
    pub fn query(&self, filters: &GeoQueryFilters) -> DistributionSummary {
        let matched: Vec<&GeoRecord> = self
            .records()
            .filter(|r| matches_filters(r, filters))
            .collect();

        log::debug!("geo query matched {} of {} records", matched.len(), self.len());

        let mut income = fixed_buckets(INCOME_BUCKETS);
        let mut age = fixed_buckets(AGE_BUCKETS);
        let mut education = fixed_buckets(EDUCATION_BUCKETS);
        let mut commute = fixed_buckets(COMMUTE_BUCKETS);
        let mut by_urbanicity: BTreeMap<UrbanicityClass, u64> = BTreeMap::new();

        for record in &matched {
            *income
                .entry(income_bucket(record.economics.median_household_income))
                .or_default() += 1;
            *age.entry(age_bucket(record.age.median_age)).or_default() += 1;
            *education
                .entry(education_bucket(record.education.bachelors_or_higher))
                .or_default() += 1;
            *commute
                .entry(commute_bucket(record.lifestyle.mean_commute_minutes))
                .or_default() += 1;
            *by_urbanicity.entry(record.location.urbanicity).or_default() += 1;
        }

        let matched_count = matched.len() as u64;

        // Dominant class requires a strict simple majority among matches.
        let dominant_urbanicity = by_urbanicity
            .iter()
            .find(|(_, count)| **count * 2 > matched_count)
            .map(|(class, _)| *class);

        DistributionSummary {
            matched_count,
            income_buckets: ordered_counts(INCOME_BUCKETS, &income),
            age_buckets: ordered_counts(AGE_BUCKETS, &age),
            education_buckets: ordered_counts(EDUCATION_BUCKETS, &education),
            commute_buckets: ordered_counts(COMMUTE_BUCKETS, &commute),
            dominant_urbanicity,
        }
    }
}

fn matches_filters(record: &GeoRecord, filters: &GeoQueryFilters) -> bool {
    let income = record.economics.median_household_income;
    if filters.income_min.is_some_and(|min| income < min) {
        return false;
    }
    if filters.income_max.is_some_and(|max| income > max) {
        return false;
    }
    let median_age = record.age.median_age;
    if filters.age_min.is_some_and(|min| median_age < min) {
        return false;
    }
    if filters.age_max.is_some_and(|max| median_age > max) {
        return false;
    }
    if filters
        .urbanicity
        .is_some_and(|class| record.location.urbanicity != class)
    {
        return false;
    }
    true
}

fn fixed_buckets(labels: &[&'static str]) -> BTreeMap<&'static str, u64> {
    labels.iter().map(|label| (*label, 0)).collect()
}

/// Emits bucket counts in the fixed label order, not map order.
fn ordered_counts(labels: &[&'static str], counts: &BTreeMap<&'static str, u64>) -> Vec<BucketCount> {
    labels
        .iter()
        .map(|label| BucketCount {
            bucket: (*label).to_string(),
            count: counts.get(label).copied().unwrap_or(0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use audience_atlas_geo_models::{AgeCohorts, Economics, GeoRecord, LocationInfo};

    use super::*;

    fn record(code: &str, income: f64, median_age: f64, urbanicity: UrbanicityClass) -> GeoRecord {
        GeoRecord {
            code: code.to_string(),
            population: 1000,
            age: AgeCohorts {
                median_age,
                ..Default::default()
            },
            economics: Economics {
                median_household_income: income,
                ..Default::default()
            },
            location: LocationInfo {
                urbanicity,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn store() -> GeoRecordStore {
        GeoRecordStore::from_records(vec![
            record("10001", 45_000.0, 28.0, UrbanicityClass::Urban),
            record("10002", 85_000.0, 38.0, UrbanicityClass::Urban),
            record("10003", 120_000.0, 41.0, UrbanicityClass::Suburban),
            record("10004", 62_000.0, 55.0, UrbanicityClass::Rural),
        ])
    }

    #[test]
    fn income_range_filter() {
        let summary = store().query(&GeoQueryFilters {
            income_min: Some(60_000.0),
            income_max: Some(100_000.0),
            ..Default::default()
        });
        assert_eq!(summary.matched_count, 2);
    }

    #[test]
    fn urbanicity_filter_and_majority() {
        let summary = store().query(&GeoQueryFilters {
            urbanicity: Some(UrbanicityClass::Urban),
            ..Default::default()
        });
        assert_eq!(summary.matched_count, 2);
        assert_eq!(summary.dominant_urbanicity, Some(UrbanicityClass::Urban));
    }

    #[test]
    fn no_majority_yields_none() {
        let summary = store().query(&GeoQueryFilters::default());
        // 2 urban of 4 matched is not a strict majority.
        assert_eq!(summary.dominant_urbanicity, None);
    }

    #[test]
    fn buckets_keep_fixed_order_and_cover_all_labels() {
        let summary = store().query(&GeoQueryFilters::default());
        let labels: Vec<&str> = summary
            .income_buckets
            .iter()
            .map(|b| b.bucket.as_str())
            .collect();
        assert_eq!(labels, INCOME_BUCKETS);
        let total: u64 = summary.income_buckets.iter().map(|b| b.count).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn empty_match_is_best_effort() {
        let summary = store().query(&GeoQueryFilters {
            income_min: Some(1_000_000.0),
            ..Default::default()
        });
        assert_eq!(summary.matched_count, 0);
        assert_eq!(summary.dominant_urbanicity, None);
        assert!(summary.income_buckets.iter().all(|b| b.count == 0));
    }
}
