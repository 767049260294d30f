//! Weighted demographic rollup over geography/weight pairs.
//!
//! Every numeric attribute is Σ(value·weight)/Σ(weight) over the pairs
//! that resolve to a populated record. Unresolved and zero-population
//! codes are skipped, not zero-filled; a zero total weight falls back to
//! the national profile, never NaN.

use std::collections::BTreeMap;

use audience_atlas_analytics_models::{
    AffluenceLevel, DemographicAggregate, EducationProfile, FamilyProfile, LocationProfile,
    ShareBucket,
};
use audience_atlas_audience_models::WeightedCode;
use audience_atlas_geo::GeoRecordStore;
use audience_atlas_geo_models::bucket::{EDUCATION_BUCKETS, INCOME_BUCKETS, education_bucket, income_bucket};
use audience_atlas_geo_models::{AgeCohorts, EthnicityShares, LifestyleShares, UrbanicityClass};

use crate::national;

/// Census cohort referenced by the age redistribution table.
#[derive(Debug, Clone, Copy)]
enum Cohort {
    Under18,
    Age18To29,
    Age30s,
    Age40s,
    Age50s,
    Age60s,
    Age70Plus,
}

impl Cohort {
    const fn share(self, cohorts: &AgeCohorts) -> f64 {
        match self {
            Self::Under18 => cohorts.under_18,
            Self::Age18To29 => cohorts.age_18_29,
            Self::Age30s => cohorts.age_30s,
            Self::Age40s => cohorts.age_40s,
            Self::Age50s => cohorts.age_50s,
            Self::Age60s => cohorts.age_60s,
            Self::Age70Plus => cohorts.age_70_plus,
        }
    }
}

/// Fixed proportional coefficients redistributing census cohorts into
/// ten-year presentation bands. The under-18 cohort splits 56/44 around
/// age 10; the 18-29 cohort contributes its two pre-20 years (17%) to
/// the 10-19 band. These are a lookup table, never re-derived per call.
const AGE_BAND_COEFFS: &[(&str, &[(Cohort, f64)])] = &[
    ("Under 10", &[(Cohort::Under18, 0.56)]),
    ("10-19", &[(Cohort::Under18, 0.44), (Cohort::Age18To29, 0.17)]),
    ("20-29", &[(Cohort::Age18To29, 0.83)]),
    ("30-39", &[(Cohort::Age30s, 1.0)]),
    ("40-49", &[(Cohort::Age40s, 1.0)]),
    ("50-59", &[(Cohort::Age50s, 1.0)]),
    ("60-69", &[(Cohort::Age60s, 1.0)]),
    ("70+", &[(Cohort::Age70Plus, 1.0)]),
];

/// Redistributes cohort shares into the fixed ten-year bands.
#[must_use]
pub fn age_bands(cohorts: &AgeCohorts) -> Vec<ShareBucket> {
    AGE_BAND_COEFFS
        .iter()
        .map(|(band, coeffs)| ShareBucket {
            bucket: (*band).to_string(),
            share: coeffs
                .iter()
                .map(|(cohort, coeff)| cohort.share(cohorts) * coeff)
                .sum(),
        })
        .collect()
}

/// Weighted statistical rollups over the geo store.
#[derive(Debug, Clone, Copy)]
pub struct WeightedAggregator<'a> {
    geo: &'a GeoRecordStore,
}

impl<'a> WeightedAggregator<'a> {
    /// Creates an aggregator over the given store.
    #[must_use]
    pub const fn new(geo: &'a GeoRecordStore) -> Self {
        Self { geo }
    }

    /// Computes the weighted demographic aggregate for the pairs.
    ///
    /// Pairs whose code is missing from the store or resolves to a
    /// zero-population record are skipped; their absence is visible only
    /// through `matched_count`. Zero total weight falls back to the
    /// national profile.
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub fn aggregate(&self, pairs: &[WeightedCode]) -> DemographicAggregate {
        let mut total_weight = 0.0_f64;
        let mut matched_count = 0_u64;

        let mut income = 0.0_f64;
        let mut median_age = 0.0_f64;
        let mut household_size = 0.0_f64;
        let mut homeownership = 0.0_f64;
        let mut home_value = 0.0_f64;
        let mut six_figure = 0.0_f64;
        let mut poverty = 0.0_f64;
        let mut unemployment = 0.0_f64;
        let mut bachelors = 0.0_f64;
        let mut lifestyle = LifestyleShares::default();
        let mut ethnicity = EthnicityShares::default();
        let mut cohorts = AgeCohorts::default();
        let mut income_weight: BTreeMap<&'static str, f64> = BTreeMap::new();
        let mut education_weight: BTreeMap<&'static str, f64> = BTreeMap::new();
        let mut urbanicity_weight: BTreeMap<UrbanicityClass, f64> = BTreeMap::new();

        for pair in pairs {
            let Some(record) = self.geo.get(&pair.code) else {
                continue;
            };
            if record.population == 0 {
                continue;
            }
            let w = pair.weight;
            matched_count += 1;
            total_weight += w;

            income += record.economics.median_household_income * w;
            median_age += record.age.median_age * w;
            household_size += record.household_size * w;
            homeownership += record.economics.homeownership_rate * w;
            home_value += record.economics.median_home_value * w;
            six_figure += record.economics.six_figure_share * w;
            poverty += record.economics.poverty_rate * w;
            unemployment += record.economics.unemployment_rate * w;
            bachelors += record.education.bachelors_or_higher * w;

            lifestyle.self_employed += record.lifestyle.self_employed * w;
            lifestyle.married += record.lifestyle.married * w;
            lifestyle.dual_income += record.lifestyle.dual_income * w;
            lifestyle.mean_commute_minutes += record.lifestyle.mean_commute_minutes * w;
            lifestyle.charitable_givers += record.lifestyle.charitable_givers * w;
            lifestyle.stem_degree += record.lifestyle.stem_degree * w;
            lifestyle.veteran += record.lifestyle.veteran * w;
            lifestyle.rent_burden += record.lifestyle.rent_burden * w;

            ethnicity.white += record.ethnicity.white * w;
            ethnicity.black += record.ethnicity.black * w;
            ethnicity.hispanic += record.ethnicity.hispanic * w;
            ethnicity.asian += record.ethnicity.asian * w;

            cohorts.under_18 += record.age.under_18 * w;
            cohorts.age_18_29 += record.age.age_18_29 * w;
            cohorts.age_30s += record.age.age_30s * w;
            cohorts.age_40s += record.age.age_40s * w;
            cohorts.age_50s += record.age.age_50s * w;
            cohorts.age_60s += record.age.age_60s * w;
            cohorts.age_70_plus += record.age.age_70_plus * w;

            *income_weight
                .entry(income_bucket(record.economics.median_household_income))
                .or_default() += w;
            *education_weight
                .entry(education_bucket(record.education.bachelors_or_higher))
                .or_default() += w;
            *urbanicity_weight
                .entry(record.location.urbanicity)
                .or_default() += w;
        }

        if total_weight <= 0.0 {
            log::debug!("aggregate fell back to national profile ({matched_count} matched)");
            return national_fallback(matched_count);
        }

        let inv = 1.0 / total_weight;
        scale_lifestyle(&mut lifestyle, inv);
        scale_ethnicity(&mut ethnicity, inv);
        scale_cohorts(&mut cohorts, inv);

        let income = income * inv;
        let bachelors = bachelors * inv;
        let household_size = household_size * inv;

        let location_profile = urbanicity_weight
            .iter()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map_or(LocationProfile::Mixed, |(class, _)| (*class).into());

        DemographicAggregate {
            matched_count,
            total_weight,
            used_fallback: false,
            median_household_income: income,
            median_age: median_age * inv,
            household_size,
            homeownership_rate: homeownership * inv,
            median_home_value: home_value * inv,
            six_figure_share: six_figure * inv,
            poverty_rate: poverty * inv,
            unemployment_rate: unemployment * inv,
            bachelors_share: bachelors,
            lifestyle,
            ethnicity,
            age_bands: age_bands(&cohorts),
            income_buckets: weight_shares(INCOME_BUCKETS, &income_weight, total_weight),
            education_buckets: weight_shares(EDUCATION_BUCKETS, &education_weight, total_weight),
            affluence: affluence_level(income),
            education_profile: education_profile(bachelors),
            family_profile: family_profile(household_size),
            location_profile,
        }
    }
}

/// Affluence by fixed income thresholds (100k/75k/50k).
#[must_use]
pub fn affluence_level(income: f64) -> AffluenceLevel {
    if income >= 100_000.0 {
        AffluenceLevel::HighIncome
    } else if income >= 75_000.0 {
        AffluenceLevel::UpperMiddle
    } else if income >= 50_000.0 {
        AffluenceLevel::MiddleIncome
    } else {
        AffluenceLevel::ValueConscious
    }
}

/// Education profile by fixed bachelor's-share thresholds.
#[must_use]
pub fn education_profile(bachelors_share: f64) -> EducationProfile {
    if bachelors_share < 0.20 {
        EducationProfile::TradeSkilled
    } else if bachelors_share < 0.35 {
        EducationProfile::Mixed
    } else {
        EducationProfile::CollegeEducated
    }
}

/// Family profile by fixed household-size thresholds (2.8/2.2).
#[must_use]
pub fn family_profile(household_size: f64) -> FamilyProfile {
    if household_size > 2.8 {
        FamilyProfile::FamilyOriented
    } else if household_size > 2.2 {
        FamilyProfile::Established
    } else {
        FamilyProfile::SinglesAndCouples
    }
}

fn weight_shares(
    labels: &[&'static str],
    weights: &BTreeMap<&'static str, f64>,
    total: f64,
) -> Vec<ShareBucket> {
    labels
        .iter()
        .map(|label| ShareBucket {
            bucket: (*label).to_string(),
            share: weights.get(label).copied().unwrap_or(0.0) / total,
        })
        .collect()
}

fn scale_lifestyle(l: &mut LifestyleShares, inv: f64) {
    l.self_employed *= inv;
    l.married *= inv;
    l.dual_income *= inv;
    l.mean_commute_minutes *= inv;
    l.charitable_givers *= inv;
    l.stem_degree *= inv;
    l.veteran *= inv;
    l.rent_burden *= inv;
}

fn scale_ethnicity(e: &mut EthnicityShares, inv: f64) {
    e.white *= inv;
    e.black *= inv;
    e.hispanic *= inv;
    e.asian *= inv;
}

fn scale_cohorts(c: &mut AgeCohorts, inv: f64) {
    c.under_18 *= inv;
    c.age_18_29 *= inv;
    c.age_30s *= inv;
    c.age_40s *= inv;
    c.age_50s *= inv;
    c.age_60s *= inv;
    c.age_70_plus *= inv;
}

/// The documented national-average aggregate used when no weight resolves.
#[must_use]
pub fn national_fallback(matched_count: u64) -> DemographicAggregate {
    DemographicAggregate {
        matched_count,
        total_weight: 0.0,
        used_fallback: true,
        median_household_income: national::MEDIAN_HOUSEHOLD_INCOME,
        median_age: national::MEDIAN_AGE,
        household_size: national::HOUSEHOLD_SIZE,
        homeownership_rate: national::HOMEOWNERSHIP_RATE,
        median_home_value: national::MEDIAN_HOME_VALUE,
        six_figure_share: national::SIX_FIGURE_SHARE,
        poverty_rate: national::POVERTY_RATE,
        unemployment_rate: national::UNEMPLOYMENT_RATE,
        bachelors_share: national::BACHELORS_SHARE,
        lifestyle: national::LIFESTYLE,
        ethnicity: national::ETHNICITY,
        age_bands: age_bands(&national::AGE_COHORTS),
        income_buckets: single_bucket(INCOME_BUCKETS, income_bucket(national::MEDIAN_HOUSEHOLD_INCOME)),
        education_buckets: single_bucket(EDUCATION_BUCKETS, education_bucket(national::BACHELORS_SHARE)),
        affluence: affluence_level(national::MEDIAN_HOUSEHOLD_INCOME),
        education_profile: education_profile(national::BACHELORS_SHARE),
        family_profile: family_profile(national::HOUSEHOLD_SIZE),
        location_profile: LocationProfile::Mixed,
    }
}

/// All fallback weight concentrated in the national bucket.
fn single_bucket(labels: &[&'static str], hot: &'static str) -> Vec<ShareBucket> {
    labels
        .iter()
        .map(|label| ShareBucket {
            bucket: (*label).to_string(),
            share: f64::from(u8::from(*label == hot)),
        })
        .collect()
}
