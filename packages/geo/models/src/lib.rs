#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geography record and demographic distribution types.
//!
//! A [`GeoRecord`] holds the per-ZIP demographic, economic, and geographic
//! attributes that every aggregation and scoring engine consumes. Only
//! inhabited codes are ever represented here; non-residential, PO-box,
//! and military codes are dropped at load time.

pub mod bucket;
pub mod region;

use serde::{Deserialize, Serialize};

/// Urban/suburban/rural classification for a geography.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum UrbanicityClass {
    /// Dense urban core.
    Urban,
    /// Suburban ring.
    #[default]
    Suburban,
    /// Rural or exurban.
    Rural,
}

impl std::fmt::Display for UrbanicityClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Urban => write!(f, "urban"),
            Self::Suburban => write!(f, "suburban"),
            Self::Rural => write!(f, "rural"),
        }
    }
}

/// Census age cohort shares for one geography.
///
/// Shares are fractions in `[0, 1]` of the total population. The cohorts
/// mirror the census source layout; ten-year presentation bands are derived
/// from these by the aggregation engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AgeCohorts {
    /// Median age in years.
    pub median_age: f64,
    /// Share under 18.
    pub under_18: f64,
    /// Share 18-29.
    pub age_18_29: f64,
    /// Share 30-39.
    pub age_30s: f64,
    /// Share 40-49.
    pub age_40s: f64,
    /// Share 50-59.
    pub age_50s: f64,
    /// Share 60-69.
    pub age_60s: f64,
    /// Share 70 and older.
    pub age_70_plus: f64,
}

impl AgeCohorts {
    /// Share of residents of prime working age (18-64).
    ///
    /// Half of the 60s cohort is counted as working-age, matching the
    /// census convention of a 65-year boundary.
    #[must_use]
    pub fn working_age_share(&self) -> f64 {
        self.age_18_29 + self.age_30s + self.age_40s + self.age_50s + self.age_60s * 0.5
    }
}

/// Ethnicity shares for one geography, as fractions in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EthnicityShares {
    /// Non-Hispanic white share.
    pub white: f64,
    /// Black share.
    pub black: f64,
    /// Hispanic share.
    pub hispanic: f64,
    /// Asian share.
    pub asian: f64,
}

/// Educational attainment shares for one geography.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EducationShares {
    /// Share of adults with a bachelor's degree or higher.
    pub bachelors_or_higher: f64,
    /// Share of adults with a graduate or professional degree.
    pub graduate: f64,
}

/// Lifestyle and household-composition shares for one geography.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LifestyleShares {
    /// Share of workers who are self-employed.
    pub self_employed: f64,
    /// Share of households headed by a married couple.
    pub married: f64,
    /// Share of married households where both partners work.
    pub dual_income: f64,
    /// Mean one-way commute in minutes.
    pub mean_commute_minutes: f64,
    /// Share of households reporting charitable giving.
    pub charitable_givers: f64,
    /// Share of degree holders with a STEM degree.
    pub stem_degree: f64,
    /// Share of adults who are veterans.
    pub veteran: f64,
    /// Share of renters paying more than 30% of income in rent.
    pub rent_burden: f64,
}

/// Economic indicators for one geography.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Economics {
    /// Median household income in dollars.
    pub median_household_income: f64,
    /// Share of households earning $100k or more.
    pub six_figure_share: f64,
    /// Share of residents below the poverty line.
    pub poverty_rate: f64,
    /// Civilian unemployment rate.
    pub unemployment_rate: f64,
    /// Share of housing units that are owner-occupied.
    pub homeownership_rate: f64,
    /// Median home value in dollars.
    pub median_home_value: f64,
}

/// Administrative and physical geography for one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LocationInfo {
    /// Two-letter state abbreviation.
    pub state: String,
    /// County name.
    pub county: String,
    /// City name.
    pub city: String,
    /// Metro area name (CBSA title), empty when outside any metro.
    pub metro: String,
    /// Urban/suburban/rural classification.
    pub urbanicity: UrbanicityClass,
    /// Housing-unit density estimate per square mile.
    pub density_estimate: f64,
}

/// One inhabited geography, keyed by its 5-digit code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GeoRecord {
    /// 5-digit geography code (ZCTA-equivalent).
    pub code: String,
    /// Total population.
    pub population: u64,
    /// Age cohort shares.
    pub age: AgeCohorts,
    /// Ethnicity shares.
    pub ethnicity: EthnicityShares,
    /// Educational attainment shares.
    pub education: EducationShares,
    /// Average household size.
    pub household_size: f64,
    /// Lifestyle shares.
    pub lifestyle: LifestyleShares,
    /// Economic indicators.
    pub economics: Economics,
    /// Administrative geography.
    pub location: LocationInfo,
}

/// A raw row from the geo data source, before the inhabited filter.
///
/// The source marks non-residential, PO-box, and military codes; those
/// rows are dropped entirely during load and never reach a [`GeoRecord`]
/// consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGeoRecord {
    /// Whether the code represents a populated residential area.
    pub inhabited: bool,
    /// The record payload.
    #[serde(flatten)]
    pub record: GeoRecord,
}

/// Range and class filters for [`GeoRecord`] queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoQueryFilters {
    /// Minimum median household income.
    pub income_min: Option<f64>,
    /// Maximum median household income.
    pub income_max: Option<f64>,
    /// Minimum median age.
    pub age_min: Option<f64>,
    /// Maximum median age.
    pub age_max: Option<f64>,
    /// Restrict to one urbanicity class.
    pub urbanicity: Option<UrbanicityClass>,
}

/// Count of matched records in one fixed-boundary bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketCount {
    /// Bucket label (e.g. `"$50k-$75k"`).
    pub bucket: String,
    /// Number of matched records in the bucket.
    pub count: u64,
}

/// Distribution summary over the records matched by a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionSummary {
    /// Number of records that matched the filters.
    pub matched_count: u64,
    /// Median-income distribution across fixed income buckets.
    pub income_buckets: Vec<BucketCount>,
    /// Median-age distribution across fixed age buckets.
    pub age_buckets: Vec<BucketCount>,
    /// Bachelor's-share distribution across fixed education buckets.
    pub education_buckets: Vec<BucketCount>,
    /// Mean-commute distribution across fixed commute buckets.
    pub commute_buckets: Vec<BucketCount>,
    /// Urbanicity class held by a simple majority of matched records,
    /// when one exists.
    pub dominant_urbanicity: Option<UrbanicityClass>,
}

/// A per-row problem collected during load. Malformed rows are skipped
/// with a warning, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadWarning {
    /// Geography code of the offending row (possibly malformed itself).
    pub code: String,
    /// What was wrong with the row.
    pub reason: String,
}
