#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregate demographic profile and baseline snapshot types.
//!
//! [`DemographicAggregate`] is the weighted rollup the aggregation engine
//! produces for an arbitrary set of geography/weight pairs.
//! [`BaselineSnapshot`] is the segment-agnostic "typical audience"
//! comparison point computed across all segments.

use audience_atlas_geo_models::{EthnicityShares, LifestyleShares, UrbanicityClass};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Affluence level derived from aggregate median household income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffluenceLevel {
    /// Aggregate income at or above $100k.
    HighIncome,
    /// Aggregate income at or above $75k.
    UpperMiddle,
    /// Aggregate income at or above $50k.
    MiddleIncome,
    /// Aggregate income below $50k.
    ValueConscious,
}

impl std::fmt::Display for AffluenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HighIncome => write!(f, "high income"),
            Self::UpperMiddle => write!(f, "upper middle"),
            Self::MiddleIncome => write!(f, "middle income"),
            Self::ValueConscious => write!(f, "value conscious"),
        }
    }
}

/// Education profile derived from the aggregate bachelor's-or-higher share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationProfile {
    /// Under 20% bachelor's share.
    TradeSkilled,
    /// 20-35% bachelor's share.
    Mixed,
    /// 35% bachelor's share or higher.
    CollegeEducated,
}

impl std::fmt::Display for EducationProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TradeSkilled => write!(f, "trade-skilled"),
            Self::Mixed => write!(f, "mixed"),
            Self::CollegeEducated => write!(f, "college-educated"),
        }
    }
}

/// Family profile derived from aggregate household size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FamilyProfile {
    /// Household size above 2.8.
    FamilyOriented,
    /// Household size above 2.2.
    Established,
    /// Household size of 2.2 or below.
    SinglesAndCouples,
}

impl std::fmt::Display for FamilyProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FamilyOriented => write!(f, "family-oriented"),
            Self::Established => write!(f, "established"),
            Self::SinglesAndCouples => write!(f, "singles and couples"),
        }
    }
}

/// Location profile: the urbanicity class carrying the most weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationProfile {
    /// Urban geographies dominate.
    Urban,
    /// Suburban geographies dominate.
    Suburban,
    /// Rural geographies dominate.
    Rural,
    /// No class dominates (zero-weight fallback).
    Mixed,
}

impl From<UrbanicityClass> for LocationProfile {
    fn from(class: UrbanicityClass) -> Self {
        match class {
            UrbanicityClass::Urban => Self::Urban,
            UrbanicityClass::Suburban => Self::Suburban,
            UrbanicityClass::Rural => Self::Rural,
        }
    }
}

impl std::fmt::Display for LocationProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Urban => write!(f, "urban"),
            Self::Suburban => write!(f, "suburban"),
            Self::Rural => write!(f, "rural"),
            Self::Mixed => write!(f, "mixed"),
        }
    }
}

/// A labelled weighted share (a group of these sums to ~1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareBucket {
    /// Bucket label.
    pub bucket: String,
    /// Weighted share of the aggregate in this bucket.
    pub share: f64,
}

/// Weighted demographic rollup for a set of geography/weight pairs.
///
/// When the pair set resolves to zero total weight, every field is filled
/// from the documented national-average table and `used_fallback` is set;
/// the aggregate never carries NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemographicAggregate {
    /// Number of input pairs that resolved to a populated record.
    pub matched_count: u64,
    /// Sum of weights over the matched pairs.
    pub total_weight: f64,
    /// Whether the national fallback profile was used.
    pub used_fallback: bool,
    /// Weighted median household income.
    pub median_household_income: f64,
    /// Weighted median age.
    pub median_age: f64,
    /// Weighted average household size.
    pub household_size: f64,
    /// Weighted homeownership rate.
    pub homeownership_rate: f64,
    /// Weighted median home value.
    pub median_home_value: f64,
    /// Weighted share of six-figure households.
    pub six_figure_share: f64,
    /// Weighted poverty rate.
    pub poverty_rate: f64,
    /// Weighted unemployment rate.
    pub unemployment_rate: f64,
    /// Weighted bachelor's-or-higher share.
    pub bachelors_share: f64,
    /// Weighted lifestyle shares.
    pub lifestyle: LifestyleShares,
    /// Weighted ethnicity shares.
    pub ethnicity: EthnicityShares,
    /// Ten-year age bands redistributed from census cohorts.
    pub age_bands: Vec<ShareBucket>,
    /// Weight distribution across fixed income buckets.
    pub income_buckets: Vec<ShareBucket>,
    /// Weight distribution across fixed education buckets.
    pub education_buckets: Vec<ShareBucket>,
    /// Affluence label.
    pub affluence: AffluenceLevel,
    /// Education label.
    pub education_profile: EducationProfile,
    /// Family label.
    pub family_profile: FamilyProfile,
    /// Location label.
    pub location_profile: LocationProfile,
}

/// The segment-agnostic "typical audience" baseline.
///
/// Each metric is the median across per-segment aggregate profiles, which
/// keeps the baseline from tilting toward whichever segments dominate
/// multi-category high-income metros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineSnapshot {
    /// Median across segments of aggregate median household income.
    pub median_household_income: f64,
    /// Median across segments of aggregate median age.
    pub median_age: f64,
    /// Median across segments of aggregate bachelor's share.
    pub bachelors_share: f64,
    /// Median across segments of aggregate homeownership rate.
    pub homeownership_rate: f64,
    /// Median across segments of aggregate household size.
    pub household_size: f64,
    /// Median across segments of aggregate median home value.
    pub median_home_value: f64,
    /// Median across segments of aggregate lifestyle shares.
    pub lifestyle: LifestyleShares,
    /// Number of segments that contributed a profile.
    pub segment_count: u64,
    /// When this snapshot was computed.
    pub calculated_at: DateTime<Utc>,
}
