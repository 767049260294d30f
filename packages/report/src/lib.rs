#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Composed audience report building and caching.
//!
//! A [`Report`] combines the baseline comparison, ranked geographic
//! hotspots, demographic breakdown, and the ranked overlap list with
//! diversified representative markets. It is a plain structured result;
//! narrative text belongs to the excluded presentation layer.

pub mod builder;
pub mod cache;

pub use builder::ReportBuilder;
pub use cache::ReportCache;

use audience_atlas_analytics_models::DemographicAggregate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while composing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The requested segment is not in the membership index.
    #[error("Unknown segment '{segment}'")]
    UnknownSegment {
        /// Requested segment name.
        segment: String,
    },

    /// Baseline computation or persistence failed.
    #[error("Analytics error: {0}")]
    Analytics(#[from] audience_atlas_analytics::AnalyticsError),
}

/// Cache key for a composed report.
///
/// `include_non_residential` is carried for key compatibility with
/// upstream callers; non-residential codes are excluded at load, so the
/// flag never changes the data a report sees.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportKey {
    /// Audience segment name.
    pub segment: String,
    /// Optional audience category tag.
    pub category: Option<String>,
    /// Whether the caller asked to include non-residential codes.
    pub include_non_residential: bool,
}

/// One key metric compared against the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDelta {
    /// Metric name.
    pub metric: String,
    /// Aggregate value for the segment.
    pub value: f64,
    /// Baseline value.
    pub baseline: f64,
    /// Percent difference vs baseline; 0 when the baseline is 0.
    pub delta_percentage: f64,
}

/// One ranked geographic hotspot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    /// 5-digit geography code.
    pub code: String,
    /// City name, empty when the code has no geo record.
    pub city: String,
    /// State abbreviation, empty when the code has no geo record.
    pub state: String,
    /// Commerce weight.
    pub weight: f64,
    /// Weight relative to the segment's mean hotspot weight, clamped to
    /// the same `[1, 15]` range as the pairwise over-index.
    pub over_index: f64,
}

/// One ranked overlap partner with its representative market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapEntry {
    /// Partner segment name.
    pub segment: String,
    /// Shared-footprint percentage.
    pub overlap_percentage: f64,
    /// Pairwise over-index, within `[1, 15]`.
    pub over_index: f64,
    /// Diversified representative market for this partner, when any
    /// common city exists.
    pub representative_market: Option<String>,
}

/// The fully composed, cacheable report for one segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Canonical segment name.
    pub segment: String,
    /// Optional category tag echoed from the request.
    pub category: Option<String>,
    /// Key metrics with vs-baseline deltas.
    pub key_metrics: Vec<MetricDelta>,
    /// Ranked geographic hotspots.
    pub hotspots: Vec<Hotspot>,
    /// Full demographic breakdown.
    pub demographics: DemographicAggregate,
    /// Ranked overlap list with diversified representative markets.
    pub overlaps: Vec<OverlapEntry>,
    /// When the report was composed.
    pub generated_at: DateTime<Utc>,
}
