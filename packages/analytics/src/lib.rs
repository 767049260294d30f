#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Weighted demographic aggregation and the segment-agnostic baseline.
//!
//! [`aggregate::WeightedAggregator`] turns geography/weight pairs into a
//! [`audience_atlas_analytics_models::DemographicAggregate`];
//! [`baseline::BaselineCalculator`] computes and persists the "typical
//! audience" comparison point across every segment.

pub mod aggregate;
pub mod baseline;
pub mod national;

use thiserror::Error;

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Baseline persistence failed.
    #[error("Source error: {0}")]
    Source(#[from] audience_atlas_sources::SourceError),
}
