#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pairwise audience-segment geographic overlap and concentration.
//!
//! With a batch-produced artifact present, overlap queries are table
//! lookups; without it the engine samples other segments and computes
//! Jaccard similarity over top-100 code sets, an approximation, not an
//! exhaustive pass.

pub mod engine;
pub mod markets;
pub mod over_index;

pub use engine::OverlapEngine;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during overlap operations.
#[derive(Debug, Error)]
pub enum OverlapError {
    /// The precomputed artifact could not be read.
    #[error("Source error: {0}")]
    Source(#[from] audience_atlas_sources::SourceError),
}

/// One ranked overlap partner for a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentOverlap {
    /// The other segment of the pair.
    pub segment: String,
    /// Shared-footprint percentage in `[0, 100]`.
    pub overlap_percentage: f64,
}

/// Concentration score for one city common to a segment pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityScore {
    /// City name.
    pub city: String,
    /// Two-letter state abbreviation.
    pub state: String,
    /// Summed per-code geometric-mean weight for the pair.
    pub score: f64,
    /// Population-adjusted over-index relative to the mean matched city.
    pub over_index: f64,
}

/// Over-index result for a segment pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairOverIndex {
    /// Overall pair over-index, clamped to `[1, 15]`.
    pub over_index: f64,
    /// Matched cities ranked by over-index, candidates for
    /// representative-market selection.
    pub cities: Vec<CityScore>,
}
