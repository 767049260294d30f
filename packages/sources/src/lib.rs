#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Collaborator source traits.
//!
//! The analytical core performs no network or disk I/O of its own after
//! load; every external input arrives through one of the traits defined
//! here. Each trait has a `Vec`-backed fixture implementation so engines
//! can be tested against constructed repositories rather than global
//! registries.

pub mod baseline_store;
pub mod fixtures;

use audience_atlas_audience_models::MembershipRow;
use audience_atlas_geo_models::RawGeoRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while consuming a collaborator source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source was empty or unreachable. Fatal to the load call;
    /// retry policy belongs to the caller.
    #[error("Data unavailable: {message}")]
    Unavailable {
        /// Description of what went wrong.
        message: String,
    },

    /// I/O error (baseline persistence).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Supplies per-geography demographic rows.
///
/// Implementations are expected to pre-filter or flag non-inhabited
/// codes; the store drops flagged rows on load.
pub trait GeoDataSource: Send + Sync {
    /// Fetches all raw geography rows.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the source is empty or unreachable.
    fn fetch_records(&self) -> Result<Vec<RawGeoRecord>, SourceError>;
}

/// Supplies weighted (segment, geography) membership rows.
pub trait AudienceWeightSource: Send + Sync {
    /// Fetches all membership rows.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the source is empty or unreachable.
    fn fetch_rows(&self) -> Result<Vec<MembershipRow>, SourceError>;
}

/// One row of the batch-produced pairwise overlap artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrecomputedOverlapRow {
    /// First segment of the pair.
    pub segment_a: String,
    /// Second segment of the pair.
    pub segment_b: String,
    /// Jaccard overlap as a percentage in `[0, 100]`.
    pub overlap_percentage: f64,
    /// Size of the intersection of the two top-200 code sets.
    pub intersection_size: u64,
    /// Size of the union of the two top-200 code sets.
    pub union_size: u64,
    /// When the batch computed this row.
    pub computed_at: DateTime<Utc>,
}

/// Supplies the optional precomputed overlap artifact.
///
/// Presence of an implementation is a capability flag: with it the
/// overlap engine answers from the lookup table, without it the engine
/// falls back to sampled Jaccard computation.
pub trait PrecomputedOverlapSource: Send + Sync {
    /// Fetches all precomputed overlap rows.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the artifact cannot be read.
    fn fetch_overlaps(&self) -> Result<Vec<PrecomputedOverlapRow>, SourceError>;
}
