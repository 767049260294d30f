#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Audience segment membership types.
//!
//! An audience segment (e.g. "Coffee", "Oral Care") is defined by the
//! set of geographies its members concentrate in, each carrying a
//! commerce weight, a relative strength signal for how strongly that
//! geography is associated with the segment.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A raw weighted membership row from the audience weight source.
///
/// Rows are restricted upstream to a single national numeric-code
/// namespace; the seed and date fields describe the batch that produced
/// the weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRow {
    /// Audience segment name.
    pub segment: String,
    /// 5-digit geography code.
    pub geo_code: String,
    /// Non-negative commerce weight.
    pub weight: f64,
    /// Seed identifier of the batch that produced this row.
    pub seed: Option<String>,
    /// Date the weight was computed.
    pub date: Option<NaiveDate>,
}

/// One geography and its weight within a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedCode {
    /// 5-digit geography code.
    pub code: String,
    /// Commerce weight.
    pub weight: f64,
}

impl WeightedCode {
    /// Convenience constructor used heavily by fixtures and tests.
    #[must_use]
    pub fn new(code: impl Into<String>, weight: f64) -> Self {
        Self {
            code: code.into(),
            weight,
        }
    }
}
