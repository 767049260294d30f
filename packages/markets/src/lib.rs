#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Higher-level market rollups and composite quality indices.
//!
//! Geography records roll up to region/state/metro/county/city markets
//! by population-weighted mean; composite indices are derived only after
//! min/max normalization ranges across the full market set at a level
//! are known. Per-level results are cached for the process lifetime and
//! invalidated only by explicit reload.

pub mod engine;
pub mod indices;
pub mod rollup;
pub mod similar;

pub use engine::GeoAggregationEngine;

use audience_atlas_geo_models::{AgeCohorts, Economics, EducationShares, EthnicityShares, LifestyleShares};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during market aggregation.
#[derive(Debug, Error)]
pub enum MarketError {
    /// The requested market does not exist at the given level.
    #[error("Unknown market '{name}' at level {level}")]
    UnknownMarket {
        /// Requested market name.
        name: String,
        /// Requested level.
        level: GeoLevel,
    },
}

/// Administrative rollup level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoLevel {
    /// Census region (Northeast/Midwest/South/West).
    Region,
    /// US state.
    State,
    /// Metro area (CBSA).
    Metro,
    /// County within a state.
    County,
    /// City within a state.
    City,
}

impl std::fmt::Display for GeoLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Region => write!(f, "region"),
            Self::State => write!(f, "state"),
            Self::Metro => write!(f, "metro"),
            Self::County => write!(f, "county"),
            Self::City => write!(f, "city"),
        }
    }
}

/// Opportunity tier assigned from the opportunity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityTier {
    /// Score 80 or above.
    Gold,
    /// Score 60 or above.
    Silver,
    /// Score 40 or above.
    Bronze,
    /// Everything else.
    Standard,
}

impl std::fmt::Display for OpportunityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gold => write!(f, "gold"),
            Self::Silver => write!(f, "silver"),
            Self::Bronze => write!(f, "bronze"),
            Self::Standard => write!(f, "standard"),
        }
    }
}

/// Coarse demographic-lifecycle classification of a market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeStageSegment {
    /// Older, smaller households.
    RetirementEmptyNester,
    /// Child-heavy, larger households.
    GrowerFamily,
    /// Young, renter-heavy.
    StarterYoungProfessional,
    /// No rule matched.
    EstablishedMixed,
}

impl std::fmt::Display for LifeStageSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RetirementEmptyNester => write!(f, "retirement / empty nester"),
            Self::GrowerFamily => write!(f, "grower / family"),
            Self::StarterYoungProfessional => write!(f, "starter / young professional"),
            Self::EstablishedMixed => write!(f, "established / mixed"),
        }
    }
}

/// Market saturation from fixed density/income thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaturationLevel {
    /// Dense and affluent; expensive to enter.
    High,
    /// Middling density or income.
    Medium,
    /// Sparse and inexpensive.
    Low,
}

impl std::fmt::Display for SaturationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// A population-weighted rollup of every geography attribute at one
/// level, plus the derived composite indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedMarket {
    /// Market name (e.g. `"Dallas, TX"`, `"South"`).
    pub name: String,
    /// Rollup level.
    pub level: GeoLevel,
    /// Number of geography records rolled up.
    pub record_count: u64,
    /// Total population.
    pub population: u64,
    /// Weighted age cohort shares.
    pub age: AgeCohorts,
    /// Weighted ethnicity shares.
    pub ethnicity: EthnicityShares,
    /// Weighted education shares.
    pub education: EducationShares,
    /// Weighted household size.
    pub household_size: f64,
    /// Weighted lifestyle shares.
    pub lifestyle: LifestyleShares,
    /// Weighted economics.
    pub economics: Economics,
    /// Weighted housing-unit density estimate.
    pub density_estimate: f64,
    /// Consumer wealth index, 0-100.
    pub wealth_index: f64,
    /// Community cohesion score, 0-100.
    pub cohesion_score: f64,
    /// Opportunity score, 0-100.
    pub opportunity_score: f64,
    /// Opportunity tier.
    pub opportunity_tier: OpportunityTier,
    /// Life-stage classification.
    pub life_stage: LifeStageSegment,
    /// 1-based rank by opportunity score within the level.
    pub rank: u64,
}

/// A similarity-search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarMarket {
    /// Market name.
    pub name: String,
    /// Cosine similarity in `[0, 1]` over normalized features.
    pub similarity: f64,
}
