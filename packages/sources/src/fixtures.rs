//! `Vec`-backed fixture implementations of the collaborator traits.
//!
//! These are the constructed-once repository objects handed to engines
//! in tests and in the demo CLI. An empty fixture reproduces the
//! unavailable-source failure mode.

use audience_atlas_audience_models::MembershipRow;
use audience_atlas_geo_models::RawGeoRecord;

use crate::{
    AudienceWeightSource, GeoDataSource, PrecomputedOverlapRow, PrecomputedOverlapSource,
    SourceError,
};

/// Geo data source over a fixed set of rows.
#[derive(Debug, Clone, Default)]
pub struct StaticGeoSource {
    rows: Vec<RawGeoRecord>,
}

impl StaticGeoSource {
    /// Creates a source over the given rows.
    #[must_use]
    pub fn new(rows: Vec<RawGeoRecord>) -> Self {
        Self { rows }
    }
}

impl GeoDataSource for StaticGeoSource {
    fn fetch_records(&self) -> Result<Vec<RawGeoRecord>, SourceError> {
        if self.rows.is_empty() {
            return Err(SourceError::Unavailable {
                message: "geo source returned no rows".to_string(),
            });
        }
        Ok(self.rows.clone())
    }
}

/// Audience weight source over a fixed set of rows.
#[derive(Debug, Clone, Default)]
pub struct StaticAudienceSource {
    rows: Vec<MembershipRow>,
}

impl StaticAudienceSource {
    /// Creates a source over the given rows.
    #[must_use]
    pub fn new(rows: Vec<MembershipRow>) -> Self {
        Self { rows }
    }
}

impl AudienceWeightSource for StaticAudienceSource {
    fn fetch_rows(&self) -> Result<Vec<MembershipRow>, SourceError> {
        if self.rows.is_empty() {
            return Err(SourceError::Unavailable {
                message: "audience weight source returned no rows".to_string(),
            });
        }
        Ok(self.rows.clone())
    }
}

/// Precomputed overlap artifact over a fixed set of rows.
///
/// Unlike the other fixtures an empty artifact is not an error: absence
/// of rows simply means the fallback computation path is exercised.
#[derive(Debug, Clone, Default)]
pub struct StaticOverlapSource {
    rows: Vec<PrecomputedOverlapRow>,
}

impl StaticOverlapSource {
    /// Creates an artifact source over the given rows.
    #[must_use]
    pub fn new(rows: Vec<PrecomputedOverlapRow>) -> Self {
        Self { rows }
    }
}

impl PrecomputedOverlapSource for StaticOverlapSource {
    fn fetch_overlaps(&self) -> Result<Vec<PrecomputedOverlapRow>, SourceError> {
        Ok(self.rows.clone())
    }
}
