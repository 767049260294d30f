//! Segment membership ingestion and weighted top-N lookup.
//!
//! Duplicate (segment, geography) rows keep the higher weight. Entries
//! preserve original load order so that equal-weight ties rank stably.

use std::collections::{BTreeMap, HashMap};

use audience_atlas_audience_models::{MembershipRow, WeightedCode};
use audience_atlas_sources::{AudienceWeightSource, SourceError};

use crate::AudienceError;

/// Case-insensitive index of weighted segment memberships.
#[derive(Debug, Default)]
pub struct AudienceMembershipIndex {
    /// Canonical segment name -> entries in load order, deduped by code.
    segments: BTreeMap<String, Vec<WeightedCode>>,
    skipped_rows: u64,
}

impl AudienceMembershipIndex {
    /// Loads all membership rows from the source.
    ///
    /// Rows with a negative weight are skipped with a warning. Duplicate
    /// (segment, geography) keys keep the maximum weight.
    ///
    /// # Errors
    ///
    /// Returns [`AudienceError::DataUnavailable`] if the source is empty
    /// or unreachable.
    pub fn load(source: &dyn AudienceWeightSource) -> Result<Self, AudienceError> {
        let rows = match source.fetch_rows() {
            Ok(rows) => rows,
            Err(SourceError::Unavailable { message }) => {
                return Err(AudienceError::DataUnavailable { message });
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self::from_rows(rows))
    }

    /// Builds an index directly from rows. Fixture path for tests and
    /// the demo CLI.
    #[must_use]
    pub fn from_rows(rows: Vec<MembershipRow>) -> Self {
        let mut segments: BTreeMap<String, Vec<WeightedCode>> = BTreeMap::new();
        // Per-segment position of each code, for max-weight dedup without
        // disturbing load order.
        let mut positions: HashMap<(String, String), usize> = HashMap::new();
        let mut skipped_rows = 0_u64;

        for row in rows {
            if !row.weight.is_finite() || row.weight < 0.0 {
                log::warn!(
                    "skipping membership row {}/{} with invalid weight {}",
                    row.segment,
                    row.geo_code,
                    row.weight,
                );
                skipped_rows += 1;
                continue;
            }

            let entries = segments.entry(row.segment.clone()).or_default();
            let key = (row.segment, row.geo_code.clone());
            if let Some(&pos) = positions.get(&key) {
                if row.weight > entries[pos].weight {
                    entries[pos].weight = row.weight;
                }
            } else {
                positions.insert(key, entries.len());
                entries.push(WeightedCode {
                    code: row.geo_code,
                    weight: row.weight,
                });
            }
        }

        log::info!(
            "indexed {} segments ({skipped_rows} rows skipped)",
            segments.len(),
        );

        Self {
            segments,
            skipped_rows,
        }
    }

    /// Resolves a segment name case-insensitively: exact match first,
    /// then the first segment (alphabetically) containing the query as a
    /// substring.
    #[must_use]
    pub fn resolve_segment(&self, name: &str) -> Option<&str> {
        let query = name.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }
        self.segments
            .keys()
            .find(|segment| segment.to_lowercase() == query)
            .or_else(|| {
                self.segments
                    .keys()
                    .find(|segment| segment.to_lowercase().contains(&query))
            })
            .map(String::as_str)
    }

    /// Returns at most `n` entries for the segment, sorted descending by
    /// weight, stable on ties (original load order), no duplicate codes.
    #[must_use]
    pub fn top_for_segment(&self, segment: &str, n: usize) -> Vec<WeightedCode> {
        let Some(canonical) = self.resolve_segment(segment) else {
            return Vec::new();
        };
        let mut entries = self.segments[canonical].clone();
        // Vec::sort_by is stable, so equal weights keep load order.
        entries.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(std::cmp::Ordering::Equal));
        entries.truncate(n);
        entries
    }

    /// All entries for a segment in load order, or an empty slice.
    #[must_use]
    pub fn weights_for(&self, segment: &str) -> &[WeightedCode] {
        self.resolve_segment(segment)
            .and_then(|canonical| self.segments.get(canonical))
            .map_or(&[], Vec::as_slice)
    }

    /// All canonical segment names, alphabetically.
    pub fn segment_names(&self) -> impl Iterator<Item = &str> {
        self.segments.keys().map(String::as_str)
    }

    /// Number of indexed segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Rows skipped during the last load.
    #[must_use]
    pub const fn skipped_rows(&self) -> u64 {
        self.skipped_rows
    }
}
