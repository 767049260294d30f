//! Geography record ingestion and indexed lookup.
//!
//! Non-inhabited codes (PO-box, military, commercial-only) are dropped
//! entirely at load. Malformed rows are collected as warnings, never
//! fatal; an empty source is the only fatal load condition.

use std::collections::BTreeMap;

use audience_atlas_geo_models::{GeoRecord, LoadWarning};
use audience_atlas_sources::{GeoDataSource, SourceError};

use crate::GeoStoreError;

/// Immutable, code-indexed store of inhabited geography records.
#[derive(Debug, Default)]
pub struct GeoRecordStore {
    records: BTreeMap<String, GeoRecord>,
    warnings: Vec<LoadWarning>,
}

impl GeoRecordStore {
    /// Loads all records from the source, dropping non-inhabited codes
    /// and collecting per-row warnings.
    ///
    /// # Errors
    ///
    /// Returns [`GeoStoreError::DataUnavailable`] if the source is empty
    /// or unreachable. The load is not retried internally.
    pub fn load(source: &dyn GeoDataSource) -> Result<Self, GeoStoreError> {
        let rows = match source.fetch_records() {
            Ok(rows) => rows,
            Err(SourceError::Unavailable { message }) => {
                return Err(GeoStoreError::DataUnavailable { message });
            }
            Err(e) => return Err(e.into()),
        };

        let mut records = BTreeMap::new();
        let mut warnings = Vec::new();
        let mut dropped_uninhabited = 0_u64;

        for row in rows {
            if !row.inhabited {
                dropped_uninhabited += 1;
                continue;
            }
            let record = row.record;
            if let Some(reason) = validate(&record) {
                warnings.push(LoadWarning {
                    code: record.code.clone(),
                    reason,
                });
                continue;
            }
            records.insert(record.code.clone(), record);
        }

        if records.is_empty() {
            return Err(GeoStoreError::DataUnavailable {
                message: "geo source contained no inhabited records".to_string(),
            });
        }

        log::info!(
            "loaded {} geography records ({dropped_uninhabited} non-inhabited dropped, {} warnings)",
            records.len(),
            warnings.len(),
        );

        Ok(Self { records, warnings })
    }

    /// Builds a store directly from records, bypassing source validation.
    /// Fixture path for tests and the demo CLI.
    #[must_use]
    pub fn from_records(records: Vec<GeoRecord>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.code.clone(), r)).collect(),
            warnings: Vec::new(),
        }
    }

    /// Replaces the full snapshot from a fresh source fetch.
    ///
    /// # Errors
    ///
    /// Returns [`GeoStoreError`] if the reload fails; on failure the
    /// existing snapshot is left untouched.
    pub fn reload(&mut self, source: &dyn GeoDataSource) -> Result<(), GeoStoreError> {
        let fresh = Self::load(source)?;
        *self = fresh;
        Ok(())
    }

    /// Looks up one record by code.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&GeoRecord> {
        self.records.get(code)
    }

    /// Returns the records for the codes that exist in the store.
    /// Missing codes are silently omitted.
    #[must_use]
    pub fn get_by_codes(&self, codes: &[String]) -> Vec<&GeoRecord> {
        codes
            .iter()
            .filter_map(|code| self.records.get(code))
            .collect()
    }

    /// Iterates all records in code order.
    pub fn records(&self) -> impl Iterator<Item = &GeoRecord> {
        self.records.values()
    }

    /// Iterates all codes in order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /// Number of records held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Warnings collected during the last load.
    #[must_use]
    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }
}

/// Returns a rejection reason for a malformed record, or `None` if the
/// record is usable.
fn validate(record: &GeoRecord) -> Option<String> {
    if record.code.len() != 5 || !record.code.bytes().all(|b| b.is_ascii_digit()) {
        return Some(format!("invalid geography code '{}'", record.code));
    }
    if !record.economics.median_household_income.is_finite()
        || record.economics.median_household_income < 0.0
    {
        return Some("non-finite or negative median household income".to_string());
    }
    if !record.household_size.is_finite() || record.household_size < 0.0 {
        return Some("non-finite or negative household size".to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use audience_atlas_geo_models::{Economics, GeoRecord, RawGeoRecord};
    use audience_atlas_sources::fixtures::StaticGeoSource;

    use super::*;

    fn record(code: &str, population: u64) -> GeoRecord {
        GeoRecord {
            code: code.to_string(),
            population,
            economics: Economics {
                median_household_income: 60_000.0,
                ..Default::default()
            },
            household_size: 2.5,
            ..Default::default()
        }
    }

    fn raw(code: &str, inhabited: bool) -> RawGeoRecord {
        RawGeoRecord {
            inhabited,
            record: record(code, 1000),
        }
    }

    #[test]
    fn drops_non_inhabited_codes() {
        let source = StaticGeoSource::new(vec![raw("10001", true), raw("10002", false)]);
        let store = GeoRecordStore::load(&source).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.get("10001").is_some());
        assert!(store.get("10002").is_none());
    }

    #[test]
    fn empty_source_is_data_unavailable() {
        let source = StaticGeoSource::default();
        let err = GeoRecordStore::load(&source).unwrap_err();
        assert!(matches!(err, GeoStoreError::DataUnavailable { .. }));
    }

    #[test]
    fn all_uninhabited_is_data_unavailable() {
        let source = StaticGeoSource::new(vec![raw("10001", false)]);
        let err = GeoRecordStore::load(&source).unwrap_err();
        assert!(matches!(err, GeoStoreError::DataUnavailable { .. }));
    }

    #[test]
    fn malformed_rows_become_warnings() {
        let source = StaticGeoSource::new(vec![raw("10001", true), raw("123", true)]);
        let store = GeoRecordStore::load(&source).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.warnings().len(), 1);
        assert!(store.warnings()[0].reason.contains("invalid geography code"));
    }

    #[test]
    fn missing_codes_silently_omitted() {
        let store = GeoRecordStore::from_records(vec![record("10001", 100)]);
        let found = store.get_by_codes(&["10001".to_string(), "99999".to_string()]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, "10001");
    }

    #[test]
    fn reload_replaces_snapshot() {
        let mut store = GeoRecordStore::from_records(vec![record("10001", 100)]);
        let source = StaticGeoSource::new(vec![raw("20001", true), raw("20002", true)]);
        store.reload(&source).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.get("10001").is_none());
    }
}
