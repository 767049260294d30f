//! Per-level market aggregation with process-lifetime caching.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use audience_atlas_geo::GeoRecordStore;

use crate::indices::finalize_markets;
use crate::rollup::rollup_level;
use crate::similar::{hidden_gems, similar_markets};
use crate::{AggregatedMarket, GeoLevel, MarketError, SimilarMarket};

/// Rolls geography records up to markets and serves ranking, profile,
/// and similarity queries.
///
/// Each level's market set is computed lazily, cached for the process
/// lifetime, and invalidated only by an explicit [`invalidate`] after a
/// geo reload. Cached sets are immutable snapshots; readers never block
/// and duplicate concurrent recomputation on a miss is tolerated.
///
/// [`invalidate`]: GeoAggregationEngine::invalidate
pub struct GeoAggregationEngine<'a> {
    geo: &'a GeoRecordStore,
    cache: RwLock<HashMap<GeoLevel, Arc<Vec<AggregatedMarket>>>>,
}

impl<'a> GeoAggregationEngine<'a> {
    /// Creates an engine over the given store.
    #[must_use]
    pub fn new(geo: &'a GeoRecordStore) -> Self {
        Self {
            geo,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Returns every market at the level, ranked by opportunity score.
    #[must_use]
    pub fn aggregate_level(&self, level: GeoLevel) -> Arc<Vec<AggregatedMarket>> {
        if let Some(cached) = self
            .cache
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&level)
        {
            return Arc::clone(cached);
        }

        let markets = Arc::new(finalize_markets(rollup_level(self.geo, level), level));
        log::info!("aggregated {} markets at level {level}", markets.len());

        self.cache
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(level, Arc::clone(&markets));
        markets
    }

    /// Looks up one market by name at a level.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::UnknownMarket`] if the name does not exist
    /// at that level.
    pub fn market(&self, level: GeoLevel, name: &str) -> Result<AggregatedMarket, MarketError> {
        self.aggregate_level(level)
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| MarketError::UnknownMarket {
                name: name.to_string(),
                level,
            })
    }

    /// Top-`k` markets most similar to the named market.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::UnknownMarket`] if the name does not exist
    /// at that level.
    pub fn similar(
        &self,
        level: GeoLevel,
        name: &str,
        k: usize,
    ) -> Result<Vec<SimilarMarket>, MarketError> {
        let markets = self.aggregate_level(level);
        let canonical = markets
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
            .map(|m| m.name.clone())
            .ok_or_else(|| MarketError::UnknownMarket {
                name: name.to_string(),
                level,
            })?;
        Ok(similar_markets(&markets, &canonical, k))
    }

    /// Hidden-gem markets at a level.
    #[must_use]
    pub fn hidden_gems(&self, level: GeoLevel) -> Vec<AggregatedMarket> {
        let markets = self.aggregate_level(level);
        hidden_gems(&markets).into_iter().cloned().collect()
    }

    /// Drops every cached level. Call after a geo store reload.
    pub fn invalidate(&self) {
        self.cache
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clear();
        log::debug!("market aggregation cache invalidated");
    }
}

#[cfg(test)]
mod tests {
    use audience_atlas_geo_models::{Economics, GeoRecord, LocationInfo};

    use super::*;

    fn record(code: &str, city: &str, state: &str, population: u64, income: f64) -> GeoRecord {
        GeoRecord {
            code: code.to_string(),
            population,
            economics: Economics {
                median_household_income: income,
                ..Default::default()
            },
            location: LocationInfo {
                city: city.to_string(),
                state: state.to_string(),
                county: format!("{city} County"),
                metro: format!("{city} Metro"),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn store() -> GeoRecordStore {
        GeoRecordStore::from_records(vec![
            record("75001", "Dallas", "TX", 500_000, 70_000.0),
            record("78701", "Austin", "TX", 300_000, 85_000.0),
            record("10001", "New York", "NY", 900_000, 90_000.0),
        ])
    }

    #[test]
    fn aggregate_level_caches_snapshot() {
        let store = store();
        let engine = GeoAggregationEngine::new(&store);
        let first = engine.aggregate_level(GeoLevel::City);
        let second = engine.aggregate_level(GeoLevel::City);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn invalidate_drops_cache() {
        let store = store();
        let engine = GeoAggregationEngine::new(&store);
        let first = engine.aggregate_level(GeoLevel::City);
        engine.invalidate();
        let second = engine.aggregate_level(GeoLevel::City);
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[test]
    fn market_lookup_is_case_insensitive() {
        let store = store();
        let engine = GeoAggregationEngine::new(&store);
        let market = engine.market(GeoLevel::City, "dallas, tx").unwrap();
        assert_eq!(market.name, "Dallas, TX");
    }

    #[test]
    fn unknown_market_errors() {
        let store = store();
        let engine = GeoAggregationEngine::new(&store);
        let err = engine.market(GeoLevel::City, "Nowhere, ZZ").unwrap_err();
        assert!(matches!(err, MarketError::UnknownMarket { .. }));
    }

    #[test]
    fn similar_excludes_target() {
        let store = store();
        let engine = GeoAggregationEngine::new(&store);
        let hits = engine.similar(GeoLevel::City, "Dallas, TX", 5).unwrap();
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|h| h.name != "Dallas, TX"));
    }
}
