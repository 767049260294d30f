//! Pairwise concentration over-index.
//!
//! Codes common to both segments' top-200 sets score the geometric mean
//! of the two weights; scores aggregate by city and are normalized by
//! the mean matched city, with a log-population adjustment so that a
//! handful of strong codes in a small town does not read as a major
//! market. The pair over-index is hard-capped to `[1, 15]` to stop
//! multiplicative blow-up on sparse matches.

use std::collections::HashMap;

use audience_atlas_audience::AudienceMembershipIndex;
use audience_atlas_geo::GeoRecordStore;

use crate::{CityScore, PairOverIndex};

/// Codes per segment entering the over-index intersection.
pub const OVER_INDEX_TOP_CODES: usize = 200;

/// Floor of the pair over-index.
pub const OVER_INDEX_MIN: f64 = 1.0;

/// Hard cap of the pair over-index.
pub const OVER_INDEX_MAX: f64 = 15.0;

/// Population at which the log adjustment factor is exactly 1.
const REFERENCE_POPULATION: f64 = 100_000.0;

/// Computes the over-index for a segment pair.
///
/// Returns the floor value with no cities when the pair shares no codes
/// that resolve to a city; that is an insufficient sample, not an error.
#[must_use]
pub fn pair_over_index(
    geo: &GeoRecordStore,
    audience: &AudienceMembershipIndex,
    segment_a: &str,
    segment_b: &str,
) -> PairOverIndex {
    let top_a = audience.top_for_segment(segment_a, OVER_INDEX_TOP_CODES);
    let top_b = audience.top_for_segment(segment_b, OVER_INDEX_TOP_CODES);

    let weights_a: HashMap<&str, f64> = top_a
        .iter()
        .map(|entry| (entry.code.as_str(), entry.weight))
        .collect();

    // (city, state) -> (summed score, summed population)
    let mut by_city: HashMap<(String, String), (f64, u64)> = HashMap::new();

    for entry in &top_b {
        let Some(&weight_a) = weights_a.get(entry.code.as_str()) else {
            continue;
        };
        let Some(record) = geo.get(&entry.code) else {
            continue;
        };
        if record.location.city.is_empty() {
            continue;
        }
        let score = (weight_a * entry.weight).sqrt();
        let slot = by_city
            .entry((record.location.city.clone(), record.location.state.clone()))
            .or_insert((0.0, 0));
        slot.0 += score;
        slot.1 += record.population;
    }

    if by_city.is_empty() {
        log::debug!("no common cities for {segment_a}/{segment_b}; over-index floored");
        return PairOverIndex {
            over_index: OVER_INDEX_MIN,
            cities: Vec::new(),
        };
    }

    #[allow(clippy::cast_precision_loss)]
    let mean_score = by_city.values().map(|(score, _)| score).sum::<f64>() / by_city.len() as f64;

    let mut cities: Vec<CityScore> = by_city
        .into_iter()
        .map(|((city, state), (score, population))| {
            let ratio = if mean_score > 0.0 { score / mean_score } else { OVER_INDEX_MIN };
            #[allow(clippy::cast_precision_loss)]
            let adjusted = ratio * log_population_factor(population as f64);
            CityScore {
                city,
                state,
                score,
                over_index: adjusted,
            }
        })
        .collect();

    // Rank candidates by adjusted over-index; name-tiebreak keeps the
    // ordering deterministic across runs.
    cities.sort_by(|a, b| {
        b.over_index
            .partial_cmp(&a.over_index)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.city.cmp(&b.city))
    });

    let over_index = cities
        .first()
        .map_or(OVER_INDEX_MIN, |top| top.over_index)
        .clamp(OVER_INDEX_MIN, OVER_INDEX_MAX);

    PairOverIndex { over_index, cities }
}

/// Log-population adjustment: 1.0 at the reference population, falling
/// for smaller cities and rising gently for larger ones. Empirically
/// tuned alongside the `[1, 15]` cap.
fn log_population_factor(population: f64) -> f64 {
    (population.max(10.0).log10()) / REFERENCE_POPULATION.log10()
}

#[cfg(test)]
mod tests {
    use audience_atlas_audience_models::MembershipRow;
    use audience_atlas_geo_models::{GeoRecord, LocationInfo};

    use super::*;

    fn record(code: &str, city: &str, population: u64) -> GeoRecord {
        GeoRecord {
            code: code.to_string(),
            population,
            location: LocationInfo {
                city: city.to_string(),
                state: "TX".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn row(segment: &str, code: &str, weight: f64) -> MembershipRow {
        MembershipRow {
            segment: segment.to_string(),
            geo_code: code.to_string(),
            weight,
            seed: None,
            date: None,
        }
    }

    fn geo() -> GeoRecordStore {
        GeoRecordStore::from_records(vec![
            record("75001", "Dallas", 900_000),
            record("75002", "Dallas", 400_000),
            record("78701", "Austin", 800_000),
            record("79901", "El Paso", 600_000),
        ])
    }

    fn audience() -> AudienceMembershipIndex {
        AudienceMembershipIndex::from_rows(vec![
            row("Coffee", "75001", 100.0),
            row("Coffee", "75002", 80.0),
            row("Coffee", "78701", 60.0),
            row("Coffee", "79901", 10.0),
            row("Tea", "75001", 90.0),
            row("Tea", "75002", 70.0),
            row("Tea", "78701", 50.0),
            row("Tea", "79901", 8.0),
        ])
    }

    #[test]
    fn over_index_is_within_bounds() {
        let geo = geo();
        let audience = audience();
        let result = pair_over_index(&geo, &audience, "Coffee", "Tea");
        assert!(result.over_index >= OVER_INDEX_MIN);
        assert!(result.over_index <= OVER_INDEX_MAX);
        assert!(!result.cities.is_empty());
    }

    #[test]
    fn dominant_city_ranks_first() {
        let geo = geo();
        let audience = audience();
        let result = pair_over_index(&geo, &audience, "Coffee", "Tea");
        assert_eq!(result.cities[0].city, "Dallas");
        for pair in result.cities.windows(2) {
            assert!(pair[0].over_index >= pair[1].over_index);
        }
    }

    #[test]
    fn no_common_codes_floors_the_index() {
        let geo = geo();
        let audience = AudienceMembershipIndex::from_rows(vec![
            row("Coffee", "75001", 100.0),
            row("Tea", "79901", 100.0),
        ]);
        let result = pair_over_index(&geo, &audience, "Coffee", "Tea");
        assert!((result.over_index - OVER_INDEX_MIN).abs() < f64::EPSILON);
        assert!(result.cities.is_empty());
    }

    #[test]
    fn symmetric_in_segment_order() {
        let geo = geo();
        let audience = audience();
        let ab = pair_over_index(&geo, &audience, "Coffee", "Tea");
        let ba = pair_over_index(&geo, &audience, "Tea", "Coffee");
        assert!((ab.over_index - ba.over_index).abs() < 1e-9);
    }
}
