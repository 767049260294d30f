//! Population-weighted rollup of geography records to a market level.

use std::collections::BTreeMap;

use audience_atlas_geo::GeoRecordStore;
use audience_atlas_geo_models::region::region_for_state;
use audience_atlas_geo_models::{
    AgeCohorts, Economics, EducationShares, EthnicityShares, GeoRecord, LifestyleShares,
};

use crate::GeoLevel;

/// Rolled-up attribute means for one market, before index derivation.
#[derive(Debug, Clone)]
pub struct MarketRollup {
    /// Market name.
    pub name: String,
    /// Number of records rolled up.
    pub record_count: u64,
    /// Total population.
    pub population: u64,
    /// Weighted age cohorts.
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
    /// Weighted density estimate.
    pub density_estimate: f64,
}

/// Groups every populated record by the level's market key and computes
/// population-weighted means per attribute.
///
/// Records that lack the grouping attribute (e.g. no metro assignment at
/// the metro level) are skipped.
#[must_use]
pub fn rollup_level(geo: &GeoRecordStore, level: GeoLevel) -> Vec<MarketRollup> {
    let mut groups: BTreeMap<String, Accum> = BTreeMap::new();

    for record in geo.records() {
        if record.population == 0 {
            continue;
        }
        let Some(key) = market_key(record, level) else {
            continue;
        };
        groups.entry(key).or_default().add(record);
    }

    log::debug!("rolled up {} markets at level {level}", groups.len());

    groups
        .into_iter()
        .filter_map(|(name, accum)| accum.finish(name))
        .collect()
}

/// The market name a record belongs to at a level, or `None` when the
/// record lacks that attribute.
fn market_key(record: &GeoRecord, level: GeoLevel) -> Option<String> {
    let loc = &record.location;
    match level {
        GeoLevel::Region => {
            let region = region_for_state(&loc.state);
            (region != "Unknown").then(|| region.to_string())
        }
        GeoLevel::State => (!loc.state.is_empty()).then(|| loc.state.clone()),
        GeoLevel::Metro => (!loc.metro.is_empty()).then(|| loc.metro.clone()),
        GeoLevel::County => (!loc.county.is_empty() && !loc.state.is_empty())
            .then(|| format!("{}, {}", loc.county, loc.state)),
        GeoLevel::City => (!loc.city.is_empty() && !loc.state.is_empty())
            .then(|| format!("{}, {}", loc.city, loc.state)),
    }
}

/// Weighted accumulator; weight is record population.
#[derive(Debug, Default)]
struct Accum {
    record_count: u64,
    population: u64,
    weight: f64,
    age: AgeCohorts,
    ethnicity: EthnicityShares,
    education: EducationShares,
    household_size: f64,
    lifestyle: LifestyleShares,
    economics: Economics,
    density_estimate: f64,
}

impl Accum {
    #[allow(clippy::cast_precision_loss)]
    fn add(&mut self, r: &GeoRecord) {
        let w = r.population as f64;
        self.record_count += 1;
        self.population += r.population;
        self.weight += w;

        self.age.median_age += r.age.median_age * w;
        self.age.under_18 += r.age.under_18 * w;
        self.age.age_18_29 += r.age.age_18_29 * w;
        self.age.age_30s += r.age.age_30s * w;
        self.age.age_40s += r.age.age_40s * w;
        self.age.age_50s += r.age.age_50s * w;
        self.age.age_60s += r.age.age_60s * w;
        self.age.age_70_plus += r.age.age_70_plus * w;

        self.ethnicity.white += r.ethnicity.white * w;
        self.ethnicity.black += r.ethnicity.black * w;
        self.ethnicity.hispanic += r.ethnicity.hispanic * w;
        self.ethnicity.asian += r.ethnicity.asian * w;

        self.education.bachelors_or_higher += r.education.bachelors_or_higher * w;
        self.education.graduate += r.education.graduate * w;

        self.household_size += r.household_size * w;

        self.lifestyle.self_employed += r.lifestyle.self_employed * w;
        self.lifestyle.married += r.lifestyle.married * w;
        self.lifestyle.dual_income += r.lifestyle.dual_income * w;
        self.lifestyle.mean_commute_minutes += r.lifestyle.mean_commute_minutes * w;
        self.lifestyle.charitable_givers += r.lifestyle.charitable_givers * w;
        self.lifestyle.stem_degree += r.lifestyle.stem_degree * w;
        self.lifestyle.veteran += r.lifestyle.veteran * w;
        self.lifestyle.rent_burden += r.lifestyle.rent_burden * w;

        self.economics.median_household_income += r.economics.median_household_income * w;
        self.economics.six_figure_share += r.economics.six_figure_share * w;
        self.economics.poverty_rate += r.economics.poverty_rate * w;
        self.economics.unemployment_rate += r.economics.unemployment_rate * w;
        self.economics.homeownership_rate += r.economics.homeownership_rate * w;
        self.economics.median_home_value += r.economics.median_home_value * w;

        self.density_estimate += r.location.density_estimate * w;
    }

    fn finish(mut self, name: String) -> Option<MarketRollup> {
        if self.weight <= 0.0 {
            return None;
        }
        let inv = 1.0 / self.weight;

        self.age.median_age *= inv;
        self.age.under_18 *= inv;
        self.age.age_18_29 *= inv;
        self.age.age_30s *= inv;
        self.age.age_40s *= inv;
        self.age.age_50s *= inv;
        self.age.age_60s *= inv;
        self.age.age_70_plus *= inv;

        self.ethnicity.white *= inv;
        self.ethnicity.black *= inv;
        self.ethnicity.hispanic *= inv;
        self.ethnicity.asian *= inv;

        self.education.bachelors_or_higher *= inv;
        self.education.graduate *= inv;

        self.household_size *= inv;

        self.lifestyle.self_employed *= inv;
        self.lifestyle.married *= inv;
        self.lifestyle.dual_income *= inv;
        self.lifestyle.mean_commute_minutes *= inv;
        self.lifestyle.charitable_givers *= inv;
        self.lifestyle.stem_degree *= inv;
        self.lifestyle.veteran *= inv;
        self.lifestyle.rent_burden *= inv;

        self.economics.median_household_income *= inv;
        self.economics.six_figure_share *= inv;
        self.economics.poverty_rate *= inv;
        self.economics.unemployment_rate *= inv;
        self.economics.homeownership_rate *= inv;
        self.economics.median_home_value *= inv;

        self.density_estimate *= inv;

        Some(MarketRollup {
            name,
            record_count: self.record_count,
            population: self.population,
            age: self.age,
            ethnicity: self.ethnicity,
            education: self.education,
            household_size: self.household_size,
            lifestyle: self.lifestyle,
            economics: self.economics,
            density_estimate: self.density_estimate,
        })
    }
}
