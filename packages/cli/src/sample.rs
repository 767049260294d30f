//! Deterministic synthetic dataset for the demo CLI.
//!
//! The core never parses raw external files; real deployments wire the
//! collaborator traits to actual geo and audience sources. This module
//! fabricates a small, fully deterministic universe (no RNG seeded from
//! the clock) so every CLI run produces identical output.

use audience_atlas_audience_models::MembershipRow;
use audience_atlas_geo_models::{
    AgeCohorts, Economics, EducationShares, EthnicityShares, GeoRecord, LifestyleShares,
    LocationInfo, UrbanicityClass,
};

/// Metro seeds: (city, state, metro, base income, base population).
const METROS: &[(&str, &str, &str, f64, u64)] = &[
    ("New York", "NY", "New York-Newark", 91_000.0, 160_000),
    ("Los Angeles", "CA", "Los Angeles-Long Beach", 83_000.0, 140_000),
    ("Chicago", "IL", "Chicago-Naperville", 75_000.0, 120_000),
    ("Dallas", "TX", "Dallas-Fort Worth", 72_000.0, 110_000),
    ("Houston", "TX", "Houston-The Woodlands", 68_000.0, 105_000),
    ("Atlanta", "GA", "Atlanta-Sandy Springs", 71_000.0, 95_000),
    ("Phoenix", "AZ", "Phoenix-Mesa", 69_000.0, 90_000),
    ("Boston", "MA", "Boston-Cambridge", 94_000.0, 85_000),
    ("Denver", "CO", "Denver-Aurora", 82_000.0, 80_000),
    ("Des Moines", "IA", "Des Moines-West Des Moines", 64_000.0, 45_000),
    ("Asheville", "NC", "Asheville", 58_000.0, 30_000),
    ("Missoula", "MT", "Missoula", 55_000.0, 20_000),
];

/// Codes generated per metro.
const CODES_PER_METRO: usize = 4;

/// Audience segments in the synthetic universe.
pub const SEGMENTS: &[&str] = &[
    "Premium Coffee",
    "Oral Care",
    "Baby Products",
    "Home Improvement",
    "Gaming Electronics",
    "Organic Grocery",
];

/// Builds the synthetic geography universe.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn geo_records() -> Vec<GeoRecord> {
    let mut records = Vec::new();

    for (metro_idx, (city, state, metro, base_income, base_population)) in
        METROS.iter().enumerate()
    {
        for slot in 0..CODES_PER_METRO {
            let code = 10_000 + metro_idx * 100 + slot;
            // Spread each metro's codes across an income gradient.
            let spread = (slot as f64 - 1.5) * 9_000.0;
            let income = base_income + spread;
            let urbanicity = match slot {
                0 => UrbanicityClass::Urban,
                3 => UrbanicityClass::Rural,
                _ => UrbanicityClass::Suburban,
            };

            records.push(GeoRecord {
                code: code.to_string(),
                population: base_population / (slot as u64 + 1),
                age: AgeCohorts {
                    median_age: 32.0 + metro_idx as f64 * 1.5 + slot as f64,
                    under_18: 0.21 + slot as f64 * 0.01,
                    age_18_29: 0.17 - slot as f64 * 0.01,
                    age_30s: 0.14,
                    age_40s: 0.12,
                    age_50s: 0.12,
                    age_60s: 0.12,
                    age_70_plus: 0.12,
                },
                ethnicity: EthnicityShares {
                    white: 0.55,
                    black: 0.13,
                    hispanic: 0.2,
                    asian: 0.07,
                },
                education: EducationShares {
                    bachelors_or_higher: (income / 250_000.0).min(0.6),
                    graduate: (income / 600_000.0).min(0.3),
                },
                household_size: 2.2 + slot as f64 * 0.25,
                lifestyle: LifestyleShares {
                    self_employed: 0.10,
                    married: 0.44 + slot as f64 * 0.03,
                    dual_income: 0.48,
                    mean_commute_minutes: 22.0 + slot as f64 * 4.0,
                    charitable_givers: 0.28 + (metro_idx as f64 * 0.01),
                    stem_degree: 0.25,
                    veteran: 0.06,
                    rent_burden: 0.50 - slot as f64 * 0.04,
                },
                economics: Economics {
                    median_household_income: income,
                    six_figure_share: (income / 220_000.0).min(0.55),
                    poverty_rate: (0.18 - income / 800_000.0).max(0.04),
                    unemployment_rate: 0.038,
                    homeownership_rate: 0.45 + slot as f64 * 0.1,
                    median_home_value: income * 3.8,
                },
                location: LocationInfo {
                    state: (*state).to_string(),
                    county: format!("{city} County"),
                    city: (*city).to_string(),
                    metro: (*metro).to_string(),
                    urbanicity,
                    density_estimate: match urbanicity {
                        UrbanicityClass::Urban => 4_200.0,
                        UrbanicityClass::Suburban => 1_400.0,
                        UrbanicityClass::Rural => 180.0,
                    },
                },
            });
        }
    }

    records
}

/// Builds synthetic membership rows: each segment favors a different
/// band of metros so overlaps and diversified markets are non-trivial.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn membership_rows() -> Vec<MembershipRow> {
    let mut rows = Vec::new();

    for (segment_idx, segment) in SEGMENTS.iter().enumerate() {
        for (metro_idx, _) in METROS.iter().enumerate() {
            // Deterministic affinity: each segment peaks two metros
            // after the previous one.
            let offset = (metro_idx + segment_idx * 2) % METROS.len();
            let affinity = (METROS.len() - offset) as f64 / METROS.len() as f64;

            for slot in 0..CODES_PER_METRO {
                let code = 10_000 + metro_idx * 100 + slot;
                let weight = affinity * 100.0 / (slot as f64 + 1.0);
                rows.push(MembershipRow {
                    segment: (*segment).to_string(),
                    geo_code: code.to_string(),
                    weight,
                    seed: Some("demo".to_string()),
                    date: None,
                });
            }
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_is_deterministic() {
        assert_eq!(geo_records(), geo_records());
        assert_eq!(membership_rows(), membership_rows());
    }

    #[test]
    fn every_code_is_five_digits() {
        for record in geo_records() {
            assert_eq!(record.code.len(), 5);
        }
    }

    #[test]
    fn every_segment_has_rows() {
        let rows = membership_rows();
        for segment in SEGMENTS {
            assert!(rows.iter().any(|r| r.segment == *segment));
        }
    }
}
