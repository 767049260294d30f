//! Cosine-similarity market search and competitive heuristics.
//!
//! Each market is an 11-dimension feature vector (age, education,
//! income, six-figure rate, homeownership, poverty, unemployment, and
//! four ethnicity shares). Dimensions are min/max-normalized over the
//! level's market set before the cosine so dollar-scaled features do
//! not swamp the shares.

use crate::indices::Range;
use crate::{AggregatedMarket, SaturationLevel, SimilarMarket};

/// Number of feature dimensions.
pub const FEATURE_DIMS: usize = 11;

/// Rank window for the hidden-gem heuristic, exclusive/inclusive.
pub const HIDDEN_GEM_RANK: (u64, u64) = (10, 30);

/// Minimum opportunity score for a hidden gem.
pub const HIDDEN_GEM_MIN_SCORE: f64 = 60.0;

/// Density (units/sq-mi) and income thresholds for saturation levels.
const HIGH_SATURATION: (f64, f64) = (3_000.0, 80_000.0);
const MEDIUM_SATURATION: (f64, f64) = (1_200.0, 65_000.0);

fn features(m: &AggregatedMarket) -> [f64; FEATURE_DIMS] {
    [
        m.age.median_age,
        m.education.bachelors_or_higher,
        m.economics.median_household_income,
        m.economics.six_figure_share,
        m.economics.homeownership_rate,
        m.economics.poverty_rate,
        m.economics.unemployment_rate,
        m.ethnicity.white,
        m.ethnicity.black,
        m.ethnicity.hispanic,
        m.ethnicity.asian,
    ]
}

/// Returns the top-`k` markets most similar to `target`, excluding the
/// target itself. Fewer than two markets at the level yields an empty
/// best-effort result.
#[must_use]
pub fn similar_markets(
    markets: &[AggregatedMarket],
    target: &str,
    k: usize,
) -> Vec<SimilarMarket> {
    if markets.len() < 2 {
        return Vec::new();
    }
    let Some(target_market) = markets.iter().find(|m| m.name == target) else {
        return Vec::new();
    };

    let raw: Vec<[f64; FEATURE_DIMS]> = markets.iter().map(features).collect();
    let ranges: Vec<Range> = (0..FEATURE_DIMS)
        .map(|dim| Range::over(raw.iter().map(|v| v[dim])))
        .collect();

    let normalize = |vector: &[f64; FEATURE_DIMS]| -> Vec<f64> {
        vector
            .iter()
            .zip(&ranges)
            .map(|(value, range)| range.norm(*value))
            .collect()
    };

    let target_vec = normalize(&features(target_market));

    let mut hits: Vec<SimilarMarket> = markets
        .iter()
        .zip(&raw)
        .filter(|(m, _)| m.name != target)
        .map(|(m, vector)| SimilarMarket {
            name: m.name.clone(),
            similarity: cosine(&target_vec, &normalize(vector)),
        })
        .collect();

    hits.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    hits.truncate(k);
    hits
}

/// Cosine similarity; a zero-magnitude vector yields 0.0 rather than NaN.
#[must_use]
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let mag_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|y| y * y).sum::<f64>().sqrt();
    if mag_a <= 0.0 || mag_b <= 0.0 {
        return 0.0;
    }
    dot / (mag_a * mag_b)
}

/// Hidden gems: ranked outside the obvious top 10 but inside the top 30,
/// with a strong opportunity score.
#[must_use]
pub fn hidden_gems(markets: &[AggregatedMarket]) -> Vec<&AggregatedMarket> {
    let (lo, hi) = HIDDEN_GEM_RANK;
    markets
        .iter()
        .filter(|m| m.rank > lo && m.rank <= hi && m.opportunity_score >= HIDDEN_GEM_MIN_SCORE)
        .collect()
}

/// Saturation level from fixed density/income thresholds.
#[must_use]
pub fn saturation(market: &AggregatedMarket) -> SaturationLevel {
    let density = market.density_estimate;
    let income = market.economics.median_household_income;
    let (high_density, high_income) = HIGH_SATURATION;
    let (medium_density, medium_income) = MEDIUM_SATURATION;

    if density >= high_density && income >= high_income {
        SaturationLevel::High
    } else if density >= medium_density || income >= medium_income {
        SaturationLevel::Medium
    } else {
        SaturationLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use audience_atlas_geo_models::{
        AgeCohorts, Economics, EducationShares, EthnicityShares, LifestyleShares,
    };

    use crate::{GeoLevel, LifeStageSegment, OpportunityTier};

    use super::*;

    fn market(name: &str, income: f64, median_age: f64, rank: u64, score: f64) -> AggregatedMarket {
        AggregatedMarket {
            name: name.to_string(),
            level: GeoLevel::City,
            record_count: 1,
            population: 100_000,
            age: AgeCohorts {
                median_age,
                ..Default::default()
            },
            ethnicity: EthnicityShares {
                white: 0.6,
                black: 0.1,
                hispanic: 0.2,
                asian: 0.05,
            },
            education: EducationShares {
                bachelors_or_higher: 0.3,
                graduate: 0.1,
            },
            household_size: 2.5,
            lifestyle: LifestyleShares::default(),
            economics: Economics {
                median_household_income: income,
                ..Default::default()
            },
            density_estimate: 1_000.0,
            wealth_index: 50.0,
            cohesion_score: 50.0,
            opportunity_score: score,
            opportunity_tier: OpportunityTier::Standard,
            life_stage: LifeStageSegment::EstablishedMixed,
            rank,
        }
    }

    #[test]
    fn nearest_market_wins() {
        let markets = vec![
            market("Dallas, TX", 70_000.0, 35.0, 1, 80.0),
            market("Austin, TX", 72_000.0, 34.0, 2, 75.0),
            market("El Paso, TX", 45_000.0, 55.0, 3, 40.0),
        ];
        let hits = similar_markets(&markets, "Dallas, TX", 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].name, "Austin, TX");
        assert!(hits[0].similarity >= hits[1].similarity);
    }

    #[test]
    fn excludes_self_and_bounds_k() {
        let markets = vec![
            market("Dallas, TX", 70_000.0, 35.0, 1, 80.0),
            market("Austin, TX", 72_000.0, 34.0, 2, 75.0),
        ];
        let hits = similar_markets(&markets, "Dallas, TX", 10);
        assert_eq!(hits.len(), 1);
        assert_ne!(hits[0].name, "Dallas, TX");
    }

    #[test]
    fn single_market_is_best_effort_empty() {
        let markets = vec![market("Dallas, TX", 70_000.0, 35.0, 1, 80.0)];
        assert!(similar_markets(&markets, "Dallas, TX", 5).is_empty());
    }

    #[test]
    fn cosine_zero_vector_guard() {
        assert!((cosine(&[0.0, 0.0], &[1.0, 1.0]) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn hidden_gem_window() {
        let markets = vec![
            market("Top", 70_000.0, 35.0, 5, 90.0),
            market("Gem", 70_000.0, 35.0, 15, 65.0),
            market("Weak", 70_000.0, 35.0, 20, 30.0),
            market("Deep", 70_000.0, 35.0, 45, 80.0),
        ];
        let gems = hidden_gems(&markets);
        assert_eq!(gems.len(), 1);
        assert_eq!(gems[0].name, "Gem");
    }

    #[test]
    fn saturation_thresholds() {
        let mut m = market("Dense", 90_000.0, 35.0, 1, 80.0);
        m.density_estimate = 4_000.0;
        assert_eq!(saturation(&m), SaturationLevel::High);

        let mut m = market("Mid", 50_000.0, 35.0, 1, 80.0);
        m.density_estimate = 1_500.0;
        assert_eq!(saturation(&m), SaturationLevel::Medium);

        let mut m = market("Sparse", 40_000.0, 35.0, 1, 80.0);
        m.density_estimate = 200.0;
        assert_eq!(saturation(&m), SaturationLevel::Low);
    }
}
