//! Composite market-quality indices.
//!
//! All indices are computed only after min/max normalization ranges
//! across the full market set at a level are known. A zero-width range
//! normalizes to 0.5 rather than dividing by zero.

use crate::rollup::MarketRollup;
use crate::{AggregatedMarket, GeoLevel, LifeStageSegment, OpportunityTier};

/// Normalization fallback when a range has zero width.
pub const FLAT_RANGE_NORM: f64 = 0.5;

/// Opportunity tier thresholds: Gold / Silver / Bronze.
pub const TIER_THRESHOLDS: (f64, f64, f64) = (80.0, 60.0, 40.0);

/// Min/max range for one normalized dimension.
#[derive(Debug, Clone, Copy)]
pub struct Range {
    min: f64,
    max: f64,
}

impl Range {
    /// Builds the range over the values, ignoring non-finite entries.
    #[must_use]
    pub fn over(values: impl Iterator<Item = f64>) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values.filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
        }
        Self { min, max }
    }

    /// Normalizes a value into `[0, 1]`; flat or empty ranges yield the
    /// documented fallback constant.
    #[must_use]
    pub fn norm(&self, value: f64) -> f64 {
        let width = self.max - self.min;
        if !width.is_finite() || width <= 0.0 {
            return FLAT_RANGE_NORM;
        }
        ((value - self.min) / width).clamp(0.0, 1.0)
    }
}

/// Derives indices for every rollup, ranks by opportunity score, and
/// assigns 1-based ranks.
#[must_use]
pub fn finalize_markets(rollups: Vec<MarketRollup>, level: GeoLevel) -> Vec<AggregatedMarket> {
    let income = Range::over(rollups.iter().map(|m| m.economics.median_household_income));
    let home_value = Range::over(rollups.iter().map(|m| m.economics.median_home_value));
    let inv_rent_burden = Range::over(rollups.iter().map(|m| inverse_rent_burden(m)));
    let charitable = Range::over(rollups.iter().map(|m| m.lifestyle.charitable_givers));
    let veteran = Range::over(rollups.iter().map(|m| m.lifestyle.veteran));
    #[allow(clippy::cast_precision_loss)]
    let population = Range::over(rollups.iter().map(|m| m.population as f64));
    let education = Range::over(rollups.iter().map(|m| m.education.bachelors_or_higher));
    let working_age = Range::over(rollups.iter().map(|m| m.age.working_age_share()));
    let density = Range::over(rollups.iter().map(|m| m.density_estimate));

    let mut markets: Vec<AggregatedMarket> = rollups
        .into_iter()
        .map(|m| {
            let wealth_index = 100.0
                * (0.40 * income.norm(m.economics.median_household_income)
                    + 0.35 * home_value.norm(m.economics.median_home_value)
                    + 0.25 * inv_rent_burden.norm(inverse_rent_burden(&m)));

            let cohesion_score = 100.0
                * (0.50 * charitable.norm(m.lifestyle.charitable_givers)
                    + 0.50 * veteran.norm(m.lifestyle.veteran));

            #[allow(clippy::cast_precision_loss)]
            let opportunity_score = 100.0
                * (0.30 * population.norm(m.population as f64)
                    + 0.25 * income.norm(m.economics.median_household_income)
                    + 0.20 * education.norm(m.education.bachelors_or_higher)
                    + 0.15 * working_age.norm(m.age.working_age_share())
                    + 0.10 * density.norm(m.density_estimate));

            AggregatedMarket {
                name: m.name,
                level,
                record_count: m.record_count,
                population: m.population,
                life_stage: life_stage(&m.age, m.household_size, &m.lifestyle, &m.economics),
                age: m.age,
                ethnicity: m.ethnicity,
                education: m.education,
                household_size: m.household_size,
                lifestyle: m.lifestyle,
                economics: m.economics,
                density_estimate: m.density_estimate,
                wealth_index,
                cohesion_score,
                opportunity_score,
                opportunity_tier: opportunity_tier(opportunity_score),
                rank: 0,
            }
        })
        .collect();

    markets.sort_by(|a, b| {
        b.opportunity_score
            .partial_cmp(&a.opportunity_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    for (i, market) in markets.iter_mut().enumerate() {
        market.rank = i as u64 + 1;
    }
    markets
}

/// Rent burden enters the wealth index inverted: lower burden means
/// wealthier renters. The floor keeps a zero burden from blowing up.
fn inverse_rent_burden(m: &MarketRollup) -> f64 {
    1.0 / m.lifestyle.rent_burden.max(0.01)
}

/// Assigns the tier for an opportunity score.
#[must_use]
pub fn opportunity_tier(score: f64) -> OpportunityTier {
    let (gold, silver, bronze) = TIER_THRESHOLDS;
    if score >= gold {
        OpportunityTier::Gold
    } else if score >= silver {
        OpportunityTier::Silver
    } else if score >= bronze {
        OpportunityTier::Bronze
    } else {
        OpportunityTier::Standard
    }
}

/// One life-stage rule: the gate, its primary indicator, and the
/// secondary-criteria strength used for tie-breaking.
struct StageRule {
    stage: LifeStageSegment,
    matches: bool,
    primary: f64,
    secondary: f64,
}

/// Evaluates the three independent life-stage rules.
///
/// Multiple matches are broken by secondary-criteria strength, then by
/// primary-indicator magnitude; no match defaults to Established/Mixed.
#[must_use]
pub fn life_stage(
    age: &audience_atlas_geo_models::AgeCohorts,
    household_size: f64,
    lifestyle: &audience_atlas_geo_models::LifestyleShares,
    economics: &audience_atlas_geo_models::Economics,
) -> LifeStageSegment {
    let share_60_plus = age.age_60s + age.age_70_plus;
    let share_young = age.age_18_29 + age.age_30s * 0.5;

    let rules = [
        StageRule {
            stage: LifeStageSegment::RetirementEmptyNester,
            matches: share_60_plus >= 0.30 && household_size <= 2.3,
            primary: share_60_plus,
            secondary: economics.homeownership_rate,
        },
        StageRule {
            stage: LifeStageSegment::GrowerFamily,
            matches: age.under_18 >= 0.25 && household_size >= 2.8,
            primary: age.under_18,
            secondary: lifestyle.married,
        },
        StageRule {
            stage: LifeStageSegment::StarterYoungProfessional,
            matches: share_young >= 0.28 && economics.homeownership_rate < 0.55,
            primary: share_young,
            secondary: 1.0 - economics.homeownership_rate,
        },
    ];

    rules
        .into_iter()
        .filter(|rule| rule.matches)
        .max_by(|a, b| {
            a.secondary
                .partial_cmp(&b.secondary)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    a.primary
                        .partial_cmp(&b.primary)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
        })
        .map_or(LifeStageSegment::EstablishedMixed, |rule| rule.stage)
}

#[cfg(test)]
mod tests {
    use audience_atlas_geo_models::{AgeCohorts, Economics, LifestyleShares};

    use super::*;

    fn rollup(name: &str, population: u64, income: f64) -> MarketRollup {
        MarketRollup {
            name: name.to_string(),
            record_count: 1,
            population,
            age: AgeCohorts::default(),
            ethnicity: audience_atlas_geo_models::EthnicityShares::default(),
            education: audience_atlas_geo_models::EducationShares::default(),
            household_size: 2.5,
            lifestyle: LifestyleShares::default(),
            economics: Economics {
                median_household_income: income,
                ..Default::default()
            },
            density_estimate: 0.0,
        }
    }

    #[test]
    fn flat_range_normalizes_to_fallback() {
        let range = Range::over([5.0, 5.0, 5.0].into_iter());
        assert!((range.norm(5.0) - FLAT_RANGE_NORM).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_range_normalizes_to_fallback() {
        let range = Range::over(std::iter::empty());
        assert!((range.norm(1.0) - FLAT_RANGE_NORM).abs() < f64::EPSILON);
    }

    #[test]
    fn markets_are_ranked_by_opportunity() {
        let markets = finalize_markets(
            vec![
                rollup("Small", 1_000, 40_000.0),
                rollup("Big", 1_000_000, 90_000.0),
                rollup("Mid", 100_000, 60_000.0),
            ],
            GeoLevel::City,
        );
        assert_eq!(markets[0].name, "Big");
        assert_eq!(markets[0].rank, 1);
        assert_eq!(markets[2].rank, 3);
        for pair in markets.windows(2) {
            assert!(pair[0].opportunity_score >= pair[1].opportunity_score);
        }
    }

    #[test]
    fn tier_thresholds() {
        assert_eq!(opportunity_tier(85.0), OpportunityTier::Gold);
        assert_eq!(opportunity_tier(70.0), OpportunityTier::Silver);
        assert_eq!(opportunity_tier(45.0), OpportunityTier::Bronze);
        assert_eq!(opportunity_tier(10.0), OpportunityTier::Standard);
    }

    #[test]
    fn life_stage_rules() {
        let retiree = AgeCohorts {
            age_60s: 0.20,
            age_70_plus: 0.15,
            ..Default::default()
        };
        assert_eq!(
            life_stage(
                &retiree,
                2.0,
                &LifestyleShares::default(),
                &Economics {
                    homeownership_rate: 0.8,
                    ..Default::default()
                },
            ),
            LifeStageSegment::RetirementEmptyNester,
        );

        let family = AgeCohorts {
            under_18: 0.30,
            ..Default::default()
        };
        assert_eq!(
            life_stage(
                &family,
                3.2,
                &LifestyleShares::default(),
                &Economics::default(),
            ),
            LifeStageSegment::GrowerFamily,
        );

        let mixed = AgeCohorts::default();
        assert_eq!(
            life_stage(
                &mixed,
                2.5,
                &LifestyleShares::default(),
                &Economics::default(),
            ),
            LifeStageSegment::EstablishedMixed,
        );
    }

    #[test]
    fn multi_match_breaks_on_secondary_strength() {
        // Matches both retirement (60+ heavy, small households, high
        // ownership) and starter (young-heavy, low ownership) is not
        // possible with one ownership value; construct retirement vs
        // family instead.
        let both = AgeCohorts {
            age_60s: 0.20,
            age_70_plus: 0.12,
            under_18: 0.26,
            ..Default::default()
        };
        // household_size 2.3 gates retirement but not family (needs 2.8).
        let stage = life_stage(
            &both,
            2.3,
            &LifestyleShares {
                married: 0.9,
                ..Default::default()
            },
            &Economics {
                homeownership_rate: 0.7,
                ..Default::default()
            },
        );
        assert_eq!(stage, LifeStageSegment::RetirementEmptyNester);
    }
}
