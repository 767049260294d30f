//! National-average fallback profile.
//!
//! Whenever an aggregation resolves to zero total weight, every metric
//! falls back to these documented constants instead of producing NaN.
//! Values are ACS 5-year national estimates, refreshed manually when the
//! upstream census vintage changes.

use audience_atlas_geo_models::{AgeCohorts, EthnicityShares, LifestyleShares};

/// National median household income, dollars.
pub const MEDIAN_HOUSEHOLD_INCOME: f64 = 74_580.0;

/// National median age, years.
pub const MEDIAN_AGE: f64 = 38.9;

/// National average household size.
pub const HOUSEHOLD_SIZE: f64 = 2.51;

/// National homeownership rate.
pub const HOMEOWNERSHIP_RATE: f64 = 0.658;

/// National median home value, dollars.
pub const MEDIAN_HOME_VALUE: f64 = 281_900.0;

/// National share of households earning $100k+.
pub const SIX_FIGURE_SHARE: f64 = 0.372;

/// National poverty rate.
pub const POVERTY_RATE: f64 = 0.115;

/// National unemployment rate.
pub const UNEMPLOYMENT_RATE: f64 = 0.037;

/// National bachelor's-or-higher share.
pub const BACHELORS_SHARE: f64 = 0.35;

/// National lifestyle shares.
pub const LIFESTYLE: LifestyleShares = LifestyleShares {
    self_employed: 0.101,
    married: 0.47,
    dual_income: 0.49,
    mean_commute_minutes: 26.8,
    charitable_givers: 0.30,
    stem_degree: 0.27,
    veteran: 0.063,
    rent_burden: 0.46,
};

/// National ethnicity shares.
pub const ETHNICITY: EthnicityShares = EthnicityShares {
    white: 0.585,
    black: 0.121,
    hispanic: 0.19,
    asian: 0.059,
};

/// National age cohort shares.
pub const AGE_COHORTS: AgeCohorts = AgeCohorts {
    median_age: MEDIAN_AGE,
    under_18: 0.216,
    age_18_29: 0.160,
    age_30s: 0.134,
    age_40s: 0.122,
    age_50s: 0.125,
    age_60s: 0.115,
    age_70_plus: 0.128,
};
