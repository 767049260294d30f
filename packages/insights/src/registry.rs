//! Insight rule registry: loads all rule configs from embedded TOML.
//!
//! Each `.toml` file in `packages/insights/rules/` is baked into the
//! binary at compile time via [`include_str!`]. Rule order is match
//! priority: more specific rules come first.

use crate::rules::{InsightRule, parse_rule_toml};

/// TOML configs embedded at compile time, in match-priority order.
const RULE_TOMLS: &[(&str, &str)] = &[
    ("luxury_goods", include_str!("../rules/luxury_goods.toml")),
    ("family_products", include_str!("../rules/family_products.toml")),
    ("health_wellness", include_str!("../rules/health_wellness.toml")),
    ("food_beverage", include_str!("../rules/food_beverage.toml")),
    ("home_improvement", include_str!("../rules/home_improvement.toml")),
    ("tech_media", include_str!("../rules/tech_media.toml")),
];

/// Total number of configured rules (used in tests).
#[cfg(test)]
const EXPECTED_RULE_COUNT: usize = 6;

/// Returns all configured insight rules, parsed from embedded TOML.
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time
/// guarantee since the configs are embedded).
#[must_use]
pub fn all_rules() -> Vec<InsightRule> {
    RULE_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_rule_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}
