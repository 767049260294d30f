//! Insight rule schema and the generic first-match evaluator.

use serde::Deserialize;

/// Confidence attached to the fallback when no rule matches.
pub const DEFAULT_CONFIDENCE: f64 = 0.2;

/// Template served when no rule matches.
pub const DEFAULT_TEMPLATE: &str =
    "{segment} audiences concentrate in {market}, with household incomes {incomeDelta} the typical audience.";

/// One keyword rule, deserialized from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct InsightRule {
    /// Unique rule identifier.
    pub id: String,
    /// Lowercase keywords; any substring match against the segment name
    /// selects the rule.
    pub keywords: Vec<String>,
    /// Insight template with placeholders filled by the presentation
    /// layer (`{segment}`, `{market}`, `{affluence}`, `{incomeDelta}`).
    pub template: String,
    /// How specific this rule's template is to the matched audience.
    pub confidence: f64,
}

/// The selected template and its confidence score.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightMatch {
    /// Matched rule id, or `"default"`.
    pub rule_id: String,
    /// Insight template.
    pub template: String,
    /// Confidence in `[0, 1]`; low scores signal the caller to consider
    /// generative escalation.
    pub confidence: f64,
}

/// Parses one TOML rule config.
///
/// # Errors
///
/// Returns the TOML error if the config is malformed.
pub fn parse_rule_toml(contents: &str) -> Result<InsightRule, toml::de::Error> {
    toml::from_str(contents)
}

/// First-match evaluation over the rules in registry order.
///
/// Matching is case-insensitive substring containment of any keyword in
/// the segment name. No match falls back to the default template with
/// [`DEFAULT_CONFIDENCE`].
#[must_use]
pub fn evaluate(rules: &[InsightRule], segment: &str) -> InsightMatch {
    let needle = segment.to_lowercase();

    rules
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| needle.contains(kw.as_str())))
        .map_or_else(
            || InsightMatch {
                rule_id: "default".to_string(),
                template: DEFAULT_TEMPLATE.to_string(),
                confidence: DEFAULT_CONFIDENCE,
            },
            |rule| InsightMatch {
                rule_id: rule.id.clone(),
                template: rule.template.clone(),
                confidence: rule.confidence,
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(id: &str, keywords: &[&str], confidence: f64) -> InsightRule {
        InsightRule {
            id: id.to_string(),
            keywords: keywords.iter().map(ToString::to_string).collect(),
            template: format!("{id} template"),
            confidence,
        }
    }

    #[test]
    fn first_match_wins() {
        let rules = vec![
            rule("beverage", &["coffee", "tea"], 0.8),
            rule("generic_food", &["coffee", "snack"], 0.5),
        ];
        let matched = evaluate(&rules, "Premium Coffee");
        assert_eq!(matched.rule_id, "beverage");
        assert!((matched.confidence - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let rules = vec![rule("beverage", &["coffee"], 0.8)];
        assert_eq!(evaluate(&rules, "COFFEE LOVERS").rule_id, "beverage");
    }

    #[test]
    fn no_match_falls_back_with_low_confidence() {
        let rules = vec![rule("beverage", &["coffee"], 0.8)];
        let matched = evaluate(&rules, "Motorsports");
        assert_eq!(matched.rule_id, "default");
        assert!((matched.confidence - DEFAULT_CONFIDENCE).abs() < f64::EPSILON);
    }

    #[test]
    fn parses_rule_toml() {
        let parsed = parse_rule_toml(
            r#"
id = "beverage"
keywords = ["coffee", "tea"]
template = "{segment} skews {affluence}."
confidence = 0.75
"#,
        )
        .unwrap();
        assert_eq!(parsed.id, "beverage");
        assert_eq!(parsed.keywords.len(), 2);
    }
}
