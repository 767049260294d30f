//! Diversified representative-market selection.
//!
//! When a report lists several overlapping segments, assigning every
//! segment its top city would surface the same dominant metro again and
//! again. Round-robin assignment excludes already-used cities from each
//! subsequent segment's pool, unless the pool would be exhausted, in
//! which case the best remaining candidate is accepted even if reused.

use std::collections::HashSet;

/// Assigns one representative city per segment from each segment's
/// ranked candidate list, in the given segment order.
///
/// With at least as many distinct candidates as segments, the
/// assignment contains no duplicate cities.
#[must_use]
pub fn assign_representative_markets(
    candidates: &[(String, Vec<String>)],
) -> Vec<(String, Option<String>)> {
    let mut used: HashSet<String> = HashSet::new();

    candidates
        .iter()
        .map(|(segment, pool)| {
            let pick = pool
                .iter()
                .find(|city| !used.contains(*city))
                // Pool exhausted by earlier segments: fall back to the
                // best candidate even though it repeats.
                .or_else(|| pool.first());

            if let Some(city) = pick {
                used.insert(city.clone());
            }
            (segment.clone(), pick.cloned())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(segment: &str, cities: &[&str]) -> (String, Vec<String>) {
        (
            segment.to_string(),
            cities.iter().map(ToString::to_string).collect(),
        )
    }

    #[test]
    fn enough_candidates_means_no_duplicates() {
        let assigned = assign_representative_markets(&[
            pool("Coffee", &["Dallas", "Austin", "Houston"]),
            pool("Tea", &["Dallas", "Austin", "Houston"]),
            pool("Snacks", &["Dallas", "Austin", "Houston"]),
        ]);

        let cities: Vec<&str> = assigned
            .iter()
            .filter_map(|(_, city)| city.as_deref())
            .collect();
        assert_eq!(cities.len(), 3);
        let distinct: HashSet<&str> = cities.iter().copied().collect();
        assert_eq!(distinct.len(), 3);
    }

    #[test]
    fn spreads_instead_of_repeating_the_dominant_metro() {
        let assigned = assign_representative_markets(&[
            pool("Coffee", &["Dallas", "Austin"]),
            pool("Tea", &["Dallas", "Austin"]),
        ]);
        assert_eq!(assigned[0].1.as_deref(), Some("Dallas"));
        assert_eq!(assigned[1].1.as_deref(), Some("Austin"));
    }

    #[test]
    fn exhausted_pool_reuses_best_candidate() {
        let assigned = assign_representative_markets(&[
            pool("Coffee", &["Dallas"]),
            pool("Tea", &["Dallas"]),
        ]);
        assert_eq!(assigned[0].1.as_deref(), Some("Dallas"));
        assert_eq!(assigned[1].1.as_deref(), Some("Dallas"));
    }

    #[test]
    fn empty_pool_yields_none() {
        let assigned =
            assign_representative_markets(&[pool("Coffee", &[]), pool("Tea", &["Austin"])]);
        assert_eq!(assigned[0].1, None);
        assert_eq!(assigned[1].1.as_deref(), Some("Austin"));
    }
}
