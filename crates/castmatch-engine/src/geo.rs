//! Geographic distributor: a post-pass enforcing per-city representation.
//!
//! Three ordered passes, each preserving the guarantees of the previous
//! one; later passes only ever add, never remove:
//!
//! 1. every required city reaches `min_per_city` (default 1);
//! 2. every core city is boosted to at least 2 representatives, pool
//!    permitting;
//! 3. remaining slots are round-robin filled across cities up to
//!    `max_per_city`, capped at 8 total selected.
//!
//! Additions are drawn from the ranked reserve and still respect the
//! global budget ceiling.

use std::collections::HashSet;

use castmatch_core::GeographicDistribution;

use crate::matching::matches_any;
use crate::types::{Allocation, ScoredCandidate, SelectionWarning};

/// Overall cap on a geographically distributed selection.
pub const GEO_TOTAL_CAP: usize = 8;

/// Default minimum representatives per required city.
pub const DEFAULT_MIN_PER_CITY: usize = 1;

/// Core cities are boosted to at least this many representatives.
pub const CORE_CITY_TARGET: usize = 2;

/// Re-shape an allocation to satisfy the brief's city distribution rules.
#[must_use]
pub fn distribute_geographically(
    mut allocation: Allocation,
    reserve: &[ScoredCandidate],
    geo: &GeographicDistribution,
    total_budget: f64,
) -> Allocation {
    if geo.cities.is_empty() {
        return allocation;
    }

    let min_per_city = geo.min_per_city.unwrap_or(DEFAULT_MIN_PER_CITY);
    let pool_size = allocation.selected.len()
        + reserve
            .iter()
            .filter(|c| !contains_id(&allocation, &c.influencer.id))
            .count();
    let max_per_city = geo
        .max_per_city
        .unwrap_or_else(|| pool_size.div_ceil(geo.cities.len()));

    let mut selected_ids: HashSet<String> = allocation
        .selected
        .iter()
        .map(|i| i.id.clone())
        .collect();

    // Pass 1: minimum representation per required city.
    for city in &geo.cities {
        while city_count(&allocation, city) < min_per_city {
            if !admit_for_city(&mut allocation, &mut selected_ids, reserve, city, total_budget) {
                let warning = SelectionWarning::CityUnrepresented { city: city.clone() };
                tracing::warn!(%warning, "minimum city representation not met");
                allocation.warnings.push(warning);
                break;
            }
        }
    }

    // Pass 2: boost core cities, pool permitting.
    for city in &geo.core_cities {
        while city_count(&allocation, city) < CORE_CITY_TARGET {
            if !admit_for_city(&mut allocation, &mut selected_ids, reserve, city, total_budget) {
                break;
            }
        }
    }

    // Pass 3: round-robin fill up to the per-city max and the overall cap.
    let mut progressed = true;
    while progressed && allocation.selected.len() < GEO_TOTAL_CAP {
        progressed = false;
        for city in &geo.cities {
            if allocation.selected.len() >= GEO_TOTAL_CAP {
                break;
            }
            if city_count(&allocation, city) >= max_per_city {
                continue;
            }
            if admit_for_city(&mut allocation, &mut selected_ids, reserve, city, total_budget) {
                progressed = true;
            }
        }
    }

    allocation
}

fn contains_id(allocation: &Allocation, id: &str) -> bool {
    allocation.selected.iter().any(|i| i.id == id)
}

fn city_count(allocation: &Allocation, city: &str) -> usize {
    allocation
        .selected
        .iter()
        .filter(|i| matches_any(&i.locations, city))
        .count()
}

/// Admit the highest-ranked unselected reserve candidate matching `city`
/// that fits the remaining budget. Returns false when none qualifies.
fn admit_for_city(
    allocation: &mut Allocation,
    selected_ids: &mut HashSet<String>,
    reserve: &[ScoredCandidate],
    city: &str,
    total_budget: f64,
) -> bool {
    for cand in reserve {
        if selected_ids.contains(&cand.influencer.id) {
            continue;
        }
        if !matches_any(&cand.influencer.locations, city) {
            continue;
        }
        let cost = cand.influencer.package_cost();
        if total_budget > 0.0 && allocation.spent + cost > total_budget {
            continue;
        }
        allocation.spent += cost;
        selected_ids.insert(cand.influencer.id.clone());
        allocation.selected.push(cand.influencer.clone());
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use castmatch_core::{Capabilities, Influencer, RateCard};

    fn candidate(id: &str, city: &str, cost_third: f64) -> ScoredCandidate {
        ScoredCandidate {
            influencer: Influencer {
                id: id.to_string(),
                handle: format!("@{id}"),
                platform: "instagram".to_string(),
                followers: 100_000,
                engagement_rate: 5.0,
                locations: vec![city.to_string()],
                content_categories: vec![],
                unwilling_categories: vec![],
                rate_card: RateCard {
                    post: cost_third,
                    story: 0.0,
                    reel: cost_third,
                },
                capabilities: Capabilities::default(),
            },
            score: 50,
            reasons: vec![],
        }
    }

    fn geo(cities: &[&str], core: &[&str]) -> GeographicDistribution {
        GeographicDistribution {
            cities: cities.iter().map(|s| (*s).to_string()).collect(),
            core_cities: core.iter().map(|s| (*s).to_string()).collect(),
            min_per_city: None,
            max_per_city: None,
        }
    }

    #[test]
    fn every_required_city_gets_minimum_representation() {
        let reserve = vec![
            candidate("md1", "Madrid", 100.0),
            candidate("bc1", "Barcelona", 100.0),
        ];
        let alloc = distribute_geographically(
            Allocation::default(),
            &reserve,
            &geo(&["Madrid", "Barcelona"], &[]),
            10_000.0,
        );
        assert!(alloc
            .selected
            .iter()
            .any(|i| i.locations.contains(&"Madrid".to_string())));
        assert!(alloc
            .selected
            .iter()
            .any(|i| i.locations.contains(&"Barcelona".to_string())));
        assert!(alloc.warnings.is_empty());
    }

    #[test]
    fn unrepresentable_city_warns_instead_of_fabricating() {
        let reserve = vec![candidate("md1", "Madrid", 100.0)];
        let alloc = distribute_geographically(
            Allocation::default(),
            &reserve,
            &geo(&["Madrid", "Barcelona"], &[]),
            10_000.0,
        );
        assert!(alloc.warnings.iter().any(|w| matches!(
            w,
            SelectionWarning::CityUnrepresented { city } if city == "Barcelona"
        )));
    }

    #[test]
    fn core_cities_are_boosted_to_two() {
        let reserve = vec![
            candidate("md1", "Madrid", 100.0),
            candidate("md2", "Madrid", 100.0),
            candidate("bc1", "Barcelona", 100.0),
        ];
        let mut dist = geo(&["Madrid", "Barcelona"], &["Madrid"]);
        dist.max_per_city = Some(2);
        let alloc = distribute_geographically(Allocation::default(), &reserve, &dist, 10_000.0);
        let madrid = alloc
            .selected
            .iter()
            .filter(|i| i.locations.contains(&"Madrid".to_string()))
            .count();
        assert!(madrid >= 2);
    }

    #[test]
    fn later_passes_never_reduce_earlier_guarantees() {
        let reserve: Vec<ScoredCandidate> = (0..12)
            .map(|i| {
                let city = if i % 2 == 0 { "Madrid" } else { "Barcelona" };
                candidate(&format!("c{i}"), city, 100.0)
            })
            .collect();
        let alloc = distribute_geographically(
            Allocation::default(),
            &reserve,
            &geo(&["Madrid", "Barcelona"], &["Madrid"]),
            100_000.0,
        );
        // Pass-1 guarantee still holds after the round-robin fill.
        assert!(city_count(&alloc, "Madrid") >= 1);
        assert!(city_count(&alloc, "Barcelona") >= 1);
        assert!(alloc.selected.len() <= GEO_TOTAL_CAP);
    }

    #[test]
    fn total_cap_of_eight_is_enforced() {
        let reserve: Vec<ScoredCandidate> = (0..20)
            .map(|i| candidate(&format!("c{i}"), "Madrid", 10.0))
            .collect();
        let mut dist = geo(&["Madrid"], &[]);
        dist.max_per_city = Some(100);
        let alloc = distribute_geographically(Allocation::default(), &reserve, &dist, 0.0);
        assert_eq!(alloc.selected.len(), GEO_TOTAL_CAP);
    }

    #[test]
    fn additions_respect_the_budget_ceiling() {
        let reserve = vec![
            candidate("md1", "Madrid", 1_000.0), // cost 3,000
            candidate("bc1", "Barcelona", 2_000.0), // cost 6,000, over after md1
        ];
        let alloc = distribute_geographically(
            Allocation::default(),
            &reserve,
            &geo(&["Madrid", "Barcelona"], &[]),
            5_000.0,
        );
        assert!(alloc.spent <= 5_000.0);
        assert!(alloc.warnings.iter().any(|w| matches!(
            w,
            SelectionWarning::CityUnrepresented { city } if city == "Barcelona"
        )));
    }

    #[test]
    fn existing_selection_is_never_removed() {
        let pre = candidate("pre", "Valencia", 100.0);
        let allocation = Allocation {
            selected: vec![pre.influencer.clone()],
            spent: pre.influencer.package_cost(),
            warnings: vec![],
        };
        let reserve = vec![candidate("md1", "Madrid", 100.0)];
        let alloc =
            distribute_geographically(allocation, &reserve, &geo(&["Madrid"], &[]), 10_000.0);
        assert!(alloc.selected.iter().any(|i| i.id == "pre"));
        assert!(alloc.selected.iter().any(|i| i.id == "md1"));
    }
}
