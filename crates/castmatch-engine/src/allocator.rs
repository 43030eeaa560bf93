//! Strategy-path budget allocator.
//!
//! Splits the total budget across follower tiers by strategy weight, walks
//! each tier's ranked candidates against its sub-budget, then greedily
//! fills toward target utilization from whatever ranked candidates remain.

use std::collections::HashSet;

use crate::strategy::{GoalKind, StrategyWeights};
use crate::tiers::BudgetTier;
use crate::types::{Allocation, ScoredCandidate, SelectionWarning};

/// A tier may overshoot its own sub-budget by this factor as working state;
/// the global budget ceiling is still enforced on every admission.
pub const TIER_BUDGET_BUFFER: f64 = 1.3;

/// Utilization below which the greedy fill pass runs.
pub const FILL_TRIGGER_UTILIZATION: f64 = 0.80;

/// Utilization at which the greedy fill pass stops admitting.
pub const FILL_TARGET_UTILIZATION: f64 = 0.95;

/// Selection size for an unconstrained (zero) budget, matching the
/// geographic distributor's overall cap.
pub const UNCONSTRAINED_CAP: usize = 8;

/// Allocate `total_budget` across the ranked candidates under the given
/// strategy weights. Deterministic: identical ranked input, weights, and
/// budget always produce the identical selection.
#[must_use]
pub fn allocate_by_strategy(
    ranked: &[ScoredCandidate],
    total_budget: f64,
    weights: StrategyWeights,
    goal: GoalKind,
) -> Allocation {
    let mut allocation = Allocation::default();

    if total_budget <= 0.0 {
        // Unconstrained budget: admit by rank up to the default cap.
        for cand in ranked.iter().take(UNCONSTRAINED_CAP) {
            allocation.spent += cand.influencer.package_cost();
            allocation.selected.push(cand.influencer.clone());
        }
        check_low_selection(&mut allocation);
        return allocation;
    }

    let mut selected_ids: HashSet<&str> = HashSet::new();

    // Pass 1: tier-bounded selection. Walk each budget tier's ranked
    // candidates in order, admitting while the tier stays within its
    // buffered sub-budget and the grand total stays within the ceiling.
    for tier in BudgetTier::ALL {
        let sub_budget = total_budget * weights.for_tier(tier);
        let mut tier_spent = 0.0_f64;
        let mut tier_count = 0_usize;

        for cand in ranked
            .iter()
            .filter(|c| BudgetTier::classify(c.influencer.followers) == tier)
        {
            let cost = cand.influencer.package_cost();
            if tier_spent + cost <= sub_budget * TIER_BUDGET_BUFFER
                && allocation.spent + cost <= total_budget
            {
                tier_spent += cost;
                tier_count += 1;
                allocation.spent += cost;
                selected_ids.insert(cand.influencer.id.as_str());
                allocation.selected.push(cand.influencer.clone());
            }
        }

        tracing::debug!(
            tier = tier.label(),
            sub_budget,
            tier_spent,
            tier_count,
            "tier allocation pass complete"
        );
    }

    // Pass 2: greedy fill toward target utilization. Sales goals prefer
    // small accounts first; everything else fills with the biggest reach.
    if allocation.spent < total_budget * FILL_TRIGGER_UTILIZATION {
        let mut remaining: Vec<&ScoredCandidate> = ranked
            .iter()
            .filter(|c| !selected_ids.contains(c.influencer.id.as_str()))
            .collect();
        match goal {
            GoalKind::Sales => {
                remaining.sort_by_key(|c| c.influencer.followers);
            }
            _ => {
                remaining.sort_by_key(|c| std::cmp::Reverse(c.influencer.followers));
            }
        }

        let mut budget_blocked = false;
        for cand in remaining {
            if allocation.spent >= total_budget * FILL_TARGET_UTILIZATION {
                break;
            }
            let cost = cand.influencer.package_cost();
            if allocation.spent + cost <= total_budget {
                allocation.spent += cost;
                selected_ids.insert(cand.influencer.id.as_str());
                allocation.selected.push(cand.influencer.clone());
            } else {
                budget_blocked = true;
            }
        }

        // The fill stalled below target with candidates still on the table:
        // none of them fit the remaining budget.
        if budget_blocked && allocation.spent < total_budget * FILL_TARGET_UTILIZATION {
            let warning = SelectionWarning::BudgetInfeasible {
                remaining_budget: total_budget - allocation.spent,
            };
            tracing::warn!(%warning, "greedy fill blocked by the budget ceiling");
            allocation.warnings.push(warning);
        }

        tracing::debug!(
            spent = allocation.spent,
            utilization = allocation.spent / total_budget,
            "greedy fill pass complete"
        );
    }

    check_low_selection(&mut allocation);
    allocation
}

fn check_low_selection(allocation: &mut Allocation) {
    if allocation.selected.len() < 2 {
        let warning = SelectionWarning::LowSelection {
            selected: allocation.selected.len(),
        };
        tracing::warn!(%warning, "strategy allocation produced a thin selection");
        allocation.warnings.push(warning);
    }
}
