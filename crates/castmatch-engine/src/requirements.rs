//! Requirements resolver: explicit client-specified counts and city splits
//! that override strategy allocation.
//!
//! Tiers are processed in declared order. A candidate that would push the
//! running total past the budget is skipped, never substituted from another
//! tier, and every shortfall is reported as an explicit warning. There is
//! deliberately no cross-tier budget borrowing.

use std::collections::HashSet;

use castmatch_core::InfluencerRequirements;

use crate::error::EngineError;
use crate::matching::matches_any;
use crate::tiers::BudgetTier;
use crate::types::{Allocation, ScoredCandidate, SelectionWarning};

/// Resolve an explicit requirements breakdown against the ranked pool.
///
/// # Errors
///
/// Returns [`EngineError::Configuration`] when a breakdown entry names an
/// unknown tier. Shortfalls are warnings on the allocation, not errors.
pub fn select_by_requirements(
    ranked: &[ScoredCandidate],
    requirements: &InfluencerRequirements,
    total_budget: f64,
) -> Result<Allocation, EngineError> {
    // Validate every tier name up front so a malformed breakdown fails
    // before any partial selection is built.
    let parsed: Vec<(BudgetTier, &castmatch_core::TierRequest)> = requirements
        .breakdown
        .iter()
        .map(|req| {
            BudgetTier::parse(&req.tier)
                .map(|tier| (tier, req))
                .ok_or_else(|| {
                    EngineError::Configuration(format!(
                        "unknown tier '{}' in requirements breakdown",
                        req.tier
                    ))
                })
        })
        .collect::<Result<_, _>>()?;

    let mut allocation = Allocation::default();
    let mut selected_ids: HashSet<&str> = HashSet::new();

    if parsed.is_empty() {
        if let Some(total_count) = requirements.total_count {
            fill_from(
                ranked.iter(),
                total_count,
                total_budget,
                &mut allocation,
                &mut selected_ids,
            );
            if allocation.selected.len() < total_count {
                allocation.warnings.push(SelectionWarning::PoolInsufficient {
                    desired: total_count,
                    available: allocation.selected.len(),
                });
            }
        }
        return Ok(allocation);
    }

    for (tier, req) in parsed {
        if req.gender_split.is_some() {
            let warning = SelectionWarning::GenderSplitIgnored {
                tier: req.tier.clone(),
            };
            tracing::warn!(%warning, "skipping unexpressible breakdown detail");
            allocation.warnings.push(warning);
        }

        if requirements.location_distribution.is_empty() {
            let before = allocation.selected.len();
            fill_from(
                ranked
                    .iter()
                    .filter(|c| BudgetTier::classify(c.influencer.followers) == tier),
                req.count,
                total_budget,
                &mut allocation,
                &mut selected_ids,
            );
            let filled = allocation.selected.len() - before;
            if filled < req.count {
                push_shortfall(&mut allocation, &req.tier, None, req.count, filled);
            }
            continue;
        }

        // Split the tier's count across cities by percentage, rounded.
        for share in &requirements.location_distribution {
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let city_count = (req.count as f64 * share.percentage / 100.0).round() as usize;
            if city_count == 0 {
                continue;
            }
            let before = allocation.selected.len();
            fill_from(
                ranked.iter().filter(|c| {
                    BudgetTier::classify(c.influencer.followers) == tier
                        && matches_any(&c.influencer.locations, &share.city)
                }),
                city_count,
                total_budget,
                &mut allocation,
                &mut selected_ids,
            );
            let filled = allocation.selected.len() - before;
            if filled < city_count {
                push_shortfall(
                    &mut allocation,
                    &req.tier,
                    Some(share.city.clone()),
                    city_count,
                    filled,
                );
            }
        }
    }

    Ok(allocation)
}

/// Admit up to `count` candidates from `candidates` (already in rank
/// order), skipping anything that would breach the budget ceiling. An
/// unmet quota with budget-driven skips is reported as
/// [`SelectionWarning::BudgetInfeasible`].
fn fill_from<'a>(
    candidates: impl Iterator<Item = &'a ScoredCandidate>,
    count: usize,
    total_budget: f64,
    allocation: &mut Allocation,
    selected_ids: &mut HashSet<&'a str>,
) {
    let mut filled = 0_usize;
    let mut budget_blocked = false;
    for cand in candidates {
        if filled == count {
            break;
        }
        if selected_ids.contains(cand.influencer.id.as_str()) {
            continue;
        }
        let cost = cand.influencer.package_cost();
        if total_budget > 0.0 && allocation.spent + cost > total_budget {
            // Over-budget candidates are skipped, not substituted.
            tracing::debug!(
                id = %cand.influencer.id,
                cost,
                remaining = total_budget - allocation.spent,
                "skipping candidate over budget ceiling"
            );
            budget_blocked = true;
            continue;
        }
        allocation.spent += cost;
        filled += 1;
        selected_ids.insert(cand.influencer.id.as_str());
        allocation.selected.push(cand.influencer.clone());
    }

    if filled < count && budget_blocked {
        let warning = SelectionWarning::BudgetInfeasible {
            remaining_budget: total_budget - allocation.spent,
        };
        tracing::warn!(%warning, "requirement quota blocked by the budget ceiling");
        allocation.warnings.push(warning);
    }
}

fn push_shortfall(
    allocation: &mut Allocation,
    tier: &str,
    city: Option<String>,
    requested: usize,
    filled: usize,
) {
    let warning = SelectionWarning::RequirementShortfall {
        tier: tier.to_string(),
        city,
        requested,
        filled,
    };
    tracing::warn!(%warning, "explicit requirement under-delivered");
    allocation.warnings.push(warning);
}
