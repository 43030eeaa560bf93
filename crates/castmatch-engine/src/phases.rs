//! Multi-phase orchestrator.
//!
//! Phases run strictly in declaration order: each phase filters the ranked
//! pool by its creator tier and content focus, excluding every id consumed
//! by earlier phases, allocates its own sub-budget, and truncates to its
//! creator quota. The sequencing is a correctness requirement: each
//! phase's candidate pool depends on the exclusion set written by the
//! previous one.
//!
//! Declared phase budgets may sum past the campaign total, so each phase's
//! effective budget is capped at whatever the earlier phases left of it.

use std::collections::HashSet;

use castmatch_core::Phase;

use crate::allocator::allocate_by_strategy;
use crate::error::EngineError;
use crate::matching::matches_any;
use crate::strategy::{GoalKind, StrategyWeights};
use crate::tiers::BudgetTier;
use crate::types::{Allocation, ScoredCandidate, SelectionWarning};

/// One phase's resolved selection.
#[derive(Debug, Clone)]
pub struct PhaseAllocation {
    pub phase_name: String,
    pub allocation: Allocation,
}

/// Run every phase in order over the ranked pool. Cross-phase spend never
/// exceeds `total_budget` (zero means unconstrained).
///
/// # Errors
///
/// Returns [`EngineError::Configuration`] when a phase names an unknown
/// creator tier.
pub fn run_phases(
    ranked: &[ScoredCandidate],
    phases: &[Phase],
    weights: StrategyWeights,
    goal: GoalKind,
    total_budget: f64,
) -> Result<Vec<PhaseAllocation>, EngineError> {
    let mut consumed: HashSet<String> = HashSet::new();
    let mut remaining = total_budget;
    let mut results = Vec::with_capacity(phases.len());

    for phase in phases {
        let tier = BudgetTier::parse(&phase.creator_tier).ok_or_else(|| {
            EngineError::Configuration(format!(
                "unknown creator tier '{}' in phase '{}'",
                phase.creator_tier, phase.name
            ))
        })?;

        // Cap the phase at what earlier phases left of the campaign total;
        // an unconstrained (zero) total leaves phase budgets as declared.
        let phase_budget = if total_budget > 0.0 {
            phase.budget_amount.min(remaining)
        } else {
            phase.budget_amount
        };
        if total_budget > 0.0 && phase_budget <= 0.0 {
            let warning = SelectionWarning::BudgetInfeasible {
                remaining_budget: remaining,
            };
            tracing::warn!(phase = %phase.name, %warning, "no budget left for phase");
            results.push(PhaseAllocation {
                phase_name: phase.name.clone(),
                allocation: Allocation {
                    warnings: vec![warning],
                    ..Allocation::default()
                },
            });
            continue;
        }

        let pool: Vec<ScoredCandidate> = ranked
            .iter()
            .filter(|c| !consumed.contains(&c.influencer.id))
            .filter(|c| BudgetTier::classify(c.influencer.followers) == tier)
            .filter(|c| match &phase.content_focus {
                Some(focus) => matches_any(&c.influencer.content_categories, focus),
                None => true,
            })
            .cloned()
            .collect();

        let mut allocation = allocate_by_strategy(&pool, phase_budget, weights, goal);

        if allocation.selected.len() > phase.creator_count {
            allocation.selected.truncate(phase.creator_count);
            allocation.spent = allocation
                .selected
                .iter()
                .map(castmatch_core::Influencer::package_cost)
                .sum();
        } else if allocation.selected.len() < phase.creator_count {
            allocation.warnings.push(SelectionWarning::PoolInsufficient {
                desired: phase.creator_count,
                available: allocation.selected.len(),
            });
        }

        for inf in &allocation.selected {
            consumed.insert(inf.id.clone());
        }
        if total_budget > 0.0 {
            remaining -= allocation.spent;
        }

        tracing::info!(
            phase = %phase.name,
            tier = tier.label(),
            selected = allocation.selected.len(),
            spent = allocation.spent,
            "phase allocation complete"
        );

        results.push(PhaseAllocation {
            phase_name: phase.name.clone(),
            allocation,
        });
    }

    Ok(results)
}
