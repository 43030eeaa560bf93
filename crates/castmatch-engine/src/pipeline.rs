//! Pipeline orchestration: brief + pool in, enriched selection out.
//!
//! Flow: brand-augmented brief → policy-chain filter → rank →
//! requirements path, phased path, or strategy path → geographic
//! distribution → enrichment → tiered metrics.

use castmatch_core::{Brief, Influencer};
use uuid::Uuid;

use crate::allocator::allocate_by_strategy;
use crate::enrich::enrich_selection;
use crate::error::EngineError;
use crate::filter::{filter_with_fallback, DEFAULT_POLICY_CHAIN, MIN_VIABLE_POOL};
use crate::geo::distribute_geographically;
use crate::metrics::calculate_tiered_metrics;
use crate::phases::run_phases;
use crate::rationale::RationaleGenerator;
use crate::requirements::select_by_requirements;
use crate::scorer::rank_candidates;
use crate::strategy::GoalKind;
use crate::types::{Allocation, SelectionOutcome, SelectionWarning};

/// The selection engine with its injected rationale capability.
#[derive(Debug)]
pub struct SelectionEngine {
    rationale: RationaleGenerator,
}

impl SelectionEngine {
    #[must_use]
    pub fn new(rationale: RationaleGenerator) -> Self {
        Self { rationale }
    }

    /// Engine with the LLM generator when the environment configures one,
    /// template-only otherwise.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(RationaleGenerator::from_env())
    }

    /// Run the full selection pipeline for one brief over one pool.
    ///
    /// Returns a best-effort, possibly partial selection with explicit
    /// warnings. Identical `(brief, pool)` inputs produce the identical
    /// ranking and final selection.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidBudget`] for a negative budget.
    /// - [`EngineError::EmptyPool`] for an empty candidate pool.
    /// - [`EngineError::Configuration`] for malformed requirements or
    ///   phases (unknown tier names).
    pub async fn select_influencers(
        &self,
        brief: &Brief,
        pool: &[Influencer],
    ) -> Result<SelectionOutcome, EngineError> {
        if brief.budget < 0.0 {
            return Err(EngineError::InvalidBudget(brief.budget));
        }
        if pool.is_empty() {
            return Err(EngineError::EmptyPool);
        }

        let run_id = Uuid::new_v4();
        let goal = GoalKind::detect(&brief.campaign_goals);
        tracing::info!(
            %run_id,
            client = %brief.client_name,
            budget = brief.budget,
            pool = pool.len(),
            goal = ?goal,
            "starting selection run"
        );

        let (filtered, policy) =
            filter_with_fallback(pool, brief, &DEFAULT_POLICY_CHAIN, MIN_VIABLE_POOL);
        let ranked = rank_candidates(&filtered, brief);

        if ranked.is_empty() {
            tracing::warn!(%run_id, "no candidate survived filtering");
            return Ok(SelectionOutcome {
                selected: Vec::new(),
                metrics: calculate_tiered_metrics(&[], brief.budget),
                warnings: vec![SelectionWarning::PoolInsufficient {
                    desired: 1,
                    available: 0,
                }],
                policy,
                goal,
            });
        }

        // Explicit requirements override the strategy path; phases carve
        // the budget sequentially; otherwise one strategy allocation.
        let groups: Vec<(Option<String>, Allocation)> = if brief.influencer_requirements.is_some()
            || brief.phases.is_empty()
        {
            let mut allocation = if let Some(requirements) = &brief.influencer_requirements {
                select_by_requirements(&ranked, requirements, brief.budget)?
            } else {
                allocate_by_strategy(&ranked, brief.budget, goal.weights(), goal)
            };
            // Geographic rules run as a post-pass on single-allocation
            // paths; phased runs keep their own per-phase structure.
            if let Some(geo) = &brief.geographic_distribution {
                allocation = distribute_geographically(allocation, &ranked, geo, brief.budget);
            }
            vec![(None, allocation)]
        } else {
            run_phases(&ranked, &brief.phases, goal.weights(), goal, brief.budget)?
                .into_iter()
                .map(|p| (Some(p.phase_name), p.allocation))
                .collect()
        };

        let mut selected = Vec::new();
        let mut warnings = Vec::new();
        for (phase, allocation) in groups {
            warnings.extend(allocation.warnings.iter().cloned());
            let enriched = enrich_selection(
                &allocation.selected,
                &ranked,
                brief,
                &self.rationale,
                phase.as_deref(),
            )
            .await;
            selected.extend(enriched);
        }

        let metrics = calculate_tiered_metrics(&selected, brief.budget);
        debug_assert!(
            brief.budget <= 0.0 || metrics.total_spend <= brief.budget + 1e-6,
            "selection spend breached the budget ceiling"
        );

        tracing::info!(
            %run_id,
            selected = selected.len(),
            spend = metrics.total_spend,
            utilization = metrics.utilization,
            warnings = warnings.len(),
            "selection run complete"
        );

        Ok(SelectionOutcome {
            selected,
            metrics,
            warnings,
            policy,
            goal,
        })
    }
}
