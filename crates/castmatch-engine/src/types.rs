//! Engine result types: scored candidates, enriched selections, campaign
//! metrics, and the non-fatal warnings carried alongside partial results.

use castmatch_core::Influencer;
use serde::{Deserialize, Serialize};

use crate::filter::FilterPolicy;
use crate::strategy::GoalKind;
use crate::tiers::PricingTier;

/// One candidate with its multi-factor match score. Ephemeral: recomputed
/// on every run, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredCandidate {
    pub influencer: Influencer,
    /// Additive, uncapped-sum score. Intentionally not normalized:
    /// compounding strengths matter.
    pub score: i64,
    pub reasons: Vec<String>,
}

/// A finalized pick with its performance projections attached.
#[derive(Debug, Clone, Serialize)]
pub struct SelectedInfluencer {
    pub influencer: Influencer,
    pub rationale: String,
    pub proposed_content: String,
    pub estimated_reach: u64,
    pub estimated_engagement: u64,
    /// Cost of the standard 2-post / 1-reel / 3-story package.
    pub cost_estimate: f64,
    pub tier: PricingTier,
    pub tier_label: String,
    pub strategic_cpm: f64,
    pub reach_rate: f64,
    pub tier_impressions: u64,
    pub match_score: i64,
}

/// Non-fatal conditions surfaced on the outcome rather than as errors.
/// The engine returns best-effort partial selections; it never fabricates
/// candidates and never substitutes tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionWarning {
    /// Fewer eligible candidates than desired.
    PoolInsufficient { desired: usize, available: usize },
    /// No remaining candidate fits the remaining budget.
    BudgetInfeasible { remaining_budget: f64 },
    /// An explicit `{tier, count}` ask could not be filled.
    RequirementShortfall {
        tier: String,
        city: Option<String>,
        requested: usize,
        filled: usize,
    },
    /// Strategy allocation produced fewer than two creators.
    LowSelection { selected: usize },
    /// A breakdown entry carried a gender split, which the pool's records
    /// cannot express.
    GenderSplitIgnored { tier: String },
    /// A required city has no eligible candidate in the pool.
    CityUnrepresented { city: String },
}

impl std::fmt::Display for SelectionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionWarning::PoolInsufficient { desired, available } => {
                write!(f, "pool insufficient: wanted {desired}, had {available}")
            }
            SelectionWarning::BudgetInfeasible { remaining_budget } => {
                write!(f, "no candidate fits the remaining budget ({remaining_budget:.2})")
            }
            SelectionWarning::RequirementShortfall {
                tier,
                city,
                requested,
                filled,
            } => match city {
                Some(city) => write!(
                    f,
                    "requirement shortfall: {filled}/{requested} for tier '{tier}' in {city}"
                ),
                None => write!(
                    f,
                    "requirement shortfall: {filled}/{requested} for tier '{tier}'"
                ),
            },
            SelectionWarning::LowSelection { selected } => {
                write!(f, "low selection: only {selected} creator(s) fit the strategy")
            }
            SelectionWarning::GenderSplitIgnored { tier } => {
                write!(f, "gender split on tier '{tier}' ignored: pool carries no gender data")
            }
            SelectionWarning::CityUnrepresented { city } => {
                write!(f, "no eligible candidate for required city '{city}'")
            }
        }
    }
}

/// Working state shared by the allocation paths: the picks so far, the
/// running spend, and any warnings accumulated along the way.
#[derive(Debug, Clone, Default)]
pub struct Allocation {
    pub selected: Vec<Influencer>,
    pub spent: f64,
    pub warnings: Vec<SelectionWarning>,
}

/// Per-pricing-tier slice of the campaign metrics.
#[derive(Debug, Clone, Serialize)]
pub struct TierMetrics {
    pub tier: PricingTier,
    pub count: usize,
    pub total_spend: f64,
    pub total_impressions: u64,
    /// Effective CPM of this slice; `None` when it projects no impressions.
    pub cpm: Option<f64>,
}

/// Derived-only aggregate over a finalized selection. Never mutated;
/// recomputed on demand.
#[derive(Debug, Clone, Serialize)]
pub struct TieredCampaignMetrics {
    pub total_spend: f64,
    pub total_impressions: u64,
    /// Blended CPM across the whole selection; `None` with no impressions.
    pub blended_cpm: Option<f64>,
    /// Mean engagement rate (percent) across selected creators.
    pub average_engagement: f64,
    /// Spend ÷ budget; `0.0` for an unconstrained (zero) budget.
    pub utilization: f64,
    pub tiers: Vec<TierMetrics>,
}

/// Full result of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionOutcome {
    pub selected: Vec<SelectedInfluencer>,
    pub metrics: TieredCampaignMetrics,
    pub warnings: Vec<SelectionWarning>,
    /// Filter policy that actually produced the candidate set.
    pub policy: FilterPolicy,
    pub goal: GoalKind,
}

/// Totals for one budget scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub budget: f64,
    pub selected_count: usize,
    pub total_cost: f64,
    pub total_reach: u64,
    pub average_engagement: f64,
    pub blended_cpm: Option<f64>,
    pub outcome: SelectionOutcome,
}

/// Side-by-side comparison of all declared budget scenarios, with the one
/// the detected goal type favors.
#[derive(Debug, Clone, Serialize)]
pub struct MultiScenarioComparison {
    pub scenarios: Vec<ScenarioOutcome>,
    pub recommended: String,
    /// Human-readable basis for the recommendation.
    pub basis: String,
}
