//! Influencer selection & budget allocation engine.
//!
//! Given a structured campaign brief and a pool of candidate creators, the
//! engine filters on hard constraints (strict first, relaxed on a thin
//! result), ranks by a weighted multi-factor score, allocates a monetary
//! budget across follower tiers (or resolves an explicit count/location
//! breakdown), enforces per-city representation, and emits auditable
//! performance projections from a tiered, non-linear pricing model.
//!
//! The engine is pure computation over immutable snapshots; the only
//! suspending operation is optional per-candidate rationale generation,
//! which always degrades to a deterministic template on failure or timeout.

pub mod allocator;
pub mod enrich;
pub mod error;
pub mod filter;
pub mod geo;
pub mod metrics;
pub mod phases;
pub mod pipeline;
pub mod rationale;
pub mod requirements;
pub mod scenarios;
pub mod scorer;
pub mod strategy;
pub mod tiers;
pub mod types;

mod matching;

pub use error::EngineError;
pub use filter::FilterPolicy;
pub use pipeline::SelectionEngine;
pub use rationale::{LlmRationaleClient, RationaleConfig, RationaleGenerator};
pub use strategy::{GoalKind, StrategyWeights};
pub use tiers::{BudgetTier, PricingTier};
pub use types::{
    MultiScenarioComparison, ScenarioOutcome, ScoredCandidate, SelectedInfluencer,
    SelectionOutcome, SelectionWarning, TierMetrics, TieredCampaignMetrics,
};
