//! Enrichment: attach projections, proposed content, and rationales to a
//! finalized selection.
//!
//! Rationale generation is the engine's only suspending work. Candidates
//! are independent, so their generations run concurrently and merge back
//! positionally once all settle; the generator itself degrades to the
//! deterministic template on any failure.

use std::collections::HashMap;

use castmatch_core::{Brief, Influencer};
use futures::future::join_all;

use crate::rationale::RationaleGenerator;
use crate::tiers::{tier_impressions, PricingTier};
use crate::types::{ScoredCandidate, SelectedInfluencer};

/// Flat reach fraction assumed when no tier data is available.
const FALLBACK_REACH_RATE: f64 = 0.35;

/// Projected reach for one creator: tier impressions when a pricing tier is
/// known, otherwise a flat fraction of followers.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn projected_reach(inf: &Influencer, tier: Option<PricingTier>) -> u64 {
    match tier {
        Some(tier) => tier_impressions(inf.followers, tier),
        None => (inf.followers as f64 * FALLBACK_REACH_RATE).round() as u64,
    }
}

/// Enrich each selected creator with projections and a rationale. The
/// optional `phase` label is prepended to every rationale.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub async fn enrich_selection(
    selected: &[Influencer],
    ranked: &[ScoredCandidate],
    brief: &Brief,
    generator: &RationaleGenerator,
    phase: Option<&str>,
) -> Vec<SelectedInfluencer> {
    let scores: HashMap<&str, i64> = ranked
        .iter()
        .map(|c| (c.influencer.id.as_str(), c.score))
        .collect();

    // Independent per candidate; run concurrently, merge positionally.
    let rationales = join_all(
        selected
            .iter()
            .map(|inf| generator.generate(inf, brief)),
    )
    .await;

    selected
        .iter()
        .zip(rationales)
        .map(|(inf, rationale)| {
            let tier = PricingTier::classify(inf.engagement_rate);
            let impressions = tier_impressions(inf.followers, tier);
            let estimated_reach = projected_reach(inf, Some(tier));
            let rationale = match phase {
                Some(name) => format!("[{name}] {rationale}"),
                None => rationale,
            };
            SelectedInfluencer {
                rationale,
                proposed_content: format!(
                    "2 feed posts, 1 reel, 3 stories on {}",
                    inf.platform
                ),
                estimated_reach,
                estimated_engagement: (estimated_reach as f64 * inf.engagement_rate / 100.0)
                    .round() as u64,
                cost_estimate: inf.package_cost(),
                tier,
                tier_label: tier.label().to_string(),
                strategic_cpm: tier.cpm(),
                reach_rate: tier.reach_rate(),
                tier_impressions: impressions,
                match_score: scores.get(inf.id.as_str()).copied().unwrap_or(0),
                influencer: inf.clone(),
            }
        })
        .collect()
}
