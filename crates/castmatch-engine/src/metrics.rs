//! Tiered campaign metrics, derived on demand from a finalized selection.

use crate::tiers::PricingTier;
use crate::types::{SelectedInfluencer, TierMetrics, TieredCampaignMetrics};

/// Aggregate spend, impressions, and CPM over a finalized selection.
///
/// Pure and derived-only: calling it twice on the same selection yields the
/// same metrics. An unconstrained (zero) budget reports zero utilization.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn calculate_tiered_metrics(
    selected: &[SelectedInfluencer],
    budget: f64,
) -> TieredCampaignMetrics {
    let mut tiers = Vec::with_capacity(PricingTier::ALL.len());

    for tier in PricingTier::ALL {
        let slice: Vec<&SelectedInfluencer> =
            selected.iter().filter(|s| s.tier == tier).collect();
        let total_spend: f64 = slice.iter().map(|s| s.cost_estimate).sum();
        let total_impressions: u64 = slice.iter().map(|s| s.tier_impressions).sum();
        tiers.push(TierMetrics {
            tier,
            count: slice.len(),
            total_spend,
            total_impressions,
            cpm: cpm_of(total_spend, total_impressions),
        });
    }

    let total_spend: f64 = selected.iter().map(|s| s.cost_estimate).sum();
    let total_impressions: u64 = selected.iter().map(|s| s.tier_impressions).sum();
    let average_engagement = if selected.is_empty() {
        0.0
    } else {
        selected
            .iter()
            .map(|s| s.influencer.engagement_rate)
            .sum::<f64>()
            / selected.len() as f64
    };
    let utilization = if budget > 0.0 { total_spend / budget } else { 0.0 };

    TieredCampaignMetrics {
        total_spend,
        total_impressions,
        blended_cpm: cpm_of(total_spend, total_impressions),
        average_engagement,
        utilization,
        tiers,
    }
}

#[allow(clippy::cast_precision_loss)]
fn cpm_of(spend: f64, impressions: u64) -> Option<f64> {
    if impressions == 0 {
        None
    } else {
        Some(spend / impressions as f64 * 1000.0)
    }
}
