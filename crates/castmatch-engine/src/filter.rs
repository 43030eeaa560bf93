//! Candidate filter: independent hard constraints applied under a policy.
//!
//! The orchestrator runs policies as an ordered fallback chain: strict
//! first, then relaxed when the strict survivor count is too thin. Pool
//! order is always preserved.

use castmatch_core::{Brief, Influencer};
use serde::{Deserialize, Serialize};

use crate::matching::{any_overlap, match_count, matches_any};

/// Follower floor standing in for a real verification flag. The pool's
/// records carry no such flag, so `must_have_verification` is approximated
/// by audience size. Documented heuristic, kept on purpose.
pub const VERIFIED_FOLLOWER_FLOOR: u64 = 500_000;

/// Minimum engagement rate (percent) enforced only in strict mode.
pub const STRICT_MIN_ENGAGEMENT: f64 = 0.3;

/// Survivor count below which the next policy in the chain is tried.
pub const MIN_VIABLE_POOL: usize = 10;

/// Filter strictness. Strict additionally requires a demographic-location
/// overlap and a floor on engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterPolicy {
    Strict,
    Relaxed,
}

/// Default fallback chain: strict, then relaxed.
pub const DEFAULT_POLICY_CHAIN: [FilterPolicy; 2] = [FilterPolicy::Strict, FilterPolicy::Relaxed];

/// Apply every hard rule to one candidate. Rules are independent; all must
/// pass.
#[must_use]
pub fn passes_filter(inf: &Influencer, brief: &Brief, policy: FilterPolicy) -> bool {
    let constraints = &brief.constraints;

    if !brief.platform_preferences.is_empty()
        && !brief
            .platform_preferences
            .iter()
            .any(|p| p.eq_ignore_ascii_case(&inf.platform))
    {
        return false;
    }

    if let Some(max_cpm) = constraints.max_cpm {
        // A zero-follower record has no defined CPM; reject it rather than
        // letting it bypass the cap.
        if inf.post_cpm().is_none_or(|cpm| cpm > max_cpm) {
            return false;
        }
    }

    if let Some(min) = constraints.min_followers {
        if inf.followers < min {
            return false;
        }
    }
    if let Some(max) = constraints.max_followers {
        if inf.followers > max {
            return false;
        }
    }

    if !constraints.required_categories.is_empty()
        && match_count(&inf.content_categories, &constraints.required_categories) == 0
    {
        return false;
    }

    if inf
        .content_categories
        .iter()
        .any(|cat| matches_any(&constraints.excluded_categories, cat))
    {
        return false;
    }

    if any_overlap(&constraints.category_restrictions, &inf.unwilling_categories) {
        return false;
    }

    if constraints.require_event_attendance && !inf.capabilities.event_appearances {
        return false;
    }
    if constraints.require_public_speaking && !inf.capabilities.public_speaking {
        return false;
    }

    if constraints.must_have_verification && inf.followers < VERIFIED_FOLLOWER_FLOOR {
        return false;
    }

    // Three posts must be affordable within the whole budget; a zero budget
    // is unconstrained.
    if brief.budget > 0.0 && inf.rate_card.post * 3.0 > brief.budget {
        return false;
    }

    if policy == FilterPolicy::Strict {
        let wanted = &brief.target_demographics.locations;
        if !wanted.is_empty() && !any_overlap(&inf.locations, wanted) {
            return false;
        }
        if inf.engagement_rate < STRICT_MIN_ENGAGEMENT {
            return false;
        }
    }

    true
}

/// Apply one policy to the whole pool, preserving pool order.
#[must_use]
pub fn filter_pool(pool: &[Influencer], brief: &Brief, policy: FilterPolicy) -> Vec<Influencer> {
    let survivors: Vec<Influencer> = pool
        .iter()
        .filter(|inf| passes_filter(inf, brief, policy))
        .cloned()
        .collect();
    tracing::debug!(
        policy = ?policy,
        pool = pool.len(),
        survivors = survivors.len(),
        "filtered candidate pool"
    );
    survivors
}

/// Try each policy in order, returning the first result with at least
/// `min_results` survivors; otherwise the last policy's result stands.
#[must_use]
pub fn filter_with_fallback(
    pool: &[Influencer],
    brief: &Brief,
    policies: &[FilterPolicy],
    min_results: usize,
) -> (Vec<Influencer>, FilterPolicy) {
    debug_assert!(!policies.is_empty());
    let mut last: Option<(Vec<Influencer>, FilterPolicy)> = None;

    for &policy in policies {
        let survivors = filter_pool(pool, brief, policy);
        if survivors.len() >= min_results {
            return (survivors, policy);
        }
        tracing::info!(
            policy = ?policy,
            survivors = survivors.len(),
            min_results,
            "filter result below viability threshold, falling through"
        );
        last = Some((survivors, policy));
    }

    last.unwrap_or_else(|| (Vec::new(), FilterPolicy::Relaxed))
}
