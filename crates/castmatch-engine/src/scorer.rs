//! Weighted multi-factor scorer and ranker.
//!
//! The score is an additive, uncapped sum. It is intentionally not normalized,
//! because compounding strengths matter. The descending ranking produced
//! here is the single ordering every downstream allocator consumes; no
//! component re-sorts independently.

use castmatch_core::{Brief, Influencer};

use crate::matching::{any_overlap, match_count};
use crate::types::ScoredCandidate;

/// Score one candidate against a brief.
///
/// Components:
/// - content-category overlap, 10 points per match, floor 5, cap 30;
/// - engagement quality, `min(25, engagement/10 × 25)`;
/// - follower size, `min(20, followers/50,000 × 10)`;
/// - budget efficiency, `max(0, 15 − cpm/10)`;
/// - demographic-location match, flat 10 or 0.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn score_candidate(inf: &Influencer, brief: &Brief) -> ScoredCandidate {
    let mut reasons = Vec::new();
    let mut total = 0.0_f64;

    // Category overlap is judged against the brief's themes plus any
    // required categories the constraints (or a brand profile) added.
    let mut wanted = brief.content_themes.clone();
    wanted.extend_from_slice(&brief.constraints.required_categories);
    let matches = match_count(&inf.content_categories, &wanted);
    let category_points = (10.0 * matches as f64).clamp(5.0, 30.0);
    total += category_points;
    reasons.push(format!(
        "{matches} content-category match(es) (+{category_points:.0})"
    ));

    let engagement_points = (inf.engagement_rate / 10.0 * 25.0).min(25.0);
    total += engagement_points;
    reasons.push(format!(
        "{:.1}% engagement (+{engagement_points:.1})",
        inf.engagement_rate
    ));

    let follower_points = (inf.followers as f64 / 50_000.0 * 10.0).min(20.0);
    total += follower_points;
    reasons.push(format!(
        "{} followers (+{follower_points:.1})",
        inf.followers
    ));

    if let Some(cpm) = inf.post_cpm() {
        let efficiency_points = (15.0 - cpm / 10.0).max(0.0);
        total += efficiency_points;
        reasons.push(format!(
            "{cpm:.1} effective CPM (+{efficiency_points:.1})"
        ));
    }

    let wanted_locations = &brief.target_demographics.locations;
    if !wanted_locations.is_empty() && any_overlap(&inf.locations, wanted_locations) {
        total += 10.0;
        reasons.push("target-demographic location match (+10)".to_string());
    }

    ScoredCandidate {
        influencer: inf.clone(),
        score: total.round() as i64,
        reasons,
    }
}

/// Score and rank a filtered pool, descending by score. Ties keep the
/// original pool order (stable sort), so identical input always yields an
/// identical ranking.
#[must_use]
pub fn rank_candidates(filtered: &[Influencer], brief: &Brief) -> Vec<ScoredCandidate> {
    let mut ranked: Vec<ScoredCandidate> = filtered
        .iter()
        .map(|inf| score_candidate(inf, brief))
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    if let (Some(top), Some(bottom)) = (ranked.first(), ranked.last()) {
        tracing::debug!(
            candidates = ranked.len(),
            top_score = top.score,
            bottom_score = bottom.score,
            "ranked candidate pool"
        );
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use castmatch_core::{Capabilities, RateCard, TargetDemographics};

    fn influencer(id: &str, followers: u64, engagement: f64, post: f64) -> Influencer {
        Influencer {
            id: id.to_string(),
            handle: format!("@{id}"),
            platform: "instagram".to_string(),
            followers,
            engagement_rate: engagement,
            locations: vec!["Madrid".to_string()],
            content_categories: vec!["fitness".to_string(), "lifestyle".to_string()],
            unwilling_categories: vec![],
            rate_card: RateCard {
                post,
                story: 0.0,
                reel: 0.0,
            },
            capabilities: Capabilities::default(),
        }
    }

    fn brief() -> Brief {
        Brief {
            client_name: "Acme".to_string(),
            budget: 20_000.0,
            content_themes: vec!["fitness".to_string(), "lifestyle".to_string()],
            target_demographics: TargetDemographics {
                age_range: None,
                locations: vec!["Madrid".to_string()],
                interests: vec![],
            },
            ..Brief::default()
        }
    }

    #[test]
    fn score_components_add_up() {
        // categories: 2 matches → 20; engagement 10% → 25; followers 100k → 20;
        // cpm = 500/100k×1000 = 5 → 15 − 0.5 = 14.5; location → 10.
        // Total 89.5 → rounds to 90.
        let cand = score_candidate(&influencer("a", 100_000, 10.0, 500.0), &brief());
        assert_eq!(cand.score, 90);
        assert_eq!(cand.reasons.len(), 5);
    }

    #[test]
    fn category_floor_applies_with_no_matches() {
        let mut inf = influencer("a", 100_000, 10.0, 500.0);
        inf.content_categories = vec!["gaming".to_string()];
        inf.locations = vec!["Lisbon".to_string()];
        let cand = score_candidate(&inf, &brief());
        // 5 (floor) + 25 + 20 + 14.5 = 64.5 → 65.
        assert_eq!(cand.score, 65);
    }

    #[test]
    fn category_points_cap_at_thirty() {
        let mut inf = influencer("a", 100_000, 10.0, 500.0);
        inf.content_categories = vec![
            "fitness".to_string(),
            "lifestyle".to_string(),
            "fit".to_string(),
            "life".to_string(),
        ];
        let cand = score_candidate(&inf, &brief());
        // 4 matches would be 40, capped at 30: 30 + 25 + 20 + 14.5 + 10 = 99.5 → 100.
        assert_eq!(cand.score, 100);
    }

    #[test]
    fn engagement_points_cap_at_twenty_five() {
        let low = score_candidate(&influencer("a", 100_000, 4.0, 500.0), &brief());
        let high = score_candidate(&influencer("b", 100_000, 40.0, 500.0), &brief());
        // 40% engagement caps at the same 25 points as exactly 10%.
        let capped = score_candidate(&influencer("c", 100_000, 10.0, 500.0), &brief());
        assert_eq!(high.score, capped.score);
        assert!(low.score < high.score);
    }

    #[test]
    fn budget_efficiency_floors_at_zero() {
        // cpm = 20,000/100k×1000 = 200 → 15 − 20 < 0 → 0 points.
        let cand = score_candidate(&influencer("a", 100_000, 10.0, 20_000.0), &brief());
        // 20 + 25 + 20 + 0 + 10 = 75.
        assert_eq!(cand.score, 75);
    }

    #[test]
    fn ranking_is_descending_with_stable_ties() {
        let pool = vec![
            influencer("weak", 1_000, 1.0, 900.0),
            influencer("tie-first", 100_000, 10.0, 500.0),
            influencer("tie-second", 100_000, 10.0, 500.0),
        ];
        let ranked = rank_candidates(&pool, &brief());
        let ids: Vec<&str> = ranked.iter().map(|c| c.influencer.id.as_str()).collect();
        assert_eq!(ids, vec!["tie-first", "tie-second", "weak"]);
    }

    #[test]
    fn ranking_is_deterministic() {
        let pool = vec![
            influencer("a", 80_000, 6.0, 700.0),
            influencer("b", 120_000, 3.0, 900.0),
            influencer("c", 40_000, 9.0, 300.0),
        ];
        let first = rank_candidates(&pool, &brief());
        let second = rank_candidates(&pool, &brief());
        let ids = |r: &[ScoredCandidate]| {
            r.iter()
                .map(|c| c.influencer.id.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(&first), ids(&second));
    }
}
