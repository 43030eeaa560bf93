//! End-to-end pipeline tests over a synthetic candidate pool.

use std::collections::HashSet;

use castmatch_core::{
    Brief, BudgetScenario, Capabilities, GeographicDistribution, Influencer,
    InfluencerRequirements, Phase, RateCard, TargetDemographics, TierRequest,
};
use castmatch_engine::{EngineError, RationaleGenerator, SelectionEngine};

fn engine() -> SelectionEngine {
    SelectionEngine::new(RationaleGenerator::Template)
}

fn creator(
    id: &str,
    followers: u64,
    engagement: f64,
    post: f64,
    city: &str,
    category: &str,
) -> Influencer {
    Influencer {
        id: id.to_string(),
        handle: format!("@{id}"),
        platform: "instagram".to_string(),
        followers,
        engagement_rate: engagement,
        locations: vec![city.to_string()],
        content_categories: vec![category.to_string(), "lifestyle".to_string()],
        unwilling_categories: vec![],
        rate_card: RateCard {
            post,
            story: post / 4.0,
            reel: post * 1.5,
        },
        capabilities: Capabilities::default(),
    }
}

/// Twenty candidates spread across budget tiers, cities, and price points.
fn pool() -> Vec<Influencer> {
    let mut pool = Vec::new();
    for i in 0..8 {
        let city = if i % 2 == 0 { "Madrid" } else { "Barcelona" };
        pool.push(creator(
            &format!("nano{i}"),
            5_000 + i * 4_000,
            6.0 + i as f64 * 0.5,
            120.0 + i as f64 * 30.0,
            city,
            "fitness",
        ));
    }
    for i in 0..8 {
        let city = if i % 2 == 0 { "Madrid" } else { "Barcelona" };
        pool.push(creator(
            &format!("micro{i}"),
            80_000 + i * 40_000,
            4.0 + i as f64 * 0.4,
            600.0 + i as f64 * 100.0,
            city,
            "fitness",
        ));
    }
    for i in 0..4 {
        pool.push(creator(
            &format!("macro{i}"),
            600_000 + i * 150_000,
            2.0 + i as f64 * 0.3,
            2_500.0 + i as f64 * 400.0,
            "Madrid",
            "food",
        ));
    }
    pool
}

fn brief(budget: f64) -> Brief {
    Brief {
        client_name: "Acme Beverages".to_string(),
        budget,
        campaign_goals: vec!["summer launch".to_string()],
        platform_preferences: vec!["instagram".to_string()],
        content_themes: vec!["fitness".to_string()],
        target_demographics: TargetDemographics {
            age_range: Some("18-35".to_string()),
            locations: vec!["Madrid".to_string(), "Barcelona".to_string()],
            interests: vec![],
        },
        ..Brief::default()
    }
}

#[tokio::test]
async fn identical_inputs_yield_identical_selections() {
    let engine = engine();
    let brief = brief(15_000.0);
    let pool = pool();

    let first = engine.select_influencers(&brief, &pool).await.unwrap();
    let second = engine.select_influencers(&brief, &pool).await.unwrap();

    let ids = |o: &castmatch_engine::SelectionOutcome| {
        o.selected
            .iter()
            .map(|s| s.influencer.id.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), ids(&second));
    assert!((first.metrics.total_spend - second.metrics.total_spend).abs() < f64::EPSILON);
}

#[tokio::test]
async fn total_cost_never_exceeds_budget() {
    let engine = engine();
    let outcome = engine
        .select_influencers(&brief(15_000.0), &pool())
        .await
        .unwrap();

    let total: f64 = outcome.selected.iter().map(|s| s.cost_estimate).sum();
    assert!(total <= 15_000.0, "spend {total} breached the ceiling");
    assert!(outcome.metrics.utilization >= 0.0 && outcome.metrics.utilization <= 1.0);
}

#[tokio::test]
async fn selection_has_no_duplicate_ids_or_handles() {
    let engine = engine();
    let outcome = engine
        .select_influencers(&brief(50_000.0), &pool())
        .await
        .unwrap();

    let ids: HashSet<&str> = outcome
        .selected
        .iter()
        .map(|s| s.influencer.id.as_str())
        .collect();
    let handles: HashSet<&str> = outcome
        .selected
        .iter()
        .map(|s| s.influencer.handle.as_str())
        .collect();
    assert_eq!(ids.len(), outcome.selected.len());
    assert_eq!(handles.len(), outcome.selected.len());
}

#[tokio::test]
async fn requirements_breakdown_is_exact_or_explicitly_short() {
    let engine = engine();
    let mut brief = brief(100_000.0);
    brief.influencer_requirements = Some(InfluencerRequirements {
        total_count: Some(5),
        breakdown: vec![
            TierRequest {
                tier: "macro".to_string(),
                count: 2,
                gender_split: None,
            },
            TierRequest {
                tier: "mid".to_string(),
                count: 3,
                gender_split: None,
            },
        ],
        location_distribution: vec![],
    });

    let outcome = engine.select_influencers(&brief, &pool()).await.unwrap();
    let macros = outcome
        .selected
        .iter()
        .filter(|s| s.influencer.followers >= 500_000)
        .count();
    let mids = outcome
        .selected
        .iter()
        .filter(|s| s.influencer.followers >= 50_000 && s.influencer.followers < 500_000)
        .count();
    assert_eq!(macros, 2);
    assert_eq!(mids, 3);
    assert_eq!(outcome.selected.len(), 5);
}

#[tokio::test]
async fn unknown_requirement_tier_is_a_hard_error() {
    let engine = engine();
    let mut brief = brief(10_000.0);
    brief.influencer_requirements = Some(InfluencerRequirements {
        total_count: None,
        breakdown: vec![TierRequest {
            tier: "mega".to_string(),
            count: 1,
            gender_split: None,
        }],
        location_distribution: vec![],
    });

    let err = engine
        .select_influencers(&brief, &pool())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Configuration(_)));
}

#[tokio::test]
async fn phases_select_disjoint_sets() {
    let engine = engine();
    let mut brief = brief(30_000.0);
    brief.phases = vec![
        Phase {
            name: "teaser".to_string(),
            creator_tier: "nano".to_string(),
            content_focus: Some("fitness".to_string()),
            creator_count: 3,
            budget_amount: 8_000.0,
        },
        Phase {
            name: "launch".to_string(),
            creator_tier: "nano".to_string(),
            content_focus: None,
            creator_count: 3,
            budget_amount: 8_000.0,
        },
    ];

    let outcome = engine.select_influencers(&brief, &pool()).await.unwrap();
    let teaser: HashSet<&str> = outcome
        .selected
        .iter()
        .filter(|s| s.rationale.starts_with("[teaser]"))
        .map(|s| s.influencer.id.as_str())
        .collect();
    let launch: HashSet<&str> = outcome
        .selected
        .iter()
        .filter(|s| s.rationale.starts_with("[launch]"))
        .map(|s| s.influencer.id.as_str())
        .collect();
    assert!(!teaser.is_empty());
    assert!(!launch.is_empty());
    assert!(teaser.is_disjoint(&launch));
}

#[tokio::test]
async fn phase_budgets_never_breach_the_campaign_budget() {
    // Declared phase budgets sum to 16,000 against a 10,000 campaign; the
    // combined selection still has to fit the campaign total.
    let engine = engine();
    let mut brief = brief(10_000.0);
    brief.phases = vec![
        Phase {
            name: "teaser".to_string(),
            creator_tier: "micro".to_string(),
            content_focus: None,
            creator_count: 8,
            budget_amount: 8_000.0,
        },
        Phase {
            name: "launch".to_string(),
            creator_tier: "micro".to_string(),
            content_focus: None,
            creator_count: 8,
            budget_amount: 8_000.0,
        },
    ];

    let outcome = engine.select_influencers(&brief, &pool()).await.unwrap();
    let total: f64 = outcome.selected.iter().map(|s| s.cost_estimate).sum();
    assert!(total <= 10_000.0, "cross-phase spend {total} breached the budget");
    assert!(outcome.metrics.utilization <= 1.0);
}

#[tokio::test]
async fn geographic_minimums_hold_when_pool_allows() {
    let engine = engine();
    let mut brief = brief(50_000.0);
    brief.geographic_distribution = Some(GeographicDistribution {
        cities: vec!["Madrid".to_string(), "Barcelona".to_string()],
        core_cities: vec![],
        min_per_city: Some(1),
        max_per_city: None,
    });

    let outcome = engine.select_influencers(&brief, &pool()).await.unwrap();
    for city in ["Madrid", "Barcelona"] {
        assert!(
            outcome
                .selected
                .iter()
                .any(|s| s.influencer.locations.iter().any(|l| l == city)),
            "no representative for {city}"
        );
    }
}

#[tokio::test]
async fn default_scenario_utilization_stays_in_bounds() {
    let engine = engine();
    let mut brief = brief(15_000.0);
    brief.budget_scenarios = vec![
        BudgetScenario {
            name: "baseline".to_string(),
            budget_amount: Some(15_000.0),
            budget_percentage: None,
        },
        BudgetScenario {
            name: "stretch".to_string(),
            budget_amount: None,
            budget_percentage: Some(150.0),
        },
    ];

    let comparison = engine
        .generate_multi_budget_scenarios(&brief, &pool())
        .await
        .unwrap();
    assert_eq!(comparison.scenarios.len(), 2);
    assert!((comparison.scenarios[1].budget - 22_500.0).abs() < f64::EPSILON);
    for scenario in &comparison.scenarios {
        let u = scenario.outcome.metrics.utilization;
        assert!((0.0..=1.0).contains(&u), "{}: utilization {u}", scenario.name);
        assert!(scenario.budget - scenario.total_cost >= 0.0);
    }
    assert!(["baseline", "stretch"].contains(&comparison.recommended.as_str()));
}

#[tokio::test]
async fn empty_pool_is_a_hard_error() {
    let engine = engine();
    let err = engine
        .select_influencers(&brief(10_000.0), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::EmptyPool));
}

#[tokio::test]
async fn negative_budget_is_a_hard_error() {
    let engine = engine();
    let mut brief = brief(10_000.0);
    brief.budget = -5.0;
    let err = engine.select_influencers(&brief, &pool()).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidBudget(_)));
}

#[tokio::test]
async fn infeasible_constraints_return_partial_not_error() {
    let engine = engine();
    let mut brief = brief(10_000.0);
    // Nothing in the pool reaches 10M followers.
    brief.constraints.min_followers = Some(10_000_000);

    let outcome = engine.select_influencers(&brief, &pool()).await.unwrap();
    assert!(outcome.selected.is_empty());
    assert!(!outcome.warnings.is_empty());
}

#[tokio::test]
async fn every_selection_carries_projections() {
    let engine = engine();
    let outcome = engine
        .select_influencers(&brief(15_000.0), &pool())
        .await
        .unwrap();
    assert!(!outcome.selected.is_empty());
    for pick in &outcome.selected {
        assert!(pick.tier_impressions > 0);
        assert!(pick.estimated_reach > 0);
        assert!(pick.cost_estimate > 0.0);
        assert!(!pick.rationale.is_empty());
        assert!(!pick.proposed_content.is_empty());
        assert!(pick.match_score > 0);
    }
}
