//! Report assembly: load inputs, run the engine, emit timestamped JSON.

use std::path::Path;

use anyhow::Context;
use castmatch_core::{load_brand_profile, load_brief, load_pool, Brief};
use castmatch_engine::{MultiScenarioComparison, SelectionEngine, SelectionOutcome};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct SelectionReport {
    generated_at: DateTime<Utc>,
    client_name: String,
    budget: f64,
    #[serde(flatten)]
    outcome: SelectionOutcome,
}

#[derive(Debug, Serialize)]
struct ScenarioReport {
    generated_at: DateTime<Utc>,
    client_name: String,
    base_budget: f64,
    #[serde(flatten)]
    comparison: MultiScenarioComparison,
}

pub async fn run_select(
    brief_path: &Path,
    pool_path: &Path,
    brand_path: Option<&Path>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let (brief, pool) = load_inputs(brief_path, pool_path)?;
    let brief = match brand_path {
        Some(path) => {
            let profile = load_brand_profile(path)
                .with_context(|| format!("loading brand profile from {}", path.display()))?;
            brief.with_brand_profile(&profile)
        }
        None => brief,
    };

    let engine = SelectionEngine::from_env();
    let outcome = engine.select_influencers(&brief, &pool).await?;

    for warning in &outcome.warnings {
        tracing::warn!(%warning, "selection warning");
    }

    let report = SelectionReport {
        generated_at: Utc::now(),
        client_name: brief.client_name.clone(),
        budget: brief.budget,
        outcome,
    };
    emit(&report, output)
}

pub async fn run_scenarios(
    brief_path: &Path,
    pool_path: &Path,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let (brief, pool) = load_inputs(brief_path, pool_path)?;

    let engine = SelectionEngine::from_env();
    let comparison = engine.generate_multi_budget_scenarios(&brief, &pool).await?;

    let report = ScenarioReport {
        generated_at: Utc::now(),
        client_name: brief.client_name.clone(),
        base_budget: brief.budget,
        comparison,
    };
    emit(&report, output)
}

fn load_inputs(
    brief_path: &Path,
    pool_path: &Path,
) -> anyhow::Result<(Brief, Vec<castmatch_core::Influencer>)> {
    let brief = load_brief(brief_path)
        .with_context(|| format!("loading brief from {}", brief_path.display()))?;
    let pool = load_pool(pool_path)
        .with_context(|| format!("loading pool from {}", pool_path.display()))?;
    Ok((brief, pool))
}

fn emit<T: Serialize>(report: &T, output: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("writing report to {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
