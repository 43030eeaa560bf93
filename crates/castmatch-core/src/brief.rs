use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::influencer::{extension_of, PoolFormat};
use crate::ConfigError;

/// Audience the campaign is aimed at.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetDemographics {
    #[serde(default)]
    pub age_range: Option<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
}

/// Hard constraints applied by the candidate filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Constraints {
    #[serde(default)]
    pub max_cpm: Option<f64>,
    #[serde(default)]
    pub min_followers: Option<u64>,
    #[serde(default)]
    pub max_followers: Option<u64>,
    #[serde(default)]
    pub required_categories: Vec<String>,
    #[serde(default)]
    pub excluded_categories: Vec<String>,
    /// Campaign subject matter checked against each creator's declared
    /// unwillingness list.
    #[serde(default)]
    pub category_restrictions: Vec<String>,
    #[serde(default)]
    pub require_event_attendance: bool,
    #[serde(default)]
    pub require_public_speaking: bool,
    /// Approximated as followers >= 500,000; the pool carries no real
    /// verification flag.
    #[serde(default)]
    pub must_have_verification: bool,
}

/// Requested gender proportions for one breakdown entry, as fractions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenderSplit {
    pub female: f64,
    pub male: f64,
}

/// One explicit `{tier, count}` ask from the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierRequest {
    /// Budget-tier name: `nano`, `micro`/`mid`, or `macro`.
    pub tier: String,
    pub count: usize,
    #[serde(default)]
    pub gender_split: Option<GenderSplit>,
}

/// Percentage of a tier's count to fill from one city.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationShare {
    pub city: String,
    pub percentage: f64,
}

/// Explicit count/location breakdown; overrides strategy allocation when set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfluencerRequirements {
    #[serde(default)]
    pub total_count: Option<usize>,
    #[serde(default)]
    pub breakdown: Vec<TierRequest>,
    #[serde(default)]
    pub location_distribution: Vec<LocationShare>,
}

/// Per-city representation rules applied as a post-pass on the selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeographicDistribution {
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default)]
    pub core_cities: Vec<String>,
    #[serde(default)]
    pub min_per_city: Option<usize>,
    #[serde(default)]
    pub max_per_city: Option<usize>,
}

/// One sequential campaign phase with its own sub-budget and creator quota.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    /// Budget-tier name the phase draws from (`nano`, `micro`/`mid`, `macro`).
    pub creator_tier: String,
    #[serde(default)]
    pub content_focus: Option<String>,
    pub creator_count: usize,
    pub budget_amount: f64,
}

/// A what-if budget level for multi-scenario comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetScenario {
    pub name: String,
    #[serde(default)]
    pub budget_amount: Option<f64>,
    /// Percentage of the brief's base budget, used when no amount is given.
    #[serde(default)]
    pub budget_percentage: Option<f64>,
}

/// Brand context merged into a brief before filtering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandProfile {
    pub name: String,
    #[serde(default)]
    pub content_themes: Vec<String>,
    #[serde(default)]
    pub preferred_categories: Vec<String>,
}

/// A validated, structured campaign brief. Immutable per run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Brief {
    pub client_name: String,
    /// Total campaign budget; `0.0` means unconstrained.
    #[serde(default)]
    pub budget: f64,
    #[serde(default)]
    pub campaign_goals: Vec<String>,
    #[serde(default)]
    pub target_demographics: TargetDemographics,
    #[serde(default)]
    pub platform_preferences: Vec<String>,
    #[serde(default)]
    pub content_themes: Vec<String>,
    #[serde(default)]
    pub constraints: Constraints,
    #[serde(default)]
    pub influencer_requirements: Option<InfluencerRequirements>,
    #[serde(default)]
    pub geographic_distribution: Option<GeographicDistribution>,
    #[serde(default)]
    pub phases: Vec<Phase>,
    #[serde(default)]
    pub budget_scenarios: Vec<BudgetScenario>,
}

impl Brief {
    /// Return an enhanced copy with the brand profile's themes and preferred
    /// categories merged in (case-insensitive dedupe). The original brief is
    /// untouched.
    #[must_use]
    pub fn with_brand_profile(&self, profile: &BrandProfile) -> Brief {
        let mut enhanced = self.clone();
        merge_unique(&mut enhanced.content_themes, &profile.content_themes);
        merge_unique(
            &mut enhanced.constraints.required_categories,
            &profile.preferred_categories,
        );
        enhanced
    }

    /// Return a copy of this brief with a different total budget.
    #[must_use]
    pub fn with_budget(&self, budget: f64) -> Brief {
        let mut copy = self.clone();
        copy.budget = budget;
        copy
    }
}

fn merge_unique(target: &mut Vec<String>, additions: &[String]) {
    for item in additions {
        let lower = item.to_lowercase();
        if !target.iter().any(|t| t.to_lowercase() == lower) {
            target.push(item.clone());
        }
    }
}

/// Load a brand profile from a YAML or JSON file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed, or the
/// profile has no name.
pub fn load_brand_profile(path: &Path) -> Result<BrandProfile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    let profile: BrandProfile = match extension_of(path)? {
        PoolFormat::Yaml => serde_yaml::from_str(&content)?,
        PoolFormat::Json => serde_json::from_str(&content)?,
    };
    if profile.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "brand profile name must be non-empty".to_string(),
        ));
    }
    Ok(profile)
}

/// Load and validate a campaign brief from a YAML or JSON file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation (see [`parse_brief`]).
pub fn load_brief(path: &Path) -> Result<Brief, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_brief(&content, extension_of(path)?)
}

/// Parse and validate a campaign brief from an in-memory string.
///
/// # Errors
///
/// Returns `ConfigError::Validation` for a negative budget, zero-count or
/// blank-tier breakdown entries, location percentages outside `(0, 100]`,
/// or a scenario with neither an amount nor a percentage.
pub fn parse_brief(content: &str, format: PoolFormat) -> Result<Brief, ConfigError> {
    let brief: Brief = match format {
        PoolFormat::Yaml => serde_yaml::from_str(content)?,
        PoolFormat::Json => serde_json::from_str(content)?,
    };
    validate_brief(&brief)?;
    Ok(brief)
}

fn validate_brief(brief: &Brief) -> Result<(), ConfigError> {
    if brief.client_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "client name must be non-empty".to_string(),
        ));
    }
    if brief.budget < 0.0 {
        return Err(ConfigError::Validation(format!(
            "budget must be non-negative, got {}",
            brief.budget
        )));
    }

    if let Some(reqs) = &brief.influencer_requirements {
        for entry in &reqs.breakdown {
            if entry.tier.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "breakdown entry has an empty tier name".to_string(),
                ));
            }
            if entry.count == 0 {
                return Err(ConfigError::Validation(format!(
                    "breakdown entry for tier '{}' has count 0",
                    entry.tier
                )));
            }
        }
        for share in &reqs.location_distribution {
            if !(share.percentage > 0.0 && share.percentage <= 100.0) {
                return Err(ConfigError::Validation(format!(
                    "location share for '{}' must be in (0, 100], got {}",
                    share.city, share.percentage
                )));
            }
        }
    }

    for phase in &brief.phases {
        if phase.budget_amount < 0.0 {
            return Err(ConfigError::Validation(format!(
                "phase '{}' has a negative budget",
                phase.name
            )));
        }
    }

    for scenario in &brief.budget_scenarios {
        if scenario.budget_amount.is_none() && scenario.budget_percentage.is_none() {
            return Err(ConfigError::Validation(format!(
                "scenario '{}' needs a budget amount or percentage",
                scenario.name
            )));
        }
    }

    Ok(())
}
