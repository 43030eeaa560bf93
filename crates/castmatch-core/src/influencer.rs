use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Per-format rates quoted by a creator, in the campaign currency.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateCard {
    #[serde(default)]
    pub post: f64,
    #[serde(default)]
    pub story: f64,
    #[serde(default)]
    pub reel: f64,
}

/// Offline/format capabilities a creator has opted into.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Capabilities {
    #[serde(default)]
    pub event_appearances: bool,
    #[serde(default)]
    pub public_speaking: bool,
}

/// Immutable reference record for one candidate creator.
///
/// Supplied by an external pool provider; assumed coarse-filtered upstream
/// but fully re-validated by the engine's candidate filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Influencer {
    pub id: String,
    pub handle: String,
    pub platform: String,
    pub followers: u64,
    /// Engagement rate as a percentage, e.g. `4.2` for 4.2%.
    pub engagement_rate: f64,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub content_categories: Vec<String>,
    /// Categories the creator has declared they will not work with.
    #[serde(default)]
    pub unwilling_categories: Vec<String>,
    #[serde(default)]
    pub rate_card: RateCard,
    #[serde(default)]
    pub capabilities: Capabilities,
}

impl Influencer {
    /// Cost of the standard campaign package: 2 posts, 1 reel, 3 stories.
    #[must_use]
    pub fn package_cost(&self) -> f64 {
        2.0 * self.rate_card.post + self.rate_card.reel + 3.0 * self.rate_card.story
    }

    /// Effective CPM of a single post, `(post_rate / followers) × 1000`.
    ///
    /// Returns `None` for a zero-follower record.
    #[must_use]
    pub fn post_cpm(&self) -> Option<f64> {
        if self.followers == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        Some(self.rate_card.post / self.followers as f64 * 1000.0)
    }
}

#[derive(Debug, Deserialize)]
struct PoolFile {
    influencers: Vec<Influencer>,
}

/// Load and validate a candidate pool from a YAML or JSON file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation (blank ids/handles, duplicate ids or handles, engagement
/// outside `[0, 100]`, negative rates).
pub fn load_pool(path: &Path) -> Result<Vec<Influencer>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_pool(&content, extension_of(path)?)
}

/// Parse and validate a candidate pool from an in-memory string.
///
/// # Errors
///
/// Same conditions as [`load_pool`], minus file I/O.
pub fn parse_pool(content: &str, format: PoolFormat) -> Result<Vec<Influencer>, ConfigError> {
    let pool_file: PoolFile = match format {
        PoolFormat::Yaml => serde_yaml::from_str(content)?,
        PoolFormat::Json => serde_json::from_str(content)?,
    };
    validate_pool(&pool_file.influencers)?;
    Ok(pool_file.influencers)
}

/// Input serialization format for pool and brief files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolFormat {
    Yaml,
    Json,
}

pub(crate) fn extension_of(path: &Path) -> Result<PoolFormat, ConfigError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => Ok(PoolFormat::Yaml),
        Some("json") => Ok(PoolFormat::Json),
        other => Err(ConfigError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

fn validate_pool(pool: &[Influencer]) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();
    let mut seen_handles = HashSet::new();

    for inf in pool {
        if inf.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "influencer id must be non-empty".to_string(),
            ));
        }
        if inf.handle.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "influencer '{}' has an empty handle",
                inf.id
            )));
        }
        if inf.platform.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "influencer '{}' has an empty platform",
                inf.id
            )));
        }
        if !(0.0..=100.0).contains(&inf.engagement_rate) {
            return Err(ConfigError::Validation(format!(
                "influencer '{}' has engagement rate {} outside [0, 100]",
                inf.id, inf.engagement_rate
            )));
        }
        for (name, rate) in [
            ("post", inf.rate_card.post),
            ("story", inf.rate_card.story),
            ("reel", inf.rate_card.reel),
        ] {
            if rate < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "influencer '{}' has a negative {name} rate",
                    inf.id
                )));
            }
        }
        if !seen_ids.insert(inf.id.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate influencer id: '{}'",
                inf.id
            )));
        }
        if !seen_handles.insert(inf.handle.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate influencer handle: '{}'",
                inf.handle
            )));
        }
    }

    Ok(())
}
