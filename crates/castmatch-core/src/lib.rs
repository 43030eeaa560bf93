//! Shared data model for the castmatch influencer selection engine.
//!
//! Holds the immutable reference records (`Influencer`, `Brief`) consumed by
//! the engine, plus YAML/JSON loaders with structural validation. Briefs are
//! never mutated in place: brand-augmented or re-budgeted variants are new
//! values produced by `with_*` constructors.

pub mod brief;
pub mod error;
pub mod influencer;

pub use brief::{
    load_brand_profile, load_brief, parse_brief, BrandProfile, Brief, BudgetScenario, Constraints, GenderSplit,
    GeographicDistribution, InfluencerRequirements, LocationShare, Phase, TargetDemographics,
    TierRequest,
};
pub use error::ConfigError;
pub use influencer::{load_pool, parse_pool, Capabilities, Influencer, PoolFormat, RateCard};
