//! The two independent tiering axes.
//!
//! [`PricingTier`] buckets by engagement rate and drives the CPM and
//! reach-rate assumptions behind every projection. [`BudgetTier`] buckets by
//! raw follower count and drives strategic budget splitting. They look
//! similar and are easy to conflate; keeping them as distinct tagged types
//! is deliberate.

use serde::{Deserialize, Serialize};

/// Engagement floor for tier-1 pricing, in percent.
pub const TIER1_MIN_ENGAGEMENT: f64 = 10.0;
/// Engagement floor for tier-2 pricing, in percent.
pub const TIER2_MIN_ENGAGEMENT: f64 = 5.0;

/// Follower ceiling (exclusive) for the nano budget tier.
pub const NANO_MAX_FOLLOWERS: u64 = 50_000;
/// Follower ceiling (exclusive) for the micro budget tier.
pub const MICRO_MAX_FOLLOWERS: u64 = 500_000;

/// Engagement-rate bucket bound to fixed CPM and reach-rate assumptions.
///
/// Both CPM and reach decrease monotonically from tier-1 to tier-3: higher
/// engagement implies both higher assumed reach and a higher justified
/// price, not pure volume pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PricingTier {
    #[serde(rename = "tier-1")]
    Tier1,
    #[serde(rename = "tier-2")]
    Tier2,
    #[serde(rename = "tier-3")]
    Tier3,
}

impl PricingTier {
    /// Classify an engagement rate (percent) into a pricing tier.
    ///
    /// Pure function: identical engagement always yields the identical tier.
    #[must_use]
    pub fn classify(engagement_rate: f64) -> Self {
        if engagement_rate >= TIER1_MIN_ENGAGEMENT {
            PricingTier::Tier1
        } else if engagement_rate >= TIER2_MIN_ENGAGEMENT {
            PricingTier::Tier2
        } else {
            PricingTier::Tier3
        }
    }

    /// Strategic CPM assumed for this tier, in the campaign currency.
    #[must_use]
    pub const fn cpm(self) -> f64 {
        match self {
            PricingTier::Tier1 => 30.0,
            PricingTier::Tier2 => 22.0,
            PricingTier::Tier3 => 15.0,
        }
    }

    /// Assumed fraction of followers who see a given piece of content.
    #[must_use]
    pub const fn reach_rate(self) -> f64 {
        match self {
            PricingTier::Tier1 => 0.35,
            PricingTier::Tier2 => 0.25,
            PricingTier::Tier3 => 0.15,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            PricingTier::Tier1 => "tier-1",
            PricingTier::Tier2 => "tier-2",
            PricingTier::Tier3 => "tier-3",
        }
    }

    pub const ALL: [PricingTier; 3] = [PricingTier::Tier1, PricingTier::Tier2, PricingTier::Tier3];
}

/// Projected impressions for one creator at a given pricing tier.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn tier_impressions(followers: u64, tier: PricingTier) -> u64 {
    (followers as f64 * tier.reach_rate()).round() as u64
}

/// Follower-count bucket used only for strategy-weighted budget splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetTier {
    Nano,
    Micro,
    Macro,
}

impl BudgetTier {
    /// Classify a raw follower count into a budget tier.
    #[must_use]
    pub const fn classify(followers: u64) -> Self {
        if followers < NANO_MAX_FOLLOWERS {
            BudgetTier::Nano
        } else if followers < MICRO_MAX_FOLLOWERS {
            BudgetTier::Micro
        } else {
            BudgetTier::Macro
        }
    }

    /// Parse a client-facing tier name. `mid` is accepted as an alias for
    /// `micro`, matching the breakdown vocabulary briefs arrive with.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "nano" => Some(BudgetTier::Nano),
            "micro" | "mid" => Some(BudgetTier::Micro),
            "macro" => Some(BudgetTier::Macro),
            _ => None,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            BudgetTier::Nano => "nano",
            BudgetTier::Micro => "micro",
            BudgetTier::Macro => "macro",
        }
    }

    pub const ALL: [BudgetTier; 3] = [BudgetTier::Nano, BudgetTier::Micro, BudgetTier::Macro];
}
