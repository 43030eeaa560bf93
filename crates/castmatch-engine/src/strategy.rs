//! Goal-keyword detection and the per-budget-tier strategy weights it
//! implies.

use serde::{Deserialize, Serialize};

use crate::tiers::BudgetTier;

const SALES_KEYWORDS: &[&str] = &["sales", "conversion", "sell", "revenue", "purchase", "roi"];
const TRAFFIC_KEYWORDS: &[&str] = &["traffic", "click", "visit", "website", "landing"];
const AWARENESS_KEYWORDS: &[&str] = &["awareness", "brand", "reach", "visibility", "impressions"];

/// Detected campaign goal type. Precedence when several keyword families
/// appear: sales, then traffic, then awareness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalKind {
    Sales,
    Traffic,
    Awareness,
    Balanced,
}

impl GoalKind {
    /// Detect the goal type from the brief's free-form goal lines.
    #[must_use]
    pub fn detect(goals: &[String]) -> Self {
        let haystack = goals.join(" ").to_lowercase();
        let hit = |keywords: &[&str]| keywords.iter().any(|k| haystack.contains(k));

        if hit(SALES_KEYWORDS) {
            GoalKind::Sales
        } else if hit(TRAFFIC_KEYWORDS) {
            GoalKind::Traffic
        } else if hit(AWARENESS_KEYWORDS) {
            GoalKind::Awareness
        } else {
            GoalKind::Balanced
        }
    }

    /// Budget weights this goal implies. Sales leans hard into small
    /// high-engagement accounts; awareness buys volume.
    #[must_use]
    pub const fn weights(self) -> StrategyWeights {
        match self {
            GoalKind::Sales => StrategyWeights::new(0.70, 0.20, 0.10),
            GoalKind::Traffic => StrategyWeights::new(0.50, 0.35, 0.15),
            GoalKind::Awareness => StrategyWeights::new(0.30, 0.40, 0.30),
            GoalKind::Balanced => StrategyWeights::new(0.40, 0.40, 0.20),
        }
    }
}

/// Per-budget-tier share targets, in `[0, 1]`, summing to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyWeights {
    nano: f64,
    micro: f64,
    macro_share: f64,
}

impl StrategyWeights {
    #[must_use]
    pub const fn new(nano: f64, micro: f64, macro_share: f64) -> Self {
        Self {
            nano,
            micro,
            macro_share,
        }
    }

    /// Share of the total budget reserved for one tier.
    #[must_use]
    pub const fn for_tier(&self, tier: BudgetTier) -> f64 {
        match tier {
            BudgetTier::Nano => self.nano,
            BudgetTier::Micro => self.micro,
            BudgetTier::Macro => self.macro_share,
        }
    }
}
