//! Per-player rolling analytics
//!
//! Not load-bearing for correctness: nothing in the resolution path reads
//! these numbers back.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{PlayerId, Rarity};
use crate::engine::outcome::RollResult;

/// Engagement accrual per newly-collected card
const NEW_CARD_ENGAGEMENT: f64 = 0.02;
/// Engagement accrual per pity-driven card
const PITY_ENGAGEMENT: f64 = 0.03;

/// Aggregate roll statistics for one player, session/profile lifetime
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollStatistics {
    pub total_rolls: u64,
    histogram: [u64; Rarity::COUNT],
    /// Blended pity rate: `(old + this_roll_used_pity) / 2` per card. A
    /// crude exponential blend toward 0 or 1, kept as-is; a windowed average
    /// would change long-run behavior.
    pub pity_usage_rate: f64,
    /// In [0, 1], accrues on new/pity cards and never decays on its own
    pub engagement_score: f64,
}

impl RollStatistics {
    pub fn tier_count(&self, tier: Rarity) -> u64 {
        self.histogram[tier.rank()]
    }

    fn record_card(&mut self, tier: Rarity, used_pity: bool, is_new: bool) {
        self.total_rolls += 1;
        self.histogram[tier.rank()] += 1;
        self.pity_usage_rate = (self.pity_usage_rate + used_pity as u8 as f64) / 2.0;

        let mut bonus = 0.0;
        if is_new {
            bonus += NEW_CARD_ENGAGEMENT;
        }
        if used_pity {
            bonus += PITY_ENGAGEMENT;
        }
        self.engagement_score = (self.engagement_score + bonus).clamp(0.0, 1.0);
    }
}

/// Tracks statistics for every player the engine has served
#[derive(Debug, Default)]
pub struct RollStatisticsTracker {
    stats: AHashMap<PlayerId, RollStatistics>,
}

impl RollStatisticsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a successful roll into the player's aggregates
    pub fn record(&mut self, player: PlayerId, result: &RollResult) {
        let stats = self.stats.entry(player).or_default();
        for card in &result.cards {
            stats.record_card(card.tier, card.is_pity_result, card.is_new);
        }
    }

    pub fn get(&self, player: PlayerId) -> Option<&RollStatistics> {
        self.stats.get(&player)
    }
}
