//! Per-player pity counters

use serde::{Deserialize, Serialize};

use crate::core::types::Rarity;

/// Per-player, per-tier pity counters.
///
/// One instance per player, zero-initialized when the profile first loads,
/// owned by the profile store. Counters only move through
/// [`updater::apply`](crate::pity::updater::apply); everything else takes
/// read-only snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PityLedger {
    counts: [u32; Rarity::COUNT],
}

impl PityLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed counters from a loaded profile, rarest-first order
    pub fn from_counts(counts: [u32; Rarity::COUNT]) -> Self {
        Self { counts }
    }

    pub fn count(&self, tier: Rarity) -> u32 {
        self.counts[tier.rank()]
    }

    /// Set a single counter. Intended for profile loading and test setup;
    /// in-engine mutation goes through the updater.
    pub fn set_count(&mut self, tier: Rarity, count: u32) {
        self.counts[tier.rank()] = count;
    }

    pub(crate) fn clear(&mut self, tier: Rarity) {
        self.counts[tier.rank()] = 0;
    }

    pub(crate) fn bump(&mut self, tier: Rarity) {
        self.counts[tier.rank()] += 1;
    }
}
