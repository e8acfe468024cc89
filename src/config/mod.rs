//! Engine configuration with documented constants
//!
//! Pity thresholds, cost tables, and reveal-timing constants are collected
//! here. Everything is plain data injected into the engine at construction;
//! there is no global registry. Defaults are compiled in and can be
//! overridden from a TOML file via [`loader`].

pub mod loader;

use serde::{Deserialize, Serialize};

use crate::core::types::{Currency, Rarity, RollType};

/// Minimum gap between two validated rolls from the same player
pub const COOLDOWN_MS: u64 = 1000;

/// Largest card count a single request may ask for
pub const MAX_BATCH: u32 = 10;

/// Per-tier pity configuration, static after boot.
///
/// A tier's draw rate starts at `base_rate` and ramps by `soft_pity_increase`
/// for every roll past `soft_pity_start` without winning the tier, capped at
/// `max_rate`. Once the counter reaches `hard_pity_limit` the tier is
/// guaranteed outright (0 = no hard pity).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PityConfig {
    pub soft_pity_start: u32,
    pub hard_pity_limit: u32,
    pub soft_pity_increase: f64,
    pub base_rate: f64,
    pub max_rate: f64,
}

impl PityConfig {
    /// Current draw rate at the given pity counter.
    ///
    /// Non-decreasing in `pity`, never below `base_rate`, never above
    /// `max_rate`.
    pub fn current_rate(&self, pity: u32) -> f64 {
        let over = pity.saturating_sub(self.soft_pity_start) as f64;
        let ramped = self.base_rate + over * self.soft_pity_increase;
        // min-then-max instead of clamp: a misconfigured max_rate below
        // base_rate degrades to base_rate instead of panicking
        ramped.min(self.max_rate).max(self.base_rate)
    }

    /// True once the soft-pity ramp is active at this counter.
    ///
    /// Tiers with no ramp (`soft_pity_increase == 0`) have no soft pity to
    /// activate: their rate is flat, so a win is never pity-favored. Without
    /// this guard a flat tier with `soft_pity_start = 0` would report every
    /// ordinary win as a guarantee.
    pub fn soft_pity_active(&self, pity: u32) -> bool {
        self.soft_pity_increase > 0.0 && pity >= self.soft_pity_start
    }

    /// True once hard pity forces this tier at this counter
    pub fn hard_pity_reached(&self, pity: u32) -> bool {
        self.hard_pity_limit > 0 && pity >= self.hard_pity_limit
    }
}

/// Static per-tier pity table plus the explicit weighted-draw order.
///
/// `draw_order` is the exact, rarest-to-commonest list of tiers the weighted
/// draw iterates. It is deliberately allowed to be a strict subset of the
/// configured tiers: tiers absent from it are only reachable via hard pity,
/// and their probability mass flows to the fallback tier. Changing the list
/// changes live drop rates, so it is config data, not code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PityConfigTable {
    configs: [PityConfig; Rarity::COUNT],
    pub draw_order: Vec<Rarity>,
}

impl PityConfigTable {
    pub fn new(configs: [PityConfig; Rarity::COUNT], draw_order: Vec<Rarity>) -> Self {
        Self {
            configs,
            draw_order,
        }
    }

    pub fn get(&self, tier: Rarity) -> &PityConfig {
        &self.configs[tier.rank()]
    }

    pub fn set(&mut self, tier: Rarity, config: PityConfig) {
        self.configs[tier.rank()] = config;
    }

    /// Log inconsistencies at boot. Violations are warnings, not fatal:
    /// a misconfigured tier still resolves, just with degraded guarantees.
    pub fn boot_check(&self) {
        for tier in Rarity::ALL {
            let c = self.get(tier);
            if c.hard_pity_limit > 0 && c.hard_pity_limit <= c.soft_pity_start {
                tracing::warn!(
                    %tier,
                    hard = c.hard_pity_limit,
                    soft = c.soft_pity_start,
                    "hard pity limit does not exceed soft pity start"
                );
            }
            if c.max_rate < c.base_rate {
                tracing::warn!(%tier, "max_rate below base_rate, base_rate wins the clamp");
            }
            if !(0.0..=1.0).contains(&c.base_rate) || !(0.0..=1.0).contains(&c.max_rate) {
                tracing::warn!(%tier, "rates outside [0, 1]");
            }
        }
        if self.draw_order.is_empty() {
            tracing::warn!("empty draw order: every non-hard-pity roll falls back to Common");
        }
    }
}

impl Default for PityConfigTable {
    fn default() -> Self {
        let mut configs = [PityConfig {
            soft_pity_start: 0,
            hard_pity_limit: 0,
            soft_pity_increase: 0.0,
            base_rate: 0.0,
            max_rate: 0.0,
        }; Rarity::COUNT];

        configs[Rarity::Ultimate.rank()] = PityConfig {
            soft_pity_start: 70,
            hard_pity_limit: 90,
            soft_pity_increase: 0.002,
            base_rate: 0.001,
            max_rate: 0.05,
        };
        configs[Rarity::Mythical.rank()] = PityConfig {
            soft_pity_start: 60,
            hard_pity_limit: 80,
            soft_pity_increase: 0.005,
            base_rate: 0.003,
            max_rate: 0.10,
        };
        configs[Rarity::Legendary.rank()] = PityConfig {
            soft_pity_start: 25,
            hard_pity_limit: 50,
            soft_pity_increase: 0.06,
            base_rate: 0.006,
            max_rate: 0.32,
        };
        configs[Rarity::Epic.rank()] = PityConfig {
            soft_pity_start: 15,
            hard_pity_limit: 25,
            soft_pity_increase: 0.03,
            base_rate: 0.04,
            max_rate: 0.50,
        };
        configs[Rarity::Rare.rank()] = PityConfig {
            soft_pity_start: 8,
            hard_pity_limit: 12,
            soft_pity_increase: 0.05,
            base_rate: 0.12,
            max_rate: 0.60,
        };
        configs[Rarity::Uncommon.rank()] = PityConfig {
            soft_pity_start: 0,
            hard_pity_limit: 0,
            soft_pity_increase: 0.0,
            base_rate: 0.25,
            max_rate: 0.25,
        };
        configs[Rarity::Common.rank()] = PityConfig {
            soft_pity_start: 0,
            hard_pity_limit: 0,
            soft_pity_increase: 0.0,
            base_rate: 0.55,
            max_rate: 0.55,
        };

        // Uncommon and Mythical are intentionally absent: they keep the
        // shipped drop rates, reachable through hard pity and fallback only.
        let draw_order = vec![
            Rarity::Ultimate,
            Rarity::Legendary,
            Rarity::Epic,
            Rarity::Rare,
            Rarity::Common,
        ];

        Self {
            configs,
            draw_order,
        }
    }
}

/// Fully-resolved price of one request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollCost {
    pub currency: Currency,
    /// Amount actually charged, after bulk discount
    pub amount: u64,
    /// Raw amount before discount
    pub original_amount: u64,
    /// Discount fraction applied, in [0, 1)
    pub discount: f64,
}

/// Per-roll-type pricing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEntry {
    pub currency: Currency,
    pub per_card: u64,
}

/// Bulk discount brackets, largest count first: (minimum count, fraction off)
const DISCOUNT_BRACKETS: [(u32, f64); 2] = [(10, 0.10), (5, 0.05)];

/// Cost table mapping roll types to currency prices with bulk discounts.
///
/// Raw cost is linear in count, so monotonic non-decreasing; the discounted
/// amount never exceeds the raw amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostTable {
    entries: ahash::AHashMap<RollType, CostEntry>,
}

impl CostTable {
    pub fn new(entries: ahash::AHashMap<RollType, CostEntry>) -> Self {
        Self { entries }
    }

    pub fn entry(&self, roll_type: RollType) -> Option<&CostEntry> {
        self.entries.get(&roll_type)
    }

    pub fn set(&mut self, roll_type: RollType, entry: CostEntry) {
        self.entries.insert(roll_type, entry);
    }

    /// Price `count` cards of the given roll type. None if the roll type has
    /// no cost entry.
    pub fn roll_cost(&self, roll_type: RollType, count: u32) -> Option<RollCost> {
        let entry = self.entries.get(&roll_type)?;
        let original = entry.per_card * count as u64;
        let discount = DISCOUNT_BRACKETS
            .iter()
            .find(|(min, _)| count >= *min)
            .map(|(_, frac)| *frac)
            .unwrap_or(0.0);
        let amount = (original as f64 * (1.0 - discount)).floor() as u64;
        Some(RollCost {
            currency: entry.currency,
            amount,
            original_amount: original,
            discount,
        })
    }
}

impl Default for CostTable {
    fn default() -> Self {
        let mut entries = ahash::AHashMap::new();
        entries.insert(
            RollType::Daily,
            CostEntry {
                currency: Currency::Coins,
                per_card: 100,
            },
        );
        entries.insert(
            RollType::Premium,
            CostEntry {
                currency: Currency::Gems,
                per_card: 160,
            },
        );
        entries.insert(
            RollType::Bonus,
            CostEntry {
                currency: Currency::Coins,
                per_card: 50,
            },
        );
        entries.insert(
            RollType::Event,
            CostEntry {
                currency: Currency::Tickets,
                per_card: 1,
            },
        );
        entries.insert(
            RollType::Pity,
            CostEntry {
                currency: Currency::Gems,
                per_card: 200,
            },
        );
        Self { entries }
    }
}

/// Reveal-timing and effect-intensity constants.
///
/// Reveal delays are presentation hints, not gameplay state: the client is
/// expected to hold each card for `reveal_delay_ms` before flipping it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Base hold before the first card flips (milliseconds)
    pub base_delay_ms: f64,
    /// Extra hold per position in a multi-card roll
    pub stagger_ms: f64,
    /// Upper bound of the uniform anticipation jitter added per card.
    /// The jitter is deliberate randomization, not noise to be removed.
    pub jitter_max_ms: f64,
    /// Extra "psychological" hold appended to the timing summary when the
    /// batch contains a rare outcome
    pub anticipation_hold_ms: f64,
}

impl TimingConfig {
    /// Reveal delay multiplier per tier: rarer cards hold longer
    pub fn tier_multiplier(&self, tier: Rarity) -> f64 {
        match tier {
            Rarity::Ultimate => 3.0,
            Rarity::Mythical => 2.6,
            Rarity::Legendary => 2.2,
            Rarity::Epic => 1.8,
            Rarity::Rare => 1.4,
            Rarity::Uncommon => 1.1,
            Rarity::Common => 1.0,
        }
    }

    /// Base visual intensity per tier, before new-card and pity bonuses
    pub fn tier_base_intensity(&self, tier: Rarity) -> f64 {
        match tier {
            Rarity::Ultimate => 0.70,
            Rarity::Mythical => 0.60,
            Rarity::Legendary => 0.50,
            Rarity::Epic => 0.35,
            Rarity::Rare => 0.25,
            Rarity::Uncommon => 0.15,
            Rarity::Common => 0.10,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 400.0,
            stagger_ms: 250.0,
            jitter_max_ms: 150.0,
            anticipation_hold_ms: 600.0,
        }
    }
}

/// Everything the engine needs at construction time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub pity: PityConfigTable,
    pub costs: CostTable,
    pub timing: TimingConfig,
}
