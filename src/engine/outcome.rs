//! Result assembly: reveal timing, novelty flags, effect intensity
//!
//! Reveal delays and the anticipation jitter are presentation hints for the
//! client's flip animation. The jitter is deliberate randomization, part of
//! the anticipation design.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::{RollCost, TimingConfig};
use crate::core::types::{CardRef, PlayerId, Rarity};
use crate::pity::Resolution;
use crate::store::ProfileStore;

/// Intensity bonus when the card is new to the player's collection
const NEW_CARD_BONUS: f64 = 0.2;
/// Intensity bonus when the outcome was pity-driven
const PITY_BONUS: f64 = 0.3;
/// Intensity at which the batch earns the extra anticipation hold
const ANTICIPATION_THRESHOLD: f64 = 0.5;

/// One drawn card before assembly
#[derive(Debug, Clone)]
pub struct DrawnCard {
    pub card: CardRef,
    pub resolution: Resolution,
}

/// A single resolved card, ready to render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRollResult {
    pub card: CardRef,
    pub tier: Rarity,
    pub is_new: bool,
    pub is_pity_result: bool,
    pub pity_count_at_draw: u32,
    /// 1-based position in the batch
    pub roll_position: u32,
    pub reveal_delay_ms: u32,
    /// Visual intensity hint in [0, 1]
    pub effect_intensity: f64,
}

/// Timing summary for the whole batch: when the last card is optimally
/// revealed, plus the psychological hold before the first flip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollTiming {
    pub total_reveal_ms: f64,
    pub anticipation_hold_ms: f64,
}

/// The full result of one request. Produced fresh per request, never mutated
/// after return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollResult {
    pub cards: Vec<CardRollResult>,
    pub total_cards: u32,
    /// Tiers for which a guarantee fired this batch, in draw order, deduped
    pub pity_used: Vec<Rarity>,
    pub guarantee_used: bool,
    pub cost: RollCost,
    pub timing: RollTiming,
}

/// Assemble drawn cards into the final result, updating the player's
/// collection as each card's novelty is decided.
pub fn assemble<S: ProfileStore>(
    player: PlayerId,
    drawn: &[DrawnCard],
    cost: RollCost,
    timing: &TimingConfig,
    store: &mut S,
    rng: &mut ChaCha8Rng,
) -> RollResult {
    let mut cards = Vec::with_capacity(drawn.len());
    let mut pity_used = Vec::new();
    let mut total_reveal: f64 = 0.0;
    let mut peak_intensity: f64 = 0.0;

    for (i, draw) in drawn.iter().enumerate() {
        let position = (i + 1) as u32;
        let tier = draw.resolution.tier;

        // Added to the collection immediately so a duplicate later in the
        // same batch is not flagged new again
        let is_new = !store.owns_card(player, draw.card.id);
        store.add_card(player, draw.card.id);

        let jitter = if timing.jitter_max_ms > 0.0 {
            rng.gen_range(0.0..timing.jitter_max_ms)
        } else {
            0.0
        };
        let delay = timing.base_delay_ms * timing.tier_multiplier(tier)
            + (position - 1) as f64 * timing.stagger_ms
            + jitter;

        let mut intensity = timing.tier_base_intensity(tier);
        if is_new {
            intensity += NEW_CARD_BONUS;
        }
        if draw.resolution.guaranteed {
            intensity += PITY_BONUS;
        }
        let intensity = intensity.clamp(0.0, 1.0);

        if draw.resolution.guaranteed && !pity_used.contains(&tier) {
            pity_used.push(tier);
        }
        total_reveal = total_reveal.max(delay);
        peak_intensity = peak_intensity.max(intensity);

        cards.push(CardRollResult {
            card: draw.card.clone(),
            tier,
            is_new,
            is_pity_result: draw.resolution.guaranteed,
            pity_count_at_draw: draw.resolution.pity_at_draw,
            roll_position: position,
            reveal_delay_ms: delay.round() as u32,
            effect_intensity: intensity,
        });
    }

    let anticipation_hold_ms = if peak_intensity >= ANTICIPATION_THRESHOLD {
        timing.anticipation_hold_ms
    } else {
        0.0
    };

    let guarantee_used = !pity_used.is_empty();
    RollResult {
        total_cards: cards.len() as u32,
        cards,
        pity_used,
        guarantee_used,
        cost,
        timing: RollTiming {
            total_reveal_ms: total_reveal,
            anticipation_hold_ms,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{CardId, Currency};
    use crate::pity::ResolutionPath;
    use crate::store::MemoryProfileStore;
    use rand::SeedableRng;

    fn card(tier: Rarity, name: &str) -> CardRef {
        CardRef {
            id: CardId::new(),
            name: name.to_string(),
            tier,
        }
    }

    fn resolution(tier: Rarity, guaranteed: bool) -> Resolution {
        Resolution {
            tier,
            guaranteed,
            path: if guaranteed {
                ResolutionPath::HardPity
            } else {
                ResolutionPath::Weighted
            },
            pity_at_draw: if guaranteed { 50 } else { 3 },
        }
    }

    fn free_cost() -> RollCost {
        RollCost {
            currency: Currency::Coins,
            amount: 0,
            original_amount: 0,
            discount: 0.0,
        }
    }

    fn setup() -> (MemoryProfileStore, PlayerId, ChaCha8Rng) {
        let mut store = MemoryProfileStore::new();
        let player = PlayerId::new();
        store.create_profile(player);
        (store, player, ChaCha8Rng::seed_from_u64(99))
    }

    #[test]
    fn test_positions_and_delays_stagger() {
        let (mut store, player, mut rng) = setup();
        let timing = TimingConfig {
            jitter_max_ms: 0.0,
            ..TimingConfig::default()
        };
        let drawn: Vec<DrawnCard> = (0..3)
            .map(|i| DrawnCard {
                card: card(Rarity::Common, &format!("C{}", i)),
                resolution: resolution(Rarity::Common, false),
            })
            .collect();

        let result = assemble(player, &drawn, free_cost(), &timing, &mut store, &mut rng);

        assert_eq!(result.total_cards, 3);
        for (i, c) in result.cards.iter().enumerate() {
            assert_eq!(c.roll_position, (i + 1) as u32);
            // base 400 * 1.0 + (pos-1) * 250, no jitter
            assert_eq!(c.reveal_delay_ms, 400 + i as u32 * 250);
        }
        assert!((result.timing.total_reveal_ms - 900.0).abs() < 1e-9);
    }

    #[test]
    fn test_jitter_bounded() {
        let (mut store, player, mut rng) = setup();
        let timing = TimingConfig::default();
        let drawn = vec![DrawnCard {
            card: card(Rarity::Common, "C"),
            resolution: resolution(Rarity::Common, false),
        }];

        for _ in 0..50 {
            let result = assemble(player, &drawn, free_cost(), &timing, &mut store, &mut rng);
            let delay = result.cards[0].reveal_delay_ms as f64;
            assert!(delay >= 400.0);
            assert!(delay < 400.0 + timing.jitter_max_ms + 1.0);
        }
    }

    #[test]
    fn test_intensity_bonuses_and_clamp() {
        let (mut store, player, mut rng) = setup();
        let timing = TimingConfig::default();

        // Ultimate base 0.70, new +0.2, pity +0.3 -> clamped to 1.0
        let drawn = vec![DrawnCard {
            card: card(Rarity::Ultimate, "U"),
            resolution: resolution(Rarity::Ultimate, true),
        }];
        let result = assemble(player, &drawn, free_cost(), &timing, &mut store, &mut rng);
        assert!((result.cards[0].effect_intensity - 1.0).abs() < 1e-12);

        // Common repeat without pity: 0.10 flat
        let repeat = vec![DrawnCard {
            card: CardRef {
                id: result.cards[0].card.id,
                name: "U".into(),
                tier: Rarity::Ultimate,
            },
            resolution: resolution(Rarity::Ultimate, false),
        }];
        let result = assemble(player, &repeat, free_cost(), &timing, &mut store, &mut rng);
        assert!(!result.cards[0].is_new);
        assert!((result.cards[0].effect_intensity - 0.70).abs() < 1e-12);
    }

    #[test]
    fn test_duplicate_within_batch_not_new_twice() {
        let (mut store, player, mut rng) = setup();
        let timing = TimingConfig::default();
        let c = card(Rarity::Rare, "Twin");
        let drawn = vec![
            DrawnCard {
                card: c.clone(),
                resolution: resolution(Rarity::Rare, false),
            },
            DrawnCard {
                card: c,
                resolution: resolution(Rarity::Rare, false),
            },
        ];

        let result = assemble(player, &drawn, free_cost(), &timing, &mut store, &mut rng);
        assert!(result.cards[0].is_new);
        assert!(!result.cards[1].is_new);
    }

    #[test]
    fn test_pity_used_deduped() {
        let (mut store, player, mut rng) = setup();
        let timing = TimingConfig::default();
        let drawn = vec![
            DrawnCard {
                card: card(Rarity::Legendary, "L1"),
                resolution: resolution(Rarity::Legendary, true),
            },
            DrawnCard {
                card: card(Rarity::Legendary, "L2"),
                resolution: resolution(Rarity::Legendary, true),
            },
            DrawnCard {
                card: card(Rarity::Common, "C"),
                resolution: resolution(Rarity::Common, false),
            },
        ];

        let result = assemble(player, &drawn, free_cost(), &timing, &mut store, &mut rng);
        assert_eq!(result.pity_used, vec![Rarity::Legendary]);
        assert!(result.guarantee_used);
        assert!(result.timing.anticipation_hold_ms > 0.0);
    }

    #[test]
    fn test_plain_common_batch_has_no_anticipation_hold() {
        let (mut store, player, mut rng) = setup();
        let timing = TimingConfig::default();
        // Seed the collection so the card is not new (0.10 intensity only)
        let c = card(Rarity::Common, "C");
        store.add_card(player, c.id);
        let drawn = vec![DrawnCard {
            card: c,
            resolution: resolution(Rarity::Common, false),
        }];

        let result = assemble(player, &drawn, free_cost(), &timing, &mut store, &mut rng);
        assert!(!result.guarantee_used);
        assert!(result.pity_used.is_empty());
        assert_eq!(result.timing.anticipation_hold_ms, 0.0);
    }
}
