//! The roll resolution pipeline
//!
//! One synchronous pass per request: validate, then per card resolve a tier,
//! commit the ledger, and pick a concrete card; finally charge, assemble the
//! result, and fold it into statistics. There is no suspension point between
//! resolution and ledger commit, and `&mut self` enforces single-writer
//! access: callers serving one player from multiple threads wrap the engine
//! (or a per-player shard of engines) in a mutex.

pub mod outcome;
pub mod selector;
pub mod stats;
pub mod validator;

use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::core::error::ValidationError;
use crate::core::types::{PlayerId, RollRequest};
use crate::engine::outcome::{DrawnCard, RollResult};
use crate::engine::stats::{RollStatistics, RollStatisticsTracker};
use crate::engine::validator::RollRequestValidator;
use crate::pity::{self, ResolutionPath};
use crate::store::{CardCatalog, ProfileStore};

/// Response envelope for one roll request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollResponse {
    pub success: bool,
    pub data: Option<RollResult>,
    pub error: Option<String>,
    pub processing_time_ms: f64,
}

impl RollResponse {
    fn succeeded(result: RollResult, started: Instant) -> Self {
        Self {
            success: true,
            data: Some(result),
            error: None,
            processing_time_ms: started.elapsed().as_secs_f64() * 1000.0,
        }
    }

    fn rejected(reason: String, started: Instant) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(reason),
            processing_time_ms: started.elapsed().as_secs_f64() * 1000.0,
        }
    }
}

/// The gacha roll resolution engine.
///
/// Constructed with explicit references to its collaborators so tests can
/// substitute fakes; there are no global registries. The config table is
/// read-only after boot.
pub struct RollEngine<S: ProfileStore, C: CardCatalog> {
    config: EngineConfig,
    store: S,
    catalog: C,
    rng: ChaCha8Rng,
    validator: RollRequestValidator,
    stats: RollStatisticsTracker,
}

impl<S: ProfileStore, C: CardCatalog> RollEngine<S, C> {
    pub fn new(config: EngineConfig, store: S, catalog: C, seed: u64) -> Self {
        config.pity.boot_check();
        tracing::info!(seed, "roll engine initialized");
        Self {
            config,
            store,
            catalog,
            rng: ChaCha8Rng::seed_from_u64(seed),
            validator: RollRequestValidator::new(),
            stats: RollStatisticsTracker::new(),
        }
    }

    /// Resolve one roll request end to end.
    ///
    /// Validation failures return `success = false` with a reason and mutate
    /// nothing. Past validation a roll always succeeds: catalog gaps are
    /// recovered internally and durability is the store's problem.
    pub fn roll_cards(&mut self, request: &RollRequest) -> RollResponse {
        let started = Instant::now();

        let cost = match self
            .validator
            .validate(request, &self.store, &self.config.costs)
        {
            Ok(cost) => cost,
            Err(reason) => {
                tracing::debug!(player = ?request.player, %reason, "roll rejected");
                return RollResponse::rejected(reason.to_string(), started);
            }
        };

        let mut drawn = Vec::with_capacity(request.count as usize);
        for _ in 0..request.count {
            let Some(ledger) = self.store.ledger(request.player) else {
                // Unreachable after validation; kept as a guard rather than
                // an unwrap so a store bug degrades into a rejected roll
                return RollResponse::rejected(
                    ValidationError::NoProfile(request.player).to_string(),
                    started,
                );
            };

            let resolution =
                pity::resolve_with(ledger, &self.config.pity, || self.rng.gen::<f64>());

            // Ledger commit happens before anything can observe the result
            let reset = resolution.path != ResolutionPath::Fallback;
            if let Some(ledger) = self.store.ledger_mut(request.player) {
                pity::updater::apply(ledger, resolution.tier, reset);
            }

            let card = selector::select_card(&self.catalog, resolution.tier, &mut self.rng);
            drawn.push(DrawnCard { card, resolution });
        }

        if !self.store.deduct(request.player, cost.currency, cost.amount) {
            // Validation checked funds and nothing in between spends them
            tracing::warn!(player = ?request.player, "deduct failed after validation passed");
        }

        let result = outcome::assemble(
            request.player,
            &drawn,
            cost,
            &self.config.timing,
            &mut self.store,
            &mut self.rng,
        );
        self.stats.record(request.player, &result);

        tracing::debug!(
            player = ?request.player,
            count = request.count,
            guarantee = result.guarantee_used,
            "roll resolved"
        );
        RollResponse::succeeded(result, started)
    }

    pub fn statistics(&self, player: PlayerId) -> Option<&RollStatistics> {
        self.stats.get(player)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Currency, RollType};
    use crate::store::{MemoryCatalog, MemoryProfileStore};

    fn engine() -> (RollEngine<MemoryProfileStore, MemoryCatalog>, PlayerId) {
        let mut store = MemoryProfileStore::new();
        let player = PlayerId::new();
        store.create_profile(player);
        store.grant(player, Currency::Gems, 1_000_000);
        let engine = RollEngine::new(
            EngineConfig::default(),
            store,
            MemoryCatalog::with_standard_set(),
            42,
        );
        (engine, player)
    }

    #[test]
    fn test_successful_roll_returns_requested_count() {
        let (mut engine, player) = engine();
        let request = RollRequest::new(player, RollType::Premium, 10, 10_000);

        let response = engine.roll_cards(&request);
        assert!(response.success);
        assert!(response.error.is_none());
        let result = response.data.unwrap();
        assert_eq!(result.total_cards, 10);
        assert_eq!(result.cards.len(), 10);
        for (i, card) in result.cards.iter().enumerate() {
            assert_eq!(card.roll_position, (i + 1) as u32);
        }
    }

    #[test]
    fn test_cost_charged_once_per_batch() {
        let (mut engine, player) = engine();
        let before = engine.store().balance(player, Currency::Gems);

        let request = RollRequest::new(player, RollType::Premium, 10, 10_000);
        let response = engine.roll_cards(&request);
        let cost = response.data.unwrap().cost;

        let after = engine.store().balance(player, Currency::Gems);
        assert_eq!(before - after, cost.amount);
        assert_eq!(cost.amount, 1440);
        assert_eq!(cost.original_amount, 1600);
    }

    #[test]
    fn test_rejected_roll_mutates_nothing() {
        let (mut engine, player) = engine();
        // Burn the throttle with a first roll
        let first = RollRequest::new(player, RollType::Premium, 1, 10_000);
        assert!(engine.roll_cards(&first).success);

        let ledger_before = *engine.store().ledger(player).unwrap();
        let balance_before = engine.store().balance(player, Currency::Gems);
        let stats_before = engine.statistics(player).cloned();

        let too_soon = RollRequest::new(player, RollType::Premium, 1, 10_500);
        let response = engine.roll_cards(&too_soon);
        assert!(!response.success);
        assert!(response.error.unwrap().contains("Rate limited"));

        assert_eq!(*engine.store().ledger(player).unwrap(), ledger_before);
        assert_eq!(engine.store().balance(player, Currency::Gems), balance_before);
        assert_eq!(engine.statistics(player).cloned(), stats_before);
    }

    #[test]
    fn test_hard_pity_guarantee_end_to_end() {
        let (mut engine, player) = engine();
        engine
            .store_mut()
            .ledger_mut(player)
            .unwrap()
            .set_count(crate::core::types::Rarity::Legendary, 50);

        let request = RollRequest::new(player, RollType::Premium, 1, 10_000);
        let response = engine.roll_cards(&request);
        let result = response.data.unwrap();

        assert!(result.guarantee_used);
        assert_eq!(result.cards[0].tier, crate::core::types::Rarity::Legendary);
        assert!(result.cards[0].is_pity_result);
        assert_eq!(result.cards[0].pity_count_at_draw, 50);
        // Cascading reset cleared the counter
        assert_eq!(
            engine
                .store()
                .ledger(player)
                .unwrap()
                .count(crate::core::types::Rarity::Legendary),
            0
        );
    }

    #[test]
    fn test_statistics_recorded_per_card() {
        let (mut engine, player) = engine();
        let request = RollRequest::new(player, RollType::Premium, 10, 10_000);
        engine.roll_cards(&request);

        let stats = engine.statistics(player).unwrap();
        assert_eq!(stats.total_rolls, 10);
    }

    #[test]
    fn test_seeded_engines_are_deterministic() {
        let build = || {
            let mut store = MemoryProfileStore::new();
            let player = PlayerId(uuid::Uuid::from_u128(7));
            store.create_profile(player);
            store.grant(player, Currency::Gems, 1_000_000);
            let engine = RollEngine::new(
                EngineConfig::default(),
                store,
                MemoryCatalog::with_standard_set(),
                1234,
            );
            (engine, player)
        };

        let (mut a, player_a) = build();
        let (mut b, player_b) = build();

        let req_a = RollRequest::new(player_a, RollType::Premium, 10, 10_000);
        let req_b = RollRequest::new(player_b, RollType::Premium, 10, 10_000);
        let tiers_a: Vec<_> = a.roll_cards(&req_a).data.unwrap().cards.iter().map(|c| c.tier).collect();
        let tiers_b: Vec<_> = b.roll_cards(&req_b).data.unwrap().cards.iter().map(|c| c.tier).collect();
        assert_eq!(tiers_a, tiers_b);
    }
}
