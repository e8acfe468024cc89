//! Collaborator seams: player profiles and the card catalog
//!
//! The engine is constructed against these traits so tests and the sim
//! binaries can substitute fakes. Durability is the store's problem; the
//! engine treats every mutation as an immediate in-memory effect and never
//! waits on or retries persistence.

use ahash::{AHashMap, AHashSet};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::types::{CardId, CardRef, Currency, PlayerId, Rarity};
use crate::pity::PityLedger;

/// Read/write access to player profiles: balances, pity ledger, collection
pub trait ProfileStore {
    fn has_profile(&self, player: PlayerId) -> bool;

    fn balance(&self, player: PlayerId, currency: Currency) -> u64;

    /// Deduct from a balance. Returns false if the player or funds are
    /// missing; validation makes that unreachable in the engine's main path.
    fn deduct(&mut self, player: PlayerId, currency: Currency, amount: u64) -> bool;

    fn owns_card(&self, player: PlayerId, card: CardId) -> bool;

    fn add_card(&mut self, player: PlayerId, card: CardId);

    fn ledger(&self, player: PlayerId) -> Option<&PityLedger>;

    fn ledger_mut(&mut self, player: PlayerId) -> Option<&mut PityLedger>;
}

/// Read-only card catalog
pub trait CardCatalog {
    /// One uniformly-random card of the tier, None if the tier has no entries
    fn random_card(&self, tier: Rarity, rng: &mut ChaCha8Rng) -> Option<CardRef>;
}

/// A single player's in-memory profile
#[derive(Debug, Clone, Default)]
pub struct PlayerProfile {
    pub balances: AHashMap<Currency, u64>,
    pub ledger: PityLedger,
    pub owned: AHashSet<CardId>,
}

/// In-memory profile store used by the sim binary and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryProfileStore {
    profiles: AHashMap<PlayerId, PlayerProfile>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a zero-initialized profile, replacing any existing one
    pub fn create_profile(&mut self, player: PlayerId) {
        self.profiles.insert(player, PlayerProfile::default());
    }

    pub fn grant(&mut self, player: PlayerId, currency: Currency, amount: u64) {
        if let Some(profile) = self.profiles.get_mut(&player) {
            *profile.balances.entry(currency).or_insert(0) += amount;
        }
    }

    pub fn profile(&self, player: PlayerId) -> Option<&PlayerProfile> {
        self.profiles.get(&player)
    }

    pub fn profile_mut(&mut self, player: PlayerId) -> Option<&mut PlayerProfile> {
        self.profiles.get_mut(&player)
    }
}

impl ProfileStore for MemoryProfileStore {
    fn has_profile(&self, player: PlayerId) -> bool {
        self.profiles.contains_key(&player)
    }

    fn balance(&self, player: PlayerId, currency: Currency) -> u64 {
        self.profiles
            .get(&player)
            .and_then(|p| p.balances.get(&currency))
            .copied()
            .unwrap_or(0)
    }

    fn deduct(&mut self, player: PlayerId, currency: Currency, amount: u64) -> bool {
        let Some(profile) = self.profiles.get_mut(&player) else {
            return false;
        };
        let Some(balance) = profile.balances.get_mut(&currency) else {
            return false;
        };
        if *balance < amount {
            return false;
        }
        *balance -= amount;
        true
    }

    fn owns_card(&self, player: PlayerId, card: CardId) -> bool {
        self.profiles
            .get(&player)
            .map(|p| p.owned.contains(&card))
            .unwrap_or(false)
    }

    fn add_card(&mut self, player: PlayerId, card: CardId) {
        if let Some(profile) = self.profiles.get_mut(&player) {
            profile.owned.insert(card);
        }
    }

    fn ledger(&self, player: PlayerId) -> Option<&PityLedger> {
        self.profiles.get(&player).map(|p| &p.ledger)
    }

    fn ledger_mut(&mut self, player: PlayerId) -> Option<&mut PityLedger> {
        self.profiles.get_mut(&player).map(|p| &mut p.ledger)
    }
}

/// In-memory card catalog keyed by tier
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    by_tier: AHashMap<Rarity, Vec<CardRef>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a card to the catalog, returning its generated id
    pub fn add(&mut self, tier: Rarity, name: impl Into<String>) -> CardId {
        let card = CardRef {
            id: CardId::new(),
            name: name.into(),
            tier,
        };
        let id = card.id;
        self.by_tier.entry(tier).or_default().push(card);
        id
    }

    pub fn tier_size(&self, tier: Rarity) -> usize {
        self.by_tier.get(&tier).map(Vec::len).unwrap_or(0)
    }

    /// A small catalog with a few cards per tier, for sims and tests
    pub fn with_standard_set() -> Self {
        let mut catalog = Self::new();
        for tier in Rarity::ALL {
            for n in 1..=4 {
                catalog.add(tier, format!("{} Relic {}", tier, n));
            }
        }
        catalog
    }
}

impl CardCatalog for MemoryCatalog {
    fn random_card(&self, tier: Rarity, rng: &mut ChaCha8Rng) -> Option<CardRef> {
        let cards = self.by_tier.get(&tier)?;
        if cards.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..cards.len());
        Some(cards[idx].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_deduct_requires_funds() {
        let mut store = MemoryProfileStore::new();
        let player = PlayerId::new();
        store.create_profile(player);
        store.grant(player, Currency::Gems, 100);

        assert!(!store.deduct(player, Currency::Gems, 150));
        assert_eq!(store.balance(player, Currency::Gems), 100);

        assert!(store.deduct(player, Currency::Gems, 60));
        assert_eq!(store.balance(player, Currency::Gems), 40);
    }

    #[test]
    fn test_deduct_unknown_player_fails() {
        let mut store = MemoryProfileStore::new();
        assert!(!store.deduct(PlayerId::new(), Currency::Coins, 1));
    }

    #[test]
    fn test_collection_tracking() {
        let mut store = MemoryProfileStore::new();
        let player = PlayerId::new();
        let card = CardId::new();
        store.create_profile(player);

        assert!(!store.owns_card(player, card));
        store.add_card(player, card);
        assert!(store.owns_card(player, card));
    }

    #[test]
    fn test_new_profile_has_zeroed_ledger() {
        let mut store = MemoryProfileStore::new();
        let player = PlayerId::new();
        store.create_profile(player);

        let ledger = store.ledger(player).unwrap();
        for tier in Rarity::ALL {
            assert_eq!(ledger.count(tier), 0);
        }
    }

    #[test]
    fn test_random_card_stays_in_tier() {
        let catalog = MemoryCatalog::with_standard_set();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            let card = catalog.random_card(Rarity::Epic, &mut rng).unwrap();
            assert_eq!(card.tier, Rarity::Epic);
        }
    }

    #[test]
    fn test_empty_tier_returns_none() {
        let catalog = MemoryCatalog::new();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert!(catalog.random_card(Rarity::Common, &mut rng).is_none());
    }
}
