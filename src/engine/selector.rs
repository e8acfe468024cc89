//! Concrete card selection with commonest-tier fallback

use rand_chacha::ChaCha8Rng;

use crate::core::types::{CardId, CardRef, Rarity};
use crate::store::CardCatalog;

/// Pick a uniformly-random card of the resolved tier.
///
/// An empty tier is a content bug, not a player-facing error: the roll
/// already resolved, so we log and substitute the commonest tier's catalog.
/// A completely empty catalog still yields a placeholder card.
pub fn select_card<C: CardCatalog>(catalog: &C, tier: Rarity, rng: &mut ChaCha8Rng) -> CardRef {
    if let Some(card) = catalog.random_card(tier, rng) {
        return card;
    }

    let commonest = Rarity::commonest();
    tracing::warn!(%tier, "catalog has no cards for tier, substituting {}", commonest);

    if let Some(card) = catalog.random_card(commonest, rng) {
        return card;
    }

    tracing::warn!("catalog empty for {} as well, issuing placeholder card", commonest);
    CardRef {
        id: CardId::new(),
        name: "Unmarked Relic".to_string(),
        tier: commonest,
    }
}
