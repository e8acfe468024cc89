//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for concrete cards in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub Uuid);

impl CardId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CardId {
    fn default() -> Self {
        Self::new()
    }
}

/// Wall-clock timestamp in milliseconds since the Unix epoch
pub type UnixMillis = u64;

/// Rarity tier for card rolls, declared rarest-first.
///
/// Declaration order is load-bearing: hard-pity scanning, weighted draws, and
/// cascading ledger resets all iterate `Rarity::ALL` in this order, and
/// `is_commoner_than` compares discriminants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rarity {
    Ultimate,
    Mythical,
    Legendary,
    Epic,
    Rare,
    Uncommon,
    Common,
}

impl Rarity {
    pub const COUNT: usize = 7;

    /// All tiers, rarest to commonest
    pub const ALL: [Rarity; Rarity::COUNT] = [
        Rarity::Ultimate,
        Rarity::Mythical,
        Rarity::Legendary,
        Rarity::Epic,
        Rarity::Rare,
        Rarity::Uncommon,
        Rarity::Common,
    ];

    /// Index into per-tier arrays (0 = rarest)
    pub fn rank(self) -> usize {
        self as usize
    }

    /// Returns true if this tier is strictly commoner than the other
    pub fn is_commoner_than(self, other: Rarity) -> bool {
        (self as u8) > (other as u8)
    }

    /// The tier every fallback and catalog substitution lands on
    pub fn commonest() -> Rarity {
        Rarity::Common
    }

    pub fn from_name(s: &str) -> Option<Rarity> {
        match s {
            "ultimate" | "Ultimate" => Some(Rarity::Ultimate),
            "mythical" | "Mythical" => Some(Rarity::Mythical),
            "legendary" | "Legendary" => Some(Rarity::Legendary),
            "epic" | "Epic" => Some(Rarity::Epic),
            "rare" | "Rare" => Some(Rarity::Rare),
            "uncommon" | "Uncommon" => Some(Rarity::Uncommon),
            "common" | "Common" => Some(Rarity::Common),
            _ => None,
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Rarity::Ultimate => "Ultimate",
            Rarity::Mythical => "Mythical",
            Rarity::Legendary => "Legendary",
            Rarity::Epic => "Epic",
            Rarity::Rare => "Rare",
            Rarity::Uncommon => "Uncommon",
            Rarity::Common => "Common",
        };
        write!(f, "{}", name)
    }
}

/// Roll type selects the currency and cost table entry for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RollType {
    Daily,
    Premium,
    Bonus,
    Event,
    Pity,
}

impl RollType {
    pub const ALL: [RollType; 5] = [
        RollType::Daily,
        RollType::Premium,
        RollType::Bonus,
        RollType::Event,
        RollType::Pity,
    ];

    pub fn from_name(s: &str) -> Option<RollType> {
        match s {
            "daily" | "Daily" => Some(RollType::Daily),
            "premium" | "Premium" => Some(RollType::Premium),
            "bonus" | "Bonus" => Some(RollType::Bonus),
            "event" | "Event" => Some(RollType::Event),
            "pity" | "Pity" => Some(RollType::Pity),
            _ => None,
        }
    }
}

/// Currencies the cost table can charge in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    Coins,
    Gems,
    Tickets,
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Currency::Coins => "coins",
            Currency::Gems => "gems",
            Currency::Tickets => "tickets",
        };
        write!(f, "{}", name)
    }
}

/// Reference to a concrete card resolved from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRef {
    pub id: CardId,
    pub name: String,
    pub tier: Rarity,
}

/// A single roll request. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollRequest {
    pub player: PlayerId,
    pub roll_type: RollType,
    pub count: u32,
    pub timestamp: UnixMillis,
}

impl RollRequest {
    pub fn new(player: PlayerId, roll_type: RollType, count: u32, timestamp: UnixMillis) -> Self {
        Self {
            player,
            roll_type,
            count,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rarity_order_rarest_first() {
        // Ultimate is rarest, Common is commonest
        assert_eq!(Rarity::ALL[0], Rarity::Ultimate);
        assert_eq!(Rarity::ALL[Rarity::COUNT - 1], Rarity::Common);
        for pair in Rarity::ALL.windows(2) {
            assert!(pair[1].is_commoner_than(pair[0]));
        }
    }

    #[test]
    fn test_is_commoner_than() {
        assert!(Rarity::Common.is_commoner_than(Rarity::Epic));
        assert!(Rarity::Rare.is_commoner_than(Rarity::Legendary));
        assert!(!Rarity::Legendary.is_commoner_than(Rarity::Rare));
        assert!(!Rarity::Epic.is_commoner_than(Rarity::Epic));
    }

    #[test]
    fn test_rank_matches_all_index() {
        for (i, tier) in Rarity::ALL.iter().enumerate() {
            assert_eq!(tier.rank(), i);
        }
    }

    #[test]
    fn test_rarity_from_name_round_trip() {
        for tier in Rarity::ALL {
            assert_eq!(Rarity::from_name(&tier.to_string()), Some(tier));
        }
        assert_eq!(Rarity::from_name("Shiny"), None);
    }

    #[test]
    fn test_player_id_hash() {
        use std::collections::HashMap;
        let id = PlayerId::new();
        let mut map: HashMap<PlayerId, &str> = HashMap::new();
        map.insert(id, "whale");
        assert_eq!(map.get(&id), Some(&"whale"));
    }
}
