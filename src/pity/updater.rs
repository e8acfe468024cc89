//! Ledger commit rule applied once per card draw
//!
//! Invoked immediately after resolution, before the result is assembled, so
//! no observer ever sees a resolved tier with an uncommitted ledger.

use crate::core::types::Rarity;
use crate::pity::ledger::PityLedger;

/// Apply the post-resolution ledger rule.
///
/// `reset = true` is the path for every tier the resolver chose, whether via
/// hard pity or the weighted draw: the won tier and every strictly commoner
/// tier are zeroed, rarer tiers are untouched (cascading-downward reset, a
/// deliberate monetization pattern). `reset = false` is only reachable from
/// the resolver's fallback path and increments every tier except the
/// fallback tier itself.
pub fn apply(ledger: &mut PityLedger, won_tier: Rarity, reset: bool) {
    if reset {
        for tier in Rarity::ALL {
            if tier == won_tier || tier.is_commoner_than(won_tier) {
                ledger.clear(tier);
            }
        }
    } else {
        for tier in Rarity::ALL {
            if tier != won_tier {
                ledger.bump(tier);
            }
        }
    }
}
