//! Rarity resolution: one ledger snapshot + one uniform draw -> one tier
//!
//! Pure function. Hard pity is checked first against the explicit
//! rarest-first tier order so simultaneous hard pities resolve
//! deterministically toward the rarer tier; the random draw is only consumed
//! by the weighted pass.

use crate::config::PityConfigTable;
use crate::core::types::Rarity;
use crate::pity::ledger::PityLedger;

/// Which branch of the resolver produced the outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPath {
    /// Counter reached the hard limit; probability never gets a say
    HardPity,
    /// Won the weighted draw
    Weighted,
    /// Draw exceeded the summed rates of the draw order; commonest tier
    Fallback,
}

/// Outcome of resolving a single card draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub tier: Rarity,
    /// True when pity forced or strongly favored the outcome: hard pity, or
    /// a weighted win while the tier's soft-pity ramp was active
    pub guaranteed: bool,
    pub path: ResolutionPath,
    /// The won tier's counter at the moment of the draw, before any reset
    pub pity_at_draw: u32,
}

/// Resolve one draw. `draw` must be uniform in [0, 1).
pub fn resolve(ledger: &PityLedger, table: &PityConfigTable, draw: f64) -> Resolution {
    resolve_with(ledger, table, || draw)
}

/// Resolve with a lazily-supplied draw.
///
/// The hard-pity branch never calls `draw_fn`: an absolute promise consumes
/// no randomness, which keeps a seeded RNG stream identical whether or not a
/// guarantee fired.
pub fn resolve_with<F>(ledger: &PityLedger, table: &PityConfigTable, draw_fn: F) -> Resolution
where
    F: FnOnce() -> f64,
{
    // Hard pity scan, rarest first
    for tier in Rarity::ALL {
        let config = table.get(tier);
        let pity = ledger.count(tier);
        if config.hard_pity_reached(pity) {
            return Resolution {
                tier,
                guaranteed: true,
                path: ResolutionPath::HardPity,
                pity_at_draw: pity,
            };
        }
    }

    let draw = draw_fn();

    // Weighted draw over the explicit draw order
    let mut cumulative = 0.0;
    for &tier in &table.draw_order {
        let config = table.get(tier);
        let pity = ledger.count(tier);
        cumulative += config.current_rate(pity);
        if draw <= cumulative {
            return Resolution {
                tier,
                guaranteed: config.soft_pity_active(pity),
                path: ResolutionPath::Weighted,
                pity_at_draw: pity,
            };
        }
    }

    // Draw landed past every listed tier. Reachable when the draw order is a
    // strict subset of the configured tiers, or through float accumulation.
    let commonest = Rarity::commonest();
    Resolution {
        tier: commonest,
        guaranteed: false,
        path: ResolutionPath::Fallback,
        pity_at_draw: ledger.count(commonest),
    }
}
