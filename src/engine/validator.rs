//! Request validation and per-player throttling
//!
//! Everything here runs before any resolution: a rejected request must leave
//! the ledger, economy, and statistics byte-for-byte unchanged.

use ahash::AHashMap;

use crate::config::{CostTable, RollCost, COOLDOWN_MS, MAX_BATCH};
use crate::core::error::ValidationError;
use crate::core::types::{PlayerId, RollRequest, UnixMillis};
use crate::store::ProfileStore;

/// Validates roll requests and tracks per-player throttle timestamps.
///
/// The last-roll timestamp is recorded as soon as validation passes. That is
/// a pure throttle, not a transaction gate: it sticks even though nothing
/// downstream of validation can fail anyway.
#[derive(Debug, Default)]
pub struct RollRequestValidator {
    last_roll: AHashMap<PlayerId, UnixMillis>,
}

impl RollRequestValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check a request in order: profile, roll type, count, funds, cooldown.
    /// Returns the resolved cost on success and records the throttle stamp.
    pub fn validate<S: ProfileStore>(
        &mut self,
        request: &RollRequest,
        store: &S,
        costs: &CostTable,
    ) -> Result<RollCost, ValidationError> {
        if !store.has_profile(request.player) {
            return Err(ValidationError::NoProfile(request.player));
        }

        if costs.entry(request.roll_type).is_none() {
            return Err(ValidationError::UnknownRollType(request.roll_type));
        }

        if request.count == 0 || request.count > MAX_BATCH {
            return Err(ValidationError::InvalidCount(request.count));
        }

        // Entry existence checked above, so this cannot be None
        let cost = costs
            .roll_cost(request.roll_type, request.count)
            .ok_or(ValidationError::UnknownRollType(request.roll_type))?;

        let available = store.balance(request.player, cost.currency);
        if available < cost.amount {
            return Err(ValidationError::InsufficientFunds {
                currency: cost.currency,
                needed: cost.amount,
                available,
            });
        }

        if let Some(&last) = self.last_roll.get(&request.player) {
            let allowed_at = last + COOLDOWN_MS;
            if request.timestamp < allowed_at {
                return Err(ValidationError::RateLimited {
                    remaining_ms: allowed_at - request.timestamp,
                });
            }
        }

        self.last_roll.insert(request.player, request.timestamp);
        Ok(cost)
    }

    /// Last validated roll timestamp for a player, if any
    pub fn last_roll(&self, player: PlayerId) -> Option<UnixMillis> {
        self.last_roll.get(&player).copied()
    }
}
