use thiserror::Error;

use crate::core::types::{Currency, PlayerId, RollType};

/// Reasons a roll request is rejected before any resolution happens.
///
/// Validation failures are terminal and user-visible; nothing downstream of
/// the validator runs, and no ledger, economy, or statistics state changes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("No profile found for player {0:?}")]
    NoProfile(PlayerId),

    #[error("Insufficient funds: need {needed} {currency}, have {available}")]
    InsufficientFunds {
        currency: Currency,
        needed: u64,
        available: u64,
    },

    #[error("Rate limited: next roll allowed in {remaining_ms}ms")]
    RateLimited { remaining_ms: u64 },

    #[error("No cost entry for roll type {0:?}")]
    UnknownRollType(RollType),

    #[error("Invalid card count: {0}")]
    InvalidCount(u32),
}

#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VaultError>;
