//! Pity state and rarity resolution
//!
//! The ledger is the only state that survives across rolls; the resolver is a
//! pure function over a ledger snapshot, and the updater is the single place
//! allowed to mutate counters.

pub mod ledger;
pub mod resolver;
pub mod updater;

pub use ledger::PityLedger;
pub use resolver::{resolve, resolve_with, Resolution, ResolutionPath};
