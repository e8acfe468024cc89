//! Relic Vault - Gacha Roll Resolution Engine
//!
//! Resolves card rolls against per-player pity state: soft pity ramps a
//! tier's draw rate the longer a player goes without it, hard pity makes the
//! tier a certainty. The engine is a synchronous pipeline executed once per
//! request; rendering, persistence, and transport live elsewhere.

pub mod config;
pub mod core;
pub mod engine;
pub mod pity;
pub mod store;
