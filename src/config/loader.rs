//! Load engine config overrides from TOML files
//!
//! Defaults are compiled in; a config file only needs to name the fields it
//! changes. Unknown tiers or roll types are hard errors so typos do not
//! silently ship default drop rates.

use std::fs;
use std::path::Path;

use crate::config::{CostEntry, EngineConfig, PityConfig};
use crate::core::error::{Result, VaultError};
use crate::core::types::{Currency, Rarity, RollType};

/// Load an [`EngineConfig`] from a TOML file, applied over defaults
pub fn load_config(path: &Path) -> Result<EngineConfig> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse TOML overrides over the default config
pub fn parse_config(content: &str) -> Result<EngineConfig> {
    let toml: toml::Value = content
        .parse()
        .map_err(|e| VaultError::Config(format!("Invalid TOML: {}", e)))?;

    let mut config = EngineConfig::default();

    if let Some(pity) = toml.get("pity").and_then(|v| v.as_table()) {
        for (name, value) in pity {
            let tier = Rarity::from_name(name)
                .ok_or_else(|| VaultError::Config(format!("Unknown tier '{}'", name)))?;
            let table = value
                .as_table()
                .ok_or_else(|| VaultError::Config(format!("[pity.{}] is not a table", name)))?;
            let base = *config.pity.get(tier);
            config.pity.set(tier, parse_pity_entry(table, base));
        }
    }

    if let Some(order) = toml.get("draw_order").and_then(|v| v.as_array()) {
        let mut draw_order = Vec::with_capacity(order.len());
        for entry in order {
            let name = entry
                .as_str()
                .ok_or_else(|| VaultError::Config("draw_order entries must be strings".into()))?;
            let tier = Rarity::from_name(name)
                .ok_or_else(|| VaultError::Config(format!("Unknown tier '{}'", name)))?;
            draw_order.push(tier);
        }
        config.pity.draw_order = draw_order;
    }

    if let Some(costs) = toml.get("costs").and_then(|v| v.as_table()) {
        for (name, value) in costs {
            let roll_type = RollType::from_name(name)
                .ok_or_else(|| VaultError::Config(format!("Unknown roll type '{}'", name)))?;
            let table = value
                .as_table()
                .ok_or_else(|| VaultError::Config(format!("[costs.{}] is not a table", name)))?;
            config.costs.set(roll_type, parse_cost_entry(table, name)?);
        }
    }

    if let Some(timing) = toml.get("timing").and_then(|v| v.as_table()) {
        let t = &mut config.timing;
        if let Some(v) = timing.get("base_delay_ms").and_then(|v| v.as_float()) {
            t.base_delay_ms = v;
        }
        if let Some(v) = timing.get("stagger_ms").and_then(|v| v.as_float()) {
            t.stagger_ms = v;
        }
        if let Some(v) = timing.get("jitter_max_ms").and_then(|v| v.as_float()) {
            t.jitter_max_ms = v;
        }
        if let Some(v) = timing.get("anticipation_hold_ms").and_then(|v| v.as_float()) {
            t.anticipation_hold_ms = v;
        }
    }

    Ok(config)
}

fn parse_pity_entry(table: &toml::value::Table, base: PityConfig) -> PityConfig {
    let mut config = base;
    if let Some(v) = table.get("soft_pity_start").and_then(|v| v.as_integer()) {
        config.soft_pity_start = v as u32;
    }
    if let Some(v) = table.get("hard_pity_limit").and_then(|v| v.as_integer()) {
        config.hard_pity_limit = v as u32;
    }
    if let Some(v) = table.get("soft_pity_increase").and_then(|v| v.as_float()) {
        config.soft_pity_increase = v;
    }
    if let Some(v) = table.get("base_rate").and_then(|v| v.as_float()) {
        config.base_rate = v;
    }
    if let Some(v) = table.get("max_rate").and_then(|v| v.as_float()) {
        config.max_rate = v;
    }
    config
}

fn parse_cost_entry(table: &toml::value::Table, name: &str) -> Result<CostEntry> {
    let currency_str = table
        .get("currency")
        .and_then(|v| v.as_str())
        .ok_or_else(|| VaultError::Config(format!("[costs.{}] missing currency", name)))?;
    let currency = parse_currency(currency_str)
        .ok_or_else(|| VaultError::Config(format!("Unknown currency '{}'", currency_str)))?;
    let per_card = table
        .get("per_card")
        .and_then(|v| v.as_integer())
        .ok_or_else(|| VaultError::Config(format!("[costs.{}] missing per_card", name)))?;
    Ok(CostEntry {
        currency,
        per_card: per_card as u64,
    })
}

fn parse_currency(s: &str) -> Option<Currency> {
    match s {
        "coins" | "Coins" => Some(Currency::Coins),
        "gems" | "Gems" => Some(Currency::Gems),
        "tickets" | "Tickets" => Some(Currency::Tickets),
        _ => None,
    }
}
