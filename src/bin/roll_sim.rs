//! Roll distribution simulator
//!
//! Runs a seeded engine for thousands of rolls against the in-memory store
//! and prints the observed tier distribution next to the configured base
//! rates, plus pity trigger counts. Used for tuning drop tables.

use std::path::PathBuf;

use clap::Parser;

use relic_vault::config::{loader, EngineConfig};
use relic_vault::core::types::{Currency, PlayerId, Rarity, RollRequest, RollType};
use relic_vault::engine::RollEngine;
use relic_vault::store::{MemoryCatalog, MemoryProfileStore, ProfileStore};

#[derive(Parser, Debug)]
#[command(name = "roll_sim", about = "Simulate gacha rolls and print tier distribution")]
struct Args {
    /// Number of single-card rolls to simulate
    #[arg(long, default_value_t = 10_000)]
    rolls: u64,

    /// RNG seed for the engine
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Optional TOML config overriding the default tables
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("relic_vault=info")
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match loader::load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config: {}", e);
                std::process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };

    let player = PlayerId::new();
    let mut store = MemoryProfileStore::new();
    store.create_profile(player);
    // Enough of everything that cost never interferes with the sim
    for currency in [Currency::Coins, Currency::Gems, Currency::Tickets] {
        store.grant(player, currency, u64::MAX / 4);
    }

    let catalog = MemoryCatalog::with_standard_set();
    let mut engine = RollEngine::new(config, store, catalog, args.seed);

    let mut histogram = [0u64; Rarity::COUNT];
    let mut pity_fires = [0u64; Rarity::COUNT];
    let mut timestamp: u64 = 1_000_000;

    for _ in 0..args.rolls {
        let request = RollRequest::new(player, RollType::Premium, 1, timestamp);
        timestamp += 1000;

        let response = engine.roll_cards(&request);
        let Some(result) = response.data else {
            eprintln!("roll failed: {}", response.error.unwrap_or_default());
            std::process::exit(1);
        };
        for card in &result.cards {
            histogram[card.tier.rank()] += 1;
        }
        for tier in &result.pity_used {
            pity_fires[tier.rank()] += 1;
        }
    }

    println!("\n=== {} rolls, seed {} ===", args.rolls, args.seed);
    println!(
        "{:<10} {:>8} {:>10} {:>10} {:>8}",
        "tier", "draws", "observed", "base", "pity"
    );
    for tier in Rarity::ALL {
        let draws = histogram[tier.rank()];
        let observed = draws as f64 / args.rolls as f64;
        let base = engine.config().pity.get(tier).base_rate;
        println!(
            "{:<10} {:>8} {:>9.4}% {:>9.4}% {:>8}",
            tier.to_string(),
            draws,
            observed * 100.0,
            base * 100.0,
            pity_fires[tier.rank()],
        );
    }

    if let Some(stats) = engine.statistics(player) {
        println!(
            "\npity usage rate: {:.4}  engagement: {:.4}",
            stats.pity_usage_rate, stats.engagement_score
        );
    }

    let ledger = engine.store().ledger(player).expect("player profile");
    println!("final pity counters:");
    for tier in Rarity::ALL {
        println!("  {:<10} {}", tier.to_string(), ledger.count(tier));
    }
}
