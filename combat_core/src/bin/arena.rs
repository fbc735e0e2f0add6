//! arena - run a seeded battle between a crafted loadout and an enemy

use anyhow::{Context, Result};
use clap::Parser;
use combat_core::{init_constants, CombatSystem, Fighter, Side};
use item_core::{EquipmentSlot, ItemGenerator, Loadout};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "arena")]
#[command(about = "Craft a loadout from materials and fight a seeded battle")]
#[command(version)]
struct Args {
    /// Seed for item generation and the battle RNG
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Comma-separated crafting materials for the player's items
    #[arg(long, value_delimiter = ',', default_value = "Iron,Wood")]
    player_materials: Vec<String>,

    #[arg(long, default_value_t = 100)]
    player_health: u32,

    /// Enemy base damage
    #[arg(long, default_value_t = 15)]
    enemy_damage: u32,

    /// Enemy base armor
    #[arg(long, default_value_t = 10)]
    enemy_armor: u32,

    #[arg(long, default_value_t = 100)]
    enemy_health: u32,

    /// Combat constants TOML file (defaults are used when omitted)
    #[arg(long)]
    constants: Option<PathBuf>,

    /// Stop after this many turns even if nobody has fallen
    #[arg(long, default_value_t = 200)]
    max_turns: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "combat_core=info,item_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    if let Some(path) = &args.constants {
        init_constants(path)
            .with_context(|| format!("loading combat constants from {}", path.display()))?;
        info!(path = %path.display(), "combat constants loaded");
    }

    let materials: Vec<String> = args
        .player_materials
        .iter()
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .collect();

    let generator = ItemGenerator::new();
    let mut loadout = Loadout::new();
    for (offset, slot) in EquipmentSlot::all().iter().enumerate() {
        let item = generator
            .generate(&materials, Some(slot.accepts()), args.seed.wrapping_add(offset as u64))
            .with_context(|| format!("crafting {} item", slot))?;
        println!("[{}] {}", slot, item);
        for line in item.tooltip_lines() {
            println!("    {}", line);
        }
        loadout.equip(*slot, Some(item))?;
    }
    println!();

    let mut player = Fighter::new("Player", args.player_health);
    player.equip_items(
        loadout.stats(EquipmentSlot::Weapon),
        loadout.stats(EquipmentSlot::Armor),
        loadout.stats(EquipmentSlot::Concoction),
    );
    let enemy = Fighter::new("Enemy", args.enemy_health)
        .with_base_damage(args.enemy_damage)
        .with_base_armor(args.enemy_armor);

    let mut combat = CombatSystem::seeded(player, enemy, args.seed);
    let first = combat.turn_order()[0];
    println!("{} acts first.", combat.fighter(first).name);

    while !combat.is_over() && combat.turn() < args.max_turns {
        for line in combat.execute_turn() {
            println!("{}", line);
        }
    }

    println!();
    for side in [Side::Player, Side::Enemy] {
        let fighter = combat.fighter(side);
        println!(
            "{}: {}/{} HP",
            fighter.name,
            fighter.current_health(),
            fighter.max_health
        );
    }

    match combat.winner() {
        Some(winner) => info!(%winner, turns = combat.turn(), "battle finished"),
        None => println!("No winner after {} turns.", combat.turn()),
    }

    Ok(())
}
