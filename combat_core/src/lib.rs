//! combat_core - Turn-based combat engine for crafted items
//!
//! This library provides:
//! - Fighter: a combatant whose stats derive from base values, equipped
//!   items and active effects
//! - EffectManager: timed effects with stacking and refresh rules
//! - CombatSystem: the turn loop, with an injectable RNG
//! - CombatLog: typed events plus the rendered battle log
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use combat_core::prelude::*;
//! use item_core::ItemGenerator;
//!
//! let materials = vec!["Iron".to_string(), "Dragon Shard".to_string()];
//! let sword = ItemGenerator::new().generate(&materials, Some(ItemKind::Weapon), 42)?;
//!
//! let mut player = Fighter::new("Player", 100);
//! player.equip_items(Some(sword.stats), None, None);
//! let enemy = Fighter::new("Enemy", 100).with_base_damage(15).with_base_armor(10);
//!
//! let mut combat = CombatSystem::seeded(player, enemy, 42);
//! while !combat.is_over() {
//!     for line in combat.execute_turn() {
//!         println!("{}", line);
//!     }
//! }
//! ```

pub mod combat;
pub mod config;
pub mod effect;
pub mod fighter;
pub mod prelude;
pub mod rng;

// Core API
pub use combat::{CombatEvent, CombatLog, CombatState, CombatSystem, LogEntry, Side};
pub use fighter::Fighter;

// Effects
pub use effect::{ActiveEffect, EffectCatalog, EffectManager, StatModifiers};

// Configuration
pub use config::{constants, init_constants, init_constants_default, CombatConstants, ConfigError};

pub use rng::CombatRng;

// Re-export commonly needed item_core types
pub use item_core::{EffectType, Item, ItemKind, ItemStats, Rarity};
