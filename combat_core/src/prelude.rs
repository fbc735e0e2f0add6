//! Prelude module for convenient imports
//!
//! ```rust
//! use combat_core::prelude::*;
//! ```

// Core types
pub use crate::fighter::Fighter;

// Combat
pub use crate::combat::{CombatEvent, CombatLog, CombatState, CombatSystem, Side};

// Effects
pub use crate::effect::{ActiveEffect, EffectCatalog, EffectManager, StatModifiers};

// Config
pub use crate::config::{init_constants, init_constants_default, CombatConstants};

pub use crate::rng::CombatRng;

// Re-exports from item_core
pub use item_core::{EffectType, Item, ItemKind, ItemStats, Loadout, EquipmentSlot};
