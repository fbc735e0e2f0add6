//! item_core - Crafted items and their combat stats
//!
//! Items are produced outside the combat engine, either by a generative backend
//! (parsed with [`Item::from_generated_json`]) or by the seeded procedural
//! [`ItemGenerator`]. Either way the result is an immutable [`ItemStats`] record.

mod generator;
mod item;
mod loadout;
pub mod types;

pub use generator::{determine_item_kind, effect_power, power_level, ItemGenerator};
pub use item::{GeneratedStats, Item, ItemStats};
pub use loadout::{EquipmentSlot, Loadout};
pub use types::{EffectType, ItemKind, Rarity};

use thiserror::Error;

/// Errors from item parsing and equipment handling
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Malformed generated stats: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown effect type: {0}")]
    UnknownEffect(String),
    #[error("Unknown item kind: {0}")]
    UnknownKind(String),
    #[error("{kind} cannot be equipped in the {slot} slot")]
    SlotMismatch { slot: EquipmentSlot, kind: ItemKind },
    #[error("Cannot craft without materials")]
    NoMaterials,
}
