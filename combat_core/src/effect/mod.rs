//! Effect system: catalog, timed effects and per-fighter management

mod active;
mod catalog;
mod manager;

pub use active::{ActiveEffect, PASSIVE_DURATION};
pub use catalog::{EffectCatalog, EffectCategory, EffectInfo, StackingPolicy};
pub use manager::{EffectApplication, EffectManager, StatModifiers, TickResult};
