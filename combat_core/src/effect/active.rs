use item_core::EffectType;
use serde::{Deserialize, Serialize};

use super::catalog::EffectCatalog;

/// Duration given to battle-long passive effects such as equipped shields
pub const PASSIVE_DURATION: i32 = i32::MAX;

/// A timed effect currently affecting a fighter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub effect_type: EffectType,
    /// Flat damage per turn for DoTs, fraction for freeze, flat armor for shield
    pub power: f64,
    /// Turns left; the effect is removed as soon as this reaches 0
    pub remaining_duration: i32,
    /// Name of the fighter who applied it
    pub source_name: String,
    pub stacks: u32,
}

impl ActiveEffect {
    pub fn new(
        effect_type: EffectType,
        power: f64,
        duration: i32,
        source_name: impl Into<String>,
    ) -> Self {
        ActiveEffect {
            effect_type,
            power,
            remaining_duration: duration,
            source_name: source_name.into(),
            stacks: 1,
        }
    }

    /// Effect with its catalog duration
    pub fn from_catalog(effect_type: EffectType, power: f64, source_name: impl Into<String>) -> Self {
        let duration = EffectCatalog::base_duration(effect_type) as i32;
        Self::new(effect_type, power, duration, source_name)
    }

    /// Effect that lasts for the whole battle
    pub fn passive(effect_type: EffectType, power: f64, source_name: impl Into<String>) -> Self {
        Self::new(effect_type, power, PASSIVE_DURATION, source_name)
    }

    /// Damage this effect deals per tick at its current stacks
    pub fn tick_damage(&self) -> u32 {
        if !self.effect_type.is_damage_over_time() {
            return 0;
        }
        let damage = self.power * self.stacks as f64;
        if damage.is_finite() && damage > 0.0 {
            damage.floor().min(u32::MAX as f64) as u32
        } else {
            0
        }
    }

    /// Advance one turn, returning the damage dealt and a log line for DoTs
    pub fn tick(&mut self) -> (u32, Option<String>) {
        self.remaining_duration = self.remaining_duration.saturating_sub(1);

        if self.effect_type.is_damage_over_time() {
            let damage = self.tick_damage();
            let name = EffectCatalog::get(self.effect_type).name;
            (damage, Some(format!("{} deals {} damage!", name, damage)))
        } else {
            (0, None)
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_duration <= 0
    }
}
