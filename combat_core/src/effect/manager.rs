use item_core::EffectType;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::active::ActiveEffect;
use super::catalog::{EffectCatalog, StackingPolicy};

/// Derived stat changes from active effects
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatModifiers {
    pub damage_multiplier: f64,
    pub speed_multiplier: f64,
    pub armor_bonus: u32,
    pub damage_reduction: f64,
}

impl Default for StatModifiers {
    fn default() -> Self {
        StatModifiers {
            damage_multiplier: 1.0,
            speed_multiplier: 1.0,
            armor_bonus: 0,
            damage_reduction: 0.0,
        }
    }
}

/// What happened when an effect was added
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectApplication {
    /// No entry of this type existed
    Added,
    /// Existing entry gained a stack (new stack count)
    Stacked(u32),
    /// Existing entry kept its stacks; duration is now the max of old and new
    Refreshed,
}

/// Result of processing one turn of effects
#[derive(Debug, Clone, Default)]
pub struct TickResult {
    /// Total DoT damage dealt this tick
    pub total_damage: u32,
    /// One line per damaging effect, in insertion order
    pub messages: Vec<String>,
    /// Damage per DoT effect, parallel to `messages`
    pub ticks: Vec<(EffectType, u32)>,
    /// Effects removed because they ran out
    pub expired: Vec<EffectType>,
}

/// Per-fighter set of active effects
///
/// Holds at most one entry per effect type, in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectManager {
    effects: Vec<ActiveEffect>,
}

impl EffectManager {
    pub fn new() -> Self {
        EffectManager::default()
    }

    /// Add an effect, stacking or refreshing an existing entry of the same type
    pub fn add_effect(&mut self, effect: ActiveEffect) -> EffectApplication {
        if let Some(existing) = self
            .effects
            .iter_mut()
            .find(|e| e.effect_type == effect.effect_type)
        {
            existing.remaining_duration = existing
                .remaining_duration
                .max(effect.remaining_duration);
            return match EffectCatalog::stacking(effect.effect_type) {
                StackingPolicy::Stack => {
                    existing.stacks = existing.stacks.saturating_add(1);
                    EffectApplication::Stacked(existing.stacks)
                }
                StackingPolicy::Refresh => EffectApplication::Refreshed,
            };
        }

        self.effects.push(effect);
        EffectApplication::Added
    }

    /// Tick every effect once and drop the ones that ran out
    ///
    /// Never touches health: the caller applies `total_damage`.
    pub fn process_turn(&mut self) -> TickResult {
        let mut result = TickResult::default();

        for effect in &mut self.effects {
            let (damage, message) = effect.tick();
            result.total_damage = result.total_damage.saturating_add(damage);
            if let Some(message) = message {
                result.messages.push(message);
                result.ticks.push((effect.effect_type, damage));
            }
            trace!(
                effect = %effect.effect_type,
                damage,
                remaining = effect.remaining_duration,
                "effect ticked"
            );
        }

        self.effects.retain(|effect| {
            if effect.is_expired() {
                result.expired.push(effect.effect_type);
                false
            } else {
                true
            }
        });

        result
    }

    /// Stat changes from all active effects
    pub fn stat_modifiers(&self) -> StatModifiers {
        let mut modifiers = StatModifiers::default();

        for effect in &self.effects {
            match effect.effect_type {
                EffectType::Freeze => {
                    modifiers.speed_multiplier *= (1.0 - effect.power).clamp(0.0, 1.0);
                }
                EffectType::Shield => {
                    if effect.power.is_finite() && effect.power > 0.0 {
                        modifiers.armor_bonus = modifiers
                            .armor_bonus
                            .saturating_add(effect.power.min(u32::MAX as f64) as u32);
                    }
                }
                EffectType::Fire
                | EffectType::Poison
                | EffectType::Bleed
                | EffectType::Lightning
                | EffectType::Lifesteal
                | EffectType::Vampiric
                | EffectType::Critical
                | EffectType::Reflect => {}
            }
        }

        modifiers
    }

    pub fn has_effect(&self, effect_type: EffectType) -> bool {
        self.effects.iter().any(|e| e.effect_type == effect_type)
    }

    /// Power of an active effect, 0.0 if absent
    pub fn effect_power(&self, effect_type: EffectType) -> f64 {
        self.get(effect_type).map(|e| e.power).unwrap_or(0.0)
    }

    pub fn get(&self, effect_type: EffectType) -> Option<&ActiveEffect> {
        self.effects.iter().find(|e| e.effect_type == effect_type)
    }

    /// Active effects in insertion order
    pub fn effects(&self) -> &[ActiveEffect] {
        &self.effects
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}
