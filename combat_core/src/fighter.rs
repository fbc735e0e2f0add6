//! Fighter - a combat participant with derived stats

use item_core::{EffectType, ItemStats};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::constants;
use crate::effect::{ActiveEffect, EffectManager};

/// Base damage of an unarmed fighter
pub const DEFAULT_BASE_DAMAGE: u32 = 5;

/// A combat participant
///
/// Derived stats combine base values, equipped item stats and active effects.
/// Health only decreases through [`Fighter::take_damage`] (armor mitigated)
/// or [`Fighter::take_true_damage`] (DoT and reflect).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fighter {
    pub name: String,
    pub max_health: u32,
    current_health: u32,
    pub base_damage: u32,
    pub base_armor: u32,
    pub base_speed: f64,
    weapon: Option<ItemStats>,
    armor: Option<ItemStats>,
    concoction: Option<ItemStats>,
    effects: EffectManager,
}

impl Fighter {
    /// Create a fighter at full health with default base stats
    pub fn new(name: impl Into<String>, max_health: u32) -> Self {
        Fighter {
            name: name.into(),
            max_health,
            current_health: max_health,
            base_damage: DEFAULT_BASE_DAMAGE,
            base_armor: 0,
            base_speed: 1.0,
            weapon: None,
            armor: None,
            concoction: None,
            effects: EffectManager::new(),
        }
    }

    pub fn with_base_damage(mut self, damage: u32) -> Self {
        self.base_damage = damage;
        self
    }

    pub fn with_base_armor(mut self, armor: u32) -> Self {
        self.base_armor = armor;
        self
    }

    pub fn with_base_speed(mut self, speed: f64) -> Self {
        self.base_speed = speed;
        self
    }

    /// Equip the battle loadout
    ///
    /// Called once before combat. A concoction's health bonus is applied
    /// immediately, capped at `max_health + concoction_bonus_cap`. A shield
    /// effect on the armor becomes a battle-long passive effect.
    pub fn equip_items(
        &mut self,
        weapon: Option<ItemStats>,
        armor: Option<ItemStats>,
        concoction: Option<ItemStats>,
    ) {
        self.weapon = weapon;
        self.armor = armor;
        self.concoction = concoction;

        if let Some(ref concoction) = self.concoction {
            let cap = self
                .max_health
                .saturating_add(constants().health.concoction_bonus_cap);
            self.current_health = self.max_health.saturating_add(concoction.health).min(cap);
        }

        if let Some(ref armor) = self.armor {
            if armor.effect_type == Some(EffectType::Shield) {
                self.effects.add_effect(ActiveEffect::passive(
                    EffectType::Shield,
                    armor.effect_power,
                    self.name.clone(),
                ));
            }
        }

        debug!(
            fighter = %self.name,
            damage = self.total_damage(),
            armor = self.total_armor(),
            speed = self.total_speed(),
            health = self.current_health,
            "fighter equipped"
        );
    }

    pub fn weapon(&self) -> Option<&ItemStats> {
        self.weapon.as_ref()
    }

    pub fn armor(&self) -> Option<&ItemStats> {
        self.armor.as_ref()
    }

    pub fn concoction(&self) -> Option<&ItemStats> {
        self.concoction.as_ref()
    }

    pub fn effects(&self) -> &EffectManager {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut EffectManager {
        &mut self.effects
    }

    /// Effect carried by the equipped weapon
    pub fn weapon_effect(&self) -> Option<EffectType> {
        self.weapon.as_ref().and_then(|w| w.effect_type)
    }

    /// Effect carried by the equipped armor
    pub fn armor_effect(&self) -> Option<EffectType> {
        self.armor.as_ref().and_then(|a| a.effect_type)
    }

    pub fn current_health(&self) -> u32 {
        self.current_health
    }

    pub fn total_damage(&self) -> u32 {
        let weapon = self.weapon.as_ref().map(|w| w.damage).unwrap_or(0);
        self.base_damage.saturating_add(weapon)
    }

    pub fn total_armor(&self) -> u32 {
        let armor = self.armor.as_ref().map(|a| a.armor).unwrap_or(0);
        self.base_armor
            .saturating_add(armor)
            .saturating_add(self.effects.stat_modifiers().armor_bonus)
    }

    /// Speed multiplier from base, every equipped item and active freeze
    pub fn total_speed(&self) -> f64 {
        let item_speed = |item: &Option<ItemStats>| item.as_ref().map(|i| i.speed).unwrap_or(1.0);
        self.base_speed
            * item_speed(&self.weapon)
            * item_speed(&self.armor)
            * item_speed(&self.concoction)
            * self.effects.stat_modifiers().speed_multiplier
    }

    /// Fraction of incoming hit damage blocked by armor
    pub fn damage_reduction(&self) -> f64 {
        armor_reduction(self.total_armor())
    }

    /// Take a hit, reduced by armor. Returns the damage actually taken.
    pub fn take_damage(&mut self, raw_damage: u32) -> u32 {
        let reduction = self.damage_reduction();
        let actual = (raw_damage as f64 * (1.0 - reduction)).floor() as u32;
        self.current_health = self.current_health.saturating_sub(actual);
        actual
    }

    /// Take damage that ignores armor (DoT ticks, reflected damage)
    pub fn take_true_damage(&mut self, damage: u32) -> u32 {
        self.current_health = self.current_health.saturating_sub(damage);
        damage
    }

    /// Heal up to max health; never lowers an existing concoction overheal
    ///
    /// Returns the health actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if self.current_health >= self.max_health {
            return 0;
        }
        let healed = self
            .current_health
            .saturating_add(amount)
            .min(self.max_health);
        let restored = healed - self.current_health;
        self.current_health = healed;
        restored
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    /// Current health as a fraction of max health; 0 when max health is 0
    pub fn health_percentage(&self) -> f64 {
        if self.max_health == 0 {
            0.0
        } else {
            self.current_health as f64 / self.max_health as f64
        }
    }
}

/// Armor damage reduction: `min(armor / divisor, max_reduction)`
pub fn armor_reduction(armor: u32) -> f64 {
    let armor_constants = &constants().armor;
    (armor as f64 / armor_constants.divisor).min(armor_constants.max_reduction)
}
