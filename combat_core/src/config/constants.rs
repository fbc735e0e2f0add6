//! Combat balance constants

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

use super::ConfigError;

/// Global combat constants instance
static COMBAT_CONSTANTS: OnceLock<CombatConstants> = OnceLock::new();

/// Initialize the global combat constants from a TOML file
///
/// Must be called before the first battle if custom constants are wanted.
/// Returns error if already initialized or if loading fails.
pub fn init_constants(path: &Path) -> Result<(), ConfigError> {
    let constants = CombatConstants::load_from_path(path)?;
    COMBAT_CONSTANTS
        .set(constants)
        .map_err(|_| ConfigError::Validation("CombatConstants already initialized".to_string()))
}

/// Initialize the global combat constants with default values
pub fn init_constants_default() -> Result<(), ConfigError> {
    COMBAT_CONSTANTS
        .set(CombatConstants::default())
        .map_err(|_| ConfigError::Validation("CombatConstants already initialized".to_string()))
}

/// Get a reference to the global combat constants
///
/// Falls back to the defaults if nothing was initialized.
pub fn constants() -> &'static CombatConstants {
    COMBAT_CONSTANTS.get_or_init(CombatConstants::default)
}

/// Check if constants have been initialized
pub fn constants_initialized() -> bool {
    COMBAT_CONSTANTS.get().is_some()
}

/// Parse constants from a TOML string without touching the global instance
pub fn parse_constants(toml: &str) -> Result<CombatConstants, ConfigError> {
    let constants: CombatConstants = super::parse_toml(toml)?;
    constants.validate()?;
    Ok(constants)
}

/// Tunable combat constants
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatConstants {
    #[serde(default)]
    pub armor: ArmorConstants,
    #[serde(default)]
    pub hit: HitConstants,
    #[serde(default)]
    pub damage: DamageConstants,
    #[serde(default)]
    pub effects: EffectConstants,
    #[serde(default)]
    pub health: HealthConstants,
}

impl CombatConstants {
    /// Load constants from a TOML file
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let constants: CombatConstants = super::load_toml(path)?;
        constants.validate()?;
        Ok(constants)
    }

    /// Reject tables that would break the combat formulas
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.armor.divisor.is_nan() || self.armor.divisor <= 0.0 {
            return Err(ConfigError::Validation(
                "armor.divisor must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.armor.max_reduction) {
            return Err(ConfigError::Validation(
                "armor.max_reduction must be within [0, 1]".to_string(),
            ));
        }
        if self.hit.min_chance > self.hit.max_chance {
            return Err(ConfigError::Validation(
                "hit.min_chance exceeds hit.max_chance".to_string(),
            ));
        }
        if self.damage.variance_min > self.damage.variance_max || self.damage.variance_min < 0.0 {
            return Err(ConfigError::Validation(
                "damage variance range is invalid".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.effects.trigger_chance) {
            return Err(ConfigError::Validation(
                "effects.trigger_chance must be within [0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmorConstants {
    /// reduction = armor / divisor
    #[serde(default = "default_armor_divisor")]
    pub divisor: f64,
    /// Hard cap on armor damage reduction
    #[serde(default = "default_max_reduction")]
    pub max_reduction: f64,
}

impl Default for ArmorConstants {
    fn default() -> Self {
        ArmorConstants {
            divisor: 200.0,
            max_reduction: 0.75,
        }
    }
}

fn default_armor_divisor() -> f64 {
    200.0
}
fn default_max_reduction() -> f64 {
    0.75
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HitConstants {
    /// Hit chance at neutral speed
    #[serde(default = "default_base_chance")]
    pub base_chance: f64,
    /// Hit chance gained per point of speed above 1.0
    #[serde(default = "default_speed_scale")]
    pub speed_scale: f64,
    #[serde(default = "default_min_chance")]
    pub min_chance: f64,
    #[serde(default = "default_max_chance")]
    pub max_chance: f64,
}

impl Default for HitConstants {
    fn default() -> Self {
        HitConstants {
            base_chance: 0.8,
            speed_scale: 0.15,
            min_chance: 0.70,
            max_chance: 0.95,
        }
    }
}

fn default_base_chance() -> f64 {
    0.8
}
fn default_speed_scale() -> f64 {
    0.15
}
fn default_min_chance() -> f64 {
    0.70
}
fn default_max_chance() -> f64 {
    0.95
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageConstants {
    #[serde(default = "default_variance_min")]
    pub variance_min: f64,
    #[serde(default = "default_variance_max")]
    pub variance_max: f64,
    /// Damage multiplier on a critical hit (1.5 = 150%)
    #[serde(default = "default_crit_multiplier")]
    pub crit_multiplier: f64,
}

impl Default for DamageConstants {
    fn default() -> Self {
        DamageConstants {
            variance_min: 0.85,
            variance_max: 1.15,
            crit_multiplier: 1.5,
        }
    }
}

fn default_variance_min() -> f64 {
    0.85
}
fn default_variance_max() -> f64 {
    1.15
}
fn default_crit_multiplier() -> f64 {
    1.5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectConstants {
    /// Chance for a weapon effect other than lifesteal/vampiric to fire on hit
    #[serde(default = "default_trigger_chance")]
    pub trigger_chance: f64,
}

impl Default for EffectConstants {
    fn default() -> Self {
        EffectConstants {
            trigger_chance: 0.3,
        }
    }
}

fn default_trigger_chance() -> f64 {
    0.3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConstants {
    /// Most health a concoction can add above max health
    #[serde(default = "default_concoction_bonus_cap")]
    pub concoction_bonus_cap: u32,
}

impl Default for HealthConstants {
    fn default() -> Self {
        HealthConstants {
            concoction_bonus_cap: 50,
        }
    }
}

fn default_concoction_bonus_cap() -> u32 {
    50
}
