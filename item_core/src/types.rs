use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ItemError;

/// What a crafted item is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Material,
    #[default]
    Weapon,
    Armor,
    Concoction,
}

impl ItemKind {
    /// Item kinds that can be equipped for a battle
    pub fn equippable() -> &'static [ItemKind] {
        &[ItemKind::Weapon, ItemKind::Armor, ItemKind::Concoction]
    }

    pub fn is_equippable(&self) -> bool {
        !matches!(self, ItemKind::Material)
    }

    /// Lenient parse used for generated data; anything unknown is a weapon
    pub fn parse_lenient(s: &str) -> ItemKind {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for ItemKind {
    type Err = ItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "material" => Ok(ItemKind::Material),
            "weapon" => Ok(ItemKind::Weapon),
            "armor" | "armour" => Ok(ItemKind::Armor),
            "concoction" => Ok(ItemKind::Concoction),
            _ => Err(ItemError::UnknownKind(s.to_string())),
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Material => write!(f, "Material"),
            ItemKind::Weapon => write!(f, "Weapon"),
            ItemKind::Armor => write!(f, "Armor"),
            ItemKind::Concoction => write!(f, "Concoction"),
        }
    }
}

/// Item rarity, ordered from weakest to strongest
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Rarity for a material power level in [0, 1]
    pub fn from_power_level(power_level: f64) -> Rarity {
        if power_level >= 0.8 {
            Rarity::Legendary
        } else if power_level >= 0.65 {
            Rarity::Epic
        } else if power_level >= 0.5 {
            Rarity::Rare
        } else if power_level >= 0.35 {
            Rarity::Uncommon
        } else {
            Rarity::Common
        }
    }

    /// Display color (RGB) used by item frames and tooltips
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Rarity::Common => (200, 200, 200),
            Rarity::Uncommon => (100, 255, 100),
            Rarity::Rare => (100, 100, 255),
            Rarity::Epic => (200, 100, 255),
            Rarity::Legendary => (255, 200, 50),
        }
    }

    pub fn parse_lenient(s: &str) -> Rarity {
        match s.trim().to_lowercase().as_str() {
            "uncommon" => Rarity::Uncommon,
            "rare" => Rarity::Rare,
            "epic" => Rarity::Epic,
            "legendary" => Rarity::Legendary,
            _ => Rarity::Common,
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rarity::Common => write!(f, "Common"),
            Rarity::Uncommon => write!(f, "Uncommon"),
            Rarity::Rare => write!(f, "Rare"),
            Rarity::Epic => write!(f, "Epic"),
            Rarity::Legendary => write!(f, "Legendary"),
        }
    }
}

/// Special effect an item can carry into combat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectType {
    /// Damage over time, short
    Fire,
    /// Damage over time, weaker but long and stacking
    Poison,
    /// Physical damage over time, stacking
    Bleed,
    /// Speed debuff
    Freeze,
    /// Instant bonus damage
    Lightning,
    /// Heal for a share of damage dealt
    Lifesteal,
    /// Stronger lifesteal
    Vampiric,
    /// Chance for bonus damage
    Critical,
    /// Return a share of incoming damage
    Reflect,
    /// Passive armor bonus
    Shield,
}

impl EffectType {
    pub fn all() -> &'static [EffectType] {
        &[
            EffectType::Fire,
            EffectType::Poison,
            EffectType::Bleed,
            EffectType::Freeze,
            EffectType::Lightning,
            EffectType::Lifesteal,
            EffectType::Vampiric,
            EffectType::Critical,
            EffectType::Reflect,
            EffectType::Shield,
        ]
    }

    /// Whether this effect ticks damage every turn
    pub fn is_damage_over_time(&self) -> bool {
        matches!(self, EffectType::Fire | EffectType::Poison | EffectType::Bleed)
    }

    /// Item kinds this effect may be attached to
    pub fn applies_to(&self) -> &'static [ItemKind] {
        match self {
            EffectType::Fire
            | EffectType::Poison
            | EffectType::Bleed
            | EffectType::Lightning
            | EffectType::Lifesteal
            | EffectType::Vampiric
            | EffectType::Critical => &[ItemKind::Weapon],
            EffectType::Freeze => &[ItemKind::Weapon, ItemKind::Armor],
            EffectType::Reflect | EffectType::Shield => &[ItemKind::Armor],
        }
    }

    pub fn can_attach_to(&self, kind: ItemKind) -> bool {
        self.applies_to().contains(&kind)
    }

    /// Effects usable on a given item kind, in declaration order
    pub fn applicable_to(kind: ItemKind) -> Vec<EffectType> {
        EffectType::all()
            .iter()
            .copied()
            .filter(|e| e.can_attach_to(kind))
            .collect()
    }
}

impl FromStr for EffectType {
    type Err = ItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fire" | "burn" => Ok(EffectType::Fire),
            "poison" => Ok(EffectType::Poison),
            "bleed" => Ok(EffectType::Bleed),
            "freeze" | "frost" => Ok(EffectType::Freeze),
            "lightning" => Ok(EffectType::Lightning),
            "lifesteal" => Ok(EffectType::Lifesteal),
            "vampiric" => Ok(EffectType::Vampiric),
            "critical" | "crit" => Ok(EffectType::Critical),
            "reflect" | "thorns" => Ok(EffectType::Reflect),
            "shield" => Ok(EffectType::Shield),
            _ => Err(ItemError::UnknownEffect(s.to_string())),
        }
    }
}

impl fmt::Display for EffectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectType::Fire => write!(f, "Fire"),
            EffectType::Poison => write!(f, "Poison"),
            EffectType::Bleed => write!(f, "Bleed"),
            EffectType::Freeze => write!(f, "Freeze"),
            EffectType::Lightning => write!(f, "Lightning"),
            EffectType::Lifesteal => write!(f, "Lifesteal"),
            EffectType::Vampiric => write!(f, "Vampiric"),
            EffectType::Critical => write!(f, "Critical"),
            EffectType::Reflect => write!(f, "Reflect"),
            EffectType::Shield => write!(f, "Shield"),
        }
    }
}
