//! Static registry of effect kinds

use item_core::{EffectType, ItemKind};
use serde::Serialize;

/// Broad behavior class of an effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectCategory {
    /// Recurring damage at the start of the afflicted fighter's turn
    DamageOverTime,
    /// Resolves immediately on hit
    Instant,
    /// Changes a derived stat while active
    StatModifier,
    /// Passive protection on armor
    Defensive,
    /// Heals the attacker on hit
    Healing,
}

/// How reapplying an active effect combines with the existing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StackingPolicy {
    /// Increment stacks and keep the longer duration
    Stack,
    /// Keep the longer duration, stacks unchanged
    Refresh,
}

/// Catalog entry for an effect kind
#[derive(Debug, Clone, Serialize)]
pub struct EffectInfo {
    pub effect_type: EffectType,
    /// Name used in combat log lines
    pub name: &'static str,
    /// Name shown for items carrying the effect
    pub flavor_name: &'static str,
    pub description: &'static str,
    pub category: EffectCategory,
    /// Turns the effect lasts once applied; 0 for effects that are never timed
    pub base_duration: u32,
    pub stacking: StackingPolicy,
}

impl EffectInfo {
    /// Item kinds this effect can be attached to
    pub fn slots(&self) -> &'static [ItemKind] {
        self.effect_type.applies_to()
    }

    pub fn is_timed(&self) -> bool {
        self.base_duration > 0
    }
}

static CATALOG: [EffectInfo; 10] = [
    EffectInfo {
        effect_type: EffectType::Fire,
        name: "Fire",
        flavor_name: "Burning Strike",
        description: "Sets enemies ablaze",
        category: EffectCategory::DamageOverTime,
        base_duration: 3,
        stacking: StackingPolicy::Refresh,
    },
    EffectInfo {
        effect_type: EffectType::Poison,
        name: "Poison",
        flavor_name: "Toxic Coating",
        description: "Poisons enemies over time",
        category: EffectCategory::DamageOverTime,
        base_duration: 5,
        stacking: StackingPolicy::Stack,
    },
    EffectInfo {
        effect_type: EffectType::Bleed,
        name: "Bleed",
        flavor_name: "Rending Slash",
        description: "Causes bleeding wounds",
        category: EffectCategory::DamageOverTime,
        base_duration: 4,
        stacking: StackingPolicy::Stack,
    },
    EffectInfo {
        effect_type: EffectType::Freeze,
        name: "Freeze",
        flavor_name: "Frost Aura",
        description: "Slows enemy movement",
        category: EffectCategory::StatModifier,
        base_duration: 2,
        stacking: StackingPolicy::Refresh,
    },
    EffectInfo {
        effect_type: EffectType::Lightning,
        name: "Lightning",
        flavor_name: "Thunder Strike",
        description: "Deals bonus lightning damage",
        category: EffectCategory::Instant,
        base_duration: 0,
        stacking: StackingPolicy::Refresh,
    },
    EffectInfo {
        effect_type: EffectType::Lifesteal,
        name: "Lifesteal",
        flavor_name: "Vampiric Touch",
        description: "Drains life from enemies",
        category: EffectCategory::Healing,
        base_duration: 0,
        stacking: StackingPolicy::Refresh,
    },
    EffectInfo {
        effect_type: EffectType::Vampiric,
        name: "Vampiric",
        flavor_name: "Blood Drain",
        description: "Significantly heals on hit",
        category: EffectCategory::Healing,
        base_duration: 0,
        stacking: StackingPolicy::Refresh,
    },
    EffectInfo {
        effect_type: EffectType::Critical,
        name: "Critical",
        flavor_name: "Deadly Precision",
        description: "Chance for devastating strikes",
        category: EffectCategory::Instant,
        base_duration: 0,
        stacking: StackingPolicy::Refresh,
    },
    EffectInfo {
        effect_type: EffectType::Reflect,
        name: "Reflect",
        flavor_name: "Thorns",
        description: "Reflects damage back to attacker",
        category: EffectCategory::Defensive,
        base_duration: 0,
        stacking: StackingPolicy::Refresh,
    },
    EffectInfo {
        effect_type: EffectType::Shield,
        name: "Shield",
        flavor_name: "Fortified",
        description: "Provides additional protection",
        category: EffectCategory::Defensive,
        base_duration: 0,
        stacking: StackingPolicy::Refresh,
    },
];

/// Lookup for effect metadata
pub struct EffectCatalog;

impl EffectCatalog {
    /// Metadata for an effect kind
    pub fn get(effect_type: EffectType) -> &'static EffectInfo {
        let index = match effect_type {
            EffectType::Fire => 0,
            EffectType::Poison => 1,
            EffectType::Bleed => 2,
            EffectType::Freeze => 3,
            EffectType::Lightning => 4,
            EffectType::Lifesteal => 5,
            EffectType::Vampiric => 6,
            EffectType::Critical => 7,
            EffectType::Reflect => 8,
            EffectType::Shield => 9,
        };
        &CATALOG[index]
    }

    pub fn all() -> &'static [EffectInfo] {
        &CATALOG
    }

    pub fn category(effect_type: EffectType) -> EffectCategory {
        Self::get(effect_type).category
    }

    pub fn base_duration(effect_type: EffectType) -> u32 {
        Self::get(effect_type).base_duration
    }

    pub fn stacking(effect_type: EffectType) -> StackingPolicy {
        Self::get(effect_type).stacking
    }

    /// Effects in a category, in catalog order
    pub fn in_category(category: EffectCategory) -> impl Iterator<Item = &'static EffectInfo> {
        CATALOG.iter().filter(move |info| info.category == category)
    }
}
