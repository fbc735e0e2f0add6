use crate::types::*;
use crate::ItemError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Combat stats carried by a crafted item
///
/// Immutable once generated: fighters copy the stats they need when equipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStats {
    #[serde(default)]
    pub damage: u32,
    #[serde(default)]
    pub armor: u32,
    /// Speed multiplier, 1.0 is neutral
    #[serde(default = "default_speed")]
    pub speed: f64,
    /// Flat health granted for the battle
    #[serde(default)]
    pub health: u32,
    #[serde(default)]
    pub effect_type: Option<EffectType>,
    /// Percentage for lifesteal/freeze/critical/reflect, flat amount for DoTs and lightning
    #[serde(default)]
    pub effect_power: f64,
    /// Flavor text only
    #[serde(default)]
    pub effect_description: String,
}

fn default_speed() -> f64 {
    1.0
}

impl Default for ItemStats {
    fn default() -> Self {
        ItemStats {
            damage: 0,
            armor: 0,
            speed: 1.0,
            health: 0,
            effect_type: None,
            effect_power: 0.0,
            effect_description: String::new(),
        }
    }
}

impl ItemStats {
    /// Stats used when generation failed outright
    pub fn default_for(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Weapon => ItemStats {
                damage: 10,
                ..Default::default()
            },
            ItemKind::Armor => ItemStats {
                armor: 10,
                speed: 0.9,
                ..Default::default()
            },
            ItemKind::Concoction => ItemStats {
                health: 20,
                ..Default::default()
            },
            ItemKind::Material => ItemStats {
                damage: 5,
                armor: 5,
                ..Default::default()
            },
        }
    }

    pub fn with_effect(
        mut self,
        effect: EffectType,
        power: f64,
        description: impl Into<String>,
    ) -> Self {
        self.effect_type = Some(effect);
        self.effect_power = power;
        self.effect_description = description.into();
        self
    }

    /// Whether the item carries a special effect
    pub fn has_effect(&self) -> bool {
        self.effect_type.is_some()
    }
}

/// A crafted (or base material) item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub kind: ItemKind,
    pub stats: ItemStats,
    pub rarity: Rarity,
    /// Material names consumed to craft this item
    pub materials: Vec<String>,
    pub description: String,
    /// Which generator produced the stats ("Fallback", provider name, ...)
    pub generation_method: String,
}

/// Raw stats record as returned by the generation backend
///
/// Everything is optional and loosely typed: the backend is untrusted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneratedStats {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub damage: f64,
    #[serde(default)]
    pub armor: f64,
    #[serde(default)]
    pub health: f64,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub effect_type: Option<String>,
    #[serde(default)]
    pub effect_power: f64,
    #[serde(default)]
    pub special_effect: String,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub generation_method: Option<String>,
}

impl Item {
    /// Create a base crafting material
    pub fn material(name: impl Into<String>) -> Self {
        Item {
            name: name.into(),
            kind: ItemKind::Material,
            stats: ItemStats::default(),
            rarity: Rarity::Common,
            materials: Vec::new(),
            description: "A crafting material.".to_string(),
            generation_method: "Base".to_string(),
        }
    }

    /// Item built when generation failed for the given materials
    pub fn fallback(materials: &[String], kind: ItemKind) -> Self {
        let material_str = materials.join(" + ");
        Item {
            name: format!("{} {}", material_str, kind),
            kind,
            stats: ItemStats::default_for(kind),
            rarity: Rarity::Common,
            materials: materials.to_vec(),
            description: format!("Crafted from {}", material_str),
            generation_method: "Fallback (Error)".to_string(),
        }
    }

    /// Parse a backend stats response into an item
    pub fn from_generated_json(json: &str, materials: &[String]) -> Result<Self, ItemError> {
        let generated: GeneratedStats = serde_json::from_str(json)?;
        Ok(Self::from_generated(generated, materials))
    }

    /// Build an item from generated stats, discarding anything the combat core can't use
    pub fn from_generated(generated: GeneratedStats, materials: &[String]) -> Self {
        let kind = generated
            .item_type
            .as_deref()
            .map(ItemKind::parse_lenient)
            .unwrap_or_default();

        let speed = match generated.speed {
            Some(s) if s.is_finite() && s > 0.0 => s,
            Some(s) => {
                warn!(speed = s, "discarding invalid generated speed");
                1.0
            }
            None => 1.0,
        };

        let effect_type = generated
            .effect_type
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .and_then(|s| match s.parse::<EffectType>() {
                Ok(effect) if effect.can_attach_to(kind) => Some(effect),
                Ok(effect) => {
                    warn!(%effect, %kind, "generated effect does not apply to item kind");
                    None
                }
                Err(e) => {
                    warn!("ignoring generated effect: {}", e);
                    None
                }
            });

        let effect_power = if effect_type.is_some() && generated.effect_power.is_finite() {
            generated.effect_power.max(0.0)
        } else {
            0.0
        };

        let stats = ItemStats {
            damage: non_negative_int(generated.damage),
            armor: non_negative_int(generated.armor),
            speed,
            health: non_negative_int(generated.health),
            effect_type,
            effect_power,
            effect_description: generated.special_effect,
        };

        Item {
            name: generated
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "Unknown Item".to_string()),
            kind,
            stats,
            rarity: generated
                .rarity
                .as_deref()
                .map(Rarity::parse_lenient)
                .unwrap_or_default(),
            materials: materials.to_vec(),
            description: generated.description,
            generation_method: generated
                .generation_method
                .unwrap_or_else(|| "Unknown".to_string()),
        }
    }

    /// Tooltip lines for the item, blank lines separate sections
    pub fn tooltip_lines(&self) -> Vec<String> {
        let mut lines = vec![
            self.name.clone(),
            format!("Type: {}", self.kind),
            format!("Rarity: {}", self.rarity),
            String::new(),
        ];

        if self.stats.damage > 0 {
            lines.push(format!("Damage: {}", self.stats.damage));
        }
        if self.stats.armor > 0 {
            lines.push(format!("Armor: {}", self.stats.armor));
        }
        if self.stats.health > 0 {
            lines.push(format!("Health: {}", self.stats.health));
        }
        if (self.stats.speed - 1.0).abs() > f64::EPSILON {
            lines.push(format!("Speed: {:.1}x", self.stats.speed));
        }
        if let Some(effect) = self.stats.effect_type {
            if self.stats.effect_description.is_empty() {
                lines.push(format!("Effect: {}", effect));
            } else {
                lines.push(format!("Effect: {}", self.stats.effect_description));
            }
        } else if !self.stats.effect_description.is_empty() {
            lines.push(format!("Effect: {}", self.stats.effect_description));
        }

        if !self.description.is_empty() {
            lines.push(String::new());
            lines.push(self.description.clone());
        }

        lines
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.name, self.rarity, self.kind)
    }
}

fn non_negative_int(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.min(u32::MAX as f64) as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mats() -> Vec<String> {
        vec!["Iron".to_string(), "Dragon Shard".to_string()]
    }

    #[test]
    fn test_parse_full_response() {
        let json = r#"{
            "name": "Emberfang",
            "item_type": "weapon",
            "damage": 42,
            "armor": 0,
            "health": 0,
            "speed": 1.2,
            "effect_type": "fire",
            "effect_power": 6,
            "special_effect": "Sets enemies ablaze",
            "rarity": "epic",
            "description": "Still warm.",
            "generation_method": "Fallback"
        }"#;

        let item = Item::from_generated_json(json, &mats()).unwrap();
        assert_eq!(item.name, "Emberfang");
        assert_eq!(item.kind, ItemKind::Weapon);
        assert_eq!(item.stats.damage, 42);
        assert_eq!(item.stats.effect_type, Some(EffectType::Fire));
        assert!((item.stats.effect_power - 6.0).abs() < f64::EPSILON);
        assert_eq!(item.rarity, Rarity::Epic);
        assert_eq!(item.materials, mats());
    }

    #[test]
    fn test_unknown_effect_is_no_effect() {
        let json = r#"{"name": "Odd Blade", "damage": 10, "effect_type": "gravity", "effect_power": 3}"#;
        let item = Item::from_generated_json(json, &mats()).unwrap();
        assert_eq!(item.stats.effect_type, None);
        assert_eq!(item.stats.effect_power, 0.0);
    }

    #[test]
    fn test_inapplicable_effect_is_dropped() {
        let json = r#"{"item_type": "weapon", "effect_type": "reflect", "effect_power": 0.5}"#;
        let item = Item::from_generated_json(json, &mats()).unwrap();
        assert_eq!(item.stats.effect_type, None);

        let json = r#"{"item_type": "armor", "effect_type": "reflect", "effect_power": 0.5}"#;
        let item = Item::from_generated_json(json, &mats()).unwrap();
        assert_eq!(item.stats.effect_type, Some(EffectType::Reflect));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let item = Item::from_generated_json("{}", &mats()).unwrap();
        assert_eq!(item.name, "Unknown Item");
        assert_eq!(item.kind, ItemKind::Weapon);
        assert_eq!(item.stats.damage, 0);
        assert!((item.stats.speed - 1.0).abs() < f64::EPSILON);
        assert_eq!(item.rarity, Rarity::Common);
        assert_eq!(item.generation_method, "Unknown");
    }

    #[test]
    fn test_out_of_range_values_are_sanitized() {
        let json = r#"{"damage": -5, "armor": 250.7, "speed": -1.0, "health": 12}"#;
        let item = Item::from_generated_json(json, &mats()).unwrap();
        assert_eq!(item.stats.damage, 0);
        // Large values are passed through unclamped
        assert_eq!(item.stats.armor, 250);
        assert!((item.stats.speed - 1.0).abs() < f64::EPSILON);
        assert_eq!(item.stats.health, 12);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            Item::from_generated_json("not json", &mats()),
            Err(ItemError::Json(_))
        ));
    }

    #[test]
    fn test_fallback_item() {
        let item = Item::fallback(&mats(), ItemKind::Armor);
        assert_eq!(item.name, "Iron + Dragon Shard Armor");
        assert_eq!(item.stats.armor, 10);
        assert!((item.stats.speed - 0.9).abs() < f64::EPSILON);
        assert_eq!(item.generation_method, "Fallback (Error)");
    }

    #[test]
    fn test_tooltip() {
        let mut item = Item::fallback(&mats(), ItemKind::Weapon);
        item.stats = item
            .stats
            .clone()
            .with_effect(EffectType::Bleed, 3.0, "Causes bleeding wounds");
        let lines = item.tooltip_lines();
        assert_eq!(lines[1], "Type: Weapon");
        assert!(lines.contains(&"Damage: 10".to_string()));
        assert!(lines.contains(&"Effect: Causes bleeding wounds".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("Speed")));
    }
}
