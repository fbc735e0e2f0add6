//! Procedural item generation, used when no generative backend is available

use crate::item::{Item, ItemStats};
use crate::types::{EffectType, ItemKind, Rarity};
use crate::ItemError;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

const WEAPON_KEYWORDS: &[&str] = &[
    "blade", "sword", "axe", "ingot", "steel", "iron", "fang", "obsidian", "mithril", "horn",
    "demon",
];
const ARMOR_KEYWORDS: &[&str] = &[
    "plate", "shield", "guard", "leather", "stone", "wood", "scale", "titanium", "reinforced",
    "thick",
];
const CONCOCTION_KEYWORDS: &[&str] = &[
    "essence", "magic", "potion", "crystal", "powder", "feather", "phoenix", "moonflower",
    "blood", "star", "dust",
];

/// Material keyword -> power contribution
const POWER_KEYWORDS: &[(&str, f64)] = &[
    ("dragon", 0.9),
    ("legendary", 0.9),
    ("crystal", 0.7),
    ("magic", 0.7),
    ("essence", 0.6),
    ("gold", 0.6),
    ("dark", 0.5),
    ("iron", 0.4),
    ("steel", 0.5),
    ("leather", 0.3),
    ("wood", 0.2),
    ("oak", 0.3),
    ("stone", 0.3),
];

const DEFAULT_MATERIAL_POWER: f64 = 0.3;

/// Below this power level weapons and armor get no special effect
const EFFECT_POWER_THRESHOLD: f64 = 0.4;

/// Seeded procedural item generator
#[derive(Debug, Clone, Default)]
pub struct ItemGenerator;

impl ItemGenerator {
    pub fn new() -> Self {
        ItemGenerator
    }

    /// Generate an item from materials
    ///
    /// The same materials, kind and seed always produce the same item.
    pub fn generate(
        &self,
        materials: &[String],
        kind: Option<ItemKind>,
        seed: u64,
    ) -> Result<Item, ItemError> {
        if materials.is_empty() {
            return Err(ItemError::NoMaterials);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let kind = kind.unwrap_or_else(|| determine_item_kind(materials));
        let power_level = power_level(materials);
        let rarity = Rarity::from_power_level(power_level);
        let name = generate_name(materials, kind, &mut rng);
        let joined = materials.join(", ");

        debug!(%kind, power_level, %rarity, "generating fallback item");

        let (stats, description) = match kind {
            ItemKind::Weapon => {
                let mut stats = ItemStats {
                    damage: scale_stat(power_level, 10, 80, &mut rng),
                    speed: rng.gen_range(0.8..1.3),
                    ..Default::default()
                };
                if power_level >= EFFECT_POWER_THRESHOLD {
                    let (effect, text) = pick_weapon_effect(materials, &mut rng);
                    stats = stats.with_effect(effect, effect_power(effect, power_level), text);
                }
                (stats, format!("A powerful weapon forged from {}.", joined))
            }
            ItemKind::Armor => {
                let mut stats = ItemStats {
                    armor: scale_stat(power_level, 10, 80, &mut rng),
                    speed: rng.gen_range(0.7..1.0),
                    ..Default::default()
                };
                if power_level >= EFFECT_POWER_THRESHOLD {
                    let (effect, text) = pick_armor_effect(materials, &mut rng);
                    match effect {
                        Some(effect) => {
                            stats =
                                stats.with_effect(effect, effect_power(effect, power_level), text)
                        }
                        None => stats.effect_description = text.to_string(),
                    }
                }
                (stats, format!("Sturdy armor crafted from {}.", joined))
            }
            ItemKind::Concoction => {
                let stats = ItemStats {
                    health: scale_stat(power_level, 15, 50, &mut rng),
                    speed: rng.gen_range(1.0..1.5),
                    effect_description: pick_concoction_text(materials, &mut rng).to_string(),
                    ..Default::default()
                };
                (stats, format!("A magical brew created from {}.", joined))
            }
            ItemKind::Material => (ItemStats::default(), "A crafting material.".to_string()),
        };

        Ok(Item {
            name,
            kind,
            stats,
            rarity,
            materials: materials.to_vec(),
            description,
            generation_method: "Fallback".to_string(),
        })
    }
}

/// Decide the item kind by counting material keywords
///
/// Ties favor weapons, then armor.
pub fn determine_item_kind(materials: &[String]) -> ItemKind {
    let joined = materials.join(" ").to_lowercase();
    let score = |keywords: &[&str]| keywords.iter().filter(|kw| joined.contains(*kw)).count();

    let weapon = score(WEAPON_KEYWORDS);
    let armor = score(ARMOR_KEYWORDS);
    let concoction = score(CONCOCTION_KEYWORDS);

    if concoction > weapon && concoction > armor {
        ItemKind::Concoction
    } else if armor > weapon {
        ItemKind::Armor
    } else {
        ItemKind::Weapon
    }
}

/// Average material power in [0, 1]
pub fn power_level(materials: &[String]) -> f64 {
    if materials.is_empty() {
        return 0.0;
    }
    let total: f64 = materials
        .iter()
        .map(|m| {
            let lower = m.to_lowercase();
            POWER_KEYWORDS
                .iter()
                .filter(|(kw, _)| lower.contains(kw))
                .fold(DEFAULT_MATERIAL_POWER, |acc, (_, p)| acc.max(*p))
        })
        .sum();
    (total / materials.len() as f64).min(1.0)
}

/// Lerp a stat by power level with +-15% jitter, clamped to [min, max]
fn scale_stat(power_level: f64, min: u32, max: u32, rng: &mut impl Rng) -> u32 {
    let value = min as f64 + (max - min) as f64 * power_level;
    let value = value * rng.gen_range(0.85..1.15);
    value.clamp(min as f64, max as f64) as u32
}

fn generate_name(materials: &[String], kind: ItemKind, rng: &mut impl Rng) -> String {
    let primary = materials.first().map(String::as_str).unwrap_or("Mysterious");
    let nouns: &[&str] = match kind {
        ItemKind::Weapon => &["Blade", "Sword", "Axe", "Spear", "Dagger"],
        ItemKind::Armor => &["Plate", "Mail", "Guard", "Shield", "Helm"],
        ItemKind::Concoction => &["Elixir", "Potion", "Brew", "Tonic", "Draught"],
        ItemKind::Material => &["Item"],
    };
    let noun = nouns.choose(rng).copied().unwrap_or("Item");
    format!("{} {}", primary, noun)
}

fn pick_weapon_effect(materials: &[String], rng: &mut impl Rng) -> (EffectType, &'static str) {
    let joined = materials.join(" ").to_lowercase();
    let mut options = Vec::new();
    if joined.contains("fire") || joined.contains("dragon") {
        options.push((EffectType::Fire, "Burns enemies for extra damage"));
    }
    if joined.contains("ice") || joined.contains("crystal") {
        options.push((EffectType::Freeze, "Chance to freeze enemies"));
    }
    if joined.contains("dark") || joined.contains("shadow") {
        options.push((EffectType::Lifesteal, "Drains enemy health"));
    }
    if joined.contains("magic") || joined.contains("essence") {
        options.push((EffectType::Lightning, "Deals bonus magical damage"));
    }
    if joined.contains("blood") {
        options.push((EffectType::Vampiric, "Significantly heals on hit"));
    }
    if joined.contains("obsidian") || joined.contains("fang") {
        options.push((EffectType::Bleed, "Causes bleeding wounds"));
    }
    options
        .choose(rng)
        .copied()
        .unwrap_or((EffectType::Critical, "Sharp and deadly"))
}

fn pick_armor_effect(
    materials: &[String],
    rng: &mut impl Rng,
) -> (Option<EffectType>, &'static str) {
    let joined = materials.join(" ").to_lowercase();
    let mut options = Vec::new();
    if joined.contains("dragon") {
        options.push((Some(EffectType::Shield), "High resistance to fire"));
    }
    if joined.contains("crystal") || joined.contains("magic") {
        options.push((Some(EffectType::Reflect), "Reflects magical attacks"));
    }
    if joined.contains("iron") || joined.contains("steel") {
        options.push((Some(EffectType::Shield), "Reduces physical damage"));
    }
    if joined.contains("dark") {
        options.push((None, "Grants stealth bonus"));
    }
    options
        .choose(rng)
        .copied()
        .unwrap_or((Some(EffectType::Shield), "Sturdy protection"))
}

fn pick_concoction_text(materials: &[String], rng: &mut impl Rng) -> &'static str {
    let joined = materials.join(" ").to_lowercase();
    let mut options = Vec::new();
    if joined.contains("magic") || joined.contains("essence") {
        options.push("Grants temporary magic power");
    }
    if joined.contains("dragon") {
        options.push("Increases damage resistance");
    }
    if joined.contains("crystal") {
        options.push("Speeds up health regeneration");
    }
    if joined.contains("dark") {
        options.push("Grants temporary invisibility");
    }
    options.choose(rng).copied().unwrap_or("Boosts vitality")
}

/// Effect power for a generated effect, scaled by material power
pub fn effect_power(effect: EffectType, power_level: f64) -> f64 {
    let (low, high) = match effect {
        EffectType::Fire => (4.0, 10.0),
        EffectType::Poison => (2.0, 6.0),
        EffectType::Bleed => (3.0, 7.0),
        EffectType::Freeze => (0.2, 0.5),
        EffectType::Lightning => (5.0, 20.0),
        EffectType::Lifesteal => (0.15, 0.35),
        EffectType::Vampiric => (0.3, 0.6),
        EffectType::Critical => (0.15, 0.4),
        EffectType::Reflect => (0.1, 0.3),
        EffectType::Shield => (5.0, 20.0),
    };
    let t = power_level.clamp(0.0, 1.0);
    let power = low + (high - low) * t;
    (power * 100.0).round() / 100.0
}
