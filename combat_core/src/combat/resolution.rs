//! Single attack resolution
//!
//! Rolls are drawn in a fixed order: hit, crit (critical weapons only),
//! damage variance, then effect trigger (all weapon effects except
//! lifesteal and vampiric).

use item_core::EffectType;
use tracing::{debug, trace};

use super::log::{CombatEvent, DefeatCause};
use crate::config::constants;
use crate::effect::ActiveEffect;
use crate::fighter::Fighter;
use crate::rng::CombatRng;

/// Chance to hit for a given attacker speed
///
/// `base + (speed - 1) * scale`, clamped to the configured bounds.
pub fn hit_chance(speed: f64) -> f64 {
    let hit = &constants().hit;
    let chance = hit.base_chance + (speed - 1.0) * hit.speed_scale;
    if chance.is_nan() {
        return hit.min_chance;
    }
    chance.clamp(hit.min_chance, hit.max_chance)
}

/// Floor a non-negative float into a u32, mapping NaN and negatives to 0
fn floor_u32(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.floor().min(u32::MAX as f64) as u32
    } else if value == f64::INFINITY {
        u32::MAX
    } else {
        0
    }
}

/// Resolve one attack from `attacker` against `defender`
///
/// Returns the events in the order they happened. If reflected damage
/// kills the attacker the main hit never lands.
pub(crate) fn resolve_attack<R: CombatRng + ?Sized>(
    attacker: &mut Fighter,
    defender: &mut Fighter,
    rng: &mut R,
) -> Vec<CombatEvent> {
    let mut events = Vec::new();
    let constants = constants();

    let chance = hit_chance(attacker.total_speed());
    let roll = rng.roll();
    if roll >= chance {
        trace!(attacker = %attacker.name, roll, chance, "attack missed");
        events.push(CombatEvent::Miss {
            attacker: attacker.name.clone(),
            defender: defender.name.clone(),
        });
        return events;
    }

    let mut raw = attacker.total_damage() as f64;
    let mut critical = false;
    if attacker.weapon_effect() == Some(EffectType::Critical) {
        let crit_chance = attacker.weapon().map(|w| w.effect_power).unwrap_or(0.0);
        if rng.chance(crit_chance) {
            raw *= constants.damage.crit_multiplier;
            critical = true;
        }
    }

    let variance = rng.roll_range(constants.damage.variance_min, constants.damage.variance_max);
    let damage = floor_u32(raw * variance);

    if defender.armor_effect() == Some(EffectType::Reflect) {
        let power = defender.armor().map(|a| a.effect_power).unwrap_or(0.0);
        let reflected = floor_u32(damage as f64 * power);
        if reflected > 0 {
            attacker.take_true_damage(reflected);
            events.push(CombatEvent::Reflect {
                defender: defender.name.clone(),
                attacker: attacker.name.clone(),
                damage: reflected,
            });
        }
        if !attacker.is_alive() {
            debug!(attacker = %attacker.name, reflected, "attacker killed by reflect");
            events.push(CombatEvent::Defeated {
                name: attacker.name.clone(),
                cause: DefeatCause::Reflect,
            });
            return events;
        }
    }

    let actual = defender.take_damage(damage);
    debug!(
        attacker = %attacker.name,
        defender = %defender.name,
        raw = damage,
        actual,
        critical,
        "attack landed"
    );
    events.push(CombatEvent::Hit {
        attacker: attacker.name.clone(),
        defender: defender.name.clone(),
        damage: actual,
        critical,
    });

    if let Some(effect) = attacker.weapon_effect() {
        let triggers = match effect {
            EffectType::Lifesteal | EffectType::Vampiric => true,
            _ => rng.chance(constants.effects.trigger_chance),
        };
        if triggers {
            events.extend(apply_weapon_effect(effect, attacker, defender, actual));
        }
    }

    events
}

/// Apply a triggered weapon effect after a hit that dealt `actual_damage`
pub(crate) fn apply_weapon_effect(
    effect: EffectType,
    attacker: &mut Fighter,
    defender: &mut Fighter,
    actual_damage: u32,
) -> Vec<CombatEvent> {
    let (power, description) = attacker
        .weapon()
        .map(|w| (w.effect_power, w.effect_description.clone()))
        .unwrap_or_default();
    let mut events = Vec::new();

    match effect {
        EffectType::Fire | EffectType::Poison | EffectType::Bleed | EffectType::Freeze => {
            let active = ActiveEffect::from_catalog(effect, power, attacker.name.clone());
            let applied = defender.effects_mut().add_effect(active);
            let duration = defender
                .effects()
                .get(effect)
                .map(|e| e.remaining_duration)
                .unwrap_or_default();
            trace!(effect = %effect, target = %defender.name, ?applied, "effect applied");
            events.push(CombatEvent::effect_applied(
                &defender.name,
                effect,
                power,
                duration,
                applied,
            ));
        }
        EffectType::Lifesteal | EffectType::Vampiric => {
            let restored = attacker.heal(floor_u32(actual_damage as f64 * power));
            if restored > 0 {
                events.push(CombatEvent::Heal {
                    target: attacker.name.clone(),
                    effect,
                    amount: restored,
                });
            }
        }
        EffectType::Lightning => {
            let bonus = defender.take_damage(floor_u32(power));
            events.push(CombatEvent::BonusDamage {
                target: defender.name.clone(),
                effect,
                damage: bonus,
            });
        }
        EffectType::Critical | EffectType::Reflect | EffectType::Shield => {
            if !description.is_empty() {
                events.push(CombatEvent::Flavor { text: description });
            }
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::scripted::ScriptedRolls;
    use item_core::ItemStats;

    /// Variance roll giving a multiplier just above 1.0
    const NEUTRAL: f64 = 0.51;

    fn armed(name: &str, damage: u32, effect: Option<(EffectType, f64)>) -> Fighter {
        let mut weapon = ItemStats {
            damage,
            ..Default::default()
        };
        if let Some((effect, power)) = effect {
            weapon = weapon.with_effect(effect, power, "");
        }
        let mut fighter = Fighter::new(name, 100).with_base_damage(0);
        fighter.equip_items(Some(weapon), None, None);
        fighter
    }

    #[test]
    fn test_hit_chance_clamped() {
        assert!((hit_chance(1.0) - 0.8).abs() < 1e-12);
        assert!((hit_chance(1.5) - 0.875).abs() < 1e-12);
        assert!((hit_chance(3.0) - 0.95).abs() < 1e-12);
        assert!((hit_chance(0.0) - 0.70).abs() < 1e-12);
        assert!((hit_chance(f64::NAN) - 0.70).abs() < 1e-12);
    }

    #[test]
    fn test_miss_draws_one_roll() {
        let mut attacker = armed("P", 20, None);
        let mut defender = Fighter::new("E", 100);
        let mut rolls = ScriptedRolls::new(&[0.8, 0.0]);

        let events = resolve_attack(&mut attacker, &mut defender, &mut rolls);
        assert!(matches!(events.as_slice(), [CombatEvent::Miss { .. }]));
        assert_eq!(defender.current_health(), 100);
        assert_eq!(rolls.remaining(), 1);
    }

    #[test]
    fn test_variance_applied() {
        let mut attacker = armed("P", 20, None);
        let mut defender = Fighter::new("E", 100);
        // hit, variance ~1.147
        let mut rolls = ScriptedRolls::new(&[0.0, 0.99]);

        resolve_attack(&mut attacker, &mut defender, &mut rolls);
        assert_eq!(defender.current_health(), 78);
    }

    #[test]
    fn test_critical_hit() {
        let mut attacker = armed("P", 20, Some((EffectType::Critical, 0.4)));
        let mut defender = Fighter::new("E", 100);
        // hit, crit, variance ~1.0, no trigger
        let mut rolls = ScriptedRolls::new(&[0.0, 0.1, NEUTRAL, 0.9]);

        let events = resolve_attack(&mut attacker, &mut defender, &mut rolls);
        assert!(matches!(
            events[0],
            CombatEvent::Hit {
                damage: 30,
                critical: true,
                ..
            }
        ));
        assert_eq!(defender.current_health(), 70);
        assert_eq!(rolls.remaining(), 0);
    }

    #[test]
    fn test_reflect_before_hit() {
        let mut attacker = armed("P", 20, None);
        let mut defender = Fighter::new("E", 100);
        let thorns = ItemStats {
            armor: 0,
            ..Default::default()
        }
        .with_effect(EffectType::Reflect, 0.5, "Thorns");
        defender.equip_items(None, Some(thorns), None);
        let mut rolls = ScriptedRolls::new(&[0.0, NEUTRAL]);

        let events = resolve_attack(&mut attacker, &mut defender, &mut rolls);
        assert!(matches!(events[0], CombatEvent::Reflect { damage: 10, .. }));
        assert!(matches!(events[1], CombatEvent::Hit { damage: 20, .. }));
        assert_eq!(attacker.current_health(), 90);
        assert_eq!(defender.current_health(), 80);
    }

    #[test]
    fn test_lifesteal_always_triggers() {
        let mut attacker = armed("P", 20, Some((EffectType::Lifesteal, 0.5)));
        attacker.take_true_damage(50);
        let mut defender = Fighter::new("E", 100);
        // hit, variance; no trigger roll for lifesteal
        let mut rolls = ScriptedRolls::new(&[0.0, NEUTRAL]);

        let events = resolve_attack(&mut attacker, &mut defender, &mut rolls);
        assert!(matches!(events[1], CombatEvent::Heal { amount: 10, .. }));
        assert_eq!(attacker.current_health(), 60);
        assert_eq!(rolls.remaining(), 0);
    }

    #[test]
    fn test_lightning_bonus_is_mitigated() {
        let mut attacker = armed("P", 20, Some((EffectType::Lightning, 10.0)));
        let mut defender = Fighter::new("E", 100).with_base_armor(100);
        // hit, variance ~1.0, trigger
        let mut rolls = ScriptedRolls::new(&[0.0, NEUTRAL, 0.1]);

        let events = resolve_attack(&mut attacker, &mut defender, &mut rolls);
        assert!(matches!(events[1], CombatEvent::BonusDamage { damage: 5, .. }));
        assert_eq!(defender.current_health(), 100 - 10 - 5);
    }

    #[test]
    fn test_effect_trigger_roll_failed() {
        let mut attacker = armed("P", 20, Some((EffectType::Fire, 5.0)));
        let mut defender = Fighter::new("E", 100);
        let mut rolls = ScriptedRolls::new(&[0.0, NEUTRAL, 0.3]);

        let events = resolve_attack(&mut attacker, &mut defender, &mut rolls);
        assert_eq!(events.len(), 1);
        assert!(defender.effects().is_empty());
    }

    #[test]
    fn test_freeze_from_weapon() {
        let mut attacker = armed("P", 20, Some((EffectType::Freeze, 0.3)));
        let mut defender = Fighter::new("E", 100);
        let mut rolls = ScriptedRolls::new(&[0.0, NEUTRAL, 0.0]);

        let events = resolve_attack(&mut attacker, &mut defender, &mut rolls);
        assert!(matches!(
            events[1],
            CombatEvent::EffectApplied {
                effect: EffectType::Freeze,
                duration: 2,
                ..
            }
        ));
        assert!((defender.total_speed() - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_floor_u32() {
        assert_eq!(floor_u32(7.9), 7);
        assert_eq!(floor_u32(-3.0), 0);
        assert_eq!(floor_u32(f64::NAN), 0);
        assert_eq!(floor_u32(f64::INFINITY), u32::MAX);
    }
}
