//! Turn-based battle between a player and an enemy

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

use super::log::{CombatEvent, CombatLog, DefeatCause, LogEntry};
use super::resolution::resolve_attack;
use crate::fighter::Fighter;
use crate::rng::CombatRng;

/// Which side of the battle a fighter is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => write!(f, "Player"),
            Side::Enemy => write!(f, "Enemy"),
        }
    }
}

/// Battle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CombatState {
    Active,
    Over { winner: Side },
}

/// A two-fighter battle
///
/// Turn order is fixed at construction from each fighter's total speed;
/// later speed changes (freeze) affect hit chance but never reorder turns.
/// The RNG is owned by the battle so a seed reproduces the whole fight.
pub struct CombatSystem<R: CombatRng = ChaCha8Rng> {
    player: Fighter,
    enemy: Fighter,
    turn_order: [Side; 2],
    turn: u32,
    state: CombatState,
    log: CombatLog,
    rng: R,
}

impl CombatSystem<ChaCha8Rng> {
    /// Battle with a reproducible RNG stream
    pub fn seeded(player: Fighter, enemy: Fighter, seed: u64) -> Self {
        Self::new(player, enemy, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: CombatRng> CombatSystem<R> {
    /// Start a battle; the faster fighter acts first, the player on ties
    pub fn new(player: Fighter, enemy: Fighter, rng: R) -> Self {
        let turn_order = if player.total_speed() >= enemy.total_speed() {
            [Side::Player, Side::Enemy]
        } else {
            [Side::Enemy, Side::Player]
        };
        debug!(
            player = %player.name,
            enemy = %enemy.name,
            first = %turn_order[0],
            "combat started"
        );

        CombatSystem {
            player,
            enemy,
            turn_order,
            turn: 0,
            state: CombatState::Active,
            log: CombatLog::new(),
            rng,
        }
    }

    /// Run one action for whichever fighter's turn it is
    ///
    /// Returns the lines produced by this turn only. Once the battle is over
    /// this is a no-op returning no lines.
    pub fn execute_turn(&mut self) -> Vec<String> {
        if self.is_over() {
            return Vec::new();
        }

        let turn = self.turn;
        let side = self.turn_order[(turn % 2) as usize];
        let mut entries = Vec::new();
        let mut record = |event: CombatEvent, message: String| {
            entries.push(LogEntry {
                turn,
                event,
                message,
            });
        };

        let (attacker, defender) = pair_mut(&mut self.player, &mut self.enemy, side);
        debug!(turn, attacker = %attacker.name, "turn started");

        // Damage-over-time ticks before the attacker acts
        let tick = attacker.effects_mut().process_turn();
        attacker.take_true_damage(tick.total_damage);
        for ((effect, damage), message) in tick.ticks.into_iter().zip(tick.messages) {
            record(
                CombatEvent::DotTick {
                    target: attacker.name.clone(),
                    effect,
                    damage,
                },
                message,
            );
        }

        if attacker.is_alive() {
            for event in resolve_attack(attacker, defender, &mut self.rng) {
                let message = event.to_string();
                record(event, message);
            }
        } else {
            let event = CombatEvent::Defeated {
                name: attacker.name.clone(),
                cause: DefeatCause::Effects,
            };
            let message = event.to_string();
            record(event, message);
        }

        if let Some(winner) = self.check_winner() {
            self.state = CombatState::Over { winner };
            let name = self.fighter(winner).name.clone();
            info!(winner = %name, side = %winner, turns = turn + 1, "combat over");
            let event = CombatEvent::Victory { winner: name };
            let message = event.to_string();
            record(event, message);
        }

        let messages = entries.iter().map(|e| e.message.clone()).collect();
        self.log.extend(entries);
        self.turn += 1;
        messages
    }

    /// Run turns until the battle ends or `max_turns` more turns have passed
    ///
    /// Returns the winner, if there is one.
    pub fn run_to_completion(&mut self, max_turns: u32) -> Option<Side> {
        for _ in 0..max_turns {
            if self.is_over() {
                break;
            }
            self.execute_turn();
        }
        self.winner()
    }

    /// Player is checked first so simultaneous deaths resolve the same way
    fn check_winner(&self) -> Option<Side> {
        if !self.player.is_alive() {
            Some(Side::Enemy)
        } else if !self.enemy.is_alive() {
            Some(Side::Player)
        } else {
            None
        }
    }

    pub fn fighter(&self, side: Side) -> &Fighter {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    pub fn player(&self) -> &Fighter {
        &self.player
    }

    pub fn enemy(&self) -> &Fighter {
        &self.enemy
    }

    pub fn combat_log(&self) -> &CombatLog {
        &self.log
    }

    pub fn state(&self) -> CombatState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        matches!(self.state, CombatState::Over { .. })
    }

    pub fn winner(&self) -> Option<Side> {
        match self.state {
            CombatState::Active => None,
            CombatState::Over { winner } => Some(winner),
        }
    }

    /// `None` while the battle is still running
    pub fn player_won(&self) -> Option<bool> {
        self.winner().map(|winner| winner == Side::Player)
    }

    /// Number of turns taken so far
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn turn_order(&self) -> [Side; 2] {
        self.turn_order
    }

    /// Side whose action the next call to `execute_turn` resolves
    pub fn next_to_act(&self) -> Side {
        self.turn_order[(self.turn % 2) as usize]
    }
}

/// Split the two fighters into (attacker, defender)
fn pair_mut<'a>(
    player: &'a mut Fighter,
    enemy: &'a mut Fighter,
    attacker: Side,
) -> (&'a mut Fighter, &'a mut Fighter) {
    match attacker {
        Side::Player => (player, enemy),
        Side::Enemy => (enemy, player),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::ActiveEffect;
    use crate::rng::scripted::ScriptedRolls;
    use item_core::{EffectType, ItemStats};

    const NEUTRAL: f64 = 0.51;

    fn enemy() -> Fighter {
        Fighter::new("E", 100).with_base_damage(15).with_base_armor(10)
    }

    #[test]
    fn test_end_to_end_battle() {
        for seed in 0..20 {
            let mut combat = CombatSystem::seeded(Fighter::new("P", 100), enemy(), seed);
            let winner = combat.run_to_completion(10_000);

            assert!(combat.is_over());
            assert_eq!(combat.winner(), winner);
            let player_alive = combat.player().is_alive();
            let enemy_alive = combat.enemy().is_alive();
            assert!(player_alive ^ enemy_alive);
            assert_eq!(combat.player_won(), Some(player_alive));
            assert!(combat.combat_log().last().unwrap().contains("wins!"));
        }
    }

    #[test]
    fn test_seed_reproduces_battle() {
        let run = |seed| {
            let mut combat = CombatSystem::seeded(Fighter::new("P", 100), enemy(), seed);
            combat.run_to_completion(10_000);
            combat
                .combat_log()
                .messages()
                .map(str::to_string)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn test_turn_order_by_speed() {
        let fast = Fighter::new("A", 100).with_base_speed(1.5);
        let slow = Fighter::new("B", 100).with_base_speed(0.9);
        let combat = CombatSystem::new(fast.clone(), slow.clone(), ScriptedRolls::new(&[]));
        assert_eq!(combat.turn_order(), [Side::Player, Side::Enemy]);

        let combat = CombatSystem::new(slow, fast, ScriptedRolls::new(&[]));
        assert_eq!(combat.turn_order(), [Side::Enemy, Side::Player]);

        let combat = CombatSystem::new(
            Fighter::new("P", 100),
            Fighter::new("E", 100),
            ScriptedRolls::new(&[]),
        );
        assert_eq!(combat.turn_order(), [Side::Player, Side::Enemy]);
    }

    #[test]
    fn test_turn_order_not_recomputed() {
        let player = Fighter::new("P", 100).with_base_speed(1.2);
        let mut enemy = Fighter::new("E", 100).with_base_damage(0);
        let freezing = ItemStats {
            damage: 1,
            ..Default::default()
        }
        .with_effect(EffectType::Freeze, 0.9, "");
        enemy.equip_items(Some(freezing), None, None);

        // P hits; E hits and freezes P
        let mut combat = CombatSystem::new(
            player,
            enemy,
            ScriptedRolls::new(&[0.0, NEUTRAL, 0.0, NEUTRAL, 0.0]),
        );
        combat.execute_turn();
        combat.execute_turn();
        assert!(combat.player().effects().has_effect(EffectType::Freeze));
        assert!(combat.player().total_speed() < combat.enemy().total_speed());
        assert_eq!(combat.turn_order(), [Side::Player, Side::Enemy]);
        assert_eq!(combat.next_to_act(), Side::Player);
    }

    #[test]
    fn test_miss_leaves_health() {
        let mut combat = CombatSystem::new(
            Fighter::new("P", 100),
            Fighter::new("E", 100),
            ScriptedRolls::new(&[0.99]),
        );
        let messages = combat.execute_turn();
        assert_eq!(messages, vec!["P attacks but misses!".to_string()]);
        assert_eq!(combat.enemy().current_health(), 100);
        assert_eq!(combat.turn(), 1);
        assert_eq!(combat.next_to_act(), Side::Enemy);
    }

    #[test]
    fn test_hit_returns_only_this_turn() {
        let mut combat = CombatSystem::new(
            Fighter::new("P", 100).with_base_damage(20),
            Fighter::new("E", 100),
            ScriptedRolls::new(&[0.99, 0.0, NEUTRAL]),
        );
        combat.execute_turn();
        let messages = combat.execute_turn();
        assert_eq!(messages, vec!["E attacks P for 5 damage!".to_string()]);
        assert_eq!(combat.combat_log().len(), 2);
        assert_eq!(combat.player().current_health(), 95);
    }

    #[test]
    fn test_dot_kill_skips_attack() {
        let mut player = Fighter::new("P", 100);
        player.take_true_damage(97);
        player
            .effects_mut()
            .add_effect(ActiveEffect::from_catalog(EffectType::Poison, 5.0, "E"));

        // Rolls that would land a hit if the attack phase ran
        let rolls = ScriptedRolls::new(&[0.0, NEUTRAL]);
        let mut combat = CombatSystem::new(player, enemy(), rolls);
        let messages = combat.execute_turn();

        assert_eq!(
            messages,
            vec![
                "Poison deals 5 damage!".to_string(),
                "P succumbs to their wounds!".to_string(),
                "E wins!".to_string(),
            ]
        );
        assert_eq!(combat.enemy().current_health(), 100);
        assert_eq!(combat.winner(), Some(Side::Enemy));
        assert_eq!(combat.turn(), 1);
        assert_eq!(combat.combat_log().len(), 3);
    }

    #[test]
    fn test_reflect_kills_attacker_first() {
        let player = Fighter::new("P", 10).with_base_damage(50);
        let mut enemy = Fighter::new("E", 20);
        let thorns = ItemStats::default().with_effect(EffectType::Reflect, 0.5, "Thorns");
        enemy.equip_items(None, Some(thorns), None);

        let mut combat = CombatSystem::new(player, enemy, ScriptedRolls::new(&[0.0, NEUTRAL]));
        let messages = combat.execute_turn();

        assert!(!combat.player().is_alive());
        assert!(combat.enemy().is_alive());
        assert_eq!(combat.enemy().current_health(), 20);
        assert_eq!(combat.player_won(), Some(false));
        assert_eq!(messages.last().map(String::as_str), Some("E wins!"));
        assert!(matches!(
            combat.combat_log().entries()[1].event,
            CombatEvent::Defeated {
                cause: DefeatCause::Reflect,
                ..
            }
        ));
    }

    #[test]
    fn test_bleed_stacks_through_combat() {
        let bleeding = ItemStats {
            damage: 1,
            ..Default::default()
        }
        .with_effect(EffectType::Bleed, 3.0, "");
        let mut player = Fighter::new("P", 100).with_base_damage(0);
        player.equip_items(Some(bleeding), None, None);
        let enemy = Fighter::new("E", 100).with_base_damage(0);

        // P: hit, variance, trigger. E: miss. P: hit, variance, trigger.
        let rolls = ScriptedRolls::new(&[0.0, NEUTRAL, 0.0, 0.99, 0.0, NEUTRAL, 0.0]);
        let mut combat = CombatSystem::new(player, enemy, rolls);
        combat.execute_turn();
        combat.execute_turn();
        let messages = combat.execute_turn();

        let bleed = combat.enemy().effects().get(EffectType::Bleed).unwrap();
        assert_eq!(bleed.stacks, 2);
        assert_eq!(combat.enemy().effects().len(), 1);
        assert!(messages.last().unwrap().contains("stacks to x2"));
    }

    #[test]
    fn test_dot_ticks_on_victims_turn() {
        let burning = ItemStats {
            damage: 1,
            ..Default::default()
        }
        .with_effect(EffectType::Fire, 6.0, "");
        let mut player = Fighter::new("P", 100).with_base_damage(0);
        player.equip_items(Some(burning), None, None);
        let enemy = Fighter::new("E", 100).with_base_damage(0);

        let rolls = ScriptedRolls::new(&[0.0, NEUTRAL, 0.0, 0.99]);
        let mut combat = CombatSystem::new(player, enemy, rolls);
        combat.execute_turn();
        assert_eq!(combat.enemy().current_health(), 99);

        let messages = combat.execute_turn();
        assert_eq!(messages[0], "Fire deals 6 damage!");
        assert_eq!(combat.enemy().current_health(), 93);
        assert!(matches!(
            combat.combat_log().entries()[2].event,
            CombatEvent::DotTick { damage: 6, .. }
        ));
    }

    #[test]
    fn test_lifesteal_heals_attacker() {
        let draining = ItemStats {
            damage: 20,
            ..Default::default()
        }
        .with_effect(EffectType::Vampiric, 0.5, "");
        let mut player = Fighter::new("P", 100).with_base_damage(0);
        player.equip_items(Some(draining), None, None);
        player.take_true_damage(40);

        let mut combat = CombatSystem::new(
            player,
            Fighter::new("E", 100),
            ScriptedRolls::new(&[0.0, NEUTRAL]),
        );
        let messages = combat.execute_turn();
        assert_eq!(combat.player().current_health(), 70);
        assert_eq!(messages[1], "  → P drains 10 health! (Vampiric)");
    }

    #[test]
    fn test_critical_hit_message() {
        let keen = ItemStats {
            damage: 20,
            ..Default::default()
        }
        .with_effect(EffectType::Critical, 0.5, "");
        let mut player = Fighter::new("P", 100).with_base_damage(0);
        player.equip_items(Some(keen), None, None);

        let mut combat = CombatSystem::new(
            player,
            Fighter::new("E", 100),
            ScriptedRolls::new(&[0.0, 0.0, NEUTRAL, 0.99]),
        );
        let messages = combat.execute_turn();
        assert_eq!(messages, vec!["P attacks E for 30 damage! CRITICAL HIT!".to_string()]);
    }

    #[test]
    fn test_no_turns_after_combat_over() {
        let mut combat = CombatSystem::new(
            Fighter::new("P", 100).with_base_damage(500),
            Fighter::new("E", 10),
            ScriptedRolls::new(&[0.0, NEUTRAL]),
        );
        combat.execute_turn();
        assert_eq!(combat.winner(), Some(Side::Player));
        let log_len = combat.combat_log().len();

        assert!(combat.execute_turn().is_empty());
        assert_eq!(combat.combat_log().len(), log_len);
        assert_eq!(combat.turn(), 1);
        assert_eq!(combat.run_to_completion(5), Some(Side::Player));
    }

    #[test]
    fn test_simultaneous_death_checks_player_first() {
        let mut player = Fighter::new("P", 10);
        let mut enemy = Fighter::new("E", 10);
        player.take_true_damage(10);
        enemy.take_true_damage(10);
        let mut combat = CombatSystem::new(player, enemy, ScriptedRolls::new(&[]));
        combat.execute_turn();
        assert_eq!(combat.winner(), Some(Side::Enemy));
    }

    #[test]
    fn test_active_battle_has_no_result() {
        let combat = CombatSystem::seeded(Fighter::new("P", 100), enemy(), 1);
        assert_eq!(combat.player_won(), None);
        assert_eq!(combat.winner(), None);
        assert_eq!(combat.state(), CombatState::Active);
        assert!(combat.combat_log().is_empty());
    }
}
