//! Combat log - ordered record of what happened each turn

use item_core::EffectType;
use serde::Serialize;
use std::fmt;

use crate::effect::EffectApplication;

/// Why a fighter went down outside of a normal hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefeatCause {
    /// Damage-over-time at the start of their own turn
    Effects,
    /// Damage reflected by the defender's armor
    Reflect,
}

/// A single thing that happened during combat
///
/// Presentation layers can match on these for animation triggers; the
/// rendered line is stored alongside in [`LogEntry::message`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CombatEvent {
    DotTick {
        target: String,
        effect: EffectType,
        damage: u32,
    },
    Miss {
        attacker: String,
        defender: String,
    },
    Hit {
        attacker: String,
        defender: String,
        damage: u32,
        critical: bool,
    },
    Reflect {
        defender: String,
        attacker: String,
        damage: u32,
    },
    EffectApplied {
        target: String,
        effect: EffectType,
        power: f64,
        duration: i32,
        stacks: u32,
    },
    Heal {
        target: String,
        effect: EffectType,
        amount: u32,
    },
    BonusDamage {
        target: String,
        effect: EffectType,
        damage: u32,
    },
    Flavor {
        text: String,
    },
    Defeated {
        name: String,
        cause: DefeatCause,
    },
    Victory {
        winner: String,
    },
}

impl CombatEvent {
    /// Effect involved in this event, if any
    pub fn effect(&self) -> Option<EffectType> {
        match self {
            CombatEvent::DotTick { effect, .. }
            | CombatEvent::EffectApplied { effect, .. }
            | CombatEvent::Heal { effect, .. }
            | CombatEvent::BonusDamage { effect, .. } => Some(*effect),
            CombatEvent::Reflect { .. } => Some(EffectType::Reflect),
            _ => None,
        }
    }

    pub(crate) fn effect_applied(
        target: &str,
        effect: EffectType,
        power: f64,
        duration: i32,
        application: EffectApplication,
    ) -> Self {
        let stacks = match application {
            EffectApplication::Stacked(stacks) => stacks,
            EffectApplication::Added | EffectApplication::Refreshed => 1,
        };
        CombatEvent::EffectApplied {
            target: target.to_string(),
            effect,
            power,
            duration,
            stacks,
        }
    }
}

impl fmt::Display for CombatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombatEvent::DotTick { effect, damage, .. } => {
                write!(f, "{} deals {} damage!", effect, damage)
            }
            CombatEvent::Miss { attacker, .. } => write!(f, "{} attacks but misses!", attacker),
            CombatEvent::Hit {
                attacker,
                defender,
                damage,
                critical,
            } => {
                write!(f, "{} attacks {} for {} damage!", attacker, defender, damage)?;
                if *critical {
                    write!(f, " CRITICAL HIT!")?;
                }
                Ok(())
            }
            CombatEvent::Reflect {
                defender,
                attacker,
                damage,
            } => write!(
                f,
                "  → {}'s armor reflects {} damage back at {}!",
                defender, damage, attacker
            ),
            CombatEvent::EffectApplied {
                target,
                effect,
                power,
                duration,
                stacks,
            } => match effect {
                EffectType::Freeze => write!(
                    f,
                    "  → {} is frozen! Speed reduced by {:.0}% for {} turns",
                    target,
                    power.clamp(0.0, 1.0) * 100.0,
                    duration
                ),
                _ if *stacks > 1 => write!(
                    f,
                    "  → {} on {} stacks to x{} ({} damage/turn for {} turns)",
                    effect,
                    target,
                    stacks,
                    power.max(0.0).floor() as u64 * *stacks as u64,
                    duration
                ),
                _ => write!(
                    f,
                    "  → {} afflicts {}! ({} damage/turn for {} turns)",
                    effect,
                    target,
                    power.max(0.0).floor() as u64,
                    duration
                ),
            },
            CombatEvent::Heal {
                target,
                effect,
                amount,
            } => write!(f, "  → {} drains {} health! ({})", target, amount, effect),
            CombatEvent::BonusDamage {
                target,
                effect,
                damage,
            } => write!(
                f,
                "  → {} strikes {} for {} bonus damage!",
                effect, target, damage
            ),
            CombatEvent::Flavor { text } => write!(f, "  → {}!", text),
            CombatEvent::Defeated { name, cause } => match cause {
                DefeatCause::Effects => write!(f, "{} succumbs to their wounds!", name),
                DefeatCause::Reflect => write!(f, "{} is felled by their own blow!", name),
            },
            CombatEvent::Victory { winner } => write!(f, "{} wins!", winner),
        }
    }
}

/// One line of the combat log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    /// Turn the entry was produced on (0-based)
    pub turn: u32,
    pub event: CombatEvent,
    pub message: String,
}

/// Append-only combat log
#[derive(Debug, Clone, Default, Serialize)]
pub struct CombatLog {
    entries: Vec<LogEntry>,
}

impl CombatLog {
    pub fn new() -> Self {
        CombatLog::default()
    }

    pub(crate) fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn extend(&mut self, entries: impl IntoIterator<Item = LogEntry>) {
        self.entries.extend(entries);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// All rendered lines, oldest first
    pub fn messages(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.message.as_str())
    }

    /// The last `n` entries, for a scrolling log panel
    pub fn recent(&self, n: usize) -> &[LogEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// Most recent line
    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(|e| e.message.as_str())
    }

    /// Entries produced on a given turn
    pub fn turn_entries(&self, turn: u32) -> impl Iterator<Item = &LogEntry> + '_ {
        self.entries.iter().filter(move |e| e.turn == turn)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
