//! Turn loop, attack resolution and the combat log

mod log;
mod resolution;
mod system;

pub use log::{CombatEvent, CombatLog, DefeatCause, LogEntry};
pub use resolution::hit_chance;
pub use system::{CombatState, CombatSystem, Side};
