//! Battle narrative
//!
//! The log is the authoritative, human-readable account of a battle that
//! callers receive. Diagnostics go through `tracing`, not here.

use serde::{Deserialize, Serialize};

use crate::combat::formation::Formation;
use crate::combat::resolution::CombatShip;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BattleLog {
    pub lines: Vec<String>,
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: String) {
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn opening(&mut self, a: (&str, Formation, usize), b: (&str, Formation, usize)) {
        self.push(format!(
            "Battle begins: {} ({} ships, {}) vs {} ({} ships, {})",
            a.0, a.2, a.1, b.0, b.2, b.1
        ));
    }

    pub fn round(&mut self, round: u32) {
        self.push(format!("--- Round {} ---", round));
    }

    pub fn hit(&mut self, attacker: &CombatShip, target: &CombatShip, damage: f64) {
        self.push(format!(
            "{} hits {} for {:.1} damage ({:.1} HP left)",
            attacker.label(),
            target.label(),
            damage,
            target.current_hp.max(0.0)
        ));
    }

    pub fn miss(&mut self, attacker: &CombatShip, target: &CombatShip) {
        self.push(format!(
            "{} fires at {} but misses",
            attacker.label(),
            target.label()
        ));
    }

    pub fn destroyed(&mut self, attacker: &CombatShip, target: &CombatShip) {
        self.push(format!(
            "{} is destroyed by {}!",
            target.label(),
            attacker.label()
        ));
    }
}

impl From<BattleLog> for Vec<String> {
    fn from(log: BattleLog) -> Self {
        log.lines
    }
}
