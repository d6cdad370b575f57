//! Ship stat bundle
//!
//! The same six numbers describe a catalog template, the baseline and
//! current halves of an owned ship, and the effective stats a ship
//! fights with after rank bonuses.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatBundle {
    pub attack: f64,
    pub shield: f64,
    /// Chance to dodge a shot, 0.0 to 1.0 before formation modifiers
    pub evasion: f64,
    /// Shots per round; truncated to an integer when firing
    pub fire_rate: f64,
    pub hp: f64,
    pub value: f64,
}

impl StatBundle {
    pub fn new(attack: f64, shield: f64, evasion: f64, fire_rate: f64, hp: f64, value: f64) -> Self {
        Self {
            attack,
            shield,
            evasion,
            fire_rate,
            hp,
            value,
        }
    }

    /// All-zero bundle carried by destroyed ships
    pub fn zeroed() -> Self {
        Self::default()
    }

    pub fn is_zeroed(&self) -> bool {
        *self == Self::zeroed()
    }

    /// Number of shots fired per round
    pub fn shots(&self) -> u32 {
        if self.fire_rate <= 0.0 {
            0
        } else {
            self.fire_rate.trunc() as u32
        }
    }

    /// Every stat multiplied by `factor` (clamped to be non-negative)
    pub fn scaled(&self, factor: f64) -> Self {
        let factor = factor.max(0.0);
        Self {
            attack: self.attack * factor,
            shield: self.shield * factor,
            evasion: self.evasion * factor,
            fire_rate: self.fire_rate * factor,
            hp: self.hp * factor,
            value: self.value * factor,
        }
    }

    /// True if no field exceeds its counterpart in `ceiling`
    pub fn within(&self, ceiling: &StatBundle) -> bool {
        const EPS: f64 = 1e-9;
        self.attack <= ceiling.attack + EPS
            && self.shield <= ceiling.shield + EPS
            && self.evasion <= ceiling.evasion + EPS
            && self.fire_rate <= ceiling.fire_rate + EPS
            && self.hp <= ceiling.hp + EPS
            && self.value <= ceiling.value + EPS
    }
}
