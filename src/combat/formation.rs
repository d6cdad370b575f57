//! Fleet formations
//!
//! A formation is two policies in one tag:
//! - evasion: applies to the *defending* fleet's own ships
//! - targeting: applies to the *attacking* fleet's choice of target

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::combat::resolution::CombatShip;
use crate::combat::rng::CombatRng;
use crate::core::error::ArmadaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Formation {
    /// Fire at a random live ship
    #[default]
    Aggressive,
    /// Finish off the weakest ship; harder to hit
    Defensive,
    /// Eliminate the biggest threat; easier to hit
    Tactical,
}

impl Formation {
    pub const ALL: [Formation; 3] = [
        Formation::Aggressive,
        Formation::Defensive,
        Formation::Tactical,
    ];

    /// Multiplier on a defending ship's evasion
    pub fn evasion_multiplier(self) -> f64 {
        match self {
            Formation::Aggressive => 1.0,
            Formation::Defensive => 1.2,
            Formation::Tactical => 0.9,
        }
    }

    /// Pick a target among `alive` (indices into `fleet`).
    ///
    /// Ties on HP or attack resolve to the earliest ship in fleet order.
    pub fn select_target(
        self,
        fleet: &[CombatShip],
        alive: &[usize],
        rng: &mut impl CombatRng,
    ) -> Option<usize> {
        if alive.is_empty() {
            return None;
        }
        match self {
            Formation::Aggressive => Some(alive[rng.index(alive.len())]),
            Formation::Defensive => alive
                .iter()
                .copied()
                .min_by_key(|&i| OrderedFloat(fleet[i].current_hp)),
            Formation::Tactical => alive
                .iter()
                .copied()
                .max_by_key(|&i| (OrderedFloat(fleet[i].stats.attack), Reverse(i))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Formation::Aggressive => "AGGRESSIVE",
            Formation::Defensive => "DEFENSIVE",
            Formation::Tactical => "TACTICAL",
        }
    }
}

impl fmt::Display for Formation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Formation {
    type Err = ArmadaError;

    /// Unknown tags are rejected, never defaulted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AGGRESSIVE" => Ok(Formation::Aggressive),
            "DEFENSIVE" => Ok(Formation::Defensive),
            "TACTICAL" => Ok(Formation::Tactical),
            _ => Err(ArmadaError::InvalidArgument(format!(
                "unknown formation '{}'",
                s
            ))),
        }
    }
}
