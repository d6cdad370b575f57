//! Ranks and the per-rank bonus table
//!
//! Bonuses are a temporary combat buff: they are resolved fresh for every
//! battle and never written back to stored ship stats.

use serde::{Deserialize, Serialize};

use crate::core::config::EngineConfig;
use crate::fleet::stats::StatBundle;

/// Ordered progression tier derived from level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Rank {
    #[default]
    Ensign = 1,
    Lieutenant = 2,
    LieutenantCommander = 3,
    Commander = 4,
    Captain = 5,
    Admiral = 6,
}

impl Rank {
    pub const ALL: [Rank; 6] = [
        Rank::Ensign,
        Rank::Lieutenant,
        Rank::LieutenantCommander,
        Rank::Commander,
        Rank::Captain,
        Rank::Admiral,
    ];

    /// Rank held at a given level
    pub fn for_level(level: u32) -> Self {
        match level {
            0..=4 => Rank::Ensign,
            5..=9 => Rank::Lieutenant,
            10..=14 => Rank::LieutenantCommander,
            15..=19 => Rank::Commander,
            20..=29 => Rank::Captain,
            _ => Rank::Admiral,
        }
    }

    /// Returns true if this rank outranks the other
    pub fn outranks(&self, other: &Rank) -> bool {
        (*self as u8) > (*other as u8)
    }
}

/// One row of the rank table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankBonus {
    pub rank: Rank,
    #[serde(default)]
    pub attack: f64,
    #[serde(default)]
    pub shield: f64,
    #[serde(default)]
    pub hp: f64,
    #[serde(default)]
    pub evasion: f64,
    #[serde(default)]
    pub fire_rate: f64,
    #[serde(default)]
    pub value: f64,
    /// Cap on simultaneously `Active` ships
    pub max_active_ships: usize,
}

impl RankBonus {
    /// Uniform bonus on every stat except evasion, which gets half
    fn uniform(rank: Rank, bonus: f64, max_active_ships: usize) -> Self {
        Self {
            rank,
            attack: bonus,
            shield: bonus,
            hp: bonus,
            evasion: bonus / 2.0,
            fire_rate: bonus,
            value: bonus,
            max_active_ships,
        }
    }

    pub fn default_table() -> Vec<RankBonus> {
        vec![
            Self::uniform(Rank::Ensign, 0.0, 3),
            Self::uniform(Rank::Lieutenant, 0.05, 4),
            Self::uniform(Rank::LieutenantCommander, 0.10, 5),
            Self::uniform(Rank::Commander, 0.15, 6),
            Self::uniform(Rank::Captain, 0.20, 8),
            Self::uniform(Rank::Admiral, 0.25, 10),
        ]
    }

    /// Stats with every non-zero bonus fraction applied as `x * (1 + b)`
    pub fn apply(&self, stats: &StatBundle) -> StatBundle {
        fn boost(original: f64, bonus: f64) -> f64 {
            if bonus == 0.0 {
                original
            } else {
                original * (1.0 + bonus)
            }
        }

        StatBundle {
            attack: boost(stats.attack, self.attack),
            shield: boost(stats.shield, self.shield),
            evasion: boost(stats.evasion, self.evasion),
            fire_rate: boost(stats.fire_rate, self.fire_rate),
            hp: boost(stats.hp, self.hp),
            value: boost(stats.value, self.value),
        }
    }
}

/// Effective combat stats for a ship flown by an account of `rank`.
///
/// A rank without a table row fights unbuffed.
pub fn effective_stats(config: &EngineConfig, rank: Rank, stats: &StatBundle) -> StatBundle {
    match config.rank_bonus(rank) {
        Some(bonus) => bonus.apply(stats),
        None => *stats,
    }
}

/// Active-ship cap for a rank; zero if the table has no row
pub fn max_active_ships(config: &EngineConfig, rank: Rank) -> usize {
    config
        .rank_bonus(rank)
        .map(|row| row.max_active_ships)
        .unwrap_or(0)
}
