//! Outcome adjudication
//!
//! The winner chain is total: survivors, then damage, then survivor count,
//! then a coin flip. A battle is never reported as a draw.

use serde::{Deserialize, Serialize};

use crate::combat::resolution::{CombatFleet, CombatReport};
use crate::combat::rng::CombatRng;
use crate::core::config::EngineConfig;
use crate::core::types::Side;
use crate::fleet::Account;
use crate::progression::{experience_award, rating_change};

/// Which rule of the chain decided the battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VictoryReason {
    /// Only one side had ships left
    LastFleetStanding,
    /// Higher cumulative damage dealt
    Damage,
    /// Damage tied; more surviving ships
    Survivors,
    /// Everything tied
    CoinFlip,
}

/// Pick the winner from final survivors and damage totals
pub fn decide_winner<G: CombatRng>(
    fleet_a: &CombatFleet,
    fleet_b: &CombatFleet,
    report: &CombatReport,
    rng: &mut G,
) -> (Side, VictoryReason) {
    let alive_a = fleet_a.alive_count();
    let alive_b = fleet_b.alive_count();

    match (alive_a > 0, alive_b > 0) {
        (true, false) => return (Side::A, VictoryReason::LastFleetStanding),
        (false, true) => return (Side::B, VictoryReason::LastFleetStanding),
        _ => {}
    }

    if report.damage_a != report.damage_b {
        let side = if report.damage_a > report.damage_b {
            Side::A
        } else {
            Side::B
        };
        return (side, VictoryReason::Damage);
    }

    if alive_a != alive_b {
        let side = if alive_a > alive_b { Side::A } else { Side::B };
        return (side, VictoryReason::Survivors);
    }

    let side = if rng.coin() { Side::A } else { Side::B };
    (side, VictoryReason::CoinFlip)
}

/// Rating and experience changes for one side
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SideAward {
    pub elo_change: f64,
    /// Always zero for NPC accounts
    pub experience: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjudication {
    pub winner: Side,
    pub reason: VictoryReason,
    pub award_a: SideAward,
    pub award_b: SideAward,
}

impl Adjudication {
    pub fn loser(&self) -> Side {
        self.winner.opponent()
    }

    pub fn award(&self, side: Side) -> SideAward {
        match side {
            Side::A => self.award_a,
            Side::B => self.award_b,
        }
    }
}

fn side_award(own: &Account, other: &Account, won: bool, config: &EngineConfig) -> SideAward {
    let experience = if own.is_npc(config) {
        0.0
    } else {
        experience_award(won, own.level, other.level, config)
    };
    SideAward {
        elo_change: rating_change(own.elo, other.elo, won, config.elo_k_factor),
        experience,
    }
}

/// Decide the winner and compute both sides' rating and experience changes
pub fn adjudicate<G: CombatRng>(
    account_a: &Account,
    account_b: &Account,
    fleet_a: &CombatFleet,
    fleet_b: &CombatFleet,
    report: &CombatReport,
    config: &EngineConfig,
    rng: &mut G,
) -> Adjudication {
    let (winner, reason) = decide_winner(fleet_a, fleet_b, report, rng);
    let a_won = winner == Side::A;

    Adjudication {
        winner,
        reason,
        award_a: side_award(account_a, account_b, a_won, config),
        award_b: side_award(account_b, account_a, !a_won, config),
    }
}
