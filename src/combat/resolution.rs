//! Fleet combat resolution
//!
//! Rounds run until one fleet has no live ships or the round cap is hit.
//! Within a round side A fires every volley before side B answers, so A
//! can destroy ships that would otherwise have fired back. That first-mover
//! advantage is part of the rules, not an artifact of iteration order.

use serde::{Deserialize, Serialize};

use crate::combat::formation::Formation;
use crate::combat::log::BattleLog;
use crate::combat::rng::CombatRng;
use crate::core::config::EngineConfig;
use crate::core::types::{AccountId, ShipNumber, Side};
use crate::fleet::StatBundle;

/// A ship as it fights: effective stats plus live HP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatShip {
    pub account: AccountId,
    pub nickname: String,
    pub ship_number: ShipNumber,
    pub name: String,
    /// Post-rank-bonus stats, fixed for the whole battle
    pub stats: StatBundle,
    pub current_hp: f64,
}

impl CombatShip {
    pub fn new(
        account: AccountId,
        nickname: impl Into<String>,
        ship_number: ShipNumber,
        name: impl Into<String>,
        stats: StatBundle,
    ) -> Self {
        Self {
            account,
            nickname: nickname.into(),
            ship_number,
            name: name.into(),
            stats,
            current_hp: stats.hp,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0.0
    }

    pub fn label(&self) -> String {
        format!("{}'s {} #{}", self.nickname, self.name, self.ship_number)
    }

    /// Fraction of starting HP left, in `[0, 1]`
    pub fn hp_fraction(&self) -> f64 {
        if self.stats.hp <= 0.0 {
            0.0
        } else {
            (self.current_hp / self.stats.hp).clamp(0.0, 1.0)
        }
    }
}

/// One side of a battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatFleet {
    pub side: Side,
    pub formation: Formation,
    pub ships: Vec<CombatShip>,
}

impl CombatFleet {
    pub fn new(side: Side, formation: Formation, ships: Vec<CombatShip>) -> Self {
        Self {
            side,
            formation,
            ships,
        }
    }

    pub fn alive_indices(&self) -> Vec<usize> {
        self.ships
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_alive())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn alive_count(&self) -> usize {
        self.ships.iter().filter(|s| s.is_alive()).count()
    }

    pub fn is_wiped_out(&self) -> bool {
        self.alive_count() == 0
    }

    pub fn starting_hp(&self) -> f64 {
        self.ships.iter().map(|s| s.stats.hp).sum()
    }

    pub fn remaining_hp(&self) -> f64 {
        self.ships.iter().map(|s| s.current_hp.max(0.0)).sum()
    }

    /// Total effective value at battle time
    pub fn total_value(&self) -> f64 {
        self.ships.iter().map(|s| s.stats.value).sum()
    }
}

/// Damage and kills from one side's turn within a round
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VolleyResult {
    pub damage: f64,
    pub kills: u32,
}

/// Outcome of the simulation, before adjudication
#[derive(Debug, Clone, PartialEq)]
pub struct CombatReport {
    pub log: BattleLog,
    pub rounds_fought: u32,
    pub damage_a: f64,
    pub damage_b: f64,
    /// Ships destroyed *by* side A
    pub kills_a: u32,
    /// Ships destroyed *by* side B
    pub kills_b: u32,
}

impl CombatReport {
    pub fn damage_by(&self, side: Side) -> f64 {
        match side {
            Side::A => self.damage_a,
            Side::B => self.damage_b,
        }
    }

    pub fn kills_by(&self, side: Side) -> u32 {
        match side {
            Side::A => self.kills_a,
            Side::B => self.kills_b,
        }
    }
}

/// Damage of one landed shot
pub fn shot_damage(attack: f64, target_shield: f64, roll: f64, config: &EngineConfig) -> f64 {
    ((attack - config.shield_factor * target_shield) * roll).max(config.min_damage)
}

/// Chance that `target` dodges a shot while flying in `formation`
pub fn evasion_chance(target: &CombatShip, formation: Formation) -> f64 {
    (target.stats.evasion * formation.evasion_multiplier()).clamp(0.0, 1.0)
}

/// Every live attacker picks a target and fires its full burst.
///
/// A burst stops as soon as its target dies; leftover shots are lost.
pub fn fire_volley<G: CombatRng>(
    attackers: &CombatFleet,
    defenders: &mut CombatFleet,
    config: &EngineConfig,
    rng: &mut G,
    log: &mut BattleLog,
) -> VolleyResult {
    let mut result = VolleyResult::default();
    let (roll_lo, roll_hi) = config.damage_variance;

    for attacker in attackers.ships.iter().filter(|s| s.is_alive()) {
        let alive = defenders.alive_indices();
        let Some(target_idx) = attackers
            .formation
            .select_target(&defenders.ships, &alive, rng)
        else {
            break;
        };

        let dodge = evasion_chance(&defenders.ships[target_idx], defenders.formation);
        let target = &mut defenders.ships[target_idx];

        for _ in 0..attacker.stats.shots() {
            if rng.chance() < dodge {
                log.miss(attacker, target);
                continue;
            }

            let roll = rng.uniform(roll_lo, roll_hi);
            let damage = shot_damage(attacker.stats.attack, target.stats.shield, roll, config);
            target.current_hp -= damage;
            result.damage += damage;
            log.hit(attacker, target, damage);

            if !target.is_alive() {
                result.kills += 1;
                log.destroyed(attacker, target);
                break;
            }
        }
    }

    result
}

/// Run the battle, mutating both fleets' `current_hp` in place
pub fn resolve_fleet_combat<G: CombatRng>(
    fleet_a: &mut CombatFleet,
    fleet_b: &mut CombatFleet,
    config: &EngineConfig,
    rng: &mut G,
) -> CombatReport {
    let mut log = BattleLog::new();
    let mut report_rounds = 0;
    let mut damage_a = 0.0;
    let mut damage_b = 0.0;
    let mut kills_a = 0;
    let mut kills_b = 0;

    let name_of = |fleet: &CombatFleet| {
        fleet
            .ships
            .first()
            .map(|s| s.nickname.clone())
            .unwrap_or_default()
    };
    log.opening(
        (&name_of(&*fleet_a), fleet_a.formation, fleet_a.ships.len()),
        (&name_of(&*fleet_b), fleet_b.formation, fleet_b.ships.len()),
    );

    for round in 1..=config.max_rounds {
        if fleet_a.is_wiped_out() || fleet_b.is_wiped_out() {
            break;
        }
        report_rounds = round;
        log.round(round);

        let volley = fire_volley(fleet_a, fleet_b, config, rng, &mut log);
        damage_a += volley.damage;
        kills_a += volley.kills;

        if fleet_b.is_wiped_out() {
            tracing::debug!(round, "side B wiped out before counter-attack");
            break;
        }

        let volley = fire_volley(fleet_b, fleet_a, config, rng, &mut log);
        damage_b += volley.damage;
        kills_b += volley.kills;

        tracing::debug!(
            round,
            alive_a = fleet_a.alive_count(),
            alive_b = fleet_b.alive_count(),
            "round complete"
        );
    }

    CombatReport {
        log,
        rounds_fought: report_rounds,
        damage_a,
        damage_b,
        kills_a,
        kills_b,
    }
}
