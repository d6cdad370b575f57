//! Ship lifecycle and reward write-back
//!
//! Everything here mutates in-memory copies of stored records. Nothing is
//! persisted until the service commits the whole battle at once.

use crate::battle::outcome::Adjudication;
use crate::combat::resolution::{CombatFleet, CombatReport};
use crate::core::config::EngineConfig;
use crate::core::error::{ArmadaError, Result};
use crate::core::types::Side;
use crate::fleet::{Account, OwnedShip};

/// What happened to one fleet's stored ships
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShipOutcome {
    pub destroyed: u32,
    pub damaged: u32,
    pub restored: u32,
}

/// Write final HP back to the stored ships of one fleet.
///
/// `ships` must line up index-for-index with `fleet.ships`. Human ships that
/// died are destroyed and zeroed; survivors keep proportional damage. NPC
/// ships always come back at full baseline, destroyed or not.
pub fn apply_ship_outcomes(
    fleet: &CombatFleet,
    ships: &mut [OwnedShip],
    owner_is_npc: bool,
) -> Result<ShipOutcome> {
    if fleet.ships.len() != ships.len() {
        return Err(ArmadaError::InvalidArgument(format!(
            "fleet has {} ships but {} records were supplied",
            fleet.ships.len(),
            ships.len()
        )));
    }

    let mut outcome = ShipOutcome::default();
    for (combat, stored) in fleet.ships.iter().zip(ships.iter_mut()) {
        if !combat.is_alive() {
            stored.destroy()?;
            outcome.destroyed += 1;
            if owner_is_npc {
                stored.restore()?;
                outcome.restored += 1;
            }
        } else if owner_is_npc {
            stored.restore()?;
            outcome.restored += 1;
        } else if combat.current_hp < combat.stats.hp {
            stored.degrade(combat.hp_fraction(), combat.current_hp);
            outcome.damaged += 1;
        }
    }
    Ok(outcome)
}

/// Update one account's rating, counters and (for humans) experience.
///
/// Returns true when the experience gained lifted the account to a higher rank.
pub fn apply_account_outcome(
    account: &mut Account,
    side: Side,
    adjudication: &Adjudication,
    report: &CombatReport,
    config: &EngineConfig,
) -> bool {
    let award = adjudication.award(side);
    let opponent = side.opponent();

    if adjudication.winner == side {
        account.wins += 1;
    } else {
        account.losses += 1;
    }
    account.damage_dealt += report.damage_by(side);
    account.damage_taken += report.damage_by(opponent);
    account.ships_destroyed += report.kills_by(side);
    account.ships_lost += report.kills_by(opponent);
    account.elo += award.elo_change;

    if account.is_npc(config) {
        return false;
    }
    let previous_rank = account.rank;
    if account.gain_experience(award.experience, config) {
        tracing::info!(
            account = %account.id,
            level = account.level,
            rank = ?account.rank,
            "level up"
        );
    }
    account.rank.outranks(&previous_rank)
}

/// Currency owed to the winner: a fraction of the losing fleet's value.
/// NPC winners get nothing.
pub fn victory_reward(winner: &Account, losing_fleet: &CombatFleet, config: &EngineConfig) -> f64 {
    if winner.is_npc(config) {
        0.0
    } else {
        losing_fleet.total_value() * config.victory_reward_fraction
    }
}
