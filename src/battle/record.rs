//! Persisted battle record
//!
//! This is the stable JSON shape handed to every caller. A record is built
//! once per battle and never modified after insertion.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::battle::outcome::VictoryReason;
use crate::combat::formation::Formation;
use crate::combat::resolution::CombatShip;
use crate::core::types::{AccountId, BattleId, ShipNumber};

/// Pre-battle effective stats of one participating ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub account_id: AccountId,
    pub nickname: String,
    pub ship_number: ShipNumber,
    pub ship_name: String,
    pub attack: f64,
    pub shield: f64,
    pub evasion: f64,
    pub fire_rate: f64,
    pub hp: f64,
    pub value: f64,
}

impl From<&CombatShip> for Participant {
    fn from(ship: &CombatShip) -> Self {
        Self {
            account_id: ship.account,
            nickname: ship.nickname.clone(),
            ship_number: ship.ship_number,
            ship_name: ship.name.clone(),
            attack: ship.stats.attack,
            shield: ship.stats.shield,
            evasion: ship.stats.evasion,
            fire_rate: ship.stats.fire_rate,
            hp: ship.stats.hp,
            value: ship.stats.value,
        }
    }
}

/// Extension map; every per-side entry is keyed by account id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BattleExtra {
    pub formations: BTreeMap<AccountId, Formation>,
    /// Final HP per ship, in participant order, clamped at zero
    pub final_hp: BTreeMap<AccountId, Vec<f64>>,
    pub total_damage: BTreeMap<AccountId, f64>,
    /// Enemy ships each side destroyed
    pub ships_destroyed: BTreeMap<AccountId, u32>,
    #[serde(default)]
    pub rounds_fought: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_by: Option<VictoryReason>,
    #[serde(default)]
    pub elo_change: BTreeMap<AccountId, f64>,
    #[serde(default)]
    pub experience_gained: BTreeMap<AccountId, f64>,
    #[serde(default)]
    pub currency_reward: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleRecord {
    pub battle_id: BattleId,
    pub timestamp: DateTime<Utc>,
    pub participants: Vec<Participant>,
    pub winner_account_id: AccountId,
    pub battle_log: Vec<String>,
    pub extra: BattleExtra,
}

impl BattleRecord {
    pub fn involves(&self, account: AccountId) -> bool {
        self.participants.iter().any(|p| p.account_id == account)
    }

    pub fn participants_of(&self, account: AccountId) -> impl Iterator<Item = &Participant> {
        self.participants
            .iter()
            .filter(move |p| p.account_id == account)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
