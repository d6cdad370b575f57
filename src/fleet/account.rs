//! Combatant accounts: players and computer-controlled opponents

use serde::{Deserialize, Serialize};

use crate::combat::formation::Formation;
use crate::core::config::EngineConfig;
use crate::core::types::AccountId;
use crate::progression::experience::level_for_experience;
use crate::progression::rank::Rank;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub nickname: String,
    /// Elo-style skill rating
    pub elo: f64,
    pub currency: f64,

    // Battle history
    pub wins: u32,
    pub losses: u32,
    pub damage_dealt: f64,
    pub damage_taken: f64,
    pub ships_destroyed: u32,
    pub ships_lost: u32,

    // Progression (level and rank derive from experience)
    pub experience: f64,
    pub level: u32,
    pub rank: Rank,

    pub default_formation: Formation,
}

impl Account {
    pub fn new(nickname: impl Into<String>, config: &EngineConfig) -> Self {
        Self {
            id: AccountId::new(),
            nickname: nickname.into(),
            elo: config.default_elo,
            currency: 0.0,
            wins: 0,
            losses: 0,
            damage_dealt: 0.0,
            damage_taken: 0.0,
            ships_destroyed: 0,
            ships_lost: 0,
            experience: 0.0,
            level: 1,
            rank: Rank::Ensign,
            default_formation: Formation::default(),
        }
    }

    pub fn with_currency(mut self, currency: f64) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_formation(mut self, formation: Formation) -> Self {
        self.default_formation = formation;
        self
    }

    /// Set experience directly, re-deriving level and rank
    pub fn with_experience(mut self, experience: f64, config: &EngineConfig) -> Self {
        self.experience = 0.0;
        self.gain_experience(experience, config);
        self
    }

    /// Computer-controlled accounts are marked by a nickname prefix
    pub fn is_npc(&self, config: &EngineConfig) -> bool {
        let prefix = config.npc_prefix.to_lowercase();
        !prefix.is_empty() && self.nickname.to_lowercase().starts_with(&prefix)
    }

    /// Add experience and re-derive level and rank. Returns true on level up.
    pub fn gain_experience(&mut self, amount: f64, config: &EngineConfig) -> bool {
        let old_level = self.level;
        self.experience += amount.max(0.0);
        self.level = level_for_experience(self.experience, config.xp_per_level_step);
        self.rank = Rank::for_level(self.level);
        self.level > old_level
    }
}
