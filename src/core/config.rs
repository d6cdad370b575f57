//! Engine configuration with documented constants
//!
//! Every tunable number of the battle and progression rules lives here.
//! Defaults reproduce the canonical rules; `data/engine.toml` ships the
//! same values so deployments can tweak them without a rebuild.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{ArmadaError, Result};
use crate::progression::rank::{Rank, RankBonus};

/// Configuration for battle resolution and progression
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === COMBAT ===
    /// Hard cap on rounds per battle
    pub max_rounds: u32,

    /// Fraction of the target's shield subtracted from each shot
    pub shield_factor: f64,

    /// Floor for the damage of a landed shot
    pub min_damage: f64,

    /// Inclusive-exclusive range of the per-shot damage roll
    pub damage_variance: (f64, f64),

    // === RATING ===
    /// Elo K-factor
    pub elo_k_factor: f64,

    /// Rating assigned to new accounts
    pub default_elo: f64,

    // === EXPERIENCE ===
    pub xp_win: f64,
    pub xp_loss: f64,

    /// Multiplier gain per level the opponent is above you
    pub xp_bonus_per_level: f64,

    /// Multiplier loss per level the opponent is below you
    pub xp_penalty_per_level: f64,

    /// Floor for the level-difference multiplier
    pub xp_min_multiplier: f64,

    /// Level L starts at `xp_per_level_step * (L - 1)^2` experience
    pub xp_per_level_step: f64,

    // === ECONOMY ===
    /// Fraction of the losing fleet's value credited to a human winner
    pub victory_reward_fraction: f64,

    /// Fraction of current value paid back when selling a ship
    pub sell_fraction: f64,

    // === ACCOUNTS ===
    /// Nickname prefix (case-insensitive) marking computer-controlled accounts
    pub npc_prefix: String,

    /// Per-rank combat bonuses and active-ship caps
    pub ranks: Vec<RankBonus>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_rounds: 20,
            shield_factor: 0.5,
            min_damage: 1.0,
            damage_variance: (0.85, 1.15),

            elo_k_factor: 32.0,
            default_elo: 1000.0,

            xp_win: 100.0,
            xp_loss: 50.0,
            xp_bonus_per_level: 0.15,
            xp_penalty_per_level: 0.10,
            xp_min_multiplier: 0.3,
            xp_per_level_step: 100.0,

            victory_reward_fraction: 0.10,
            sell_fraction: 0.5,

            npc_prefix: "npc_".to_string(),
            ranks: RankBonus::default_table(),
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Bonus row for a rank, if the table defines one
    pub fn rank_bonus(&self, rank: Rank) -> Option<&RankBonus> {
        self.ranks.iter().find(|row| row.rank == rank)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.max_rounds == 0 {
            return Err(ArmadaError::Config("max_rounds must be at least 1".into()));
        }

        let (lo, hi) = self.damage_variance;
        if lo <= 0.0 || lo > hi {
            return Err(ArmadaError::Config(format!(
                "damage_variance ({}, {}) must be positive and ordered",
                lo, hi
            )));
        }

        if self.xp_per_level_step <= 0.0 {
            return Err(ArmadaError::Config(
                "xp_per_level_step must be positive".into(),
            ));
        }

        if !(0.0..=1.0).contains(&self.xp_min_multiplier) {
            return Err(ArmadaError::Config(format!(
                "xp_min_multiplier ({}) must be within [0, 1]",
                self.xp_min_multiplier
            )));
        }

        for rank in Rank::ALL {
            if self.rank_bonus(rank).is_none() {
                return Err(ArmadaError::Config(format!(
                    "rank table has no row for {:?}",
                    rank
                )));
            }
        }

        Ok(())
    }
}

/// Load a config from a TOML file
pub fn load_config(path: impl AsRef<Path>) -> Result<EngineConfig> {
    let content = fs::read_to_string(path.as_ref())?;
    EngineConfig::from_toml_str(&content)
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<EngineConfig> = OnceLock::new();

/// Get the global engine config (initializes with defaults if not set)
pub fn config() -> &'static EngineConfig {
    CONFIG.get_or_init(EngineConfig::default)
}

/// Set the global engine config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: EngineConfig) -> std::result::Result<(), EngineConfig> {
    CONFIG.set(config)
}
