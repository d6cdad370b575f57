//! Experience awards and level derivation

use crate::core::config::EngineConfig;

/// Multiplier for fighting an opponent `opponent_level - own_level` levels away.
///
/// Stronger opponents pay `1 + 0.15d`; weaker ones `max(0.3, 1 - 0.10d)`.
pub fn level_multiplier(own_level: u32, opponent_level: u32, config: &EngineConfig) -> f64 {
    if opponent_level > own_level {
        let d = (opponent_level - own_level) as f64;
        1.0 + config.xp_bonus_per_level * d
    } else if opponent_level < own_level {
        let d = (own_level - opponent_level) as f64;
        (1.0 - config.xp_penalty_per_level * d).max(config.xp_min_multiplier)
    } else {
        1.0
    }
}

/// Experience earned by one side of a battle
pub fn experience_award(won: bool, own_level: u32, opponent_level: u32, config: &EngineConfig) -> f64 {
    let base = if won { config.xp_win } else { config.xp_loss };
    base * level_multiplier(own_level, opponent_level, config)
}

/// Level reached with `experience` points: level L starts at `step * (L - 1)^2`
pub fn level_for_experience(experience: f64, step: f64) -> u32 {
    if experience <= 0.0 || step <= 0.0 {
        return 1;
    }
    let mut level = (experience / step).sqrt().floor() as u32 + 1;
    // sqrt rounding can land one short at exact thresholds
    while experience_for_level(level + 1, step) <= experience {
        level += 1;
    }
    level
}

/// Experience needed to reach `level`
pub fn experience_for_level(level: u32, step: f64) -> f64 {
    let below = level.saturating_sub(1) as f64;
    step * below * below
}
