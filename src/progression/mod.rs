//! Progression: rank bonuses, skill rating, experience

pub mod elo;
pub mod experience;
pub mod rank;

pub use elo::{expected_score, rating_change, rating_changes};
pub use experience::{experience_award, level_for_experience, level_multiplier};
pub use rank::{effective_stats, max_active_ships, Rank, RankBonus};
