//! Elo-style skill rating

/// Expected score of a player rated `own` against one rated `other`
pub fn expected_score(own: f64, other: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((other - own) / 400.0))
}

/// Rating change for one side.
///
/// Each side is updated with its own expectation, so the pair of changes is
/// only zero-sum to the extent that the two expectations sum to one.
pub fn rating_change(own: f64, other: f64, won: bool, k_factor: f64) -> f64 {
    let actual = if won { 1.0 } else { 0.0 };
    k_factor * (actual - expected_score(own, other))
}

/// Changes for (winner, loser)
pub fn rating_changes(winner: f64, loser: f64, k_factor: f64) -> (f64, f64) {
    (
        rating_change(winner, loser, true, k_factor),
        rating_change(loser, winner, false, k_factor),
    )
}
