pub mod formation;
pub mod log;
pub mod resolution;
pub mod rng;

pub use formation::Formation;
pub use log::BattleLog;
pub use resolution::{
    evasion_chance, fire_volley, resolve_fleet_combat, shot_damage, CombatFleet, CombatReport,
    CombatShip, VolleyResult,
};
pub use rng::{CombatRng, RandSource};
