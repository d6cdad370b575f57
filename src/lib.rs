//! Armada - persistent fleet combat engine
//!
//! Accounts own ships, field them in fleets and fight round-based battles.
//! Results feed back into Elo ratings, experience, ranks and the ships
//! themselves.

pub mod battle;
pub mod combat;
pub mod core;
pub mod fleet;
pub mod progression;
pub mod storage;
