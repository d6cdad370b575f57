//! Battles between two accounts
//!
//! `service` is the entry point. It loads both sides from storage, runs the
//! round loop in `combat`, settles the outcome and commits every write at
//! once.

pub mod outcome;
pub mod record;
pub mod rewards;
pub mod service;

pub use outcome::{adjudicate, decide_winner, Adjudication, SideAward, VictoryReason};
pub use record::{BattleExtra, BattleRecord, Participant};
pub use rewards::{apply_account_outcome, apply_ship_outcomes, victory_reward, ShipOutcome};
pub use service::{BattleRequest, BattleService};
