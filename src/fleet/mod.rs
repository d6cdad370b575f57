//! Stat and lifecycle model: templates, owned ships, accounts

pub mod account;
pub mod ship;
pub mod stats;
pub mod template;

pub use account::Account;
pub use ship::{OwnedShip, ShipStatus};
pub use stats::StatBundle;
pub use template::ShipTemplate;
