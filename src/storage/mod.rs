//! Persistence boundary
//!
//! The engine reads and writes accounts, ships and battle records through
//! `Repository`. Storage technology is the implementor's business; the one
//! requirement is that `commit_battle` is all-or-nothing.

pub mod memory;

use crate::battle::record::BattleRecord;
use crate::core::error::Result;
use crate::core::types::{AccountId, ShipNumber, TemplateId};
use crate::fleet::{Account, OwnedShip, ShipTemplate};

pub use memory::MemoryRepository;

/// Everything a resolved battle writes, applied atomically
#[derive(Debug, Clone)]
pub struct BattleCommit {
    pub accounts: Vec<Account>,
    pub ships: Vec<OwnedShip>,
    pub record: BattleRecord,
}

pub trait Repository {
    fn account(&self, id: AccountId) -> Result<Option<Account>>;

    /// Every ship the account has ever held, sold ones included
    fn ships_of(&self, account: AccountId) -> Result<Vec<OwnedShip>>;

    fn ship_by_number(&self, account: AccountId, number: ShipNumber) -> Result<Option<OwnedShip>>;

    fn template(&self, id: TemplateId) -> Result<Option<ShipTemplate>>;

    fn templates(&self) -> Result<Vec<ShipTemplate>>;

    fn insert_account(&mut self, account: Account) -> Result<()>;

    fn insert_template(&mut self, template: ShipTemplate) -> Result<()>;

    /// Insert or replace a single ship
    fn save_ship(&mut self, ship: OwnedShip) -> Result<()>;

    fn save_account(&mut self, account: Account) -> Result<()>;

    /// Write an account and one of its ships together
    fn save_account_and_ship(&mut self, account: Account, ship: OwnedShip) -> Result<()>;

    /// Next unused per-account ship number
    fn next_ship_number(&self, account: AccountId) -> Result<ShipNumber>;

    /// Apply every write of a battle, or none of them
    fn commit_battle(&mut self, commit: BattleCommit) -> Result<()>;

    /// Records the account took part in, oldest first
    fn battles_of(&self, account: AccountId) -> Result<Vec<BattleRecord>>;
}
