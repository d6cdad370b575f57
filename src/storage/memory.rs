//! In-process repository backed by hash maps

use ahash::AHashMap;

use crate::battle::record::BattleRecord;
use crate::core::error::{ArmadaError, Result};
use crate::core::types::{AccountId, ShipId, ShipNumber, TemplateId};
use crate::fleet::{Account, OwnedShip, ShipTemplate};
use crate::storage::{BattleCommit, Repository};

#[derive(Debug, Default, Clone)]
pub struct MemoryRepository {
    accounts: AHashMap<AccountId, Account>,
    ships: AHashMap<ShipId, OwnedShip>,
    templates: AHashMap<TemplateId, ShipTemplate>,
    battles: Vec<BattleRecord>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-loaded with the starter catalog
    pub fn with_starter_catalog() -> Self {
        let mut repo = Self::new();
        for template in ShipTemplate::starter_catalog() {
            repo.templates.insert(template.id, template);
        }
        repo
    }

    pub fn battle_count(&self) -> usize {
        self.battles.len()
    }

    /// A ship write must not collide with another ship's number
    fn check_ship(&self, ship: &OwnedShip) -> Result<()> {
        if !self.accounts.contains_key(&ship.owner) {
            return Err(ArmadaError::AccountNotFound(ship.owner));
        }
        let clash = self.ships.values().any(|other| {
            other.owner == ship.owner && other.ship_number == ship.ship_number && other.id != ship.id
        });
        if clash {
            return Err(ArmadaError::Storage(format!(
                "ship number {} already used by account {}",
                ship.ship_number, ship.owner
            )));
        }
        Ok(())
    }
}

impl Repository for MemoryRepository {
    fn account(&self, id: AccountId) -> Result<Option<Account>> {
        Ok(self.accounts.get(&id).cloned())
    }

    fn ships_of(&self, account: AccountId) -> Result<Vec<OwnedShip>> {
        let mut ships: Vec<_> = self
            .ships
            .values()
            .filter(|s| s.owner == account)
            .cloned()
            .collect();
        ships.sort_by_key(|s| s.ship_number);
        Ok(ships)
    }

    fn ship_by_number(&self, account: AccountId, number: ShipNumber) -> Result<Option<OwnedShip>> {
        Ok(self
            .ships
            .values()
            .find(|s| s.owner == account && s.ship_number == number)
            .cloned())
    }

    fn template(&self, id: TemplateId) -> Result<Option<ShipTemplate>> {
        Ok(self.templates.get(&id).cloned())
    }

    fn templates(&self) -> Result<Vec<ShipTemplate>> {
        let mut templates: Vec<_> = self.templates.values().cloned().collect();
        templates.sort_by_key(|t| t.id);
        Ok(templates)
    }

    fn insert_account(&mut self, account: Account) -> Result<()> {
        if self.accounts.contains_key(&account.id) {
            return Err(ArmadaError::Storage(format!(
                "account {} already exists",
                account.id
            )));
        }
        self.accounts.insert(account.id, account);
        Ok(())
    }

    fn insert_template(&mut self, template: ShipTemplate) -> Result<()> {
        self.templates.insert(template.id, template);
        Ok(())
    }

    fn save_ship(&mut self, ship: OwnedShip) -> Result<()> {
        self.check_ship(&ship)?;
        self.ships.insert(ship.id, ship);
        Ok(())
    }

    fn save_account(&mut self, account: Account) -> Result<()> {
        if !self.accounts.contains_key(&account.id) {
            return Err(ArmadaError::AccountNotFound(account.id));
        }
        self.accounts.insert(account.id, account);
        Ok(())
    }

    fn save_account_and_ship(&mut self, account: Account, ship: OwnedShip) -> Result<()> {
        if !self.accounts.contains_key(&account.id) {
            return Err(ArmadaError::AccountNotFound(account.id));
        }
        self.check_ship(&ship)?;
        self.accounts.insert(account.id, account);
        self.ships.insert(ship.id, ship);
        Ok(())
    }

    fn next_ship_number(&self, account: AccountId) -> Result<ShipNumber> {
        let highest = self
            .ships
            .values()
            .filter(|s| s.owner == account)
            .map(|s| s.ship_number)
            .max()
            .unwrap_or(0);
        Ok(highest + 1)
    }

    fn commit_battle(&mut self, commit: BattleCommit) -> Result<()> {
        // Validate everything first so a rejected commit writes nothing
        for account in &commit.accounts {
            if !self.accounts.contains_key(&account.id) {
                return Err(ArmadaError::AccountNotFound(account.id));
            }
        }
        for ship in &commit.ships {
            if !self.ships.contains_key(&ship.id) {
                return Err(ArmadaError::ShipNotFound {
                    account: ship.owner,
                    ship_number: ship.ship_number,
                });
            }
        }

        for account in commit.accounts {
            self.accounts.insert(account.id, account);
        }
        for ship in commit.ships {
            self.ships.insert(ship.id, ship);
        }
        self.battles.push(commit.record);
        Ok(())
    }

    fn battles_of(&self, account: AccountId) -> Result<Vec<BattleRecord>> {
        Ok(self
            .battles
            .iter()
            .filter(|b| b.involves(account))
            .cloned()
            .collect())
    }
}
