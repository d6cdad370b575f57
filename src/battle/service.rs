//! Battle service: the engine's public operations
//!
//! Each operation validates its inputs completely before touching any
//! record, then writes through the repository in a single call. A caller
//! running several services against shared storage must wrap each call in
//! its own transaction; the service does no locking of its own.

use std::collections::HashSet;

use chrono::Utc;
use rand::rngs::StdRng;

use crate::battle::outcome::{adjudicate, Adjudication};
use crate::battle::record::{BattleExtra, BattleRecord, Participant};
use crate::battle::rewards::{apply_account_outcome, apply_ship_outcomes, victory_reward};
use crate::combat::formation::Formation;
use crate::combat::resolution::{resolve_fleet_combat, CombatFleet, CombatReport, CombatShip};
use crate::combat::rng::{CombatRng, RandSource};
use crate::core::config::EngineConfig;
use crate::core::error::{ArmadaError, Result};
use crate::core::types::{AccountId, BattleId, ShipNumber, Side, TemplateId};
use crate::fleet::{Account, OwnedShip, ShipStatus};
use crate::progression::{effective_stats, max_active_ships};
use crate::storage::{BattleCommit, Repository};

/// Input of `resolve_battle`
#[derive(Debug, Clone, PartialEq)]
pub struct BattleRequest {
    pub account_a: AccountId,
    pub account_b: AccountId,
    pub ships_a: Vec<ShipNumber>,
    pub ships_b: Vec<ShipNumber>,
    /// `None` falls back to the account's default formation
    pub formation_a: Option<Formation>,
    pub formation_b: Option<Formation>,
}

impl BattleRequest {
    pub fn new(
        account_a: AccountId,
        ships_a: Vec<ShipNumber>,
        account_b: AccountId,
        ships_b: Vec<ShipNumber>,
    ) -> Self {
        Self {
            account_a,
            account_b,
            ships_a,
            ships_b,
            formation_a: None,
            formation_b: None,
        }
    }

    pub fn with_formations(mut self, a: Option<Formation>, b: Option<Formation>) -> Self {
        self.formation_a = a;
        self.formation_b = b;
        self
    }

    /// Set formations from raw tags; an unknown tag is an error
    pub fn with_formation_tags(self, a: Option<&str>, b: Option<&str>) -> Result<Self> {
        let a = a.map(str::parse::<Formation>).transpose()?;
        let b = b.map(str::parse::<Formation>).transpose()?;
        Ok(self.with_formations(a, b))
    }

    fn validate(&self) -> Result<()> {
        if self.account_a == self.account_b {
            return Err(ArmadaError::InvalidArgument(
                "an account cannot battle itself".into(),
            ));
        }
        for (label, ships) in [("A", &self.ships_a), ("B", &self.ships_b)] {
            if ships.is_empty() {
                return Err(ArmadaError::InvalidArgument(format!(
                    "side {} has no ships",
                    label
                )));
            }
            let unique: HashSet<_> = ships.iter().collect();
            if unique.len() != ships.len() {
                return Err(ArmadaError::InvalidArgument(format!(
                    "side {} lists a ship more than once",
                    label
                )));
            }
        }
        Ok(())
    }
}

/// One side, fully resolved from storage
struct LoadedSide {
    account: Account,
    ships: Vec<OwnedShip>,
    formation: Formation,
    is_npc: bool,
}

pub struct BattleService<R, G = RandSource<StdRng>> {
    repo: R,
    config: EngineConfig,
    rng: G,
}

impl<R: Repository> BattleService<R> {
    /// Service with an unseeded random source
    pub fn new(repo: R, config: EngineConfig) -> Self {
        Self {
            repo,
            config,
            rng: RandSource::from_entropy(),
        }
    }
}

impl<R: Repository, G: CombatRng> BattleService<R, G> {
    /// Service with an injected random source
    pub fn with_rng(repo: R, config: EngineConfig, rng: G) -> Self {
        Self { repo, config, rng }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn repository_mut(&mut self) -> &mut R {
        &mut self.repo
    }

    fn load_account(&self, id: AccountId) -> Result<Account> {
        self.repo
            .account(id)?
            .ok_or(ArmadaError::AccountNotFound(id))
    }

    fn load_ship(&self, account: AccountId, number: ShipNumber) -> Result<OwnedShip> {
        self.repo
            .ship_by_number(account, number)?
            .ok_or(ArmadaError::ShipNotFound {
                account,
                ship_number: number,
            })
    }

    fn load_side(
        &self,
        id: AccountId,
        numbers: &[ShipNumber],
        formation: Option<Formation>,
    ) -> Result<LoadedSide> {
        let account = self.load_account(id)?;
        let ships = numbers
            .iter()
            .map(|&number| {
                let ship = self.load_ship(id, number)?;
                if !ship.is_active() {
                    return Err(ArmadaError::ShipNotActive {
                        account: id,
                        ship_number: number,
                        status: ship.status,
                    });
                }
                Ok(ship)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(LoadedSide {
            formation: formation.unwrap_or(account.default_formation),
            is_npc: account.is_npc(&self.config),
            account,
            ships,
        })
    }

    fn build_fleet(&self, side: Side, loaded: &LoadedSide) -> CombatFleet {
        let ships = loaded
            .ships
            .iter()
            .map(|ship| {
                CombatShip::new(
                    loaded.account.id,
                    loaded.account.nickname.clone(),
                    ship.ship_number,
                    ship.name.clone(),
                    effective_stats(&self.config, loaded.account.rank, &ship.current),
                )
            })
            .collect();
        CombatFleet::new(side, loaded.formation, ships)
    }

    /// Fight a battle between two accounts and persist every consequence.
    ///
    /// Returns the immutable record and a one-line summary.
    pub fn resolve_battle(&mut self, request: &BattleRequest) -> Result<(BattleRecord, String)> {
        request.validate()?;
        let mut side_a = self.load_side(request.account_a, &request.ships_a, request.formation_a)?;
        let mut side_b = self.load_side(request.account_b, &request.ships_b, request.formation_b)?;

        let mut fleet_a = self.build_fleet(Side::A, &side_a);
        let mut fleet_b = self.build_fleet(Side::B, &side_b);
        let participants: Vec<Participant> = fleet_a
            .ships
            .iter()
            .chain(fleet_b.ships.iter())
            .map(Participant::from)
            .collect();

        let mut report = resolve_fleet_combat(&mut fleet_a, &mut fleet_b, &self.config, &mut self.rng);
        let adjudication = adjudicate(
            &side_a.account,
            &side_b.account,
            &fleet_a,
            &fleet_b,
            &report,
            &self.config,
            &mut self.rng,
        );

        let outcome_a = apply_ship_outcomes(&fleet_a, &mut side_a.ships, side_a.is_npc)?;
        let outcome_b = apply_ship_outcomes(&fleet_b, &mut side_b.ships, side_b.is_npc)?;
        let promoted_a =
            apply_account_outcome(&mut side_a.account, Side::A, &adjudication, &report, &self.config);
        let promoted_b =
            apply_account_outcome(&mut side_b.account, Side::B, &adjudication, &report, &self.config);

        let (winner, losing_fleet) = match adjudication.winner {
            Side::A => (&mut side_a.account, &fleet_b),
            Side::B => (&mut side_b.account, &fleet_a),
        };
        let reward = victory_reward(winner, losing_fleet, &self.config);
        winner.currency += reward;
        let winner_id = winner.id;
        let winner_name = winner.nickname.clone();

        let message = format!(
            "{} wins after {} round(s) ({:?})",
            winner_name, report.rounds_fought, adjudication.reason
        );
        report.log.push(format!("Battle over: {}", message));

        let record = build_record(
            participants,
            winner_id,
            &side_a,
            &side_b,
            &fleet_a,
            &fleet_b,
            report,
            &adjudication,
            reward,
        );

        let (id_a, id_b) = (side_a.account.id, side_b.account.id);
        let mut ships = side_a.ships;
        ships.extend(side_b.ships);
        self.repo.commit_battle(BattleCommit {
            accounts: vec![side_a.account, side_b.account],
            ships,
            record: record.clone(),
        })?;

        tracing::info!(
            battle = %record.battle_id,
            winner = %winner_id,
            rounds = record.extra.rounds_fought,
            damage_a = record.extra.total_damage.get(&id_a).copied().unwrap_or_default(),
            damage_b = record.extra.total_damage.get(&id_b).copied().unwrap_or_default(),
            destroyed_a = outcome_a.destroyed,
            destroyed_b = outcome_b.destroyed,
            damaged_a = outcome_a.damaged,
            damaged_b = outcome_b.damaged,
            restored = outcome_a.restored + outcome_b.restored,
            promoted_a,
            promoted_b,
            "battle resolved"
        );

        Ok((record, message))
    }

    /// `Owned -> Active`, refused once the rank's active-ship cap is reached
    pub fn set_ship_active(&mut self, account: AccountId, number: ShipNumber) -> Result<(OwnedShip, String)> {
        let owner = self.load_account(account)?;
        let mut ship = self.load_ship(account, number)?;
        if ship.status != ShipStatus::Owned {
            return Err(ArmadaError::InvalidTransition {
                from: ship.status,
                to: ShipStatus::Active,
            });
        }

        let current_active_ships = self
            .repo
            .ships_of(account)?
            .iter()
            .filter(|s| s.is_active())
            .count();
        let max_active = max_active_ships(&self.config, owner.rank);
        if current_active_ships >= max_active {
            tracing::warn!(
                account = %account,
                current = current_active_ships,
                max = max_active,
                "activation refused: active ship limit reached"
            );
            return Err(ArmadaError::CapacityExceeded {
                current_active_ships,
                max_active_ships: max_active,
            });
        }

        ship.transition(ShipStatus::Active)?;
        self.repo.save_ship(ship.clone())?;
        let message = format!(
            "{} #{} is now active ({}/{})",
            ship.name,
            ship.ship_number,
            current_active_ships + 1,
            max_active
        );
        Ok((ship, message))
    }

    /// `Active -> Owned`, always allowed
    pub fn set_ship_inactive(&mut self, account: AccountId, number: ShipNumber) -> Result<(OwnedShip, String)> {
        self.load_account(account)?;
        let mut ship = self.load_ship(account, number)?;
        if ship.status != ShipStatus::Active {
            return Err(ArmadaError::InvalidTransition {
                from: ship.status,
                to: ShipStatus::Owned,
            });
        }
        ship.transition(ShipStatus::Owned)?;
        self.repo.save_ship(ship.clone())?;
        let message = format!("{} #{} is now inactive", ship.name, ship.ship_number);
        Ok((ship, message))
    }

    /// Create an account; NPC status follows from the nickname
    pub fn register_account(&mut self, nickname: &str, currency: f64) -> Result<Account> {
        if nickname.trim().is_empty() {
            return Err(ArmadaError::InvalidArgument("nickname is empty".into()));
        }
        let account = Account::new(nickname, &self.config).with_currency(currency);
        self.repo.insert_account(account.clone())?;
        Ok(account)
    }

    /// Buy a ship from the catalog; it arrives `Owned`, not battle-ready
    pub fn purchase_ship(&mut self, account: AccountId, template_id: TemplateId) -> Result<(OwnedShip, String)> {
        let mut owner = self.load_account(account)?;
        let template = self
            .repo
            .template(template_id)?
            .ok_or(ArmadaError::TemplateNotFound(template_id))?;

        let price = template.value();
        if owner.currency < price {
            return Err(ArmadaError::InsufficientFunds {
                required: price,
                available: owner.currency,
            });
        }

        let number = self.repo.next_ship_number(account)?;
        let ship = OwnedShip::from_template(account, number, &template);
        owner.currency -= price;
        self.repo.save_account_and_ship(owner, ship.clone())?;

        tracing::debug!(account = %account, template = %template_id, number, "ship purchased");
        let message = format!("Purchased {} #{} for {:.2}", ship.name, number, price);
        Ok((ship, message))
    }

    /// Sell an owned or active ship for a fraction of its current value
    pub fn sell_ship(&mut self, account: AccountId, number: ShipNumber) -> Result<(OwnedShip, String)> {
        let mut owner = self.load_account(account)?;
        let mut ship = self.load_ship(account, number)?;

        ship.transition(ShipStatus::Sold)?;
        let proceeds = ship.current.value * self.config.sell_fraction;
        owner.currency += proceeds;
        self.repo.save_account_and_ship(owner, ship.clone())?;

        let message = format!("Sold {} #{} for {:.2}", ship.name, number, proceeds);
        Ok((ship, message))
    }

    /// Restore a ship to baseline, paying for the value it lost
    pub fn repair_ship(&mut self, account: AccountId, number: ShipNumber) -> Result<(OwnedShip, String)> {
        let mut owner = self.load_account(account)?;
        let mut ship = self.load_ship(account, number)?;

        let cost = ship.repair_cost();
        if owner.currency < cost {
            return Err(ArmadaError::InsufficientFunds {
                required: cost,
                available: owner.currency,
            });
        }

        ship.repair()?;
        owner.currency -= cost;
        self.repo.save_account_and_ship(owner, ship.clone())?;

        let message = format!("Repaired {} #{} for {:.2}", ship.name, number, cost);
        Ok((ship, message))
    }

    /// Every ship the account still holds (sold ones excluded)
    pub fn fleet(&self, account: AccountId) -> Result<Vec<OwnedShip>> {
        self.load_account(account)?;
        Ok(self
            .repo
            .ships_of(account)?
            .into_iter()
            .filter(|s| !s.status.is_terminal())
            .collect())
    }

    pub fn battle_history(&self, account: AccountId) -> Result<Vec<BattleRecord>> {
        self.load_account(account)?;
        self.repo.battles_of(account)
    }
}

#[allow(clippy::too_many_arguments)]
fn build_record(
    participants: Vec<Participant>,
    winner: AccountId,
    side_a: &LoadedSide,
    side_b: &LoadedSide,
    fleet_a: &CombatFleet,
    fleet_b: &CombatFleet,
    report: CombatReport,
    adjudication: &Adjudication,
    currency_reward: f64,
) -> BattleRecord {
    let mut extra = BattleExtra {
        rounds_fought: report.rounds_fought,
        decided_by: Some(adjudication.reason),
        currency_reward,
        ..BattleExtra::default()
    };

    for (side, loaded, fleet) in [(Side::A, side_a, fleet_a), (Side::B, side_b, fleet_b)] {
        let id = loaded.account.id;
        let award = adjudication.award(side);
        extra.formations.insert(id, fleet.formation);
        extra.final_hp.insert(
            id,
            fleet.ships.iter().map(|s| s.current_hp.max(0.0)).collect(),
        );
        extra.total_damage.insert(id, report.damage_by(side));
        extra.ships_destroyed.insert(id, report.kills_by(side));
        extra.elo_change.insert(id, award.elo_change);
        extra.experience_gained.insert(id, award.experience);
    }

    BattleRecord {
        battle_id: BattleId::new(),
        timestamp: Utc::now(),
        participants,
        winner_account_id: winner,
        battle_log: report.log.into(),
        extra,
    }
}
