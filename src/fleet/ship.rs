//! Owned ship instances and their lifecycle
//!
//! ```text
//!            activate              battle: hp <= 0
//!   Owned ───────────► Active ─────────────────► Destroyed
//!     ▲  ◄───────────    │                          │
//!     │    deactivate    │ sell                     │ repair
//!     │                  ▼                          │
//!     │ sell ──────►   Sold (terminal)              │
//!     └─────────────────────────────────────────────┘
//! ```
//!
//! NPC ships skip permadeath: `restore` takes a destroyed ship straight
//! back to `Active`.

use serde::{Deserialize, Serialize};

use crate::core::error::{ArmadaError, Result};
use crate::core::types::{AccountId, ShipId, ShipNumber, TemplateId};
use crate::fleet::stats::StatBundle;
use crate::fleet::template::ShipTemplate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipStatus {
    #[default]
    Owned, // Purchased, not battle-eligible
    Active,    // Battle-eligible
    Destroyed, // Lost in battle, all current stats zero
    Sold,      // Terminal
}

impl ShipStatus {
    /// Whether the state machine permits `self -> to`
    pub fn can_transition_to(self, to: ShipStatus) -> bool {
        use ShipStatus::*;
        matches!(
            (self, to),
            (Owned, Active)
                | (Active, Owned)
                | (Active, Destroyed)
                | (Destroyed, Active)
                | (Destroyed, Owned)
                | (Owned, Sold)
                | (Active, Sold)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ShipStatus::Sold)
    }
}

/// One fleet member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnedShip {
    pub id: ShipId,
    pub owner: AccountId,
    pub template_id: TemplateId,
    pub ship_number: ShipNumber,
    pub name: String,
    pub status: ShipStatus,
    /// Stats at acquisition or last repair
    pub baseline: StatBundle,
    /// Stats after unrepaired battle damage; never above `baseline`
    pub current: StatBundle,
}

impl OwnedShip {
    /// A freshly acquired ship in the `Owned` state
    pub fn from_template(owner: AccountId, ship_number: ShipNumber, template: &ShipTemplate) -> Self {
        Self {
            id: ShipId::new(),
            owner,
            template_id: template.id,
            ship_number,
            name: template.name.clone(),
            status: ShipStatus::Owned,
            baseline: template.stats,
            current: template.stats,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ShipStatus::Active
    }

    pub fn is_damaged(&self) -> bool {
        self.current != self.baseline
    }

    /// Move to `to`, rejecting transitions the lifecycle forbids
    pub fn transition(&mut self, to: ShipStatus) -> Result<()> {
        if !self.status.can_transition_to(to) {
            return Err(ArmadaError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        tracing::debug!(
            ship = %self.id,
            number = self.ship_number,
            "ship {:?} -> {:?}",
            self.status,
            to
        );
        self.status = to;
        Ok(())
    }

    /// Apply battle damage to a survivor.
    ///
    /// Every stat but HP scales by the surviving fraction; HP is set to what
    /// the ship actually finished with, never above its pre-battle value.
    pub fn degrade(&mut self, hp_fraction: f64, remaining_hp: f64) {
        let fraction = hp_fraction.clamp(0.0, 1.0);
        let hp_ceiling = self.current.hp.min(self.baseline.hp);
        self.current = self.current.scaled(fraction);
        self.current.hp = remaining_hp.clamp(0.0, hp_ceiling);
    }

    /// Mark destroyed and zero every current stat
    pub fn destroy(&mut self) -> Result<()> {
        self.transition(ShipStatus::Destroyed)?;
        self.current = StatBundle::zeroed();
        Ok(())
    }

    /// Reset current stats to baseline; a destroyed hull comes back `Owned`
    pub fn repair(&mut self) -> Result<()> {
        match self.status {
            ShipStatus::Sold => {
                return Err(ArmadaError::InvalidTransition {
                    from: ShipStatus::Sold,
                    to: ShipStatus::Owned,
                })
            }
            ShipStatus::Destroyed => self.transition(ShipStatus::Owned)?,
            ShipStatus::Owned | ShipStatus::Active => {}
        }
        self.current = self.baseline;
        Ok(())
    }

    /// NPC respawn: full baseline stats and battle-ready
    pub fn restore(&mut self) -> Result<()> {
        if self.status == ShipStatus::Destroyed {
            self.transition(ShipStatus::Active)?;
        }
        self.current = self.baseline;
        Ok(())
    }

    /// Value lost to damage; what a repair costs
    pub fn repair_cost(&self) -> f64 {
        (self.baseline.value - self.current.value).max(0.0)
    }

    /// Stored stats never exceed baseline, and destroyed ships are all zero
    pub fn invariants_hold(&self) -> bool {
        let within = self.current.within(&self.baseline);
        let zeroed = self.status != ShipStatus::Destroyed || self.current.is_zeroed();
        within && zeroed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_ship() -> OwnedShip {
        OwnedShip::from_template(AccountId::new(), 1, &ShipTemplate::frigate(TemplateId(2)))
    }

    #[test]
    fn test_new_ship_is_owned_and_pristine() {
        let ship = test_ship();
        assert_eq!(ship.status, ShipStatus::Owned);
        assert!(!ship.is_damaged());
        assert!(ship.invariants_hold());
    }

    #[test]
    fn test_activation_round_trip() {
        let mut ship = test_ship();
        ship.transition(ShipStatus::Active).unwrap();
        assert!(ship.is_active());
        ship.transition(ShipStatus::Owned).unwrap();
        assert_eq!(ship.status, ShipStatus::Owned);
    }

    #[test]
    fn test_owned_ship_cannot_be_destroyed() {
        let mut ship = test_ship();
        let err = ship.destroy().unwrap_err();
        assert!(matches!(
            err,
            ArmadaError::InvalidTransition {
                from: ShipStatus::Owned,
                to: ShipStatus::Destroyed
            }
        ));
    }

    #[test]
    fn test_sold_is_terminal() {
        let mut ship = test_ship();
        ship.transition(ShipStatus::Sold).unwrap();
        for to in [ShipStatus::Owned, ShipStatus::Active, ShipStatus::Destroyed] {
            assert!(ship.transition(to).is_err());
        }
        assert!(ship.repair().is_err());
    }

    #[test]
    fn test_destroy_zeroes_current() {
        let mut ship = test_ship();
        ship.transition(ShipStatus::Active).unwrap();
        ship.destroy().unwrap();
        assert_eq!(ship.status, ShipStatus::Destroyed);
        assert!(ship.current.is_zeroed());
        assert!(ship.invariants_hold());
    }

    #[test]
    fn test_degrade_then_repair() {
        let mut ship = test_ship();
        ship.degrade(0.75, 90.0);
        assert!(ship.is_damaged());
        assert!((ship.current.hp - 90.0).abs() < 1e-9);
        assert!((ship.repair_cost() - 200.0).abs() < 1e-9);
        assert!(ship.invariants_hold());

        ship.repair().unwrap();
        assert!(!ship.is_damaged());
        assert_eq!(ship.repair_cost(), 0.0);
    }

    #[test]
    fn test_degrade_keeps_boosted_remaining_hp() {
        let mut ship = test_ship();
        // Fought at 150 effective HP and finished on 75
        ship.degrade(0.5, 75.0);
        assert!((ship.current.hp - 75.0).abs() < 1e-9);
        assert!((ship.current.attack - ship.baseline.attack * 0.5).abs() < 1e-9);
        assert!(ship.invariants_hold());

        // A battle never heals: remaining HP above the stored value is capped
        let mut ship = test_ship();
        ship.degrade(0.95, ship.baseline.hp + 10.0);
        assert_eq!(ship.current.hp, ship.baseline.hp);
        assert!(ship.invariants_hold());
    }

    #[test]
    fn test_repair_destroyed_returns_to_owned() {
        let mut ship = test_ship();
        ship.transition(ShipStatus::Active).unwrap();
        ship.destroy().unwrap();
        ship.repair().unwrap();
        assert_eq!(ship.status, ShipStatus::Owned);
        assert_eq!(ship.current, ship.baseline);
    }

    #[test]
    fn test_restore_destroyed_returns_to_active() {
        let mut ship = test_ship();
        ship.transition(ShipStatus::Active).unwrap();
        ship.destroy().unwrap();
        ship.restore().unwrap();
        assert_eq!(ship.status, ShipStatus::Active);
        assert_eq!(ship.current, ship.baseline);
    }
}
