//! Ship catalog entries

use serde::{Deserialize, Serialize};

use crate::core::types::TemplateId;
use crate::fleet::stats::StatBundle;

/// Immutable catalog entry; the source of base stats at acquisition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipTemplate {
    pub id: TemplateId,
    pub name: String,
    pub stats: StatBundle,
}

impl ShipTemplate {
    pub fn new(id: TemplateId, name: impl Into<String>, stats: StatBundle) -> Self {
        Self {
            id,
            name: name.into(),
            stats,
        }
    }

    /// Purchase price
    pub fn value(&self) -> f64 {
        self.stats.value
    }

    /// Light, evasive hull
    pub fn scout(id: TemplateId) -> Self {
        Self::new(id, "Scout", StatBundle::new(8.0, 4.0, 0.25, 3.0, 60.0, 300.0))
    }

    /// Balanced line ship
    pub fn frigate(id: TemplateId) -> Self {
        Self::new(id, "Frigate", StatBundle::new(15.0, 10.0, 0.1, 2.0, 120.0, 800.0))
    }

    /// Slow, heavily armed capital ship
    pub fn battleship(id: TemplateId) -> Self {
        Self::new(id, "Battleship", StatBundle::new(30.0, 25.0, 0.02, 1.0, 300.0, 2500.0))
    }

    /// The starter catalog
    pub fn starter_catalog() -> Vec<ShipTemplate> {
        vec![
            Self::scout(TemplateId(1)),
            Self::frigate(TemplateId(2)),
            Self::battleship(TemplateId(3)),
        ]
    }
}
