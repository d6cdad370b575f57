use thiserror::Error;

use crate::core::types::{AccountId, ShipNumber, TemplateId};
use crate::fleet::ShipStatus;

#[derive(Error, Debug)]
pub enum ArmadaError {
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Ship #{ship_number} not found for account {account}")]
    ShipNotFound {
        account: AccountId,
        ship_number: ShipNumber,
    },

    #[error("Ship #{ship_number} of account {account} is not active (status: {status:?})")]
    ShipNotActive {
        account: AccountId,
        ship_number: ShipNumber,
        status: ShipStatus,
    },

    #[error("Ship template not found: {0}")]
    TemplateNotFound(TemplateId),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Active ship limit reached: {current_active_ships}/{max_active_ships}")]
    CapacityExceeded {
        current_active_ships: usize,
        max_active_ships: usize,
    },

    #[error("Invalid ship transition: {from:?} -> {to:?}")]
    InvalidTransition { from: ShipStatus, to: ShipStatus },

    #[error("Insufficient funds: need {required:.2}, have {available:.2}")]
    InsufficientFunds { required: f64, available: f64 },

    /// Raised by repository implementations, never by the engine itself
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl ArmadaError {
    /// True for the "does not resolve" class of errors
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ArmadaError::AccountNotFound(_)
                | ArmadaError::ShipNotFound { .. }
                | ArmadaError::ShipNotActive { .. }
                | ArmadaError::TemplateNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ArmadaError>;
