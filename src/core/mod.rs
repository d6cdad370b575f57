pub mod config;
pub mod error;
pub mod types;

pub use config::{config, load_config, set_config, EngineConfig};
pub use error::{ArmadaError, Result};
