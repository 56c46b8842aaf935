//! Monitored target registry with JSON persistence

pub mod store;
pub mod target;

pub use store::TargetRegistry;
pub use target::{MonitoredTarget, DEFAULT_THRESHOLD};

use std::path::PathBuf;

/// Registry errors
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("State file {} is corrupt: {message}", path.display())]
    Corrupt { path: PathBuf, message: String },

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("Target name must not be empty")]
    EmptyName,
}
