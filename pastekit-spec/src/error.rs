//! # Error Types for the shared specification crate

use crate::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpecError {
    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    // Reference table errors
    #[error("Invalid {table} table: {source}")]
    TableJson {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid snapshot magic: expected 0x504b5254, got {0:#010x}")]
    InvalidSnapshotMagic(u32),

    #[error("Invalid snapshot size: expected at least {expected} bytes, found {found} bytes")]
    InvalidSnapshotSize { expected: usize, found: usize },

    #[error("Snapshot encoding error: {0}")]
    Snapshot(#[from] bincode::Error),

    // I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    // General errors
    #[error("{0}")]
    Other(String),
}

impl SpecError {
    /// Whether the error came from malformed table data rather than the environment
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            SpecError::TableJson { .. }
                | SpecError::InvalidSnapshotMagic(_)
                | SpecError::InvalidSnapshotSize { .. }
                | SpecError::Snapshot(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SpecError>;
