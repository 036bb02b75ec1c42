//! Module error types

use pastekit_spec::{ConfigError, SpecError};
use thiserror::Error;

use crate::envelope::EnvelopeError;

#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("Spec error: {0}")]
    SpecError(#[from] SpecError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Out of memory: requested {requested} bytes, limit {limit} bytes")]
    OutOfMemory { requested: u64, limit: u64 },

    #[error("Memory out of bounds: address {address:#x}, length {len}")]
    OutOfBounds { address: u32, len: u32 },

    #[error("Misaligned access: address {address:#x}, alignment {alignment}")]
    MisalignedAccess { address: u32, alignment: u32 },

    #[error("Input is not valid UTF-8 at byte {0}")]
    InvalidUtf8(usize),

    #[error("Envelope error: {0}")]
    Envelope(#[from] EnvelopeError),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ModuleError>;
