//! Host errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Module could not allocate {0} bytes")]
    Allocation(u32),

    #[error("Request of {0} bytes does not fit a 32-bit length")]
    RequestTooLarge(usize),

    #[error("Allocation at {address:#x} ({len} bytes) is outside module memory")]
    MemoryWrite { address: u32, len: u32 },

    #[error("Module returned no result for {0}")]
    NullResult(&'static str),

    #[error("Wrong passphrase or corrupted message")]
    Decryption,

    #[error("Module result is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl HostError {
    /// Whether the caller may reasonably try again with different input
    /// (for example another passphrase)
    pub fn is_retryable(&self) -> bool {
        matches!(self, HostError::Decryption)
    }
}

pub type Result<T> = std::result::Result<T, HostError>;
