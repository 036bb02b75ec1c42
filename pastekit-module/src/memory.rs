//! Linear memory
//!
//! A flat byte array addressed by 32-bit offsets, grown in whole pages up to
//! the configured maximum. The first [`NULL_GUARD`] bytes are never handed
//! out, so address 0 can mean "no value" on the wire.

use pastekit_spec::layout::is_word_aligned;
use pastekit_spec::{MemoryConfig, PAGE_SIZE, WORD_SIZE};
use tracing::trace;

use crate::error::{ModuleError, Result};

/// Bytes at the bottom of memory that no allocation may cover
pub const NULL_GUARD: u32 = 16;

#[derive(Debug, Clone)]
pub struct LinearMemory {
    bytes: Vec<u8>,
    config: MemoryConfig,
}

impl LinearMemory {
    pub fn new(config: MemoryConfig) -> Self {
        LinearMemory {
            bytes: vec![0; config.initial_bytes()],
            config,
        }
    }

    /// Current size in bytes
    pub fn size(&self) -> u32 {
        self.bytes.len() as u32
    }

    /// Current size in pages
    pub fn pages(&self) -> u32 {
        self.size() / PAGE_SIZE
    }

    pub fn config(&self) -> MemoryConfig {
        self.config
    }

    /// Grow so that `end` (exclusive) is addressable
    pub fn ensure(&mut self, end: u64) -> Result<()> {
        if end <= self.bytes.len() as u64 {
            return Ok(());
        }

        let limit = self.config.max_bytes() as u64;
        if end > limit {
            return Err(ModuleError::OutOfMemory {
                requested: end,
                limit,
            });
        }

        let page = PAGE_SIZE as u64;
        let pages = end.div_ceil(page);
        trace!(from = self.pages(), to = pages, "growing linear memory");
        self.bytes.resize((pages * page) as usize, 0);
        Ok(())
    }

    fn range(&self, address: u32, len: u32) -> Result<std::ops::Range<usize>> {
        let start = address as usize;
        let end = start
            .checked_add(len as usize)
            .filter(|&end| end <= self.bytes.len())
            .ok_or(ModuleError::OutOfBounds { address, len })?;
        Ok(start..end)
    }

    pub fn read_bytes(&self, address: u32, len: u32) -> Result<&[u8]> {
        let range = self.range(address, len)?;
        Ok(&self.bytes[range])
    }

    pub fn write_bytes(&mut self, address: u32, data: &[u8]) -> Result<()> {
        let len = u32::try_from(data.len()).map_err(|_| ModuleError::OutOfBounds {
            address,
            len: u32::MAX,
        })?;
        let range = self.range(address, len)?;
        self.bytes[range].copy_from_slice(data);
        Ok(())
    }

    pub fn fill(&mut self, address: u32, len: u32, byte: u8) -> Result<()> {
        let range = self.range(address, len)?;
        self.bytes[range].fill(byte);
        Ok(())
    }

    /// Read a little-endian word; `address` must be word-aligned
    pub fn read_u32(&self, address: u32) -> Result<u32> {
        check_aligned(address)?;
        let bytes = self.read_bytes(address, WORD_SIZE)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Write a little-endian word; `address` must be word-aligned
    pub fn write_u32(&mut self, address: u32, value: u32) -> Result<()> {
        check_aligned(address)?;
        self.write_bytes(address, &value.to_le_bytes())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

fn check_aligned(address: u32) -> Result<()> {
    if is_word_aligned(address) {
        Ok(())
    } else {
        Err(ModuleError::MisalignedAccess {
            address,
            alignment: WORD_SIZE,
        })
    }
}
