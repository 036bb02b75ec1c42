//! Bump arena over linear memory
//!
//! Every allocation is word-aligned and zero-filled. Only the most recent
//! allocation can be given back individually; everything else lives until
//! [`Arena::reset`], which invalidates all outstanding pointers at once.

use pastekit_spec::layout::align_word;
use tracing::trace;

use crate::config::POISON_BYTE;
use crate::error::{ModuleError, Result};
use crate::memory::{LinearMemory, NULL_GUARD};

#[derive(Debug, Clone)]
pub struct Arena {
    base: u32,
    top: u32,
    /// Allocations since the last reset
    live: usize,
    /// Incremented by every reset
    generation: u64,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl Arena {
    pub fn new() -> Self {
        Arena {
            base: NULL_GUARD,
            top: NULL_GUARD,
            live: 0,
            generation: 0,
        }
    }

    /// Reserve `len` zeroed bytes at a word-aligned address
    pub fn allocate(&mut self, memory: &mut LinearMemory, len: u32) -> Result<u32> {
        let overflow = || ModuleError::OutOfMemory {
            requested: self.top as u64 + len as u64,
            limit: memory.config().max_bytes() as u64,
        };

        let start = align_word(self.top).ok_or_else(overflow)?;
        let end = start.checked_add(len).ok_or_else(overflow)?;
        memory.ensure(end as u64)?;
        memory.fill(start, len, 0)?;

        self.top = end;
        self.live += 1;
        trace!(ptr = start, len, "arena allocate");
        Ok(start)
    }

    /// Give back an allocation; only the topmost one is actually reclaimed
    pub fn free(&mut self, ptr: u32, len: u32) -> bool {
        match ptr.checked_add(len) {
            Some(end) if ptr >= self.base && end == self.top => {
                self.top = ptr;
                self.live = self.live.saturating_sub(1);
                trace!(ptr, len, "arena free reclaimed");
                true
            }
            _ => {
                trace!(ptr, len, "arena free deferred to reset");
                false
            }
        }
    }

    /// Drop every allocation, optionally poisoning the released bytes
    pub fn reset(&mut self, memory: &mut LinearMemory, poison: bool) {
        if poison && self.top > self.base {
            // Released range was addressable when allocated, so this cannot fail
            let _ = memory.fill(self.base, self.top - self.base, POISON_BYTE);
        }
        trace!(
            used = self.top - self.base,
            live = self.live,
            generation = self.generation,
            "arena reset"
        );
        self.top = self.base;
        self.live = 0;
        self.generation += 1;
    }

    /// Bytes handed out since the last reset (including alignment padding)
    pub fn used(&self) -> u32 {
        self.top - self.base
    }

    pub fn live(&self) -> usize {
        self.live
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn contains(&self, ptr: u32) -> bool {
        ptr >= self.base && ptr < self.top
    }
}
