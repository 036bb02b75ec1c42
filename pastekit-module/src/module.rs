//! Compute module
//!
//! Owns linear memory, the bump arena, the result registers and the cosmetic
//! RNG, and exposes them only through the [`Boundary`] exports. Failures never
//! cross the boundary as values: they are logged and reported as a null
//! pointer, `-1` or `false`.

use std::collections::BTreeSet;
use std::sync::Arc;

use pastekit_parser::{count_creatures, parse_paste};
use pastekit_spec::{Boundary, ImageStyle, ReferenceTables, NULL_PTR};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use crate::arena::Arena;
use crate::config::ModuleConfig;
use crate::envelope::{Envelope, Sha256Envelope, NONCE_LEN};
use crate::error::{ModuleError, Result};
use crate::memory::LinearMemory;
use crate::writer::RecordWriter;

pub struct Module {
    /// Linear memory shared with the host
    memory: LinearMemory,

    /// Allocator over `memory`
    arena: Arena,

    /// Species, move and item tables
    tables: Arc<ReferenceTables>,

    config: ModuleConfig,

    /// Cosmetic randomness (sprite decorations, envelope nonces)
    rng: ChaCha8Rng,

    /// Paste records returned by `parse` and not yet destroyed
    live: BTreeSet<u32>,

    /// Result registers: pointer and byte length of the last published value
    result: (u32, u32),

    envelope: Box<dyn Envelope>,
}

impl Module {
    pub fn new(tables: Arc<ReferenceTables>, config: ModuleConfig) -> Result<Self> {
        Self::with_envelope(tables, config, Box::new(Sha256Envelope))
    }

    /// Create a module that seals with a custom envelope
    pub fn with_envelope(
        tables: Arc<ReferenceTables>,
        config: ModuleConfig,
        envelope: Box<dyn Envelope>,
    ) -> Result<Self> {
        config.validate()?;
        debug!(memory = %config.memory, "creating module");
        Ok(Self {
            memory: LinearMemory::new(config.memory),
            arena: Arena::new(),
            tables,
            config,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            live: BTreeSet::new(),
            result: (NULL_PTR, 0),
            envelope,
        })
    }

    pub fn config(&self) -> &ModuleConfig {
        &self.config
    }

    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    pub fn linear_memory(&self) -> &LinearMemory {
        &self.memory
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Paste records handed out and not yet destroyed
    pub fn live_pastes(&self) -> usize {
        self.live.len()
    }

    fn read_text(&self, ptr: u32, len: u32) -> Result<String> {
        let bytes = self.memory.read_bytes(ptr, len)?;
        match std::str::from_utf8(bytes) {
            Ok(text) => Ok(text.to_string()),
            Err(e) => Err(ModuleError::InvalidUtf8(e.valid_up_to())),
        }
    }

    fn try_parse(&mut self, ptr: u32, len: u32, style: ImageStyle) -> Result<u32> {
        let text = self.read_text(ptr, len)?;
        let paste = parse_paste(&text, style, &self.tables, &mut self.rng);
        RecordWriter::new(&mut self.memory, &mut self.arena).write_paste(&paste)
    }

    /// Split a `passphrase || message` request into owned parts
    fn read_pair(&self, ptr: u32, pass_len: u32, msg_len: u32) -> Result<(Vec<u8>, Vec<u8>)> {
        let msg_ptr = ptr
            .checked_add(pass_len)
            .ok_or(ModuleError::OutOfBounds { address: ptr, len: pass_len })?;
        let passphrase = self.memory.read_bytes(ptr, pass_len)?.to_vec();
        let message = self.memory.read_bytes(msg_ptr, msg_len)?.to_vec();
        Ok((passphrase, message))
    }

    /// Copy `bytes` into the arena as a C string and point the result registers at it
    fn publish(&mut self, bytes: &[u8]) -> Result<()> {
        let len = u32::try_from(bytes.len())
            .map_err(|_| ModuleError::Other("result exceeds address space".into()))?;
        let total = len
            .checked_add(1)
            .ok_or_else(|| ModuleError::Other("result exceeds address space".into()))?;
        let ptr = self.arena.allocate(&mut self.memory, total)?;
        self.memory.write_bytes(ptr, bytes)?;
        self.result = (ptr, len);
        Ok(())
    }

    fn try_seal(&mut self, ptr: u32, pass_len: u32, msg_len: u32) -> Result<()> {
        let (passphrase, message) = self.read_pair(ptr, pass_len, msg_len)?;
        let nonce: [u8; NONCE_LEN] = self.rng.gen();
        let sealed = self.envelope.seal(&passphrase, &message, nonce)?;
        self.publish(&sealed)
    }

    fn try_open(&mut self, ptr: u32, pass_len: u32, msg_len: u32) -> Result<()> {
        let (passphrase, sealed) = self.read_pair(ptr, pass_len, msg_len)?;
        let message = self.envelope.open(&passphrase, &sealed)?;
        self.publish(&message)
    }

    fn clear_result(&mut self) {
        self.result = (NULL_PTR, 0);
    }
}

impl Boundary for Module {
    fn init(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    fn allocate(&mut self, len: u32) -> u32 {
        match self.arena.allocate(&mut self.memory, len) {
            Ok(ptr) => ptr,
            Err(e) => {
                warn!(len, error = %e, "allocation failed");
                NULL_PTR
            }
        }
    }

    fn free(&mut self, ptr: u32, len: u32) {
        if ptr != NULL_PTR {
            self.arena.free(ptr, len);
        }
    }

    fn reset(&mut self) {
        self.arena
            .reset(&mut self.memory, self.config.poison_on_reset);
        if !self.live.is_empty() {
            debug!(pastes = self.live.len(), "reset with live pastes");
        }
        self.live.clear();
        self.clear_result();
    }

    fn parse(&mut self, ptr: u32, len: u32, two_d_images: bool) -> u32 {
        match self.try_parse(ptr, len, ImageStyle::from_two_d(two_d_images)) {
            Ok(paste_ptr) => {
                self.live.insert(paste_ptr);
                paste_ptr
            }
            Err(e) => {
                warn!(ptr, len, error = %e, "parse failed");
                NULL_PTR
            }
        }
    }

    fn destroy(&mut self, paste_ptr: u32) {
        if !self.live.remove(&paste_ptr) {
            warn!(paste_ptr, "destroy of unknown paste");
        }
    }

    fn validate(&mut self, ptr: u32, len: u32) -> i32 {
        match self.read_text(ptr, len) {
            Ok(text) => i32::try_from(count_creatures(&text)).unwrap_or(i32::MAX),
            Err(e) => {
                debug!(ptr, len, error = %e, "validate rejected input");
                -1
            }
        }
    }

    fn seal(&mut self, ptr: u32, pass_len: u32, msg_len: u32) -> bool {
        match self.try_seal(ptr, pass_len, msg_len) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "seal failed");
                self.clear_result();
                false
            }
        }
    }

    fn open(&mut self, ptr: u32, pass_len: u32, msg_len: u32) -> bool {
        match self.try_open(ptr, pass_len, msg_len) {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, "open failed");
                self.clear_result();
                false
            }
        }
    }

    fn result_ptr(&self) -> u32 {
        self.result.0
    }

    fn result_len(&self) -> u32 {
        self.result.1
    }

    fn memory(&self) -> &[u8] {
        self.memory.as_slice()
    }

    fn memory_mut(&mut self) -> &mut [u8] {
        self.memory.as_mut_slice()
    }
}
