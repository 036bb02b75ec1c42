//! # Pastekit Module
//!
//! The compute side of the paste boundary.
//!
//! The module owns a page-granular linear memory and a bump arena over it,
//! parses paste text with `pastekit-parser`, and lays the result out in the
//! wire format from `pastekit_spec::layout`. Everything the host sees goes
//! through the [`Boundary`](pastekit_spec::Boundary) exports.
//!
//! ## Features
//!
//! - **Linear memory**: 64 KiB pages, grown on demand up to a configured cap
//! - **Arena**: word-aligned, zero-filled allocations; bulk reset with optional poisoning
//! - **Record writer**: `Paste`/`Creature`/`Move` records with null-terminated strings
//! - **Envelope**: passphrase seal/open behind a trait
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pastekit_module::{Module, ModuleConfig};
//! use pastekit_spec::{Boundary, ReferenceTables};
//!
//! let mut module = Module::new(Arc::new(ReferenceTables::default()), ModuleConfig::default()).unwrap();
//! let text = b"Gengar @ Choice Scarf";
//! let ptr = module.allocate(text.len() as u32 + 1);
//! module.memory_mut()[ptr as usize..ptr as usize + text.len()].copy_from_slice(text);
//! let paste = module.parse(ptr, text.len() as u32, false);
//! assert_ne!(paste, 0);
//! module.reset();
//! ```

pub mod arena;
pub mod config;
pub mod envelope;
pub mod error;
pub mod memory;
pub mod module;
pub mod writer;

pub use arena::Arena;
pub use config::{ModuleConfig, POISON_BYTE};
pub use envelope::{Envelope, EnvelopeError, Sha256Envelope};
pub use error::{ModuleError, Result};
pub use memory::{LinearMemory, NULL_GUARD};
pub use module::Module;
pub use writer::RecordWriter;
