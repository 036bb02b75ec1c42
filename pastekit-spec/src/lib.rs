//! # Pastekit Specification
//!
//! Shared definitions for both sides of the paste boundary.
//!
//! ## Key Features
//! - Typed paste model (`Paste`, `PasteSet`, `Creature`, `Move`)
//! - Fixed 32-bit wire layout with documented byte offsets
//! - Ordered reference tables (species, moves, items) with JSON and snapshot loading
//! - HTML sanitization of every free-text field
//! - `<json>\n-----\n<body>` framing for payloads recovered from sealed pastes
//! - The `Boundary` trait: the exported-function ABI of the compute module

pub mod boundary;
pub mod config;
pub mod error;
pub mod header;
pub mod layout;
pub mod model;
pub mod sanitize;
pub mod tables;

pub use boundary::Boundary;
pub use config::{ConfigError, ImageStyle, MemoryConfig, PAGE_SIZE};
pub use error::{Result, SpecError};
pub use header::{normalize_newlines, split_header, HEADER_SEPARATOR};
pub use layout::{CreatureField, MoveField, PasteField, RecordLayout};
pub use model::{Creature, Gender, Metadata, Move, Paste, PasteSet, Stat, StatSpread};
pub use sanitize::sanitize_html;
pub use tables::{
    ItemDescriptor, MoveDescriptor, ReferenceTable, ReferenceTables, SpeciesDescriptor,
};

/// Null pointer on the wire
pub const NULL_PTR: u32 = 0;

/// Word size of the wire layout (matches the module's pointer width)
pub const WORD_SIZE: u32 = 4;

/// Level assumed when a set has no `Level:` line
pub const DEFAULT_LEVEL: u32 = 100;

/// IV assumed when a stat is not listed on an `IVs:` line
pub const DEFAULT_IV: u32 = 31;
