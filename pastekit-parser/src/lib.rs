//! Pastekit Parser
//!
//! Turn human-written team text into typed [`Paste`] values, resolving
//! species and move names against reference tables.
//!
//! ## Example
//!
//! ```rust
//! use pastekit_parser::parse_paste;
//! use pastekit_spec::{ImageStyle, ReferenceTables};
//! use rand::SeedableRng;
//!
//! let tables = ReferenceTables::default();
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(0);
//! let paste = parse_paste("Gengar @ Choice Scarf\n- Shadow Ball", ImageStyle::Home, &tables, &mut rng);
//! assert_eq!(paste.sets.len(), 1);
//! ```
//!
//! [`Paste`]: pastekit_spec::Paste

pub mod aliases;
pub mod error;
pub mod extract;
pub mod grammar;
pub mod lexer;
pub mod resolver;
pub mod sprites;

pub use error::{GrammarError, Result};
pub use grammar::{
    count_creatures, parse_framed_paste, parse_head_line, parse_move_line, parse_paste,
    parse_stat_list,
};
pub use resolver::search_like;
