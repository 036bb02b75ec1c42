//! Grammar errors
//!
//! These describe why a single line was rejected by a rule. The paste parser
//! turns every one of them into a fallback (text block or `other` line), so
//! they never escape [`crate::parse_paste`].

use pastekit_spec::Stat;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("Head line matches no known shape: {0:?}")]
    UnmatchedHeadLine(String),

    #[error("Not a move line: {0:?}")]
    NotAMoveLine(String),

    #[error("Empty stat list")]
    EmptyStatList,

    #[error("Unexpected token at column {column}: {found:?}")]
    UnexpectedToken { column: usize, found: String },

    #[error("Stat list ends after a separator")]
    TrailingSeparator,

    #[error("Stat {stat} listed after {after}; expected canonical order")]
    StatOutOfOrder { stat: Stat, after: Stat },

    #[error("Stat {stat} value {value} exceeds maximum {max}")]
    StatOutOfRange { stat: Stat, value: u32, max: u32 },

    #[error("Invalid grammar pattern: {0}")]
    Pattern(String),
}

pub type Result<T> = std::result::Result<T, GrammarError>;
