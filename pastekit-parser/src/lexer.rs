//! # Lexer for EV / IV stat lists

use logos::Logos;
use pastekit_spec::Stat;

/// Tokens of a stat list such as `252 SpA / 4 SpD / 252 Spe`
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t]+")]
pub enum StatToken {
    /// Decimal value (rejected if it overflows u32)
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u32>().ok())]
    Number(u32),

    /// Stat abbreviation, case-sensitive
    #[token("HP", |_| Stat::Hp)]
    #[token("Atk", |_| Stat::Atk)]
    #[token("Def", |_| Stat::Def)]
    #[token("SpA", |_| Stat::Spa)]
    #[token("SpD", |_| Stat::Spd)]
    #[token("Spe", |_| Stat::Spe)]
    Stat(Stat),

    /// Segment separator
    #[token("/")]
    Slash,
}
