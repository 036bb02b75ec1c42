//! # Paste Grammar
//!
//! A paste is a sequence of blank-line-delimited blocks. The first line of a
//! block is the head line; every further line is a body line.
//!
//! ```text
//! Ghosty (Gengar) (M) @ Choice Scarf     head: nickname, species, gender, item
//! Ability: Cursed Body                   other
//! EVs: 252 SpA / 4 SpD / 252 Spe         EV stat list
//! IVs: 0 Atk                             IV stat list
//! Timid Nature                           other
//! - Shadow Ball                          move
//! - Hidden Power [Fire] / Focus Blast    move (first name only, typed by bracket)
//! ```
//!
//! Parsing is total: a head line that fits neither shape turns the block into
//! a text set, and a body line that fits no rule is kept verbatim in `other`.

use once_cell::sync::Lazy;
use pastekit_spec::{
    normalize_newlines, split_header, Creature, Gender, ImageStyle, Move, Paste, PasteSet,
    ReferenceTables, Stat,
};
use rand::Rng;
use regex::Regex;
use tracing::debug;

use crate::aliases::species_alias;
use crate::error::{GrammarError, Result};
use crate::extract::extract_keywords;
use crate::lexer::StatToken;
use crate::resolver::search_like;
use crate::sprites::{fallback_sprite, item_image, species_sprite};
use logos::Logos;

const RE_HEAD: &str = r"^(?:(.* \()([A-Z][a-z0-9:']+\.?(?:[- ][A-Za-z][a-z0-9:']*\.?)*)(\))|([A-Z][a-z0-9:']+\.?(?:[- ][A-Za-z][a-z0-9:']*\.?)*))(?:( \()([MF])(\)))?(?:( @ )([A-Z][a-z0-9:']*(?:[- ][A-Z][a-z0-9:']*)*))?( *)$";
const RE_MOVE: &str = r"^(-)( ([A-Z][a-z']*(?:[- ][A-Za-z][a-z']*)*)(?: \[([A-Z][a-z]+)\])?(?: / [A-Z][a-z']*(?:[- ][A-Za-z][a-z']*)*)* *)$";

static HEAD: Lazy<std::result::Result<Regex, regex::Error>> = Lazy::new(|| Regex::new(RE_HEAD));
static MOVE: Lazy<std::result::Result<Regex, regex::Error>> = Lazy::new(|| Regex::new(RE_MOVE));

fn pattern(re: &'static std::result::Result<Regex, regex::Error>) -> Result<&'static Regex> {
    re.as_ref().map_err(|e| GrammarError::Pattern(e.to_string()))
}

/// Largest EV a single stat may carry
pub const MAX_EV: u32 = 252;

/// Largest IV a single stat may carry
pub const MAX_IV: u32 = 31;

const EV_PREFIX: &str = "EVs: ";
const IV_PREFIX: &str = "IVs: ";
const SHINY_MARKER: &str = "Shiny: Yes";

// ============================================================================
// Line Rules
// ============================================================================

/// Fields captured from a head line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadLine<'a> {
    /// Literal prefix before ` (<Name>)`, empty in the plain form
    pub nickname: &'a str,
    pub name: &'a str,
    pub gender: Gender,
    pub item: Option<&'a str>,
}

/// Match `<Name> (<G>) @ <Item>` or `<Nickname> (<Name>) (<G>) @ <Item>`
pub fn parse_head_line(line: &str) -> Result<HeadLine<'_>> {
    let caps = pattern(&HEAD)?
        .captures(line)
        .ok_or_else(|| GrammarError::UnmatchedHeadLine(line.to_string()))?;

    let (nickname, name) = match (caps.get(1), caps.get(2), caps.get(4)) {
        (Some(prefix), Some(name), _) => {
            let prefix = prefix.as_str();
            (&prefix[..prefix.len() - 2], name.as_str())
        }
        (_, _, Some(name)) => ("", name.as_str()),
        _ => return Err(GrammarError::UnmatchedHeadLine(line.to_string())),
    };

    Ok(HeadLine {
        nickname,
        name,
        gender: caps
            .get(6)
            .map(|g| Gender::from_letter(g.as_str()))
            .unwrap_or_default(),
        item: caps.get(9).map(|m| m.as_str()),
    })
}

/// Fields captured from a move line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveLine<'a> {
    pub name: &'a str,
    /// Bracketed type, as in `- Hidden Power [Fire]`
    pub bracket_type: Option<&'a str>,
}

/// Match `- <Move> [<Type>] / <Alt> / ...`, keeping only the first name
pub fn parse_move_line(line: &str) -> Result<MoveLine<'_>> {
    let caps = pattern(&MOVE)?
        .captures(line)
        .ok_or_else(|| GrammarError::NotAMoveLine(line.to_string()))?;
    let name = caps
        .get(3)
        .ok_or_else(|| GrammarError::NotAMoveLine(line.to_string()))?;

    Ok(MoveLine {
        name: name.as_str(),
        bracket_type: caps.get(4).map(|m| m.as_str()),
    })
}

/// Parse `<n> <Stat> / <n> <Stat> ...`: 1 to 6 segments in canonical order,
/// each value at most `max`
pub fn parse_stat_list(list: &str, max: u32) -> Result<Vec<(Stat, u32)>> {
    let mut lex = StatToken::lexer(list);
    let mut segments: Vec<(Stat, u32)> = Vec::with_capacity(6);

    loop {
        let value = match next_token(&mut lex)? {
            Some(StatToken::Number(n)) => n,
            None if segments.is_empty() => return Err(GrammarError::EmptyStatList),
            None => return Err(GrammarError::TrailingSeparator),
            Some(_) => return Err(unexpected(&lex)),
        };
        let stat = match next_token(&mut lex)? {
            Some(StatToken::Stat(stat)) => stat,
            _ => return Err(unexpected(&lex)),
        };

        if let Some(&(after, _)) = segments.last() {
            if stat <= after {
                return Err(GrammarError::StatOutOfOrder { stat, after });
            }
        }
        if value > max {
            return Err(GrammarError::StatOutOfRange { stat, value, max });
        }
        segments.push((stat, value));

        match next_token(&mut lex)? {
            None => return Ok(segments),
            Some(StatToken::Slash) => continue,
            Some(_) => return Err(unexpected(&lex)),
        }
    }
}

fn next_token(lex: &mut logos::Lexer<'_, StatToken>) -> Result<Option<StatToken>> {
    match lex.next() {
        None => Ok(None),
        Some(Ok(token)) => Ok(Some(token)),
        Some(Err(())) => Err(unexpected(lex)),
    }
}

fn unexpected(lex: &logos::Lexer<'_, StatToken>) -> GrammarError {
    GrammarError::UnexpectedToken {
        column: lex.span().start,
        found: lex.slice().to_string(),
    }
}

/// Lower-case a display name and join its words with `-`
pub fn lookup_key(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

// ============================================================================
// Blocks
// ============================================================================

/// Non-empty, trimmed blank-line-delimited blocks of a normalised body
pub fn blocks(body: &str) -> impl Iterator<Item = &str> {
    body.split("\n\n").map(str::trim).filter(|b| !b.is_empty())
}

fn parse_block<R: Rng + ?Sized>(
    block: &str,
    style: ImageStyle,
    tables: &ReferenceTables,
    rng: &mut R,
) -> PasteSet {
    let mut lines = block.split('\n');
    let head_line = lines.next().unwrap_or_default();

    let head = match parse_head_line(head_line) {
        Ok(head) => head,
        Err(err) => {
            debug!(%err, "block kept as text");
            return PasteSet::Text(block.to_string());
        }
    };

    let mut creature = Creature {
        nickname: head.nickname.to_string(),
        name: head.name.to_string(),
        gender: head.gender,
        ..Creature::default()
    };

    let mut key = lookup_key(head.name);
    if let Some(alias) = species_alias(&key) {
        key = alias.key.to_string();
        if let Some(name) = alias.name {
            creature.name = name.to_string();
        }
    }

    let shiny = block.contains(SHINY_MARKER);
    let female = creature.gender == Gender::Female;
    match search_like(&tables.species, &key) {
        Some((found, descriptor)) => {
            creature.type1 = descriptor.type1.clone();
            creature.type2 = descriptor.type2.clone();
            creature.sprite = species_sprite(&tables.species, &found, shiny, female, style, rng);
        }
        None => {
            debug!(species = %key, "species not found");
            creature.sprite = fallback_sprite(style);
        }
    }

    if let Some(item) = head.item {
        creature.item = item.to_string();
        creature.item_image = item_image(&tables.items, item);
    }

    for line in lines {
        parse_body_line(line, tables, &mut creature);
    }

    creature.refresh_last_stats();
    extract_keywords(&mut creature);
    creature.into()
}

fn parse_body_line(line: &str, tables: &ReferenceTables, creature: &mut Creature) {
    if let Ok(mv) = parse_move_line(line.trim()) {
        let move_type = match mv.bracket_type {
            Some(bracket) => bracket.to_lowercase(),
            None => search_like(&tables.moves, &lookup_key(mv.name))
                .map(|(_, d)| d.type1.clone())
                .unwrap_or_default(),
        };
        creature.moves.push(Move::new(mv.name, move_type));
        return;
    }

    let stat_line = line
        .strip_prefix(EV_PREFIX)
        .map(|list| (list, MAX_EV, true))
        .or_else(|| line.strip_prefix(IV_PREFIX).map(|list| (list, MAX_IV, false)));

    if let Some((list, max, is_ev)) = stat_line {
        match parse_stat_list(list, max) {
            Ok(segments) => {
                for (stat, value) in segments {
                    if is_ev {
                        creature.evs.set(stat, value);
                    } else {
                        creature.ivs.set(stat, Some(value));
                    }
                }
                return;
            }
            Err(err) => debug!(%err, line, "stat line kept in other"),
        }
    }

    creature.other.push(line.to_string());
}

// ============================================================================
// Entry Points
// ============================================================================

/// Parse plain paste text into its ordered sets
///
/// Never fails: unparseable pieces degrade to text sets or `other` lines.
/// Every free-text field of the result is HTML-escaped. One set is produced
/// per non-empty blank-line-delimited block.
pub fn parse_paste<R: Rng + ?Sized>(
    text: &str,
    style: ImageStyle,
    tables: &ReferenceTables,
    rng: &mut R,
) -> Paste {
    let text = normalize_newlines(text);
    let mut paste = Paste {
        sets: blocks(&text)
            .map(|block| parse_block(block, style, tables, &mut *rng))
            .collect(),
        ..Paste::default()
    };

    paste.sanitize();
    debug!(
        sets = paste.sets.len(),
        creatures = paste.creature_count(),
        "paste parsed"
    );
    paste
}

/// Parse a payload recovered from a sealed paste
///
/// The payload may carry a `<json>\n-----\n` metadata header; its fields are
/// copied onto the parsed body and `ots` strips the hidden spreads.
pub fn parse_framed_paste<R: Rng + ?Sized>(
    text: &str,
    style: ImageStyle,
    tables: &ReferenceTables,
    rng: &mut R,
) -> Paste {
    let text = normalize_newlines(text);
    let (meta, body) = split_header(&text);
    let mut paste = parse_paste(body, style, tables, rng);
    if let Some(meta) = meta {
        paste.apply_metadata(meta);
    }
    paste
}

/// Number of blocks whose head line parses as a creature
pub fn count_creatures(text: &str) -> usize {
    let text = normalize_newlines(text);
    blocks(&text)
        .filter(|block| {
            let head = block.split('\n').next().unwrap_or_default();
            parse_head_line(head).is_ok()
        })
        .count()
}
