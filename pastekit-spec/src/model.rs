//! # Paste Data Model
//!
//! Typed values produced by the grammar parser and reconstructed by the host
//! decoder. Both sides compare these with `==`, so every field that crosses
//! the boundary lives here.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{DEFAULT_IV, DEFAULT_LEVEL};

// ============================================================================
// Stats
// ============================================================================

/// The six stats in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Hp,
    Atk,
    Def,
    Spa,
    Spd,
    Spe,
}

impl Stat {
    /// All stats in canonical order
    pub const ALL: [Stat; 6] = [Stat::Hp, Stat::Atk, Stat::Def, Stat::Spa, Stat::Spd, Stat::Spe];

    /// Position in canonical order (0..6)
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lower-case key used by renderers (`"hp"`, `"spa"`, ...)
    pub const fn key(self) -> &'static str {
        match self {
            Stat::Hp => "hp",
            Stat::Atk => "atk",
            Stat::Def => "def",
            Stat::Spa => "spa",
            Stat::Spd => "spd",
            Stat::Spe => "spe",
        }
    }

    /// Abbreviation as written in a paste (`"HP"`, `"SpA"`, ...)
    pub const fn abbrev(self) -> &'static str {
        match self {
            Stat::Hp => "HP",
            Stat::Atk => "Atk",
            Stat::Def => "Def",
            Stat::Spa => "SpA",
            Stat::Spd => "SpD",
            Stat::Spe => "Spe",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.key() == key)
    }

    /// Parse a paste abbreviation (case-sensitive)
    pub fn from_abbrev(abbrev: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.abbrev() == abbrev)
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// One value per stat, indexed by [`Stat`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatSpread<T>(pub [T; 6]);

impl<T: Copy> StatSpread<T> {
    pub const fn splat(value: T) -> Self {
        Self([value; 6])
    }

    #[inline]
    pub fn get(&self, stat: Stat) -> T {
        self.0[stat.index()]
    }

    #[inline]
    pub fn set(&mut self, stat: Stat, value: T) {
        self.0[stat.index()] = value;
    }

    /// Iterate `(stat, value)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Stat, T)> + '_ {
        Stat::ALL.iter().map(move |&s| (s, self.get(s)))
    }
}

impl StatSpread<Option<u32>> {
    /// Effective IV values, treating unset entries as 31
    pub fn resolved(&self) -> StatSpread<u32> {
        StatSpread(self.0.map(|v| v.unwrap_or(DEFAULT_IV)))
    }
}

// ============================================================================
// Gender
// ============================================================================

/// Declared gender of a creature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    #[serde(rename = "")]
    Unspecified,
    #[serde(rename = "m")]
    Male,
    #[serde(rename = "f")]
    Female,
}

impl Gender {
    /// Parse the letter captured from `(M)` / `(F)`
    pub fn from_letter(letter: &str) -> Self {
        match letter {
            "M" | "m" => Gender::Male,
            "F" | "f" => Gender::Female,
            _ => Gender::Unspecified,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Gender::Unspecified => "",
            Gender::Male => "m",
            Gender::Female => "f",
        }
    }

    /// Wire codepoint: `'M'` = 77, `'F'` = 70, 0 when unspecified
    pub const fn codepoint(self) -> u32 {
        match self {
            Gender::Unspecified => 0,
            Gender::Male => 'M' as u32,
            Gender::Female => 'F' as u32,
        }
    }

    /// Inverse of [`Gender::codepoint`]; unknown values decode as unspecified
    pub const fn from_codepoint(code: u32) -> Self {
        match code {
            77 => Gender::Male,
            70 => Gender::Female,
            _ => Gender::Unspecified,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Records
// ============================================================================

/// A move slot
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Move {
    pub name: String,
    /// Elemental type, empty when the move did not resolve
    #[serde(rename = "type")]
    pub move_type: String,
}

impl Move {
    pub fn new(name: impl Into<String>, move_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            move_type: move_type.into(),
        }
    }
}

/// One parsed creature block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creature {
    pub nickname: String,
    pub name: String,
    pub type1: String,
    pub type2: String,
    pub item: String,
    /// CSS background declaration for the item icon
    pub item_image: String,
    /// Sprite path for the species
    pub sprite: String,
    pub gender: Gender,
    pub evs: StatSpread<u32>,
    /// `None` means not listed (effective value 31)
    pub ivs: StatSpread<Option<u32>>,
    pub last_stat: Option<Stat>,
    pub last_stat_iv: Option<Stat>,
    pub moves: Vec<Move>,
    /// Body lines that matched no grammar rule, verbatim
    pub other: Vec<String>,
    pub ability: String,
    pub level: u32,
    pub shiny: String,
    pub hidden_power: String,
    pub tera_type: String,
    pub nature: String,
}

impl Default for Creature {
    fn default() -> Self {
        Self {
            nickname: String::new(),
            name: String::new(),
            type1: String::new(),
            type2: String::new(),
            item: String::new(),
            item_image: String::new(),
            sprite: String::new(),
            gender: Gender::Unspecified,
            evs: StatSpread::splat(0),
            ivs: StatSpread::splat(None),
            last_stat: None,
            last_stat_iv: None,
            moves: Vec::new(),
            other: Vec::new(),
            ability: String::new(),
            level: DEFAULT_LEVEL,
            shiny: String::new(),
            hidden_power: String::new(),
            tera_type: String::new(),
            nature: String::new(),
        }
    }
}

impl Creature {
    /// Recompute `last_stat` (last non-zero EV) and `last_stat_iv` (last listed IV)
    pub fn refresh_last_stats(&mut self) {
        self.last_stat = self
            .evs
            .iter()
            .filter(|&(_, v)| v != 0)
            .map(|(s, _)| s)
            .last();
        self.last_stat_iv = self
            .ivs
            .iter()
            .filter(|(_, v)| v.is_some())
            .map(|(s, _)| s)
            .last();
    }

    /// Drop everything an open team sheet hides
    pub fn strip_ots(&mut self) {
        self.evs = StatSpread::splat(0);
        self.ivs = StatSpread::splat(None);
        self.last_stat = None;
        self.last_stat_iv = None;
        self.nature.clear();
    }

    /// Whether the species resolved against the species table
    pub fn is_resolved(&self) -> bool {
        !self.type1.is_empty()
    }
}

/// One blank-line-delimited block of a paste
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum PasteSet {
    Creature(Box<Creature>),
    /// Block whose head line matched no known shape
    Text(String),
}

impl PasteSet {
    pub fn as_creature(&self) -> Option<&Creature> {
        match self {
            PasteSet::Creature(c) => Some(c),
            PasteSet::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PasteSet::Creature(_) => None,
            PasteSet::Text(t) => Some(t),
        }
    }

    pub fn is_creature(&self) -> bool {
        matches!(self, PasteSet::Creature(_))
    }
}

impl From<Creature> for PasteSet {
    fn from(creature: Creature) -> Self {
        PasteSet::Creature(Box::new(creature))
    }
}

/// Optional header preceding a framed paste body (`<json>\n-----\n<body>`)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub title: String,
    pub author: String,
    pub notes: String,
    pub format: String,
    pub rental: String,
    pub ots: bool,
}

/// A parsed team
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Paste {
    pub title: String,
    pub author: String,
    pub notes: String,
    pub format: String,
    pub rental: String,
    pub sets: Vec<PasteSet>,
    pub is_ots: bool,
}

impl Paste {
    pub fn creatures(&self) -> impl Iterator<Item = &Creature> {
        self.sets.iter().filter_map(PasteSet::as_creature)
    }

    pub fn creature_count(&self) -> usize {
        self.creatures().count()
    }
}
