//! # Wire Layout
//!
//! Fixed little-endian record layout used to move a parsed [`Paste`] across
//! the module boundary. All fields are 32-bit words; strings are pointers to
//! null-terminated UTF-8 and nested lists are `(count, pointer)` pairs where
//! the pointer addresses a word-aligned array of record pointers.
//!
//! The module writer and the host decoder both address fields through the
//! enums below, so the offsets exist in exactly one place.
//!
//! [`Paste`]: crate::model::Paste

use crate::WORD_SIZE;

/// Sentinel stored in an IV slot that was not listed in the paste
pub const IV_UNSET: u32 = 0xFFFF_FFFF;

/// Round `addr` up to the next word boundary; `None` on overflow
#[inline]
pub const fn align_word(addr: u32) -> Option<u32> {
    match addr.checked_add(WORD_SIZE - 1) {
        Some(v) => Some(v & !(WORD_SIZE - 1)),
        None => None,
    }
}

/// Whether `addr` sits on a word boundary
#[inline]
pub const fn is_word_aligned(addr: u32) -> bool {
    addr & (WORD_SIZE - 1) == 0
}

/// Byte offset of each entry given the word width of every entry before it
const fn prefix_offsets<const N: usize>(widths: [u32; N]) -> [u32; N] {
    let mut out = [0u32; N];
    let mut acc = 0u32;
    let mut i = 0;
    while i < N {
        out[i] = acc;
        acc += widths[i] * WORD_SIZE;
        i += 1;
    }
    out
}

const fn total_size<const N: usize>(widths: [u32; N]) -> u32 {
    let mut acc = 0u32;
    let mut i = 0;
    while i < N {
        acc += widths[i] * WORD_SIZE;
        i += 1;
    }
    acc
}

/// A record whose fields live at fixed offsets from its base pointer
pub trait RecordLayout: Copy {
    /// Record size in bytes
    const SIZE: u32;

    /// Byte offset of the field from the record base
    fn offset(self) -> u32;

    /// Absolute address of the field for a record at `base`
    #[inline]
    fn address(self, base: u32) -> Option<u32> {
        base.checked_add(self.offset())
    }
}

// ============================================================================
// Paste (32 bytes)
// ============================================================================

/// Paste header fields
///
/// ```text
/// Offset  Size  Field
/// ──────────────────────────────────
/// 0x00    4     title (string ptr)
/// 0x04    4     author (string ptr)
/// 0x08    4     notes (string ptr)
/// 0x0C    4     format (string ptr)
/// 0x10    4     rental (string ptr)
/// 0x14    4     set count
/// 0x18    4     set array ptr (aligned array of Creature ptrs)
/// 0x1C    4     is_ots (0/1)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PasteField {
    Title,
    Author,
    Notes,
    Format,
    Rental,
    SetCount,
    Sets,
    IsOts,
}

impl PasteField {
    pub const ALL: [PasteField; 8] = [
        PasteField::Title,
        PasteField::Author,
        PasteField::Notes,
        PasteField::Format,
        PasteField::Rental,
        PasteField::SetCount,
        PasteField::Sets,
        PasteField::IsOts,
    ];
}

impl RecordLayout for PasteField {
    const SIZE: u32 = PasteField::ALL.len() as u32 * WORD_SIZE;

    #[inline]
    fn offset(self) -> u32 {
        self as u32 * WORD_SIZE
    }
}

// ============================================================================
// Creature (128 bytes)
// ============================================================================

/// Creature record fields
///
/// ```text
/// Offset  Size  Field
/// ──────────────────────────────────
/// 0x00    4     name (string ptr; null marks a text block)
/// 0x04    4     nickname (string ptr)
/// 0x08    4     item (string ptr)
/// 0x0C    4     gender codepoint ('M' = 77, 'F' = 70, 0)
/// 0x10    4     item image (string ptr)
/// 0x14    4     sprite (string ptr)
/// 0x18    4     move count
/// 0x1C    4     move array ptr
/// 0x20    24    EVs (hp, atk, def, spa, spd, spe)
/// 0x38    24    IVs (same order, 0xFFFFFFFF = unset)
/// 0x50    4     other-line count
/// 0x54    4     other-line array ptr
/// 0x58    4     last_stat_ev (string ptr to stat key)
/// 0x5C    4     last_stat_iv (string ptr to stat key)
/// 0x60    4     type1 (string ptr)
/// 0x64    4     type2 (string ptr)
/// 0x68    4     ability (string ptr)
/// 0x6C    4     level
/// 0x70    4     shiny (string ptr)
/// 0x74    4     hidden_power (string ptr)
/// 0x78    4     tera_type (string ptr)
/// 0x7C    4     nature (string ptr)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreatureField {
    Name,
    Nickname,
    Item,
    Gender,
    ItemImage,
    Sprite,
    MoveCount,
    Moves,
    Evs,
    Ivs,
    OtherCount,
    Other,
    LastStatEv,
    LastStatIv,
    Type1,
    Type2,
    Ability,
    Level,
    Shiny,
    HiddenPower,
    TeraType,
    Nature,
}

/// Width in words of each creature field, in declaration order
const CREATURE_WIDTHS: [u32; 22] = [
    1, 1, 1, 1, 1, 1, 1, 1, // name .. moves
    6, 6, // evs, ivs
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, // other_count .. nature
];

const CREATURE_OFFSETS: [u32; 22] = prefix_offsets(CREATURE_WIDTHS);

impl CreatureField {
    /// Offset of one EV slot
    #[inline]
    pub fn ev_offset(stat: crate::model::Stat) -> u32 {
        CreatureField::Evs.offset() + stat.index() as u32 * WORD_SIZE
    }

    /// Offset of one IV slot
    #[inline]
    pub fn iv_offset(stat: crate::model::Stat) -> u32 {
        CreatureField::Ivs.offset() + stat.index() as u32 * WORD_SIZE
    }
}

impl RecordLayout for CreatureField {
    const SIZE: u32 = total_size(CREATURE_WIDTHS);

    #[inline]
    fn offset(self) -> u32 {
        CREATURE_OFFSETS[self as usize]
    }
}

// ============================================================================
// Move (8 bytes)
// ============================================================================

/// Move record fields
///
/// ```text
/// Offset  Size  Field
/// ──────────────────────────────────
/// 0x00    4     name (string ptr)
/// 0x04    4     type (string ptr)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveField {
    Name,
    Type,
}

impl RecordLayout for MoveField {
    const SIZE: u32 = 2 * WORD_SIZE;

    #[inline]
    fn offset(self) -> u32 {
        self as u32 * WORD_SIZE
    }
}
