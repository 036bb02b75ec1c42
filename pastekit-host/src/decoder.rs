//! Record decoder
//!
//! Reads `Paste`/`Creature`/`Move` records out of a module memory snapshot.
//! Decoding is total: a null pointer, an address outside memory or a string
//! without terminator decodes as an empty value and is logged, never a panic.
//!
//! Output is bounded by a byte budget proportional to the memory size. A
//! well-formed result reads each record and string once and stays far below
//! it; a response that reuses pointers to fan out is cut off once the budget
//! is spent, and every value decoded after that point is empty.

use std::cell::Cell;

use pastekit_spec::layout::{align_word, IV_UNSET};
use pastekit_spec::{
    Creature, CreatureField, Gender, Move, MoveField, Paste, PasteField, PasteSet, RecordLayout,
    Stat, StatSpread, NULL_PTR, WORD_SIZE,
};
use tracing::warn;

/// Decoded bytes allowed per byte of module memory
pub const DECODE_BUDGET_FACTOR: u64 = 4;

/// Field reader over a borrowed view of module memory
#[derive(Debug, Clone)]
pub struct RecordReader<'m> {
    memory: &'m [u8],
    budget: Cell<u64>,
}

impl<'m> RecordReader<'m> {
    pub fn new(memory: &'m [u8]) -> Self {
        let budget = (memory.len() as u64).saturating_mul(DECODE_BUDGET_FACTOR);
        Self::with_budget(memory, budget)
    }

    /// Reader that decodes at most `budget` bytes of records and strings
    pub fn with_budget(memory: &'m [u8], budget: u64) -> Self {
        RecordReader {
            memory,
            budget: Cell::new(budget),
        }
    }

    pub fn remaining_budget(&self) -> u64 {
        self.budget.get()
    }

    fn charge(&self, bytes: u64) -> bool {
        let left = self.budget.get();
        if bytes > left {
            if left > 0 {
                warn!(bytes, left, "decode budget exhausted, remaining values empty");
            }
            self.budget.set(0);
            return false;
        }
        self.budget.set(left - bytes);
        true
    }

    /// Little-endian word at `address`; 0 if it is not addressable
    pub fn word(&self, address: u32) -> u32 {
        let start = address as usize;
        let bytes = start
            .checked_add(WORD_SIZE as usize)
            .and_then(|end| self.memory.get(start..end));
        match bytes {
            Some(b) => u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            None => {
                warn!(address, size = self.memory.len(), "word read out of bounds");
                0
            }
        }
    }

    /// Word stored in `field` of the record at `base`
    pub fn field<F: RecordLayout>(&self, base: u32, field: F) -> u32 {
        match field.address(base) {
            Some(address) => self.word(address),
            None => 0,
        }
    }

    /// Null-terminated string at `ptr`
    ///
    /// The scan stops at the end of memory; a string that runs off the end
    /// is treated as absent.
    pub fn cstr(&self, ptr: u32) -> String {
        if ptr == NULL_PTR {
            return String::new();
        }
        let Some(tail) = self.memory.get(ptr as usize..) else {
            warn!(ptr, "string pointer out of bounds");
            return String::new();
        };
        match tail.iter().position(|&b| b == 0) {
            Some(end) if self.charge(end as u64 + 1) => {
                String::from_utf8_lossy(&tail[..end]).into_owned()
            }
            Some(_) => String::new(),
            None => {
                warn!(ptr, "string without terminator");
                String::new()
            }
        }
    }

    fn str_field<F: RecordLayout>(&self, base: u32, field: F) -> String {
        self.cstr(self.field(base, field))
    }

    /// `count` record pointers from the array at `ptr` (re-aligned to a word)
    pub fn ptr_array(&self, ptr: u32, count: u32) -> Vec<u32> {
        if ptr == NULL_PTR || count == 0 {
            return Vec::new();
        }
        let Some(base) = align_word(ptr) else {
            return Vec::new();
        };
        let fits = (count as u64)
            .checked_mul(WORD_SIZE as u64)
            .and_then(|len| len.checked_add(base as u64))
            .is_some_and(|end| end <= self.memory.len() as u64);
        if !fits {
            warn!(ptr, count, "pointer array out of bounds");
            return Vec::new();
        }
        if !self.charge(count as u64 * WORD_SIZE as u64) {
            return Vec::new();
        }
        (0..count).map(|i| self.word(base + i * WORD_SIZE)).collect()
    }

    pub fn read_move(&self, base: u32) -> Move {
        if !self.charge(MoveField::SIZE as u64) {
            return Move::default();
        }
        Move {
            name: self.str_field(base, MoveField::Name),
            move_type: self.str_field(base, MoveField::Type),
        }
    }

    fn read_lines(&self, base: u32) -> Vec<String> {
        let count = self.field(base, CreatureField::OtherCount);
        let array = self.field(base, CreatureField::Other);
        self.ptr_array(array, count)
            .into_iter()
            .map(|ptr| self.cstr(ptr))
            .collect()
    }

    /// A creature record, or a text set when the name pointer is empty
    pub fn read_set(&self, base: u32) -> PasteSet {
        if !self.charge(CreatureField::SIZE as u64) {
            return PasteSet::Text(String::new());
        }
        let name = self.str_field(base, CreatureField::Name);
        if name.is_empty() {
            return PasteSet::Text(self.read_lines(base).join("\n"));
        }

        let mut evs = StatSpread::splat(0);
        let mut ivs = StatSpread::splat(None);
        for stat in Stat::ALL {
            evs.set(stat, self.word(base + CreatureField::ev_offset(stat)));
            let iv = self.word(base + CreatureField::iv_offset(stat));
            ivs.set(stat, (iv != IV_UNSET).then_some(iv));
        }

        let moves_count = self.field(base, CreatureField::MoveCount);
        let moves_ptr = self.field(base, CreatureField::Moves);
        let moves = self
            .ptr_array(moves_ptr, moves_count)
            .into_iter()
            .map(|ptr| self.read_move(ptr))
            .collect();

        let creature = Creature {
            name,
            nickname: self.str_field(base, CreatureField::Nickname),
            item: self.str_field(base, CreatureField::Item),
            gender: Gender::from_codepoint(self.field(base, CreatureField::Gender)),
            item_image: self.str_field(base, CreatureField::ItemImage),
            sprite: self.str_field(base, CreatureField::Sprite),
            moves,
            evs,
            ivs,
            other: self.read_lines(base),
            last_stat: Stat::from_key(&self.str_field(base, CreatureField::LastStatEv)),
            last_stat_iv: Stat::from_key(&self.str_field(base, CreatureField::LastStatIv)),
            type1: self.str_field(base, CreatureField::Type1),
            type2: self.str_field(base, CreatureField::Type2),
            ability: self.str_field(base, CreatureField::Ability),
            level: self.field(base, CreatureField::Level),
            shiny: self.str_field(base, CreatureField::Shiny),
            hidden_power: self.str_field(base, CreatureField::HiddenPower),
            tera_type: self.str_field(base, CreatureField::TeraType),
            nature: self.str_field(base, CreatureField::Nature),
        };
        PasteSet::Creature(Box::new(creature))
    }

    pub fn read_paste(&self, base: u32) -> Paste {
        if !self.charge(PasteField::SIZE as u64) {
            return Paste::default();
        }
        let count = self.field(base, PasteField::SetCount);
        let array = self.field(base, PasteField::Sets);
        let sets = self
            .ptr_array(array, count)
            .into_iter()
            .map(|ptr| self.read_set(ptr))
            .collect();

        Paste {
            title: self.str_field(base, PasteField::Title),
            author: self.str_field(base, PasteField::Author),
            notes: self.str_field(base, PasteField::Notes),
            format: self.str_field(base, PasteField::Format),
            rental: self.str_field(base, PasteField::Rental),
            sets,
            is_ots: self.field(base, PasteField::IsOts) != 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put_word(mem: &mut [u8], address: u32, value: u32) {
        let a = address as usize;
        mem[a..a + 4].copy_from_slice(&value.to_le_bytes());
    }

    fn put_str(mem: &mut [u8], address: u32, s: &str) {
        let a = address as usize;
        mem[a..a + s.len()].copy_from_slice(s.as_bytes());
        mem[a + s.len()] = 0;
    }

    #[test]
    fn test_cstr_edge_cases() {
        let mut mem = vec![0u8; 64];
        put_str(&mut mem, 8, "Gengar");
        mem[60..64].copy_from_slice(b"abcd");
        let reader = RecordReader::new(&mem);

        assert_eq!(reader.cstr(8), "Gengar");
        assert_eq!(reader.cstr(NULL_PTR), "");
        assert_eq!(reader.cstr(1000), "");
        assert_eq!(reader.cstr(60), "");
    }

    #[test]
    fn test_word_out_of_bounds_is_zero() {
        let mem = vec![0xFFu8; 8];
        let reader = RecordReader::new(&mem);
        assert_eq!(reader.word(4), u32::MAX);
        assert_eq!(reader.word(6), 0);
        assert_eq!(reader.word(u32::MAX), 0);
    }

    #[test]
    fn test_ptr_array_realigns() {
        let mut mem = vec![0u8; 64];
        put_word(&mut mem, 20, 7);
        put_word(&mut mem, 24, 9);
        let reader = RecordReader::new(&mem);
        assert_eq!(reader.ptr_array(18, 2), vec![7, 9]);
        assert_eq!(reader.ptr_array(20, 100), Vec::<u32>::new());
        assert_eq!(reader.ptr_array(NULL_PTR, 3), Vec::<u32>::new());
    }

    #[test]
    fn test_read_move() {
        let mut mem = vec![0u8; 64];
        put_word(&mut mem, 16, 32);
        put_word(&mut mem, 20, 48);
        put_str(&mut mem, 32, "Shadow Ball");
        put_str(&mut mem, 48, "ghost");
        let mv = RecordReader::new(&mem).read_move(16);
        assert_eq!(mv, Move::new("Shadow Ball", "ghost"));
    }

    #[test]
    fn test_null_name_is_text_set() {
        let mut mem = vec![0u8; 256];
        let base = 16;
        put_word(&mut mem, base + CreatureField::OtherCount.offset(), 2);
        put_word(&mut mem, base + CreatureField::Other.offset(), 160);
        put_word(&mut mem, 160, 176);
        put_word(&mut mem, 164, 192);
        put_str(&mut mem, 176, "???garbled???");
        put_str(&mut mem, 192, "- Tackle");

        let set = RecordReader::new(&mem).read_set(base);
        assert_eq!(set, PasteSet::Text("???garbled???\n- Tackle".into()));
    }

    #[test]
    fn test_iv_sentinel_and_gender() {
        let mut mem = vec![0u8; 256];
        let base = 16;
        put_word(&mut mem, base + CreatureField::Name.offset(), 200);
        put_str(&mut mem, 200, "Gengar");
        put_word(&mut mem, base + CreatureField::Gender.offset(), 70);
        for stat in Stat::ALL {
            put_word(&mut mem, base + CreatureField::iv_offset(stat), IV_UNSET);
        }
        put_word(&mut mem, base + CreatureField::iv_offset(Stat::Spe), 0);

        let set = RecordReader::new(&mem).read_set(base);
        let creature = set.as_creature().unwrap();
        assert_eq!(creature.gender, Gender::Female);
        assert_eq!(creature.ivs.get(Stat::Spe), Some(0));
        assert_eq!(creature.ivs.get(Stat::Hp), None);
        assert!(creature.moves.is_empty());
        assert_eq!(creature.last_stat, None);
    }

    #[test]
    fn test_garbage_paste_pointer() {
        let mem = vec![0u8; 32];
        let paste = RecordReader::new(&mem).read_paste(u32::MAX - 2);
        assert!(paste.sets.is_empty());
        assert_eq!(paste.title, "");
        assert!(!paste.is_ots);
    }

    #[test]
    fn test_fan_out_stops_at_budget() {
        const SETS: u32 = 200;
        const LINES: u32 = 200;
        const LINE_LEN: usize = 1000;

        let mut mem = vec![0u8; 65536];
        let paste = 16;
        let sets = 64;
        let creature = sets + SETS * 4;
        let name = creature + CreatureField::SIZE;
        let lines = name + 8;
        let line = lines + LINES * 4;

        put_word(&mut mem, paste + PasteField::SetCount.offset(), SETS);
        put_word(&mut mem, paste + PasteField::Sets.offset(), sets);
        for i in 0..SETS {
            put_word(&mut mem, sets + i * 4, creature);
        }
        put_word(&mut mem, creature + CreatureField::Name.offset(), name);
        put_str(&mut mem, name, "Gengar");
        put_word(&mut mem, creature + CreatureField::OtherCount.offset(), LINES);
        put_word(&mut mem, creature + CreatureField::Other.offset(), lines);
        for i in 0..LINES {
            put_word(&mut mem, lines + i * 4, line);
        }
        put_str(&mut mem, line, &"x".repeat(LINE_LEN));

        let reader = RecordReader::new(&mem);
        let decoded = reader.read_paste(paste);
        assert_eq!(reader.remaining_budget(), 0);

        let other_bytes: usize = decoded
            .creatures()
            .flat_map(|c| c.other.iter())
            .map(String::len)
            .sum();
        assert!(other_bytes as u64 <= DECODE_BUDGET_FACTOR * mem.len() as u64);

        assert_eq!(decoded.sets.len(), SETS as usize);
        let first = decoded.sets[0].as_creature().unwrap();
        assert_eq!(first.other.len(), LINES as usize);
        assert!(first.other.iter().all(|l| l.len() == LINE_LEN));
        assert_eq!(decoded.sets[SETS as usize - 1], PasteSet::Text(String::new()));
    }

    #[test]
    fn test_budget_covers_well_formed_records() {
        let mut mem = vec![0u8; 64];
        put_word(&mut mem, 16, 32);
        put_word(&mut mem, 20, 48);
        put_str(&mut mem, 32, "Shadow Ball");
        put_str(&mut mem, 48, "ghost");

        let reader = RecordReader::with_budget(&mem, 8 + 12 + 6);
        assert_eq!(reader.read_move(16), Move::new("Shadow Ball", "ghost"));
        assert_eq!(reader.remaining_budget(), 0);
        assert_eq!(reader.read_move(16), Move::default());
    }
}
