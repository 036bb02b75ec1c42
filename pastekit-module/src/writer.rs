//! Module-side record writer
//!
//! Lays a [`Paste`] out in linear memory using the offsets from
//! [`pastekit_spec::layout`]. Children are written before their parents, so
//! every pointer stored in a record refers to memory that is already filled.
//!
//! Empty strings are written as null pointers. Strings are truncated at an
//! interior NUL, matching what a terminator-scanning reader recovers.

use pastekit_spec::layout::IV_UNSET;
use pastekit_spec::{
    Creature, CreatureField, Move, MoveField, Paste, PasteField, PasteSet, RecordLayout, Stat,
    NULL_PTR, WORD_SIZE,
};

use crate::arena::Arena;
use crate::error::{ModuleError, Result};
use crate::memory::LinearMemory;

pub struct RecordWriter<'m> {
    memory: &'m mut LinearMemory,
    arena: &'m mut Arena,
}

impl<'m> RecordWriter<'m> {
    pub fn new(memory: &'m mut LinearMemory, arena: &'m mut Arena) -> Self {
        RecordWriter { memory, arena }
    }

    fn allocate(&mut self, len: u32) -> Result<u32> {
        self.arena.allocate(self.memory, len)
    }

    /// Write a null-terminated string; empty strings become null
    pub fn write_str(&mut self, s: &str) -> Result<u32> {
        let bytes = s.as_bytes();
        let bytes = match bytes.iter().position(|&b| b == 0) {
            Some(nul) => &bytes[..nul],
            None => bytes,
        };
        if bytes.is_empty() {
            return Ok(NULL_PTR);
        }

        let len = u32::try_from(bytes.len())
            .ok()
            .and_then(|n| n.checked_add(1))
            .ok_or_else(|| ModuleError::Other("string exceeds address space".into()))?;
        let ptr = self.allocate(len)?;
        // Allocation is zero-filled, so the terminator is already in place
        self.memory.write_bytes(ptr, bytes)?;
        Ok(ptr)
    }

    /// Write a word-aligned array of pointers; empty arrays become null
    pub fn write_ptr_array(&mut self, ptrs: &[u32]) -> Result<u32> {
        if ptrs.is_empty() {
            return Ok(NULL_PTR);
        }
        let len = u32::try_from(ptrs.len())
            .ok()
            .and_then(|n| n.checked_mul(WORD_SIZE))
            .ok_or_else(|| ModuleError::Other("array exceeds address space".into()))?;
        let base = self.allocate(len)?;
        for (i, &ptr) in ptrs.iter().enumerate() {
            self.memory.write_u32(base + i as u32 * WORD_SIZE, ptr)?;
        }
        Ok(base)
    }

    fn write_field<F: RecordLayout>(&mut self, base: u32, field: F, value: u32) -> Result<()> {
        self.memory.write_u32(base + field.offset(), value)
    }

    fn write_str_field<F: RecordLayout>(&mut self, base: u32, field: F, s: &str) -> Result<()> {
        let ptr = self.write_str(s)?;
        self.write_field(base, field, ptr)
    }

    pub fn write_move(&mut self, mv: &Move) -> Result<u32> {
        let base = self.allocate(MoveField::SIZE)?;
        self.write_str_field(base, MoveField::Name, &mv.name)?;
        self.write_str_field(base, MoveField::Type, &mv.move_type)?;
        Ok(base)
    }

    fn write_lines(&mut self, base: u32, lines: &[String]) -> Result<()> {
        let ptrs = lines
            .iter()
            .map(|line| self.write_str(line))
            .collect::<Result<Vec<_>>>()?;
        let array = self.write_ptr_array(&ptrs)?;
        self.write_field(base, CreatureField::OtherCount, ptrs.len() as u32)?;
        self.write_field(base, CreatureField::Other, array)
    }

    pub fn write_creature(&mut self, creature: &Creature) -> Result<u32> {
        let base = self.allocate(CreatureField::SIZE)?;

        self.write_str_field(base, CreatureField::Name, &creature.name)?;
        self.write_str_field(base, CreatureField::Nickname, &creature.nickname)?;
        self.write_str_field(base, CreatureField::Item, &creature.item)?;
        self.write_field(base, CreatureField::Gender, creature.gender.codepoint())?;
        self.write_str_field(base, CreatureField::ItemImage, &creature.item_image)?;
        self.write_str_field(base, CreatureField::Sprite, &creature.sprite)?;

        let moves = creature
            .moves
            .iter()
            .map(|mv| self.write_move(mv))
            .collect::<Result<Vec<_>>>()?;
        let moves_array = self.write_ptr_array(&moves)?;
        self.write_field(base, CreatureField::MoveCount, moves.len() as u32)?;
        self.write_field(base, CreatureField::Moves, moves_array)?;

        for stat in Stat::ALL {
            self.memory
                .write_u32(base + CreatureField::ev_offset(stat), creature.evs.get(stat))?;
            self.memory.write_u32(
                base + CreatureField::iv_offset(stat),
                creature.ivs.get(stat).unwrap_or(IV_UNSET),
            )?;
        }

        self.write_lines(base, &creature.other)?;

        let last_ev = creature.last_stat.map(Stat::key).unwrap_or_default();
        let last_iv = creature.last_stat_iv.map(Stat::key).unwrap_or_default();
        self.write_str_field(base, CreatureField::LastStatEv, last_ev)?;
        self.write_str_field(base, CreatureField::LastStatIv, last_iv)?;

        self.write_str_field(base, CreatureField::Type1, &creature.type1)?;
        self.write_str_field(base, CreatureField::Type2, &creature.type2)?;
        self.write_str_field(base, CreatureField::Ability, &creature.ability)?;
        self.write_field(base, CreatureField::Level, creature.level)?;
        self.write_str_field(base, CreatureField::Shiny, &creature.shiny)?;
        self.write_str_field(base, CreatureField::HiddenPower, &creature.hidden_power)?;
        self.write_str_field(base, CreatureField::TeraType, &creature.tera_type)?;
        self.write_str_field(base, CreatureField::Nature, &creature.nature)?;

        Ok(base)
    }

    /// A text block is a creature record with a null name and the block's
    /// lines in `other`
    pub fn write_text(&mut self, text: &str) -> Result<u32> {
        let base = self.allocate(CreatureField::SIZE)?;
        let lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        self.write_lines(base, &lines)?;
        for stat in Stat::ALL {
            self.memory
                .write_u32(base + CreatureField::iv_offset(stat), IV_UNSET)?;
        }
        Ok(base)
    }

    pub fn write_paste(&mut self, paste: &Paste) -> Result<u32> {
        let sets = paste
            .sets
            .iter()
            .map(|set| match set {
                PasteSet::Creature(creature) => self.write_creature(creature),
                PasteSet::Text(text) => self.write_text(text),
            })
            .collect::<Result<Vec<_>>>()?;
        let sets_array = self.write_ptr_array(&sets)?;

        let base = self.allocate(PasteField::SIZE)?;
        self.write_str_field(base, PasteField::Title, &paste.title)?;
        self.write_str_field(base, PasteField::Author, &paste.author)?;
        self.write_str_field(base, PasteField::Notes, &paste.notes)?;
        self.write_str_field(base, PasteField::Format, &paste.format)?;
        self.write_str_field(base, PasteField::Rental, &paste.rental)?;
        self.write_field(base, PasteField::SetCount, sets.len() as u32)?;
        self.write_field(base, PasteField::Sets, sets_array)?;
        self.write_field(base, PasteField::IsOts, u32::from(paste.is_ots))?;
        Ok(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pastekit_spec::MemoryConfig;

    fn setup() -> (LinearMemory, Arena) {
        (LinearMemory::new(MemoryConfig::DEFAULT), Arena::new())
    }

    fn read_cstr(mem: &LinearMemory, ptr: u32) -> String {
        let bytes = &mem.as_slice()[ptr as usize..];
        let end = bytes.iter().position(|&b| b == 0).unwrap();
        String::from_utf8(bytes[..end].to_vec()).unwrap()
    }

    #[test]
    fn test_write_str() {
        let (mut mem, mut arena) = setup();
        let mut w = RecordWriter::new(&mut mem, &mut arena);
        let a = w.write_str("Gengar").unwrap();
        let empty = w.write_str("").unwrap();
        let cut = w.write_str("ab\0cd").unwrap();
        assert_eq!(empty, NULL_PTR);
        assert_eq!(read_cstr(&mem, a), "Gengar");
        assert_eq!(read_cstr(&mem, cut), "ab");
    }

    #[test]
    fn test_write_ptr_array_is_aligned() {
        let (mut mem, mut arena) = setup();
        let mut w = RecordWriter::new(&mut mem, &mut arena);
        w.write_str("odd").unwrap();
        let array = w.write_ptr_array(&[11, 22, 33]).unwrap();
        assert_eq!(array % 4, 0);
        assert_eq!(w.write_ptr_array(&[]).unwrap(), NULL_PTR);
        assert_eq!(mem.read_u32(array + 8).unwrap(), 33);
    }

    #[test]
    fn test_write_creature_fields() {
        let (mut mem, mut arena) = setup();
        let mut creature = Creature {
            name: "Gengar".into(),
            level: 50,
            moves: vec![Move::new("Shadow Ball", "ghost")],
            ..Creature::default()
        };
        creature.evs.set(Stat::Spe, 252);
        creature.ivs.set(Stat::Atk, Some(0));
        creature.refresh_last_stats();

        let base = RecordWriter::new(&mut mem, &mut arena)
            .write_creature(&creature)
            .unwrap();

        let name = mem.read_u32(base + CreatureField::Name.offset()).unwrap();
        assert_eq!(read_cstr(&mem, name), "Gengar");
        assert_eq!(mem.read_u32(base + CreatureField::Nickname.offset()).unwrap(), NULL_PTR);
        assert_eq!(mem.read_u32(base + CreatureField::Level.offset()).unwrap(), 50);
        assert_eq!(mem.read_u32(base + CreatureField::ev_offset(Stat::Spe)).unwrap(), 252);
        assert_eq!(mem.read_u32(base + CreatureField::iv_offset(Stat::Atk)).unwrap(), 0);
        assert_eq!(mem.read_u32(base + CreatureField::iv_offset(Stat::Hp)).unwrap(), IV_UNSET);
        assert_eq!(mem.read_u32(base + CreatureField::MoveCount.offset()).unwrap(), 1);

        let moves = mem.read_u32(base + CreatureField::Moves.offset()).unwrap();
        let mv = mem.read_u32(moves).unwrap();
        let mv_type = mem.read_u32(mv + MoveField::Type.offset()).unwrap();
        assert_eq!(read_cstr(&mem, mv_type), "ghost");

        let last = mem.read_u32(base + CreatureField::LastStatEv.offset()).unwrap();
        assert_eq!(read_cstr(&mem, last), "spe");
    }

    #[test]
    fn test_write_text_has_null_name() {
        let (mut mem, mut arena) = setup();
        let base = RecordWriter::new(&mut mem, &mut arena)
            .write_text("line one\nline two")
            .unwrap();
        assert_eq!(mem.read_u32(base + CreatureField::Name.offset()).unwrap(), NULL_PTR);
        assert_eq!(mem.read_u32(base + CreatureField::OtherCount.offset()).unwrap(), 2);
    }

    #[test]
    fn test_write_paste_header() {
        let (mut mem, mut arena) = setup();
        let paste = Paste {
            title: "Rain".into(),
            is_ots: true,
            sets: vec![PasteSet::Text("x".into())],
            ..Paste::default()
        };
        let base = RecordWriter::new(&mut mem, &mut arena)
            .write_paste(&paste)
            .unwrap();
        let title = mem.read_u32(base + PasteField::Title.offset()).unwrap();
        assert_eq!(read_cstr(&mem, title), "Rain");
        assert_eq!(mem.read_u32(base + PasteField::SetCount.offset()).unwrap(), 1);
        assert_eq!(mem.read_u32(base + PasteField::IsOts.offset()).unwrap(), 1);
    }
}
