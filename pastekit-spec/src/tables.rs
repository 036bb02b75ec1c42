//! # Reference Tables
//!
//! Read-only lookup data the parser resolves names against: species, moves
//! and held items. Tables keep the insertion order of their source data, and
//! that order is the tie-break when more than one key matches a fuzzy lookup.
//!
//! Snapshot format (little-endian):
//! ```text
//! Offset  Size  Field
//! ──────────────────────────────────
//! 0x00    4     magic ("PKRT" = 0x504B5254)
//! 0x04    ...   bincode-encoded ReferenceTables
//! ```

use indexmap::IndexMap;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::io::Read;

use crate::error::{Result, SpecError};

/// Magic number for table snapshots: "PKRT" = 0x504B5254
pub const SNAPSHOT_MAGIC: u32 = 0x504B_5254;

/// Species entry, keyed by lower-case hyphenated species key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesDescriptor {
    /// National dex id (forms carry their own ids)
    pub id: u32,
    pub type1: String,
    #[serde(default)]
    pub type2: String,
    #[serde(default)]
    pub has_shiny: bool,
    #[serde(default)]
    pub has_female: bool,
}

/// Move entry, keyed by lower-case hyphenated move key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveDescriptor {
    pub name: String,
    #[serde(default)]
    pub id: u32,
    pub type1: String,
}

/// Item entry, keyed by display name
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemDescriptor {
    #[serde(default)]
    pub name: String,
    /// Index into the item sprite sheet
    #[serde(default)]
    pub spritenum: Option<u32>,
}

/// An insertion-ordered map from key to descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceTable<D> {
    entries: IndexMap<String, D>,
}

impl<D> Default for ReferenceTable<D> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<D> ReferenceTable<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry; a replaced key keeps its original position
    pub fn insert(&mut self, key: impl Into<String>, descriptor: D) -> Option<D> {
        self.entries.insert(key.into(), descriptor)
    }

    pub fn get(&self, key: &str) -> Option<&D> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &D)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<D: DeserializeOwned> ReferenceTable<D> {
    /// Parse a JSON object of `key -> descriptor`, preserving key order
    pub fn from_json_str(table: &'static str, json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| SpecError::TableJson { table, source })
    }

    pub fn from_json_reader<R: Read>(table: &'static str, reader: R) -> Result<Self> {
        serde_json::from_reader(reader).map_err(|source| SpecError::TableJson { table, source })
    }
}

impl<D, K: Into<String>> FromIterator<(K, D)> for ReferenceTable<D> {
    fn from_iter<I: IntoIterator<Item = (K, D)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// All tables the parser needs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceTables {
    pub species: ReferenceTable<SpeciesDescriptor>,
    pub moves: ReferenceTable<MoveDescriptor>,
    pub items: ReferenceTable<ItemDescriptor>,
}

impl ReferenceTables {
    /// Load the three tables from their JSON sources
    pub fn load_json(species: &str, moves: &str, items: &str) -> Result<Self> {
        Ok(Self {
            species: ReferenceTable::from_json_str("species", species)?,
            moves: ReferenceTable::from_json_str("moves", moves)?,
            items: ReferenceTable::from_json_str("items", items)?,
        })
    }

    /// Serialize to a snapshot (magic + bincode payload)
    pub fn to_snapshot(&self) -> Result<Vec<u8>> {
        let mut bytes = SNAPSHOT_MAGIC.to_le_bytes().to_vec();
        bytes.extend(bincode::serialize(self)?);
        Ok(bytes)
    }

    /// Deserialize from a snapshot
    pub fn from_snapshot(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 4 {
            return Err(SpecError::InvalidSnapshotSize {
                expected: 4,
                found: bytes.len(),
            });
        }

        let magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if magic != SNAPSHOT_MAGIC {
            return Err(SpecError::InvalidSnapshotMagic(magic));
        }

        Ok(bincode::deserialize(&bytes[4..])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPECIES: &str = r#"{
        "gengar": {"id": 94, "type1": "ghost", "type2": "poison", "has_shiny": true, "has_female": false},
        "bulbasaur": {"id": 1, "type1": "grass", "type2": "poison", "has_shiny": true, "has_female": false},
        "abra": {"id": 63, "type1": "psychic"}
    }"#;

    const MOVES: &str = r#"{
        "shadow-ball": {"name": "Shadow Ball", "id": 247, "type1": "ghost"}
    }"#;

    const ITEMS: &str = r#"{
        "Choice Scarf": {"name": "Choice Scarf", "spritenum": 69, "fling": {"basePower": 10}},
        "Mystery Box": {"name": "Mystery Box"}
    }"#;

    #[test]
    fn test_load_json_preserves_order() {
        let tables = ReferenceTables::load_json(SPECIES, MOVES, ITEMS).unwrap();
        let keys: Vec<&str> = tables.species.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["gengar", "bulbasaur", "abra"]);
        assert_eq!(tables.species.get("abra").unwrap().type2, "");
        assert_eq!(tables.moves.get("shadow-ball").unwrap().type1, "ghost");
        assert_eq!(tables.items.get("Choice Scarf").unwrap().spritenum, Some(69));
        assert_eq!(tables.items.get("Mystery Box").unwrap().spritenum, None);
    }

    #[test]
    fn test_load_json_error_names_table() {
        let err = ReferenceTables::load_json(SPECIES, "[1, 2]", ITEMS).unwrap_err();
        assert!(matches!(err, SpecError::TableJson { table: "moves", .. }));
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let tables = ReferenceTables::load_json(SPECIES, MOVES, ITEMS).unwrap();
        let bytes = tables.to_snapshot().unwrap();
        assert_eq!(&bytes[..4], &SNAPSHOT_MAGIC.to_le_bytes());

        let restored = ReferenceTables::from_snapshot(&bytes).unwrap();
        assert_eq!(restored, tables);
        let keys: Vec<&str> = restored.species.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["gengar", "bulbasaur", "abra"]);
    }

    #[test]
    fn test_snapshot_rejects_bad_input() {
        assert!(matches!(
            ReferenceTables::from_snapshot(&[1, 2]),
            Err(SpecError::InvalidSnapshotSize { found: 2, .. })
        ));
        assert!(matches!(
            ReferenceTables::from_snapshot(&[0, 0, 0, 0, 1]),
            Err(SpecError::InvalidSnapshotMagic(0))
        ));
    }

    #[test]
    fn test_insert_keeps_position() {
        let mut table: ReferenceTable<u32> = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(table.insert("a", 10), Some(1));
        let entries: Vec<(&str, u32)> = table.iter().map(|(k, v)| (k, *v)).collect();
        assert_eq!(entries, vec![("a", 10), ("b", 2)]);
        assert_eq!(table.len(), 2);
        assert!(!table.is_empty());
    }
}
