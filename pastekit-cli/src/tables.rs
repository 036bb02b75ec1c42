//! Reference table loading for the CLI

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use pastekit_spec::{ReferenceTable, ReferenceTables};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::TableArgs;

fn load_table<D: DeserializeOwned>(table: &'static str, path: Option<&Path>) -> Result<ReferenceTable<D>> {
    let Some(path) = path else {
        warn!(table, "no table given; names will not resolve");
        return Ok(ReferenceTable::new());
    };
    let file = File::open(path).with_context(|| format!("open {table} table: {}", path.display()))?;
    Ok(ReferenceTable::from_json_reader(table, BufReader::new(file))?)
}

/// Tables from a snapshot if one was given, otherwise from the JSON files
pub fn load(args: &TableArgs) -> Result<ReferenceTables> {
    if let Some(path) = &args.snapshot {
        let bytes = std::fs::read(path).with_context(|| format!("read snapshot: {}", path.display()))?;
        return Ok(ReferenceTables::from_snapshot(&bytes)?);
    }

    Ok(ReferenceTables {
        species: load_table("species", args.species.as_deref())?,
        moves: load_table("moves", args.moves.as_deref())?,
        items: load_table("items", args.items.as_deref())?,
    })
}
