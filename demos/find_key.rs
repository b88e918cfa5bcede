//! Probe the root compound of a file for a key without decoding the rest.
//!
//! Run with: cargo run --example find_key

use serde_nbt::{io, nbt, Accounter, CollectFields, FieldSelector, TagType};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let chunk = nbt!({
        "DataVersion": 3465i32,
        "Status": "minecraft:full",
        "sections": [{ "Y": 0i8, "BlockStates": [L; 1, 2, 3, 4] }],
        "Heightmaps": { "WORLD_SURFACE": [L; 5, 6] }
    });
    let mut bytes = Vec::new();
    io::write_tag(&mut bytes, "", &chunk)?;

    for key in ["Status", "Entities"] {
        let mut acc = Accounter::untrusted();
        let found = io::contains_root_key(bytes.as_slice(), key, &mut acc)?;
        println!("{:<10} present: {:<5} ({} bytes accounted)", key, found, acc.usage());
    }

    // Pull two fields out of the stream; everything else is skipped.
    let mut fields = CollectFields::new(vec![
        FieldSelector::new(TagType::Int, "DataVersion"),
        FieldSelector::nested(&["Heightmaps"], TagType::LongArray, "WORLD_SURFACE"),
    ]);
    io::parse(bytes.as_slice(), &mut fields, &mut Accounter::untrusted())?;
    println!("\nmissing fields: {}", fields.missing_field_count());
    if let Some(found) = fields.into_result() {
        println!("collected: {}", found);
    }

    Ok(())
}
