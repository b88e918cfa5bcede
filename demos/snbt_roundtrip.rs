//! SNBT text to binary and back.
//!
//! Run with: cargo run --example snbt_roundtrip

use serde_nbt::{
    from_snbt, io, to_snbt, to_snbt_pretty_with_options, Accounter, PrettyOptions,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let text = r#"{
        name: "Chest",
        pos: [I; 12, 64, -30],
        Items: [
            {id: "minecraft:diamond", Count: 3b, Slot: 0b},
            {id: 'minecraft:oak_log', Count: 64b, Slot: 1b}
        ],
        Lock: "",
        CustomName: '{"text":"Loot"}',
        Chance: 0.25f
    }"#;

    let tag = from_snbt(text)?;
    println!("compact:\n{}\n", to_snbt(&tag));
    println!(
        "pretty:\n{}\n",
        to_snbt_pretty_with_options(&tag, PrettyOptions::new().with_indent(2))
    );

    let mut bytes = Vec::new();
    io::write_tag(&mut bytes, "", &tag)?;
    let (_, back) = io::read_tag(bytes.as_slice(), &mut Accounter::untrusted())?;
    assert_eq!(back, tag);
    println!("✓ {} bytes on the wire, round-trip successful", bytes.len());

    match from_snbt("{Items: [1b, 2b,]") {
        Ok(_) => println!("unexpectedly parsed"),
        Err(e) => println!("error: {}", e),
    }

    Ok(())
}
