//! Print an NBT file with the styled printer.
//!
//! Run with: cargo run --example inspect -- <path>
//!
//! Without a path, a small sample world file is written to a temporary
//! directory and inspected instead.

use serde_nbt::{io, nbt, Accounter, Compression, StyledOptions, StyledPrinter, Tag};
use std::error::Error;
use std::fs;
use std::path::PathBuf;

fn sample(dir: &tempfile::TempDir) -> Result<PathBuf, Box<dyn Error>> {
    let level = nbt!({
        "Data": {
            "LevelName": "New World",
            "RandomSeed": 4_815_162_342i64,
            "SpawnX": 0i32,
            "SpawnY": 64i32,
            "SpawnZ": 0i32,
            "GameRules": { "doDaylightCycle": "true", "keepInventory": "false" },
            "Player": {
                "Pos": [0.5f64, 64.0f64, 0.5f64],
                "Inventory": [{ "id": "minecraft:torch", "Count": 16i8, "Slot": 0i8 }]
            }
        }
    });
    let path = dir.path().join("level.dat");
    if let Tag::Compound(root) = &level {
        io::write_file(&path, root, Compression::Gzip)?;
    }
    Ok(path)
}

fn main() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let path = match std::env::args().nth(1) {
        Some(path) => PathBuf::from(path),
        None => sample(&dir)?,
    };

    let prefix: Vec<u8> = fs::read(&path)?.into_iter().take(2).collect();
    let compression = Compression::detect(&prefix);
    let mut acc = Accounter::untrusted();
    let root = io::read_file_with(&path, compression, &mut acc)?;

    println!("{} ({:?}, {} bytes accounted)\n", path.display(), compression, acc.usage());
    let printer = StyledPrinter::new(StyledOptions::default().with_max_elements(32));
    printer.print(&Tag::Compound(root)).print_colored()?;

    Ok(())
}
