//! Synthetic WAD fixtures for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub const CREDITS: &[u8] = b"Lego Rock Raiders\r\n\r\nProgramming ... the team\r\n";

/// One object to place in a fixture archive.
pub struct Entry {
    pub relative: String,
    pub absolute: String,
    pub data: Vec<u8>,
}

impl Entry {
    pub fn new(relative: &str, data: &[u8]) -> Self {
        Self {
            relative: relative.to_owned(),
            absolute: format!(r"C:\LegoRR\Data\{relative}"),
            data: data.to_vec(),
        }
    }
}

/// Serialize `entries` in WWAD layout, with object data packed after the
/// tables in entry order.
pub fn build(entries: &[Entry]) -> Vec<u8> {
    let mut tables = Vec::new();
    tables.extend_from_slice(b"WWAD");
    tables.extend_from_slice(&(entries.len() as u32).to_le_bytes());
    for e in entries {
        tables.extend_from_slice(e.relative.as_bytes());
        tables.push(0);
    }
    for e in entries {
        tables.extend_from_slice(e.absolute.as_bytes());
        tables.push(0);
    }

    let mut offset = tables.len() + entries.len() * 16;
    for e in entries {
        tables.extend_from_slice(&1u32.to_le_bytes());
        tables.extend_from_slice(&(e.data.len() as u32).to_le_bytes());
        tables.extend_from_slice(&[0u8; 4]);
        tables.extend_from_slice(&(offset as u32).to_le_bytes());
        offset += e.data.len();
    }

    for e in entries {
        tables.extend_from_slice(&e.data);
    }
    tables
}

pub fn write(dir: &Path, name: &str, entries: &[Entry]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, build(entries)).unwrap();
    path
}

/// A 214-object archive shaped like the retail `LegoRR1.wad`: config and
/// credits at the root, the rest spread over nested, backslash-separated
/// directories.
pub fn lego_entries() -> Vec<Entry> {
    let mut entries = vec![
        Entry::new("Lego.cfg", b"Lego* {\r\n  Main {\r\n  }\r\n}\r\n"),
        Entry::new("credits.txt", CREDITS),
    ];
    for i in 0..212 {
        let dir = match i % 3 {
            0 => r"Sounds\Voices\Surfaces",
            1 => r"Languages\English",
            _ => r"World\Shared",
        };
        let data = format!("object {i}").into_bytes();
        entries.push(Entry::new(&format!(r"{dir}\item{i:03}.dat"), &data));
    }
    entries
}
