//! Decoder for the WWAD header and tables.
//!
//! ## Layout
//!
//! All integers are little-endian `u32`. The header and tables are read
//! front to back with a single cursor:
//!
//! 1. `WWAD` magic
//! 2. object count `n`
//! 3. `n` NUL-terminated relative paths
//! 4. `n` NUL-terminated absolute paths
//! 5. `n` 16-byte object records: version, size, 4 reserved bytes, offset
//!
//! Object data is not touched here; the records point into the rest of the
//! file and are read lazily by [`reader`](super::reader).

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::error::{FormatError, LoadError};

use super::index::build_index;
use super::structures::*;

/// Read an archive from disk and decode its tables.
///
/// The whole file is buffered; object data is later read again by offset so
/// that the metadata does not keep the archive bytes alive.
pub async fn load(path: impl AsRef<Path>) -> Result<ArchiveMetadata, LoadError> {
    let path = path.as_ref();
    let data = tokio::fs::read(path).await.map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    decode_bytes(&data, path).map_err(|source| LoadError::Format {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode archive tables from an in-memory buffer.
///
/// `source_path` is stored in the result so later reads can find the
/// backing file.
pub fn decode_bytes(
    data: &[u8],
    source_path: impl Into<PathBuf>,
) -> Result<ArchiveMetadata, FormatError> {
    let mut cursor = Cursor::new(data);

    let magic = read_magic(&mut cursor)?;
    let file_count = read_u32(&mut cursor, "file count")?;
    let count = file_count as usize;

    // Every path takes at least its terminator and every record 16 bytes,
    // so a count that cannot fit is rejected before allocating for it.
    let min_tables = count.saturating_mul(2 + RECORD_SIZE);
    if min_tables > remaining(&cursor) {
        return Err(truncated(&cursor, "object tables"));
    }

    let mut relative_paths = Vec::with_capacity(count);
    for _ in 0..count {
        let raw = read_cstring(&mut cursor, "relative path")?;
        relative_paths.push(normalize_path(&raw));
    }

    let mut absolute_paths = Vec::with_capacity(count);
    for _ in 0..count {
        absolute_paths.push(read_cstring(&mut cursor, "absolute path")?);
    }

    let mut objects = Vec::with_capacity(count);
    for _ in 0..count {
        objects.push(read_record(&mut cursor)?);
    }

    let index = build_index(&relative_paths);

    tracing::debug!(
        file_count,
        table_end = cursor.position(),
        unique_paths = index.len(),
        "decoded WAD tables"
    );

    Ok(ArchiveMetadata {
        magic,
        file_count,
        relative_paths,
        absolute_paths,
        objects,
        source_path: source_path.into(),
        index,
    })
}

fn remaining(cursor: &Cursor<&[u8]>) -> usize {
    cursor.get_ref().len().saturating_sub(cursor.position() as usize)
}

fn truncated(cursor: &Cursor<&[u8]>, what: &'static str) -> FormatError {
    FormatError::Truncated {
        what,
        offset: cursor.position() as usize,
        len: cursor.get_ref().len(),
    }
}

fn read_magic(cursor: &mut Cursor<&[u8]>) -> Result<[u8; 4], FormatError> {
    if remaining(cursor) < MAGIC.len() {
        return Err(truncated(cursor, "magic"));
    }

    let start = cursor.position() as usize;
    let mut magic = [0u8; 4];
    magic.copy_from_slice(&cursor.get_ref()[start..start + 4]);
    if &magic != MAGIC {
        return Err(FormatError::BadMagic(magic));
    }

    cursor.set_position((start + 4) as u64);
    Ok(magic)
}

fn read_u32(cursor: &mut Cursor<&[u8]>, what: &'static str) -> Result<u32, FormatError> {
    let at = truncated(cursor, what);
    cursor.read_u32::<LittleEndian>().map_err(|_| at)
}

/// Read bytes up to the next NUL and advance past the terminator.
fn read_cstring(cursor: &mut Cursor<&[u8]>, what: &'static str) -> Result<String, FormatError> {
    let start = cursor.position() as usize;
    let rest = cursor.get_ref().get(start..).unwrap_or_default();
    let len = rest
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| truncated(cursor, what))?;

    // Non-UTF-8 paths are kept, with invalid bytes replaced.
    let value = String::from_utf8_lossy(&rest[..len]).into_owned();
    cursor.set_position((start + len + 1) as u64);
    Ok(value)
}

fn read_record(cursor: &mut Cursor<&[u8]>) -> Result<ObjectRecord, FormatError> {
    if remaining(cursor) < RECORD_SIZE {
        return Err(truncated(cursor, "object record"));
    }

    let version = read_u32(cursor, "object version")?;
    let file_size = read_u32(cursor, "object size")?;
    let _reserved = read_u32(cursor, "object reserved field")?;
    let offset = read_u32(cursor, "object offset")?;

    Ok(ObjectRecord {
        version,
        file_size,
        offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archive(entries: &[(&str, &str, [u32; 3])]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&(entries.len() as u32).to_le_bytes());
        for (rel, _, _) in entries {
            out.extend_from_slice(rel.as_bytes());
            out.push(0);
        }
        for (_, abs, _) in entries {
            out.extend_from_slice(abs.as_bytes());
            out.push(0);
        }
        for (_, _, [version, size, offset]) in entries {
            out.extend_from_slice(&version.to_le_bytes());
            out.extend_from_slice(&size.to_le_bytes());
            out.extend_from_slice(&0xDEADBEEFu32.to_le_bytes());
            out.extend_from_slice(&offset.to_le_bytes());
        }
        out
    }

    #[test]
    fn decodes_tables_in_order() {
        let data = archive(&[
            ("Lego.cfg", r"C:\LegoRR\Data\Lego.cfg", [1, 10, 100]),
            (r"Sounds\drip.wav", r"C:\LegoRR\Data\Sounds\drip.wav", [2, 20, 110]),
        ]);

        let meta = decode_bytes(&data, "LegoRR1.wad").unwrap();
        assert_eq!(&meta.magic, MAGIC);
        assert_eq!(meta.file_count, 2);
        assert_eq!(meta.relative_paths, ["Lego.cfg", "Sounds/drip.wav"]);
        assert_eq!(meta.absolute_paths[1], r"C:\LegoRR\Data\Sounds\drip.wav");
        assert_eq!(
            meta.objects[1],
            ObjectRecord {
                version: 2,
                file_size: 20,
                offset: 110
            }
        );
        assert_eq!(meta.source_path(), Path::new("LegoRR1.wad"));
    }

    #[test]
    fn empty_archive_is_valid() {
        let meta = decode_bytes(&archive(&[]), "empty.wad").unwrap();
        assert_eq!(meta.file_count, 0);
        assert!(meta.is_empty());
    }

    #[test]
    fn rejects_bad_magic() {
        let mut data = archive(&[]);
        data[..4].copy_from_slice(b"PWAD");
        assert_eq!(
            decode_bytes(&data, "x.wad").unwrap_err(),
            FormatError::BadMagic(*b"PWAD")
        );
    }

    #[test]
    fn rejects_short_header() {
        let full = archive(&[]);
        for len in [0, 3, 4, 7] {
            assert!(matches!(
                decode_bytes(&full[..len], "x.wad"),
                Err(FormatError::Truncated { .. })
            ));
        }
    }

    #[test]
    fn rejects_every_truncation_of_the_tables() {
        let data = archive(&[("a.txt", "C:\\a.txt", [1, 1, 0]), ("b.txt", "C:\\b.txt", [1, 1, 0])]);
        for len in HEADER_SIZE..data.len() {
            assert!(
                matches!(decode_bytes(&data[..len], "x.wad"), Err(FormatError::Truncated { .. })),
                "length {len} should be truncated"
            );
        }
        assert!(decode_bytes(&data, "x.wad").is_ok());
    }

    #[test]
    fn huge_count_is_truncated_not_allocated() {
        let mut data = MAGIC.to_vec();
        data.extend_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            decode_bytes(&data, "x.wad"),
            Err(FormatError::Truncated { what: "object tables", .. })
        ));
    }
}
