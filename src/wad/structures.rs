use std::collections::HashMap;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Magic tag at the start of every archive.
pub const MAGIC: &[u8; 4] = b"WWAD";

/// Magic tag plus the object count.
pub const HEADER_SIZE: usize = 8;

/// Size of one entry in the object table.
pub const RECORD_SIZE: usize = 16;

/// Location and size of one object's data inside the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectRecord {
    pub version: u32,
    pub file_size: u32,
    /// Absolute byte offset into the archive file.
    pub offset: u32,
}

impl ObjectRecord {
    /// Byte range `[offset, offset + file_size)` of the object data.
    pub fn range(&self) -> Range<u64> {
        let start = u64::from(self.offset);
        start..start + u64::from(self.file_size)
    }
}

/// Decoded header and tables of a WAD archive.
///
/// `relative_paths`, `absolute_paths` and `objects` are parallel: index `i`
/// in each describes the same object.
#[derive(Debug, Clone)]
pub struct ArchiveMetadata {
    pub magic: [u8; 4],
    pub file_count: u32,
    /// Archive-internal paths with `/` separators. Lookup key for objects.
    pub relative_paths: Vec<String>,
    /// Paths the objects had when the archive was authored.
    pub absolute_paths: Vec<String>,
    pub objects: Vec<ObjectRecord>,
    pub source_path: PathBuf,
    pub(crate) index: HashMap<String, usize>,
}

impl ArchiveMetadata {
    /// Number of objects in the archive.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Relative path of the object at `index`.
    pub fn path_at(&self, index: usize) -> Option<&str> {
        self.relative_paths.get(index).map(String::as_str)
    }

    /// Path of the archive file these tables were decoded from.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Iterate every object as `(record, relative path, absolute path)`
    /// in table order.
    pub fn entries(&self) -> impl ExactSizeIterator<Item = (&ObjectRecord, &str, &str)> + '_ {
        self.objects
            .iter()
            .zip(&self.relative_paths)
            .zip(&self.absolute_paths)
            .map(|((record, rel), abs)| (record, rel.as_str(), abs.as_str()))
    }
}

/// Rewrite Windows-style separators to `/`.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}
