//! Lookup of objects by relative path.
//!
//! Paths are compared exactly against the normalized table entries. When an
//! archive lists the same path twice, the first entry wins.

use std::collections::HashMap;

use crate::error::NotFoundError;

use super::structures::{ArchiveMetadata, ObjectRecord};

pub(crate) fn build_index(relative_paths: &[String]) -> HashMap<String, usize> {
    let mut index = HashMap::with_capacity(relative_paths.len());
    for (i, path) in relative_paths.iter().enumerate() {
        index.entry(path.clone()).or_insert(i);
    }
    index
}

impl ArchiveMetadata {
    /// Position of the first object stored under `path`.
    pub fn index_of(&self, path: &str) -> Option<usize> {
        self.index.get(path).copied()
    }

    pub fn exists(&self, path: &str) -> bool {
        self.index_of(path).is_some()
    }

    /// Record of the object stored under `path`.
    pub fn get_record(&self, path: &str) -> Result<ObjectRecord, NotFoundError> {
        self.index_of(path)
            .map(|i| self.objects[i])
            .ok_or_else(|| NotFoundError {
                path: path.to_owned(),
            })
    }
}
