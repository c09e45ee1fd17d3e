//! Error types returned by the archive reader.
//!
//! Every public operation fails with exactly one of these types, carrying
//! the path or record that triggered the failure where one exists.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The archive bytes do not follow the WWAD layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// The first four bytes are not `WWAD`.
    #[error("invalid WAD magic: expected 'WWAD', got {0:?}")]
    BadMagic([u8; 4]),

    /// A header field or table runs past the end of the buffer.
    #[error("truncated WAD: {what} at offset {offset} runs past end of data ({len} bytes)")]
    Truncated {
        what: &'static str,
        offset: usize,
        len: usize,
    },
}

/// The requested relative path is not in the archive's path table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("WAD does not contain {path}")]
pub struct NotFoundError {
    pub path: String,
}

/// Fewer bytes were available than the record declares.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error(
    "WAD object size inconsistent with metadata: expected {expected} bytes at offset {offset}, read {actual}"
)]
pub struct SizeMismatchError {
    pub expected: u32,
    pub actual: usize,
    pub offset: u32,
}

/// Failure to load and decode an archive from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read archive {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode archive {}: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },
}

/// Failure to read a single object.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    SizeMismatch(#[from] SizeMismatchError),

    #[error("io: {0}")]
    Io(#[from] io::Error),
}

/// The first failure observed while extracting a whole archive.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to open archive {}: {source}", path.display())]
    OpenArchive {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {path} from archive: {source}")]
    Read {
        path: String,
        #[source]
        source: ReadError,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("refusing to extract {0}: path escapes the destination directory")]
    UnsafePath(String),

    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
