//! WWAD archive parsing and extraction.
//!
//! ## Architecture
//!
//! - [`structures`]: the decoded metadata and object records
//! - [`parser`]: decoding of the header and the three tables
//! - [`index`]: lookup of objects by relative path
//! - [`reader`]: bounded reads and streams over object data
//! - [`extractor`]: writing a whole archive out to a directory tree
//!
//! ## Format Overview
//!
//! A WAD file starts with the `WWAD` tag and an object count, followed by
//! a table of relative paths, a table of authoring-time absolute paths and a
//! table of 16-byte object records. Each record holds the absolute offset
//! and size of the object's raw bytes elsewhere in the file.
//!
//! ## Limitations
//!
//! - No compression, encryption or checksums exist in the format
//! - Archives are read-only; there is no support for creating or
//!   modifying them

pub mod extractor;
pub mod index;
pub mod parser;
pub mod reader;
pub mod structures;

pub use extractor::{
    ExtractOptions, default_destination, extract_all, extract_all_with, extract_object,
};
pub use parser::{decode_bytes, load};
pub use reader::{
    ObjectStream, open_object_stream, read_object, read_object_at_path, read_object_from,
};
pub use structures::*;
