//! # wadx
//!
//! Reader and extractor for WWAD container archives.
//!
//! A WAD bundles many named files (audio, config, text) into one binary
//! file with an internal directory structure. This library decodes the
//! archive tables once, then reads individual objects by path or streams
//! them, or extracts the whole archive to disk.
//!
//! ## Features
//!
//! - Strict decoding of the header and path/record tables
//! - Lookup of objects by their `/`-separated relative path
//! - Whole-object reads with size validation against the record
//! - Bounded async streams over a single object
//! - Concurrent extraction that preserves the directory tree
//!
//! ## Example
//!
//! ```no_run
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let meta = wadx::load("LegoRR1.wad").await?;
//!     println!("{} objects", meta.object_count());
//!
//!     if meta.exists("credits.txt") {
//!         let credits = wadx::read_object_at_path(&meta, "credits.txt").await?;
//!         println!("{}", String::from_utf8_lossy(&credits));
//!     }
//!
//!     wadx::extract_all(&meta, None).await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod wad;

pub use cli::Cli;
pub use error::{
    ExtractionError, FormatError, LoadError, NotFoundError, ReadError, SizeMismatchError,
};
pub use io::{LocalFileReader, ReadAt};
pub use wad::{
    ArchiveMetadata, ExtractOptions, ObjectRecord, ObjectStream, decode_bytes,
    default_destination, extract_all, extract_all_with, extract_object, load, normalize_path,
    open_object_stream, read_object, read_object_at_path, read_object_from,
};
