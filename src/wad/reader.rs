//! Reading object data out of an archive file.
//!
//! Each call opens its own read-only handle and drops it before returning,
//! on success and on error. Callers that read many objects in a row can open
//! one [`LocalFileReader`] and use [`read_object_from`] instead.

use std::io;
use std::io::SeekFrom;
use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt, ReadBuf, Take};

use crate::error::{ReadError, SizeMismatchError};
use crate::io::{LocalFileReader, ReadAt};

use super::structures::{ArchiveMetadata, ObjectRecord};

/// Read the whole object described by `record` from the archive at
/// `source_path`.
pub async fn read_object(
    source_path: &Path,
    record: &ObjectRecord,
) -> Result<Vec<u8>, ReadError> {
    let reader = LocalFileReader::new(source_path)?;
    read_object_from(&reader, record).await
}

/// Read the whole object described by `record` through an open reader.
///
/// Fails with [`SizeMismatchError`] when the source ends before
/// `record.file_size` bytes could be read.
pub async fn read_object_from<R: ReadAt + ?Sized>(
    reader: &R,
    record: &ObjectRecord,
) -> Result<Vec<u8>, ReadError> {
    let range = record.range();
    let mismatch = |actual: usize| SizeMismatchError {
        expected: record.file_size,
        actual,
        offset: record.offset,
    };

    // Checked up front so a corrupt record cannot force a huge allocation.
    if range.end > reader.size() {
        let actual = reader.size().saturating_sub(range.start) as usize;
        return Err(mismatch(actual).into());
    }

    let buf = reader
        .read_vec_at(range.start, record.file_size as usize)
        .await?;
    if buf.len() != record.file_size as usize {
        return Err(mismatch(buf.len()).into());
    }

    Ok(buf)
}

/// Look up `path` and read its object.
pub async fn read_object_at_path(
    meta: &ArchiveMetadata,
    path: &str,
) -> Result<Vec<u8>, ReadError> {
    let record = meta.get_record(path)?;
    read_object(meta.source_path(), &record).await
}

/// Open a stream over exactly the bytes of one object.
///
/// Nothing is read until the stream is polled. If the archive ends before
/// the declared size, the read that detects it fails with
/// [`io::ErrorKind::UnexpectedEof`].
pub async fn open_object_stream(
    source_path: &Path,
    record: &ObjectRecord,
) -> io::Result<ObjectStream> {
    let mut file = File::open(source_path).await?;
    file.seek(SeekFrom::Start(record.range().start)).await?;

    Ok(ObjectStream {
        inner: file.take(u64::from(record.file_size)),
        record: *record,
    })
}

/// Bounded, non-restartable byte stream over one object's data.
#[derive(Debug)]
pub struct ObjectStream {
    inner: Take<File>,
    record: ObjectRecord,
}

impl ObjectStream {
    /// Bytes not yet yielded.
    pub fn remaining(&self) -> u64 {
        self.inner.limit()
    }
}

impl AsyncRead for ObjectStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if buf.remaining() == 0 {
            return Poll::Ready(Ok(()));
        }

        let before = buf.filled().len();
        ready!(Pin::new(&mut self.inner).poll_read(cx, buf))?;

        if buf.filled().len() == before && self.inner.limit() > 0 {
            let missing = self.inner.limit();
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "WAD object at offset {} ended {missing} bytes before its declared size {}",
                    self.record.offset, self.record.file_size
                ),
            )));
        }

        Poll::Ready(Ok(()))
    }
}
