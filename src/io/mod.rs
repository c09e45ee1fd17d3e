mod local;

pub use local::LocalFileReader;

use async_trait::async_trait;
use std::io::Result;

/// Trait for random access reading from a data source
///
/// Implementations must not rely on a shared cursor: concurrent calls at
/// different offsets on the same reader are allowed.
#[async_trait]
pub trait ReadAt: Send + Sync {
    /// Read data at the specified offset into the buffer
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize>;

    /// Get the total size of the data source
    fn size(&self) -> u64;

    /// Fill `buf` starting at `offset`, stopping early only at end of data.
    ///
    /// Returns the number of bytes read, which is less than `buf.len()`
    /// when the source ends first.
    async fn read_full_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self
                .read_at(offset + filled as u64, &mut buf[filled..])
                .await?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        Ok(filled)
    }

    /// Read up to `len` bytes starting at `offset` into a new buffer.
    ///
    /// The result is shorter than `len` only when the source ends first.
    async fn read_vec_at(&self, offset: u64, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        let filled = self.read_full_at(offset, &mut buf).await?;
        buf.truncate(filled);
        Ok(buf)
    }
}
