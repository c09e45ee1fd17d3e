use super::ReadAt;
use async_trait::async_trait;
use std::io::Result;
use std::path::Path;
use std::sync::Arc;

/// Local file reader with random access support
///
/// The file is opened read-only and closed when the last clone of the
/// handle is dropped. Reads run on tokio's blocking pool.
pub struct LocalFileReader {
    file: Arc<PositionedFile>,
    size: u64,
}

impl LocalFileReader {
    pub fn new(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let size = file.metadata()?.len();
        Ok(Self {
            file: Arc::new(PositionedFile::new(file)),
            size,
        })
    }
}

#[async_trait]
impl ReadAt for LocalFileReader {
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        let file = Arc::clone(&self.file);
        let len = buf.len();
        let data = tokio::task::spawn_blocking(move || {
            let mut data = vec![0u8; len];
            let n = file.read_at(&mut data, offset)?;
            data.truncate(n);
            Ok::<_, std::io::Error>(data)
        })
        .await
        .map_err(std::io::Error::other)??;

        buf[..data.len()].copy_from_slice(&data);
        Ok(data.len())
    }

    async fn read_vec_at(&self, offset: u64, len: usize) -> Result<Vec<u8>> {
        let file = Arc::clone(&self.file);
        tokio::task::spawn_blocking(move || {
            let mut data = vec![0u8; len];
            let mut filled = 0;
            while filled < len {
                let n = file.read_at(&mut data[filled..], offset + filled as u64)?;
                if n == 0 {
                    break;
                }
                filled += n;
            }
            data.truncate(filled);
            Ok::<_, std::io::Error>(data)
        })
        .await
        .map_err(std::io::Error::other)?
    }

    fn size(&self) -> u64 {
        self.size
    }
}

/// File handle that only supports reads at explicit offsets.
struct PositionedFile {
    file: std::fs::File,
    #[cfg(not(any(unix, windows)))]
    cursor_lock: std::sync::Mutex<()>,
}

impl PositionedFile {
    fn new(file: std::fs::File) -> Self {
        Self {
            file,
            #[cfg(not(any(unix, windows)))]
            cursor_lock: std::sync::Mutex::new(()),
        }
    }

    fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileExt;
            self.file.read_at(buf, offset)
        }

        #[cfg(windows)]
        {
            // seek_read moves the handle's cursor but always reads at the
            // given offset, so interleaved callers cannot observe it.
            use std::os::windows::fs::FileExt;
            self.file.seek_read(buf, offset)
        }

        #[cfg(not(any(unix, windows)))]
        {
            use std::io::{Read, Seek, SeekFrom};
            let _guard = self
                .cursor_lock
                .lock()
                .map_err(|_| std::io::Error::other("file cursor lock poisoned"))?;
            let mut file = &self.file;
            file.seek(SeekFrom::Start(offset))?;
            file.read(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn read_full_at_stops_at_end_of_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"0123456789").unwrap();

        let reader = LocalFileReader::new(tmp.path()).unwrap();
        assert_eq!(reader.size(), 10);

        let mut buf = [0u8; 4];
        assert_eq!(reader.read_full_at(3, &mut buf).await.unwrap(), 4);
        assert_eq!(&buf, b"3456");

        let mut buf = [0u8; 8];
        assert_eq!(reader.read_full_at(6, &mut buf).await.unwrap(), 4);
        assert_eq!(&buf[..4], b"6789");

        assert_eq!(reader.read_full_at(20, &mut buf).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn read_vec_at_truncates_to_available_bytes() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"0123456789").unwrap();

        let reader = LocalFileReader::new(tmp.path()).unwrap();
        assert_eq!(reader.read_vec_at(2, 3).await.unwrap(), b"234");
        assert_eq!(reader.read_vec_at(7, 10).await.unwrap(), b"789");
        assert!(reader.read_vec_at(10, 4).await.unwrap().is_empty());
    }

    #[test]
    fn reads_complete_on_a_multi_thread_runtime() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&[7u8; 64 * 1024]).unwrap();
        let reader = Arc::new(LocalFileReader::new(tmp.path()).unwrap());

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .build()
            .unwrap();
        let lens = runtime.block_on(async {
            let mut tasks = tokio::task::JoinSet::new();
            for i in 0..16u64 {
                let reader = Arc::clone(&reader);
                tasks.spawn(async move {
                    reader.read_vec_at(i * 1024, 4096).await.unwrap().len()
                });
            }
            let mut lens = Vec::new();
            while let Some(len) = tasks.join_next().await {
                lens.push(len.unwrap());
            }
            lens
        });

        assert_eq!(lens, vec![4096; 16]);
    }
}
