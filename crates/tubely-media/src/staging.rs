//! Temp-file staging for bytes in flight.
//!
//! An incoming stream is materialized into a seekable temp file before
//! validation and storage. The size ceiling is enforced while copying: the
//! sink refuses to accept bytes past the limit rather than measuring after
//! the fact. The backing file is removed exactly once when the handle is
//! dropped, on every exit path.

use std::io::{self, SeekFrom};
use std::path::Path;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt, AsyncWriteExt, ReadBuf};

use crate::sniff::SNIFF_PREFIX_LEN;

#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    #[error("Payload exceeds the {limit}-byte upload limit")]
    TooLarge { limit: u64 },

    #[error("IO error while staging upload: {0}")]
    Io(#[from] io::Error),
}

/// Write side of the staging area. Accepts chunks up to the configured limit,
/// then [`finish`](StagingSink::finish)es into a rewound [`StagedUpload`].
pub struct StagingSink {
    file: File,
    path: TempPath,
    written: u64,
    limit: u64,
}

impl StagingSink {
    /// Create a new staging sink with a hard byte limit.
    pub fn create(limit: u64) -> Result<Self, StagingError> {
        let (file, path) = tempfile::Builder::new()
            .prefix("tubely-upload-")
            .tempfile()?
            .into_parts();

        Ok(StagingSink {
            file: File::from_std(file),
            path,
            written: 0,
            limit,
        })
    }

    /// Append a chunk, refusing any byte past the limit. On overflow the
    /// partial file is released when the sink is dropped.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), StagingError> {
        let projected = self.written + chunk.len() as u64;
        if projected > self.limit {
            return Err(StagingError::TooLarge { limit: self.limit });
        }
        self.file.write_all(chunk).await?;
        self.written = projected;
        Ok(())
    }

    /// Flush and rewind into a readable staged upload.
    pub async fn finish(mut self) -> Result<StagedUpload, StagingError> {
        self.file.flush().await?;
        self.file.seek(SeekFrom::Start(0)).await?;

        tracing::debug!(size_bytes = self.written, "Staged upload complete");

        Ok(StagedUpload {
            file: self.file,
            path: self.path,
            len: self.written,
        })
    }

    /// Filesystem path of the backing temp file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A staged upload: seekable, rewindable, deleted on drop.
pub struct StagedUpload {
    file: File,
    path: TempPath,
    len: u64,
}

impl StagedUpload {
    /// Drain a byte stream into a staged upload, enforcing the limit while
    /// copying. A stream error (e.g. the client connection dropping mid-body)
    /// aborts staging and releases the partial file.
    pub async fn stage<S, E>(mut stream: S, limit: u64) -> Result<StagedUpload, StagingError>
    where
        S: Stream<Item = Result<Bytes, E>> + Unpin,
        E: std::error::Error + Send + Sync + 'static,
    {
        let mut sink = StagingSink::create(limit)?;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| io::Error::new(io::ErrorKind::UnexpectedEof, e))?;
            sink.write_chunk(&chunk).await?;
        }
        sink.finish().await
    }

    /// Total number of staged bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Filesystem path of the backing temp file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reset the read cursor to the start.
    pub async fn rewind(&mut self) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(0)).await?;
        Ok(())
    }

    /// Read the sniffing prefix (at most 512 bytes), leaving the cursor back
    /// at position 0. Calling this repeatedly yields the same bytes.
    pub async fn sniff_prefix(&mut self) -> io::Result<Vec<u8>> {
        self.rewind().await?;
        let mut buf = vec![0u8; SNIFF_PREFIX_LEN.min(self.len as usize)];
        self.file.read_exact(&mut buf).await?;
        self.rewind().await?;
        Ok(buf)
    }

    /// Read the full staged content, leaving the cursor back at position 0.
    pub async fn read_to_vec(&mut self) -> io::Result<Vec<u8>> {
        self.rewind().await?;
        let mut buf = Vec::with_capacity(self.len as usize);
        self.file.read_to_end(&mut buf).await?;
        self.rewind().await?;
        Ok(buf)
    }
}

/// Streaming read access for stores that upload from a reader. The temp file
/// stays alive (and is cleaned up) for as long as the reader does.
impl AsyncRead for StagedUpload {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut TaskContext<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.file).poll_read(cx, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn byte_stream(chunks: Vec<&'static [u8]>) -> impl Stream<Item = Result<Bytes, io::Error>> + Unpin {
        stream::iter(
            chunks
                .into_iter()
                .map(|c| Ok(Bytes::from_static(c)))
                .collect::<Vec<_>>(),
        )
    }

    #[tokio::test]
    async fn test_stage_within_limit() {
        let staged = StagedUpload::stage(byte_stream(vec![b"hello ", b"world"]), 64)
            .await
            .unwrap();
        assert_eq!(staged.len(), 11);
        assert!(staged.path().exists());
    }

    #[tokio::test]
    async fn test_stage_rejects_oversized_stream() {
        let mut sink = StagingSink::create(8).unwrap();
        let path = sink.path().to_path_buf();

        sink.write_chunk(b"12345678").await.unwrap();
        let err = sink.write_chunk(b"9").await.unwrap_err();
        assert!(matches!(err, StagingError::TooLarge { limit: 8 }));

        drop(sink);
        assert!(!path.exists(), "partial staging file must be released");
    }

    #[tokio::test]
    async fn test_stage_exact_limit_is_accepted() {
        let staged = StagedUpload::stage(byte_stream(vec![b"12345678"]), 8)
            .await
            .unwrap();
        assert_eq!(staged.len(), 8);
    }

    #[tokio::test]
    async fn test_stream_error_releases_temp_file() {
        let chunks: Vec<Result<Bytes, io::Error>> = vec![
            Ok(Bytes::from_static(b"partial")),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "client gone")),
        ];
        let result = StagedUpload::stage(stream::iter(chunks), 64).await;
        assert!(matches!(result, Err(StagingError::Io(_))));
    }

    #[tokio::test]
    async fn test_drop_removes_backing_file() {
        let staged = StagedUpload::stage(byte_stream(vec![b"bytes"]), 64)
            .await
            .unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.exists());
        drop(staged);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_sniff_prefix_is_position_neutral() {
        let mut staged = StagedUpload::stage(byte_stream(vec![b"\x89PNG\r\n\x1a\nrest"]), 64)
            .await
            .unwrap();

        let first = staged.sniff_prefix().await.unwrap();
        let second = staged.sniff_prefix().await.unwrap();
        assert_eq!(first, second);

        // The full read still sees everything from position 0.
        let all = staged.read_to_vec().await.unwrap();
        assert_eq!(all, b"\x89PNG\r\n\x1a\nrest");
    }

    #[tokio::test]
    async fn test_read_to_vec_after_rewind() {
        let mut staged = StagedUpload::stage(byte_stream(vec![b"abc", b"def"]), 64)
            .await
            .unwrap();
        assert_eq!(staged.read_to_vec().await.unwrap(), b"abcdef");
        assert_eq!(staged.read_to_vec().await.unwrap(), b"abcdef");
    }
}
