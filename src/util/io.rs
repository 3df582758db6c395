//! Reliable stream I/O
//!
//! A byte stream makes no promises about how much arrives in any one read, or how much
//! any one write accepts. These helpers loop until the caller's requirement is satisfied.
// (c) 2025 Ross Younger

use std::io::ErrorKind;

use tokio::io::{AsyncRead, AsyncReadExt as _, AsyncWrite, AsyncWriteExt as _};
use tracing::trace;

use crate::error::{IoContext as _, Result};

/// Writes every byte of `bytes`, then flushes.
///
/// A channel that stops accepting data (a zero-length write) is reported as an I/O error
/// of kind `WriteZero`.
pub async fn write_all<W>(writer: &mut W, bytes: &[u8], what: &str) -> Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    trace!("send {what} ({} bytes)", bytes.len());
    writer
        .write_all(bytes)
        .await
        .io_context(format!("sending {what}"))?;
    writer
        .flush()
        .await
        .io_context(format!("flushing {what}"))
}

/// Reads until `buf` is full or the stream reaches end-of-stream.
///
/// # Return
/// The number of bytes placed at the start of `buf`.
/// This is less than `buf.len()` if and only if the stream ended during the call.
pub async fn read_exact_or_eof<R>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]).await {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => (),
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Reads whatever the stream next delivers, up to `buf.len()` bytes.
///
/// # Return
/// The number of bytes placed at the start of `buf`; 0 means end-of-stream
/// (or that `buf` was empty).
pub async fn read_chunk<R>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize>
where
    R: AsyncRead + Unpin + ?Sized,
{
    loop {
        match reader.read(buf).await {
            Err(e) if e.kind() == ErrorKind::Interrupted => (),
            other => return other,
        }
    }
}

#[cfg(test)]
mod test {
    use std::io::{Error, ErrorKind};
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use tokio_test::io::Builder;

    use super::{read_chunk, read_exact_or_eof, write_all};
    use crate::error::ClientError;

    #[tokio::test]
    async fn accumulates_short_reads() {
        let mut mock = Builder::new().read(b"ab").read(b"c").read(b"def").build();
        let mut buf = [0u8; 5];
        let n = read_exact_or_eof(&mut mock, &mut buf).await.unwrap();
        assert_eq!(n, 5);
        assert_eq!(&buf, b"abcde");
        // the remainder of the last delivery is still there
        let mut buf = [0u8; 5];
        let n = read_exact_or_eof(&mut mock, &mut buf).await.unwrap();
        assert_eq!(n, 1);
        assert_eq!(&buf[..n], b"f");
    }

    #[tokio::test]
    async fn short_only_at_eof() {
        let mut mock = Builder::new().read(b"xyz").build();
        let mut buf = [0u8; 8];
        assert_eq!(read_exact_or_eof(&mut mock, &mut buf).await.unwrap(), 3);
        assert_eq!(read_exact_or_eof(&mut mock, &mut buf).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn never_reads_more_than_asked() {
        let mut mock = Builder::new().read(b"0123456789").build();
        let mut buf = [0u8; 4];
        assert_eq!(read_exact_or_eof(&mut mock, &mut buf).await.unwrap(), 4);
        let mut rest = Vec::new();
        let _ = tokio::io::AsyncReadExt::read_to_end(&mut mock, &mut rest)
            .await
            .unwrap();
        assert_eq!(rest, b"456789");
    }

    #[tokio::test]
    async fn empty_request_reads_nothing() {
        let mut mock = Builder::new().build();
        let mut buf = [0u8; 0];
        assert_eq!(read_exact_or_eof(&mut mock, &mut buf).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn read_error_propagates() {
        let mut mock = Builder::new()
            .read(b"ab")
            .read_error(Error::new(ErrorKind::ConnectionReset, "reset"))
            .build();
        let mut buf = [0u8; 6];
        let e = read_exact_or_eof(&mut mock, &mut buf).await.unwrap_err();
        assert_eq!(e.kind(), ErrorKind::ConnectionReset);
    }

    #[tokio::test]
    async fn chunk_is_one_delivery() {
        let mut mock = Builder::new().read(b"abc").read(b"de").build();
        let mut buf = [0u8; 16];
        assert_eq!(read_chunk(&mut mock, &mut buf).await.unwrap(), 3);
        assert_eq!(read_chunk(&mut mock, &mut buf).await.unwrap(), 2);
        assert_eq!(&buf[..2], b"de");
        assert_eq!(read_chunk(&mut mock, &mut buf).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn partial_writes_are_completed() {
        let mut mock = Builder::new()
            .write(b"\x00\x02\x00")
            .wait(Duration::from_millis(1))
            .write(b"\x00\x00\x0a")
            .build();
        write_all(&mut mock, b"\x00\x02\x00\x00\x00\x0a", "test message")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn write_error_has_context() {
        let mut mock = Builder::new()
            .write_error(Error::new(ErrorKind::BrokenPipe, "gone"))
            .build();
        let e = write_all(&mut mock, b"\x00\x01", "list request")
            .await
            .unwrap_err();
        let ClientError::Io { context, source } = e else {
            panic!("unexpected error {e:?}");
        };
        assert_eq!(context, "sending list request");
        assert_eq!(source.kind(), ErrorKind::BrokenPipe);
    }
}
