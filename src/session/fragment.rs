//! The fragment exchange
// (c) 2025 Ross Younger

use indicatif::ProgressBar;
use tracing::{trace, warn};

use super::common::{check_refusal, receive_server_message};
use crate::error::{IoContext as _, Result};
use crate::protocol::{
    FileName, MessageKind, encode_fragment_request,
    common::{ReceivingStream, SendReceivePair, SendingStream},
};
use crate::storage::{FragmentSink as _, FragmentStore};
use crate::util::io::{read_chunk, write_all};

/// Default size of the bulk transfer buffer
pub const DEFAULT_CHUNK_SIZE: usize = 512_000;

/// What happened during a fragment transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentReport {
    /// Remote file name
    pub name: FileName,
    /// Offset of the first byte requested
    pub start: u32,
    /// Number of bytes requested
    pub requested: u32,
    /// Number of bytes the server said it would send
    pub declared: u32,
    /// Number of bytes actually received and stored
    pub received: u64,
}

impl FragmentReport {
    /// Did we receive everything the server announced?
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.received == u64::from(self.declared)
    }
}

/// Requests `length` bytes of `name` from offset `start`, streaming the body into `store`.
///
/// Each delivery from the channel (at most `chunk.len()` bytes) becomes one positional write,
/// starting at `start`. The transfer ends when the announced number of bytes has been
/// received, or at end-of-stream. A short transfer is reported in the result, not as an error.
///
/// A refusal is returned as [`ClientError::Refused`](crate::ClientError::Refused);
/// in that case the destination is not opened.
pub(crate) async fn request_fragment<S, R, T>(
    stream: &mut SendReceivePair<S, R>,
    name: &FileName,
    start: u32,
    length: u32,
    store: &T,
    chunk: &mut [u8],
    progress: &ProgressBar,
) -> Result<FragmentReport>
where
    S: SendingStream,
    R: ReceivingStream,
    T: FragmentStore,
{
    let request = encode_fragment_request(start, length, name.as_bytes())?;
    write_all(&mut stream.send, &request, "file fragment request").await?;

    let msg = check_refusal(receive_server_message(&mut stream.recv).await?)?;
    if msg.kind() == MessageKind::FileList {
        warn!("server sent a file list header in response to a fragment request; treating it as a fragment");
    }
    let declared = msg.param;
    let total = u64::from(declared);
    trace!("receiving fragment of {total} bytes");
    progress.set_length(total);

    let mut sink = store.open(name).await?;
    let mut cursor = u64::from(start);
    let mut received = 0u64;
    while received < total {
        let want = usize::try_from(total - received).map_or(chunk.len(), |r| r.min(chunk.len()));
        let n = read_chunk(&mut stream.recv, &mut chunk[..want])
            .await
            .io_context("file fragment reading")?;
        if n == 0 {
            break;
        }
        sink.write_at(cursor, &chunk[..n])
            .await
            .io_context(format!("writing fragment of {name} at offset {cursor}"))?;
        cursor += n as u64;
        received += n as u64;
        progress.inc(n as u64);
    }
    sink.finish()
        .await
        .io_context(format!("completing write of {name}"))?;

    let report = FragmentReport {
        name: name.clone(),
        start,
        requested: length,
        declared,
        received,
    };
    if !report.is_complete() {
        warn!("fragment truncated: server announced {total} bytes but sent {received}");
    }
    Ok(report)
}
