//! The listing exchange
// (c) 2025 Ross Younger

use std::fmt::Display;

use bytes::BytesMut;
use tracing::{trace, warn};

use super::common::{check_refusal, receive_server_message};
use crate::error::{ClientError, IoContext as _, Result};
use crate::protocol::{
    FileName, MessageKind, encode_list_request,
    common::{ReceivingStream, SendReceivePair, SendingStream},
};
use crate::util::io::{read_exact_or_eof, write_all};

/// Separates names in the on-wire file list
pub const SEPARATOR: u8 = b'|';

/// The files a server exposes, in the order it listed them.
///
/// The position of a name in the listing is its _file id_.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileListing {
    names: Vec<FileName>,
}

impl FileListing {
    /// Splits a flat `|`-separated buffer into names.
    ///
    /// An empty buffer is an empty listing. A single trailing separator is ignored;
    /// any other empty segment is kept as an (empty) name so ids stay aligned with the server.
    #[must_use]
    pub fn parse(raw: &[u8]) -> Self {
        if raw.is_empty() {
            return Self::default();
        }
        let body = raw.strip_suffix(&[SEPARATOR]).unwrap_or(raw);
        Self {
            names: body
                .split(|b| *b == SEPARATOR)
                .map(FileName::from)
                .collect(),
        }
    }

    /// Number of names
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Is the listing empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The names, in listing order
    #[must_use]
    pub fn names(&self) -> &[FileName] {
        &self.names
    }

    /// Looks up the name with the given file id.
    pub fn resolve_name(&self, file_id: i64) -> Result<&FileName> {
        usize::try_from(file_id)
            .ok()
            .and_then(|i| self.names.get(i))
            .ok_or(ClientError::InvalidSelection {
                file_id,
                count: self.names.len(),
            })
    }
}

impl Display for FileListing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (id, name) in self.names.iter().enumerate() {
            writeln!(f, "{id}.{name}")?;
        }
        Ok(())
    }
}

/// Requests and receives the server's file listing.
///
/// A refusal is returned as [`ClientError::Refused`].
pub(crate) async fn request_listing<S: SendingStream, R: ReceivingStream>(
    stream: &mut SendReceivePair<S, R>,
) -> Result<FileListing> {
    write_all(&mut stream.send, &encode_list_request(), "files names request").await?;

    let msg = check_refusal(receive_server_message(&mut stream.recv).await?)?;
    if msg.kind() != MessageKind::FileList {
        warn!(
            "expected a file list header, got message type {}; treating it as one",
            msg.msg_type
        );
    }
    let expected = msg.param as usize;
    trace!("receiving file list of {expected} bytes");

    let mut buffer = BytesMut::zeroed(expected);
    let received = read_exact_or_eof(&mut stream.recv, &mut buffer)
        .await
        .io_context("reading files names list")?;
    if received < expected {
        return Err(ClientError::Truncated {
            what: "file name list",
            expected: u64::from(msg.param),
            received: received as u64,
        });
    }
    Ok(FileListing::parse(&buffer))
}
