//! Error type returned by the protocol core
// (c) 2025 Ross Younger

use crate::protocol::Refusal;
use crate::session::SessionState;

/// Everything that can go wrong during a session.
///
/// Only [`ClientError::Refused`] is an expected outcome; every other variant is a fault.
/// Nothing below the CLI decides whether to terminate the process.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The channel or local storage reported an error
    #[error("{context}: {source}")]
    Io {
        /// The operation that failed
        context: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    /// The stream ended before a length-delimited item was complete
    #[error("{what} truncated: expected {expected} bytes, received {received}")]
    Truncated {
        /// The item being received
        what: &'static str,
        /// Number of bytes the protocol required
        expected: u64,
        /// Number of bytes actually received
        received: u64,
    },
    /// The server declined the request
    #[error("file transfer: {0}")]
    Refused(#[from] Refusal),
    /// The selected file id is not in the listing
    #[error("invalid selection: file id {file_id} is not in the listing (0..{count})")]
    InvalidSelection {
        /// What the caller asked for
        file_id: i64,
        /// Number of entries in the listing
        count: usize,
    },
    /// The requested byte range ends before it starts
    #[error("invalid range: end address {end} precedes start address {start}")]
    InvalidRange {
        /// Start address
        start: u32,
        /// End address
        end: u32,
    },
    /// A file name does not fit the 16-bit length field
    #[error("file name is too long ({0} bytes)")]
    NameTooLong(usize),
    /// A file name cannot be used as a local storage object
    #[error("file name {0:?} cannot be stored locally")]
    InvalidFileName(String),
    /// A session operation was attempted in the wrong state
    #[error("session is {actual}, but this operation requires {expected}")]
    OutOfSequence {
        /// The state the operation needs
        expected: SessionState,
        /// The state the session was in
        actual: SessionState,
    },
}

/// Convenience alias
pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Extension trait for attaching an operation description to I/O errors
pub(crate) trait IoContext<T> {
    /// Converts an I/O error into [`ClientError::Io`] with the given context
    fn io_context<C: Into<String>>(self, context: C) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn io_context<C: Into<String>>(self, context: C) -> Result<T> {
        self.map_err(|source| ClientError::Io {
            context: context.into(),
            source,
        })
    }
}

impl ClientError {
    /// If this error is a server refusal, returns it
    #[must_use]
    pub fn refusal(&self) -> Option<Refusal> {
        match self {
            ClientError::Refused(r) => Some(*r),
            _ => None,
        }
    }
}
