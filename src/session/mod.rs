//! Session driver
//!
//! A session owns the channel to one server and walks it through exactly one listing
//! exchange and one fragment exchange:
//!
//! ```text
//! Connecting -> ListingRequested -> ListingReceived -> SelectionMade
//!            -> FragmentRequested -> FragmentReceived -> Closed
//! ```
//!
//! A refusal from the server in either request phase moves the session to `Refused`.
//! The channel is closed exactly once, whatever the outcome.
// (c) 2025 Ross Younger

mod common;
mod fragment;
mod listing;

pub use fragment::{DEFAULT_CHUNK_SIZE, FragmentReport};
pub use listing::{FileListing, SEPARATOR};

use indicatif::ProgressBar;
use tokio::io::AsyncWriteExt as _;
use tracing::{debug, trace, warn};

use crate::error::{ClientError, IoContext as _, Result};
use crate::protocol::{
    FileName, Refusal,
    common::{ReceivingStream, SendReceivePair, SendingStream},
};
use crate::storage::FragmentStore;

/// Where a session has got to
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum SessionState {
    /// The channel is open; nothing has been sent
    Connecting,
    /// The list request has been sent
    ListingRequested,
    /// The file listing has been received
    ListingReceived,
    /// A file and byte range have been chosen
    SelectionMade,
    /// The fragment request has been sent
    FragmentRequested,
    /// The fragment body has been stored
    FragmentReceived,
    /// The server refused a request
    Refused,
    /// The channel has been closed
    Closed,
}

/// Which request a refusal applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    /// The listing request
    Listing,
    /// The fragment request
    Fragment,
}

/// How a session ended, short of a fault
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The fragment was transferred
    Completed(FragmentReport),
    /// The server declined a request
    Refused {
        /// The request that was declined
        phase: Phase,
        /// Why
        refusal: Refusal,
    },
}

/// The caller's choice of file and byte range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserCommand {
    /// Position of the file in the listing
    pub file_id: i64,
    /// First byte to fetch
    pub start_addr: u32,
    /// One past the last byte to fetch
    pub end_addr: u32,
}

impl UserCommand {
    /// The number of bytes this command asks for.
    ///
    /// Fails with [`ClientError::InvalidRange`] if `end_addr < start_addr`.
    pub fn length(&self) -> Result<u32> {
        self.end_addr
            .checked_sub(self.start_addr)
            .ok_or(ClientError::InvalidRange {
                start: self.start_addr,
                end: self.end_addr,
            })
    }
}

/// A [`UserCommand`] resolved against a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Remote file name
    pub name: FileName,
    /// First byte to fetch
    pub start: u32,
    /// Number of bytes to fetch
    pub length: u32,
}

/// One client session over one channel
#[derive(Debug)]
pub struct Session<S: SendingStream, R: ReceivingStream> {
    stream: SendReceivePair<S, R>,
    state: SessionState,
    /// Bulk transfer buffer, reused for every chunk of the fragment body
    chunk: Vec<u8>,
}

impl<S: SendingStream, R: ReceivingStream> Session<S, R> {
    /// Constructor. `chunk_size` bounds each read (and each storage write) of the fragment body.
    #[must_use]
    pub fn new(stream: SendReceivePair<S, R>, chunk_size: usize) -> Self {
        Self {
            stream,
            state: SessionState::Connecting,
            chunk: vec![0u8; chunk_size.max(1)],
        }
    }

    /// Accessor
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    fn expect(&self, expected: SessionState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ClientError::OutOfSequence {
                expected,
                actual: self.state,
            })
        }
    }

    fn transition(&mut self, to: SessionState) {
        trace!("{} -> {to}", self.state);
        self.state = to;
    }

    /// Records a refusal in the session state
    fn track<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(ClientError::Refused(_)) = result {
            self.transition(SessionState::Refused);
        }
        result
    }

    /// Sends the list request and receives the listing.
    pub async fn request_listing(&mut self) -> Result<FileListing> {
        self.expect(SessionState::Connecting)?;
        self.transition(SessionState::ListingRequested);
        let result = listing::request_listing(&mut self.stream).await;
        let listing = self.track(result)?;
        debug!("received listing of {} files", listing.len());
        self.transition(SessionState::ListingReceived);
        Ok(listing)
    }

    /// Resolves a command against the listing.
    ///
    /// The listing is consumed; it is not needed once the name is known.
    pub fn select(&mut self, listing: FileListing, command: &UserCommand) -> Result<Selection> {
        self.expect(SessionState::ListingReceived)?;
        let length = command.length()?;
        let name = listing.resolve_name(command.file_id)?.clone();
        self.transition(SessionState::SelectionMade);
        Ok(Selection {
            name,
            start: command.start_addr,
            length,
        })
    }

    /// Sends the fragment request and stores the fragment body.
    pub async fn request_fragment<T: FragmentStore>(
        &mut self,
        selection: &Selection,
        store: &T,
        progress: &ProgressBar,
    ) -> Result<FragmentReport> {
        self.expect(SessionState::SelectionMade)?;
        self.transition(SessionState::FragmentRequested);
        let result = fragment::request_fragment(
            &mut self.stream,
            &selection.name,
            selection.start,
            selection.length,
            store,
            &mut self.chunk,
            progress,
        )
        .await;
        let report = self.track(result)?;
        self.transition(SessionState::FragmentReceived);
        Ok(report)
    }

    /// Shuts down the channel. Subsequent calls do nothing.
    pub async fn close(&mut self) -> Result<()> {
        if self.state == SessionState::Closed {
            return Ok(());
        }
        self.transition(SessionState::Closed);
        self.stream
            .send
            .shutdown()
            .await
            .io_context("closing connection")
    }

    /// Runs the whole session.
    ///
    /// `select` is shown the listing and returns the caller's choice.
    /// The channel is closed before this function returns, whatever happened.
    /// By then the outcome is settled, so a failure to close is only logged.
    pub async fn run<T, F, E>(
        mut self,
        store: &T,
        progress: &ProgressBar,
        select: F,
    ) -> Result<Outcome, E>
    where
        T: FragmentStore,
        F: AsyncFnOnce(&FileListing) -> Result<UserCommand, E>,
        E: From<ClientError>,
    {
        let result = self.run_inner(store, progress, select).await;
        if let Err(e) = self.close().await {
            warn!("{e}");
        }
        result
    }

    async fn run_inner<T, F, E>(
        &mut self,
        store: &T,
        progress: &ProgressBar,
        select: F,
    ) -> Result<Outcome, E>
    where
        T: FragmentStore,
        F: AsyncFnOnce(&FileListing) -> Result<UserCommand, E>,
        E: From<ClientError>,
    {
        let listing = match self.request_listing().await {
            Ok(listing) => listing,
            Err(ClientError::Refused(refusal)) => {
                return Ok(Outcome::Refused {
                    phase: Phase::Listing,
                    refusal,
                });
            }
            Err(e) => return Err(e.into()),
        };
        let command = select(&listing).await?;
        let selection = self.select(listing, &command)?;
        match self.request_fragment(&selection, store, progress).await {
            Ok(report) => Ok(Outcome::Completed(report)),
            Err(ClientError::Refused(refusal)) => Ok(Outcome::Refused {
                phase: Phase::Fragment,
                refusal,
            }),
            Err(e) => Err(e.into()),
        }
    }
}
