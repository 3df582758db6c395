// (c) 2025 Ross Younger

//! Stream types shared by the listing and fragment exchanges
//!
//! The protocol runs over a single duplex byte stream. We keep the two directions apart
//! as a [`SendReceivePair`], so that the sending half can be shut down independently
//! and tests can substitute in-memory plumbing for a socket.

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

/// Marker trait for streams used for sending data
pub trait SendingStream: AsyncWrite + Send + Unpin {}
impl SendingStream for OwnedWriteHalf {}

#[cfg(test)]
impl SendingStream for tokio_test::io::Mock {}

/// Marker trait for streams used for receiving data
pub trait ReceivingStream: AsyncRead + Send + Unpin {}
impl ReceivingStream for OwnedReadHalf {}

#[cfg(test)]
impl ReceivingStream for tokio_test::io::Mock {}

/// Syntactic sugar helper type
#[derive(Debug)]
pub struct SendReceivePair<S: SendingStream, R: ReceivingStream> {
    /// outbound data
    pub send: S,
    /// inbound data
    pub recv: R,
}

impl<S: SendingStream, R: ReceivingStream> From<(S, R)> for SendReceivePair<S, R> {
    fn from(value: (S, R)) -> Self {
        Self {
            send: value.0,
            recv: value.1,
        }
    }
}

/// The channel type used in production: the two halves of a TCP connection
pub type StreamPair = SendReceivePair<OwnedWriteHalf, OwnedReadHalf>;

impl From<tokio::net::TcpStream> for StreamPair {
    fn from(stream: tokio::net::TcpStream) -> Self {
        let (recv, send) = stream.into_split();
        Self { send, recv }
    }
}
