//! Wire message encoding and decoding
// (c) 2025 Ross Younger

use bytes::{Buf as _, BufMut as _, Bytes, BytesMut};

use crate::error::{ClientError, Result};

/// Message tag for a files-names (listing) request
pub const FILES_NAMES_REQUEST: u16 = 1;
/// Message tag for a file fragment request
pub const FILE_FRAGMENT_REQUEST: u16 = 2;

/// Server message tag announcing a file name list
pub const FILES_NAMES_RESPONSE: u16 = 1;
/// Server message tag announcing a refusal
pub const SERVER_REFUSAL: u16 = 2;

const LIST_REQUEST: [u8; 2] = FILES_NAMES_REQUEST.to_be_bytes();

/// Encodes a listing request.
///
/// This is a bare `u16` message tag.
#[must_use]
pub fn encode_list_request() -> Bytes {
    Bytes::from_static(&LIST_REQUEST)
}

/// Header of a fragment request.
///
/// On the wire this is immediately followed by `file_name_len` raw bytes of the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentRequest {
    /// Offset of the first byte requested
    pub start_addr: u32,
    /// Number of bytes requested
    pub bytes_to_send: u32,
    /// Length of the file name that follows
    pub file_name_len: u16,
}

impl FragmentRequest {
    /// The on-wire size of the fixed part of this message, including the message tag
    pub const HEADER_SIZE: usize = 12;
}

/// Encodes a fragment request for `length` bytes of `name` starting at `start`.
///
/// Fails with [`ClientError::NameTooLong`] if the name does not fit the 16-bit length field.
pub fn encode_fragment_request(start: u32, length: u32, name: &[u8]) -> Result<Bytes> {
    let file_name_len =
        u16::try_from(name.len()).map_err(|_| ClientError::NameTooLong(name.len()))?;
    let mut buf = BytesMut::with_capacity(FragmentRequest::HEADER_SIZE + name.len());
    buf.put_u16(FILE_FRAGMENT_REQUEST);
    buf.put_u32(start);
    buf.put_u32(length);
    buf.put_u16(file_name_len);
    buf.put_slice(name);
    Ok(buf.freeze())
}

/// Decodes the fixed part of a fragment request (as a server would).
///
/// Returns `None` if the buffer is too short or does not carry the fragment request tag.
#[must_use]
pub fn decode_fragment_request(raw: &[u8]) -> Option<FragmentRequest> {
    if raw.len() < FragmentRequest::HEADER_SIZE {
        return None;
    }
    let mut buf = raw;
    if buf.get_u16() != FILE_FRAGMENT_REQUEST {
        return None;
    }
    Some(FragmentRequest {
        start_addr: buf.get_u32(),
        bytes_to_send: buf.get_u32(),
        file_name_len: buf.get_u16(),
    })
}

/// How to interpret a [`ServerMessage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum MessageKind {
    /// `param` is the byte length of the file name list that follows
    FileList,
    /// `param` is a refusal reason code
    Refusal,
    /// `param` is the byte length of the fragment body that follows
    Fragment,
}

/// Response header sent by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerMessage {
    /// Message tag
    pub msg_type: u16,
    /// Tag-dependent parameter
    pub param: u32,
}

impl ServerMessage {
    /// The on-wire size of this struct
    pub const SIZE: usize = 6;

    /// Decodes a server message from network byte order
    #[must_use]
    pub fn decode(raw: &[u8; Self::SIZE]) -> Self {
        let mut buf = &raw[..];
        Self {
            msg_type: buf.get_u16(),
            param: buf.get_u32(),
        }
    }

    /// Encodes this message into network byte order
    #[must_use]
    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        let mut buf = &mut out[..];
        buf.put_u16(self.msg_type);
        buf.put_u32(self.param);
        out
    }

    /// Classifies this message.
    ///
    /// The tag values overlap between the two response phases; a refusal is always tag 2,
    /// and anything that is neither a file list nor a refusal announces a fragment body.
    #[must_use]
    pub fn kind(&self) -> MessageKind {
        match self.msg_type {
            FILES_NAMES_RESPONSE => MessageKind::FileList,
            SERVER_REFUSAL => MessageKind::Refusal,
            _ => MessageKind::Fragment,
        }
    }
}
