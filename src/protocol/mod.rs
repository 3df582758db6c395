// (c) 2025 Ross Younger

//! # 📖 The netstore wire protocol
//!
//! A session is a single TCP connection carrying exactly two request/response pairs,
//! strictly in this order:
//!
//! 1. **Listing.** The client sends a list request; the server answers with a
//!    [`ServerMessage`] whose `param` is the byte length of a `|`-separated list of file names,
//!    followed by the list itself.
//! 2. **Fragment.** The client sends a [`FragmentRequest`] naming a file and a byte range;
//!    the server answers with a [`ServerMessage`] whose `param` is the byte length of the
//!    fragment body, followed by the body.
//!
//! At either step the server may instead answer with a refusal, whose `param` is a [`Refusal`] code.
//!
//! ## On-wire layout
//!
//! All multi-byte integers are in network byte order (big endian).
//!
//! | Message | Layout |
//! |---|---|
//! | List request | `u16 type=1` |
//! | Fragment request | `u16 type=2`, `u32 start_addr`, `u32 bytes_to_send`, `u16 name_len`, then `name_len` raw name bytes |
//! | Server response header | `u16 type`, `u32 param` |
//!
//! In a server response header, `type=1` announces a name list, `type=2` is a refusal,
//! and anything else announces a fragment body.
//!
//! There is no message framing beyond the length fields; the stream gives no delivery-boundary
//! guarantees, so every receive is a loop until the declared number of bytes has arrived
//! (see [`crate::util::io`]).

pub mod common;
mod file_name;
pub use file_name::FileName;
pub mod message;
pub use message::{
    FragmentRequest, MessageKind, ServerMessage, encode_fragment_request, encode_list_request,
};
mod refusal;
pub use refusal::Refusal;

#[cfg(test)]
pub(crate) mod test_helpers;

/// Default server port
pub const DEFAULT_PORT: u16 = 6543;
