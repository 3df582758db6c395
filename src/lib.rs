// (c) 2025 Ross Younger

#![allow(clippy::doc_markdown)]
//! `netstore-client` fetches byte ranges of files from a netstore file server.
//!
//! ## Overview
//!
//! A session over one TCP connection runs like this:
//!
//! 1. The client asks for the server's file listing and prints it, one `<id>.<name>` line per file.
//! 1. The user picks a file id and a byte range `[start, end)`, on the command line or at a prompt.
//! 1. The client asks for that fragment of the file.
//! 1. The fragment is written into a local file of the same name, at the same offset.
//!    The local file is created if necessary; bytes outside the range are left alone.
//!
//! The server may refuse either request. A refusal is reported as
//! `file transfer: <reason>` and is not treated as a failure.
//!
//! ## 📖 Documentation
//!
//! * [The wire protocol](protocol)
//! * [Configuration](config)
//!
//! ## Getting started
//!
//! ```text
//! netstore-client files.example.com            # port 6543, prompts for a selection
//! netstore-client files.example.com 7000 --file-id 1 --start 0 --end 4096
//! ```
//!
//! Fragments are stored in `./tmp` unless configured otherwise.
//!
//! ## Using the library
//!
//! The protocol core does not depend on the command line. [`session::Session`] runs over any
//! [`SendReceivePair`](protocol::common::SendReceivePair) and writes through any
//! [`FragmentStore`](storage::FragmentStore).
//!
//! #### MSRV policy
//!
//! As this is an application crate, the MSRV is not guaranteed to remain stable.

mod cli;
pub use cli::cli as main;

pub mod client;
pub use client::Parameters;

pub mod config;
pub use config::Configuration;

mod error;
pub use error::{ClientError, Result};

pub mod protocol;
pub mod session;
pub mod storage;
pub mod util;
