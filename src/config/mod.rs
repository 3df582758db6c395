// (c) 2025 Ross Younger
//! # Configuration
//!
//! Every option has a hard-wired default, which may be replaced (in increasing order of priority) by
//! the system configuration file, the user configuration file, environment variables, and finally the
//! command line.
//!
//! Configuration files are TOML:
//!
//! ```toml
//! port = 6543
//! storage_dir = "/srv/fragments"
//! chunk_size = 65536
//! address_family = "inet"
//! time_format = "utc"
//! ```
//!
//! Environment variables take the field name in upper case with a `NETSTORE_` prefix,
//! e.g. `NETSTORE_STORAGE_DIR=/srv/fragments`.
//!
//! Run `netstore-client --config-files` to see where the files live on your platform,
//! and `netstore-client --show-config` to see the merged result.

mod manager;
mod structure;

pub use manager::{ENV_PREFIX, Manager};
pub use structure::{Configuration, ConfigurationOverrides, DEFAULT_STORAGE_DIR};
