//! Configuration structure
// (c) 2025 Ross Younger

use std::path::PathBuf;

use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

use crate::protocol::DEFAULT_PORT;
use crate::session::DEFAULT_CHUNK_SIZE;
use crate::util::{AddressFamily, TimeFormat};

/// Default local storage directory
pub const DEFAULT_STORAGE_DIR: &str = "./tmp";

/// The set of configurable options supported by netstore-client.
///
/// Every field may be set in a configuration file, in the environment
/// (`NETSTORE_` + the upper-cased field name), or on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// TCP port on the server
    pub port: u16,

    /// Directory that received fragments are written into. Created if absent.
    pub storage_dir: PathBuf,

    /// Size of the bulk receive buffer, in bytes. Each write to storage is at most this long.
    pub chunk_size: usize,

    /// Which IP family to use when resolving the server name
    pub address_family: AddressFamily,

    /// Format of time stamps in log messages
    pub time_format: TimeFormat,
}

impl Configuration {
    /// Hard-wired defaults, the lowest-priority configuration layer
    #[must_use]
    pub fn system_default() -> Self {
        Self {
            port: DEFAULT_PORT,
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            chunk_size: DEFAULT_CHUNK_SIZE,
            address_family: AddressFamily::default(),
            time_format: TimeFormat::default(),
        }
    }

    /// Checks the values make sense together
    pub fn validate(&self) -> Result<()> {
        ensure!(self.port != 0, "The server port must not be 0");
        ensure!(self.chunk_size != 0, "The chunk size must not be 0");
        Ok(())
    }

    /// Field names and their current values, for display
    pub(crate) fn fields(&self) -> [(&'static str, String); 5] {
        [
            ("port", self.port.to_string()),
            ("storage_dir", self.storage_dir.display().to_string()),
            ("chunk_size", self.chunk_size.to_string()),
            ("address_family", self.address_family.to_string()),
            ("time_format", self.time_format.to_string()),
        ]
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::system_default()
    }
}

/// Command-line overrides for [`Configuration`].
///
/// Only the fields given are serialized, so merging this over the other layers
/// replaces just those values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, clap::Args)]
pub struct ConfigurationOverrides {
    /// TCP port on the server [default: 6543]
    #[arg(index = 2, value_name = "PORT")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Directory that received fragments are written into [default: ./tmp]
    #[arg(long, value_name = "DIR", help_heading("Configuration"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,

    /// Size of the receive buffer in bytes [default: 512000]
    #[arg(long, value_name = "BYTES", help_heading("Configuration"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,

    /// Restricts name resolution to a given address family [default: inet]
    #[arg(long, value_name = "FAMILY", help_heading("Configuration"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_family: Option<AddressFamily>,

    /// Format of time stamps in log messages [default: local]
    #[arg(long, value_name = "FORMAT", help_heading("Configuration"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_format: Option<TimeFormat>,
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{Configuration, ConfigurationOverrides};

    #[test]
    fn defaults_are_valid() {
        let cfg = Configuration::system_default();
        cfg.validate().unwrap();
        assert_eq!(cfg.port, 6543);
        assert_eq!(cfg.chunk_size, 512_000);
        assert_eq!(cfg.storage_dir.to_str(), Some("./tmp"));
    }

    #[test]
    fn validate() {
        let mut cfg = Configuration::system_default();
        cfg.chunk_size = 0;
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.to_string(), "The chunk size must not be 0");

        let mut cfg = Configuration::system_default();
        cfg.port = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn overrides_serialize_only_what_is_set() {
        let o = ConfigurationOverrides {
            chunk_size: Some(10),
            ..Default::default()
        };
        let j = serde_json::to_string(&o).unwrap();
        assert_eq!(j, r#"{"chunk_size":10}"#);
    }
}
