//! Command line argument definition
// (c) 2025 Ross Younger

use std::ffi::OsString;

use clap::Parser;

use crate::{client::Parameters, config::ConfigurationOverrides};

/// Fetches a byte range of one file from a netstore server.
///
/// The client asks the server for its file listing and prints it, then asks for
/// a fragment of one of the files and writes it at the same offset into a local file
/// of the same name.
///
/// Unless `--file-id`, `--start` and `--end` are all given, the file id and byte range
/// are read from standard input.
#[derive(Debug, Parser, Clone, Default)]
#[command(author, version, about, long_about, styles = super::styles::CLAP_STYLES)]
pub(crate) struct CliArgs {
    /// Server host name or address
    #[arg(
        index = 1,
        value_name = "HOST",
        required_unless_present_any(["show_config", "config_files"])
    )]
    pub(crate) host: Option<String>,

    /// Outputs the configuration, then exits.
    #[arg(long, help_heading("Configuration"), display_order(0))]
    pub(crate) show_config: bool,

    /// Outputs the paths to configuration file(s), then exits.
    #[arg(long, help_heading("Configuration"), display_order(0))]
    pub(crate) config_files: bool,

    // CLIENT-ONLY OPTIONS =================================================================
    #[command(flatten)]
    pub(crate) client_params: Parameters,

    // CONFIGURABLE OPTIONS ================================================================
    #[command(flatten)]
    pub(crate) config: ConfigurationOverrides,
}

/// What the user asked us to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MainMode {
    Client,
    ShowConfig,
    ShowConfigFiles,
}

impl From<&CliArgs> for MainMode {
    fn from(args: &CliArgs) -> Self {
        if args.config_files {
            MainMode::ShowConfigFiles
        } else if args.show_config {
            MainMode::ShowConfig
        } else {
            MainMode::Client
        }
    }
}

impl CliArgs {
    /// Sets up and executes our parser
    pub(crate) fn custom_parse<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        CliArgs::try_parse_from(args)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{CliArgs, MainMode};
    use crate::util::AddressFamily;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::custom_parse(args).unwrap()
    }

    #[test]
    fn host_and_port() {
        let args = parse(&["netstore-client", "files.example", "7000"]);
        assert_eq!(args.host.as_deref(), Some("files.example"));
        assert_eq!(args.config.port, Some(7000));
        assert_eq!(MainMode::from(&args), MainMode::Client);
    }

    #[test]
    fn port_is_optional() {
        let args = parse(&["netstore-client", "files.example"]);
        assert_eq!(args.config.port, None);
    }

    #[test]
    fn host_required_for_transfer() {
        let _ = CliArgs::custom_parse(["netstore-client"]).unwrap_err();
    }

    #[test]
    fn info_modes_need_no_host() {
        let args = parse(&["netstore-client", "--show-config"]);
        assert_eq!(MainMode::from(&args), MainMode::ShowConfig);
        let args = parse(&["netstore-client", "--config-files"]);
        assert_eq!(MainMode::from(&args), MainMode::ShowConfigFiles);
    }

    #[test]
    fn configuration_options() {
        let args = parse(&[
            "netstore-client",
            "--storage-dir",
            "/srv/out",
            "--chunk-size",
            "4096",
            "--address-family",
            "6",
            "--time-format",
            "utc",
            "host",
        ]);
        assert_eq!(
            args.config.storage_dir.as_deref(),
            Some(std::path::Path::new("/srv/out"))
        );
        assert_eq!(args.config.chunk_size, Some(4096));
        assert_eq!(args.config.address_family, Some(AddressFamily::Inet6));
        assert_eq!(
            args.config.time_format,
            Some(crate::util::TimeFormat::Utc)
        );
    }

    #[test]
    fn selection_options() {
        let args = parse(&[
            "netstore-client",
            "host",
            "--file-id",
            "2",
            "--start",
            "0",
            "--end",
            "100",
        ]);
        let cmd = args.client_params.command().unwrap();
        assert_eq!(cmd.file_id, 2);
        assert_eq!(cmd.end_addr, 100);
    }

    #[test]
    fn bad_port() {
        let _ = CliArgs::custom_parse(["netstore-client", "host", "70000"]).unwrap_err();
        let _ = CliArgs::custom_parse(["netstore-client", "host", "http"]).unwrap_err();
    }
}
