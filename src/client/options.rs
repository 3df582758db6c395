//! Options specific to client mode
// (c) 2025 Ross Younger

use clap::Parser;

use crate::session::UserCommand;

#[derive(Debug, Parser, Clone, Default, PartialEq, Eq)]
/// Client-side options which may be provided on the command line, but are not persistent configuration options.
pub struct Parameters {
    /// Enable detailed debug output
    ///
    /// This has the same effect as setting `RUST_LOG=netstore_client=debug` in the environment.
    /// If present, `RUST_LOG` overrides this option.
    #[arg(short, long, action, help_heading("Debug"), display_order(0))]
    pub debug: bool,

    /// Log to a file
    ///
    /// By default the log receives everything printed to stderr.
    /// To override this behaviour, set the environment variable `RUST_LOG_FILE_DETAIL` (same semantics as `RUST_LOG`).
    #[arg(
        short('l'),
        long,
        action,
        value_name("FILE"),
        help_heading("Output"),
        next_line_help(true),
        display_order(0)
    )]
    pub log_file: Option<String>,

    /// Quiet mode
    ///
    /// Switches off the progress display; reports only errors
    #[arg(short, long, action, conflicts_with("debug"), help_heading("Output"))]
    pub quiet: bool,

    /// Position of the file to fetch, as shown in the listing.
    ///
    /// If `--file-id`, `--start` and `--end` are all given, the client does not prompt.
    #[arg(
        long,
        value_name("ID"),
        allow_hyphen_values(true),
        requires_all(["start", "end"]),
        help_heading("Selection")
    )]
    pub file_id: Option<i64>,

    /// First byte of the fragment
    #[arg(
        long,
        value_name("ADDR"),
        requires_all(["file_id", "end"]),
        help_heading("Selection")
    )]
    pub start: Option<u32>,

    /// One past the last byte of the fragment
    #[arg(
        long,
        value_name("ADDR"),
        requires_all(["file_id", "start"]),
        help_heading("Selection")
    )]
    pub end: Option<u32>,
}

impl Parameters {
    /// The selection given on the command line, if complete
    #[must_use]
    pub fn command(&self) -> Option<UserCommand> {
        Some(UserCommand {
            file_id: self.file_id?,
            start_addr: self.start?,
            end_addr: self.end?,
        })
    }
}

#[cfg(test)]
mod test {
    use clap::Parser as _;
    use pretty_assertions::assert_eq;

    use super::Parameters;
    use crate::session::UserCommand;

    #[test]
    fn no_selection() {
        let p = Parameters::try_parse_from(["test", "-d"]).unwrap();
        assert!(p.debug);
        assert_eq!(p.command(), None);
    }

    #[test]
    fn full_selection() {
        let p = Parameters::try_parse_from([
            "test",
            "--file-id",
            "1",
            "--start",
            "10",
            "--end",
            "20",
        ])
        .unwrap();
        assert_eq!(
            p.command(),
            Some(UserCommand {
                file_id: 1,
                start_addr: 10,
                end_addr: 20
            })
        );
    }

    #[test]
    fn negative_file_id_parses() {
        let p =
            Parameters::try_parse_from(["test", "--file-id", "-1", "--start", "0", "--end", "1"])
                .unwrap();
        assert_eq!(p.file_id, Some(-1));
    }

    #[test]
    fn partial_selection_rejected() {
        let _ = Parameters::try_parse_from(["test", "--file-id", "1"]).unwrap_err();
        let _ = Parameters::try_parse_from(["test", "--start", "1", "--end", "2"]).unwrap_err();
    }

    #[test]
    fn quiet_conflicts_with_debug() {
        let _ = Parameters::try_parse_from(["test", "-q", "-d"]).unwrap_err();
    }
}
