//! Main CLI for netstore-client
// (c) 2025 Ross Younger

use std::ffi::OsString;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use indicatif::{MultiProgress, ProgressDrawTarget};

use super::args::{CliArgs, MainMode};
use super::styles::{ERROR, RESET, autodetect_colour};
use crate::{
    client::{MAX_UPDATE_FPS, Parameters, client_main},
    config::{Configuration, Manager},
    util::{ConsoleSink, setup_tracing, trace_level},
};

/// Main CLI entrypoint
///
/// Call this from `main`, passing the arguments to use.
/// Normally you will call `cli(std::env::args_os())` but you can pass in alternate arguments for CLI testing.
///
/// A refusal from the server is an expected outcome; it is reported on stdout and exits successfully.
/// Every other failure is reported on stderr and exits with failure.
///
/// # Note
/// This function starts a tokio runtime and performs work in it, so it must not be called from within one.
#[must_use]
pub fn cli<I, T>(args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    #[allow(clippy::match_bool)] // improved readability
    cli_inner(args)
        .inspect_err(|e| {
            if crate::util::tracing_is_initialised() {
                tracing::error!("{e:#}");
            } else {
                anstream::eprintln!("{ERROR}Error:{RESET} {e:#}");
            }
        })
        .map_or(ExitCode::FAILURE, |success| match success {
            true => ExitCode::SUCCESS,
            false => ExitCode::FAILURE,
        })
}

/// Inner CLI logic
///
/// # Return
/// true indicates success. false indicates a failure where the callee has output to stderr.
fn cli_inner<I, T>(args: I) -> Result<bool>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let Some(args) = parse_args(args)? else {
        return Ok(true); // help/version shown; exit
    };
    let mode = MainMode::from(&args);

    let mut config_manager = Manager::standard();
    config_manager.merge_provider(args.config.clone());

    handle_mode(mode, &config_manager, args)
}

fn parse_args<I, T>(args: I) -> Result<Option<CliArgs>>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    use clap::error::ErrorKind::{DisplayHelp, DisplayVersion};
    match CliArgs::custom_parse(args) {
        Ok(args) => Ok(Some(args)),
        Err(e) if matches!(e.kind(), DisplayHelp | DisplayVersion) => {
            anstream::print!("{}", e.render().ansi());
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

// MODE HANDLERS ///////////////////////////////////////////////////////////

fn handle_mode(mode: MainMode, config_manager: &Manager, args: CliArgs) -> Result<bool> {
    match mode {
        MainMode::ShowConfigFiles => {
            for f in Manager::config_files() {
                anstream::println!("{f}");
            }
            Ok(true)
        }
        MainMode::ShowConfig => {
            anstream::print!(
                "Client configuration:\n{}",
                config_manager.describe()?
            );
            Ok(true)
        }
        MainMode::Client => {
            let config = config_manager
                .get()
                .context("assembling client configuration")?;
            // The parser guarantees a host in this mode
            let host = args.host.unwrap_or_default();
            run_client(&config, &host, args.client_params)
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn run_client(config: &Configuration, host: &str, parameters: Parameters) -> Result<bool> {
    let display =
        MultiProgress::with_draw_target(ProgressDrawTarget::stderr_with_hz(MAX_UPDATE_FPS));
    // Quiet mode shows no progress bar, so log lines can go straight to stderr
    let console = if parameters.quiet {
        ConsoleSink::Stderr
    } else {
        ConsoleSink::Progress(display.clone())
    };
    setup_tracing(
        trace_level(&parameters),
        console,
        parameters.log_file.as_deref(),
        config.time_format,
        autodetect_colour(),
    )?; // to provoke error: set RUST_LOG=.

    client_main(config, display, host, parameters).await
}

#[cfg(test)]
mod tests {
    use std::process::ExitCode;

    use super::cli;

    #[test]
    fn help_and_version_succeed() {
        assert_eq!(cli(["netstore-client", "--help"]), ExitCode::SUCCESS);
        assert_eq!(cli(["netstore-client", "--version"]), ExitCode::SUCCESS);
    }

    #[test]
    fn bad_arguments_fail() {
        assert_eq!(cli(["netstore-client"]), ExitCode::FAILURE);
        assert_eq!(
            cli(["netstore-client", "--no-such-option", "host"]),
            ExitCode::FAILURE
        );
    }

    #[test]
    fn config_files_mode() {
        assert_eq!(
            cli(["netstore-client", "--config-files"]),
            ExitCode::SUCCESS
        );
    }

    #[test]
    fn invalid_configuration_fails() {
        assert_eq!(
            cli(["netstore-client", "--chunk-size", "0", "--show-config"]),
            ExitCode::FAILURE
        );
    }
}
