//! Main client mode event loop
// (c) 2025 Ross Younger

use std::io::Write as _;
use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};
use human_repr::{HumanCount as _, HumanDuration as _, HumanThroughput as _};
use indicatif::{MultiProgress, ProgressBar};
use tokio::{io::BufReader, net::TcpStream};
use tracing::{debug, info, trace_span};

use super::Parameters;
use super::progress::progress_style;
use super::prompt::read_user_command;
use crate::cli::styles::{INFO, RESET};
use crate::config::Configuration;
use crate::protocol::common::StreamPair;
use crate::session::{FileListing, FragmentReport, Outcome, Session, UserCommand};
use crate::storage::LocalStore;
use crate::util::resolve_endpoint;

/// Main client mode event loop
///
/// # Return value
/// `true` if the session ran to an expected end (a completed transfer, or a refusal
/// from the server, which is reported on stdout).
///
// Caution: While the progress bar is visible, anything to be printed to console should use display.println() !
#[allow(clippy::module_name_repetitions)]
pub async fn client_main(
    config: &Configuration,
    display: MultiProgress,
    host: &str,
    parameters: Parameters,
) -> Result<bool> {
    let _guard = trace_span!("CLIENT").entered();

    let address = resolve_endpoint(host, config.port, config.address_family).await?;
    debug!("connecting to {address}");
    let stream = TcpStream::connect(address)
        .await
        .with_context(|| format!("connecting to {host} ({address})"))?;
    let session = Session::new(StreamPair::from(stream), config.chunk_size);

    let store = LocalStore::new(&config.storage_dir);
    debug!("storing fragments under {}", store.directory().display());
    // The bar stays off-screen until a selection has been made, so it doesn't disturb the prompt.
    let progress = ProgressBar::hidden();
    let preset = parameters.command();
    let quiet = parameters.quiet;
    let started = Instant::now();

    let outcome = session
        .run(&store, &progress, async |listing: &FileListing| {
            show_listing(listing)?;
            let command = match preset {
                Some(command) => command,
                None => prompt(quiet).await?,
            };
            if !quiet {
                let bar = display.add(progress.clone());
                bar.set_style(progress_style()?);
                bar.set_message(
                    listing
                        .names()
                        .get(usize::try_from(command.file_id).unwrap_or(usize::MAX))
                        .map(ToString::to_string)
                        .unwrap_or_default(),
                );
            }
            Ok::<UserCommand, anyhow::Error>(command)
        })
        .await;
    progress.finish_and_clear();

    match outcome? {
        Outcome::Completed(report) => {
            summarise(&report, &store, started.elapsed());
            Ok(true)
        }
        Outcome::Refused { phase, refusal } => {
            debug!("{phase} request refused (reason code {})", refusal.code());
            anstream::println!("file transfer: {refusal}");
            Ok(true)
        }
    }
}

/// Prints the listing, one `<id>.<name>` line per entry
fn show_listing(listing: &FileListing) -> Result<()> {
    let mut stdout = anstream::stdout().lock();
    write!(stdout, "{listing}")?;
    stdout.flush()?;
    Ok(())
}

async fn prompt(quiet: bool) -> Result<UserCommand> {
    if !quiet {
        anstream::eprintln!("{INFO}Enter file id, start address and end address:{RESET}");
    }
    let mut stdin = BufReader::new(tokio::io::stdin());
    read_user_command(&mut stdin).await
}

fn summarise(report: &FragmentReport, store: &LocalStore, elapsed: Duration) {
    let destination = store
        .path_for(&report.name)
        .map_or_else(|_| report.name.to_string(), |p| p.display().to_string());
    #[allow(clippy::cast_precision_loss)]
    let rate = report.received as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
    info!(
        "stored {} of {} at offset {} into {destination} in {} ({})",
        report.received.human_count_bytes(),
        report.name,
        report.start,
        elapsed.human_duration(),
        rate.human_throughput_bytes(),
    );
}
