//! Log output to the console and an optional log file
// (c) 2025 Ross Younger

use std::{
    fs::File,
    io::Write,
    sync::atomic::{AtomicBool, Ordering},
    sync::{Arc, Mutex},
};

use anyhow::Context as _;
use indicatif::MultiProgress;
use serde::{Deserialize, Serialize, de};
use strum::VariantNames as _;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    filter::LevelFilter,
    fmt::{
        MakeWriter,
        time::{ChronoLocal, ChronoUtc},
    },
    prelude::*,
};

use crate::cli::styles::maybe_strip_color;
use crate::client::Parameters;

static INSTALLED: AtomicBool = AtomicBool::new(false);

const LOCAL_STAMP: &str = "%Y-%m-%d %H:%M:%SL";
const UTC_STAMP: &str = "%Y-%m-%d %H:%M:%SZ";

/// Filter directives for the console
const CONSOLE_FILTER_VAR: &str = "RUST_LOG";
/// Filter directives for the log file; falls back to [`CONSOLE_FILTER_VAR`]
const FILE_FILTER_VAR: &str = "RUST_LOG_FILE_DETAIL";

/// How much of our own logging to show when no filter is set in the environment
pub(crate) fn trace_level(args: &Parameters) -> LevelFilter {
    match (args.debug, args.quiet) {
        (true, _) => LevelFilter::DEBUG,
        (false, true) => LevelFilter::ERROR,
        (false, false) => LevelFilter::INFO,
    }
}

/// Selects the format of time stamps in output messages
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Eq,
    PartialEq,
    strum::Display,
    strum::EnumString,
    strum::VariantNames,
    clap::ValueEnum,
    Serialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "kebab-case")]
pub enum TimeFormat {
    /// Local time, as "year-month-day HH:MM:SS"
    #[default]
    Local,
    /// UTC time, as "year-month-day HH:MM:SS"
    Utc,
    /// Local time, in the format described in [RFC 3339](https://datatracker.ietf.org/doc/html/rfc3339).
    Rfc3339,
}

impl<'de> Deserialize<'de> for TimeFormat {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.to_ascii_lowercase()
            .parse()
            .map_err(|_| de::Error::unknown_variant(&s, TimeFormat::VARIANTS))
    }
}

/// Where console log lines go
#[derive(Debug)]
pub(crate) enum ConsoleSink {
    /// Straight to stderr, when there is no progress display
    Stderr,
    /// Through the progress display, so lines don't tear through the bar
    Progress(MultiProgress),
}

/// An event filter, and whether it came from the environment
struct Selected {
    filter: EnvFilter,
    from_env: bool,
}

/// Uses the first of `vars` that is set; otherwise shows only our own events at `level`.
fn choose_filter(vars: &[&str], level: LevelFilter) -> anyhow::Result<Selected> {
    for var in vars {
        if let Ok(directives) = std::env::var(var) {
            let filter = EnvFilter::try_new(&directives)
                .with_context(|| format!("{var} (set in environment) was not understood"))?;
            return Ok(Selected {
                filter,
                from_env: true,
            });
        }
    }
    Ok(Selected {
        filter: EnvFilter::new(format!("{}={level}", env!("CARGO_CRATE_NAME"))),
        from_env: false,
    })
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn fmt_layer<W>(writer: W, selected: Selected, time_format: TimeFormat, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    // Event targets only mean something when the filter can name other crates
    let base = tracing_subscriber::fmt::layer::<Registry>()
        .compact()
        .with_target(selected.from_env)
        .with_ansi(ansi)
        .with_writer(writer);
    match time_format {
        TimeFormat::Local => base
            .with_timer(ChronoLocal::new(LOCAL_STAMP.into()))
            .with_filter(selected.filter)
            .boxed(),
        TimeFormat::Utc => base
            .with_timer(ChronoUtc::new(UTC_STAMP.into()))
            .with_filter(selected.filter)
            .boxed(),
        TimeFormat::Rfc3339 => base
            .with_timer(ChronoLocal::rfc_3339())
            .with_filter(selected.filter)
            .boxed(),
    }
}

fn build_layers(
    level: LevelFilter,
    console: ConsoleSink,
    log_file: Option<&str>,
    time_format: TimeFormat,
    ansi: bool,
) -> anyhow::Result<Vec<BoxedLayer>> {
    let selected = choose_filter(&[CONSOLE_FILTER_VAR], level)?;
    let console_layer = match console {
        ConsoleSink::Stderr => fmt_layer(std::io::stderr, selected, time_format, ansi),
        ConsoleSink::Progress(display) => fmt_layer(
            Mutex::new(ProgressLines { display, ansi }),
            selected,
            time_format,
            ansi,
        ),
    };
    let mut layers = vec![console_layer];

    if let Some(path) = log_file {
        let file = File::create(path).with_context(|| format!("opening log file {path}"))?;
        let selected = choose_filter(&[FILE_FILTER_VAR, CONSOLE_FILTER_VAR], level)?;
        layers.push(fmt_layer(Arc::new(file), selected, time_format, false));
    }
    Ok(layers)
}

/// Installs the global subscriber.
///
/// By default only this crate's events are shown, at `level`.
/// `RUST_LOG` overrides the console filter; `RUST_LOG_FILE_DETAIL`, if set, overrides it for the log file.
///
/// If this fails nothing is installed, and the caller must report the error itself.
/// A second call in the same process logs a warning and does nothing.
pub(crate) fn setup(
    level: LevelFilter,
    console: ConsoleSink,
    log_file: Option<&str>,
    time_format: TimeFormat,
    ansi: bool,
) -> anyhow::Result<()> {
    if is_initialized() {
        tracing::warn!("tracing setup requested a second time (ignoring)");
        return Ok(());
    }
    let layers = build_layers(level, console, log_file, time_format, ansi)?;
    tracing_subscriber::registry().with(layers).init();
    INSTALLED.store(true, Ordering::Relaxed);
    Ok(())
}

/// Returns whether the global subscriber has been installed
pub(crate) fn is_initialized() -> bool {
    INSTALLED.load(Ordering::Relaxed)
}

/// Prints each formatted event as a line above the progress display
struct ProgressLines {
    display: MultiProgress,
    ansi: bool,
}

impl Write for ProgressLines {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        let text = maybe_strip_color(&text, self.ansi);
        let line = text.trim_end_matches('\n');
        if self.display.is_hidden() {
            anstream::eprintln!("{line}");
        } else {
            self.display.println(line)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
