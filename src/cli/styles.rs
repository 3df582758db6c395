// (c) 2025 Ross Younger
//! CLI output styling
//!
//! Users of this module probably ought to use anstream's `println!` / `eprintln!` macros,
//! which strip styling when the output is not a terminal.

use std::borrow::Cow;
use std::io::IsTerminal as _;

#[allow(clippy::enum_glob_use)]
use anstyle::AnsiColor::*;
use anstyle::Color::Ansi;
use clap::builder::styling::Styles;

/// Error message styling. This can be Displayed directly.
pub(crate) const ERROR: anstyle::Style = anstyle::Style::new().bold().fg_color(Some(Ansi(Red)));
/// Warning message styling. This can be Displayed directly.
pub(crate) const WARNING: anstyle::Style =
    anstyle::Style::new().bold().fg_color(Some(Ansi(Yellow)));
/// Informational message styling. This can be Displayed directly.
pub(crate) const INFO: anstyle::Style = anstyle::Style::new().fg_color(Some(Ansi(Cyan)));

pub(crate) const HEADER: anstyle::Style = anstyle::Style::new()
    .underline()
    .fg_color(Some(Ansi(Yellow)));

/// Resets styling to default. This is a re-export of [`anstyle::Reset`].
pub(crate) use anstyle::Reset as RESET;

pub(crate) const CLAP_STYLES: Styles = Styles::styled()
    .usage(HEADER)
    .header(HEADER)
    .literal(anstyle::Style::new().bold())
    .invalid(WARNING)
    .error(ERROR)
    .valid(INFO.bold().underline())
    .placeholder(INFO);

/// Detect whether diagnostic output should be coloured
///
/// See [https://bixense.com/clicolors/](https://bixense.com/clicolors/) for the environment variables.
pub(crate) fn autodetect_colour() -> bool {
    let clicolor_force = std::env::var("CLICOLOR_FORCE").unwrap_or_default();
    let no_color = std::env::var("NO_COLOR").unwrap_or_default();

    if !no_color.is_empty() {
        false
    } else if !clicolor_force.is_empty() {
        true
    } else {
        std::io::stderr().is_terminal()
    }
}

pub(crate) fn maybe_strip_color(s: &str, colour: bool) -> Cow<'_, str> {
    if colour {
        s.into()
    } else {
        anstream::adapter::strip_str(s).to_string().into()
    }
}

#[cfg(test)]
mod test {
    use super::{ERROR, RESET, maybe_strip_color};

    #[test]
    fn strip() {
        let styled = format!("{ERROR}Error:{RESET} oops");
        assert_eq!(maybe_strip_color(&styled, false), "Error: oops");
        assert_eq!(maybe_strip_color(&styled, true), styled);
    }
}
