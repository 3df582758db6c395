//! Progress bar styling
// (c) 2025 Ross Younger

use indicatif::ProgressStyle;

/// Maximum update frequency we will use for the progress display
pub(crate) const MAX_UPDATE_FPS: u8 = 20;

/// A single-line style format for Indicatif
///
/// ```text
/// b.bin [==========================            ] 2s @ 123.4MB/s [70%/1.24GB]
/// ```
const PROGRESS_STYLE: &str =
    "{msg:.dim} {wide_bar:.cyan} {eta} @ {decimal_bytes_per_sec} [{decimal_total_bytes:.dim}]";

/// The style used for fragment transfers
pub(crate) fn progress_style() -> anyhow::Result<ProgressStyle> {
    Ok(ProgressStyle::with_template(PROGRESS_STYLE)?.progress_chars("=> "))
}

#[cfg(test)]
mod tests {
    #[test]
    fn style_parses() {
        let _ = super::progress_style().unwrap();
    }
}
