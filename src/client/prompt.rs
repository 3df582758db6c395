//! Interactive selection
// (c) 2025 Ross Younger

use std::str::FromStr;

use anyhow::{Context as _, Result, bail};
use tokio::io::{AsyncBufRead, AsyncBufReadExt as _};

use crate::session::UserCommand;

/// Reads `<file id> <start address> <end address>` from `reader`.
///
/// The three values are whitespace-separated and may span several lines.
/// Anything after the third value on its line is ignored.
pub(crate) async fn read_user_command<R>(reader: &mut R) -> Result<UserCommand>
where
    R: AsyncBufRead + Unpin,
{
    let mut tokens: Vec<String> = Vec::with_capacity(3);
    let mut line = String::new();
    while tokens.len() < 3 {
        line.clear();
        let n = reader
            .read_line(&mut line)
            .await
            .context("reading selection")?;
        if n == 0 {
            bail!("input ended before a file id, start address and end address were given");
        }
        tokens.extend(line.split_whitespace().map(str::to_owned));
    }
    Ok(UserCommand {
        file_id: parse(&tokens[0], "file id")?,
        start_addr: parse(&tokens[1], "start address")?,
        end_addr: parse(&tokens[2], "end address")?,
    })
}

fn parse<T>(token: &str, what: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    token
        .parse()
        .with_context(|| format!("invalid {what} {token:?}"))
}
