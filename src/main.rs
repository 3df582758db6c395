//! netstore-client utility - main entrypoint
// (c) 2025 Ross Younger

use std::process::ExitCode;

fn main() -> ExitCode {
    netstore_client::main(std::env::args_os())
}
