//! Client-side main loop and supporting structures
// (c) 2025 Ross Younger

mod main_loop;
mod options;
mod progress;
mod prompt;

#[allow(clippy::module_name_repetitions)]
pub use main_loop::client_main;
pub use options::Parameters;

pub(crate) use progress::MAX_UPDATE_FPS;
