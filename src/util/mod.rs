//! General utility code that didn't fit anywhere else
//!
//! Note that most of this module is not exported.
// (c) 2025 Ross Younger

mod address_family;
pub use address_family::AddressFamily;

mod dns;
pub(crate) use dns::resolve_endpoint;

pub mod io;

mod tracing;
pub use tracing::TimeFormat;
pub(crate) use tracing::{
    ConsoleSink, is_initialized as tracing_is_initialised, setup as setup_tracing,
    trace_level,
};
