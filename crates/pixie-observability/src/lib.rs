//! Observability infrastructure for the pixie edge dispatch platform.

mod logging;

pub use logging::*;
