//! Core abstractions for the pixie edge dispatch platform.
//!
//! This crate provides the fundamental types:
//! - `Task` - Recognized task categories
//! - `RoutingTable` - Immutable task-to-downstream mapping
//! - `EndpointsConfig` - Downstream endpoint configuration
//! - `RequestContext` - Per-request identity and path

mod config;
mod context;
mod routing;
mod task;

pub use config::*;
pub use context::*;
pub use routing::*;
pub use task::*;
