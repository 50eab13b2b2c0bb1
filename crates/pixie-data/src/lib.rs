//! Outbound HTTP layer for the pixie edge dispatch platform.
//!
//! This crate owns both outbound concerns of the system:
//! - `Dispatcher` + `Forwarder` - forwarding inbound bodies to the
//!   downstream service selected by the routing table
//! - `MemoryService` + `MemoryStore` - persisting memory payloads through
//!   the GitHub-backed storage collaborator
//!
//! The network edges are traits with a single operation each, so the
//! decision logic is testable with substitutable fakes; the Spin-backed
//! implementations live behind `target_arch = "wasm32"`.

mod dispatch;
mod forward;
mod memory;
mod store;

pub use dispatch::*;
pub use forward::*;
pub use memory::*;
pub use store::*;
