//! Public SDK for the pixie edge dispatch platform.
//!
//! This crate re-exports all platform functionality:
//!
//! ```ignore
//! use pixie_sdk::prelude::*;
//!
//! let table = RoutingTable::shared();
//! let dispatcher = Dispatcher::new(table, HttpForwarder::new());
//! let outcome = dispatcher.dispatch(req.path(), body).await?;
//! ```

pub use pixie_core;
pub use pixie_data;
pub use pixie_observability;

/// Prelude for convenient imports.
pub mod prelude {
    pub use pixie_core::*;
    pub use pixie_data::*;
    pub use pixie_observability::*;
}
