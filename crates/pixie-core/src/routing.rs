//! Immutable routing table mapping tasks to downstream services.

use std::sync::OnceLock;

use crate::config::EndpointsConfig;
use crate::task::Task;

/// Error type for routing decisions.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RouteError {
    /// The first path segment names no recognized task.
    #[error("Unknown task")]
    UnknownTask,
}

/// Immutable mapping from task to downstream base URL.
///
/// Built once from an `EndpointsConfig` and never mutated afterwards;
/// every dispatch decision is a pure lookup.
#[derive(Debug, Clone)]
pub struct RoutingTable {
    endpoints: EndpointsConfig,
}

static SHARED: OnceLock<RoutingTable> = OnceLock::new();

impl RoutingTable {
    /// Build a routing table from endpoint configuration.
    pub fn new(endpoints: EndpointsConfig) -> Self {
        Self { endpoints }
    }

    /// Process-wide table built from the default endpoints.
    ///
    /// Initialized on first use and shared for the process lifetime.
    pub fn shared() -> &'static RoutingTable {
        SHARED.get_or_init(|| RoutingTable::new(EndpointsConfig::default()))
    }

    /// Get the downstream base URL for a task.
    pub fn base_url(&self, task: Task) -> &str {
        self.endpoints.endpoint(task)
    }

    /// Resolve a request path to a task and its downstream base URL.
    pub fn resolve(&self, path: &str) -> Result<(Task, &str), RouteError> {
        let task = Task::from_path(path).ok_or(RouteError::UnknownTask)?;
        Ok((task, self.base_url(task)))
    }
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::new(EndpointsConfig::default())
    }
}
