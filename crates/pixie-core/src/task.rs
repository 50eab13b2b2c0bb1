//! Task categories recognized by the controller.

/// Well-known task categories, one per downstream service.
///
/// A task is selected by the first path segment of an inbound request.
/// Matching is case-sensitive and exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Persist a memory payload.
    Memory,
    /// Run an execution job.
    Execute,
    /// Record feedback.
    Feedback,
    /// Render a visualization.
    Visualize,
}

impl Task {
    /// All recognized tasks.
    pub const ALL: [Task; 4] = [Task::Memory, Task::Execute, Task::Feedback, Task::Visualize];

    /// Parse a task from its exact name.
    ///
    /// Returns `None` for anything outside the recognized set, including
    /// case variants and prefixes/suffixes of recognized names.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "memory" => Some(Self::Memory),
            "execute" => Some(Self::Execute),
            "feedback" => Some(Self::Feedback),
            "visualize" => Some(Self::Visualize),
            _ => None,
        }
    }

    /// Extract a task from a request path.
    ///
    /// Takes the first segment after the leading `/` (`/memory/notes`
    /// selects `Memory`). A path without a leading slash has no segment
    /// after the leading empty element and selects nothing.
    pub fn from_path(path: &str) -> Option<Self> {
        path.split('/').nth(1).and_then(Self::parse)
    }

    /// Get the name of this task.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Execute => "execute",
            Self::Feedback => "feedback",
            Self::Visualize => "visualize",
        }
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
