//! Downstream endpoint configuration.

use serde::{Deserialize, Serialize};

use crate::task::Task;

/// Base URLs of the downstream services, one per task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Memory service base URL.
    #[serde(default = "default_memory")]
    pub memory: String,
    /// Execution service base URL.
    #[serde(default = "default_execute")]
    pub execute: String,
    /// Feedback service base URL.
    #[serde(default = "default_feedback")]
    pub feedback: String,
    /// Visualization service base URL.
    #[serde(default = "default_visualize")]
    pub visualize: String,
}

fn default_memory() -> String {
    "https://memory.pixie.example.com".to_string()
}

fn default_execute() -> String {
    "https://execution.pixie.example.com".to_string()
}

fn default_feedback() -> String {
    "https://feedback.pixie.example.com".to_string()
}

fn default_visualize() -> String {
    "https://visualization.pixie.example.com".to_string()
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            memory: default_memory(),
            execute: default_execute(),
            feedback: default_feedback(),
            visualize: default_visualize(),
        }
    }
}

impl EndpointsConfig {
    /// Create a configuration with the default endpoints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the memory service base URL.
    pub fn with_memory(mut self, url: impl Into<String>) -> Self {
        self.memory = url.into();
        self
    }

    /// Override the execution service base URL.
    pub fn with_execute(mut self, url: impl Into<String>) -> Self {
        self.execute = url.into();
        self
    }

    /// Override the feedback service base URL.
    pub fn with_feedback(mut self, url: impl Into<String>) -> Self {
        self.feedback = url.into();
        self
    }

    /// Override the visualization service base URL.
    pub fn with_visualize(mut self, url: impl Into<String>) -> Self {
        self.visualize = url.into();
        self
    }

    /// Get the base URL configured for a task.
    pub fn endpoint(&self, task: Task) -> &str {
        match task {
            Task::Memory => &self.memory,
            Task::Execute => &self.execute,
            Task::Feedback => &self.feedback,
            Task::Visualize => &self.visualize,
        }
    }
}
