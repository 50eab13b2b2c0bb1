//! Task dispatch: resolve the inbound path and forward the body.

use pixie_core::{RoutingTable, Task};

use crate::forward::{ForwardError, ForwardedResponse, Forwarder};

/// Error type for dispatch operations.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The first path segment names no recognized task.
    #[error("Unknown task")]
    UnknownTask,
    /// The downstream service for a recognized task failed.
    #[error("Downstream {task} unavailable: {source}")]
    Downstream {
        /// The task whose downstream failed.
        task: Task,
        /// The transport-level cause.
        source: ForwardError,
    },
}

/// A successful dispatch: which task was selected and what came back.
#[derive(Debug)]
pub struct Dispatched {
    /// The task selected by the path.
    pub task: Task,
    /// The downstream response, captured for passthrough.
    pub response: ForwardedResponse,
}

/// Dispatches inbound requests to downstream services.
///
/// Pure lookup against the routing table plus exactly one outbound call
/// per recognized request. Unknown tasks are rejected before any network
/// activity.
pub struct Dispatcher<'a, F> {
    table: &'a RoutingTable,
    forwarder: F,
}

impl<'a, F: Forwarder> Dispatcher<'a, F> {
    /// Create a dispatcher over a routing table and a forwarder.
    pub fn new(table: &'a RoutingTable, forwarder: F) -> Self {
        Self { table, forwarder }
    }

    /// Resolve `path` and forward `body` to the selected downstream.
    pub async fn dispatch(&self, path: &str, body: Vec<u8>) -> Result<Dispatched, DispatchError> {
        let (task, url) = self
            .table
            .resolve(path)
            .map_err(|_| DispatchError::UnknownTask)?;

        let response = self
            .forwarder
            .forward(url, body)
            .await
            .map_err(|source| DispatchError::Downstream { task, source })?;

        Ok(Dispatched { task, response })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryService;
    use crate::store::{MemoryStore, StoreError};
    use async_trait::async_trait;
    use futures::executor::block_on;
    use pixie_core::EndpointsConfig;
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::rc::Rc;

    type CallLog = Rc<RefCell<Vec<(String, Vec<u8>)>>>;

    /// Records every forward call and replays a canned response.
    struct RecordingForwarder {
        calls: CallLog,
        response: ForwardedResponse,
    }

    impl RecordingForwarder {
        fn new(response: ForwardedResponse) -> (Self, CallLog) {
            let calls = CallLog::default();
            (
                Self {
                    calls: calls.clone(),
                    response,
                },
                calls,
            )
        }

        fn ok() -> (Self, CallLog) {
            Self::new(ForwardedResponse {
                status: 200,
                headers: Vec::new(),
                body: Vec::new(),
            })
        }
    }

    #[async_trait(?Send)]
    impl Forwarder for RecordingForwarder {
        async fn forward(
            &self,
            url: &str,
            body: Vec<u8>,
        ) -> Result<ForwardedResponse, ForwardError> {
            self.calls.borrow_mut().push((url.to_string(), body));
            Ok(self.response.clone())
        }
    }

    struct FailingForwarder;

    #[async_trait(?Send)]
    impl Forwarder for FailingForwarder {
        async fn forward(
            &self,
            _url: &str,
            _body: Vec<u8>,
        ) -> Result<ForwardedResponse, ForwardError> {
            Err(ForwardError::Connection("connection refused".to_string()))
        }
    }

    #[test]
    fn test_each_task_forwards_once_to_its_endpoint() {
        let table = RoutingTable::default();
        for task in Task::ALL {
            let (forwarder, calls) = RecordingForwarder::ok();
            let dispatcher = Dispatcher::new(&table, forwarder);

            let outcome = block_on(
                dispatcher.dispatch(&format!("/{}", task.name()), b"payload".to_vec()),
            )
            .unwrap();

            assert_eq!(outcome.task, task);
            let calls = calls.borrow();
            assert_eq!(calls.len(), 1);
            assert_eq!(calls[0].0, table.base_url(task));
            assert_eq!(calls[0].1, b"payload".to_vec());
        }
    }

    #[test]
    fn test_body_passes_through_unchanged() {
        let table = RoutingTable::default();
        let (forwarder, calls) = RecordingForwarder::ok();
        let dispatcher = Dispatcher::new(&table, forwarder);

        let body = br#"{"note":"hello"}"#.to_vec();
        block_on(dispatcher.dispatch("/memory", body.clone())).unwrap();

        assert_eq!(calls.borrow()[0].1, body);
    }

    #[test]
    fn test_unknown_task_makes_no_outbound_call() {
        let table = RoutingTable::default();
        for path in ["/", "", "/Memory", "/memo", "/memoryx", "/unknown-task"] {
            let (forwarder, calls) = RecordingForwarder::ok();
            let dispatcher = Dispatcher::new(&table, forwarder);

            let err = block_on(dispatcher.dispatch(path, b"ignored".to_vec())).unwrap_err();
            assert!(matches!(err, DispatchError::UnknownTask));
            assert!(calls.borrow().is_empty());
        }
    }

    #[test]
    fn test_downstream_failure_propagates() {
        let table = RoutingTable::default();
        let dispatcher = Dispatcher::new(&table, FailingForwarder);

        let err = block_on(dispatcher.dispatch("/execute", Vec::new())).unwrap_err();
        match err {
            DispatchError::Downstream { task, source } => {
                assert_eq!(task, Task::Execute);
                assert!(matches!(source, ForwardError::Connection(_)));
            }
            other => panic!("expected downstream error, got {other:?}"),
        }
    }

    #[test]
    fn test_passthrough_preserves_status_headers_body() {
        let table = RoutingTable::default();
        let downstream = ForwardedResponse {
            status: 201,
            headers: vec![
                ("content-type".to_string(), "application/json".to_string()),
                ("x-upstream".to_string(), "memory".to_string()),
            ],
            body: br#"{"id":"abc123"}"#.to_vec(),
        };
        let (forwarder, _calls) = RecordingForwarder::new(downstream.clone());
        let dispatcher = Dispatcher::new(&table, forwarder);

        let outcome = block_on(dispatcher.dispatch("/memory", Vec::new())).unwrap();
        assert_eq!(outcome.response, downstream);
    }

    /// Forwarder standing in for a deployed memory component: it runs the
    /// memory flow against a canned store and wraps the result like the
    /// real component does.
    struct MemoryComponentForwarder {
        store_response: Value,
    }

    struct CannedStore {
        response: Value,
    }

    #[async_trait(?Send)]
    impl MemoryStore for CannedStore {
        async fn save_memory(&self, _payload: Value) -> Result<Value, StoreError> {
            Ok(self.response.clone())
        }
    }

    #[async_trait(?Send)]
    impl Forwarder for MemoryComponentForwarder {
        async fn forward(
            &self,
            _url: &str,
            body: Vec<u8>,
        ) -> Result<ForwardedResponse, ForwardError> {
            let service = MemoryService::new(CannedStore {
                response: self.store_response.clone(),
            });
            let result = service.save(&body).await.expect("memory flow failed");
            Ok(ForwardedResponse {
                status: 200,
                headers: vec![("content-type".to_string(), "application/json".to_string())],
                body: serde_json::to_vec(&result).expect("serializable result"),
            })
        }
    }

    #[test]
    fn test_memory_dispatch_end_to_end() {
        let table = RoutingTable::new(EndpointsConfig::default());
        let dispatcher = Dispatcher::new(
            &table,
            MemoryComponentForwarder {
                store_response: json!({"id": "abc123"}),
            },
        );

        let outcome =
            block_on(dispatcher.dispatch("/memory", br#"{"note":"hello"}"#.to_vec())).unwrap();

        assert_eq!(outcome.task, Task::Memory);
        assert_eq!(outcome.response.status, 200);
        assert_eq!(outcome.response.header("content-type"), Some("application/json"));
        let body: Value = serde_json::from_slice(&outcome.response.body).unwrap();
        assert_eq!(body, json!({"id": "abc123"}));
    }
}
