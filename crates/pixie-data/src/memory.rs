//! Memory persistence flow: parse the payload, delegate, return the result.

use serde_json::Value;

use crate::store::{MemoryStore, StoreError};

/// Error type for the memory flow.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// The request body was not valid JSON.
    #[error("Malformed memory payload: {0}")]
    MalformedPayload(String),
    /// The storage collaborator failed.
    #[error("Storage failure: {0}")]
    Store(#[from] StoreError),
}

/// The memory component's request flow.
///
/// Parses the body as JSON, hands the payload to the store exactly once,
/// and returns whatever the store returned. Payload contents are never
/// inspected or validated.
pub struct MemoryService<S> {
    store: S,
}

impl<S: MemoryStore> MemoryService<S> {
    /// Create a service over a storage collaborator.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Parse `body` and persist the resulting payload.
    pub async fn save(&self, body: &[u8]) -> Result<Value, MemoryError> {
        let payload: Value = serde_json::from_slice(body)
            .map_err(|e| MemoryError::MalformedPayload(e.to_string()))?;
        Ok(self.store.save_memory(payload).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::executor::block_on;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    type SavedPayloads = Rc<RefCell<Vec<Value>>>;

    struct RecordingStore {
        saved: SavedPayloads,
        response: Value,
    }

    impl RecordingStore {
        fn new(response: Value) -> (Self, SavedPayloads) {
            let saved = SavedPayloads::default();
            (
                Self {
                    saved: saved.clone(),
                    response,
                },
                saved,
            )
        }
    }

    #[async_trait(?Send)]
    impl MemoryStore for RecordingStore {
        async fn save_memory(&self, payload: Value) -> Result<Value, StoreError> {
            self.saved.borrow_mut().push(payload);
            Ok(self.response.clone())
        }
    }

    struct FailingStore;

    #[async_trait(?Send)]
    impl MemoryStore for FailingStore {
        async fn save_memory(&self, _payload: Value) -> Result<Value, StoreError> {
            Err(StoreError::Api {
                status: 503,
                body: "service unavailable".to_string(),
            })
        }
    }

    #[test]
    fn test_save_delegates_exactly_once_with_parsed_payload() {
        let (store, saved) = RecordingStore::new(json!({"id": "abc123"}));
        let service = MemoryService::new(store);

        let result = block_on(service.save(br#"{"key":"value"}"#)).unwrap();

        let saved = saved.borrow();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0], json!({"key": "value"}));
        assert_eq!(result, json!({"id": "abc123"}));
    }

    #[test]
    fn test_save_returns_collaborator_result_verbatim() {
        let response = json!({"commit": {"sha": "deadbeef"}, "content": null});
        let (store, _saved) = RecordingStore::new(response.clone());
        let service = MemoryService::new(store);

        let result = block_on(service.save(br#"{"note":"hello"}"#)).unwrap();
        assert_eq!(result, response);
    }

    #[test]
    fn test_malformed_payload_is_rejected_before_the_store() {
        let (store, saved) = RecordingStore::new(json!({}));
        let service = MemoryService::new(store);

        let bodies: [&[u8]; 3] = [b"not json", b"", b"{\"unterminated\":"];
        for body in bodies {
            let err = block_on(service.save(body)).unwrap_err();
            assert!(matches!(err, MemoryError::MalformedPayload(_)));
        }
        assert!(saved.borrow().is_empty());
    }

    #[test]
    fn test_store_failure_surfaces_as_error() {
        let service = MemoryService::new(FailingStore);

        let err = block_on(service.save(br#"{"note":"hello"}"#)).unwrap_err();
        assert!(matches!(err, MemoryError::Store(StoreError::Api { status: 503, .. })));
    }
}
