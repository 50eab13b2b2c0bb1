//! GitHub-backed memory storage.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// GitHub rejected the request.
    #[error("GitHub API error: {status}: {body}")]
    Api {
        /// HTTP status returned by the API.
        status: u16,
        /// Raw response body.
        body: String,
    },
    /// The API could not be reached.
    #[error("Connection error: {0}")]
    Connection(String),
    /// The outbound request could not be constructed or sent.
    #[error("Request error: {0}")]
    Request(String),
    /// The API response was not valid JSON.
    #[error("Deserialization error: {0}")]
    Deserialization(String),
    /// The store configuration is unusable.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// One-operation interface to the storage collaborator.
///
/// The memory component calls this exactly once per request and returns
/// the result verbatim; payload contents are never inspected.
#[async_trait(?Send)]
pub trait MemoryStore {
    /// Persist a memory payload and return the collaborator's result.
    async fn save_memory(&self, payload: Value) -> Result<Value, StoreError>;
}

/// Known GitHub token prefixes.
/// See: https://github.blog/2021-04-05-behind-githubs-new-authentication-token-formats/
const GITHUB_TOKEN_PREFIXES: &[&str] = &[
    "ghp_",        // Personal access tokens (classic)
    "github_pat_", // Fine-grained personal access tokens
    "gho_",        // OAuth access tokens
    "ghu_",        // GitHub App user-to-server tokens
    "ghs_",        // GitHub App server-to-server tokens
];

/// Validate that a string looks like a GitHub token based on its prefix.
///
/// Format check only; it does not verify the token is active or scoped.
pub fn is_valid_github_token(token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    GITHUB_TOKEN_PREFIXES
        .iter()
        .any(|prefix| token.starts_with(prefix))
}

/// Configuration for the GitHub-backed store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Branch to commit to.
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Directory inside the repository where documents are written.
    #[serde(default = "default_content_dir")]
    pub content_dir: String,
    /// API token.
    pub token: String,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_content_dir() -> String {
    "memories".to_string()
}

impl GitHubConfig {
    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.owner.is_empty() || self.repo.is_empty() {
            return Err(StoreError::Config(
                "owner and repo must be set".to_string(),
            ));
        }
        if !is_valid_github_token(&self.token) {
            return Err(StoreError::Config(
                "token does not look like a GitHub token".to_string(),
            ));
        }
        Ok(())
    }
}

/// GitHub contents-API store.
///
/// Each saved payload becomes one JSON document committed to the
/// configured repository. The API's JSON response is returned verbatim
/// as the storage result.
pub struct GitHubStore {
    config: GitHubConfig,
}

impl GitHubStore {
    /// Create a store from validated configuration.
    pub fn new(config: GitHubConfig) -> Result<Self, StoreError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Repository-relative path for a document.
    fn document_path(&self, document_id: &str) -> String {
        format!(
            "{}/{}.json",
            self.config.content_dir.trim_matches('/'),
            document_id
        )
    }

    /// Contents-API URL for a document path.
    fn contents_url(&self, document_path: &str) -> String {
        format!(
            "https://api.github.com/repos/{}/{}/contents/{}",
            self.config.owner, self.config.repo, document_path
        )
    }

    /// Body of the contents-API PUT: commit message, branch, and the
    /// base64-encoded payload document.
    fn save_request_body(
        &self,
        payload: &Value,
        document_id: &str,
    ) -> Result<Vec<u8>, StoreError> {
        use base64::{engine::general_purpose::STANDARD, Engine};

        let document =
            serde_json::to_vec(payload).map_err(|e| StoreError::Request(e.to_string()))?;
        let body = serde_json::json!({
            "message": format!("Save memory {}", document_id),
            "branch": self.config.branch,
            "content": STANDARD.encode(document),
        });
        serde_json::to_vec(&body).map_err(|e| StoreError::Request(e.to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl MemoryStore for GitHubStore {
    async fn save_memory(&self, payload: Value) -> Result<Value, StoreError> {
        use pixie_core::RequestId;
        use spin_sdk::http::{Method, Request};

        let document_id = RequestId::generate().to_string();
        let url = self.contents_url(&self.document_path(&document_id));
        let body = self.save_request_body(&payload, &document_id)?;

        let request = Request::builder()
            .method(Method::Put)
            .uri(&url)
            .header("accept", "application/vnd.github+json")
            .header("authorization", format!("Bearer {}", self.config.token))
            .header("user-agent", "pixie-memory")
            .header("content-type", "application/json")
            .body(body)
            .build();

        let response: spin_sdk::http::Response = spin_sdk::http::send(request)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let status = *response.status();
        let bytes = response.into_body();

        if status >= 400 {
            return Err(StoreError::Api {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| StoreError::Deserialization(e.to_string()))
    }
}

// Non-WASM stub: the contents API is only reachable through the Spin
// runtime's outbound HTTP. Tests substitute fake stores instead.
#[cfg(not(target_arch = "wasm32"))]
#[async_trait(?Send)]
impl MemoryStore for GitHubStore {
    async fn save_memory(&self, _payload: Value) -> Result<Value, StoreError> {
        Err(StoreError::Connection(
            "outbound HTTP requires the Spin runtime".to_string(),
        ))
    }
}
