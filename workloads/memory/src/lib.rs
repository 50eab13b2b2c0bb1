//! Memory component.
//!
//! Parses the inbound body as JSON, hands the payload to the GitHub-backed
//! store exactly once, and returns the store's result as the response body.
//! The payload itself is opaque: nothing here inspects or validates its
//! shape.

use spin_sdk::http::{Request, Response};
use spin_sdk::http_component;
use spin_sdk::variables;

use pixie_sdk::pixie_core::{RequestContext, RequestId};
use pixie_sdk::pixie_data::{GitHubConfig, GitHubStore, MemoryError, MemoryService, StoreError};
use pixie_sdk::pixie_observability::StructuredLogger;

/// Memory HTTP handler.
#[http_component]
async fn handle_memory(req: Request) -> anyhow::Result<Response> {
    let ctx = RequestContext::new(format!("{:?}", req.method()), req.path().to_string());
    let logger = StructuredLogger::new(ctx.request_id.clone())
        .with_component("memory")
        .with_route(&ctx.path);

    logger.info("Request started");

    let store = match github_store() {
        Ok(store) => store,
        Err(e) => {
            logger
                .error_builder("Store configuration rejected")
                .field("error", e.to_string())
                .emit();
            return Ok(json_error(500, "storage misconfigured", &ctx.request_id));
        }
    };

    let body = req.into_body();
    let service = MemoryService::new(store);

    let response = match service.save(&body).await {
        Ok(result) => {
            logger
                .info_builder("Memory saved")
                .field_i64("payload_bytes", body.len() as i64)
                .emit();
            Response::builder()
                .status(200)
                .header("content-type", "application/json")
                .header("x-request-id", ctx.request_id.to_string())
                .body(serde_json::to_vec(&result)?)
                .build()
        }
        Err(MemoryError::MalformedPayload(reason)) => {
            logger
                .warn_builder("Malformed payload")
                .field("error", reason.as_str())
                .emit();
            json_error(400, &reason, &ctx.request_id)
        }
        Err(MemoryError::Store(e)) => {
            logger
                .error_builder("Storage failure")
                .field("error", e.to_string())
                .emit();
            json_error(502, &e.to_string(), &ctx.request_id)
        }
    };

    logger.info("Request complete");
    Ok(response)
}

/// Build the GitHub store from Spin application variables.
fn github_store() -> Result<GitHubStore, StoreError> {
    let get = |key: &str| variables::get(key).map_err(|e| StoreError::Config(e.to_string()));

    let config = GitHubConfig {
        owner: get("github_owner")?,
        repo: get("github_repo")?,
        branch: variables::get("github_branch").unwrap_or_else(|_| "main".to_string()),
        content_dir: variables::get("github_content_dir")
            .unwrap_or_else(|_| "memories".to_string()),
        token: get("github_token")?,
    };
    GitHubStore::new(config)
}

/// JSON error response with the request ID attached.
fn json_error(status: u16, message: &str, request_id: &RequestId) -> Response {
    let body = serde_json::json!({ "error": message });
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .header("x-request-id", request_id.to_string())
        .body(body.to_string())
        .build()
}
