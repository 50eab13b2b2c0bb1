//! Edge controller component.
//!
//! Inspects the first path segment of every inbound request, maps it to a
//! downstream task service through the routing table, and forwards the raw
//! body as a POST. The downstream response passes through unmodified;
//! unrecognized tasks are rejected with `400 Unknown task` before any
//! outbound call.

use spin_sdk::http::{Request, Response};
use spin_sdk::http_component;

use pixie_sdk::pixie_core::{RequestContext, RoutingTable};
use pixie_sdk::pixie_data::{DispatchError, Dispatcher, ForwardedResponse, HttpForwarder};
use pixie_sdk::pixie_observability::StructuredLogger;

/// Controller HTTP handler.
#[http_component]
async fn handle_controller(req: Request) -> anyhow::Result<Response> {
    let ctx = RequestContext::new(format!("{:?}", req.method()), req.path().to_string());
    let logger = StructuredLogger::new(ctx.request_id.clone())
        .with_component("controller")
        .with_route(&ctx.path);

    logger.info("Request started");

    let path = ctx.path.clone();
    let body = req.into_body();

    let dispatcher = Dispatcher::new(RoutingTable::shared(), HttpForwarder::new());

    let response = match dispatcher.dispatch(&path, body).await {
        Ok(outcome) => {
            logger
                .info_builder("Dispatched")
                .field("task", outcome.task.name())
                .field_i64("status", outcome.response.status as i64)
                .emit();
            passthrough(outcome.response, &ctx)
        }
        Err(DispatchError::UnknownTask) => {
            logger
                .warn_builder("Unknown task")
                .field("path", path.as_str())
                .emit();
            Response::builder()
                .status(400)
                .header("content-type", "text/plain")
                .header("x-request-id", ctx.request_id.to_string())
                .body("Unknown task")
                .build()
        }
        Err(DispatchError::Downstream { task, source }) => {
            logger
                .error_builder("Downstream unavailable")
                .field("task", task.name())
                .field("error", source.to_string())
                .emit();
            Response::builder()
                .status(502)
                .header("content-type", "text/plain")
                .header("x-request-id", ctx.request_id.to_string())
                .body(format!("Downstream {} unavailable", task))
                .build()
        }
    };

    logger.info("Request complete");
    Ok(response)
}

/// Copy the downstream response through unmodified, adding only the
/// request ID for correlation.
fn passthrough(forwarded: ForwardedResponse, ctx: &RequestContext) -> Response {
    let mut builder = Response::builder();
    builder.status(forwarded.status);
    for (name, value) in forwarded.headers {
        builder.header(name, value);
    }
    builder.header("x-request-id", ctx.request_id.to_string());
    builder.body(forwarded.body).build()
}
