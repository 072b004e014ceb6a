use lambda_http::request::RequestContext;
use lambda_http::{Body, Error, Request, RequestExt, Response};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::record::Record;
use crate::store::{RecordStore, StoreError};

const RETRY_AFTER_SECS: &str = "5";

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

/// What the handler needs from one gateway event.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Invocation {
    pub(crate) request_id: String,
    pub(crate) xray_trace_id: Option<String>,
    pub(crate) source_ip: Option<String>,
    pub(crate) user_agent: Option<String>,
    pub(crate) http_method: Option<String>,
    pub(crate) body: Option<Vec<u8>>,
}

impl Invocation {
    pub(crate) fn from_request(event: &Request) -> Self {
        let (request_id, xray_trace_id) = match event.lambda_context_ref() {
            Some(ctx) => (ctx.request_id.clone(), ctx.xray_trace_id.clone()),
            None => (String::new(), None),
        };

        let (source_ip, user_agent, http_method) = match event.request_context_ref() {
            Some(RequestContext::ApiGatewayV1(ctx)) => (
                ctx.identity.source_ip.clone(),
                ctx.identity.user_agent.clone(),
                Some(ctx.http_method.to_string()),
            ),
            Some(RequestContext::ApiGatewayV2(ctx)) => (
                ctx.http.source_ip.clone(),
                ctx.http.user_agent.clone(),
                Some(ctx.http.method.to_string()),
            ),
            _ => (None, None, None),
        };

        let user_agent = user_agent.or_else(|| {
            event
                .headers()
                .get("user-agent")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        });

        let body: &[u8] = event.body().as_ref();

        Self {
            request_id,
            xray_trace_id,
            source_ip,
            user_agent,
            http_method: http_method.or_else(|| Some(event.method().to_string())),
            body: (!body.is_empty()).then(|| body.to_vec()),
        }
    }
}

pub(crate) async fn function_handler<S, F>(
    store: &S,
    config: &Config,
    new_id: &F,
    event: Request,
) -> Result<Response<Body>, Error>
where
    S: RecordStore,
    F: Fn() -> String + Sync,
{
    handle_invocation(store, config, new_id, Invocation::from_request(&event)).await
}

pub(crate) async fn handle_invocation<S, F>(
    store: &S,
    config: &Config,
    new_id: &F,
    invocation: Invocation,
) -> Result<Response<Body>, Error>
where
    S: RecordStore,
    F: Fn() -> String + Sync,
{
    let request_id = invocation.request_id.as_str();
    let table = config.table_name.as_str();

    info!(
        event = "request_received",
        request_id,
        source_ip = invocation.source_ip.as_deref(),
        user_agent = invocation.user_agent.as_deref(),
        http_method = invocation.http_method.as_deref(),
        xray_trace_id = invocation.xray_trace_id.as_deref(),
        "request received"
    );

    let body = invocation.body.as_deref().filter(|b| !b.is_empty());
    let has_payload = body.is_some();
    info!(
        event = "processing_request",
        request_id, has_payload, "processing request"
    );

    let record = match body {
        Some(body) => Record::from_json(body),
        None => Ok(Record::default_with_id(new_id())),
    };
    let record = match record {
        Ok(record) => record,
        Err(e) => {
            error!(
                event = "error",
                request_id,
                error_type = e.error_type(),
                error_message = %e,
                "failed to build record"
            );
            return internal_error();
        }
    };

    match store.put_record(table, &record).await {
        Ok(()) => {
            info!(
                event = "dynamodb_write_success",
                request_id, table, "record written"
            );
            json_response(200, "Successfully inserted data!")
        }
        Err(StoreError::Throttled { code }) => {
            warn!(
                event = "dynamodb_throttled",
                request_id,
                table,
                error_code = %code,
                "write throttled"
            );
            Ok(Response::builder()
                .status(429)
                .header("content-type", "application/json")
                .header("retry-after", RETRY_AFTER_SECS)
                .body(message_body("Too many requests, please retry later")?)?)
        }
        Err(StoreError::Service { code, message }) => {
            error!(
                event = "dynamodb_error",
                request_id,
                table,
                error_code = %code,
                error_message = %message,
                "write rejected"
            );
            internal_error()
        }
        Err(e @ StoreError::Unavailable(_)) => {
            error!(
                event = "error",
                request_id,
                error_type = "StoreUnavailable",
                error_message = %e,
                "write failed"
            );
            internal_error()
        }
    }
}

fn message_body(message: &'static str) -> Result<Body, Error> {
    Ok(Body::Text(serde_json::to_string(&MessageResponse { message })?))
}

fn json_response(status: u16, message: &'static str) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(message_body(message)?)?)
}

fn internal_error() -> Result<Response<Body>, Error> {
    json_response(500, "Internal server error")
}
