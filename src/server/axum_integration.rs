//! Axum integration — ready-made HTTP routes for A2A servers.
//!
//! [`a2a_router`] builds a `Router` exposing the agent descriptor, a health
//! check, the legacy single-shot message/conversation endpoint, and the
//! JSON-RPC task-engine methods (`tasks/send`, `tasks/get`, `tasks/cancel`,
//! `tasks/stream`, `tasks/sendSubscribe`). Every route is mirrored under
//! `/a2a/…` for callers that route by prefix.

use std::collections::HashMap;
use std::sync::Arc;

use async_stream::stream;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::sse::{Event, KeepAlive, Sse},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures::stream::StreamExt;
use tower_http::cors::CorsLayer;

use crate::error::A2AError;
use crate::types::{
    AgentCard, Content, Conversation, JsonRpcError, JsonRpcId, JsonRpcRequest, JsonRpcResponse,
    Message, MessageRole, StreamChunk, Task,
};

use super::request_handler::RequestHandler;

/// Shared state handed to every axum handler.
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<dyn RequestHandler>,
    pub agent_card: Arc<AgentCard>,
}

impl AppState {
    pub fn new(handler: Arc<dyn RequestHandler>, agent_card: AgentCard) -> Self {
        Self {
            handler,
            agent_card: Arc::new(agent_card),
        }
    }
}

/// Build the full A2A router: bare paths plus an `/a2a/…` mirror of each.
pub fn a2a_router(state: AppState) -> Router {
    let routes = || {
        Router::new()
            .route("/agent.json", get(get_agent_card))
            .route("/health", get(get_health))
            .route("/", post(post_legacy_message))
            .route("/tasks/send", post(post_tasks_send))
            .route("/tasks/get", post(post_tasks_get))
            .route("/tasks/cancel", post(post_tasks_cancel))
            .route("/tasks/stream", post(post_tasks_stream))
            .route("/tasks/sendSubscribe", post(post_tasks_stream))
    };

    Router::new()
        .merge(routes())
        .nest("/a2a", routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Agent descriptor & health
// ---------------------------------------------------------------------------

/// `GET /agent.json` — the agent card. Browsers (sniffed from the `Accept`
/// header) get an HTML page embedding the same JSON; every other caller gets
/// the JSON directly. `?format=json` always forces the JSON form, overriding
/// the `Accept` sniff — useful for a browser tab pointed at the URL directly.
async fn get_agent_card(
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Response {
    let wants_html = query.get("format").map(String::as_str) != Some("json")
        && headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .map(prefers_html)
            .unwrap_or(false);

    if wants_html {
        let body = render_agent_card_html(&state.agent_card);
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            body,
        )
            .into_response()
    } else {
        Json((*state.agent_card).clone()).into_response()
    }
}

/// Prefer HTML only when the caller lists `text/html` ahead of (or in the
/// absence of) `application/json`/`*/*` — mirrors a typical browser `Accept`
/// header without needing a full content-negotiation crate.
fn prefers_html(accept: &str) -> bool {
    let html_pos = accept.find("text/html");
    let json_pos = accept
        .find("application/json")
        .or_else(|| accept.find("*/*"));
    match (html_pos, json_pos) {
        (Some(h), Some(j)) => h < j,
        (Some(_), None) => true,
        _ => false,
    }
}

fn render_agent_card_html(card: &AgentCard) -> String {
    let json = serde_json::to_string_pretty(card).unwrap_or_default();
    format!(
        "<!doctype html>\n<html><head><title>{name}</title></head>\n\
         <body><h1>{name}</h1><p>{description}</p>\n\
         <script type=\"application/json\" id=\"agent-card\">{json}</script></body></html>",
        name = card.name,
        description = card.description,
        json = json,
    )
}

/// `GET /health` — liveness probe.
async fn get_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// Legacy message/conversation endpoint
// ---------------------------------------------------------------------------

/// `POST /` — the pre-JSON-RPC message/conversation surface. Accepts either a
/// bare [`Message`] or a whole [`Conversation`] and replies in the same
/// shape, bridging to the task engine underneath.
async fn post_legacy_message(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    if body.get("messages").is_some() {
        match serde_json::from_value::<Conversation>(body) {
            Ok(conversation) => handle_legacy_conversation(&state, conversation).await,
            Err(e) => bad_request(format!("invalid conversation body: {e}")),
        }
    } else {
        match serde_json::from_value::<Message>(body) {
            Ok(message) => handle_legacy_single_message(&state, message).await,
            Err(e) => bad_request(format!("invalid message body: {e}")),
        }
    }
}

async fn handle_legacy_single_message(state: &AppState, message: Message) -> Response {
    let task = Task::new(message.conversation_id.clone().unwrap_or_default());
    match state.handler.on_send_task(task).await {
        Ok(result) => {
            let reply = message.reply(MessageRole::Agent, Content::text(result.text_or_empty()));
            Json(reply).into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn handle_legacy_conversation(state: &AppState, mut conversation: Conversation) -> Response {
    let last = match conversation.messages.last().cloned() {
        Some(m) => m,
        None => return bad_request("conversation has no messages"),
    };
    let task = Task::new(conversation.conversation_id.clone());
    match state.handler.on_send_task(task).await {
        Ok(result) => {
            let reply = last.reply(MessageRole::Agent, Content::text(result.text_or_empty()));
            conversation.add_message(reply);
            Json(conversation).into_response()
        }
        Err(e) => error_response(e),
    }
}

// ---------------------------------------------------------------------------
// JSON-RPC task-engine methods
// ---------------------------------------------------------------------------

async fn post_tasks_send(
    State(state): State<AppState>,
    Json(req): Json<JsonRpcRequest>,
) -> Json<JsonRpcResponse> {
    let id = req.id.clone();
    let response = match require_method(&req, "tasks/send") {
        Err(e) => JsonRpcResponse::from_a2a_error(id, e),
        Ok(()) => match parse_params::<Task>(&req) {
            Ok(task) => match state.handler.on_send_task(task).await {
                Ok(result) => ok_response(id, &result),
                Err(e) => JsonRpcResponse::from_a2a_error(id, e),
            },
            Err(e) => JsonRpcResponse::from_a2a_error(id, e),
        },
    };
    Json(response)
}

async fn post_tasks_get(
    State(state): State<AppState>,
    Json(req): Json<JsonRpcRequest>,
) -> Json<JsonRpcResponse> {
    let id = req.id.clone();
    let response = match require_method(&req, "tasks/get") {
        Err(e) => JsonRpcResponse::from_a2a_error(id, e),
        Ok(()) => match parse_get_task_params(&req) {
            Ok((task_id, history_length)) => {
                match state.handler.on_get_task(&task_id, history_length).await {
                    Ok(result) => ok_response(id, &result),
                    Err(e) => JsonRpcResponse::from_a2a_error(id, e),
                }
            }
            Err(e) => JsonRpcResponse::from_a2a_error(id, e),
        },
    };
    Json(response)
}

async fn post_tasks_cancel(
    State(state): State<AppState>,
    Json(req): Json<JsonRpcRequest>,
) -> Json<JsonRpcResponse> {
    let id = req.id.clone();
    let response = match require_method(&req, "tasks/cancel") {
        Err(e) => JsonRpcResponse::from_a2a_error(id, e),
        Ok(()) => match parse_task_id(&req) {
            Ok(task_id) => match state.handler.on_cancel_task(&task_id).await {
                Ok(result) => ok_response(id, &result),
                Err(e) => JsonRpcResponse::from_a2a_error(id, e),
            },
            Err(e) => JsonRpcResponse::from_a2a_error(id, e),
        },
    };
    Json(response)
}

/// `POST /tasks/stream` (and its `tasks/sendSubscribe` alias) — runs the task
/// and streams snapshots as SSE frames, each wrapped in a JSON-RPC envelope
/// sharing the request's `id`.
async fn post_tasks_stream(
    State(state): State<AppState>,
    Json(req): Json<JsonRpcRequest>,
) -> Response {
    if req.method != "tasks/stream" && req.method != "tasks/sendSubscribe" {
        return bad_request(format!("unexpected method '{}'", req.method));
    }

    let id = req.id.clone();
    let task = match parse_params::<Task>(&req) {
        Ok(task) => task,
        Err(e) => return error_response(e),
    };

    let inner = match state.handler.on_stream_task(task).await {
        Ok(s) => s,
        Err(e) => return error_response(e),
    };

    let sse_stream = stream! {
        let mut inner = inner;
        while let Some(chunk_result) = inner.next().await {
            match chunk_result {
                Ok(chunk) => {
                    let envelope = JsonRpcResponse::success(
                        id.clone(),
                        serde_json::to_value(&chunk).unwrap_or(serde_json::Value::Null),
                    );
                    let data = serde_json::to_string(&envelope).unwrap_or_default();
                    yield Ok::<_, std::convert::Infallible>(Event::default().data(data));
                    if chunk.is_last() {
                        break;
                    }
                }
                Err(e) => {
                    let data = serde_json::json!({ "error": e.to_string() }).to_string();
                    yield Ok::<_, std::convert::Infallible>(Event::default().event("error").data(data));
                    break;
                }
            }
        }
    };

    Sse::new(sse_stream)
        .keep_alive(KeepAlive::default())
        .into_response()
}

// ---------------------------------------------------------------------------
// Parameter parsing helpers
// ---------------------------------------------------------------------------

fn require_method(req: &JsonRpcRequest, expected: &str) -> Result<(), A2AError> {
    if req.method != expected {
        Err(A2AError::method_not_found(format!(
            "expected method '{expected}', got '{}'",
            req.method
        )))
    } else {
        Ok(())
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(req: &JsonRpcRequest) -> Result<T, A2AError> {
    let params = req
        .params
        .clone()
        .ok_or_else(|| A2AError::invalid_params("missing params"))?;
    serde_json::from_value(params).map_err(|e| A2AError::invalid_params(e.to_string()))
}

fn parse_task_id(req: &JsonRpcRequest) -> Result<String, A2AError> {
    let params = req
        .params
        .clone()
        .ok_or_else(|| A2AError::invalid_params("missing params"))?;
    params
        .get("id")
        .and_then(|v| v.as_str())
        .map(String::from)
        .ok_or_else(|| A2AError::invalid_params("missing 'id'"))
}

fn parse_get_task_params(req: &JsonRpcRequest) -> Result<(String, Option<usize>), A2AError> {
    let params = req
        .params
        .clone()
        .ok_or_else(|| A2AError::invalid_params("missing params"))?;
    let id = params
        .get("id")
        .and_then(|v| v.as_str())
        .map(String::from)
        .ok_or_else(|| A2AError::invalid_params("missing 'id'"))?;
    let history_length = params
        .get("historyLength")
        .and_then(|v| v.as_u64())
        .map(|n| n as usize);
    Ok((id, history_length))
}

fn ok_response(id: JsonRpcId, task: &Task) -> JsonRpcResponse {
    JsonRpcResponse::success(id, serde_json::to_value(task).unwrap_or(serde_json::Value::Null))
}

fn bad_request(message: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, message.into()).into_response()
}

fn error_response(err: A2AError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let rpc_err: JsonRpcError = err.into();
    (status, Json(rpc_err)).into_response()
}
