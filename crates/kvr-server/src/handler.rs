use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;

use kvr_protocol::{HealthResponse, InfoResponse, ToolCall, ToolDefinition, ToolOutput};

use crate::dispatch::ToolDispatcher;
use crate::error::ServerResult;

/// Shared handler state.
#[derive(Clone, Debug)]
pub struct AppState {
    pub dispatcher: Arc<ToolDispatcher>,
}

impl AppState {
    pub fn new(dispatcher: ToolDispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }
}

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Info handler.
pub async fn info_handler(State(state): State<AppState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        name: "kvr-server".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        tools: state.dispatcher.definitions().len(),
        namespaces: state.dispatcher.fleet().registry().catalog().len(),
    })
}

/// Tool catalogue handler.
pub async fn tools_handler(State(state): State<AppState>) -> Json<Vec<ToolDefinition>> {
    Json(state.dispatcher.definitions())
}

/// Tool call handler.
pub async fn call_handler(
    State(state): State<AppState>,
    Json(call): Json<ToolCall>,
) -> ServerResult<Json<ToolOutput>> {
    let output = state.dispatcher.call(&call).await?;
    Ok(Json(output))
}
