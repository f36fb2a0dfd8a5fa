use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;

use crate::config_flow::{ConfigFlow, FlowResult};
use crate::error::ArveeError;
use crate::host::services::ServiceInfo;
use crate::host::{ConfigEntry, HostConfigError};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

impl From<ArveeError> for ApiError {
    fn from(err: ArveeError) -> Self {
        let status = match &err {
            ArveeError::Validation { .. } => StatusCode::BAD_REQUEST,
            ArveeError::ServiceNotFound { .. } => StatusCode::NOT_FOUND,
            ArveeError::Resolution { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ArveeError::ConfigurationUpdate {
                source: HostConfigError::UnknownTimeZone(_),
                ..
            } => StatusCode::BAD_REQUEST,
            ArveeError::ConfigurationUpdate { .. }
            | ArveeError::LookupFailed { .. }
            | ArveeError::BackendUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        };
        api_error(status, err.to_string())
    }
}

/// Parse an optional JSON object body. An empty body is an empty object.
fn json_object(body: &Bytes) -> Result<Map<String, Value>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(api_error(StatusCode::BAD_REQUEST, "Data should be a JSON object")),
        Err(e) => Err(api_error(StatusCode::BAD_REQUEST, format!("Invalid JSON: {}", e))),
    }
}

// ─── POST /api/services/{domain}/{service} ───────────────────────

pub async fn call_service(
    State(state): State<Arc<AppState>>,
    Path((domain, service)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<Vec<Value>>, ApiError> {
    let start = Instant::now();
    let data = json_object(&body)?;

    let result = state.host.services.call(&domain, &service, data).await;

    log::info!(
        "POST /api/services/{}/{} -> {} ({:.1}ms)",
        domain,
        service,
        if result.is_ok() { "ok" } else { "error" },
        start.elapsed().as_secs_f64() * 1000.0,
    );

    result?;
    Ok(Json(Vec::new()))
}

// ─── GET /api/services ───────────────────────────────────────────

pub async fn list_services(State(state): State<Arc<AppState>>) -> Json<Vec<ServiceInfo>> {
    Json(state.host.services.services())
}

// ─── GET /api/config ─────────────────────────────────────────────

#[derive(Serialize)]
pub struct ConfigResponse {
    pub time_zone: String,
    pub backend: Option<String>,
    pub version: &'static str,
}

pub async fn config(State(state): State<Arc<AppState>>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        time_zone: state.host.config.time_zone().await,
        backend: state.backend.as_ref().map(|b| b.kind().to_string()),
        version: crate::VERSION,
    })
}

// ─── Config entries ──────────────────────────────────────────────

#[derive(Deserialize)]
struct FlowRequest {
    #[serde(default)]
    user_input: Option<Map<String, Value>>,
}

pub async fn config_flow(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<FlowResult>, ApiError> {
    let request: FlowRequest = serde_json::from_value(Value::Object(json_object(&body)?))
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, format!("Invalid flow request: {}", e)))?;

    let flow = ConfigFlow::new(state.backend.as_ref(), &state.host.entries);
    Ok(Json(flow.step_user(request.user_input).await))
}

pub async fn config_entries(State(state): State<Arc<AppState>>) -> Json<Vec<ConfigEntry>> {
    Json(state.host.entries.entries().await)
}
