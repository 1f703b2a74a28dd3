use axum::extract::{Query, State};
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sv_namespace::{SaveOutcome, SaveStatus};

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Body of a save request.
///
/// Either `key` (a composite key, prefix optional) or `name` + `id`
/// identifies the sheet.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub key: Option<String>,
    pub name: Option<String>,
    pub id: Option<String>,
    pub body: Option<Value>,
    pub content_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub message: String,
    pub key: String,
    pub status: SaveStatus,
}

impl From<SaveOutcome> for SaveResponse {
    fn from(outcome: SaveOutcome) -> Self {
        Self {
            message: "Character sheet saved successfully".into(),
            key: outcome.key.into_string(),
            status: outcome.status,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadParams {
    pub key: Option<String>,
    pub content_type: Option<String>,
}

/// String bodies are stored verbatim, anything else as serialized JSON.
fn payload(body: Value) -> ServerResult<Vec<u8>> {
    match body {
        Value::String(s) => Ok(s.into_bytes()),
        other => serde_json::to_vec(&other).map_err(|e| ServerError::Internal(e.to_string())),
    }
}

/// Reject content types that could not be sent back as a header.
fn header_value(content_type: &str) -> ServerResult<HeaderValue> {
    HeaderValue::from_str(content_type)
        .map_err(|_| ServerError::BadRequest(format!("invalid content type {content_type:?}")))
}

fn missing_input() -> ServerError {
    ServerError::BadRequest("Missing key or body".into())
}

pub async fn save_handler(
    State(state): State<AppState>,
    Json(request): Json<SaveRequest>,
) -> ServerResult<Json<SaveResponse>> {
    let body = match request.body {
        None | Some(Value::Null) => return Err(missing_input()),
        Some(Value::String(s)) if s.is_empty() => return Err(missing_input()),
        Some(body) => payload(body)?,
    };
    let content_type = request.content_type.as_deref();
    if let Some(content_type) = content_type {
        header_value(content_type)?;
    }

    let outcome = match (request.key.as_deref(), request.name.as_deref(), request.id.as_deref()) {
        (Some(key), _, _) if !key.is_empty() => {
            state.manager.save_by_key(key, body, content_type).await?
        }
        (_, Some(name), Some(id)) => state.manager.save(name, id, body, content_type).await?,
        _ => return Err(missing_input()),
    };
    Ok(Json(outcome.into()))
}

pub async fn load_handler(
    State(state): State<AppState>,
    Query(params): Query<LoadParams>,
) -> ServerResult<Response> {
    let key = params
        .key
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ServerError::BadRequest("Missing key".into()))?;
    if let Some(content_type) = params.content_type.as_deref() {
        header_value(content_type)?;
    }
    let sheet = state
        .manager
        .load(&key, params.content_type.as_deref())
        .await?;
    let content_type = HeaderValue::from_str(&sheet.content_type).map_err(|_| {
        ServerError::Internal(format!(
            "stored content type {:?} is not a valid header",
            sheet.content_type
        ))
    })?;
    Ok(([(header::CONTENT_TYPE, content_type)], sheet.body).into_response())
}

pub async fn list_handler(State(state): State<AppState>) -> ServerResult<Json<Vec<String>>> {
    Ok(Json(state.manager.list().await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateCampRequest {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CampParams {
    pub code: Option<String>,
}

pub async fn create_camp_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateCampRequest>,
) -> ServerResult<Json<Value>> {
    let camp = state
        .camps
        .create(request.name.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(json!({
        "message": "Camp created successfully",
        "code": camp.details.code,
    })))
}

pub async fn get_camp_handler(
    State(state): State<AppState>,
    Query(params): Query<CampParams>,
) -> ServerResult<Response> {
    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ServerError::BadRequest("Camp code is required".into()))?;
    let camp = state.camps.get(&code).await?;
    let content_type = HeaderValue::from_str(&camp.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/json"));
    Ok(([(header::CONTENT_TYPE, content_type)], camp.data).into_response())
}

/// Health check handler.
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Info handler.
pub async fn info_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": "sv-server",
        "version": env!("CARGO_PKG_VERSION"),
        "prefix": state.manager.codec().prefix(),
    }))
}
