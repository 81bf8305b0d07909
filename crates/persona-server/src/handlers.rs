//! HTTP handlers for the lookup API.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequestParts, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum::Json;
use persona_core::{ErrorKind, LookupKind, LookupResult, Provenance};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::server::AppState;

/// Header carrying the caller's trace id.
pub const CALL_ID_HEADER: &str = "callId";

/// Trace id for one request: the `callId` header, or a fresh UUID.
#[derive(Debug, Clone)]
pub struct CallId(pub String);

impl<S: Send + Sync> FromRequestParts<S> for CallId {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let call_id = parts
            .headers
            .get(CALL_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        Ok(Self(call_id))
    }
}

#[derive(Debug, Deserialize)]
pub struct IdentRequest {
    pub ident: String,
}

#[derive(Debug, Deserialize)]
pub struct PurgeRequest {
    pub identifiers: Vec<String>,
}

/// Where the answer came from, as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseSource {
    Cache,
    Registry,
}

impl From<Provenance> for ResponseSource {
    fn from(provenance: Provenance) -> Self {
        match provenance {
            Provenance::Cache => Self::Cache,
            Provenance::Source => Self::Registry,
        }
    }
}

/// A found value with its `source` field alongside.
#[derive(Debug, Serialize)]
pub struct Sourced<T> {
    #[serde(flatten)]
    pub value: T,
    pub source: ResponseSource,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    message: String,
    call_id: String,
}

/// Error response: status plus `{message, callId}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    call_id: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, call_id: &CallId) -> Self {
        Self {
            status,
            message: message.into(),
            call_id: call_id.0.clone(),
        }
    }

    pub fn bad_request(message: impl Into<String>, call_id: &CallId) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, call_id)
    }

    pub fn internal(message: impl Into<String>, call_id: &CallId) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message, call_id)
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            message: self.message,
            call_id: self.call_id,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Map a lookup outcome onto the wire.
fn respond<T: Serialize>(
    kind: LookupKind,
    result: LookupResult<T>,
    call_id: &CallId,
) -> Result<Json<Sourced<T>>, ApiError> {
    match result {
        LookupResult::Found { value, provenance } => Ok(Json(Sourced {
            value,
            source: provenance.into(),
        })),
        LookupResult::NotFound => Err(ApiError::new(
            StatusCode::NOT_FOUND,
            format!("no {kind} found for ident"),
            call_id,
        )),
        LookupResult::Error(e) => {
            let status = match e.kind {
                ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
                ErrorKind::Generic => StatusCode::INTERNAL_SERVER_ERROR,
            };
            tracing::warn!(
                call_id = %call_id.0,
                %kind,
                status = status.as_u16(),
                code = e.code.as_deref().unwrap_or(""),
                "Lookup failed"
            );
            Err(ApiError::new(status, e.message, call_id))
        }
    }
}

/// Extract the ident, turning body rejections into 400s.
fn ident_of(
    body: Result<Json<IdentRequest>, JsonRejection>,
    call_id: &CallId,
) -> Result<String, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::bad_request(e.body_text(), call_id))?;
    let ident = request.ident.trim();
    if ident.is_empty() {
        return Err(ApiError::bad_request("ident must not be blank", call_id));
    }
    Ok(ident.to_string())
}

pub async fn identifiers(
    State(state): State<AppState>,
    call_id: CallId,
    body: Result<Json<IdentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let ident = ident_of(body, &call_id)?;
    let result = state.lookup.identifiers(&ident, &call_id.0).await;
    respond(LookupKind::Identifiers, result, &call_id)
}

pub async fn person(
    State(state): State<AppState>,
    call_id: CallId,
    body: Result<Json<IdentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let ident = ident_of(body, &call_id)?;
    let result = state.lookup.person(&ident, &call_id.0).await;
    respond(LookupKind::PersonInfo, result, &call_id)
}

pub async fn historical_identifiers(
    State(state): State<AppState>,
    call_id: CallId,
    body: Result<Json<IdentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let ident = ident_of(body, &call_id)?;
    let result = state.lookup.historical_identifiers(&ident, &call_id.0).await;
    respond(LookupKind::HistoricalIdentifiers, result, &call_id)
}

pub async fn guardianship(
    State(state): State<AppState>,
    call_id: CallId,
    body: Result<Json<IdentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let ident = ident_of(body, &call_id)?;
    let result = state.lookup.guardianship(&ident, &call_id.0).await;
    respond(LookupKind::Guardianship, result, &call_id)
}

pub async fn geo_affiliation(
    State(state): State<AppState>,
    call_id: CallId,
    body: Result<Json<IdentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let ident = ident_of(body, &call_id)?;
    let result = state.lookup.geo_affiliation(&ident, &call_id.0).await;
    respond(LookupKind::GeoAffiliation, result, &call_id)
}

#[derive(Debug, Serialize)]
struct StatusBody {
    status: &'static str,
}

pub async fn purge(
    State(state): State<AppState>,
    call_id: CallId,
    body: Result<Json<PurgeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::bad_request(e.body_text(), &call_id))?;

    match state.lookup.purge(&request.identifiers, &call_id.0).await {
        Ok(_) => Ok(Json(StatusBody { status: "OK" })),
        Err(e) => {
            tracing::error!(call_id = %call_id.0, error = %e, "Purge request failed");
            Err(ApiError::internal(e.to_string(), &call_id))
        }
    }
}

pub async fn isalive() -> impl IntoResponse {
    (StatusCode::OK, "ALIVE")
}

/// Ready when the cache store answers.
pub async fn isready(State(state): State<AppState>) -> impl IntoResponse {
    if state.lookup.store().is_available().await {
        (StatusCode::OK, "READY")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
    }
}

pub async fn metrics() -> impl IntoResponse {
    match crate::metrics::render_metrics() {
        Some(body) => (StatusCode::OK, body),
        None => (StatusCode::SERVICE_UNAVAILABLE, "metrics not initialized".to_string()),
    }
}
