//! API server and routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use toolbridge_convert::{BatchReport, ConversionError, Converter, ProviderInfo};
use toolbridge_core::{DialectTag, ErrorKind, ParseDialectError};
use toolbridge_validate::ValidationReport;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use crate::config::{ServerConfig, ServerError};
use crate::wire::{
    BatchValidateRequest, ConvertRequest, ConvertResponse, ErrorResponse, ProvidersResponse,
    ValidateRequest,
};

/// Shared handler state
#[derive(Debug, Clone)]
pub struct ApiState {
    /// The engine
    pub converter: Arc<Converter>,
}

/// A failed request, rendered as `{success: false, error}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Response status
    pub status: StatusCode,
    /// Error text
    pub message: String,
}

impl ApiError {
    /// 400 with `message`
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// 404 with `message`
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

/// Status code for an engine error kind
#[must_use]
pub fn status_for(kind: ErrorKind) -> StatusCode {
    if !kind.is_client_error() {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    match kind {
        ErrorKind::UnsupportedFeature | ErrorKind::Rejected => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::BAD_REQUEST,
    }
}

impl From<ConversionError> for ApiError {
    fn from(err: ConversionError) -> Self {
        Self {
            status: status_for(err.kind()),
            message: err.to_string(),
        }
    }
}

impl From<ParseDialectError> for ApiError {
    fn from(err: ParseDialectError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            success: false,
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Build the router over `converter`
pub fn create_router(converter: Converter) -> Router {
    let state = ApiState {
        converter: Arc::new(converter),
    };

    Router::new()
        .route("/health", get(health_check))
        .route("/api/providers", get(list_providers))
        .route("/api/providers/{name}/info", get(provider_info))
        .route("/api/convert", post(convert))
        .route("/api/validate", post(validate))
        .route("/api/validate/batch", post(validate_batch))
        .with_state(state)
}

/// HTTP server
pub struct ApiServer {
    config: ServerConfig,
    router: Router,
}

impl ApiServer {
    /// Build the server from its configuration
    ///
    /// # Errors
    ///
    /// Returns error if the engine configuration is invalid
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let mut router = create_router(config.converter()?).layer(TraceLayer::new_for_http());
        if config.cors {
            router = router.layer(CorsLayer::permissive());
        }
        Ok(Self { config, router })
    }

    /// Listen until the process is stopped
    ///
    /// # Errors
    ///
    /// Returns error if the address cannot be bound
    pub async fn serve(self) -> Result<(), ServerError> {
        let listener = tokio::net::TcpListener::bind(self.config.bind).await?;
        info!(bind = %self.config.bind, "toolbridge server listening");
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}

#[instrument(skip_all)]
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

#[instrument(skip_all)]
async fn list_providers(State(state): State<ApiState>) -> Json<ProvidersResponse> {
    Json(ProvidersResponse {
        providers: state.converter.providers(),
    })
}

#[instrument(skip_all)]
async fn provider_info(
    State(state): State<ApiState>,
    Path(name): Path<String>,
) -> Result<Json<ProviderInfo>, ApiError> {
    let tag: DialectTag = name
        .parse()
        .map_err(|e: ParseDialectError| ApiError::not_found(e.to_string()))?;
    state
        .converter
        .provider_info(tag)
        .map(Json)
        .map_err(|e| ApiError::not_found(e.to_string()))
}

#[instrument(skip_all)]
async fn convert(
    State(state): State<ApiState>,
    body: Result<Json<ConvertRequest>, JsonRejection>,
) -> Result<Json<ConvertResponse>, ApiError> {
    let Json(request) = body?;
    let source: DialectTag = request.source_provider.parse()?;
    let target: DialectTag = request.target_provider.parse()?;
    let strict = request
        .strict
        .unwrap_or_else(|| state.converter.default_strict());

    let conversion = state
        .converter
        .convert(&request.source_schema, source, target, strict)?;
    Ok(Json(ConvertResponse {
        success: true,
        target_schema: conversion.document,
        source_provider: source,
        target_provider: target,
        diagnostics: conversion.diagnostics,
    }))
}

#[instrument(skip_all)]
async fn validate(
    State(state): State<ApiState>,
    body: Result<Json<ValidateRequest>, JsonRejection>,
) -> Result<Json<ValidationReport>, ApiError> {
    let Json(request) = body?;
    let provider: DialectTag = request.provider.parse()?;
    let report = state
        .converter
        .validate(&request.schema, provider, request.strict)?;
    Ok(Json(report))
}

#[instrument(skip_all)]
async fn validate_batch(
    State(state): State<ApiState>,
    body: Result<Json<BatchValidateRequest>, JsonRejection>,
) -> Result<Json<BatchReport>, ApiError> {
    let Json(request) = body?;
    if request.schemas.len() != request.providers.len() {
        return Err(ApiError::bad_request(
            "schemas and providers must have the same length",
        ));
    }

    let items = request
        .schemas
        .into_iter()
        .zip(&request.providers)
        .map(|(schema, provider)| -> Result<_, ApiError> {
            Ok((schema, provider.parse::<DialectTag>()?))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(state.converter.validate_batch(&items, request.strict)?))
}
