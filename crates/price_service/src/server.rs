//! HTTP surface: HTML form, JSON API and health check

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use housepk_core::RawRequest;
use serde::Serialize;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::errors::ServiceError;
use crate::health::HealthReport;
use crate::pages;
use crate::service::{Prediction, PredictionService};

pub type SharedService = Arc<PredictionService>;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

/// JSON error response
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    fn new<S: Into<String>>(status: StatusCode, message: S) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: message.into(),
                field: None,
                value: None,
            },
        }
    }

    fn payload_required() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "JSON payload required")
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let status = status_for(&err);
        match err {
            ServiceError::Validation(err) => Self {
                status,
                body: ErrorResponse {
                    error: err.to_string(),
                    field: Some(err.feature().to_string()),
                    value: err.value().map(str::to_string),
                },
            },
            other => Self::new(status, other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// HTML error page response
#[derive(Debug)]
struct PageError {
    status: StatusCode,
    message: String,
}

impl From<ServiceError> for PageError {
    fn from(err: ServiceError) -> Self {
        Self {
            status: status_for(&err),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        (self.status, Html(pages::error_page(&self.message))).into_response()
    }
}

fn status_for(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::ServiceNotReady => StatusCode::SERVICE_UNAVAILABLE,
        ServiceError::ArtifactLoadFailure { .. } | ServiceError::AlreadyLoaded => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub async fn start_server(service: SharedService, addr: &str) -> Result<()> {
    let app = build_router(service);
    let listener = bind_listener(addr).await?;
    info!("Listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("prediction server terminated unexpectedly")
}

async fn bind_listener(addr: &str) -> Result<tokio::net::TcpListener> {
    if let Ok(socket_addr) = addr.parse::<SocketAddr>() {
        tokio::net::TcpListener::bind(socket_addr)
            .await
            .with_context(|| format!("failed to bind listener on {socket_addr}"))
    } else {
        tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind listener on {addr}"))
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

pub fn build_router(service: SharedService) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/predict", post(handle_form_predict))
        .route("/api/predict", post(handle_api_predict))
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn handle_index(State(service): State<SharedService>) -> Result<Html<String>, PageError> {
    let fields = service.form_fields()?;
    Ok(Html(pages::index_page(fields)))
}

async fn handle_form_predict(
    State(service): State<SharedService>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<Html<String>, PageError> {
    if !service.is_ready() {
        return Err(ServiceError::ServiceNotReady.into());
    }

    let Form(pairs) = form.map_err(|rejection| PageError {
        status: rejection.status(),
        message: rejection.body_text(),
    })?;
    let request = RawRequest::from_form(pairs);
    let prediction = service.predict(&request)?;
    debug!("Form prediction: {}", prediction.formatted);

    let summary: Vec<(String, String)> = service
        .form_fields()?
        .iter()
        .map(|field| {
            let submitted = request
                .get(&field.name)
                .map(|value| value.render().into_owned())
                .unwrap_or_default();
            (field.label.clone(), submitted)
        })
        .collect();

    Ok(Html(pages::result_page(
        &prediction.formatted,
        prediction.value,
        &summary,
    )))
}

async fn handle_api_predict(
    State(service): State<SharedService>,
    body: Bytes,
) -> Result<Json<Prediction>, ApiError> {
    if !service.is_ready() {
        return Err(ServiceError::ServiceNotReady.into());
    }

    let object = match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Object(object)) if !object.is_empty() => object,
        _ => return Err(ApiError::payload_required()),
    };

    let prediction = service.predict(&RawRequest::from_json(&object))?;
    debug!("API prediction: {}", prediction.formatted);
    Ok(Json(prediction))
}

async fn handle_health(State(service): State<SharedService>) -> Json<HealthReport> {
    Json(service.health())
}
