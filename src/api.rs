use crate::aggregator::Aggregator;
use crate::card::{render_card, Layout, Theme};
use crate::error::WrappedError;
use crate::health;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

const CACHE_CONTROL: &str = "public, s-maxage=300, stale-while-revalidate=600";

/// Shared state for every route
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(aggregator: Arc<Aggregator>) -> Self {
        Self {
            aggregator,
            start_time: Instant::now(),
        }
    }
}

/// Response for errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Query parameters for the card endpoint
#[derive(Debug, Deserialize)]
pub struct CardParams {
    pub theme: Option<String>,
    pub layout: Option<String>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/github/:username", get(get_stats))
        .route("/api/github/:username/card.svg", get(get_card))
        .route("/health", get(health::health_check))
        .route("/healthz", get(health::health_check))
        .route("/livez", get(health::liveness_check))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Bind `0.0.0.0:{port}` and serve until Ctrl+C.
pub async fn start_server(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;

    Ok(())
}

/// Logins are letters, digits and hyphens.
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty() && username.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

fn aggregation_error(username: &str, e: WrappedError) -> Response {
    match e {
        e if e.is_not_found() => error_response(StatusCode::NOT_FOUND, "User not found"),
        WrappedError::InvalidUsername(message) => error_response(StatusCode::BAD_REQUEST, message),
        other => {
            error!(username, error = %other, "Aggregation failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

fn validate(username: &str) -> Result<(), WrappedError> {
    if username.is_empty() {
        return Err(WrappedError::InvalidUsername("Username is required".to_string()));
    }
    if !is_valid_username(username) {
        return Err(WrappedError::InvalidUsername("Invalid username format".to_string()));
    }
    Ok(())
}

/// Aggregated statistics as JSON
async fn get_stats(State(state): State<AppState>, Path(username): Path<String>) -> Response {
    if let Err(e) = validate(&username) {
        return aggregation_error(&username, e);
    }

    match state.aggregator.aggregate(&username).await {
        Ok(record) => (
            StatusCode::OK,
            [
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
                (header::ACCESS_CONTROL_ALLOW_METHODS, "GET"),
                (header::CACHE_CONTROL, CACHE_CONTROL),
            ],
            Json(record),
        )
            .into_response(),
        Err(e) => aggregation_error(&username, e),
    }
}

/// Shareable SVG card
async fn get_card(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(params): Query<CardParams>,
) -> Response {
    if let Err(e) = validate(&username) {
        return aggregation_error(&username, e);
    }

    let theme = match params.theme.as_deref().map(str::parse::<Theme>).transpose() {
        Ok(theme) => theme.unwrap_or_default(),
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };
    let layout = match params.layout.as_deref().map(str::parse::<Layout>).transpose() {
        Ok(layout) => layout.unwrap_or_default(),
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    match state.aggregator.aggregate(&username).await {
        Ok(record) => {
            let svg = render_card(&record, theme, layout, Utc::now().year());
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "image/svg+xml"),
                    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
                    (header::CACHE_CONTROL, CACHE_CONTROL),
                ],
                svg,
            )
                .into_response()
        }
        Err(e) => aggregation_error(&username, e),
    }
}
