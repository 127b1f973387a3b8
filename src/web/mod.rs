//! HTTP interaction layer.
//!
//! Every request carries the current selection and date window; handlers
//! resolve them and rebuild the requested views from the shared dataset.
//! Nothing is cached between requests.

pub mod handlers;
pub mod state;

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::core::DashError;

pub use state::AppState;

/// Successful response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug)]
pub enum WebError {
    Dashboard(DashError),
}

impl From<DashError> for WebError {
    fn from(err: DashError) -> Self {
        WebError::Dashboard(err)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message, code) = match self {
            WebError::Dashboard(err) if err.is_validation() => {
                (StatusCode::BAD_REQUEST, err.to_string(), err.code().to_string())
            }
            WebError::Dashboard(err) => {
                error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    err.to_string(),
                    err.code().to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: message,
            code,
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, WebError>;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/v1/summary", get(handlers::summary))
        .route("/api/v1/catalog", get(handlers::catalog))
        .route("/api/v1/charts/line", get(handlers::line))
        .route(
            "/api/v1/charts/parallel-coordinates",
            get(handlers::parallel_coordinates),
        )
        .route("/api/v1/charts/pie", get(handlers::pie))
        .route("/api/v1/charts/choropleth", get(handlers::choropleth))
        .route(
            "/api/v1/dashboard",
            get(handlers::dashboard).post(handlers::dashboard_body),
        )
        .route("/api/v1/snapshot", get(handlers::snapshot))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
