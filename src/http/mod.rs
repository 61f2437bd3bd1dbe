//! HTTP API
//!
//! Thin axum layer over the table store: CSV upload, table listing and
//! PieQL queries.

pub mod queries;
pub mod tables;

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use parking_lot::RwLock;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::database::Database;
use crate::error::{Error, ErrorKind};
use crate::pieql::ParseError;

/// State shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<RwLock<Database>>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(RwLock::new(db)),
        }
    }
}

/// Error returned by handlers, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    Database(Error),
    BadRequest(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Database(err)
    }
}

impl From<ParseError> for ApiError {
    fn from(err: ParseError) -> Self {
        ApiError::Database(err.into())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::BadRequest(err.body_text())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Database(Error::TableNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Database(Error::TableExists(_)) => StatusCode::CONFLICT,
            ApiError::Database(err) => match err.kind() {
                ErrorKind::Validation | ErrorKind::Syntax => StatusCode::BAD_REQUEST,
                ErrorKind::Io => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Database(err) => err.to_string(),
            ApiError::BadRequest(message) => message,
        };
        if status.is_server_error() {
            warn!(%status, error = %message, "request failed");
        }

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Build the API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tables", get(tables::list_tables).post(tables::create_table))
        .route(
            "/tables/:name",
            get(tables::get_table).delete(tables::delete_table),
        )
        .route("/query", post(queries::execute_query))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
