use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::services::ItemError;
use crate::state::AppState;

const INTERNAL_MESSAGE: &str = "An unexpected error occurred";

/// Structured error response returned by all endpoints on failure.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// Machine-readable error code. One of: `VALIDATION_ERROR`,
    /// `ATTACHMENT_REJECTED`, `NOT_FOUND`, `CONFLICT`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "name is required")]
    pub message: String,
    /// Internal failure detail, only present when the server runs with
    /// `expose_internal_errors`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorBody {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code,
            message: message.into(),
            detail: None,
        }
    }
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    AttachmentRejected(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

/// Failure detail carried on a 500 response for [`expose_internal_detail`].
#[derive(Debug, Clone)]
pub struct InternalDetail(pub String);

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody, Option<InternalDetail>) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("VALIDATION_ERROR", msg),
                None,
            ),
            AppError::AttachmentRejected(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("ATTACHMENT_REJECTED", msg),
                None,
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody::new("NOT_FOUND", msg),
                None,
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorBody::new("CONFLICT", msg),
                None,
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("INTERNAL_ERROR", INTERNAL_MESSAGE),
                    Some(InternalDetail(detail)),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body, detail) = self.status_and_body();
        let mut response = (status, Json(body)).into_response();
        if let Some(detail) = detail {
            response.extensions_mut().insert(detail);
        }
        response
    }
}

/// Re-render internal errors with their `detail` when
/// `server.expose_internal_errors` is enabled for this router.
pub async fn expose_internal_detail(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let Some(InternalDetail(detail)) = response.extensions_mut().remove::<InternalDetail>() else {
        return response;
    };
    if !state.config.server.expose_internal_errors {
        return response;
    }

    let mut body = ErrorBody::new("INTERNAL_ERROR", INTERNAL_MESSAGE);
    body.detail = Some(detail);
    (response.status(), Json(body)).into_response()
}

impl From<ItemError> for AppError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::Validation(msg) => AppError::Validation(msg),
            ItemError::Attachment(msg) => AppError::AttachmentRejected(msg),
            ItemError::NotFound => AppError::NotFound(err.to_string()),
            ItemError::Conflict(msg) => AppError::Conflict(msg),
            ItemError::Storage(detail) => AppError::Internal(detail),
        }
    }
}
