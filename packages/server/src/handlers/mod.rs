pub mod item;

use crate::error::AppError;

/// Envelope-shaped 404 for unmatched routes.
pub async fn fallback() -> AppError {
    AppError::NotFound("Route not found".into())
}
