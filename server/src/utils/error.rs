use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;
use crate::utils::response::error_page;

/// Failures that abort a request.
///
/// Business outcomes such as an unknown code, a used ticket or bad admin
/// credentials are ordinary page content and never become an `AppError`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Store(StoreError::Database(sqlx::Error::PoolTimedOut)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Store(_) => "DATABASE_ERROR",
            AppError::Template(_) => "TEMPLATE_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::Store(e) => error!(error = ?e, "Database error"),
            AppError::Template(e) => error!(error = %e, "Template rendering failed"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log internal details
        self.log();

        // Only expose a high-level message to the visitor
        let public_message = match &self {
            AppError::Store(_) => "Le service est momentanément indisponible.",
            AppError::Template(_) => "Une erreur interne est survenue.",
        };

        error_page(self.code(), public_message, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_errors_are_server_errors() {
        let err = AppError::from(StoreError::DuplicateCode);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "DATABASE_ERROR");

        let err = AppError::from(StoreError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_response_hides_details() {
        let err = AppError::from(StoreError::Database(sqlx::Error::RowNotFound));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("momentanément indisponible"));
        assert!(!body.contains("RowNotFound"));
    }
}
