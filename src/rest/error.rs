use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::tasks::FieldError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("task with id {0} not found")]
    NotFound(i64),

    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            Self::NotFound(_) => json!({ "error": self.to_string() }),
            Self::Validation(fields) => json!({
                "error": "validation failed",
                "fields": fields,
            }),
            Self::Internal(e) => {
                // The cause stays in the log; the body is generic.
                tracing::error!(err = format!("{e:#}"), "internal server error");
                json!({ "error": "internal server error" })
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(ApiError::NotFound(9).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::NotFound(9).to_string(), "task with id 9 not found");
    }

    #[test]
    fn validation_maps_to_400() {
        assert_eq!(
            ApiError::Validation(Vec::new()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn internal_maps_to_500() {
        let err = ApiError::Internal(anyhow::anyhow!("pool closed"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
