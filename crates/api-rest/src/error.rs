//! Mapping from core errors to HTTP responses.

use api_shared::ErrorRes;
use ausome_core::WorksheetError;
use axum::{http::StatusCode, Json};

pub type ApiError = (StatusCode, Json<ErrorRes>);
pub type ApiResult<T> = Result<T, ApiError>;

fn error(status: StatusCode, kind: &str, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorRes {
            kind: kind.into(),
            message: message.into(),
        }),
    )
}

pub fn session_not_found(id: &str) -> ApiError {
    error(
        StatusCode::NOT_FOUND,
        "not_found",
        format!("session {} not found", id),
    )
}

/// - Missing input: `422 missing_input`
/// - Other rejected input: `422 invalid_input`
/// - Failed generation call: `502 generation_failed`
pub fn worksheet(err: WorksheetError) -> ApiError {
    match &err {
        WorksheetError::Generation(_) => {
            error(StatusCode::BAD_GATEWAY, "generation_failed", err.to_string())
        }
        WorksheetError::MissingInput(_) => {
            tracing::warn!("rejected request: {}", err);
            error(StatusCode::UNPROCESSABLE_ENTITY, "missing_input", err.to_string())
        }
        _ => {
            tracing::warn!("rejected request: {}", err);
            error(StatusCode::UNPROCESSABLE_ENTITY, "invalid_input", err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ausome_core::GenerationError;

    #[test]
    fn user_input_maps_to_unprocessable() {
        let (status, Json(body)) = worksheet(WorksheetError::MissingInput("activity topic"));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.kind, "missing_input");

        let (status, Json(body)) = worksheet(WorksheetError::AgeOutOfRange(40));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.kind, "invalid_input");
    }

    #[test]
    fn generation_failures_map_to_bad_gateway() {
        let (status, Json(body)) = worksheet(GenerationError::AuthFailed.into());
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.kind, "generation_failed");
        assert!(body.message.contains("API key"));
    }
}
