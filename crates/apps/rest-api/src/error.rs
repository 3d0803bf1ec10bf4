use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use todo_feature::TodoFeatureError;
use user_feature::UserFeatureError;

/// API-level error taxonomy
///
/// Validation → 400 with the raw detail, Unauthorized → 401 with an empty
/// body, NotFound → 404. Persistence failures surface as Validation; nothing
/// is retried.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found")]
    NotFound,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(detail) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": detail }))).into_response()
            }
            ApiError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, Json(json!({}))).into_response()
            }
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
        }
    }
}

impl From<TodoFeatureError> for ApiError {
    fn from(err: TodoFeatureError) -> Self {
        match err {
            TodoFeatureError::NotFound(_) => ApiError::NotFound,
            other => ApiError::Validation(other.to_string()),
        }
    }
}

impl From<UserFeatureError> for ApiError {
    fn from(err: UserFeatureError) -> Self {
        match err {
            UserFeatureError::Unauthorized => ApiError::Unauthorized,
            other => ApiError::Validation(other.to_string()),
        }
    }
}
