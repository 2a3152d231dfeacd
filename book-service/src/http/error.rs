use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::model::ValidationError;
use crate::repository::RepoError;

/// Failure of a request, rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid book ID")]
    InvalidId,
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("invalid request body: {0}")]
    Validation(#[from] ValidationError),
    #[error("book not found")]
    NotFound,
    #[error(transparent)]
    Repository(#[from] RepoError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidId | Self::InvalidBody(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::Repository(RepoError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::Repository(RepoError::NotFound(_)) => "book not found".to_string(),
            Self::Repository(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        Self::InvalidId
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // The request span's response event carries this to the log.
        tracing::Span::current().record("error", tracing::field::display(&self));
        let body = Json(json!({ "error": self.public_message() }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(ApiError::InvalidId.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Validation(ValidationError::MissingYear).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Repository(RepoError::NotFound(Uuid::new_v4())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Repository(RepoError::InvalidData("bad row".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn storage_details_stay_out_of_the_body() {
        let error = ApiError::Repository(RepoError::InvalidData("secret row".into()));
        assert_eq!(error.public_message(), "internal server error");
    }
}
