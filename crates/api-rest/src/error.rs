use api_shared::ErrorRes;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use docstore_core::{DocumentError, ErrorKind};

/// A failed request: a core error rendered as `{"error": "..."}` with the matching status.
#[derive(Debug)]
pub struct ApiError(pub DocumentError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DocumentError> for ApiError {
    fn from(e: DocumentError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {:?}", self.0);
        } else {
            tracing::debug!("request rejected: {}", self.0);
        }

        (
            status,
            Json(ErrorRes {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}
