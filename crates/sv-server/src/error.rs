use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use sv_namespace::NamespaceError;
use sv_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Namespace(#[from] NamespaceError),

    #[error("store unavailable: {0}")]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Namespace(e) => match e {
                NamespaceError::InvalidName { .. }
                | NamespaceError::InvalidIdentifier { .. }
                | NamespaceError::MalformedKey { .. } => StatusCode::BAD_REQUEST,
                NamespaceError::NotFound { .. } => StatusCode::NOT_FOUND,
                NamespaceError::Conflict { .. } | NamespaceError::AmbiguousKey { .. } => {
                    StatusCode::CONFLICT
                }
                NamespaceError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                NamespaceError::InvariantViolation { .. } | NamespaceError::Config(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = match &self {
            Self::Namespace(NamespaceError::AmbiguousKey { candidates, .. }) => json!({
                "message": "Multiple character sheets found with the same key",
                "keys": candidates,
            }),
            Self::Namespace(NamespaceError::NotFound { .. }) => json!({
                "message": "Character sheet not found",
            }),
            other => json!({ "message": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
