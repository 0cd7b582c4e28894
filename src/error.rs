use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Error taxonomy for the HTTP surface. Every variant maps to a status code
/// and a `{"error": ...}` body; upstream failures keep their cause server-side
/// and show the client only an opaque message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    NotFound(String),

    #[error("{public}")]
    Upstream {
        public: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Wrap a database or external-API failure behind an opaque message.
    pub fn upstream(public: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Upstream {
            public: public.into(),
            source: source.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            // Duplicate registration surfaces as 400, not 409.
            ApiError::BadRequest(_) | ApiError::Conflict(_) | ApiError::InvalidCredentials => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream { public, source } => {
                error!(error = %source, public = %public, "upstream failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
