//! Error handling for the shelf HTTP layer

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::translate::{self, Reply, Translation};

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Forbidden { message: String },

    #[error("{message}")]
    Unauthorized { code: String, message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create an unauthorized error with a machine-readable code
    pub fn unauthorized(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Wrap any error as an unclassified internal failure
    pub fn internal(error: impl Into<anyhow::Error>) -> Self {
        Self::Internal(error.into())
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Route-level mapping for client errors whose body is exactly `{message}`.
    ///
    /// Authentication and unclassified errors are handed back for the
    /// [`translate`](crate::translate::translate) step.
    pub fn route_reply(self) -> Result<Reply, AppError> {
        let status = match &self {
            AppError::Validation { .. } | AppError::Conflict { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::Unauthorized { .. } | AppError::Internal(_) => return Err(self),
        };

        tracing::debug!(status_code = %status.as_u16(), message = %self, "request rejected");

        Ok(Reply {
            status,
            body: json!({ "message": self.to_string() }),
        })
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error = match self.route_reply() {
            Ok(reply) => return reply.into_response(),
            Err(error) => error,
        };

        // A handler's own response is never committed before its error is
        // produced, so the forward branch is unreachable here.
        match translate::translate(error, false) {
            Translation::Respond(reply) => reply.into_response(),
            Translation::Forward(error) => {
                tracing::error!(error = %error, "error forwarded without a committed response");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
