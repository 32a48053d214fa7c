//! Last-resort translation of errors into client-visible replies.
//!
//! Only two replies come out of here: 401 for authentication failures and
//! 500 for everything else. Client errors with a plain `{message}` body are
//! mapped earlier by [`AppError::route_reply`].

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::AppError;

/// A status and JSON body, written to the transport exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let internal = self.status == StatusCode::INTERNAL_SERVER_ERROR;
        let mut response = (self.status, Json(self.body)).into_response();
        if internal {
            response.extensions_mut().insert(InternalDetail);
        }
        response
    }
}

/// Marks a 500 response whose body carries the error message and stack.
#[derive(Debug, Clone, Copy)]
pub struct InternalDetail;

pub const REDACTED_MESSAGE: &str = "An internal server error occurred";

/// Response mapper that swaps the body of marked 500 responses for a
/// generic message. Installed in production.
pub async fn redact_internal_detail(mut response: Response) -> Response {
    if response.extensions_mut().remove::<InternalDetail>().is_none() {
        return response;
    }
    (response.status(), Json(json!({ "message": REDACTED_MESSAGE }))).into_response()
}

/// Outcome of [`translate`].
#[derive(Debug)]
pub enum Translation {
    /// Write this reply.
    Respond(Reply),
    /// The response was already committed; hand the error on untouched.
    Forward(AppError),
}

/// Translate `error` into a reply, unless the response has already been
/// committed (`headers_sent`), in which case the error is forwarded as is.
pub fn translate(error: AppError, headers_sent: bool) -> Translation {
    if headers_sent {
        return Translation::Forward(error);
    }

    let error_id = Uuid::now_v7();

    let reply = match error {
        AppError::Unauthorized { code, message } => {
            tracing::warn!(
                error_id = %error_id,
                error_code = %code,
                status_code = 401,
                "request unauthorized"
            );
            Reply {
                status: StatusCode::UNAUTHORIZED,
                body: json!({ "code": code, "message": message }),
            }
        }
        other => {
            let stack = render_stack(&other);
            tracing::error!(
                error_id = %error_id,
                status_code = 500,
                error = %other,
                "Request error"
            );
            Reply {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: internal_body(other.to_string(), stack),
            }
        }
    };

    Translation::Respond(reply)
}

fn render_stack(error: &AppError) -> String {
    match error {
        // anyhow's debug form carries the cause chain and any captured backtrace
        AppError::Internal(inner) => format!("{inner:?}"),
        other => format!("{other:?}"),
    }
}

fn internal_body(message: String, stack: String) -> Value {
    json!({ "message": message, "stack": stack })
}

/// Panic hook for `tower_http::catch_panic::CatchPanicLayer`.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    let error = AppError::internal(anyhow::anyhow!("handler panicked: {detail}"));
    match translate(error, false) {
        Translation::Respond(reply) => reply.into_response(),
        Translation::Forward(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}
