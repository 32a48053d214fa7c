//! Request extractors whose rejections are [`AppError`]s.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};

use crate::error::AppError;

/// `Json<T>` whose rejections become `400 {message}` through [`AppError`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, StatusCode},
        routing::post,
        Router,
    };
    use serde::Deserialize;
    use serde_json::Value;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    struct Greeting {
        name: String,
    }

    fn app() -> Router {
        Router::new().route(
            "/greet",
            post(|JsonBody(greeting): JsonBody<Greeting>| async move { greeting.name }),
        )
    }

    async fn post_body(content_type: Option<&str>, body: &str) -> (StatusCode, Value) {
        let mut builder = axum::http::Request::builder().method("POST").uri("/greet");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();

        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn well_formed_body_is_extracted() {
        let (status, _) = post_body(Some("application/json"), r#"{"name": "ada"}"#).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn rejections_become_400_with_message() {
        let cases = [
            (Some("application/json"), r#"{"name": 5}"#),
            (Some("application/json"), "not json"),
            (None, r#"{"name": "ada"}"#),
        ];

        for (content_type, body) in cases {
            let (status, json) = post_body(content_type, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?}");
            assert!(json["message"].as_str().is_some_and(|m| !m.is_empty()));
            assert_eq!(json.as_object().unwrap().len(), 1);
        }
    }
}
