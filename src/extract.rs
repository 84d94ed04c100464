// Request body extractor that reports malformed JSON through the API envelope

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;

/// JSON request body
///
/// Same as [`axum::Json`] but a missing field, wrong type or unreadable body
/// becomes a 400 `ApiError` instead of axum's plain-text rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("Rejected request body: {}", rejection.body_text());
        ApiError::BadRequest("Please provide all required fields".to_string())
    }
}

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, StatusCode},
        response::IntoResponse,
    };
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        name: String,
    }

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_is_extracted() {
        let JsonBody(payload) = JsonBody::<Payload>::from_request(json_request(r#"{"name":"Asha"}"#), &())
            .await
            .unwrap();
        assert_eq!(payload.name, "Asha");
    }

    #[tokio::test]
    async fn test_missing_field_uses_error_envelope() {
        let error = JsonBody::<Payload>::from_request(json_request("{}"), &())
            .await
            .unwrap_err();
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Please provide all required fields");
    }

    #[tokio::test]
    async fn test_syntax_error_and_missing_content_type_are_bad_requests() {
        let broken = JsonBody::<Payload>::from_request(json_request("{\"name\":"), &()).await;
        assert!(matches!(broken, Err(ApiError::BadRequest(_))));

        let untyped = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(r#"{"name":"Asha"}"#))
            .unwrap();
        let result = JsonBody::<Payload>::from_request(untyped, &()).await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }
}
