//! Lenient JSON body extractor.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// Like [`axum::Json`], but an empty or `null` body reads as `T::default()`
/// and no `Content-Type` header is required.
///
/// Missing fields then surface as handler-level validation errors (400)
/// instead of extractor rejections.
#[derive(Debug, Clone, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::validation(e.body_text()))?;

        parse_body(&bytes).map(JsonBody)
    }
}

fn parse_body<T: DeserializeOwned + Default>(bytes: &[u8]) -> Result<T, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| ApiError::validation(format!("Invalid JSON body: {}", e)))?;

    if value.is_null() {
        return Ok(T::default());
    }

    serde_json::from_value(value)
        .map_err(|e| ApiError::validation(format!("Invalid request body: {}", e)))
}
