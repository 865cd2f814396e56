use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    Form, Json,
};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::error::ApiError;

/// Request body extractor accepting either JSON or urlencoded form params.
///
/// Conventional HTTP test clients post form params, API clients post JSON;
/// both deserialize into the same parameter struct. A request with no
/// `Content-Type` and an empty body yields `T::default()`.
#[derive(Debug, Clone)]
pub struct Payload<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !req.headers().contains_key(CONTENT_TYPE) {
            let bytes = Bytes::from_request(req, state)
                .await
                .map_err(|e| rejection(e.status(), e.body_text()))?;
            if bytes.iter().all(u8::is_ascii_whitespace) {
                return Ok(Payload(T::default()));
            }
            return Err(ApiError::bad_request(
                "Expected request with `Content-Type: application/json`",
            ));
        }

        if is_form(&req) {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| rejection(e.status(), e.body_text()))?;
            Ok(Payload(value))
        } else {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| rejection(e.status(), e.body_text()))?;
            Ok(Payload(value))
        }
    }
}

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

fn rejection(status: StatusCode, text: String) -> ApiError {
    match status {
        StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge(text),
        StatusCode::UNPROCESSABLE_ENTITY => ApiError::unprocessable_entity(text, HashMap::new()),
        StatusCode::UNSUPPORTED_MEDIA_TYPE => ApiError::bad_request(text),
        _ => ApiError::invalid_json(text),
    }
}
