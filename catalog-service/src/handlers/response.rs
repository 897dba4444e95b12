//! JSON-LD response wrapper

use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::Error;

/// Content type of every catalog resource
pub const LD_JSON: &str = "application/ld+json; charset=utf-8";

/// Serialize `T` as the response body with an `application/ld+json` content type
///
/// # Example
///
/// ```rust
/// use axum::response::IntoResponse;
/// use catalog_service::handlers::{LdJson, LD_JSON};
///
/// let response = LdJson(serde_json::json!({"id": 1})).into_response();
/// assert_eq!(response.headers()["content-type"], LD_JSON);
/// ```
#[derive(Debug, Clone)]
pub struct LdJson<T>(pub T);

impl<T: Serialize> IntoResponse for LdJson<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(body) => (
                [(header::CONTENT_TYPE, HeaderValue::from_static(LD_JSON))],
                body,
            )
                .into_response(),
            Err(e) => Error::Internal(format!("Failed to serialize response: {}", e)).into_response(),
        }
    }
}
