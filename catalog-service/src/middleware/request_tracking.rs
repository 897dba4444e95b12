//! Request id generation, propagation and sensitive header masking

use http::HeaderName;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
};

use crate::config::RequestTrackingConfig;
use crate::ids::MakeTypedRequestId;

/// Sensitive headers that should be masked in logs
pub const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "cookie",
    "set-cookie",
    "x-api-key",
    "x-auth-token",
];

const DEFAULT_REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Header carrying the request id, falling back to `x-request-id` when the
/// configured name is not a valid header name
pub fn request_id_header(config: &RequestTrackingConfig) -> HeaderName {
    HeaderName::try_from(config.request_id_header.as_str()).unwrap_or_else(|_| {
        tracing::warn!(
            header = %config.request_id_header,
            "Invalid request id header name, using x-request-id"
        );
        DEFAULT_REQUEST_ID_HEADER
    })
}

/// Generate a `req_...` id for requests that arrive without one
pub fn request_id_layer(config: &RequestTrackingConfig) -> SetRequestIdLayer<MakeTypedRequestId> {
    SetRequestIdLayer::new(request_id_header(config), MakeTypedRequestId)
}

/// Copy the request id onto the response
pub fn request_id_propagation_layer(config: &RequestTrackingConfig) -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(request_id_header(config))
}

pub fn sensitive_headers_layer() -> SetSensitiveRequestHeadersLayer {
    let headers = SENSITIVE_HEADERS
        .iter()
        .copied()
        .map(HeaderName::from_static)
        .collect::<Vec<_>>();

    SetSensitiveRequestHeadersLayer::new(headers)
}
