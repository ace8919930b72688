//! Correlation id resolution for incoming requests.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use common::CorrelationId;

/// Header carrying the correlation id, in both directions.
pub const CORRELATION_HEADER: &str = "x-correlation-id";

/// Resolves the request's correlation id and echoes it on the response.
///
/// A usable `X-Correlation-ID` header is taken as is; otherwise a fresh id is
/// generated. The id is stored in the request extensions for [`Correlation`].
pub async fn propagate(mut request: Request, next: Next) -> Response {
    let correlation_id = resolve(request.headers());
    request.extensions_mut().insert(correlation_id.clone());

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(correlation_id.as_str()) {
        response.headers_mut().insert(CORRELATION_HEADER, value);
    }
    response
}

fn resolve(headers: &HeaderMap) -> CorrelationId {
    headers
        .get(CORRELATION_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(CorrelationId::parse)
        .unwrap_or_else(CorrelationId::generate)
}

/// Extractor for the current request's correlation id.
#[derive(Debug, Clone)]
pub struct Correlation(pub CorrelationId);

impl<S: Send + Sync> FromRequestParts<S> for Correlation {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let correlation_id = parts
            .extensions
            .get::<CorrelationId>()
            .cloned()
            .unwrap_or_else(|| resolve(&parts.headers));
        Ok(Correlation(correlation_id))
    }
}
