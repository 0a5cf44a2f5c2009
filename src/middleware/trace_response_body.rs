use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http_body_util::BodyExt;

use crate::{
    error::{ApiError, ErrorVerbosityProvider, InternalServerError},
    state::ApiState,
};

/// Logs every inventory response body next to the request that produced it.
///
/// The body is buffered in full before it is passed on, so this is only enabled
/// through `trace_response_body` in the config.
pub async fn trace_response_body(
    State(state): State<ApiState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let method = req.method().clone();
    let uri = req.uri().clone();

    let (parts, body) = next.run(req).await.into_parts();

    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            tracing::warn!(%method, %uri, "Failed to buffer response body");

            return Err(
                InternalServerError::from_generic_error(state.error_verbosity(), err).into(),
            );
        }
    };

    let status = parts.status;
    match std::str::from_utf8(&bytes) {
        Ok(body) => tracing::trace!(%method, %uri, %status, %body, "Response body"),
        Err(_) => tracing::trace!(%method, %uri, %status, len = bytes.len(), "Binary response body"),
    }

    Ok(Response::from_parts(parts, Body::from(bytes)))
}
