use axum::{ http::StatusCode, response::{ IntoResponse, Response }, Json };
use serde_json::{ json, Value };
use std::time::Duration;
use thiserror::Error;

/// Everything that can terminate a relay request. Every failure is
/// terminal: no retries, nothing swallowed, and each variant carries a
/// stable wire kind so the client can tell a failed request apart from
/// an empty answer.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("no API key configured for provider '{0}'")]
    MissingCredentials(&'static str),

    #[error("failed to reach upstream provider: {0}")]
    UpstreamUnreachable(String),

    #[error("upstream provider returned status {status}")]
    UpstreamError {
        status: u16,
        detail: Value,
    },

    #[error("upstream provider did not answer within {}s", .0.as_secs())]
    UpstreamTimeout(Duration),

    #[error("upstream provider returned an unexpected body")]
    UnexpectedUpstreamShape {
        raw: Value,
    },
}

impl RelayError {
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::InvalidRequest(_) => "invalid_request",
            RelayError::MethodNotAllowed => "method_not_allowed",
            RelayError::MissingCredentials(_) => "missing_credentials",
            RelayError::UpstreamUnreachable(_) => "upstream_unreachable",
            RelayError::UpstreamError { .. } => "upstream_error",
            RelayError::UpstreamTimeout(_) => "upstream_timeout",
            RelayError::UnexpectedUpstreamShape { .. } => "unexpected_upstream_shape",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            // Pass the upstream status through when it is an error status
            // of its own, otherwise report a plain server error.
            RelayError::UpstreamError { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            RelayError::MissingCredentials(_)
            | RelayError::UpstreamUnreachable(_)
            | RelayError::UnexpectedUpstreamShape { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn detail(&self) -> Option<Value> {
        match self {
            RelayError::InvalidRequest(message) => Some(json!(message)),
            RelayError::MethodNotAllowed => None,
            RelayError::MissingCredentials(provider) => {
                Some(json!(format!("set CHAT_API_KEY for provider '{}'", provider)))
            }
            RelayError::UpstreamUnreachable(message) => Some(json!(message)),
            RelayError::UpstreamError { detail, .. } => Some(detail.clone()),
            RelayError::UpstreamTimeout(deadline) => {
                Some(json!(format!("no response within {}s", deadline.as_secs())))
            }
            RelayError::UnexpectedUpstreamShape { raw } => Some(raw.clone()),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let mut body = json!({ "error": self.kind() });
        if let Some(detail) = self.detail() {
            body["detail"] = detail;
        }
        (self.status(), Json(body)).into_response()
    }
}
