use axum::{ body::Bytes, extract::State, Json };
use log::{ info, warn };
use serde_json::{ json, Value };
use std::time::Duration;

use crate::error::RelayError;
use crate::models::relay::{ AskBody, RelayRequest };
use crate::server::AppState;

/// The relay core: validate the inbound body, forward it to the one
/// configured provider, and return `{ "text": ... }` whatever provider
/// is active. Stateless; at most one outbound call per request.
pub async fn relay_handler(
    State(state): State<AppState>,
    body: Bytes
) -> Result<Json<Value>, RelayError> {
    let body: AskBody = serde_json::from_slice(&body).map_err(|e| {
        RelayError::InvalidRequest(format!("body is not a JSON object: {}", e))
    })?;
    let request = RelayRequest::from_body(body)?;

    if !state.adapter.has_credentials() {
        warn!(
            "Refusing relay request: no credentials for provider '{}'",
            state.adapter.name()
        );
        return Err(RelayError::MissingCredentials(state.adapter.name()));
    }

    let text = forward(&state, &request).await?;
    Ok(Json(json!({ "text": text })))
}

/// Structured 405 for anything other than POST on the relay routes.
pub async fn method_not_allowed() -> RelayError {
    RelayError::MethodNotAllowed
}

async fn forward(state: &AppState, request: &RelayRequest) -> Result<String, RelayError> {
    let adapter = &state.adapter;
    let payload = adapter.build_request(request);

    let mut outbound = state.http.post(adapter.endpoint()).json(&payload);
    for (name, value) in adapter.headers() {
        outbound = outbound.header(name, value);
    }

    info!("Relaying prompt to provider '{}'", adapter.name());
    let response = outbound
        .send().await
        .map_err(|e| classify_transport_error(e, state.upstream_timeout))?;

    let status = response.status();
    let raw = response
        .text().await
        .map_err(|e| classify_transport_error(e, state.upstream_timeout))?;
    let body = serde_json::from_str::<Value>(&raw).unwrap_or_else(|_| Value::String(raw));

    if !status.is_success() {
        warn!("Provider '{}' returned status {}", adapter.name(), status);
        return Err(RelayError::UpstreamError {
            status: status.as_u16(),
            detail: body,
        });
    }

    adapter.parse_response(&body)
}

fn classify_transport_error(err: reqwest::Error, deadline: Duration) -> RelayError {
    if err.is_timeout() {
        RelayError::UpstreamTimeout(deadline)
    } else {
        RelayError::UpstreamUnreachable(err.to_string())
    }
}
