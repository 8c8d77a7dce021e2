//! ADS API proxy.
//!
//! The browser cannot hold the ADS token, so it posts the full API URL to
//! `/ads-proxy` and the server performs the request with the token
//! attached. Upstream HTTP errors are folded into a `200` JSON envelope
//! with an empty result set, so the client treats them as search errors
//! rather than transport failures.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::routes::{AppState, with_cors};

pub const USER_AGENT: &str = "GClusters-Web/1.0";

#[derive(Debug, Deserialize)]
struct ProxyRequest {
    url: Option<String>,
}

/// A proxy failure, answered with the JSON error envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyError {
    pub status: StatusCode,
    pub message: String,
}

impl ProxyError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// `{error, message, response: {docs: [], numFound: 0}}`.
pub fn envelope(error: &str, message: &str) -> Value {
    json!({
        "error": error,
        "message": message,
        "response": { "docs": [], "numFound": 0 },
    })
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = envelope("Request failed", &self.message);
        with_cors((self.status, Json(body)).into_response())
    }
}

/// Extract and check the target URL from a proxy request body.
pub fn validate_target(body: &[u8], allowed_prefix: &str) -> Result<String, ProxyError> {
    if body.is_empty() {
        return Err(ProxyError::new(StatusCode::BAD_REQUEST, "Missing request body"));
    }
    let request: ProxyRequest = serde_json::from_slice(body)
        .map_err(|_| ProxyError::new(StatusCode::BAD_REQUEST, "Invalid JSON in request"))?;
    match request.url {
        Some(url) if url.starts_with(allowed_prefix) => Ok(url),
        _ => Err(ProxyError::new(StatusCode::BAD_REQUEST, "Invalid ADS URL")),
    }
}

/// `POST /ads-proxy`.
pub async fn ads_proxy(State(state): State<AppState>, body: Bytes) -> Response {
    match forward(&state, &body).await {
        Ok(response) => response,
        Err(e) => {
            log::warn!("ADS proxy error {}: {}", e.status, e.message);
            e.into_response()
        },
    }
}

async fn forward(state: &AppState, body: &[u8]) -> Result<Response, ProxyError> {
    let target = validate_target(body, &state.ads_api_prefix)?;
    let Some(token) = state.ads_token.as_deref() else {
        return Err(ProxyError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "ADS_TOKEN not configured",
        ));
    };

    log::info!("Proxying ADS request to {target}");
    let upstream = state
        .client
        .get(&target)
        .header(reqwest::header::ACCEPT, "application/json")
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .bearer_auth(token)
        .timeout(state.proxy_timeout)
        .send()
        .await
        .map_err(|e| ProxyError::new(StatusCode::BAD_GATEWAY, format!("Network error: {e}")))?;

    let status = upstream.status();
    let bytes = upstream
        .bytes()
        .await
        .map_err(|_| ProxyError::new(StatusCode::BAD_GATEWAY, "ADS API unavailable"))?;

    if !status.is_success() {
        let text = String::from_utf8_lossy(&bytes);
        let message = if text.is_empty() {
            "Unknown ADS error"
        } else {
            text.as_ref()
        };
        log::warn!("ADS API Error {}: {message}", status.as_u16());
        let body = envelope(&format!("ADS API Error {}", status.as_u16()), message);
        return Ok(with_cors(Json(body).into_response()));
    }

    let mut response = (StatusCode::OK, bytes).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    Ok(with_cors(response))
}
