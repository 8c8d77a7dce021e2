//! Router, shared state and the page/asset handler.

use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::{Request, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::ServerConfig;
use crate::proxy;
use crate::spa::{RouteDecision, classify};

// -----------------------------------------------------------------------
// State
// -----------------------------------------------------------------------

#[derive(Debug)]
pub struct Inner {
    pub root: PathBuf,
    pub index: PathBuf,
    pub client: reqwest::Client,
    pub ads_token: Option<String>,
    pub ads_api_prefix: String,
    pub proxy_timeout: Duration,
}

/// State shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState(Arc<Inner>);

impl std::ops::Deref for AppState {
    type Target = Inner;

    fn deref(&self) -> &Inner {
        &self.0
    }
}

impl AppState {
    pub fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(proxy::USER_AGENT)
            .build()?;
        Ok(Self(Arc::new(Inner {
            root: config.root.clone(),
            index: config.index_file(),
            client,
            ads_token: config.ads_token.clone(),
            ads_api_prefix: config.ads_api_prefix.clone(),
            proxy_timeout: config.proxy_timeout(),
        })))
    }
}

// -----------------------------------------------------------------------
// CORS
// -----------------------------------------------------------------------

/// Add the permissive CORS headers to `response`.
pub fn with_cors(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization"),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static("86400"),
    );
    response
}

/// Answer every `OPTIONS` request with `200` and the CORS headers.
async fn preflight(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return with_cors(StatusCode::OK.into_response());
    }
    next.run(request).await
}

// -----------------------------------------------------------------------
// Pages and assets
// -----------------------------------------------------------------------

async fn site(State(state): State<AppState>, request: Request) -> Response {
    let method = request.method();
    if *method == Method::POST {
        return (StatusCode::NOT_FOUND, "Endpoint not found").into_response();
    }
    if *method != Method::GET && *method != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let path = request.uri().path().to_string();
    match classify(&path) {
        RouteDecision::Redirect(clean) => {
            log::debug!("Redirecting {path} to {clean}");
            (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, clean)]).into_response()
        },
        RouteDecision::SpaPage => {
            let served = ServeFile::new(&state.index).oneshot(request).await;
            into_response(served)
        },
        RouteDecision::Static => {
            let served = ServeDir::new(&state.root).oneshot(request).await;
            into_response(served)
        },
    }
}

fn into_response<R: IntoResponse>(served: Result<R, Infallible>) -> Response {
    match served {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ads-proxy", post(proxy::ads_proxy))
        .fallback(site)
        .layer(middleware::from_fn(preflight))
        .with_state(state)
}
