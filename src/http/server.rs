//! HTTP server setup and the proxy pipeline.
//!
//! # Responsibilities
//! - Create Axum Router mounted at the configured path
//! - Wire up middleware (request ID, tracing)
//! - Bound each upstream exchange by the request timeout
//! - Answer preflights directly
//! - Run each request through RESOLVE → FORWARD → CLASSIFY → TRANSFORM → RESPOND
//! - Map any stage failure to the uniform 500 JSON error

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{Method, Request},
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{validate_config, ConfigError, ProxyConfig};
use crate::error::{ProxyError, ServerError};
use crate::http::landing::{landing_handler, LandingTarget};
use crate::http::request::{request_id, IncomingRequest, MakeRequestUuid};
use crate::http::response::{preflight_response, ResponseEnvelope};
use crate::http::upstream::UpstreamClient;
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::rewrite::{BodyTransformer, ContentKind};
use crate::routing::{DomainRegistry, TargetResolver, UpstreamTarget};
use crate::security::headers::{
    preserve_head_length, sanitize_request_headers, sanitize_response_headers,
};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: TargetResolver,
    pub upstream: UpstreamClient,
    pub transformer: Arc<BodyTransformer>,
    pub mount_prefix: Arc<str>,
    pub max_body_size: usize,
    pub request_timeout: Duration,
}

/// HTTP server for the mirror proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Validate the configuration and build every request-time component.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let mount_prefix = config.listener.mount_prefix();
        let registry = Arc::new(DomainRegistry::from_config(&config.origins, mount_prefix)?);
        let transformer = Arc::new(BodyTransformer::new(&registry));

        let state = AppState {
            resolver: TargetResolver::new(registry),
            upstream: UpstreamClient::new(&config.timeouts)?,
            transformer,
            mount_prefix: Arc::from(mount_prefix),
            max_body_size: config.limits.max_body_size,
            request_timeout: Duration::from_secs(config.timeouts.request_secs),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let mount = config.listener.mount_prefix();

        let proxy = if mount.is_empty() {
            Router::new()
                .route("/", any(proxy_handler))
                .route("/{*path}", any(proxy_handler))
        } else {
            Router::new()
                .route(mount, any(proxy_handler))
                .route(&format!("{mount}/"), any(proxy_handler))
                .route(&format!("{mount}/{{*path}}"), any(proxy_handler))
        };
        let mut router = proxy.with_state(state);

        if config.landing.enabled && !mount.is_empty() {
            let landing = Router::new()
                .route("/", get(landing_handler))
                .with_state(LandingTarget(mount.to_string()));
            router = router.merge(landing);
        }

        router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mount_path = %self.config.listener.mount_path,
            primary = %self.config.origins.primary,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Main proxy handler.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(request.headers());
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    if method == Method::OPTIONS {
        tracing::debug!(request_id = %request_id, path = %path, "Answering preflight");
        metrics::record_request(method.as_str(), 200, "none", start_time);
        return preflight_response();
    }

    let incoming =
        match IncomingRequest::extract(request, &state.mount_prefix, state.max_body_size).await {
            Ok(incoming) => incoming,
            Err(e) => return fail(&request_id, &method, &path, "none", e, start_time),
        };

    // 1. Resolve
    let target = state
        .resolver
        .resolve(&incoming.segments, incoming.query.as_deref());
    let upstream = target.kind.as_str();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        target = %target.url,
        "Proxying request"
    );

    let outcome = tokio::time::timeout(
        state.request_timeout,
        proxy_request(&state, incoming, &target, &request_id),
    )
    .await
    .unwrap_or_else(|_| {
        metrics::record_upstream_error(upstream);
        Err(ProxyError::Timeout(state.request_timeout))
    });

    match outcome {
        Ok(envelope) => {
            metrics::record_request(method.as_str(), envelope.status.as_u16(), upstream, start_time);
            envelope.into_response()
        }
        Err(e) => fail(&request_id, &method, &path, upstream, e, start_time),
    }
}

/// Forward, classify and transform one resolved request.
async fn proxy_request(
    state: &AppState,
    incoming: IncomingRequest,
    target: &UpstreamTarget,
    request_id: &str,
) -> Result<ResponseEnvelope, ProxyError> {
    // 2. Forward
    let is_head = incoming.method == Method::HEAD;
    let headers = sanitize_request_headers(&incoming.headers, target)?;
    let response = state
        .upstream
        .forward(target, incoming.method, headers, incoming.body)
        .await
        .inspect_err(|_| metrics::record_upstream_error(target.kind.as_str()))?;

    // 3. Classify
    let kind = ContentKind::classify(response.content_type());
    let mut headers = sanitize_response_headers(&response.headers);
    if is_head {
        preserve_head_length(&mut headers, &response.headers);
    }

    tracing::debug!(
        request_id = %request_id,
        target = %target.url,
        status = %response.status,
        content = kind.as_str(),
        "Upstream responded"
    );

    // 4. Transform
    let body = if is_head {
        Bytes::new()
    } else {
        let body = state.transformer.transform(kind, response.body)?;
        metrics::record_rewrite(kind.as_str());
        body
    };

    // 5. Respond
    Ok(ResponseEnvelope {
        status: response.status,
        headers,
        body,
    })
}

fn fail(
    request_id: &str,
    method: &Method,
    path: &str,
    upstream: &'static str,
    error: ProxyError,
    start_time: Instant,
) -> Response {
    tracing::error!(
        request_id = %request_id,
        method = %method,
        path = %path,
        upstream = upstream,
        error = %error,
        "Proxy request failed"
    );
    metrics::record_request(method.as_str(), 500, upstream, start_time);
    error.into_response()
}
