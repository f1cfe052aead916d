//! HTTP router and server

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, HeaderValue, Method, Request},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers;
use crate::state::AppState;

/// Maximum request body size (64KB)
const MAX_BODY_SIZE: usize = 64 * 1024;

/// Log remote address, method, URI, status and latency of every request
async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.to_string())
        .unwrap_or_else(|| "-".to_string());
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;
    tracing::info!(
        "{} {} {} {} {:?}",
        remote,
        method,
        uri,
        response.status().as_u16(),
        start.elapsed()
    );
    response
}

/// Only pages served from the local listen port may call the API
fn cors_layer(listen: &str) -> CorsLayer {
    let port = listen.rsplit(':').next().unwrap_or_default();
    let origins: Vec<HeaderValue> = ["localhost", "127.0.0.1"]
        .iter()
        .filter_map(|host| HeaderValue::from_str(&format!("http://{}:{}", host, port)).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config().listen);

    Router::new()
        .route("/api/search", get(handlers::search))
        .route("/api/typeahead", get(handlers::typeahead))
        .route("/api/open", post(handlers::open))
        .route("/api/reindex", post(handlers::reindex))
        .route("/health", get(handlers::health))
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

/// Run the HTTP server until interrupted
pub async fn run_server(state: Arc<AppState>) -> anyhow::Result<()> {
    let addr = state.config().listen.clone();
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("codesift listening on http://{}", addr);
    tracing::info!("  Search: http://{}/api/search?q=", addr);
    tracing::info!("  Typeahead: http://{}/api/typeahead?q=", addr);
    tracing::info!("  Health check: http://{}/health", addr);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}
