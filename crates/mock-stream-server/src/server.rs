// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Main server implementation

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
};
use std::future::Future;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Mock streaming server
pub struct Server {
    config: ServerConfig,
    state: AppState,
    app: Router,
}

impl Server {
    /// Create a server with the default collaborators
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        config.validate()?;
        let state = AppState::new(config.clone());
        Ok(Self::with_state(config, state))
    }

    /// Construct a server from an already-built app state
    pub fn with_state(config: ServerConfig, state: AppState) -> Self {
        let app = build_app(state.clone(), &config);
        Self { config, state, app }
    }

    /// The application router, for in-process testing
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Get the bind address
    pub fn addr(&self) -> SocketAddr {
        self.config.server.bind_addr
    }

    /// Run until Ctrl-C
    pub async fn run(self) -> ServerResult<()> {
        self.run_until(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %err, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run until `shutdown` resolves. Open streams are cancelled at that point
    /// so graceful shutdown does not wait on paced responses.
    pub async fn run_until<F>(self, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.server.bind_addr;
        info!("Starting server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|err| ServerError::Internal(format!("failed to bind {addr}: {err}")))?;

        let streams = self.state.shutdown.clone();
        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                shutdown.await;
                info!("shutting down, cancelling open streams");
                streams.cancel();
            })
            .await
            .map_err(|err| ServerError::Internal(format!("server error: {err}")))
    }
}

/// Build the Axum application with routes and middleware
pub fn build_app(state: AppState, config: &ServerConfig) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(if config.server.enable_cors {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            CorsLayer::new()
                .allow_origin(vec![
                    HeaderValue::from_static("http://localhost:3000"),
                    HeaderValue::from_static("http://127.0.0.1:3000"),
                ])
                .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
                .allow_headers([axum::http::header::CONTENT_TYPE])
        });

    Router::new()
        .route("/healthz", get(handlers::health::health_check))
        .route("/version", get(handlers::health::version))
        .route("/api/chat", post(handlers::chat::stream_chat))
        .route("/api/lorem", post(handlers::lorem::stream_lorem))
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .with_state(state)
        .layer(middleware_stack)
}
