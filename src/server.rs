use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use axum::{middleware, response::Redirect, routing::get, Router};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    decompression::RequestDecompressionLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};

use crate::{
    error::ErrorVerbosity,
    middleware::{
        method_not_allowed::method_not_allowed, not_found::not_found, trace_headers::trace_headers,
        trace_response_body::trace_response_body,
    },
    openapi::openapi_json,
    route,
    state::ApiState,
    store::{BookRepository, InMemoryBookStore},
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[source] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[source] serde_yaml::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerConfig {
    socket_address: SocketAddr,
    #[serde(default)]
    error_verbosity: ErrorVerbosity,
    /// Start with the two demo books instead of an empty inventory.
    #[serde(default = "default_seed_books")]
    seed_books: bool,
    /// Directory of the browser UI, served under `/ui/`.
    #[serde(default)]
    ui_dir: Option<PathBuf>,
    #[serde(default)]
    trace_response_body: bool,
}

fn default_seed_books() -> bool {
    true
}

impl ServerConfig {
    pub fn new(socket_address: SocketAddr, error_verbosity: ErrorVerbosity) -> Self {
        Self {
            socket_address,
            error_verbosity,
            seed_books: default_seed_books(),
            ui_dir: None,
            trace_response_body: false,
        }
    }

    pub fn with_seed_books(mut self, seed_books: bool) -> Self {
        self.seed_books = seed_books;
        self
    }

    pub fn with_ui_dir(mut self, ui_dir: impl Into<PathBuf>) -> Self {
        self.ui_dir = Some(ui_dir.into());
        self
    }

    pub fn with_trace_response_body(mut self, trace_response_body: bool) -> Self {
        self.trace_response_body = trace_response_body;
        self
    }

    pub async fn from_config_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(ConfigError::Read)?;

        serde_yaml::from_str(&content).map_err(ConfigError::Parse)
    }
}

/// Builds the application router around `state`.
pub fn app(config: &ServerConfig, state: ApiState) -> Router {
    let mut router = Router::<ApiState>::new()
        .merge(route::books::app::app())
        .route("/api-docs/openapi.json", get(openapi_json));

    if let Some(ui_dir) = &config.ui_dir {
        router = router
            .route("/", get(|| async { Redirect::permanent("/ui/") }))
            .nest_service("/ui", ServeDir::new(ui_dir));
    }

    let mut router = router.fallback(not_found).layer(middleware::from_fn_with_state(
        state.clone(),
        method_not_allowed::<ApiState>,
    ));

    if config.trace_response_body {
        router = router.layer(middleware::from_fn_with_state(
            state.clone(),
            trace_response_body,
        ));
    }

    router
        .layer(middleware::from_fn(trace_headers))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                        .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                        .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
                )
                .layer(RequestDecompressionLayer::new())
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
}

pub struct Server {
    config: ServerConfig,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    fn state(&self) -> ApiState {
        let books: Arc<dyn BookRepository> = match self.config.seed_books {
            true => Arc::new(InMemoryBookStore::seeded()),
            false => Arc::new(InMemoryBookStore::new()),
        };

        ApiState::new(self.config.error_verbosity, books)
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(&self.config.socket_address)
            .await
            .context("Bind failed")?;

        self.serve(listener).await
    }

    /// Serves on an already bound listener until CTRL+C or SIGTERM.
    pub async fn serve(self, listener: TcpListener) -> anyhow::Result<()> {
        let app = app(&self.config, self.state());

        let addr = listener.local_addr().context("Failed to get local address")?;
        tracing::info!(%addr, "Starting server");

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");

        tracing::info!("CTRL+C received");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM signal handler")
            .recv()
            .await;

        tracing::info!("SIGTERM received");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down");
}
