//! HTTP Server
//!
//! Builds the axum router and runs it on a TCP listener until shutdown.

use crate::auth::require_credential;
use crate::error::ServerError;
use crate::handler;
use axum::{middleware, routing::get, Router};
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use waitline_core::application::QueueService;
use waitline_core::port::AccessGate;

const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
const DEFAULT_HTTP_PORT: u16 = 8080;

/// HTTP Server Configuration
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HTTP_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
        }
    }
}

impl HttpServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ServerError::InvalidAddress(self.host.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<QueueService>,
    pub gate: Arc<dyn AccessGate>,
}

impl AppState {
    pub fn new(service: Arc<QueueService>, gate: Arc<dyn AccessGate>) -> Self {
        Self { service, gate }
    }
}

/// Build the application router
///
/// `/` is public; every `/queue` route passes the access gate first. Unknown
/// routes and methods answer with the same `{"detail": ...}` body as handlers.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/queue", get(handler::list_active).post(handler::join))
        .route(
            "/queue/:key",
            get(handler::get_entry)
                .put(handler::advance)
                .delete(handler::remove),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_credential,
        ));

    Router::new()
        .route("/", get(handler::home))
        .merge(protected)
        .fallback(handler::not_found)
        .method_not_allowed_fallback(handler::method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// HTTP Server bound to a listener
pub struct HttpServer {
    listener: TcpListener,
    router: Router,
}

impl HttpServer {
    /// Bind the listener; port 0 picks a free port
    pub async fn bind(config: &HttpServerConfig, state: AppState) -> Result<Self, ServerError> {
        let addr = config.socket_addr()?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        info!(
            host = %config.host,
            port = config.port,
            "HTTP server bound"
        );

        Ok(Self {
            listener,
            router: router(state),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve requests until `shutdown` resolves
    pub async fn serve<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!(addr = ?self.listener.local_addr().ok(), "HTTP server started");

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }
}
